//! Legality rules between options, and per model family.

use std::fmt;

use serde::Serialize;

use crate::error::{OptionError, OptionResult};
use crate::schema::{Convection, Kinetics, Options, SeiMechanism, SideReaction, SurfaceForm};

/// Family of full models an option set can be used with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ModelFamily {
    /// Lithium-ion cell with SEI growth.
    SeiAgeing,
    /// Lead-acid leading-order quasi-static.
    LeadAcidLeadingOrder,
    /// Lead-acid first-order quasi-static (with or without average correction).
    LeadAcidFirstOrder,
    /// Lead-acid composite, including the extended variants.
    LeadAcidComposite,
}

impl ModelFamily {
    pub fn is_lead_acid(self) -> bool {
        !matches!(self, ModelFamily::SeiAgeing)
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelFamily::SeiAgeing => "SEI ageing",
            ModelFamily::LeadAcidLeadingOrder => "lead-acid leading-order",
            ModelFamily::LeadAcidFirstOrder => "lead-acid first-order",
            ModelFamily::LeadAcidComposite => "lead-acid composite",
        };
        f.write_str(s)
    }
}

/// Checks that hold for every model family.
pub(crate) fn check_consistency(options: &Options) -> OptionResult<()> {
    if options.sei_on_cracks() && options.sei() == SeiMechanism::None {
        return Err(OptionError::Incompatible {
            reason: "'SEI on cracks' requires an SEI mechanism other than 'none'".to_string(),
        });
    }

    let dim = options.dimensionality().get();
    if options.current_collector().is_spatially_resolved() && dim == 0 {
        return Err(OptionError::Incompatible {
            reason: format!(
                "current collector '{}' requires dimensionality 1 or 2, got {dim}",
                options.current_collector()
            ),
        });
    }

    if options.convection() == Convection::FullTransverse && dim == 0 {
        return Err(OptionError::Incompatible {
            reason: "convection 'full transverse' requires dimensionality 1 or 2".to_string(),
        });
    }

    if options.surface_form() == SurfaceForm::False {
        if !options.side_reactions().is_empty() {
            return Err(OptionError::Incompatible {
                reason: "side reactions need a 'surface form' other than false".to_string(),
            });
        }
        if options.kinetics() != Kinetics::SymmetricButlerVolmer {
            return Err(OptionError::Incompatible {
                reason: format!(
                    "kinetics '{}' cannot be inverted explicitly; set a 'surface form'",
                    options.kinetics()
                ),
            });
        }
    }

    Ok(())
}

impl Options {
    /// Check that these options can build a model of `family`.
    pub fn check_family(&self, family: ModelFamily) -> OptionResult<()> {
        let reject = |reason| Err(OptionError::UnsupportedByFamily { family, reason });

        if family.is_lead_acid() && self.sei() != SeiMechanism::None {
            return reject("SEI growth is only modelled for lithium-ion cells");
        }
        match family {
            ModelFamily::SeiAgeing => {
                if self.side_reactions().contains(&SideReaction::Oxygen) {
                    return reject("the oxygen side reaction is only modelled for lead-acid cells");
                }
                if self.convection() != Convection::None {
                    return reject("convection is only modelled for lead-acid cells");
                }
            }
            ModelFamily::LeadAcidFirstOrder if self.convection() != Convection::None => {
                return reject(
                    "convection needs the full porosity submodel, which first-order models omit",
                );
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CurrentCollector;

    #[test]
    fn cracks_require_sei() {
        let err = Options::builder().sei_on_cracks(true).build().unwrap_err();
        assert!(matches!(err, OptionError::Incompatible { .. }));
    }

    #[test]
    fn potential_pair_requires_dimension() {
        let err = Options::builder()
            .current_collector(CurrentCollector::PotentialPair)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("dimensionality"));

        let ok = Options::builder()
            .current_collector(CurrentCollector::PotentialPair)
            .dimensionality(2)
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn averaged_collector_accepts_zero_dimension() {
        let o = Options::builder()
            .current_collector(CurrentCollector::PotentialPairQuiteConductiveAveraged)
            .build();
        assert!(o.is_ok());
    }

    #[test]
    fn side_reactions_need_surface_form() {
        let err = Options::builder()
            .side_reaction(SideReaction::Oxygen)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("surface form"));
        assert!(
            Options::builder()
                .side_reaction(SideReaction::Oxygen)
                .surface_form(SurfaceForm::Differential)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn asymmetric_kinetics_need_surface_form() {
        let builder = Options::builder().kinetics(Kinetics::AsymmetricButlerVolmer);
        assert!(builder.clone().build().is_err());
        assert!(builder.surface_form(SurfaceForm::Algebraic).build().is_ok());
    }

    #[test]
    fn family_rules() {
        let sei = Options::builder()
            .sei(SeiMechanism::ReactionLimited)
            .build()
            .unwrap();
        assert!(sei.check_family(ModelFamily::SeiAgeing).is_ok());
        assert!(sei.check_family(ModelFamily::LeadAcidComposite).is_err());

        let convective = Options::builder()
            .convection(Convection::UniformTransverse)
            .build()
            .unwrap();
        assert!(convective.check_family(ModelFamily::LeadAcidComposite).is_ok());
        assert!(matches!(
            convective.check_family(ModelFamily::LeadAcidFirstOrder),
            Err(OptionError::UnsupportedByFamily {
                family: ModelFamily::LeadAcidFirstOrder,
                ..
            })
        ));
    }
}

//! Lithium-ion cell ageing through SEI growth.

use std::sync::Arc;

use ec_model::{ModelAssembler, ModelResult};
use ec_options::{ModelFamily, Options};
use ec_submodels::electrolyte::{ConstantConcentration, conductivity};
use ec_submodels::sei::SeiLocation;
use ec_submodels::thermal::Isothermal;
use ec_submodels::{Electrode, Parameters, Reactions, electrode_ohm, porosity};

use crate::model::FullModel;
use crate::select::{select_cracking, select_current_collector, select_interface, select_sei};

/// Single-particle style cell with constant electrolyte and porosity, in
/// which the only slow dynamics are the SEI film (and the surface
/// potential differences, with a surface form).
#[derive(Clone, Debug)]
pub struct SeiAgeingModel {
    options: Options,
    params: Arc<Parameters>,
    location: SeiLocation,
}

impl SeiAgeingModel {
    pub const NAME: &'static str = "SEI ageing model";

    pub fn new(options: Options, params: Arc<Parameters>) -> Self {
        Self {
            options,
            params,
            location: SeiLocation::default(),
        }
    }

    /// Track the film at `location` instead of through the electrode.
    pub fn with_location(mut self, location: SeiLocation) -> Self {
        self.location = location;
        self
    }
}

impl FullModel for SeiAgeingModel {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn family(&self) -> ModelFamily {
        ModelFamily::SeiAgeing
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn assembler(&self) -> ModelResult<ModelAssembler> {
        let options = &self.options;
        let params = &self.params;
        let mut assembler = ModelAssembler::new(Self::NAME);

        assembler
            .add_boxed(select_current_collector(options, params))
            .add(Isothermal::new(params.clone()))
            .add(porosity::Constant::new(params.clone()))
            .add(ConstantConcentration::new(params.clone()));
        for electrode in Electrode::BOTH {
            assembler.add_boxed(select_interface(
                options,
                params,
                electrode,
                Reactions::default(),
            ));
        }
        for electrode in Electrode::BOTH {
            assembler.add(electrode_ohm::LeadingOrder::new(electrode));
        }
        assembler.add(conductivity::LeadingOrder);

        if let Some(cracking) = select_cracking(options, params, self.location) {
            assembler.add_boxed(cracking);
        }
        for sei in select_sei(options, params, self.location) {
            assembler.add_boxed(sei);
        }
        Ok(assembler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_options::SeiMechanism;

    #[test]
    fn sei_growth_is_ordered_after_the_interfaces() {
        let options = Options::builder()
            .sei(SeiMechanism::ReactionLimited)
            .build()
            .unwrap();
        let model = SeiAgeingModel::new(options, Arc::default());
        let assembler = model.assembler().unwrap();
        let order = assembler.coupled_order().unwrap();
        let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
        assert!(
            position("reaction-limited SEI growth")
                > position("negative inverse Butler-Volmer interface")
        );
        assert!(
            position("uniform current collector")
                > position("positive electrode leading-order ohm")
        );
    }
}

use std::sync::Arc;

use ec_model::{AssembledModel, LeadingOrderImport, ModelAssembler, ModelResult};
use ec_options::{DiffusionOrder, ModelFamily, Options};
use ec_submodels::current_collector::LeadingOrderCurrentCollector;
use ec_submodels::electrolyte::conductivity;
use ec_submodels::electrolyte::diffusion::{
    Composite, Extension, FirstOrder, FirstOrderAverageCorrection,
};
use ec_submodels::interface::{FirstOrderButlerVolmer, InverseFirstOrderKinetics};
use ec_submodels::oxygen::{self, DiffusionLimited, FirstOrderForwardTafel};
use ec_submodels::thermal::Isothermal;
use ec_submodels::{Electrode, KineticsLaw, Parameters, Reactions, electrode_ohm, porosity};
use tracing::debug;

use super::{Loqs, dae_reason};
use crate::model::FullModel;
use crate::select::select_through_cell_convection;

/// First-order quasi-static and composite models.
///
/// Each embeds a complete leading-order model: its variables are visible as
/// `"Leading-order ..."` and its states and events are carried into this
/// model unchanged. The higher-order submodels then correct the electrolyte
/// concentration and potentials about it.
#[derive(Clone, Debug)]
pub struct HigherOrder {
    kind: DiffusionOrder,
    options: Options,
    params: Arc<Parameters>,
}

impl HigherOrder {
    /// The kind named by the `diffusion order` option.
    pub fn new(options: Options, params: Arc<Parameters>) -> Self {
        Self::with_kind(options.diffusion_order(), options, params)
    }

    pub fn with_kind(kind: DiffusionOrder, options: Options, params: Arc<Parameters>) -> Self {
        Self {
            kind,
            options,
            params,
        }
    }

    pub fn kind(&self) -> DiffusionOrder {
        self.kind
    }

    /// The embedded leading-order model, built from the same options.
    pub fn leading_order(&self) -> ModelResult<AssembledModel> {
        Loqs::new(self.options.clone(), self.params.clone())
            .named(format!("LOQS model (for {})", self.name()))
            .build()
    }
}

impl FullModel for HigherOrder {
    fn name(&self) -> &str {
        match self.kind {
            DiffusionOrder::FirstOrder => "FOQS model",
            DiffusionOrder::FirstOrderAverageCorrection => "FOQS model with average correction",
            DiffusionOrder::Composite => "Composite model",
            DiffusionOrder::CompositeExtendedDistributed => "Extended composite model (distributed)",
            DiffusionOrder::CompositeExtendedAveraged => "Extended composite model (average)",
        }
    }

    fn family(&self) -> ModelFamily {
        if self.kind.is_first_order() {
            ModelFamily::LeadAcidFirstOrder
        } else {
            ModelFamily::LeadAcidComposite
        }
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn assembler(&self) -> ModelResult<ModelAssembler> {
        let options = &self.options;
        let params = &self.params;
        let reactions = Reactions::new(options.has_oxygen());
        let law = KineticsLaw::from(options.kinetics());
        let extension = Extension::for_order(self.kind);

        let inner = self.leading_order()?;
        debug!(
            model = inner.name(),
            states = inner.equations().states().len(),
            "leading-order model built"
        );
        let mut assembler = ModelAssembler::new(self.name());
        assembler.with_leading_order(LeadingOrderImport::from_model(&inner)?);

        match (self.kind, extension) {
            (_, Some(extension)) => {
                assembler.add(Composite::new(params.clone(), reactions, extension));
            }
            (DiffusionOrder::FirstOrderAverageCorrection, None) => {
                assembler
                    .add(FirstOrderAverageCorrection::new(params.clone(), reactions))
                    .require_dae("first-order average correction");
            }
            (_, None) => {
                assembler.add(FirstOrder::new(params.clone(), reactions));
            }
        }
        if reactions.has_oxygen() {
            match extension {
                Some(extension) => {
                    assembler.add(oxygen::diffusion::Composite::new(params.clone(), extension))
                }
                None => assembler.add(oxygen::diffusion::FirstOrder::new(params.clone())),
            };
        }

        for electrode in Electrode::BOTH {
            assembler.add(InverseFirstOrderKinetics::new(
                params.clone(),
                electrode,
                law,
                reactions,
            ));
        }
        assembler
            .add(electrode_ohm::Composite::new(params.clone(), Electrode::Negative))
            .add(conductivity::FirstOrder::new(params.clone()))
            .add(electrode_ohm::Composite::new(params.clone(), Electrode::Positive));

        for electrode in Electrode::BOTH {
            assembler.add(FirstOrderButlerVolmer::new(params.clone(), electrode, law));
        }
        if reactions.has_oxygen() {
            assembler
                .add(FirstOrderForwardTafel::new(params.clone()))
                .add(DiffusionLimited::composite(params.clone()));
        }

        assembler.add_boxed(select_through_cell_convection(options, params, true));
        if !self.kind.is_first_order() {
            assembler.add(porosity::Full::new(params.clone()));
        }
        assembler.add(Isothermal::new(params.clone())).add(
            LeadingOrderCurrentCollector::from_model(
                &inner,
                options.current_collector().is_spatially_resolved(),
            )?,
        );

        if let Some(reason) = dae_reason(options) {
            assembler.require_dae(reason);
        }
        Ok(assembler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_the_diffusion_order_option() {
        let options = Options::builder()
            .diffusion_order(DiffusionOrder::FirstOrder)
            .build()
            .unwrap();
        let model = HigherOrder::new(options, Arc::default());
        assert_eq!(model.kind(), DiffusionOrder::FirstOrder);
        assert_eq!(model.family(), ModelFamily::LeadAcidFirstOrder);
        assert_eq!(model.name(), "FOQS model");
    }

    #[test]
    fn composite_model_carries_the_leading_order_states() {
        let model = HigherOrder::new(Options::default(), Arc::default());
        let inner = model.leading_order().unwrap();
        let outer = model.build().unwrap();
        for state in inner.equations().states() {
            assert!(outer.equations().rhs().contains_key(state), "{}", state.name());
        }
        assert!(outer.variable(LeadingOrderImport::CONCENTRATION_CHANGE).is_some());
        assert!(outer.state("Negative electrolyte concentration").is_some());
        assert!(!outer.solver_hint().is_dae());
    }
}

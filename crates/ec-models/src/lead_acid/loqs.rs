use std::sync::Arc;

use ec_model::{ModelAssembler, ModelResult};
use ec_options::{ModelFamily, Options};
use ec_submodels::electrolyte::{conductivity, diffusion};
use ec_submodels::oxygen::{self, DiffusionLimited, ForwardTafel, NoOxygen};
use ec_submodels::thermal::Isothermal;
use ec_submodels::{Electrode, Parameters, Reactions, electrode_ohm, porosity};

use super::dae_reason;
use crate::model::FullModel;
use crate::select::{
    select_current_collector, select_interface, select_through_cell_convection,
    select_transverse_convection,
};

/// Leading-order quasi-static model: every through-cell quantity is
/// x-averaged and the electrolyte concentration is a single state.
#[derive(Clone, Debug)]
pub struct Loqs {
    name: String,
    options: Options,
    params: Arc<Parameters>,
}

impl Loqs {
    pub const NAME: &'static str = "LOQS model";

    pub fn new(options: Options, params: Arc<Parameters>) -> Self {
        Self {
            name: Self::NAME.to_string(),
            options,
            params,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl FullModel for Loqs {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> ModelFamily {
        ModelFamily::LeadAcidLeadingOrder
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn assembler(&self) -> ModelResult<ModelAssembler> {
        let options = &self.options;
        let params = &self.params;
        let reactions = Reactions::new(options.has_oxygen());
        let mut assembler = ModelAssembler::new(self.name.clone());

        assembler
            .add_boxed(select_current_collector(options, params))
            .add(Isothermal::new(params.clone()))
            .add(porosity::LeadingOrder::new(params.clone()))
            .add_boxed(select_transverse_convection(options, params))
            .add_boxed(select_through_cell_convection(options, params, false));

        for electrode in Electrode::BOTH {
            assembler.add_boxed(select_interface(options, params, electrode, reactions));
        }
        if reactions.has_oxygen() {
            assembler
                .add(ForwardTafel::new(params.clone()))
                .add(DiffusionLimited::leading_order(params.clone()))
                .add(oxygen::diffusion::LeadingOrder::new(params.clone()));
        } else {
            assembler
                .add(NoOxygen::new(Electrode::Positive))
                .add(NoOxygen::new(Electrode::Negative))
                .add(oxygen::diffusion::NoOxygen);
        }

        for electrode in Electrode::BOTH {
            assembler.add(electrode_ohm::LeadingOrder::new(electrode));
        }
        assembler
            .add(conductivity::LeadingOrder)
            .add(diffusion::LeadingOrder::new(params.clone(), reactions));

        if let Some(reason) = dae_reason(options) {
            assembler.require_dae(reason);
        }
        Ok(assembler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_options::{SideReaction, SurfaceForm};

    #[test]
    fn electrolyte_concentration_is_a_single_state() {
        let model = Loqs::new(Options::default(), Arc::default()).build().unwrap();
        let states: Vec<&str> = model
            .equations()
            .states()
            .into_iter()
            .map(|s| s.name())
            .collect();
        assert!(states.contains(&"X-averaged electrolyte concentration"));
        assert!(states.contains(&"X-averaged negative electrode porosity"));
        assert!(model.equations().algebraic().is_empty());
        assert!(!model.solver_hint().is_dae());
    }

    #[test]
    fn oxygen_adds_an_oxygen_state() {
        let options = Options::builder()
            .surface_form(SurfaceForm::Differential)
            .side_reaction(SideReaction::Oxygen)
            .build()
            .unwrap();
        let model = Loqs::new(options, Arc::default()).build().unwrap();
        assert!(model.state("X-averaged oxygen concentration").is_some());
        assert!(
            model
                .state("X-averaged negative electrode surface potential difference")
                .is_some()
        );
    }
}

use std::sync::Arc;

use ec_core::Domain;
use ec_model::{ModelResult, NamedExprs, Submodel};

use super::{CONCENTRATION, concentration_names};
use crate::common::{broadcast_cell, cell_field};
use crate::parameters::Parameters;

/// Electrolyte concentration held at its initial value.
#[derive(Clone, Debug)]
pub struct ConstantConcentration {
    params: Arc<Parameters>,
}

impl ConstantConcentration {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }
}

impl Submodel for ConstantConcentration {
    fn name(&self) -> &str {
        "constant electrolyte concentration"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let c_av = self
            .params
            .electrolyte
            .c_init
            .broadcast(Domain::CurrentCollector);
        let regions = broadcast_cell(&c_av);
        Ok(cell_field(&concentration_names(), CONCENTRATION, regions, c_av))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_model::VariableRegistry;
    use ec_model::testing::check_submodel;

    #[test]
    fn constant_concentration_has_no_states() {
        let check = check_submodel(
            &ConstantConcentration::new(Arc::default()),
            &VariableRegistry::new(),
        )
        .unwrap();
        assert!(check.equations.is_empty());
        assert!(check.registry.contains("X-averaged separator electrolyte concentration"));
        assert!(check.registry.contains(crate::electrolyte::X_AVERAGED_CONCENTRATION));
    }
}

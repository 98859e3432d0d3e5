//! Thermal submodels.

use std::sync::Arc;

use ec_core::Domain;
use ec_expr::Expr;
use ec_model::{ModelResult, NamedExprs, Submodel};

use crate::common::{broadcast_cell, electrode_region_names, x_averaged};
use crate::parameters::Parameters;

pub const CELL_TEMPERATURE: &str = "Cell temperature";
pub const X_AVERAGED_CELL_TEMPERATURE: &str = "X-averaged cell temperature";

/// The cell stays at ambient temperature.
#[derive(Clone, Debug)]
pub struct Isothermal {
    params: Arc<Parameters>,
}

impl Isothermal {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }
}

impl Submodel for Isothermal {
    fn name(&self) -> &str {
        "isothermal"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let ambient = &self.params.thermal.t_ambient;
        let t_av = ambient.broadcast(Domain::CurrentCollector);
        let regions = broadcast_cell(&t_av);

        let mut vars = NamedExprs::new()
            .with("Ambient temperature", ambient)
            .with(CELL_TEMPERATURE, Expr::concatenate(regions.to_vec()))
            .with(X_AVERAGED_CELL_TEMPERATURE, &t_av);
        for (name, field) in electrode_region_names("temperature").iter().zip(regions) {
            vars.insert(x_averaged(name), &t_av);
            vars.insert(name.as_str(), field);
        }
        Ok(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_model::VariableRegistry;
    use ec_model::testing::check_submodel;

    #[test]
    fn declares_every_region() {
        let check =
            check_submodel(&Isothermal::new(Arc::default()), &VariableRegistry::new()).unwrap();
        for name in [
            "Negative electrode temperature",
            "X-averaged separator temperature",
            "X-averaged positive electrode temperature",
            CELL_TEMPERATURE,
        ] {
            assert!(check.registry.contains(name), "{name}");
        }
        assert!(check.equations.is_empty());
    }
}

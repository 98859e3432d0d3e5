//! Convection of the electrolyte, driven by the volume change of the
//! electrode reactions.
//!
//! Transverse submodels describe flow along the separator in the
//! current-collector plane; through-cell submodels give the volume-averaged
//! velocity across the cell.

use std::collections::BTreeMap;
use std::sync::Arc;

use ec_core::{Domain, DomainSpec, Side};
use ec_expr::{Expr, Variable};
use ec_model::submodel::names;
use ec_model::{
    BoundaryCondition, BoundaryConditions, ModelResult, NamedExprs, RegistryView, Submodel,
};

use crate::common::{
    Electrode, broadcast_cell, cell_field_names, electrode_region_names, leading_order,
    resolved_cell_field,
};
use crate::current_collector::CURRENT_DENSITY;
use crate::parameters::Parameters;
use crate::reactions::Reaction;

pub const TRANSVERSE_VELOCITY: &str = "X-averaged separator transverse volume-averaged velocity";
pub const TRANSVERSE_ACCELERATION: &str =
    "X-averaged separator transverse volume-averaged acceleration";
pub const PRESSURE: &str = "X-averaged separator pressure";
pub const VELOCITY: &str = "Volume-averaged velocity";

pub fn velocity_names() -> [String; 3] {
    electrode_region_names("volume-averaged velocity")
}

fn cc_zeros() -> Expr {
    Expr::zeros(DomainSpec::on(Domain::CurrentCollector))
}

/// Separator acceleration that takes up the electrodes' net volume change
/// when the current passes uniformly through the collector plane.
fn uniform_acceleration(params: &Parameters, i_cc: &Expr) -> Expr {
    let net = &params.negative.delta_v - &params.positive.delta_v;
    -(net * i_cc) / &params.geometry.l_s
}

pub mod transverse {
    use super::*;

    /// No transverse flow.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct NoConvection;

    impl Submodel for NoConvection {
        fn name(&self) -> &str {
            "no transverse convection"
        }

        fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
            Ok(NamedExprs::new()
                .with(TRANSVERSE_VELOCITY, cc_zeros())
                .with(TRANSVERSE_ACCELERATION, cc_zeros()))
        }
    }

    /// Transverse acceleration uniform over the collector plane.
    #[derive(Clone, Debug)]
    pub struct Uniform {
        params: Arc<Parameters>,
    }

    impl Uniform {
        pub fn new(params: Arc<Parameters>) -> Self {
            Self { params }
        }
    }

    impl Submodel for Uniform {
        fn name(&self) -> &str {
            "uniform transverse convection"
        }

        fn coupled_inputs(&self) -> Vec<String> {
            names([CURRENT_DENSITY])
        }

        fn coupled_outputs(&self) -> Vec<String> {
            names([TRANSVERSE_VELOCITY, TRANSVERSE_ACCELERATION])
        }

        fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            let acceleration = uniform_acceleration(&self.params, &vars.get(CURRENT_DENSITY)?);
            let z = Expr::spatial_variable(Domain::CurrentCollector);
            Ok(NamedExprs::new()
                .with(TRANSVERSE_VELOCITY, &acceleration * z)
                .with(TRANSVERSE_ACCELERATION, acceleration))
        }
    }

    /// Transverse flow from a separator pressure solved in the collector
    /// plane.
    #[derive(Clone, Debug)]
    pub struct Full {
        params: Arc<Parameters>,
    }

    impl Full {
        pub fn new(params: Arc<Parameters>) -> Self {
            Self { params }
        }
    }

    impl Submodel for Full {
        fn name(&self) -> &str {
            "full transverse convection"
        }

        fn coupled_outputs(&self) -> Vec<String> {
            names([TRANSVERSE_VELOCITY, TRANSVERSE_ACCELERATION])
        }

        fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
            Ok(NamedExprs::new().with(PRESSURE, Variable::on(PRESSURE, Domain::CurrentCollector)))
        }

        fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            let velocity = -vars.get(PRESSURE)?.gradient();
            Ok(NamedExprs::new()
                .with(TRANSVERSE_ACCELERATION, velocity.divergence())
                .with(TRANSVERSE_VELOCITY, velocity))
        }

        fn set_algebraic(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            let acceleration = vars.get(TRANSVERSE_ACCELERATION)?;
            let source = uniform_acceleration(&self.params, &vars.get(CURRENT_DENSITY)?);
            Ok(NamedExprs::new().with(PRESSURE, acceleration - source))
        }

        fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            Ok(NamedExprs::new().with(PRESSURE, 0.0))
        }

        fn set_boundary_conditions(
            &self,
            _vars: &RegistryView<'_>,
        ) -> ModelResult<BTreeMap<String, BoundaryConditions>> {
            let pressure = BoundaryConditions::from([
                (Side::Left, BoundaryCondition::neumann(0.0)),
                (Side::Right, BoundaryCondition::dirichlet(0.0)),
            ]);
            Ok(BTreeMap::from([(PRESSURE.to_string(), pressure)]))
        }
    }
}

pub mod through_cell {
    use super::*;

    /// No through-cell flow.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct NoConvection;

    impl Submodel for NoConvection {
        fn name(&self) -> &str {
            "no through-cell convection"
        }

        fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
            Ok(resolved_cell_field(
                &velocity_names(),
                VELOCITY,
                broadcast_cell(&cc_zeros()),
            ))
        }
    }

    /// Which interfacial currents drive the flow.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Source {
        /// The model's own x-averaged currents.
        Model,
        /// The currents of an embedded leading-order model.
        LeadingOrder,
    }

    /// Volume-averaged velocity from x-averaged interfacial currents.
    #[derive(Clone, Debug)]
    pub struct ThroughCell {
        params: Arc<Parameters>,
        source: Source,
    }

    impl ThroughCell {
        /// Driven by the model's own leading-order currents.
        pub fn leading_order(params: Arc<Parameters>) -> Self {
            Self {
                params,
                source: Source::Model,
            }
        }

        /// Explicit correction driven by an embedded leading-order model.
        pub fn explicit(params: Arc<Parameters>) -> Self {
            Self {
                params,
                source: Source::LeadingOrder,
            }
        }

        fn input(&self, name: &str) -> String {
            match self.source {
                Source::Model => name.to_string(),
                Source::LeadingOrder => leading_order(name),
            }
        }
    }

    impl Submodel for ThroughCell {
        fn name(&self) -> &str {
            match self.source {
                Source::Model => "leading-order through-cell convection",
                Source::LeadingOrder => "explicit through-cell convection",
            }
        }

        fn coupled_inputs(&self) -> Vec<String> {
            Electrode::BOTH
                .iter()
                .map(|e| self.input(&Reaction::Main.x_averaged_current_density(*e)))
                .chain([self.input(TRANSVERSE_ACCELERATION)])
                .collect()
        }

        fn coupled_outputs(&self) -> Vec<String> {
            cell_field_names(&velocity_names(), VELOCITY)
        }

        fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            let [n, s, p] = Domain::CELL_REGIONS;
            let j = |e: Electrode| {
                vars.get(&self.input(&Reaction::Main.x_averaged_current_density(e)))
            };
            let j_n = j(Electrode::Negative)?;
            let j_p = j(Electrode::Positive)?;
            let acceleration = vars.get(&self.input(TRANSVERSE_ACCELERATION))?;
            let geometry = &self.params.geometry;
            let beta_n = &self.params.negative.beta_surf;
            let beta_p = &self.params.positive.beta_surf;

            let v_n = -(beta_n * j_n.broadcast(n)) * Expr::spatial_variable(n);
            let at_separator = -(beta_n * &j_n) * &geometry.l_n;
            let v_s = at_separator.broadcast(s)
                - acceleration.broadcast(s) * (Expr::spatial_variable(s) - &geometry.l_n);
            let v_p = -(beta_p * j_p.broadcast(p)) * (Expr::spatial_variable(p) - 1.0);
            Ok(resolved_cell_field(&velocity_names(), VELOCITY, [v_n, v_s, v_p]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_model::VariableRegistry;
    use ec_model::testing::check_submodel;

    fn seed() -> VariableRegistry {
        let cc = DomainSpec::on(Domain::CurrentCollector);
        let mut seed = VariableRegistry::new();
        seed.declare(CURRENT_DENSITY, Expr::filled(1.0, cc), "test").unwrap();
        for e in Electrode::BOTH {
            let name = Reaction::Main.x_averaged_current_density(e);
            seed.declare(leading_order(&name), Expr::filled(1.0, cc), "test")
                .unwrap();
            seed.declare(name, Expr::filled(1.0, cc), "test").unwrap();
        }
        seed.declare(TRANSVERSE_ACCELERATION, cc_zeros(), "test").unwrap();
        seed.declare(leading_order(TRANSVERSE_ACCELERATION), cc_zeros(), "test")
            .unwrap();
        seed
    }

    fn collector_seed() -> VariableRegistry {
        let mut seed = VariableRegistry::new();
        let i_cc = Expr::filled(1.0, DomainSpec::on(Domain::CurrentCollector));
        seed.declare(CURRENT_DENSITY, i_cc, "test").unwrap();
        seed
    }

    #[test]
    fn full_transverse_pressure_is_algebraic() {
        let check =
            check_submodel(&transverse::Full::new(Arc::default()), &collector_seed()).unwrap();
        assert_eq!(check.equations.algebraic().len(), 1);
        assert!(check.equations.boundary_conditions().contains_key(PRESSURE));
    }

    #[test]
    fn through_cell_velocity_is_declared_per_region() {
        for submodel in [
            through_cell::ThroughCell::leading_order(Arc::default()),
            through_cell::ThroughCell::explicit(Arc::default()),
        ] {
            let check = check_submodel(&submodel, &seed()).unwrap();
            for name in cell_field_names(&velocity_names(), VELOCITY) {
                assert!(check.registry.contains(&name), "{name}");
            }
        }
    }

    #[test]
    fn uniform_transverse_reads_the_collector_current() {
        let check =
            check_submodel(&transverse::Uniform::new(Arc::default()), &collector_seed()).unwrap();
        assert!(!check.registry.get(TRANSVERSE_ACCELERATION).unwrap().is_zero());
    }
}

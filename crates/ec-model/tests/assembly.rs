//! Assembly of small hand-written submodels.

use std::collections::BTreeMap;

use ec_core::{Domain, Side};
use ec_expr::{Expr, Variable};
use ec_model::submodel::names;
use ec_model::{
    BoundaryCondition, BoundaryConditions, Event, LeadingOrderImport, ModelAssembler, ModelError,
    ModelResult, NamedExprs, RegistryView, SolverHint, Submodel, VariableRegistry,
};

/// `dc/dt = -k * j` with `j` read from another submodel.
struct Reservoir;

impl Submodel for Reservoir {
    fn name(&self) -> &str {
        "reservoir"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let c = Variable::on("X-averaged electrolyte concentration", Domain::CurrentCollector);
        Ok(NamedExprs::new()
            .with("X-averaged electrolyte concentration", &c)
            .with("Electrolyte concentration", Expr::from(&c).broadcast(Domain::WholeCell)))
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let j = vars.get("Interfacial current density")?;
        Ok(NamedExprs::new().with("X-averaged electrolyte concentration", -Expr::parameter("k") * j))
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with("X-averaged electrolyte concentration", Expr::parameter("c0")))
    }

    fn set_events(&self, vars: &RegistryView<'_>) -> ModelResult<Vec<Event>> {
        let c = vars.get("X-averaged electrolyte concentration")?;
        Ok(vec![Event::termination("Zero concentration", c - 0.002)])
    }
}

/// `j = I * c` computed in the coupled phase.
struct Reaction {
    reads: &'static str,
}

impl Submodel for Reaction {
    fn name(&self) -> &str {
        "reaction"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        names([self.reads])
    }

    fn coupled_outputs(&self) -> Vec<String> {
        names(["Interfacial current density"])
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let c = vars.get(self.reads)?;
        Ok(NamedExprs::new().with("Interfacial current density", Expr::parameter("I") * c))
    }
}

/// Reads the reaction's output and publishes a derived quantity.
struct Voltage;

impl Submodel for Voltage {
    fn name(&self) -> &str {
        "voltage"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        names(["Interfacial current density"])
    }

    fn coupled_outputs(&self) -> Vec<String> {
        names(["Terminal voltage"])
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let j = vars.get("Interfacial current density")?;
        Ok(NamedExprs::new().with("Terminal voltage", Expr::parameter("U") - j))
    }
}

/// Algebraic potential with tab boundary conditions.
struct Potential;

impl Submodel for Potential {
    fn name(&self) -> &str {
        "potential"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let phi = Variable::on("Potential", Domain::CurrentCollector);
        Ok(NamedExprs::new().with("Potential", &phi))
    }

    fn set_algebraic(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let phi = vars.get("Potential")?;
        Ok(NamedExprs::new().with("Potential", phi.laplacian() - Expr::parameter("s")))
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with("Potential", 0.0))
    }

    fn set_boundary_conditions(
        &self,
        _vars: &RegistryView<'_>,
    ) -> ModelResult<BTreeMap<String, BoundaryConditions>> {
        let bcs = BoundaryConditions::from([
            (Side::NegativeTab, BoundaryCondition::dirichlet(0.0)),
            (Side::PositiveTab, BoundaryCondition::neumann(0.0)),
        ]);
        Ok(BTreeMap::from([("Potential".to_string(), bcs)]))
    }
}

fn simple_model() -> ModelAssembler {
    let mut assembler = ModelAssembler::new("toy");
    assembler
        .add(Voltage)
        .add(Reservoir)
        .add(Reaction {
            reads: "X-averaged electrolyte concentration",
        });
    assembler
}

#[test]
fn assembles_ode_model() {
    let model = simple_model().assemble().unwrap();
    assert_eq!(model.equations().states().len(), 1);
    assert_eq!(model.solver_hint(), SolverHint::Ode);
    assert_eq!(model.events().len(), 1);
    assert!(model.variable("Terminal voltage").is_some());
    assert!(model.state("X-averaged electrolyte concentration").is_some());
    assert!(model.state("Terminal voltage").is_none());
}

#[test]
fn coupled_phase_runs_in_dependency_order() {
    let assembler = simple_model();
    let order = assembler.coupled_order().unwrap();
    // "voltage" was added first but consumes the reaction's output.
    assert_eq!(order, vec!["reservoir", "reaction", "voltage"]);
}

#[test]
fn algebraic_equation_selects_dae() {
    let mut assembler = simple_model();
    assembler.add(Potential);
    let model = assembler.assemble().unwrap();
    assert_eq!(model.solver_hint(), SolverHint::Dae);
    assert!(model.equations().boundary_conditions().contains_key("Potential"));
}

#[test]
fn forced_dae_hint() {
    let mut assembler = simple_model();
    assembler.require_dae("average correction");
    assert!(assembler.assemble().unwrap().solver_hint().is_dae());
}

#[test]
fn duplicate_declaration_names_both_submodels() {
    let mut assembler = simple_model();
    assembler.add(Reservoir);
    match assembler.assemble() {
        Err(ModelError::DuplicateVariable {
            name,
            first,
            second,
        }) => {
            assert_eq!(name, "X-averaged electrolyte concentration");
            assert_eq!(first, "reservoir");
            assert_eq!(second, "reservoir");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_input_is_reported_before_any_coupled_phase() {
    let mut assembler = ModelAssembler::new("broken");
    assembler.add(Reservoir).add(Reaction {
        reads: "Negative particle surface concentration",
    });
    match assembler.assemble() {
        Err(ModelError::UnknownVariable { name, requested_by }) => {
            assert_eq!(name, "Negative particle surface concentration");
            assert_eq!(requested_by, "reaction");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_equation_producer_is_unknown_variable() {
    let mut assembler = ModelAssembler::new("no reaction");
    assembler.add(Reservoir);
    assert!(matches!(
        assembler.assemble(),
        Err(ModelError::UnknownVariable { ref requested_by, .. }) if requested_by == "reservoir"
    ));
}

/// Declares a thickness state but never gives it an equation.
struct Unsolved;

impl Submodel for Unsolved {
    fn name(&self) -> &str {
        "unsolved film"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let l = Variable::on("Film thickness", Domain::CurrentCollector);
        Ok(NamedExprs::new()
            .with("Film thickness", &l)
            .with("Film resistance", Expr::parameter("R") * Expr::from(&l)))
    }
}

#[test]
fn declared_state_without_equation_is_rejected() {
    let mut assembler = simple_model();
    assembler.add(Unsolved);
    match assembler.assemble() {
        Err(ModelError::InconsistentEquationSet { state, reason }) => {
            assert_eq!(state, "Film thickness");
            assert!(reason.contains("no rhs or algebraic equation"), "{reason}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

/// Two submodels that each need the other's coupled output.
struct Echo {
    name: &'static str,
    reads: &'static str,
    writes: &'static str,
}

impl Submodel for Echo {
    fn name(&self) -> &str {
        self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        names([self.reads])
    }

    fn coupled_outputs(&self) -> Vec<String> {
        names([self.writes])
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with(self.writes, vars.get(self.reads)?))
    }
}

#[test]
fn dependency_cycle_is_rejected() {
    let mut assembler = ModelAssembler::new("cyclic");
    assembler
        .add(Echo {
            name: "a",
            reads: "y",
            writes: "x",
        })
        .add(Echo {
            name: "b",
            reads: "x",
            writes: "y",
        });
    match assembler.assemble() {
        Err(ModelError::DependencyCycle { submodels }) => {
            assert_eq!(submodels, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

/// Keys an rhs by a derived quantity instead of a state.
struct KeysDerived;

impl Submodel for KeysDerived {
    fn name(&self) -> &str {
        "keys derived"
    }

    fn set_rhs(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with("Electrolyte concentration", 1.0))
    }
}

#[test]
fn equation_keyed_by_non_state_is_rejected() {
    let mut assembler = simple_model();
    assembler.add(KeysDerived);
    assert!(matches!(
        assembler.assemble(),
        Err(ModelError::NotAState { ref name, .. }) if name == "Electrolyte concentration"
    ));
}

/// Uses leading-order quantities as coefficients.
struct Correction;

impl Submodel for Correction {
    fn name(&self) -> &str {
        "correction"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let c1 = Variable::on("First-order concentration", Domain::CurrentCollector);
        Ok(NamedExprs::new().with("First-order concentration", &c1))
    }

    fn coupled_inputs(&self) -> Vec<String> {
        names(["Leading-order x-averaged electrolyte concentration"])
    }

    fn coupled_outputs(&self) -> Vec<String> {
        names(["X-averaged electrolyte concentration"])
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let c0 = vars.get("Leading-order x-averaged electrolyte concentration")?;
        let c1 = vars.get("First-order concentration")?;
        Ok(NamedExprs::new().with("X-averaged electrolyte concentration", c0 + c1))
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let dc0 = vars.get(LeadingOrderImport::CONCENTRATION_CHANGE)?;
        Ok(NamedExprs::new().with("First-order concentration", dc0))
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with("First-order concentration", 0.0))
    }
}

#[test]
fn leading_order_model_is_embedded() {
    let inner = simple_model().assemble().unwrap();
    let import = LeadingOrderImport::from_model(&inner).unwrap();

    let mut outer = ModelAssembler::new("toy first-order");
    outer.with_leading_order(import).add(Correction);
    let model = outer.assemble().unwrap();

    for (name, expr) in inner.variables().iter() {
        let renamed = LeadingOrderImport::leading_order_name(name);
        assert_eq!(model.variable(&renamed), Some(expr), "{renamed}");
        assert_eq!(
            model.variables().owner(&renamed),
            Some(LeadingOrderImport::OWNER)
        );
    }
    let c = inner
        .state("X-averaged electrolyte concentration")
        .unwrap()
        .clone();
    assert_eq!(
        model.variable(LeadingOrderImport::CONCENTRATION_CHANGE),
        inner.equations().rhs().get(&c)
    );
    // inner states are carried so the outer system is closed
    assert_eq!(model.equations().states().len(), 2);
    assert_eq!(model.events().len(), 1);
}

#[test]
fn seeded_registry_harness() {
    let mut seed = VariableRegistry::new();
    seed.declare("Interfacial current density", Expr::scalar(0.0), "seed")
        .unwrap();
    let check = ec_model::testing::check_submodel(&Reservoir, &seed).unwrap();
    assert_eq!(check.equations.rhs().len(), 1);
    assert_eq!(check.events.len(), 1);
}

mod registry_props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn failed_update_leaves_registry_untouched(
            existing in proptest::collection::btree_set("[a-e]{1,2}", 1..6),
            batch in proptest::collection::vec("[a-e]{1,2}", 1..6),
        ) {
            let mut reg = VariableRegistry::new();
            let seed: NamedExprs = existing.iter().map(|n| (n.clone(), Expr::one())).collect();
            reg.update(&seed, "seed").unwrap();
            let before: Vec<String> = reg.names().map(str::to_string).collect();

            let update: NamedExprs = batch.iter().map(|n| (n.clone(), Expr::zero())).collect();
            let unique: std::collections::BTreeSet<&String> = batch.iter().collect();
            let clashes = unique.len() < batch.len() || batch.iter().any(|n| existing.contains(n));

            match reg.update(&update, "batch") {
                Ok(()) => {
                    prop_assert!(!clashes);
                    prop_assert_eq!(reg.len(), before.len() + batch.len());
                }
                Err(ModelError::DuplicateVariable { .. }) => {
                    prop_assert!(clashes);
                    let after: Vec<String> = reg.names().map(str::to_string).collect();
                    prop_assert_eq!(after, before);
                }
                Err(other) => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}

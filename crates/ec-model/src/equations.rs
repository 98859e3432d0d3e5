//! The merged equation system and its consistency checks.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ec_core::Side;
use ec_expr::{Expr, ExprError, Variable};

use crate::error::{ModelError, ModelResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Dirichlet,
    Neumann,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryKind::Dirichlet => f.write_str("Dirichlet"),
            BoundaryKind::Neumann => f.write_str("Neumann"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryCondition {
    pub value: Expr,
    pub kind: BoundaryKind,
}

impl BoundaryCondition {
    pub fn dirichlet(value: impl Into<Expr>) -> Self {
        Self {
            value: value.into(),
            kind: BoundaryKind::Dirichlet,
        }
    }

    pub fn neumann(value: impl Into<Expr>) -> Self {
        Self {
            value: value.into(),
            kind: BoundaryKind::Neumann,
        }
    }
}

/// Conditions on each side of one variable's domain.
pub type BoundaryConditions = BTreeMap<Side, BoundaryCondition>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The solver stops when the expression crosses zero.
    Termination,
    /// The solver restarts integration when the expression crosses zero.
    Discontinuity,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub name: String,
    pub expression: Expr,
    pub kind: EventKind,
}

impl Event {
    pub fn termination(name: impl Into<String>, expression: Expr) -> Self {
        Self {
            name: name.into(),
            expression,
            kind: EventKind::Termination,
        }
    }
}

/// rhs, algebraic, initial and boundary conditions, keyed by state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EquationSet {
    rhs: BTreeMap<Variable, Expr>,
    algebraic: BTreeMap<Variable, Expr>,
    initial_conditions: BTreeMap<Variable, Expr>,
    boundary_conditions: BTreeMap<String, BoundaryConditions>,
}

impl EquationSet {
    pub fn rhs(&self) -> &BTreeMap<Variable, Expr> {
        &self.rhs
    }

    pub fn algebraic(&self) -> &BTreeMap<Variable, Expr> {
        &self.algebraic
    }

    pub fn initial_conditions(&self) -> &BTreeMap<Variable, Expr> {
        &self.initial_conditions
    }

    pub fn boundary_conditions(&self) -> &BTreeMap<String, BoundaryConditions> {
        &self.boundary_conditions
    }

    /// Every state with an rhs or algebraic equation.
    pub fn states(&self) -> BTreeSet<&Variable> {
        self.rhs.keys().chain(self.algebraic.keys()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty() && self.algebraic.is_empty()
    }

    pub(crate) fn insert_rhs(&mut self, state: Variable, expr: Expr) -> ModelResult<()> {
        insert_once(&mut self.rhs, state, expr, "has more than one rhs equation")
    }

    pub(crate) fn insert_algebraic(&mut self, state: Variable, expr: Expr) -> ModelResult<()> {
        insert_once(
            &mut self.algebraic,
            state,
            expr,
            "has more than one algebraic equation",
        )
    }

    pub(crate) fn insert_initial_condition(
        &mut self,
        state: Variable,
        expr: Expr,
    ) -> ModelResult<()> {
        insert_once(
            &mut self.initial_conditions,
            state,
            expr,
            "has more than one initial condition",
        )
    }

    pub(crate) fn insert_boundary_conditions(
        &mut self,
        name: String,
        conditions: BoundaryConditions,
    ) -> ModelResult<()> {
        if self.boundary_conditions.contains_key(&name) {
            return Err(ModelError::inconsistent(
                name,
                "has boundary conditions from more than one submodel",
            ));
        }
        self.boundary_conditions.insert(name, conditions);
        Ok(())
    }

    /// Merge a complete equation set (a leading-order sub-build).
    pub(crate) fn absorb(&mut self, other: &EquationSet) -> ModelResult<()> {
        for (state, expr) in &other.rhs {
            self.insert_rhs(state.clone(), expr.clone())?;
        }
        for (state, expr) in &other.algebraic {
            self.insert_algebraic(state.clone(), expr.clone())?;
        }
        for (state, expr) in &other.initial_conditions {
            self.insert_initial_condition(state.clone(), expr.clone())?;
        }
        for (name, bcs) in &other.boundary_conditions {
            self.insert_boundary_conditions(name.clone(), bcs.clone())?;
        }
        Ok(())
    }

    /// Each state has exactly one of rhs/algebraic and exactly one initial
    /// condition, and no initial condition is orphaned.
    pub fn check_exactness(&self) -> ModelResult<()> {
        if let Some(state) = self.rhs.keys().find(|s| self.algebraic.contains_key(*s)) {
            return Err(ModelError::inconsistent(
                state.name(),
                "has both a differential and an algebraic equation",
            ));
        }
        for state in self.rhs.keys().chain(self.algebraic.keys()) {
            if !self.initial_conditions.contains_key(state) {
                return Err(ModelError::inconsistent(
                    state.name(),
                    "has no initial condition",
                ));
            }
        }
        for state in self.initial_conditions.keys() {
            if !self.rhs.contains_key(state) && !self.algebraic.contains_key(state) {
                return Err(ModelError::inconsistent(
                    state.name(),
                    "has an initial condition but no equation",
                ));
            }
        }
        Ok(())
    }

    /// Every state symbol referenced anywhere is solved for.
    pub fn check_closure(&self, events: &[Event]) -> ModelResult<()> {
        let states = self.states();
        let bc_values = self
            .boundary_conditions
            .values()
            .flat_map(|bcs| bcs.values().map(|bc| &bc.value));
        let exprs = self
            .rhs
            .values()
            .chain(self.algebraic.values())
            .chain(self.initial_conditions.values())
            .chain(bc_values)
            .chain(events.iter().map(|e| &e.expression));
        for expr in exprs {
            if let Some(free) = expr.free_variables().into_iter().find(|v| !states.contains(v)) {
                return Err(ModelError::inconsistent(
                    free.name(),
                    "is referenced but not solved for",
                ));
            }
        }
        Ok(())
    }

    /// Every state symbol in `exprs` has an rhs or algebraic equation.
    pub fn check_solved<'a>(&self, exprs: impl IntoIterator<Item = &'a Expr>) -> ModelResult<()> {
        let states = self.states();
        for expr in exprs {
            if let Some(free) = expr.free_variables().into_iter().find(|v| !states.contains(v)) {
                return Err(ModelError::inconsistent(
                    free.name(),
                    "has no rhs or algebraic equation",
                ));
            }
        }
        Ok(())
    }

    /// Every equation is well-formed and lives on its state's domain.
    pub fn check_domains(&self) -> ModelResult<()> {
        let keyed = self
            .rhs
            .iter()
            .chain(self.algebraic.iter())
            .chain(self.initial_conditions.iter());
        for (state, expr) in keyed {
            let domain = expr.domain()?;
            state
                .domain()
                .combine(domain, "equation for a state")
                .map_err(|source| ExprError::Structure {
                    expr: format!("{state} = {expr}"),
                    source,
                })?;
        }
        for bc in self.boundary_conditions.values().flat_map(|bcs| bcs.values()) {
            bc.value.domain()?;
        }
        Ok(())
    }

    pub fn check(&self, events: &[Event]) -> ModelResult<()> {
        self.check_exactness()?;
        self.check_closure(events)?;
        self.check_domains()
    }
}

fn insert_once(
    map: &mut BTreeMap<Variable, Expr>,
    state: Variable,
    expr: Expr,
    reason: &'static str,
) -> ModelResult<()> {
    if map.contains_key(&state) {
        return Err(ModelError::inconsistent(state.name(), reason));
    }
    map.insert(state, expr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::Domain;

    fn state(name: &str) -> Variable {
        Variable::on(name, Domain::CurrentCollector)
    }

    #[test]
    fn state_in_rhs_and_algebraic_is_inconsistent() {
        let mut eqs = EquationSet::default();
        eqs.insert_rhs(state("a"), Expr::zero()).unwrap();
        eqs.insert_algebraic(state("a"), Expr::zero()).unwrap();
        eqs.insert_initial_condition(state("a"), Expr::zero()).unwrap();
        assert!(matches!(
            eqs.check_exactness(),
            Err(ModelError::InconsistentEquationSet { ref state, .. }) if state == "a"
        ));
    }

    #[test]
    fn missing_initial_condition_is_inconsistent() {
        let mut eqs = EquationSet::default();
        eqs.insert_rhs(state("a"), Expr::one()).unwrap();
        let err = eqs.check_exactness().unwrap_err();
        assert!(err.to_string().contains("no initial condition"));
    }

    #[test]
    fn second_rhs_is_rejected() {
        let mut eqs = EquationSet::default();
        eqs.insert_rhs(state("a"), Expr::one()).unwrap();
        assert!(eqs.insert_rhs(state("a"), Expr::zero()).is_err());
    }

    #[test]
    fn unsolved_reference_breaks_closure() {
        let mut eqs = EquationSet::default();
        eqs.insert_rhs(state("a"), Expr::from(state("b"))).unwrap();
        eqs.insert_initial_condition(state("a"), Expr::zero()).unwrap();
        eqs.check_exactness().unwrap();
        let err = eqs.check_closure(&[]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InconsistentEquationSet { ref state, .. } if state == "b"
        ));
    }

    #[test]
    fn rhs_on_the_wrong_domain_is_a_structural_error() {
        let mut eqs = EquationSet::default();
        let n = Expr::from(Variable::on("c", Domain::NegativeElectrode));
        eqs.insert_rhs(state("a"), n).unwrap();
        assert!(matches!(eqs.check_domains(), Err(ModelError::Expression(_))));
    }
}

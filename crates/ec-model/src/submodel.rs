//! The submodel contract.

use std::collections::BTreeMap;

use ec_expr::Expr;

use crate::equations::{BoundaryConditions, Event};
use crate::error::ModelResult;
use crate::registry::RegistryView;

/// Named expressions contributed by one phase of one submodel, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamedExprs(Vec<(String, Expr)>);

impl NamedExprs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, expr: impl Into<Expr>) {
        self.0.push((name.into(), expr.into()));
    }

    pub fn with(mut self, name: impl Into<String>, expr: impl Into<Expr>) -> Self {
        self.insert(name, expr);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.0.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: NamedExprs) {
        self.0.extend(other.0);
    }
}

impl FromIterator<(String, Expr)> for NamedExprs {
    fn from_iter<I: IntoIterator<Item = (String, Expr)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for NamedExprs {
    type Item = (String, Expr);
    type IntoIter = std::vec::IntoIter<(String, Expr)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// One interchangeable piece of physics.
///
/// A submodel owns no registry. Every phase receives a read-only view of the
/// registry as it stands and returns its contribution; the assembler merges
/// contributions. Equation keys (rhs, algebraic, initial conditions) are
/// registry names whose entries must be bare state variables.
///
/// The coupled phase runs in dependency order: a submodel lists the names it
/// reads in that phase ([`coupled_inputs`](Submodel::coupled_inputs)) and the
/// names it declares ([`coupled_outputs`](Submodel::coupled_outputs)). Names
/// available after the fundamental phase need not be listed.
pub trait Submodel: Send + Sync {
    /// Identity used as the owner of declared variables and in errors.
    fn name(&self) -> &str;

    fn coupled_inputs(&self) -> Vec<String> {
        Vec::new()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        Vec::new()
    }

    /// The submodel's own unknowns, with no dependency on other submodels.
    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new())
    }

    /// Quantities derived from variables of this and other submodels.
    fn coupled_variables(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new())
    }

    fn set_rhs(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new())
    }

    fn set_algebraic(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new())
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new())
    }

    /// Boundary conditions keyed by registry name.
    fn set_boundary_conditions(
        &self,
        _vars: &RegistryView<'_>,
    ) -> ModelResult<BTreeMap<String, BoundaryConditions>> {
        Ok(BTreeMap::new())
    }

    fn set_events(&self, _vars: &RegistryView<'_>) -> ModelResult<Vec<Event>> {
        Ok(Vec::new())
    }
}

/// Convenience for building `coupled_inputs`/`coupled_outputs` lists.
pub fn names<const N: usize>(names: [&str; N]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

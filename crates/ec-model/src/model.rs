//! The finished, immutable model.

use std::fmt;

use ec_expr::{Expr, Variable};

use crate::equations::{EquationSet, Event};
use crate::registry::VariableRegistry;

/// Which class of solver the model needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolverHint {
    /// Pure ODE system: any ODE integrator will do.
    Ode,
    /// Algebraic constraints present: needs a DAE-capable solver.
    Dae,
}

impl SolverHint {
    pub fn is_dae(self) -> bool {
        matches!(self, SolverHint::Dae)
    }
}

impl fmt::Display for SolverHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverHint::Ode => f.write_str("ODE"),
            SolverHint::Dae => f.write_str("DAE"),
        }
    }
}

/// Registry, equation set, events and solver hint of one build.
#[derive(Clone, Debug)]
pub struct AssembledModel {
    pub(crate) name: String,
    pub(crate) variables: VariableRegistry,
    pub(crate) equations: EquationSet,
    pub(crate) events: Vec<Event>,
    pub(crate) solver_hint: SolverHint,
    pub(crate) submodels: Vec<String>,
}

impl AssembledModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Expr> {
        self.variables.get(name)
    }

    pub fn equations(&self) -> &EquationSet {
        &self.equations
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn solver_hint(&self) -> SolverHint {
        self.solver_hint
    }

    /// Submodel names in insertion order.
    pub fn submodels(&self) -> &[String] {
        &self.submodels
    }

    /// The state behind registry entry `name`, if that entry is a bare state.
    pub fn state(&self, name: &str) -> Option<&Variable> {
        let var = self.variables.get(name)?.as_variable()?;
        self.equations.states().contains(var).then_some(var)
    }
}

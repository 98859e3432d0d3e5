//! Standard checks for a single submodel, for use in tests.
//!
//! [`check_submodel`] runs every phase of one submodel against a seed
//! registry standing in for the rest of the model, and checks the phase
//! contract: no name collisions, promised coupled outputs are declared,
//! equations are keyed by the submodel's own states, every such state has
//! exactly one equation and one initial condition, and everything declared
//! is structurally valid.

use std::collections::BTreeSet;

use ec_expr::Variable;

use crate::assembler::{check_promised_outputs, contribute};
use crate::equations::{EquationSet, Event};
use crate::error::{ModelError, ModelResult};
use crate::registry::VariableRegistry;
use crate::submodel::Submodel;

/// Everything one submodel contributed.
#[derive(Clone, Debug)]
pub struct SubmodelCheck {
    pub registry: VariableRegistry,
    pub equations: EquationSet,
    pub events: Vec<Event>,
}

pub fn check_submodel(
    submodel: &dyn Submodel,
    seed: &VariableRegistry,
) -> ModelResult<SubmodelCheck> {
    let name = submodel.name();
    let mut registry = seed.clone();

    let fundamental = submodel.fundamental_variables()?;
    let own_states: BTreeSet<Variable> = fundamental
        .iter()
        .flat_map(|(_, expr)| expr.free_variables())
        .collect();
    registry.update(&fundamental, name)?;

    let coupled = submodel.coupled_variables(&registry.view(name))?;
    check_promised_outputs(submodel, &coupled)?;
    registry.update(&coupled, name)?;

    for (_, expr) in registry.owned_by(name) {
        expr.domain()?;
    }

    let mut equations = EquationSet::default();
    let mut events = Vec::new();
    contribute(submodel, &registry, &mut equations, &mut events)?;

    if let Some(foreign) = equations
        .states()
        .into_iter()
        .find(|s| !own_states.contains(*s))
    {
        return Err(ModelError::inconsistent(
            foreign.name(),
            format!("is keyed by '{name}' but declared by another submodel"),
        ));
    }
    equations.check_exactness()?;
    equations.check_domains()?;

    Ok(SubmodelCheck {
        registry,
        equations,
        events,
    })
}

//! Serializable overview of an assembled model.

use ec_model::AssembledModel;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub submodels: Vec<String>,
    pub variables: usize,
    /// Differential states, by name.
    pub states: Vec<String>,
    /// Algebraic states, by name.
    pub algebraic: Vec<String>,
    pub events: Vec<String>,
    pub solver: String,
}

impl ModelSummary {
    pub fn of(model: &AssembledModel) -> Self {
        let equations = model.equations();
        Self {
            name: model.name().to_string(),
            submodels: model.submodels().to_vec(),
            variables: model.variables().len(),
            states: equations.rhs().keys().map(|s| s.name().to_string()).collect(),
            algebraic: equations
                .algebraic()
                .keys()
                .map(|s| s.name().to_string())
                .collect(),
            events: model.events().iter().map(|e| e.name.clone()).collect(),
            solver: model.solver_hint().to_string(),
        }
    }
}

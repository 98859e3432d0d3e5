//! Embedding a finished leading-order model in a higher-order build.

use crate::equations::{EquationSet, Event};
use crate::error::{ModelError, ModelResult};
use crate::model::AssembledModel;
use crate::submodel::NamedExprs;

/// Read-only slice of a leading-order model, renamed for the outer build.
///
/// Every variable `V` of the inner model is re-exported as
/// `"Leading-order " + lowercase(V)` with the inner expression unchanged.
/// The inner equations and events travel with it, so the outer system stays
/// closed over the inner states.
#[derive(Clone, Debug)]
pub struct LeadingOrderImport {
    variables: NamedExprs,
    equations: EquationSet,
    events: Vec<Event>,
}

impl LeadingOrderImport {
    /// Owner recorded in the outer registry for imported names.
    pub const OWNER: &'static str = "leading-order model";
    /// Inner state whose rate of change is exported.
    pub const CONCENTRATION: &'static str = "X-averaged electrolyte concentration";
    pub const CONCENTRATION_CHANGE: &'static str =
        "Leading-order electrolyte concentration change";

    pub fn leading_order_name(name: &str) -> String {
        format!("Leading-order {}", name.to_lowercase())
    }

    pub fn from_model(model: &AssembledModel) -> ModelResult<Self> {
        let mut variables: NamedExprs = model
            .variables()
            .iter()
            .map(|(name, expr)| (Self::leading_order_name(name), expr.clone()))
            .collect();

        let state = model
            .variables()
            .lookup(Self::CONCENTRATION, Self::OWNER)?
            .as_variable()
            .ok_or_else(|| ModelError::NotAState {
                name: Self::CONCENTRATION.to_string(),
                requested_by: Self::OWNER.to_string(),
            })?;
        let change = model.equations().rhs().get(state).ok_or_else(|| {
            ModelError::inconsistent(
                Self::CONCENTRATION,
                "has no rhs equation in the leading-order model",
            )
        })?;
        variables.insert(Self::CONCENTRATION_CHANGE, change.clone());

        Ok(Self {
            variables,
            equations: model.equations().clone(),
            events: model.events().to_vec(),
        })
    }

    pub fn variables(&self) -> &NamedExprs {
        &self.variables
    }

    pub fn equations(&self) -> &EquationSet {
        &self.equations
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_prefixed_and_lowercased() {
        assert_eq!(
            LeadingOrderImport::leading_order_name("X-averaged negative electrode porosity"),
            "Leading-order x-averaged negative electrode porosity"
        );
        assert_eq!(
            LeadingOrderImport::leading_order_name("Terminal voltage"),
            "Leading-order terminal voltage"
        );
    }
}

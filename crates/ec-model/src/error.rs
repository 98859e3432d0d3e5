//! Build-time errors.

use ec_expr::ExprError;
use ec_options::OptionError;

/// Every way a model build can fail. All are fatal to the build.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Invalid option: {0}")]
    InvalidOption(#[from] OptionError),

    #[error("Duplicate variable '{name}': declared by '{first}' and again by '{second}'")]
    DuplicateVariable {
        name: String,
        first: String,
        second: String,
    },

    #[error("Unknown variable '{name}' requested by '{requested_by}'")]
    UnknownVariable { name: String, requested_by: String },

    #[error("Inconsistent equation set at '{state}': {reason}")]
    InconsistentEquationSet { state: String, reason: String },

    #[error("'{name}' is not a state variable but '{requested_by}' keys an equation by it")]
    NotAState { name: String, requested_by: String },

    #[error("Dependency cycle between submodels: {}", submodels.join(", "))]
    DependencyCycle { submodels: Vec<String> },

    #[error("Expression error: {0}")]
    Expression(#[from] ExprError),
}

pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    pub(crate) fn inconsistent(state: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::InconsistentEquationSet {
            state: state.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_both_owners() {
        let err = ModelError::DuplicateVariable {
            name: "Terminal voltage".into(),
            first: "current collector".into(),
            second: "positive electrode".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("current collector"));
        assert!(msg.contains("positive electrode"));
    }

    #[test]
    fn option_errors_convert() {
        let err: ModelError = OptionError::UnknownOption { key: "x".into() }.into();
        assert!(matches!(err, ModelError::InvalidOption(_)));
    }
}

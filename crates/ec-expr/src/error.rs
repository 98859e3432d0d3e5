//! Expression-layer error types.

use ec_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Two sub-expressions live on incompatible domains.
    #[error("Structural error in `{expr}`: {source}")]
    Structure {
        expr: String,
        #[source]
        source: CoreError,
    },

    #[error("Cannot differentiate {what}")]
    NotDifferentiable { what: &'static str },
}

pub type ExprResult<T> = Result<T, ExprError>;

use thiserror::Error;

use crate::domain::{Domain, DomainSpec};

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Domain mismatch in {context}: {left} vs {right}")]
    DomainMismatch {
        context: &'static str,
        left: DomainSpec,
        right: DomainSpec,
    },

    #[error("Cannot {operation} an expression defined on {domain}")]
    InvalidDomainOperation {
        operation: &'static str,
        domain: DomainSpec,
    },

    #[error("Concatenation expects {expected} in position {index}, found {found}")]
    ConcatenationOrder {
        index: usize,
        expected: Domain,
        found: DomainSpec,
    },
}

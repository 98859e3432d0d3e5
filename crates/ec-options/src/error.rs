//! Option errors.

use crate::validate::ModelFamily;

/// An illegal or unsupported option, detected before any submodel runs.
#[derive(thiserror::Error, Debug)]
pub enum OptionError {
    #[error("Unknown option: '{key}'")]
    UnknownOption { key: String },

    #[error("Invalid value for option '{option}': {value} (expected one of: {expected})")]
    InvalidValue {
        option: &'static str,
        value: String,
        expected: String,
    },

    #[error("Incompatible options: {reason}")]
    Incompatible { reason: String },

    #[error("Option not supported by the {family} family: {reason}")]
    UnsupportedByFamily {
        family: ModelFamily,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type OptionResult<T> = Result<T, OptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_option() {
        let err = OptionError::InvalidValue {
            option: "dimensionality",
            value: "3".into(),
            expected: "0, 1, 2".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dimensionality"));
        assert!(msg.contains("3"));
    }
}

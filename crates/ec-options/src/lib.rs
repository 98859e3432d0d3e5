//! ec-options: model options, their defaults and legality rules.
//!
//! Options arrive as a string-keyed map ([`RawOptions`], usually from YAML)
//! and are resolved once into an immutable, validated [`Options`] value.

pub mod error;
pub mod raw;
pub mod schema;
pub mod validate;

pub use error::{OptionError, OptionResult};
pub use raw::{OptionValue, RawOptions};
pub use schema::*;
pub use validate::ModelFamily;

/// Read a YAML options file and resolve it.
pub fn load_yaml(path: &std::path::Path) -> OptionResult<Options> {
    let content = std::fs::read_to_string(path)?;
    let raw: RawOptions = serde_yaml::from_str(&content)?;
    Options::resolve(&raw)
}

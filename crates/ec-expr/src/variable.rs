//! State symbols.

use core::fmt;

use ec_core::{Domain, DomainSpec};

/// A genuine unknown of the model: a named symbol on a domain.
///
/// Variables are the keys of the equation set. Two variables are the same
/// state only when both the name and the domain agree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: String,
    domain: DomainSpec,
}

impl Variable {
    pub fn new(name: impl Into<String>, domain: DomainSpec) -> Self {
        Self {
            name: name.into(),
            domain,
        }
    }

    /// Spatially uniform variable.
    pub fn uniform(name: impl Into<String>) -> Self {
        Self::new(name, DomainSpec::uniform())
    }

    pub fn on(name: impl Into<String>, domain: Domain) -> Self {
        Self::new(name, DomainSpec::on(domain))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> DomainSpec {
        self.domain
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

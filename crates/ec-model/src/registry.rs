//! Name-keyed variable registry shared by all submodels of one build.

use std::collections::{HashMap, HashSet};

use ec_expr::Expr;

use crate::error::{ModelError, ModelResult};
use crate::submodel::NamedExprs;

#[derive(Clone, Debug)]
struct Entry {
    name: String,
    expr: Expr,
    owner: String,
}

/// Mapping from variable name to its defining expression.
///
/// Names are written once; a second declaration of the same name is a
/// [`ModelError::DuplicateVariable`]. Iteration follows declaration order.
#[derive(Clone, Debug, Default)]
pub struct VariableRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.index.get(name).map(|&i| &self.entries[i].expr)
    }

    /// Submodel (or import) that declared `name`.
    pub fn owner(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.entries[i].owner.as_str())
    }

    pub fn declare(
        &mut self,
        name: impl Into<String>,
        expr: Expr,
        owner: impl Into<String>,
    ) -> ModelResult<()> {
        let name = name.into();
        let owner = owner.into();
        if let Some(first) = self.owner(&name) {
            return Err(ModelError::DuplicateVariable {
                name,
                first: first.to_string(),
                second: owner,
            });
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(Entry { name, expr, owner });
        Ok(())
    }

    /// Fail-fast lookup on behalf of `requested_by`.
    pub fn lookup(&self, name: &str, requested_by: &str) -> ModelResult<&Expr> {
        self.get(name).ok_or_else(|| ModelError::UnknownVariable {
            name: name.to_string(),
            requested_by: requested_by.to_string(),
        })
    }

    /// Declare every entry of `declarations`, or none of them.
    ///
    /// Collisions with existing names, or within `declarations` itself, leave
    /// the registry exactly as it was.
    pub fn update(&mut self, declarations: &NamedExprs, owner: &str) -> ModelResult<()> {
        let mut seen = HashSet::with_capacity(declarations.len());
        for (name, _) in declarations.iter() {
            if let Some(first) = self.owner(name) {
                return Err(ModelError::DuplicateVariable {
                    name: name.to_string(),
                    first: first.to_string(),
                    second: owner.to_string(),
                });
            }
            if !seen.insert(name) {
                return Err(ModelError::DuplicateVariable {
                    name: name.to_string(),
                    first: owner.to_string(),
                    second: owner.to_string(),
                });
            }
        }
        for (name, expr) in declarations.iter() {
            self.index.insert(name.to_string(), self.entries.len());
            self.entries.push(Entry {
                name: name.to_string(),
                expr: expr.clone(),
                owner: owner.to_string(),
            });
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.expr))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Entries declared by `owner`, in declaration order.
    pub fn owned_by<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = (&'a str, &'a Expr)> {
        self.entries
            .iter()
            .filter(move |e| e.owner == owner)
            .map(|e| (e.name.as_str(), &e.expr))
    }

    /// Read-only view handed to a submodel phase.
    pub fn view<'a>(&'a self, requester: &'a str) -> RegistryView<'a> {
        RegistryView {
            registry: self,
            requester,
        }
    }
}

/// The registry as seen by one submodel: lookups fail with an
/// [`ModelError::UnknownVariable`] naming that submodel.
#[derive(Clone, Copy, Debug)]
pub struct RegistryView<'a> {
    registry: &'a VariableRegistry,
    requester: &'a str,
}

impl<'a> RegistryView<'a> {
    pub fn get(&self, name: &str) -> ModelResult<Expr> {
        self.registry.lookup(name, self.requester).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn requester(&self) -> &'a str {
        self.requester
    }

    pub fn registry(&self) -> &'a VariableRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(pairs: &[(&str, f64)]) -> NamedExprs {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), Expr::scalar(*v)))
            .collect()
    }

    #[test]
    fn declare_then_lookup() {
        let mut reg = VariableRegistry::new();
        reg.declare("Terminal voltage", Expr::scalar(3.7), "current collector")
            .unwrap();
        assert_eq!(
            reg.lookup("Terminal voltage", "test").unwrap().as_scalar(),
            Some(3.7)
        );
        assert_eq!(reg.owner("Terminal voltage"), Some("current collector"));
    }

    #[test]
    fn lookup_of_missing_name_names_requester() {
        let reg = VariableRegistry::new();
        let err = reg.view("sei").get("Negative electrode potential").unwrap_err();
        match err {
            ModelError::UnknownVariable { name, requested_by } => {
                assert_eq!(name, "Negative electrode potential");
                assert_eq!(requested_by, "sei");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn update_is_transactional() {
        let mut reg = VariableRegistry::new();
        reg.update(&named(&[("a", 1.0)]), "first").unwrap();
        let err = reg
            .update(&named(&[("b", 2.0), ("a", 3.0)]), "second")
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::DuplicateVariable { ref first, ref second, .. }
                if first == "first" && second == "second"
        ));
        assert_eq!(reg.len(), 1);
        assert!(!reg.contains("b"));
    }

    #[test]
    fn duplicate_within_one_update_is_rejected() {
        let mut reg = VariableRegistry::new();
        assert!(reg.update(&named(&[("a", 1.0), ("a", 2.0)]), "x").is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let mut reg = VariableRegistry::new();
        reg.update(&named(&[("z", 1.0), ("a", 2.0)]), "x").unwrap();
        reg.declare("m", Expr::zero(), "y").unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(reg.owned_by("x").count(), 2);
    }
}

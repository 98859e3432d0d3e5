//! Tree traversal: variable queries and substitution.

use std::collections::{BTreeMap, BTreeSet};

use crate::expr::{Expr, Node};
use crate::variable::Variable;

impl Expr {
    /// Direct children, in evaluation order.
    pub fn children(&self) -> Vec<&Expr> {
        match self.node() {
            Node::Scalar(_)
            | Node::Variable(_)
            | Node::Parameter(_)
            | Node::Time
            | Node::SpatialVariable(_) => Vec::new(),
            Node::Function { args, .. } => args.iter().collect(),
            Node::Concatenation(parts) => parts.iter().collect(),
            Node::Unary(_, c)
            | Node::Spatial(_, c)
            | Node::XAverage(c)
            | Node::Minimum(c)
            | Node::Broadcast { child: c, .. }
            | Node::BoundaryValue { child: c, .. } => vec![c],
            Node::Binary(_, a, b) => vec![a, b],
        }
    }

    pub fn depends_on(&self, variable: &Variable) -> bool {
        match self.node() {
            Node::Variable(v) => v == variable,
            _ => self.children().into_iter().any(|c| c.depends_on(variable)),
        }
    }

    /// Every state symbol referenced anywhere in the tree.
    pub fn free_variables(&self) -> BTreeSet<Variable> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<Variable>) {
        if let Node::Variable(v) = self.node() {
            out.insert(v.clone());
            return;
        }
        for child in self.children() {
            child.collect_variables(out);
        }
    }

    /// Replace state symbols according to `map`.
    ///
    /// Subtrees that contain none of the mapped symbols are shared with the
    /// original tree rather than copied.
    pub fn substitute(&self, map: &BTreeMap<Variable, Expr>) -> Expr {
        if map.is_empty() {
            return self.clone();
        }
        self.rebuild(&|node: &Node| match node {
            Node::Variable(v) => map.get(v).cloned(),
            _ => None,
        })
    }

    pub fn substitute_one(&self, variable: &Variable, replacement: &Expr) -> Expr {
        let map = BTreeMap::from([(variable.clone(), replacement.clone())]);
        self.substitute(&map)
    }

    /// Rename state symbols through `rename`; symbols it maps to `None` are
    /// left as they are. Domains are preserved.
    pub fn rename_variables(&self, rename: &dyn Fn(&str) -> Option<String>) -> Expr {
        self.rebuild(&|node: &Node| match node {
            Node::Variable(v) => {
                rename(v.name()).map(|name| Expr::from(Variable::new(name, v.domain())))
            }
            _ => None,
        })
    }

    /// Post-order rewrite: `leaf` may replace any node outright; otherwise the
    /// node is rebuilt from its rewritten children through the folding
    /// constructors.
    fn rebuild(&self, leaf: &dyn Fn(&Node) -> Option<Expr>) -> Expr {
        if let Some(replacement) = leaf(self.node()) {
            return replacement;
        }
        let children = self.children();
        if children.is_empty() {
            return self.clone();
        }
        let rebuilt: Vec<Expr> = children.iter().map(|c| c.rebuild(leaf)).collect();
        if rebuilt.iter().zip(&children).all(|(new, old)| new == *old) {
            return self.clone();
        }

        let mut it = rebuilt.into_iter();
        let mut next = || it.next().unwrap_or_else(Expr::zero);
        match self.node() {
            Node::Function { name, args } => {
                Expr::function(name.clone(), (0..args.len()).map(|_| next()).collect())
            }
            Node::Concatenation(parts) => {
                Expr::concatenate((0..parts.len()).map(|_| next()).collect())
            }
            Node::Unary(op, _) => Expr::unary(*op, next()),
            Node::Binary(op, _, _) => {
                let a = next();
                let b = next();
                Expr::binary(*op, a, b)
            }
            Node::Spatial(op, _) => Expr::from_node(Node::Spatial(*op, next())),
            Node::Broadcast { domain, .. } => next().broadcast(*domain),
            Node::XAverage(_) => next().x_average(),
            Node::BoundaryValue { side, .. } => next().boundary_value(*side),
            Node::Minimum(_) => next().minimum(),
            Node::Scalar(_)
            | Node::Variable(_)
            | Node::Parameter(_)
            | Node::Time
            | Node::SpatialVariable(_) => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::Domain;

    #[test]
    fn free_variables_are_collected_once() {
        let a = Variable::on("a", Domain::NegativeElectrode);
        let b = Variable::uniform("b");
        let e = Expr::from(&a) * Expr::from(&b) + Expr::from(&a).exp();
        let vars = e.free_variables();
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&a) && vars.contains(&b));
    }

    #[test]
    fn substitution_replaces_and_folds() {
        let a = Variable::uniform("a");
        let e = Expr::from(&a) * 3.0 + 1.0;
        let out = e.substitute_one(&a, &Expr::scalar(2.0));
        assert_eq!(out.as_scalar(), Some(7.0));
    }

    #[test]
    fn substitution_shares_untouched_subtrees() {
        let a = Variable::uniform("a");
        let untouched = Expr::parameter("k").sinh();
        let e = &untouched + Expr::from(&a);
        let out = e.substitute_one(&a, &Expr::parameter("z"));
        match out.node() {
            Node::Binary(_, left, _) => assert_eq!(left, &untouched),
            other => panic!("unexpected {other:?}"),
        }
        // original untouched
        assert!(e.depends_on(&a));
    }

    #[test]
    fn rename_keeps_domains() {
        let a = Variable::on("Porosity", Domain::Separator);
        let e = Expr::from(&a).exp();
        let renamed = e.rename_variables(&|name: &str| Some(format!("Old {name}")));
        let vars = renamed.free_variables();
        let only = vars.iter().next().unwrap();
        assert_eq!(only.name(), "Old Porosity");
        assert_eq!(only.domain(), a.domain());
    }
}

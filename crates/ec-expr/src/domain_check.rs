//! Structural validation: which domain does an expression live on?

use ec_core::{CoreError, DomainSpec, ensure_finite};

use crate::error::{ExprError, ExprResult};
use crate::expr::{Expr, Node};

impl Expr {
    /// Domain of the expression, or the first structural error found.
    ///
    /// Binary operators and parameter functions require compatible domains;
    /// broadcasts, x-averages, boundary values and concatenations change the
    /// domain according to the rules on [`DomainSpec`]. Scalars must be finite.
    pub fn domain(&self) -> ExprResult<DomainSpec> {
        self.domain_inner().map_err(|source| ExprError::Structure {
            expr: self.to_string(),
            source,
        })
    }

    fn domain_inner(&self) -> Result<DomainSpec, CoreError> {
        match self.node() {
            Node::Scalar(v) => {
                ensure_finite(*v, "scalar")?;
                Ok(DomainSpec::uniform())
            }
            Node::Parameter(_) | Node::Time => Ok(DomainSpec::uniform()),
            Node::Variable(v) => Ok(v.domain()),
            Node::SpatialVariable(d) => Ok(DomainSpec::on(*d)),
            Node::Function { args, .. } => args.iter().try_fold(DomainSpec::uniform(), |acc, a| {
                acc.combine(a.domain_inner()?, "parameter function")
            }),
            Node::Unary(_, c) | Node::Spatial(_, c) => c.domain_inner(),
            Node::Binary(op, a, b) => a.domain_inner()?.combine(b.domain_inner()?, op.context()),
            Node::Broadcast { child, domain } => child.domain_inner()?.broadcast_to(*domain),
            Node::XAverage(c) => c.domain_inner()?.x_averaged(),
            Node::BoundaryValue { child, .. } => child.domain_inner()?.at_boundary(),
            Node::Concatenation(parts) => {
                let specs = parts
                    .iter()
                    .map(Expr::domain_inner)
                    .collect::<Result<Vec<_>, _>>()?;
                DomainSpec::concatenate(&specs)
            }
            Node::Minimum(c) => {
                c.domain_inner()?;
                Ok(DomainSpec::uniform())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;
    use ec_core::Domain;

    #[test]
    fn mismatched_domains_are_structural_errors() {
        let n = Expr::from(Variable::on("a", Domain::NegativeElectrode));
        let p = Expr::from(Variable::on("b", Domain::PositiveElectrode));
        let err = (n + p).domain().unwrap_err();
        assert!(matches!(
            err,
            ExprError::Structure {
                source: CoreError::DomainMismatch { context: "addition", .. },
                ..
            }
        ));
    }

    #[test]
    fn averaging_bridges_domains() {
        let n = Expr::from(Variable::on("a", Domain::NegativeElectrode));
        let cc = Expr::from(Variable::on("b", Domain::CurrentCollector));
        let e = n + cc.broadcast(Domain::NegativeElectrode);
        assert_eq!(
            e.domain().unwrap(),
            DomainSpec::with_secondary(Domain::NegativeElectrode, Domain::CurrentCollector)
        );
        assert_eq!(
            e.x_average().domain().unwrap(),
            DomainSpec::on(Domain::CurrentCollector)
        );
    }

    #[test]
    fn nan_scalar_is_rejected() {
        assert!(Expr::scalar(f64::NAN).domain().is_err());
    }
}

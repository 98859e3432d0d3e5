//! Symbolic differentiation.

use crate::error::{ExprError, ExprResult};
use crate::expr::{BinaryOp, Expr, Node, SpatialOp, UnaryOp};
use crate::variable::Variable;

impl Expr {
    /// Partial derivative with respect to the state `wrt`.
    ///
    /// Broadcasts, x-averages, boundary values, concatenations and the linear
    /// spatial operators commute with differentiation. The derivative of a
    /// parameter function `f` in its `i`-th argument is the function `f'`
    /// (or `f'i` for functions of several arguments).
    pub fn diff(&self, wrt: &Variable) -> ExprResult<Expr> {
        if !self.depends_on(wrt) {
            return Ok(Expr::zero());
        }
        let d = match self.node() {
            Node::Scalar(_) | Node::Parameter(_) | Node::Time | Node::SpatialVariable(_) => {
                Expr::zero()
            }
            Node::Variable(v) => {
                if v == wrt {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Node::Function { name, args } => {
                let mut total = Expr::zero();
                for (i, arg) in args.iter().enumerate() {
                    let d_arg = arg.diff(wrt)?;
                    if d_arg.is_zero() {
                        continue;
                    }
                    let outer = Expr::function(derivative_name(name, i, args.len()), args.clone());
                    total = total + outer * d_arg;
                }
                total
            }
            Node::Unary(op, child) => {
                let dc = child.diff(wrt)?;
                match op {
                    UnaryOp::Neg => -dc,
                    UnaryOp::Exp => self * dc,
                    UnaryOp::Log => dc / child,
                    UnaryOp::Sinh => child.cosh() * dc,
                    UnaryOp::Cosh => child.sinh() * dc,
                    UnaryOp::Arcsinh => dc / (child.pow(2.0) + 1.0).sqrt(),
                    UnaryOp::Sqrt => dc / (2.0 * self),
                    UnaryOp::Abs => child / self * dc,
                }
            }
            Node::Binary(op, a, b) => {
                let da = a.diff(wrt)?;
                let db = b.diff(wrt)?;
                match op {
                    BinaryOp::Add => da + db,
                    BinaryOp::Sub => da - db,
                    BinaryOp::Mul => da * b + a * db,
                    BinaryOp::Div => (da * b - a * db) / b.pow(2.0),
                    BinaryOp::Pow if db.is_zero() => b * a.pow(b - 1.0) * da,
                    BinaryOp::Pow => self * (db * a.log() + b * da / a),
                }
            }
            Node::Spatial(op, child) => {
                let dc = child.diff(wrt)?;
                match op {
                    SpatialOp::Grad => dc.gradient(),
                    SpatialOp::Div => dc.divergence(),
                }
            }
            Node::Broadcast { child, domain } => child.diff(wrt)?.broadcast(*domain),
            Node::XAverage(child) => child.diff(wrt)?.x_average(),
            Node::BoundaryValue { child, side } => child.diff(wrt)?.boundary_value(*side),
            Node::Concatenation(parts) => {
                let parts = parts
                    .iter()
                    .map(|p| p.diff(wrt))
                    .collect::<ExprResult<Vec<_>>>()?;
                Expr::concatenate(parts)
            }
            Node::Minimum(_) => {
                return Err(ExprError::NotDifferentiable {
                    what: "a minimum reduction of a state-dependent expression",
                });
            }
        };
        Ok(d)
    }
}

fn derivative_name(name: &str, index: usize, arity: usize) -> String {
    if arity == 1 {
        format!("{name}'")
    } else {
        format!("{name}'{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::Domain;

    fn c() -> Variable {
        Variable::on("c", Domain::NegativeElectrode)
    }

    #[test]
    fn derivative_of_self_is_one() {
        assert_eq!(Expr::from(c()).diff(&c()).unwrap(), Expr::one());
    }

    #[test]
    fn independent_expression_has_zero_derivative() {
        let e = Expr::parameter("k").exp() * Expr::time();
        assert!(e.diff(&c()).unwrap().is_zero());
    }

    #[test]
    fn product_rule() {
        let x = Expr::from(c());
        let k = Expr::parameter("k");
        let e = &k * &x;
        assert_eq!(e.diff(&c()).unwrap(), k);
    }

    #[test]
    fn chain_rule_through_sinh() {
        let x = Expr::from(c());
        let e = (2.0 * &x).sinh();
        let expected = (2.0 * &x).cosh() * 2.0;
        assert_eq!(e.diff(&c()).unwrap(), expected);
    }

    #[test]
    fn parameter_function_gets_primed_name() {
        let x = Expr::from(c());
        let ocp = Expr::function("OCP", vec![x.clone()]);
        let d = ocp.diff(&c()).unwrap();
        match d.node() {
            Node::Function { name, args } => {
                assert_eq!(name, "OCP'");
                assert_eq!(args, &vec![x]);
            }
            other => panic!("unexpected derivative {other:?}"),
        }
    }

    #[test]
    fn broadcast_commutes_with_diff() {
        let v = Variable::on("L", Domain::CurrentCollector);
        let e = Expr::from(&v).pow(2.0).broadcast(Domain::NegativeElectrode);
        let d = e.diff(&v).unwrap();
        assert_eq!(d, (2.0 * Expr::from(&v)).broadcast(Domain::NegativeElectrode));
    }

    #[test]
    fn minimum_of_state_is_not_differentiable() {
        let e = Expr::from(c()).minimum();
        assert!(e.diff(&c()).is_err());
        assert!(Expr::parameter("k").minimum().diff(&c()).unwrap().is_zero());
    }
}

//! Infix rendering for logs and the CLI.

use core::fmt;

use crate::expr::{Expr, Node, SpatialOp, UnaryOp};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Scalar(v) => write!(f, "{v}"),
            Node::Variable(v) => write!(f, "{v}"),
            Node::Parameter(name) => f.write_str(name),
            Node::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
            Node::Time => f.write_str("t"),
            Node::SpatialVariable(d) => write!(f, "x[{d}]"),
            Node::Unary(UnaryOp::Neg, c) => write!(f, "-{c}"),
            Node::Unary(op, c) => write!(f, "{}({c})", op.name()),
            Node::Binary(op, a, b) => write!(f, "({a} {} {b})", op.symbol()),
            Node::Spatial(SpatialOp::Grad, c) => write!(f, "grad({c})"),
            Node::Spatial(SpatialOp::Div, c) => write!(f, "div({c})"),
            Node::Broadcast { child, domain } => write!(f, "broadcast({child} -> {domain})"),
            Node::XAverage(c) => write!(f, "x-average({c})"),
            Node::BoundaryValue { child, side } => write!(f, "boundary value({child}, {side})"),
            Node::Concatenation(parts) => {
                f.write_str("concatenation(")?;
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
            Node::Minimum(c) => write!(f, "min({c})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::Expr;

    #[test]
    fn renders_infix() {
        let e = Expr::parameter("k") * Expr::time().exp();
        assert_eq!(e.to_string(), "(k * exp(t))");
    }
}

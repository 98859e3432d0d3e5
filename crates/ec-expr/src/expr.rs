//! Expression nodes and smart constructors.

use std::sync::Arc;

use ec_core::{Domain, DomainSpec, Side};

use crate::variable::Variable;

/// Elementary functions of one argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Exp,
    Log,
    Sinh,
    Cosh,
    Arcsinh,
    Sqrt,
    Abs,
}

impl UnaryOp {
    pub(crate) fn apply(self, v: f64) -> f64 {
        match self {
            UnaryOp::Neg => -v,
            UnaryOp::Exp => v.exp(),
            UnaryOp::Log => v.ln(),
            UnaryOp::Sinh => v.sinh(),
            UnaryOp::Cosh => v.cosh(),
            UnaryOp::Arcsinh => v.asinh(),
            UnaryOp::Sqrt => v.sqrt(),
            UnaryOp::Abs => v.abs(),
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Arcsinh => "arcsinh",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Abs => "abs",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub(crate) fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
        }
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    pub(crate) fn context(self) -> &'static str {
        match self {
            BinaryOp::Add => "addition",
            BinaryOp::Sub => "subtraction",
            BinaryOp::Mul => "multiplication",
            BinaryOp::Div => "division",
            BinaryOp::Pow => "power",
        }
    }
}

/// Linear spatial operators, left symbolic for the discretization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpatialOp {
    Grad,
    Div,
}

/// A node of the expression tree.
#[derive(Debug, PartialEq)]
pub enum Node {
    Scalar(f64),
    Variable(Variable),
    Parameter(String),
    /// Parameter function, e.g. an open-circuit potential of concentration.
    Function {
        name: String,
        args: Vec<Expr>,
    },
    Time,
    /// Through-cell (or transverse) coordinate of a domain.
    SpatialVariable(Domain),
    Unary(UnaryOp, Expr),
    Binary(BinaryOp, Expr, Expr),
    Spatial(SpatialOp, Expr),
    Broadcast {
        child: Expr,
        domain: Domain,
    },
    XAverage(Expr),
    BoundaryValue {
        child: Expr,
        side: Side,
    },
    Concatenation(Vec<Expr>),
    Minimum(Expr),
}

/// Handle to an immutable, shareable expression tree.
///
/// Cloning is an `Arc` bump; building a new expression never mutates the
/// trees it is built from.
#[derive(Clone, Debug)]
pub struct Expr(Arc<Node>);

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Expr {
    pub(crate) fn from_node(node: Node) -> Self {
        Self(Arc::new(node))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn scalar(value: f64) -> Self {
        Self::from_node(Node::Scalar(value))
    }

    pub fn zero() -> Self {
        Self::scalar(0.0)
    }

    pub fn one() -> Self {
        Self::scalar(1.0)
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self::from_node(Node::Parameter(name.into()))
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::from_node(Node::Function {
            name: name.into(),
            args,
        })
    }

    pub fn time() -> Self {
        Self::from_node(Node::Time)
    }

    pub fn spatial_variable(domain: Domain) -> Self {
        Self::from_node(Node::SpatialVariable(domain))
    }

    /// Constant `value` carrying the shape of `domain`.
    pub fn filled(value: f64, domain: DomainSpec) -> Self {
        let base = Self::scalar(value);
        match (domain.primary, domain.secondary) {
            (None, _) => base,
            (Some(p), None) => base.broadcast(p),
            (Some(p), Some(s)) => base.broadcast(s).broadcast(p),
        }
    }

    /// Zero carrying the shape of `domain`.
    pub fn zeros(domain: DomainSpec) -> Self {
        Self::filled(0.0, domain)
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self.node() {
            Node::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self.node() {
            Node::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// True for a zero scalar, or a broadcast/concatenation of zeros.
    pub fn is_zero(&self) -> bool {
        match self.node() {
            Node::Scalar(v) => *v == 0.0,
            Node::Broadcast { child, .. } | Node::XAverage(child) => child.is_zero(),
            Node::Concatenation(parts) => parts.iter().all(Expr::is_zero),
            _ => false,
        }
    }

    fn is_one(&self) -> bool {
        self.as_scalar() == Some(1.0)
    }

    pub fn unary(op: UnaryOp, child: Expr) -> Self {
        if let Some(v) = child.as_scalar() {
            return Self::scalar(op.apply(v));
        }
        if op == UnaryOp::Neg {
            if let Node::Unary(UnaryOp::Neg, inner) = child.node() {
                return inner.clone();
            }
        }
        Self::from_node(Node::Unary(op, child))
    }

    /// Binary operation with trivial identities folded away.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        if let (Some(a), Some(b)) = (left.as_scalar(), right.as_scalar()) {
            return Self::scalar(op.apply(a, b));
        }
        match op {
            BinaryOp::Add if left.is_zero_scalar() => return right,
            BinaryOp::Add | BinaryOp::Sub if right.is_zero_scalar() => return left,
            BinaryOp::Sub if left.is_zero_scalar() => return Self::unary(UnaryOp::Neg, right),
            BinaryOp::Mul if left.is_zero_scalar() || right.is_zero_scalar() => {
                return Self::zero();
            }
            BinaryOp::Mul if left.is_one() => return right,
            BinaryOp::Mul | BinaryOp::Div if right.is_one() => return left,
            BinaryOp::Div if left.is_zero_scalar() => return Self::zero(),
            BinaryOp::Pow if right.is_one() => return left,
            BinaryOp::Pow if right.is_zero_scalar() => return Self::one(),
            _ => {}
        }
        Self::from_node(Node::Binary(op, left, right))
    }

    fn is_zero_scalar(&self) -> bool {
        self.as_scalar() == Some(0.0)
    }

    pub fn pow(&self, exponent: impl Into<Expr>) -> Expr {
        Self::binary(BinaryOp::Pow, self.clone(), exponent.into())
    }

    pub fn exp(&self) -> Expr {
        Self::unary(UnaryOp::Exp, self.clone())
    }

    pub fn log(&self) -> Expr {
        Self::unary(UnaryOp::Log, self.clone())
    }

    pub fn sinh(&self) -> Expr {
        Self::unary(UnaryOp::Sinh, self.clone())
    }

    pub fn cosh(&self) -> Expr {
        Self::unary(UnaryOp::Cosh, self.clone())
    }

    pub fn arcsinh(&self) -> Expr {
        Self::unary(UnaryOp::Arcsinh, self.clone())
    }

    pub fn sqrt(&self) -> Expr {
        Self::unary(UnaryOp::Sqrt, self.clone())
    }

    pub fn abs(&self) -> Expr {
        Self::unary(UnaryOp::Abs, self.clone())
    }

    /// Primary broadcast onto `domain`.
    pub fn broadcast(&self, domain: Domain) -> Expr {
        Self::from_node(Node::Broadcast {
            child: self.clone(),
            domain,
        })
    }

    /// Average over the through-cell coordinate.
    ///
    /// The average of a broadcast is the broadcast child.
    pub fn x_average(&self) -> Expr {
        match self.node() {
            Node::Broadcast { child, domain } if domain.is_through_cell() => child.clone(),
            Node::Scalar(_) => self.clone(),
            _ => Self::from_node(Node::XAverage(self.clone())),
        }
    }

    pub fn gradient(&self) -> Expr {
        Self::from_node(Node::Spatial(SpatialOp::Grad, self.clone()))
    }

    pub fn divergence(&self) -> Expr {
        Self::from_node(Node::Spatial(SpatialOp::Div, self.clone()))
    }

    pub fn laplacian(&self) -> Expr {
        self.gradient().divergence()
    }

    pub fn boundary_value(&self, side: Side) -> Expr {
        Self::from_node(Node::BoundaryValue {
            child: self.clone(),
            side,
        })
    }

    /// Concatenate negative electrode, separator and positive electrode parts.
    pub fn concatenate(parts: Vec<Expr>) -> Expr {
        Self::from_node(Node::Concatenation(parts))
    }

    /// Minimum over all spatial points.
    pub fn minimum(&self) -> Expr {
        Self::from_node(Node::Minimum(self.clone()))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::scalar(value)
    }
}

impl From<Variable> for Expr {
    fn from(variable: Variable) -> Self {
        Expr::from_node(Node::Variable(variable))
    }
}

impl From<&Variable> for Expr {
    fn from(variable: &Variable) -> Self {
        Expr::from(variable.clone())
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_fold() {
        let e = Expr::scalar(2.0) * Expr::scalar(3.0) + 1.0;
        assert_eq!(e.as_scalar(), Some(7.0));
    }

    #[test]
    fn identities_fold() {
        let x = Expr::parameter("x");
        assert_eq!(&x + 0.0, x);
        assert_eq!(&x * 1.0, x);
        assert!((&x * 0.0).is_zero());
        assert_eq!(-(-&x), x);
    }

    #[test]
    fn clones_share_nodes() {
        let x = Expr::parameter("x").exp();
        let y = x.clone();
        assert!(Arc::ptr_eq(&x.0, &y.0));
    }

    #[test]
    fn building_does_not_mutate_operands() {
        let x = Expr::parameter("x");
        let before = format!("{x}");
        let _y = &x * 2.0 + x.sinh();
        assert_eq!(format!("{x}"), before);
    }

    #[test]
    fn filled_keeps_secondary_domain() {
        let spec = DomainSpec::with_secondary(Domain::NegativeElectrode, Domain::CurrentCollector);
        let z = Expr::zeros(spec);
        assert!(z.is_zero());
        assert_eq!(z.domain().unwrap(), spec);
    }

    #[test]
    fn average_of_broadcast_is_child() {
        let v = Expr::from(Variable::on("T", Domain::CurrentCollector));
        assert_eq!(v.broadcast(Domain::NegativeElectrode).x_average(), v);
    }
}

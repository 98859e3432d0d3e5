//! ec-expr: immutable symbolic expression trees.
//!
//! Provides:
//! - `Expr`, a cheaply clonable handle to a shared, immutable node tree
//! - `Variable`, the symbol of a genuine unknown of the model
//! - arithmetic, elementary functions, broadcasts, x-averages and spatial
//!   operators
//! - symbolic differentiation (`Expr::diff`), substitution and domain checking
//!
//! # Example
//!
//! ```
//! use ec_core::Domain;
//! use ec_expr::{Expr, Variable};
//!
//! let c = Variable::on("Electrolyte concentration", Domain::NegativeElectrode);
//! let j0 = Expr::parameter("Reference exchange-current density") * Expr::from(&c).sqrt();
//!
//! let dj0_dc = j0.diff(&c).unwrap();
//! assert!(dj0_dc.depends_on(&c));
//! assert!(j0.domain().is_ok());
//! ```

mod calculus;
mod display;
mod domain_check;
pub mod error;
pub mod expr;
mod ops;
mod transform;
pub mod variable;

pub use error::{ExprError, ExprResult};
pub use expr::{BinaryOp, Expr, Node, SpatialOp, UnaryOp};
pub use variable::Variable;

//! ec-model: variable registry, submodel contract and model assembly.
//!
//! A model is assembled from an ordered list of [`Submodel`]s that never
//! reference each other directly. They communicate only through the
//! [`VariableRegistry`], by variable name:
//!
//! 1. every submodel declares its fundamental variables (insertion order);
//! 2. coupled variables are derived in dependency order, resolved from each
//!    submodel's declared inputs and outputs;
//! 3. rhs, algebraic, initial and boundary conditions and events are merged
//!    into one [`EquationSet`], which is checked for exactness and closure.
//!
//! The result is an immutable [`AssembledModel`].

pub mod assembler;
pub mod equations;
pub mod error;
pub mod leading_order;
pub mod model;
pub mod registry;
pub mod submodel;
pub mod testing;

pub use assembler::ModelAssembler;
pub use equations::{BoundaryCondition, BoundaryConditions, BoundaryKind, EquationSet, Event, EventKind};
pub use error::{ModelError, ModelResult};
pub use leading_order::LeadingOrderImport;
pub use model::{AssembledModel, SolverHint};
pub use registry::{RegistryView, VariableRegistry};
pub use submodel::{NamedExprs, Submodel};

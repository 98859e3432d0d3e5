//! ec-core: stable foundation for the electrochemical model builder.
//!
//! Contains:
//! - domain (spatial region tags and the rules for combining them)
//! - numeric (Real + float helpers)
//! - error (shared error types)

pub mod domain;
pub mod error;
pub mod numeric;

pub use domain::{Domain, DomainSpec, Side};
pub use error::{CoreError, CoreResult};
pub use numeric::*;

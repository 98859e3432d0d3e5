//! ec-submodels: interchangeable physics for electrochemical cell models.
//!
//! Every type here implements [`ec_model::Submodel`]. Submodels never call
//! each other; they read and declare variables by name, following the
//! naming helpers in [`common`]. All physical quantities are symbolic
//! [`Parameters`].
//!
//! - Current collection and thermal behaviour: [`current_collector`],
//!   [`thermal`]
//! - Electrolyte transport and potential: [`electrolyte`]
//! - Interface reactions: [`interface`], [`kinetics`], [`oxygen`]
//! - Solid phase: [`electrode_ohm`], [`porosity`], [`convection`]
//! - Degradation: [`sei`], [`cracking`]

pub mod common;
pub mod convection;
pub mod cracking;
pub mod current_collector;
pub mod electrode_ohm;
pub mod electrolyte;
pub mod interface;
pub mod kinetics;
pub mod oxygen;
pub mod parameters;
pub mod porosity;
pub mod reactions;
pub mod sei;
pub mod thermal;

pub use common::Electrode;
pub use kinetics::KineticsLaw;
pub use parameters::Parameters;
pub use reactions::{Reaction, Reactions};
pub use sei::{GrowthLaw, SeiLocation};

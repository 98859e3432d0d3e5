//! ec-models: full electrochemical cell models.
//!
//! A full model turns validated [`Options`](ec_options::Options) into a list
//! of submodels through the pure `select_*` functions, then assembles them.
//!
//! - [`SeiAgeingModel`]: lithium-ion cell ageing by SEI growth
//! - [`lead_acid::Loqs`]: lead-acid leading-order quasi-static model
//! - [`lead_acid::HigherOrder`]: first-order and composite lead-acid models
//!   around an embedded leading-order model
//!
//! Independent builds can run in parallel with [`build_batch`].

pub mod batch;
pub mod lead_acid;
pub mod model;
pub mod select;
pub mod sei_ageing;
pub mod summary;

pub use batch::{BuildRequest, ModelKind, build_batch};
pub use model::FullModel;
pub use sei_ageing::SeiAgeingModel;
pub use summary::ModelSummary;

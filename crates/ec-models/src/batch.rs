//! Building models by kind, one at a time or in parallel.

use std::fmt;
use std::sync::Arc;

use ec_model::{AssembledModel, ModelResult};
use ec_options::{DiffusionOrder, Options};
use ec_submodels::Parameters;
use rayon::prelude::*;
use serde::Serialize;

use crate::lead_acid::{HigherOrder, Loqs};
use crate::model::FullModel;
use crate::sei_ageing::SeiAgeingModel;

/// Which full model to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ModelKind {
    SeiAgeing,
    Loqs,
    HigherOrder(DiffusionOrder),
}

impl ModelKind {
    pub fn instantiate(self, options: Options, params: Arc<Parameters>) -> Box<dyn FullModel> {
        match self {
            ModelKind::SeiAgeing => Box::new(SeiAgeingModel::new(options, params)),
            ModelKind::Loqs => Box::new(Loqs::new(options, params)),
            ModelKind::HigherOrder(kind) => Box::new(HigherOrder::with_kind(kind, options, params)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::SeiAgeing => f.write_str("SEI ageing"),
            ModelKind::Loqs => f.write_str("LOQS"),
            ModelKind::HigherOrder(kind) => write!(f, "higher-order ({kind})"),
        }
    }
}

/// One model to build.
#[derive(Clone, Debug)]
pub struct BuildRequest {
    pub kind: ModelKind,
    pub options: Options,
    pub params: Arc<Parameters>,
}

impl BuildRequest {
    /// A request with the default symbolic parameter set.
    pub fn new(kind: ModelKind, options: Options) -> Self {
        Self {
            kind,
            options,
            params: Arc::default(),
        }
    }

    pub fn build(&self) -> ModelResult<AssembledModel> {
        self.kind
            .instantiate(self.options.clone(), self.params.clone())
            .build()
    }
}

/// Build every request in parallel. Builds share nothing mutable, so the
/// results are those of building each request on its own, in request order.
pub fn build_batch(requests: &[BuildRequest]) -> Vec<ModelResult<AssembledModel>> {
    requests.par_iter().map(BuildRequest::build).collect()
}

//! Lead-acid models: the leading-order quasi-static model and the
//! higher-order models built around it.

mod higher_order;
mod loqs;

pub use higher_order::HigherOrder;
pub use loqs::Loqs;

use ec_options::{CurrentCollector, Options, SurfaceForm};

/// Why a lead-acid model needs a DAE solver even when its own equations
/// might not show it, if it does.
fn dae_reason(options: &Options) -> Option<&'static str> {
    match (options.current_collector(), options.surface_form()) {
        (CurrentCollector::PotentialPair | CurrentCollector::PotentialPairQuiteConductive, _) => {
            Some("current-collector potentials are resolved in the plane")
        }
        (_, SurfaceForm::Algebraic) => Some("algebraic surface form"),
        _ => None,
    }
}

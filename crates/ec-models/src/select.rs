//! Option-driven submodel selection.
//!
//! Each function maps the relevant options to concrete submodels and has no
//! other inputs, so the same options always select the same physics.

use std::sync::Arc;

use ec_model::Submodel;
use ec_options::{Convection, CurrentCollector, Options};
use ec_submodels::convection::{through_cell, transverse};
use ec_submodels::cracking::CrackPropagation;
use ec_submodels::current_collector::{
    CollectorConductivity, CollectorGeometry, PotentialPair, Uniform,
};
use ec_submodels::interface::{DoubleLayer, InverseButlerVolmer, SurfaceFormButlerVolmer};
use ec_submodels::sei::{GrowthLaw, NoSei, SeiGrowth, SeiLocation};
use ec_submodels::{Electrode, Parameters, Reactions};

pub type BoxedSubmodel = Box<dyn Submodel>;

/// Uniform collector, or one of the potential-pair variants in the plane
/// the dimensionality asks for.
pub fn select_current_collector(options: &Options, params: &Arc<Parameters>) -> BoxedSubmodel {
    let geometry = match options.dimensionality().get() {
        2 => CollectorGeometry::Plane,
        _ => CollectorGeometry::Line,
    };
    let pair = |conductivity| -> BoxedSubmodel {
        Box::new(PotentialPair::new(params.clone(), geometry, conductivity))
    };
    match options.current_collector() {
        CurrentCollector::Uniform | CurrentCollector::PotentialPairQuiteConductiveAveraged => {
            Box::new(Uniform::new(params.clone()))
        }
        CurrentCollector::PotentialPair => pair(CollectorConductivity::Finite),
        CurrentCollector::PotentialPairQuiteConductive => pair(CollectorConductivity::QuiteConductive),
    }
}

/// Main-reaction interface of one electrode: explicit inverse kinetics
/// without a surface form, a surface-potential-difference state with one.
pub fn select_interface(
    options: &Options,
    params: &Arc<Parameters>,
    electrode: Electrode,
    reactions: Reactions,
) -> BoxedSubmodel {
    match DoubleLayer::for_surface_form(options.surface_form()) {
        None => Box::new(InverseButlerVolmer::new(params.clone(), electrode)),
        Some(double_layer) => Box::new(SurfaceFormButlerVolmer::new(
            params.clone(),
            electrode,
            double_layer,
            options.kinetics().into(),
            reactions,
        )),
    }
}

/// SEI growth on the particle surface and, with `SEI on cracks`, a second
/// film on the cracks.
pub fn select_sei(
    options: &Options,
    params: &Arc<Parameters>,
    location: SeiLocation,
) -> Vec<BoxedSubmodel> {
    let Some(law) = GrowthLaw::from_mechanism(options.sei()) else {
        return vec![Box::new(NoSei::new(location))];
    };
    let mut submodels: Vec<BoxedSubmodel> =
        vec![Box::new(SeiGrowth::new(params.clone(), law, location, false))];
    if options.sei_on_cracks() {
        submodels.push(Box::new(SeiGrowth::new(params.clone(), law, location, true)));
    }
    submodels
}

/// Crack propagation when SEI grows on cracks.
pub fn select_cracking(
    options: &Options,
    params: &Arc<Parameters>,
    location: SeiLocation,
) -> Option<BoxedSubmodel> {
    if !options.sei_on_cracks() {
        return None;
    }
    Some(match location {
        SeiLocation::FullElectrode => Box::new(CrackPropagation::new(params.clone())),
        SeiLocation::XAverage | SeiLocation::Interface => {
            Box::new(CrackPropagation::x_averaged(params.clone()))
        }
    })
}

pub fn select_transverse_convection(options: &Options, params: &Arc<Parameters>) -> BoxedSubmodel {
    match options.convection() {
        Convection::None => Box::new(transverse::NoConvection),
        Convection::UniformTransverse => Box::new(transverse::Uniform::new(params.clone())),
        Convection::FullTransverse => Box::new(transverse::Full::new(params.clone())),
    }
}

/// Through-cell velocity. `explicit` selects the correction driven by an
/// embedded leading-order model.
pub fn select_through_cell_convection(
    options: &Options,
    params: &Arc<Parameters>,
    explicit: bool,
) -> BoxedSubmodel {
    match (options.convection(), explicit) {
        (Convection::None, _) => Box::new(through_cell::NoConvection),
        (_, false) => Box::new(through_cell::ThroughCell::leading_order(params.clone())),
        (_, true) => Box::new(through_cell::ThroughCell::explicit(params.clone())),
    }
}

//! SEI film growth on the negative electrode.
//!
//! The film has an inner and an outer layer. A growth law gives the SEI
//! interfacial current density `j_sei`, which is split between the layers
//! as `alpha * j_sei` (inner) and `(1 - alpha) * j_sei` (outer). Each law
//! can track thickness x-averaged, through the electrode, or at a planar
//! interface, and a second instance can track the film growing on particle
//! cracks.

use std::collections::BTreeMap;
use std::sync::Arc;

use ec_core::{Domain, DomainSpec};
use ec_expr::{Expr, Variable};
use ec_model::{ModelResult, NamedExprs, RegistryView, Submodel};
use ec_options::SeiMechanism;
use tracing::debug;

use crate::common::{Electrode, on_region, x_averaged};
use crate::cracking::{CRACK_LENGTH, CRACKING_RATE};
use crate::electrode_ohm::potential_name;
use crate::interface::surface_potential_difference_name;
use crate::parameters::Parameters;
use crate::porosity::surface_area_name;
use crate::reactions::Reaction;

/// Initial film on cracks relative to the film on the particle surface.
const CRACK_FILM_RATIO: f64 = 1.0e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Inner,
    Outer,
    Total,
}

impl Layer {
    fn label(self) -> &'static str {
        match self {
            Layer::Inner => "Inner",
            Layer::Outer => "Outer",
            Layer::Total => "Total",
        }
    }
}

/// Where the film thickness is tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeiLocation {
    /// One thickness per transverse point, broadcast through the electrode.
    XAverage,
    /// Thickness resolved through the negative electrode.
    #[default]
    FullElectrode,
    /// A planar electrode-electrolyte interface.
    Interface,
}

impl SeiLocation {
    fn full_domain(self) -> DomainSpec {
        match self {
            SeiLocation::FullElectrode | SeiLocation::XAverage => {
                on_region(Domain::NegativeElectrode)
            }
            SeiLocation::Interface => DomainSpec::on(Domain::CurrentCollector),
        }
    }

    fn resolved(self) -> bool {
        self != SeiLocation::Interface
    }
}

/// Closed-form SEI current density laws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthLaw {
    ReactionLimited,
    ElectronMigrationLimited,
    InterstitialDiffusionLimited,
    SolventDiffusionLimited,
    EcReactionLimited,
}

impl GrowthLaw {
    /// `None` when the mechanism option switches SEI growth off.
    pub fn from_mechanism(mechanism: SeiMechanism) -> Option<GrowthLaw> {
        match mechanism {
            SeiMechanism::None => None,
            SeiMechanism::ReactionLimited => Some(GrowthLaw::ReactionLimited),
            SeiMechanism::ElectronMigrationLimited => Some(GrowthLaw::ElectronMigrationLimited),
            SeiMechanism::InterstitialDiffusionLimited => {
                Some(GrowthLaw::InterstitialDiffusionLimited)
            }
            SeiMechanism::SolventDiffusionLimited => Some(GrowthLaw::SolventDiffusionLimited),
            SeiMechanism::EcReactionLimited => Some(GrowthLaw::EcReactionLimited),
        }
    }

    fn label(self) -> &'static str {
        match self {
            GrowthLaw::ReactionLimited => "reaction-limited",
            GrowthLaw::ElectronMigrationLimited => "electron-migration-limited",
            GrowthLaw::InterstitialDiffusionLimited => "interstitial-diffusion-limited",
            GrowthLaw::SolventDiffusionLimited => "solvent-diffusion-limited",
            GrowthLaw::EcReactionLimited => "ec-reaction-limited",
        }
    }

    /// The inner layer has no independent state under EC-limited growth.
    fn has_inner_state(self) -> bool {
        self != GrowthLaw::EcReactionLimited
    }
}

fn suffix(on_cracks: bool) -> &'static str {
    if on_cracks { " on cracks" } else { "" }
}

pub fn thickness_name(layer: Layer, on_cracks: bool) -> String {
    format!("{} SEI{} thickness", layer.label(), suffix(on_cracks))
}

pub fn current_density_name(layer: Layer, on_cracks: bool) -> String {
    match layer {
        Layer::Total => format!("SEI{} interfacial current density", suffix(on_cracks)),
        _ => format!(
            "{} SEI{} interfacial current density",
            layer.label(),
            suffix(on_cracks)
        ),
    }
}

pub fn ec_concentration_name(on_cracks: bool) -> &'static str {
    if on_cracks {
        "EC concentration on cracks"
    } else {
        "EC surface concentration"
    }
}

const LAYERS: [Layer; 3] = [Layer::Inner, Layer::Outer, Layer::Total];

/// Declare `name` on the full domain, with its x-average when the location
/// is resolved through the electrode.
fn declare(vars: &mut NamedExprs, location: SeiLocation, name: &str, full: Expr) {
    if location.resolved() {
        vars.insert(x_averaged(name), full.x_average());
    }
    vars.insert(name, full);
}

/// No SEI: every film quantity is zero.
#[derive(Clone, Debug, Default)]
pub struct NoSei {
    location: SeiLocation,
}

impl NoSei {
    pub fn new(location: SeiLocation) -> Self {
        Self { location }
    }
}

impl Submodel for NoSei {
    fn name(&self) -> &str {
        "no SEI"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let zero = Expr::zeros(self.location.full_domain());
        let mut vars = NamedExprs::new();
        for layer in LAYERS {
            declare(&mut vars, self.location, &thickness_name(layer, false), zero.clone());
            declare(
                &mut vars,
                self.location,
                &current_density_name(layer, false),
                zero.clone(),
            );
        }
        Ok(vars)
    }
}

/// SEI growth under one [`GrowthLaw`].
#[derive(Clone, Debug)]
pub struct SeiGrowth {
    params: Arc<Parameters>,
    law: GrowthLaw,
    location: SeiLocation,
    on_cracks: bool,
    name: String,
}

impl SeiGrowth {
    pub fn new(
        params: Arc<Parameters>,
        law: GrowthLaw,
        location: SeiLocation,
        on_cracks: bool,
    ) -> Self {
        let name = format!("{} SEI growth{}", law.label(), suffix(on_cracks));
        Self {
            params,
            law,
            location,
            on_cracks,
            name,
        }
    }

    /// Registry name of the state for `layer`.
    fn state_name(&self, layer: Layer) -> String {
        let name = thickness_name(layer, self.on_cracks);
        match self.location {
            SeiLocation::XAverage => x_averaged(&name),
            _ => name,
        }
    }

    fn state(&self, layer: Layer) -> Expr {
        let domain = match self.location {
            SeiLocation::FullElectrode => on_region(Domain::NegativeElectrode),
            SeiLocation::XAverage | SeiLocation::Interface => {
                DomainSpec::on(Domain::CurrentCollector)
            }
        };
        Expr::from(Variable::new(self.state_name(layer), domain))
    }

    fn state_layers(&self) -> Vec<Layer> {
        if self.law.has_inner_state() {
            vec![Layer::Inner, Layer::Outer]
        } else {
            vec![Layer::Outer]
        }
    }

    /// State broadcast (if needed) to the full location domain.
    fn full(&self, state: Expr) -> Expr {
        match self.location {
            SeiLocation::XAverage => state.broadcast(Domain::NegativeElectrode),
            _ => state,
        }
    }

    fn surface_potential_difference(&self) -> String {
        match self.location {
            SeiLocation::Interface => "Lithium metal interface surface potential difference".into(),
            _ => surface_potential_difference_name(Electrode::Negative),
        }
    }

    fn electrode_potential(&self) -> String {
        match self.location {
            SeiLocation::Interface => "Lithium metal interface electrode potential".into(),
            _ => potential_name(Electrode::Negative),
        }
    }

    fn interfacial_current(&self) -> String {
        match self.location {
            SeiLocation::Interface => "Lithium metal total interfacial current density".into(),
            _ => Reaction::Main.current_density(Electrode::Negative),
        }
    }

    fn temperature(&self) -> String {
        let name = "Negative electrode temperature";
        match self.location {
            SeiLocation::Interface => x_averaged(name),
            _ => name.to_string(),
        }
    }

    /// Names read by the growth law, for the coupled phase.
    fn law_inputs(&self) -> Vec<String> {
        let mut inputs = vec![self.temperature()];
        match self.law {
            GrowthLaw::ReactionLimited | GrowthLaw::EcReactionLimited => {
                inputs.push(self.surface_potential_difference());
                inputs.push(self.interfacial_current());
            }
            GrowthLaw::ElectronMigrationLimited => inputs.push(self.electrode_potential()),
            GrowthLaw::InterstitialDiffusionLimited => {
                inputs.push(self.surface_potential_difference())
            }
            GrowthLaw::SolventDiffusionLimited => {}
        }
        inputs
    }

    /// Registry name read by the rate equations for a full-domain quantity.
    fn rate_input(&self, name: &str) -> String {
        match self.location {
            SeiLocation::XAverage => x_averaged(name),
            _ => name.to_string(),
        }
    }

    fn surface_area(&self, vars: &RegistryView<'_>) -> ModelResult<Expr> {
        match self.location {
            SeiLocation::Interface => Ok(Expr::one()),
            _ => vars.get(&self.rate_input(&surface_area_name(Electrode::Negative))),
        }
    }

    /// Crack length and cracking rate on the state domain.
    fn crack_growth(&self, vars: &RegistryView<'_>) -> ModelResult<(Expr, Expr)> {
        let (length, rate) = match self.location {
            SeiLocation::FullElectrode => (CRACK_LENGTH.to_string(), CRACKING_RATE.to_string()),
            _ => (x_averaged(CRACK_LENGTH), x_averaged(CRACKING_RATE)),
        };
        Ok((vars.get(&length)?, vars.get(&rate)?))
    }

    /// Initial thickness of `layer`.
    fn initial_thickness(&self, layer: Layer) -> Expr {
        let sei = &self.params.sei;
        let l0 = match (self.law, layer) {
            (GrowthLaw::EcReactionLimited, _) => &sei.l_inner_0 + &sei.l_outer_0,
            (_, Layer::Inner) => sei.l_inner_0.clone(),
            _ => sei.l_outer_0.clone(),
        };
        if self.on_cracks {
            l0 * CRACK_FILM_RATIO
        } else {
            l0
        }
    }

    /// SEI current density under the growth law, plus the EC surface
    /// concentration when the law has one.
    fn current_density(
        &self,
        vars: &RegistryView<'_>,
        thickness: &BTreeMap<Layer, Expr>,
    ) -> ModelResult<(Expr, Option<Expr>)> {
        let sei = &self.params.sei;
        let t = vars.get(&self.temperature())?;
        let prefactor = -1.0 / (2.0 * (1.0 + &self.params.thermal.theta * t));
        let l_total = &thickness[&Layer::Total];
        let l_inner = &thickness[&Layer::Inner];
        let l_outer = &thickness[&Layer::Outer];

        let overpotential = || -> ModelResult<Expr> {
            let delta_phi = vars.get(&self.surface_potential_difference())?;
            let j = vars.get(&self.interfacial_current())?;
            Ok(delta_phi - j * l_total * &sei.r_sei)
        };

        let out = match self.law {
            GrowthLaw::ReactionLimited => {
                let eta = overpotential()?;
                (-(1.0 / &sei.c_reaction) * (prefactor * eta).exp(), None)
            }
            GrowthLaw::ElectronMigrationLimited => {
                let phi_s = vars.get(&self.electrode_potential())?;
                ((phi_s - &sei.u_inner_electron) / (&sei.c_electron * l_inner), None)
            }
            GrowthLaw::InterstitialDiffusionLimited => {
                let delta_phi = vars.get(&self.surface_potential_difference())?;
                (
                    -(2.0 * prefactor * delta_phi).exp() / (&sei.c_inter * l_inner),
                    None,
                )
            }
            GrowthLaw::SolventDiffusionLimited => (-1.0 / (&sei.c_solvent * l_outer), None),
            GrowthLaw::EcReactionLimited => {
                // j_sei = -C_exp * c_ec and c_ec = 1 + L * D_ec * j_sei,
                // solved together.
                let eta = overpotential()?;
                let c_exp = &sei.c_ec * (prefactor * eta).exp();
                let denominator = 1.0 + l_total * &sei.c_ec_diffusion * &c_exp;
                let j_sei = -(&c_exp / &denominator);
                (j_sei, Some(1.0 / denominator))
            }
        };
        Ok(out)
    }
}

impl Submodel for SeiGrowth {
    fn name(&self) -> &str {
        &self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        self.law_inputs()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        let mut names: Vec<String> = LAYERS
            .iter()
            .map(|&layer| current_density_name(layer, self.on_cracks))
            .collect();
        if self.law == GrowthLaw::EcReactionLimited {
            names.push(ec_concentration_name(self.on_cracks).to_string());
        }
        names
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let outer = self.full(self.state(Layer::Outer));
        let inner = if self.law.has_inner_state() {
            self.full(self.state(Layer::Inner))
        } else {
            Expr::zeros(self.location.full_domain())
        };
        let total = &inner + &outer;

        let mut vars = NamedExprs::new();
        for (layer, full) in [(Layer::Inner, inner), (Layer::Outer, outer), (Layer::Total, total)] {
            declare(&mut vars, self.location, &thickness_name(layer, self.on_cracks), full);
        }
        Ok(vars)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let thickness = LAYERS
            .iter()
            .map(|&layer| Ok((layer, vars.get(&thickness_name(layer, self.on_cracks))?)))
            .collect::<ModelResult<BTreeMap<_, _>>>()?;
        let (j_sei, c_ec) = self.current_density(vars, &thickness)?;

        let (j_inner, j_outer) = if self.law.has_inner_state() {
            let alpha = &self.params.sei.alpha;
            (alpha * &j_sei, (1.0 - alpha) * &j_sei)
        } else {
            (Expr::zeros(self.location.full_domain()), j_sei.clone())
        };
        debug!(submodel = %self.name, "SEI current density");

        let mut out = NamedExprs::new();
        for (layer, j) in [(Layer::Inner, j_inner), (Layer::Outer, j_outer), (Layer::Total, j_sei)] {
            declare(&mut out, self.location, &current_density_name(layer, self.on_cracks), j);
        }
        if let Some(c_ec) = c_ec {
            declare(&mut out, self.location, ec_concentration_name(self.on_cracks), c_ec);
        }
        Ok(out)
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let sei = &self.params.sei;
        let a = self.surface_area(vars)?;
        let cracks = if self.on_cracks {
            Some(self.crack_growth(vars)?)
        } else {
            None
        };

        let mut rhs = NamedExprs::new();
        for layer in self.state_layers() {
            let j = vars.get(&self.rate_input(&current_density_name(layer, self.on_cracks)))?;
            let mut growth = match (self.law, layer) {
                (GrowthLaw::EcReactionLimited, _) => -(&sei.gamma * &a * j) / 2.0,
                (_, Layer::Inner) => -(&sei.gamma * &a * j),
                _ => -(&sei.v_bar * &sei.gamma * &a * j),
            };
            if let Some((l_cr, dl_cr)) = &cracks {
                let reference = self.initial_thickness(layer);
                growth = growth + dl_cr / l_cr * (reference - self.state(layer));
            }
            rhs.insert(self.state_name(layer), growth);
        }
        Ok(rhs)
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(self
            .state_layers()
            .into_iter()
            .map(|layer| (self.state_name(layer), self.initial_thickness(layer)))
            .collect())
    }
}

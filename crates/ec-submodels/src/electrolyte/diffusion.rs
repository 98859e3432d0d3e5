//! Electrolyte diffusion: how the salt concentration evolves.

use std::collections::BTreeMap;
use std::sync::Arc;

use ec_core::{Domain, Side};
use ec_expr::{Expr, Variable};
use ec_model::submodel::names;
use ec_model::{
    BoundaryCondition, BoundaryConditions, Event, LeadingOrderImport, ModelResult, NamedExprs,
    RegistryView, Submodel,
};
use ec_options::DiffusionOrder;
use tracing::debug;

use super::{
    CONCENTRATION, FLUX, X_AVERAGED_CONCENTRATION, concentration_names, quasi_static_profile,
};
use crate::common::{
    Electrode, broadcast_cell, cell_field, cell_field_names, electrode_region_names,
    get_regions, leading_order, on_region, resolved_cell_field, x_averaged,
};
use crate::convection::{TRANSVERSE_ACCELERATION, velocity_names};
use crate::parameters::Parameters;
use crate::porosity::{porosity_change_names, porosity_names};
use crate::reactions::{Reaction, Reactions};
use crate::thermal::X_AVERAGED_CELL_TEMPERATURE;

pub const FIRST_ORDER_AVERAGE: &str = "X-averaged first-order electrolyte concentration";

/// Concentration below which a discharge is stopped.
const CUT_OFF: f64 = 0.002;

fn cut_off_event(c: &Expr) -> Event {
    Event::termination("Zero electrolyte concentration cut-off", c.minimum() - CUT_OFF)
}

/// `sum_r s_r j_r` in one electrode, with current densities named by `name`.
fn reaction_source(
    vars: &RegistryView<'_>,
    params: &Parameters,
    reactions: Reactions,
    electrode: Electrode,
    name: impl Fn(Reaction) -> String,
) -> ModelResult<Expr> {
    reactions
        .iter()
        .map(|r| -> ModelResult<Expr> {
            Ok(r.electrolyte_stoichiometry(electrode, params) * vars.get(&name(r))?)
        })
        .sum()
}

/// `sum_k l_k q_k` over the three regions.
pub(crate) fn length_weighted(params: &Parameters, values: &[Expr; 3]) -> Expr {
    params
        .geometry
        .lengths()
        .into_iter()
        .zip(values)
        .map(|(l, q)| l * q)
        .sum()
}

/// Leading-order diffusion: a single x-averaged concentration state.
#[derive(Clone, Debug)]
pub struct LeadingOrder {
    params: Arc<Parameters>,
    reactions: Reactions,
}

impl LeadingOrder {
    pub fn new(params: Arc<Parameters>, reactions: Reactions) -> Self {
        Self { params, reactions }
    }
}

impl Submodel for LeadingOrder {
    fn name(&self) -> &str {
        "leading-order electrolyte diffusion"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let c = Expr::from(Variable::on(X_AVERAGED_CONCENTRATION, Domain::CurrentCollector));
        let mut vars = cell_field(&concentration_names(), CONCENTRATION, broadcast_cell(&c), c);
        vars.insert(FLUX, Expr::zeros(on_region(Domain::WholeCell)));
        Ok(vars)
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let params = &self.params;
        let c = vars.get(X_AVERAGED_CONCENTRATION)?;
        let eps = get_regions(vars, porosity_names().map(|n| x_averaged(&n)))?;
        let deps = get_regions(vars, porosity_change_names().map(|n| x_averaged(&n)))?;
        let acceleration = vars.get(TRANSVERSE_ACCELERATION)?;

        let mut source = Expr::zero();
        for electrode in Electrode::BOTH {
            let s_j = reaction_source(vars, params, self.reactions, electrode, |r| {
                r.x_averaged_current_density(electrode)
            })?;
            source = source + params.geometry.electrode_length(electrode) * s_j;
        }
        let rhs = (source
            - &c * length_weighted(params, &deps)
            - &c * &params.geometry.l_s * acceleration)
            / length_weighted(params, &eps);
        Ok(NamedExprs::new().with(X_AVERAGED_CONCENTRATION, rhs))
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with(X_AVERAGED_CONCENTRATION, &self.params.electrolyte.c_init))
    }

    fn set_events(&self, vars: &RegistryView<'_>) -> ModelResult<Vec<Event>> {
        Ok(vec![cut_off_event(&vars.get(X_AVERAGED_CONCENTRATION)?)])
    }
}

/// First-order quasi-static diffusion: the concentration is the embedded
/// leading-order value plus an explicit first-order correction.
#[derive(Clone, Debug)]
pub struct FirstOrder {
    params: Arc<Parameters>,
    reactions: Reactions,
}

impl FirstOrder {
    pub fn new(params: Arc<Parameters>, reactions: Reactions) -> Self {
        Self { params, reactions }
    }

    /// Leading-order concentration, temperature, porosities and porosity
    /// changes, all x-averaged.
    fn leading_order_state(
        &self,
        vars: &RegistryView<'_>,
    ) -> ModelResult<(Expr, Expr, [Expr; 3], [Expr; 3])> {
        let lo = |name: &str| vars.get(&leading_order(name));
        let eps = get_regions(vars, porosity_names().map(|n| leading_order(&x_averaged(&n))))?;
        let deps = get_regions(
            vars,
            porosity_change_names().map(|n| leading_order(&x_averaged(&n))),
        )?;
        Ok((
            lo(X_AVERAGED_CONCENTRATION)?,
            lo(X_AVERAGED_CELL_TEMPERATURE)?,
            eps,
            deps,
        ))
    }

    /// First-order concentration profile in each region.
    fn correction(&self, vars: &RegistryView<'_>) -> ModelResult<[Expr; 3]> {
        let params = &self.params;
        let (c_0, t_0, eps_0, deps_0) = self.leading_order_state(vars)?;
        let dc_0 = vars.get(LeadingOrderImport::CONCENTRATION_CHANGE)?;

        // net production of salt per unit volume, minus storage
        let storage = |k: usize| &deps_0[k] * &c_0 + &eps_0[k] * &dc_0;
        let mut sources = [-storage(0), -storage(1), -storage(2)];
        for (k, electrode) in [(0, Electrode::Negative), (2, Electrode::Positive)] {
            let s_j = reaction_source(vars, params, self.reactions, electrode, |r| {
                leading_order(&r.x_averaged_current_density(electrode))
            })?;
            sources[k] = s_j + &sources[k];
        }
        let d_0 = params.electrolyte.diffusivity(&c_0, &t_0);
        let diffusivities = eps_0.clone().map(|eps| &d_0 * eps.pow(&params.electrolyte.b));
        Ok(quasi_static_profile(
            &sources,
            &diffusivities,
            params.geometry.lengths(),
        ))
    }

    fn concentration(
        &self,
        vars: &RegistryView<'_>,
        average_correction: Option<&Expr>,
    ) -> ModelResult<NamedExprs> {
        let c_0 = vars.get(&leading_order(X_AVERAGED_CONCENTRATION))?;
        let c_e = &self.params.electrolyte.c_e;
        let [c1_n, c1_s, c1_p] = self.correction(vars)?;
        let shift = |c_1: Expr, region: Domain| match average_correction {
            Some(c1_av) => c_1 + c1_av.broadcast(region),
            None => c_1,
        };
        let [n, s, p] = Domain::CELL_REGIONS;
        let regions = [
            c_0.broadcast(n) + c_e * shift(c1_n, n),
            c_0.broadcast(s) + c_e * shift(c1_s, s),
            c_0.broadcast(p) + c_e * shift(c1_p, p),
        ];
        Ok(resolved_cell_field(&concentration_names(), CONCENTRATION, regions))
    }
}

impl Submodel for FirstOrder {
    fn name(&self) -> &str {
        "first-order electrolyte diffusion"
    }

    fn coupled_outputs(&self) -> Vec<String> {
        cell_field_names(&concentration_names(), CONCENTRATION)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        self.concentration(vars, None)
    }
}

/// First-order diffusion with an extra state for the x-averaged
/// first-order concentration.
#[derive(Clone, Debug)]
pub struct FirstOrderAverageCorrection {
    inner: FirstOrder,
}

impl FirstOrderAverageCorrection {
    pub fn new(params: Arc<Parameters>, reactions: Reactions) -> Self {
        Self {
            inner: FirstOrder::new(params, reactions),
        }
    }
}

impl Submodel for FirstOrderAverageCorrection {
    fn name(&self) -> &str {
        "first-order electrolyte diffusion with average correction"
    }

    fn coupled_outputs(&self) -> Vec<String> {
        self.inner.coupled_outputs()
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with(
            FIRST_ORDER_AVERAGE,
            Variable::on(FIRST_ORDER_AVERAGE, Domain::CurrentCollector),
        ))
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let c1_av = vars.get(FIRST_ORDER_AVERAGE)?;
        self.inner.concentration(vars, Some(&c1_av))
    }

    /// The average grows with the first-order part of the interfacial
    /// currents and is diluted by the leading-order porosity change.
    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let inner = &self.inner;
        let params = &inner.params;
        let c1_av = vars.get(FIRST_ORDER_AVERAGE)?;
        let (_, _, eps_0, deps_0) = inner.leading_order_state(vars)?;

        let mut source = Expr::zero();
        for electrode in Electrode::BOTH {
            let full = reaction_source(vars, params, inner.reactions, electrode, |r| {
                r.x_averaged_current_density(electrode)
            })?;
            let lo = reaction_source(vars, params, inner.reactions, electrode, |r| {
                leading_order(&r.x_averaged_current_density(electrode))
            })?;
            let first_order = (full - lo) / &params.electrolyte.c_e;
            source = source + params.geometry.electrode_length(electrode) * first_order;
        }
        let rhs = (source - &c1_av * length_weighted(params, &deps_0))
            / length_weighted(params, &eps_0);
        Ok(NamedExprs::new().with(FIRST_ORDER_AVERAGE, rhs))
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with(FIRST_ORDER_AVERAGE, 0.0))
    }
}

/// Which porosity and current feed the composite diffusion equation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Extension {
    /// Leading-order x-averaged porosity and currents.
    #[default]
    None,
    /// Spatially resolved porosity and currents.
    Distributed,
    /// X-averaged porosity and currents of the composite model itself.
    Averaged,
}

impl Extension {
    /// The extension a diffusion order asks for, if it is a composite one.
    pub fn for_order(order: DiffusionOrder) -> Option<Extension> {
        match order {
            DiffusionOrder::Composite => Some(Extension::None),
            DiffusionOrder::CompositeExtendedDistributed => Some(Extension::Distributed),
            DiffusionOrder::CompositeExtendedAveraged => Some(Extension::Averaged),
            DiffusionOrder::FirstOrder | DiffusionOrder::FirstOrderAverageCorrection => None,
        }
    }

    /// Registry name read for a region quantity in `region`.
    pub(crate) fn source(self, name: &str) -> String {
        match self {
            Extension::None => leading_order(&x_averaged(name)),
            Extension::Distributed => name.to_string(),
            Extension::Averaged => x_averaged(name),
        }
    }

    /// Value of a region quantity on `region`, broadcast where averaged.
    pub(crate) fn read(
        self,
        vars: &RegistryView<'_>,
        name: &str,
        region: Domain,
    ) -> ModelResult<Expr> {
        let value = vars.get(&self.source(name))?;
        Ok(match self {
            Extension::Distributed => value,
            Extension::None | Extension::Averaged => value.broadcast(region),
        })
    }
}

/// Composite diffusion: the full concentration is solved in every region.
#[derive(Clone, Debug)]
pub struct Composite {
    params: Arc<Parameters>,
    reactions: Reactions,
    extension: Extension,
}

impl Composite {
    pub fn new(params: Arc<Parameters>, reactions: Reactions, extension: Extension) -> Self {
        Self {
            params,
            reactions,
            extension,
        }
    }

    pub fn extension(&self) -> Extension {
        self.extension
    }

    fn porosity(&self, vars: &RegistryView<'_>) -> ModelResult<[Expr; 3]> {
        let names = porosity_names();
        let [n, s, p] = Domain::CELL_REGIONS;
        Ok([
            self.extension.read(vars, &names[0], n)?,
            self.extension.read(vars, &names[1], s)?,
            self.extension.read(vars, &names[2], p)?,
        ])
    }

    fn fluxes(&self, vars: &RegistryView<'_>) -> ModelResult<[Expr; 3]> {
        let c = get_regions(vars, concentration_names())?;
        let t = get_regions(vars, electrode_region_names("temperature"))?;
        let v = get_regions(vars, velocity_names())?;
        let eps = self.porosity(vars)?;
        let electrolyte = &self.params.electrolyte;
        let flux = |k: usize| {
            let d_eff = electrolyte.diffusivity(&c[k], &t[k]) * eps[k].pow(&electrolyte.b);
            -(d_eff * c[k].gradient()) + &c[k] * &v[k]
        };
        Ok([flux(0), flux(1), flux(2)])
    }
}

impl Submodel for Composite {
    fn name(&self) -> &str {
        match self.extension {
            Extension::None => "composite electrolyte diffusion",
            Extension::Distributed => "extended composite electrolyte diffusion (distributed)",
            Extension::Averaged => "extended composite electrolyte diffusion (averaged)",
        }
    }

    fn coupled_inputs(&self) -> Vec<String> {
        velocity_names().into_iter().collect()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        names([FLUX])
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let names = concentration_names();
        let regions = [0, 1, 2].map(|k| {
            Expr::from(Variable::new(
                names[k].as_str(),
                on_region(Domain::CELL_REGIONS[k]),
            ))
        });
        Ok(resolved_cell_field(&names, CONCENTRATION, regions))
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let fluxes = self.fluxes(vars)?;
        Ok(NamedExprs::new().with(FLUX, Expr::concatenate(fluxes.to_vec())))
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let names = concentration_names();
        let c = get_regions(vars, names.clone())?;
        let eps = self.porosity(vars)?;
        let fluxes = self.fluxes(vars)?;
        let change_names = porosity_change_names();

        let electrodes = [Some(Electrode::Negative), None, Some(Electrode::Positive)];
        let mut rhs = NamedExprs::new();
        for k in 0..3 {
            let region = Domain::CELL_REGIONS[k];
            let deps = self.extension.read(vars, &change_names[k], region)?;
            let mut production = -fluxes[k].divergence() - &c[k] * deps;
            if let Some(electrode) = electrodes[k] {
                let s_j = reaction_source(vars, &self.params, self.reactions, electrode, |r| {
                    self.extension.source(&r.current_density(electrode))
                })?;
                let s_j = match self.extension {
                    Extension::Distributed => s_j,
                    Extension::None | Extension::Averaged => s_j.broadcast(region),
                };
                production = production + s_j;
            }
            rhs.insert(names[k].as_str(), production / &eps[k]);
        }
        debug!(extension = ?self.extension, "composite diffusion equations");
        Ok(rhs)
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(concentration_names()
            .into_iter()
            .map(|name| (name, self.params.electrolyte.c_init.clone()))
            .collect())
    }

    fn set_boundary_conditions(
        &self,
        _vars: &RegistryView<'_>,
    ) -> ModelResult<BTreeMap<String, BoundaryConditions>> {
        let no_flux = BoundaryConditions::from([
            (Side::Left, BoundaryCondition::neumann(0.0)),
            (Side::Right, BoundaryCondition::neumann(0.0)),
        ]);
        Ok(BTreeMap::from([(CONCENTRATION.to_string(), no_flux)]))
    }

    fn set_events(&self, vars: &RegistryView<'_>) -> ModelResult<Vec<Event>> {
        Ok(vec![cut_off_event(&vars.get(CONCENTRATION)?)])
    }
}

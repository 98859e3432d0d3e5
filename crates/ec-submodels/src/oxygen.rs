//! Oxygen side reaction: evolution in the positive electrode,
//! recombination in the negative, and diffusion of dissolved oxygen in
//! between.

use std::collections::BTreeMap;
use std::sync::Arc;

use ec_core::{Domain, DomainSpec, Side};
use ec_expr::{Expr, Variable};
use ec_model::{
    BoundaryCondition, BoundaryConditions, ModelResult, NamedExprs, RegistryView, Submodel,
};

use crate::common::{
    Electrode, broadcast_cell, cell_field, cell_field_names, electrolyte_region_names,
    get_regions, leading_order, on_region, resolved_cell_field, x_averaged,
};
use crate::convection::{TRANSVERSE_ACCELERATION, velocity_names};
use crate::electrolyte::diffusion::{Extension, length_weighted};
use crate::electrolyte::{X_AVERAGED_CONCENTRATION, concentration_names, quasi_static_profile};
use crate::interface::surface_potential_difference_name;
use crate::kinetics::linearized;
use crate::parameters::Parameters;
use crate::porosity::{porosity_change_names, porosity_names};
use crate::reactions::Reaction;
use crate::thermal::X_AVERAGED_CELL_TEMPERATURE;

pub const OXYGEN_CONCENTRATION: &str = "Oxygen concentration";
pub const X_AVERAGED_OXYGEN_CONCENTRATION: &str = "X-averaged oxygen concentration";

/// `"Negative oxygen concentration"`, `"Separator ..."`, `"Positive ..."`.
pub fn oxygen_concentration_names() -> [String; 3] {
    electrolyte_region_names("oxygen concentration")
}

fn current_names(electrode: Electrode) -> Vec<String> {
    let name = Reaction::Oxygen.current_density(electrode);
    vec![x_averaged(&name), name]
}

/// Declare an x-averaged oxygen current and its broadcast.
fn averaged_current(electrode: Electrode, j_av: Expr) -> NamedExprs {
    let name = Reaction::Oxygen.current_density(electrode);
    NamedExprs::new()
        .with(name.as_str(), j_av.broadcast(electrode.domain()))
        .with(x_averaged(&name), j_av)
}

/// Forward Tafel oxygen evolution, first order in the oxygen concentration.
pub(crate) fn tafel(params: &Parameters, c_e: &Expr, t: &Expr, c_ox: &Expr, delta_phi: &Expr) -> Expr {
    let oxygen = &params.oxygen;
    let j0 = oxygen.exchange_current_density(c_e, t) * c_ox;
    j0 * (&oxygen.ne / 2.0 * (delta_phi - &oxygen.u)).exp()
}

/// No oxygen reaction in one electrode.
#[derive(Clone, Debug)]
pub struct NoOxygen {
    name: String,
    electrode: Electrode,
}

impl NoOxygen {
    pub fn new(electrode: Electrode) -> Self {
        Self {
            name: format!("{electrode} no oxygen reaction"),
            electrode,
        }
    }
}

impl Submodel for NoOxygen {
    fn name(&self) -> &str {
        &self.name
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        Ok(averaged_current(
            self.electrode,
            Expr::zeros(DomainSpec::on(Domain::CurrentCollector)),
        ))
    }
}

/// Leading-order forward Tafel evolution in the positive electrode.
#[derive(Clone, Debug)]
pub struct ForwardTafel {
    params: Arc<Parameters>,
}

impl ForwardTafel {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }

    fn inputs() -> [String; 4] {
        let p = Electrode::Positive;
        [
            x_averaged(&concentration_names()[2]),
            format!("X-averaged {p} electrode temperature"),
            X_AVERAGED_OXYGEN_CONCENTRATION.to_string(),
            x_averaged(&surface_potential_difference_name(p)),
        ]
    }
}

impl Submodel for ForwardTafel {
    fn name(&self) -> &str {
        "positive oxygen forward Tafel"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        Self::inputs().to_vec()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        current_names(Electrode::Positive)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let [c_e, t, c_ox, delta_phi] = Self::inputs();
        let j = tafel(
            &self.params,
            &vars.get(&c_e)?,
            &vars.get(&t)?,
            &vars.get(&c_ox)?,
            &vars.get(&delta_phi)?,
        );
        Ok(averaged_current(Electrode::Positive, j))
    }
}

/// First-order forward Tafel evolution, linearized in the electrolyte
/// concentration and surface potential difference about the embedded
/// leading-order state.
#[derive(Clone, Debug)]
pub struct FirstOrderForwardTafel {
    params: Arc<Parameters>,
}

impl FirstOrderForwardTafel {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }

    fn inputs() -> [String; 3] {
        [
            concentration_names()[2].clone(),
            surface_potential_difference_name(Electrode::Positive),
            oxygen_concentration_names()[2].clone(),
        ]
    }
}

impl Submodel for FirstOrderForwardTafel {
    fn name(&self) -> &str {
        "positive oxygen first-order forward Tafel"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        Self::inputs().to_vec()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        current_names(Electrode::Positive)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let region = Domain::PositiveElectrode;
        let [c_e, delta_phi, c_ox] = Self::inputs();
        let (c_e, delta_phi, c_ox) = (vars.get(&c_e)?, vars.get(&delta_phi)?, vars.get(&c_ox)?);
        let lo = |name: &str| vars.get(&leading_order(name)).map(|e| e.broadcast(region));
        let c_0 = lo(X_AVERAGED_CONCENTRATION)?;
        let t_0 = lo(X_AVERAGED_CELL_TEMPERATURE)?;
        let delta_phi_0 = lo(&x_averaged(&surface_potential_difference_name(
            Electrode::Positive,
        )))?;

        let j = linearized(
            &|c: &Expr, phi: &Expr| tafel(&self.params, c, &t_0, &c_ox, phi),
            (&c_0, &delta_phi_0),
            (&c_e, &delta_phi),
        )?;
        let name = Reaction::Oxygen.current_density(Electrode::Positive);
        Ok(NamedExprs::new()
            .with(x_averaged(&name), j.x_average())
            .with(name, j))
    }
}

/// Diffusion-limited recombination in the negative electrode: all oxygen
/// reaching it reacts.
#[derive(Clone, Debug)]
pub struct DiffusionLimited {
    params: Arc<Parameters>,
    composite: bool,
}

impl DiffusionLimited {
    /// Recombination balances the x-averaged evolution in the positive
    /// electrode.
    pub fn leading_order(params: Arc<Parameters>) -> Self {
        Self {
            params,
            composite: false,
        }
    }

    /// Recombination balances the oxygen flux out of the separator.
    pub fn composite(params: Arc<Parameters>) -> Self {
        Self {
            params,
            composite: true,
        }
    }
}

impl Submodel for DiffusionLimited {
    fn name(&self) -> &str {
        if self.composite {
            "negative oxygen composite diffusion-limited"
        } else {
            "negative oxygen leading-order diffusion-limited"
        }
    }

    fn coupled_inputs(&self) -> Vec<String> {
        if self.composite {
            vec![oxygen_concentration_names()[1].clone()]
        } else {
            vec![Reaction::Oxygen.x_averaged_current_density(Electrode::Positive)]
        }
    }

    fn coupled_outputs(&self) -> Vec<String> {
        current_names(Electrode::Negative)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let params = &self.params;
        let oxygen = &params.oxygen;
        let geometry = &params.geometry;
        let into_negative = if self.composite {
            let c_ox_s = vars.get(&oxygen_concentration_names()[1])?;
            let eps_s = vars.get(&leading_order("X-averaged separator porosity"))?;
            let d_eff = &oxygen.diffusivity * eps_s.pow(&params.electrolyte.b);
            d_eff * c_ox_s.gradient().boundary_value(Side::Left)
        } else {
            let j_p = vars.get(&Reaction::Oxygen.x_averaged_current_density(Electrode::Positive))?;
            &oxygen.s_p * &geometry.l_p * j_p
        };
        let j_n = -into_negative / (&oxygen.s_n * &geometry.l_n);
        Ok(averaged_current(Electrode::Negative, j_n))
    }
}

pub mod diffusion {
    use super::*;

    /// No dissolved oxygen.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct NoOxygen;

    impl Submodel for NoOxygen {
        fn name(&self) -> &str {
            "no oxygen diffusion"
        }

        fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
            let zero = Expr::zeros(DomainSpec::on(Domain::CurrentCollector));
            Ok(cell_field(
                &oxygen_concentration_names(),
                OXYGEN_CONCENTRATION,
                broadcast_cell(&zero),
                zero,
            ))
        }
    }

    fn oxygen_source(
        vars: &RegistryView<'_>,
        params: &Parameters,
        electrode: Electrode,
        name: &str,
    ) -> ModelResult<Expr> {
        Ok(params.oxygen.oxygen_stoichiometry(electrode) * vars.get(name)?)
    }

    /// Leading-order oxygen diffusion: one x-averaged concentration state.
    #[derive(Clone, Debug)]
    pub struct LeadingOrder {
        params: Arc<Parameters>,
    }

    impl LeadingOrder {
        pub fn new(params: Arc<Parameters>) -> Self {
            Self { params }
        }
    }

    impl Submodel for LeadingOrder {
        fn name(&self) -> &str {
            "leading-order oxygen diffusion"
        }

        fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
            let c = Expr::from(Variable::on(
                X_AVERAGED_OXYGEN_CONCENTRATION,
                Domain::CurrentCollector,
            ));
            Ok(cell_field(
                &oxygen_concentration_names(),
                OXYGEN_CONCENTRATION,
                broadcast_cell(&c),
                c,
            ))
        }

        fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            let params = &self.params;
            let c = vars.get(X_AVERAGED_OXYGEN_CONCENTRATION)?;
            let eps = get_regions(vars, porosity_names().map(|n| x_averaged(&n)))?;
            let deps = get_regions(vars, porosity_change_names().map(|n| x_averaged(&n)))?;
            let acceleration = vars.get(TRANSVERSE_ACCELERATION)?;

            let mut source = Expr::zero();
            for e in Electrode::BOTH {
                let name = Reaction::Oxygen.x_averaged_current_density(e);
                let s_j = oxygen_source(vars, params, e, &name)?;
                source = source + params.geometry.electrode_length(e) * s_j;
            }
            let rhs = (source
                - &c * length_weighted(params, &deps)
                - &c * &params.geometry.l_s * acceleration)
                / length_weighted(params, &eps);
            Ok(NamedExprs::new().with(X_AVERAGED_OXYGEN_CONCENTRATION, rhs))
        }

        fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            Ok(NamedExprs::new().with(X_AVERAGED_OXYGEN_CONCENTRATION, &self.params.oxygen.c_init))
        }
    }

    /// First-order quasi-static oxygen diffusion about the embedded
    /// leading-order concentration.
    #[derive(Clone, Debug)]
    pub struct FirstOrder {
        params: Arc<Parameters>,
    }

    impl FirstOrder {
        pub fn new(params: Arc<Parameters>) -> Self {
            Self { params }
        }
    }

    impl Submodel for FirstOrder {
        fn name(&self) -> &str {
            "first-order oxygen diffusion"
        }

        fn coupled_outputs(&self) -> Vec<String> {
            cell_field_names(&oxygen_concentration_names(), OXYGEN_CONCENTRATION)
        }

        fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            let params = &self.params;
            let lo = |name: &str| vars.get(&leading_order(name));
            let c_0 = lo(X_AVERAGED_OXYGEN_CONCENTRATION)?;
            let eps_0 = get_regions(vars, porosity_names().map(|n| leading_order(&x_averaged(&n))))?;
            let deps_0 = get_regions(
                vars,
                porosity_change_names().map(|n| leading_order(&x_averaged(&n))),
            )?;

            let mut sources = [0, 1, 2].map(|k| -(&deps_0[k] * &c_0));
            for e in Electrode::BOTH {
                let name = leading_order(&Reaction::Oxygen.x_averaged_current_density(e));
                let k = e.region_index();
                sources[k] = oxygen_source(vars, params, e, &name)? + &sources[k];
            }
            let diffusivities =
                eps_0.map(|eps| &params.oxygen.diffusivity * eps.pow(&params.electrolyte.b));
            let profile =
                quasi_static_profile(&sources, &diffusivities, params.geometry.lengths());

            let c_e = &params.electrolyte.c_e;
            let [p0, p1, p2] = profile;
            let [n, s, p] = Domain::CELL_REGIONS;
            let regions = [
                c_0.broadcast(n) + c_e * p0,
                c_0.broadcast(s) + c_e * p1,
                c_0.broadcast(p) + c_e * p2,
            ];
            Ok(resolved_cell_field(
                &oxygen_concentration_names(),
                OXYGEN_CONCENTRATION,
                regions,
            ))
        }
    }

    /// Composite oxygen diffusion in the separator and positive electrode;
    /// the negative electrode consumes all oxygen that reaches it.
    #[derive(Clone, Debug)]
    pub struct Composite {
        params: Arc<Parameters>,
        extension: Extension,
    }

    impl Composite {
        pub fn new(params: Arc<Parameters>, extension: Extension) -> Self {
            Self { params, extension }
        }
    }

    impl Submodel for Composite {
        fn name(&self) -> &str {
            "composite oxygen diffusion"
        }

        fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
            let names = oxygen_concentration_names();
            let regions = [
                Expr::zeros(on_region(Domain::NegativeElectrode)),
                Expr::from(Variable::new(names[1].as_str(), on_region(Domain::Separator))),
                Expr::from(Variable::new(
                    names[2].as_str(),
                    on_region(Domain::PositiveElectrode),
                )),
            ];
            Ok(resolved_cell_field(&names, OXYGEN_CONCENTRATION, regions))
        }

        fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            let params = &self.params;
            let names = oxygen_concentration_names();
            let c = get_regions(vars, names.clone())?;
            let v = get_regions(vars, velocity_names())?;
            let eps_names = porosity_names();
            let change_names = porosity_change_names();

            let mut rhs = NamedExprs::new();
            for k in [1, 2] {
                let region = Domain::CELL_REGIONS[k];
                let eps = self.extension.read(vars, &eps_names[k], region)?;
                let deps = self.extension.read(vars, &change_names[k], region)?;
                let d_eff = &params.oxygen.diffusivity * eps.pow(&params.electrolyte.b);
                let flux = -(d_eff * c[k].gradient()) + &c[k] * &v[k];
                let mut production = -flux.divergence() - &c[k] * deps;
                if k == Electrode::Positive.region_index() {
                    let j = Reaction::Oxygen.current_density(Electrode::Positive);
                    let j = self.extension.read(vars, &j, region)?;
                    production = production + &params.oxygen.s_p * j;
                }
                rhs.insert(names[k].as_str(), production / eps);
            }
            Ok(rhs)
        }

        fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
            let names = oxygen_concentration_names();
            Ok(names[1..]
                .iter()
                .map(|name| (name.clone(), self.params.oxygen.c_init.clone()))
                .collect())
        }

        fn set_boundary_conditions(
            &self,
            _vars: &RegistryView<'_>,
        ) -> ModelResult<BTreeMap<String, BoundaryConditions>> {
            let names = oxygen_concentration_names();
            Ok(BTreeMap::from([
                (
                    names[1].clone(),
                    BoundaryConditions::from([(Side::Left, BoundaryCondition::dirichlet(0.0))]),
                ),
                (
                    names[2].clone(),
                    BoundaryConditions::from([(Side::Right, BoundaryCondition::neumann(0.0))]),
                ),
            ]))
        }
    }
}

//! Interface submodels: the main charge-transfer reaction of each
//! electrode.

use std::sync::Arc;

use ec_core::Domain;
use ec_expr::{Expr, Variable};
use ec_model::{ModelResult, NamedExprs, RegistryView, Submodel};
use ec_options::SurfaceForm;

use crate::common::{Electrode, leading_order, x_averaged};
use crate::current_collector::CURRENT_DENSITY;
use crate::electrode_ohm::potential_name;
use crate::electrolyte::{X_AVERAGED_CONCENTRATION, concentration_names, potential_names};
use crate::kinetics::{InterfaceKinetics, KineticsLaw, linearized, partials};
use crate::oxygen::{X_AVERAGED_OXYGEN_CONCENTRATION, tafel};
use crate::parameters::Parameters;
use crate::reactions::{Reaction, Reactions};
use crate::thermal::X_AVERAGED_CELL_TEMPERATURE;

pub fn surface_potential_difference_name(electrode: Electrode) -> String {
    format!("{} electrode surface potential difference", electrode.name())
}

pub fn exchange_current_density_name(electrode: Electrode) -> String {
    format!("{} electrode exchange current density", electrode.name())
}

fn electrolyte_concentration_name(electrode: Electrode) -> String {
    concentration_names()[electrode.region_index()].clone()
}

fn temperature_name(electrode: Electrode) -> String {
    format!("{} electrode temperature", electrode.name())
}

/// Average interfacial current density that carries the whole applied
/// current across the electrode.
fn total_current_density(
    vars: &RegistryView<'_>,
    params: &Parameters,
    electrode: Electrode,
) -> ModelResult<Expr> {
    let i_cc = vars.get(CURRENT_DENSITY)?;
    Ok(electrode.current_sign() * i_cc / params.geometry.electrode_length(electrode))
}

/// A field and its x-average, declared together.
fn with_average(vars: &mut NamedExprs, name: &str, average: &Expr, domain: Domain) {
    vars.insert(name, average.broadcast(domain));
    vars.insert(x_averaged(name), average);
}

/// Electrolyte concentration and temperature, x-averaged over one
/// electrode.
fn averaged_conditions(
    vars: &RegistryView<'_>,
    electrode: Electrode,
) -> ModelResult<(Expr, Expr)> {
    Ok((
        vars.get(&x_averaged(&electrolyte_concentration_name(electrode)))?,
        vars.get(&x_averaged(&temperature_name(electrode)))?,
    ))
}

fn averaged_inputs(electrode: Electrode) -> Vec<String> {
    vec![
        CURRENT_DENSITY.to_string(),
        x_averaged(&electrolyte_concentration_name(electrode)),
        x_averaged(&temperature_name(electrode)),
    ]
}

/// Explicit interface: the surface potential difference is whatever drives
/// the applied current through symmetric Butler-Volmer kinetics.
#[derive(Clone, Debug)]
pub struct InverseButlerVolmer {
    name: String,
    params: Arc<Parameters>,
    electrode: Electrode,
}

impl InverseButlerVolmer {
    pub fn new(params: Arc<Parameters>, electrode: Electrode) -> Self {
        Self {
            name: format!("{electrode} inverse Butler-Volmer interface"),
            params,
            electrode,
        }
    }
}

impl Submodel for InverseButlerVolmer {
    fn name(&self) -> &str {
        &self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        averaged_inputs(self.electrode)
    }

    fn coupled_outputs(&self) -> Vec<String> {
        let e = self.electrode;
        [
            Reaction::Main.current_density(e),
            exchange_current_density_name(e),
            surface_potential_difference_name(e),
        ]
        .into_iter()
        .flat_map(|name| [x_averaged(&name), name])
        .collect()
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let e = self.electrode;
        let params = self.params.electrode(e);
        let (c_e, t) = averaged_conditions(vars, e)?;
        let j = total_current_density(vars, &self.params, e)?;
        let j0 = params.exchange_current_density(&c_e, &t);
        let kinetics = InterfaceKinetics::new(KineticsLaw::SymmetricButlerVolmer, params);
        let delta_phi = kinetics.surface_potential_difference(&j, &c_e, &t);

        let mut out = NamedExprs::new();
        with_average(&mut out, &Reaction::Main.current_density(e), &j, e.domain());
        with_average(&mut out, &exchange_current_density_name(e), &j0, e.domain());
        with_average(&mut out, &surface_potential_difference_name(e), &delta_phi, e.domain());
        Ok(out)
    }
}

/// How the double-layer charge balance enters the system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DoubleLayer {
    /// Capacitive: the surface potential difference has a rate equation.
    Differential,
    /// Instantaneous: the reaction currents balance the applied current.
    Algebraic,
}

impl DoubleLayer {
    pub fn for_surface_form(form: SurfaceForm) -> Option<DoubleLayer> {
        match form {
            SurfaceForm::False => None,
            SurfaceForm::Differential => Some(DoubleLayer::Differential),
            SurfaceForm::Algebraic => Some(DoubleLayer::Algebraic),
        }
    }
}

/// Surface-form interface: the x-averaged surface potential difference is a
/// state and the current follows from forward kinetics.
#[derive(Clone, Debug)]
pub struct SurfaceFormButlerVolmer {
    name: String,
    params: Arc<Parameters>,
    electrode: Electrode,
    double_layer: DoubleLayer,
    law: KineticsLaw,
    reactions: Reactions,
}

impl SurfaceFormButlerVolmer {
    pub fn new(
        params: Arc<Parameters>,
        electrode: Electrode,
        double_layer: DoubleLayer,
        law: KineticsLaw,
        reactions: Reactions,
    ) -> Self {
        let form = match double_layer {
            DoubleLayer::Differential => "differential",
            DoubleLayer::Algebraic => "algebraic",
        };
        Self {
            name: format!("{electrode} {form} surface form interface"),
            params,
            electrode,
            double_layer,
            law,
            reactions,
        }
    }

    fn state(&self) -> String {
        x_averaged(&surface_potential_difference_name(self.electrode))
    }
}

impl Submodel for SurfaceFormButlerVolmer {
    fn name(&self) -> &str {
        &self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        averaged_inputs(self.electrode)
    }

    fn coupled_outputs(&self) -> Vec<String> {
        let e = self.electrode;
        [
            Reaction::Main.current_density(e),
            exchange_current_density_name(e),
        ]
        .into_iter()
        .flat_map(|name| [x_averaged(&name), name])
        .collect()
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let delta_phi = Expr::from(Variable::on(self.state(), Domain::CurrentCollector));
        let mut vars = NamedExprs::new();
        with_average(
            &mut vars,
            &surface_potential_difference_name(self.electrode),
            &delta_phi,
            self.electrode.domain(),
        );
        Ok(vars)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let e = self.electrode;
        let params = self.params.electrode(e);
        let (c_e, t) = averaged_conditions(vars, e)?;
        let delta_phi = vars.get(&self.state())?;
        let j = InterfaceKinetics::new(self.law, params).current(&c_e, &t, &delta_phi);
        let j0 = params.exchange_current_density(&c_e, &t);

        let mut out = NamedExprs::new();
        with_average(&mut out, &Reaction::Main.current_density(e), &j, e.domain());
        with_average(&mut out, &exchange_current_density_name(e), &j0, e.domain());
        Ok(out)
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        if self.double_layer != DoubleLayer::Differential {
            return Ok(NamedExprs::new());
        }
        let imbalance = self.charge_imbalance(vars)?;
        let c_dl = &self.params.electrode(self.electrode).c_dl;
        Ok(NamedExprs::new().with(self.state(), imbalance / c_dl))
    }

    fn set_algebraic(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        if self.double_layer != DoubleLayer::Algebraic {
            return Ok(NamedExprs::new());
        }
        Ok(NamedExprs::new().with(self.state(), self.charge_imbalance(vars)?))
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let params = &self.params;
        let ocp = params
            .electrode(self.electrode)
            .ocp(&params.electrolyte.c_init, &params.thermal.t_ambient);
        Ok(NamedExprs::new().with(self.state(), ocp))
    }
}

impl SurfaceFormButlerVolmer {
    /// Applied current not carried by any interfacial reaction.
    fn charge_imbalance(&self, vars: &RegistryView<'_>) -> ModelResult<Expr> {
        let e = self.electrode;
        let total = total_current_density(vars, &self.params, e)?;
        let carried = self
            .reactions
            .iter()
            .map(|r| vars.get(&r.x_averaged_current_density(e)))
            .sum::<ModelResult<Expr>>()?;
        Ok(total - carried)
    }
}

/// Leading-order kinetics evaluated at the embedded model's state.
struct LeadingOrderPoint {
    c_e: Expr,
    t: Expr,
    delta_phi: Expr,
}

impl LeadingOrderPoint {
    fn read(vars: &RegistryView<'_>, electrode: Electrode) -> ModelResult<Self> {
        let lo = |name: &str| vars.get(&leading_order(name));
        Ok(Self {
            c_e: lo(X_AVERAGED_CONCENTRATION)?,
            t: lo(X_AVERAGED_CELL_TEMPERATURE)?,
            delta_phi: lo(&x_averaged(&surface_potential_difference_name(electrode)))?,
        })
    }
}

/// First-order correction to the x-averaged surface potential difference
/// from the first-order electrolyte concentration. The sensitivities sum
/// over every reaction in the electrode whose current depends on the
/// concentration or the potential difference.
#[derive(Clone, Debug)]
pub struct InverseFirstOrderKinetics {
    name: String,
    params: Arc<Parameters>,
    electrode: Electrode,
    law: KineticsLaw,
    reactions: Reactions,
}

impl InverseFirstOrderKinetics {
    pub fn new(
        params: Arc<Parameters>,
        electrode: Electrode,
        law: KineticsLaw,
        reactions: Reactions,
    ) -> Self {
        Self {
            name: format!("{electrode} x-averaged first-order interface"),
            params,
            electrode,
            law,
            reactions,
        }
    }

    /// `(dj/dc, dj/d(delta phi))` summed over the reactions at `point`.
    fn sensitivities(
        &self,
        vars: &RegistryView<'_>,
        point: &LeadingOrderPoint,
    ) -> ModelResult<(Expr, Expr)> {
        let e = self.electrode;
        let kinetics = InterfaceKinetics::new(self.law, self.params.electrode(e));
        let (mut dj_dc, mut dj_ddeltaphi) = partials(
            &|c: &Expr, phi: &Expr| kinetics.current(c, &point.t, phi),
            &point.c_e,
            &point.delta_phi,
        )?;
        // Recombination in the negative electrode is diffusion limited.
        if self.reactions.has_oxygen() && e == Electrode::Positive {
            let c_ox = vars.get(&leading_order(X_AVERAGED_OXYGEN_CONCENTRATION))?;
            let (dc, dphi) = partials(
                &|c: &Expr, phi: &Expr| tafel(&self.params, c, &point.t, &c_ox, phi),
                &point.c_e,
                &point.delta_phi,
            )?;
            dj_dc = dj_dc + dc;
            dj_ddeltaphi = dj_ddeltaphi + dphi;
        }
        Ok((dj_dc, dj_ddeltaphi))
    }
}

impl Submodel for InverseFirstOrderKinetics {
    fn name(&self) -> &str {
        &self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        vec![x_averaged(&electrolyte_concentration_name(self.electrode))]
    }

    fn coupled_outputs(&self) -> Vec<String> {
        vec![x_averaged(&surface_potential_difference_name(self.electrode))]
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let e = self.electrode;
        let point = LeadingOrderPoint::read(vars, e)?;
        let c_e = vars.get(&x_averaged(&electrolyte_concentration_name(e)))?;
        let c_scale = &self.params.electrolyte.c_e;
        let c_1 = (c_e - &point.c_e) / c_scale;

        let (dj_dc, dj_ddeltaphi) = self.sensitivities(vars, &point)?;
        let delta_phi_1 = -(dj_dc * c_1) / dj_ddeltaphi;

        Ok(NamedExprs::new().with(
            x_averaged(&surface_potential_difference_name(e)),
            &point.delta_phi + c_scale * delta_phi_1,
        ))
    }
}

/// Spatially resolved first-order interfacial current, linearized about
/// the leading-order state.
#[derive(Clone, Debug)]
pub struct FirstOrderButlerVolmer {
    name: String,
    params: Arc<Parameters>,
    electrode: Electrode,
    law: KineticsLaw,
}

impl FirstOrderButlerVolmer {
    pub fn new(params: Arc<Parameters>, electrode: Electrode, law: KineticsLaw) -> Self {
        Self {
            name: format!("{electrode} first-order interface"),
            params,
            electrode,
            law,
        }
    }

    fn inputs(&self) -> [String; 3] {
        let e = self.electrode;
        [
            potential_name(e),
            potential_names()[e.region_index()].clone(),
            electrolyte_concentration_name(e),
        ]
    }
}

impl Submodel for FirstOrderButlerVolmer {
    fn name(&self) -> &str {
        &self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        self.inputs().to_vec()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        let e = self.electrode;
        let j = Reaction::Main.current_density(e);
        vec![x_averaged(&j), j, surface_potential_difference_name(e)]
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let e = self.electrode;
        let region = e.domain();
        let [phi_s, phi_e, c_e] = self.inputs();
        let delta_phi = vars.get(&phi_s)? - vars.get(&phi_e)?;
        let c_e = vars.get(&c_e)?;

        let point = LeadingOrderPoint::read(vars, e)?;
        let t_0 = point.t.broadcast(region);
        let c_0 = point.c_e.broadcast(region);
        let delta_phi_0 = point.delta_phi.broadcast(region);
        let kinetics = InterfaceKinetics::new(self.law, self.params.electrode(e));
        let j = linearized(
            &|c: &Expr, phi: &Expr| kinetics.current(c, &t_0, phi),
            (&c_0, &delta_phi_0),
            (&c_e, &delta_phi),
        )?;

        let name = Reaction::Main.current_density(e);
        Ok(NamedExprs::new()
            .with(x_averaged(&name), j.x_average())
            .with(name, j)
            .with(surface_potential_difference_name(e), delta_phi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::DomainSpec;
    use ec_model::VariableRegistry;
    use ec_model::testing::check_submodel;

    use crate::common::on_region;

    fn cc() -> DomainSpec {
        DomainSpec::on(Domain::CurrentCollector)
    }

    fn averaged_seed() -> VariableRegistry {
        let mut seed = VariableRegistry::new();
        for e in Electrode::BOTH {
            for name in averaged_inputs(e) {
                if !seed.contains(&name) {
                    seed.declare(name, Expr::filled(1.0, cc()), "test").unwrap();
                }
            }
        }
        seed
    }

    #[test]
    fn inverse_kinetics_is_explicit() {
        let model = InverseButlerVolmer::new(Arc::default(), Electrode::Positive);
        let check = check_submodel(&model, &averaged_seed()).unwrap();
        assert!(check.equations.is_empty());
        let j = check
            .registry
            .get("Positive electrode interfacial current density")
            .unwrap();
        assert_eq!(j.domain().unwrap(), on_region(Domain::PositiveElectrode));
    }

    #[test]
    fn surface_form_state_follows_the_double_layer() {
        for (double_layer, differential) in
            [(DoubleLayer::Differential, true), (DoubleLayer::Algebraic, false)]
        {
            let model = SurfaceFormButlerVolmer::new(
                Arc::default(),
                Electrode::Negative,
                double_layer,
                KineticsLaw::SymmetricButlerVolmer,
                Reactions::default(),
            );
            let check = check_submodel(&model, &averaged_seed()).unwrap();
            assert_eq!(check.equations.rhs().len(), usize::from(differential));
            assert_eq!(check.equations.algebraic().len(), usize::from(!differential));
            let state = check.equations.initial_conditions().keys().next().unwrap();
            assert_eq!(state.name(), "X-averaged negative electrode surface potential difference");
        }
    }

    fn first_order_seed(e: Electrode) -> VariableRegistry {
        let mut seed = VariableRegistry::new();
        for name in [
            X_AVERAGED_CONCENTRATION.to_string(),
            X_AVERAGED_CELL_TEMPERATURE.to_string(),
            x_averaged(&surface_potential_difference_name(e)),
        ] {
            seed.declare(leading_order(&name), Expr::filled(1.0, cc()), "test")
                .unwrap();
        }
        seed
    }

    #[test]
    fn first_order_kinetics_corrects_the_average_potential() {
        let e = Electrode::Negative;
        let mut seed = first_order_seed(e);
        seed.declare(
            x_averaged(&electrolyte_concentration_name(e)),
            Expr::filled(1.0, cc()),
            "test",
        )
        .unwrap();
        let model = InverseFirstOrderKinetics::new(
            Arc::default(),
            e,
            KineticsLaw::SymmetricButlerVolmer,
            Reactions::default(),
        );
        let check = check_submodel(&model, &seed).unwrap();
        assert!(
            check
                .registry
                .contains("X-averaged negative electrode surface potential difference")
        );
    }

    fn corrected_potential(e: Electrode, reactions: Reactions) -> String {
        let mut seed = first_order_seed(e);
        seed.declare(
            x_averaged(&electrolyte_concentration_name(e)),
            Expr::filled(1.0, cc()),
            "test",
        )
        .unwrap();
        seed.declare(
            leading_order(X_AVERAGED_OXYGEN_CONCENTRATION),
            Expr::filled(1.0, cc()),
            "test",
        )
        .unwrap();
        let model = InverseFirstOrderKinetics::new(
            Arc::default(),
            e,
            KineticsLaw::SymmetricButlerVolmer,
            reactions,
        );
        let check = check_submodel(&model, &seed).unwrap();
        let name = x_averaged(&surface_potential_difference_name(e));
        check.registry.get(&name).unwrap().to_string()
    }

    #[test]
    fn first_order_correction_includes_oxygen_evolution() {
        let with_oxygen = corrected_potential(Electrode::Positive, Reactions::new(true));
        let without = corrected_potential(Electrode::Positive, Reactions::new(false));
        assert!(with_oxygen.contains("Positive electrode oxygen exchange-current density"));
        assert!(with_oxygen.contains("Oxygen reference OCP"));
        assert!(!without.contains("Oxygen reference OCP"));

        // Recombination is diffusion limited, so it leaves the negative
        // correction unchanged.
        assert_eq!(
            corrected_potential(Electrode::Negative, Reactions::new(true)),
            corrected_potential(Electrode::Negative, Reactions::new(false)),
        );
    }

    #[test]
    fn first_order_current_is_resolved() {
        let e = Electrode::Positive;
        let model = FirstOrderButlerVolmer::new(Arc::default(), e, KineticsLaw::SymmetricButlerVolmer);
        let mut seed = first_order_seed(e);
        for name in model.inputs() {
            seed.declare(name, Expr::filled(1.0, on_region(e.domain())), "test")
                .unwrap();
        }
        let check = check_submodel(&model, &seed).unwrap();
        let j = check
            .registry
            .get("Positive electrode interfacial current density")
            .unwrap();
        assert_eq!(j.domain().unwrap(), on_region(e.domain()));
    }
}

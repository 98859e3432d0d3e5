//! Solid-phase (electrode) potential from Ohm's law.

use std::sync::Arc;

use ec_core::Side;
use ec_expr::Expr;
use ec_model::submodel::names;
use ec_model::{ModelResult, NamedExprs, RegistryView, Submodel};

use crate::common::{Electrode, leading_order, x_averaged};
use crate::current_collector::{CURRENT_DENSITY, LOCAL_POTENTIAL_DIFFERENCE, NEGATIVE_POTENTIAL};
use crate::electrolyte::potential_names;
use crate::interface::surface_potential_difference_name;
use crate::parameters::Parameters;

pub fn potential_name(electrode: Electrode) -> String {
    format!("{} electrode potential", electrode.name())
}

fn inputs(electrode: Electrode) -> Vec<String> {
    match electrode {
        Electrode::Negative => names([NEGATIVE_POTENTIAL]),
        Electrode::Positive => vec![
            x_averaged(&potential_names()[2]),
            x_averaged(&surface_potential_difference_name(Electrode::Positive)),
        ],
    }
}

fn outputs(electrode: Electrode) -> Vec<String> {
    let name = potential_name(electrode);
    let mut out = vec![x_averaged(&name), name];
    if electrode == Electrode::Positive {
        out.push(LOCAL_POTENTIAL_DIFFERENCE.to_string());
    }
    out
}

/// X-averaged solid potential: the collector potential in the negative
/// electrode, electrolyte potential plus surface potential difference in
/// the positive.
fn averaged_potential(vars: &RegistryView<'_>, electrode: Electrode) -> ModelResult<Expr> {
    match electrode {
        Electrode::Negative => vars.get(NEGATIVE_POTENTIAL),
        Electrode::Positive => {
            let phi_e = vars.get(&x_averaged(&potential_names()[2]))?;
            let delta_phi =
                vars.get(&x_averaged(&surface_potential_difference_name(Electrode::Positive)))?;
            Ok(phi_e + delta_phi)
        }
    }
}

/// Leading-order ohm: the solid potential is uniform in each electrode.
#[derive(Clone, Debug)]
pub struct LeadingOrder {
    name: String,
    electrode: Electrode,
}

impl LeadingOrder {
    pub fn new(electrode: Electrode) -> Self {
        Self {
            name: format!("{electrode} electrode leading-order ohm"),
            electrode,
        }
    }
}

impl Submodel for LeadingOrder {
    fn name(&self) -> &str {
        &self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        inputs(self.electrode)
    }

    fn coupled_outputs(&self) -> Vec<String> {
        outputs(self.electrode)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let e = self.electrode;
        let phi_s = averaged_potential(vars, e)?;
        let name = potential_name(e);
        let mut out = NamedExprs::new()
            .with(name.as_str(), phi_s.broadcast(e.domain()))
            .with(x_averaged(&name), &phi_s);
        if e == Electrode::Positive {
            out.insert(LOCAL_POTENTIAL_DIFFERENCE, phi_s - vars.get(NEGATIVE_POTENTIAL)?);
        }
        Ok(out)
    }
}

/// Composite ohm: the leading-order current drives a parabolic potential
/// drop across each electrode.
#[derive(Clone, Debug)]
pub struct Composite {
    name: String,
    params: Arc<Parameters>,
    electrode: Electrode,
}

impl Composite {
    pub fn new(params: Arc<Parameters>, electrode: Electrode) -> Self {
        Self {
            name: format!("{electrode} electrode composite ohm"),
            params,
            electrode,
        }
    }

    /// `i / (2 sigma_eff l)`, with the effective conductivity of the
    /// leading-order solid fraction.
    fn drop_scale(&self, vars: &RegistryView<'_>) -> ModelResult<Expr> {
        let e = self.electrode;
        let i_cc = vars.get(&leading_order(CURRENT_DENSITY))?;
        let porosity = format!("X-averaged {e} electrode porosity");
        let eps = vars.get(&leading_order(&porosity))?;
        let sigma = &self.params.electrode(e).sigma;
        let sigma_eff = sigma * (1.0 - eps).pow(&self.params.electrolyte.b);
        let l = self.params.geometry.electrode_length(e);
        Ok(i_cc / (2.0 * sigma_eff * l))
    }
}

impl Submodel for Composite {
    fn name(&self) -> &str {
        &self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        inputs(self.electrode)
    }

    fn coupled_outputs(&self) -> Vec<String> {
        outputs(self.electrode)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let e = self.electrode;
        let region = e.domain();
        let l = self.params.geometry.electrode_length(e);
        let phi_av = averaged_potential(vars, e)?;
        let scale = self.drop_scale(vars)?.broadcast(region);
        let x = Expr::spatial_variable(region);

        let name = potential_name(e);
        let mut out = NamedExprs::new();
        match e {
            Electrode::Negative => {
                // zero at the collector, no current at the separator
                let phi_s = phi_av.broadcast(region) + scale * &x * (&x - 2.0 * l);
                out.insert(x_averaged(&name), phi_s.x_average());
                out.insert(name, phi_s);
            }
            Electrode::Positive => {
                // zero mean correction, no current at the separator
                let y = x - (1.0 - l);
                let shape = y.pow(2.0) - l.pow(2.0) / 3.0;
                let phi_s = phi_av.broadcast(region) - scale * shape;
                let v_local = phi_s.boundary_value(Side::Right) - vars.get(NEGATIVE_POTENTIAL)?;
                out.insert(x_averaged(&name), &phi_av);
                out.insert(name, phi_s);
                out.insert(LOCAL_POTENTIAL_DIFFERENCE, v_local);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::{Domain, DomainSpec};
    use ec_model::VariableRegistry;
    use ec_model::testing::check_submodel;

    use crate::common::on_region;

    fn seed() -> VariableRegistry {
        let cc = DomainSpec::on(Domain::CurrentCollector);
        let mut seed = VariableRegistry::new();
        let names = inputs(Electrode::Negative)
            .into_iter()
            .chain(inputs(Electrode::Positive))
            .chain([
                leading_order(CURRENT_DENSITY),
                leading_order("X-averaged negative electrode porosity"),
                leading_order("X-averaged positive electrode porosity"),
            ]);
        for name in names {
            seed.declare(name, Expr::filled(0.5, cc), "test").unwrap();
        }
        seed
    }

    #[test]
    fn positive_electrode_sets_the_local_voltage() {
        for e in Electrode::BOTH {
            let check = check_submodel(&LeadingOrder::new(e), &seed()).unwrap();
            assert_eq!(
                check.registry.contains(LOCAL_POTENTIAL_DIFFERENCE),
                e == Electrode::Positive
            );
        }
    }

    #[test]
    fn composite_potential_is_resolved() {
        for e in Electrode::BOTH {
            let check = check_submodel(&Composite::new(Arc::default(), e), &seed()).unwrap();
            let phi = check.registry.get(&potential_name(e)).unwrap();
            assert_eq!(phi.domain().unwrap(), on_region(e.domain()));
        }
        let check =
            check_submodel(&Composite::new(Arc::default(), Electrode::Positive), &seed()).unwrap();
        let v = check.registry.get(LOCAL_POTENTIAL_DIFFERENCE).unwrap();
        assert_eq!(v.domain().unwrap(), DomainSpec::on(Domain::CurrentCollector));
    }
}

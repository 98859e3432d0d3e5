//! Electrolyte conductivity: the electrolyte potential.

use std::sync::Arc;

use ec_core::Domain;
use ec_expr::Expr;
use ec_model::{ModelResult, NamedExprs, RegistryView, Submodel};

use super::{POTENTIAL, X_AVERAGED_CONCENTRATION, concentration_names, potential_names};
use crate::common::{
    Electrode, broadcast_cell, cell_field, cell_field_names, get_regions, leading_order,
    resolved_cell_field, x_averaged,
};
use crate::current_collector::CURRENT_DENSITY;
use crate::electrode_ohm::potential_name;
use crate::interface::surface_potential_difference_name;
use crate::parameters::Parameters;
use crate::porosity::porosity_names;
use crate::thermal::X_AVERAGED_CELL_TEMPERATURE;

/// The x-averaged electrolyte potential in the negative electrode, read
/// off from the solid potential and the surface potential difference.
fn negative_electrolyte_potential(vars: &RegistryView<'_>) -> ModelResult<Expr> {
    let phi_s_n = vars.get(&x_averaged(&potential_name(Electrode::Negative)))?;
    let delta_phi_n = vars.get(&x_averaged(&surface_potential_difference_name(
        Electrode::Negative,
    )))?;
    Ok(phi_s_n - delta_phi_n)
}

fn inputs() -> Vec<String> {
    vec![
        x_averaged(&potential_name(Electrode::Negative)),
        x_averaged(&surface_potential_difference_name(Electrode::Negative)),
    ]
}

/// Leading-order conductivity: the electrolyte potential is uniform
/// through the cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeadingOrder;

impl Submodel for LeadingOrder {
    fn name(&self) -> &str {
        "leading-order electrolyte conductivity"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        inputs()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        cell_field_names(&potential_names(), POTENTIAL)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let phi_e = negative_electrolyte_potential(vars)?;
        Ok(cell_field(
            &potential_names(),
            POTENTIAL,
            broadcast_cell(&phi_e),
            phi_e,
        ))
    }
}

/// First-order conductivity: concentration overpotential and ohmic drop
/// on top of the leading-order potential.
#[derive(Clone, Debug)]
pub struct FirstOrder {
    params: Arc<Parameters>,
}

impl FirstOrder {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }

    /// Ohmic drop across each region for a current `i_cc` entering the
    /// electrolyte uniformly in each electrode.
    fn ohmic_drop(&self, i_cc: &Expr, kappa: &[Expr; 3]) -> [Expr; 3] {
        let [n, s, p] = Domain::CELL_REGIONS;
        let geometry = &self.params.geometry;
        let (l_n, l_s, l_p) = (&geometry.l_n, &geometry.l_s, &geometry.l_p);
        let b = |e: &Expr, region: Domain| e.broadcast(region);

        let drop_n = -(b(&(i_cc / (2.0 * l_n * &kappa[0])), n)
            * Expr::spatial_variable(n).pow(2.0));
        let at_l_n = -(i_cc * l_n) / (2.0 * &kappa[0]);
        let drop_s = b(&at_l_n, s)
            - b(&(i_cc / &kappa[1]), s) * (Expr::spatial_variable(s) - l_n);
        let at_l_s = at_l_n - i_cc * l_s / &kappa[1];
        let y_p = Expr::spatial_variable(p) - (1.0 - l_p);
        let drop_p = b(&at_l_s, p)
            - b(&(i_cc / &kappa[2]), p) * (&y_p - y_p.pow(2.0) / (2.0 * l_p));
        [drop_n, drop_s, drop_p]
    }
}

impl Submodel for FirstOrder {
    fn name(&self) -> &str {
        "first-order electrolyte conductivity"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        let mut inputs = inputs();
        inputs.extend(concentration_names());
        inputs
    }

    fn coupled_outputs(&self) -> Vec<String> {
        cell_field_names(&potential_names(), POTENTIAL)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let electrolyte = &self.params.electrolyte;
        let lo = |name: &str| vars.get(&leading_order(name));
        let c_0 = lo(X_AVERAGED_CONCENTRATION)?;
        let t_0 = lo(X_AVERAGED_CELL_TEMPERATURE)?;
        let i_cc = lo(CURRENT_DENSITY)?;
        let eps_0 = get_regions(
            vars,
            porosity_names().map(|name| leading_order(&x_averaged(&name))),
        )?;
        let kappa_0 = electrolyte.conductivity(&c_0, &t_0);
        let kappa = eps_0.map(|eps| &kappa_0 * eps.pow(&electrolyte.b));

        let c = get_regions(vars, concentration_names())?;
        let drops = self.ohmic_drop(&i_cc, &kappa);
        let diffusion_factor = 2.0 * (1.0 - &electrolyte.t_plus);
        let mut profile = Vec::with_capacity(3);
        for ((c_k, drop), region) in c.iter().zip(drops).zip(Domain::CELL_REGIONS) {
            let concentration = &diffusion_factor * (c_k / c_0.broadcast(region)).log();
            profile.push(concentration + drop);
        }

        // pin the negative-electrode average to the leading-order potential
        let offset = negative_electrolyte_potential(vars)? - profile[0].x_average();
        let regions = [0, 1, 2].map(|k| &profile[k] + offset.broadcast(Domain::CELL_REGIONS[k]));
        Ok(resolved_cell_field(&potential_names(), POTENTIAL, regions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::DomainSpec;
    use ec_model::VariableRegistry;
    use ec_model::testing::check_submodel;

    use crate::common::on_region;

    fn seed() -> VariableRegistry {
        let cc = DomainSpec::on(Domain::CurrentCollector);
        let mut seed = VariableRegistry::new();
        for name in inputs() {
            seed.declare(name, Expr::filled(0.5, cc), "test").unwrap();
        }
        seed
    }

    #[test]
    fn leading_order_potential_is_uniform() {
        let check = check_submodel(&LeadingOrder, &seed()).unwrap();
        let phi_e = check.registry.get("X-averaged electrolyte potential").unwrap();
        assert_eq!(phi_e.domain().unwrap(), DomainSpec::on(Domain::CurrentCollector));
        assert_eq!(
            check.registry.get("Separator electrolyte potential").unwrap(),
            &phi_e.broadcast(Domain::Separator)
        );
    }

    #[test]
    fn first_order_potential_is_resolved() {
        let cc = DomainSpec::on(Domain::CurrentCollector);
        let mut seed = seed();
        for name in [X_AVERAGED_CONCENTRATION, X_AVERAGED_CELL_TEMPERATURE, CURRENT_DENSITY] {
            seed.declare(leading_order(name), Expr::filled(1.0, cc), "test")
                .unwrap();
        }
        for name in porosity_names() {
            seed.declare(leading_order(&x_averaged(&name)), Expr::filled(0.3, cc), "test")
                .unwrap();
        }
        for (name, region) in concentration_names().into_iter().zip(Domain::CELL_REGIONS) {
            seed.declare(name, Expr::filled(1.0, on_region(region)), "test")
                .unwrap();
        }
        let check = check_submodel(&FirstOrder::new(Arc::default()), &seed).unwrap();
        let phi_e_p = check.registry.get("Positive electrolyte potential").unwrap();
        assert_eq!(phi_e_p.domain().unwrap(), on_region(Domain::PositiveElectrode));
    }
}

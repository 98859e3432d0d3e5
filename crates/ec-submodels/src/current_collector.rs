//! Current-collector submodels: how the applied current reaches the cell
//! and how the terminal voltage is read off.

use std::collections::BTreeMap;
use std::sync::Arc;

use ec_core::{Domain, DomainSpec, Side};
use ec_expr::{Expr, Variable};
use ec_model::submodel::names;
use ec_model::{
    AssembledModel, BoundaryCondition, BoundaryConditions, Event, ModelResult, NamedExprs,
    RegistryView, Submodel,
};

use crate::parameters::Parameters;

pub const CURRENT_DENSITY: &str = "Current collector current density";
pub const NEGATIVE_POTENTIAL: &str = "Negative current collector potential";
pub const POSITIVE_POTENTIAL: &str = "Positive current collector potential";
pub const LOCAL_POTENTIAL_DIFFERENCE: &str = "Local current collector potential difference";
pub const TERMINAL_VOLTAGE: &str = "Terminal voltage";

/// Positive potential and terminal voltage from the cell's local voltage.
fn terminal_variables(vars: &RegistryView<'_>, resolved: bool) -> ModelResult<NamedExprs> {
    let phi_s_cn = vars.get(NEGATIVE_POTENTIAL)?;
    let v_local = vars.get(LOCAL_POTENTIAL_DIFFERENCE)?;
    let phi_s_cp = phi_s_cn + v_local;
    let voltage = if resolved {
        phi_s_cp.boundary_value(Side::PositiveTab)
    } else {
        phi_s_cp.clone()
    };
    Ok(NamedExprs::new()
        .with(POSITIVE_POTENTIAL, phi_s_cp)
        .with(TERMINAL_VOLTAGE, voltage))
}

fn voltage_events(vars: &RegistryView<'_>, params: &Parameters) -> ModelResult<Vec<Event>> {
    let voltage = vars.get(TERMINAL_VOLTAGE)?;
    Ok(vec![
        Event::termination("Minimum voltage", &voltage - &params.voltage.minimum),
        Event::termination("Maximum voltage", &params.voltage.maximum - &voltage),
    ])
}

/// Uniform current collector: the applied current passes straight through
/// and the negative collector is the potential reference.
#[derive(Clone, Debug)]
pub struct Uniform {
    params: Arc<Parameters>,
}

impl Uniform {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }
}

impl Submodel for Uniform {
    fn name(&self) -> &str {
        "uniform current collector"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        names([LOCAL_POTENTIAL_DIFFERENCE])
    }

    fn coupled_outputs(&self) -> Vec<String> {
        names([POSITIVE_POTENTIAL, TERMINAL_VOLTAGE])
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new()
            .with(
                CURRENT_DENSITY,
                self.params.current.broadcast(Domain::CurrentCollector),
            )
            .with(
                NEGATIVE_POTENTIAL,
                Expr::zeros(DomainSpec::on(Domain::CurrentCollector)),
            ))
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        terminal_variables(vars, false)
    }

    fn set_events(&self, vars: &RegistryView<'_>) -> ModelResult<Vec<Event>> {
        voltage_events(vars, &self.params)
    }
}

/// Shape of the current-collector plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectorGeometry {
    /// 1+1D: a line with the tabs at one end.
    Line,
    /// 2+1D: a plane with tabs on opposite edges.
    Plane,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectorConductivity {
    Finite,
    /// Conductivity large enough that the aspect-ratio scaling drops out.
    QuiteConductive,
}

/// Potential-pair current collector: the negative potential and the current
/// density through the cell are algebraic unknowns in the collector plane.
#[derive(Clone, Debug)]
pub struct PotentialPair {
    name: String,
    geometry: CollectorGeometry,
    conductivity: CollectorConductivity,
    params: Arc<Parameters>,
}

impl PotentialPair {
    pub fn new(
        params: Arc<Parameters>,
        geometry: CollectorGeometry,
        conductivity: CollectorConductivity,
    ) -> Self {
        let shape = match geometry {
            CollectorGeometry::Line => "1+1D",
            CollectorGeometry::Plane => "2+1D",
        };
        let name = match conductivity {
            CollectorConductivity::Finite => format!("potential pair {shape}"),
            CollectorConductivity::QuiteConductive => {
                format!("quite conductive potential pair {shape}")
            }
        };
        Self {
            name,
            geometry,
            conductivity,
            params,
        }
    }

    pub fn geometry(&self) -> CollectorGeometry {
        self.geometry
    }

    /// Effective in-plane conductance of the negative and positive collector.
    fn conductances(&self) -> (Expr, Expr) {
        let cc = &self.params.current_collector;
        let n = &cc.sigma_cn * &cc.l_cn;
        let p = &cc.sigma_cp * &cc.l_cp;
        match self.conductivity {
            CollectorConductivity::Finite => {
                let scale = cc.delta.pow(2.0);
                (n * &scale, p * scale)
            }
            CollectorConductivity::QuiteConductive => (n, p),
        }
    }
}

impl Submodel for PotentialPair {
    fn name(&self) -> &str {
        &self.name
    }

    fn coupled_inputs(&self) -> Vec<String> {
        names([LOCAL_POTENTIAL_DIFFERENCE])
    }

    fn coupled_outputs(&self) -> Vec<String> {
        names([POSITIVE_POTENTIAL, TERMINAL_VOLTAGE])
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let phi_s_cn = Variable::on(NEGATIVE_POTENTIAL, Domain::CurrentCollector);
        let i_cc = Variable::on(CURRENT_DENSITY, Domain::CurrentCollector);
        Ok(NamedExprs::new()
            .with(NEGATIVE_POTENTIAL, &phi_s_cn)
            .with(CURRENT_DENSITY, &i_cc))
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        terminal_variables(vars, true)
    }

    fn set_algebraic(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let phi_s_cn = vars.get(NEGATIVE_POTENTIAL)?;
        let phi_s_cp = vars.get(POSITIVE_POTENTIAL)?;
        let i_cc = vars.get(CURRENT_DENSITY)?;
        let (k_n, k_p) = self.conductances();
        Ok(NamedExprs::new()
            .with(NEGATIVE_POTENTIAL, k_n * phi_s_cn.laplacian() - &i_cc)
            .with(CURRENT_DENSITY, k_p * phi_s_cp.laplacian() + &i_cc))
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new()
            .with(NEGATIVE_POTENTIAL, 0.0)
            .with(CURRENT_DENSITY, self.params.current.clone()))
    }

    fn set_boundary_conditions(
        &self,
        _vars: &RegistryView<'_>,
    ) -> ModelResult<BTreeMap<String, BoundaryConditions>> {
        let (_, k_p) = self.conductances();
        let tab_flux = -(&self.params.current / k_p);
        let (far_n, far_p) = match self.geometry {
            CollectorGeometry::Line => (Side::NoTab, Side::NoTab),
            CollectorGeometry::Plane => (Side::PositiveTab, Side::NegativeTab),
        };
        let negative = BoundaryConditions::from([
            (Side::NegativeTab, BoundaryCondition::dirichlet(0.0)),
            (far_n, BoundaryCondition::neumann(0.0)),
        ]);
        let positive = BoundaryConditions::from([
            (far_p, BoundaryCondition::neumann(0.0)),
            (Side::PositiveTab, BoundaryCondition::neumann(tab_flux)),
        ]);
        Ok(BTreeMap::from([
            (NEGATIVE_POTENTIAL.to_string(), negative),
            (POSITIVE_POTENTIAL.to_string(), positive),
        ]))
    }

    fn set_events(&self, vars: &RegistryView<'_>) -> ModelResult<Vec<Event>> {
        voltage_events(vars, &self.params)
    }
}

/// Current collector of a higher-order model: current density and negative
/// potential are those of the embedded leading-order model, the positive
/// potential and terminal voltage follow the corrected cell voltage.
///
/// Voltage cut-offs come with the leading-order model's events.
#[derive(Clone, Debug)]
pub struct LeadingOrderCurrentCollector {
    current_density: Expr,
    negative_potential: Expr,
    resolved: bool,
}

impl LeadingOrderCurrentCollector {
    pub const NAME: &'static str = "leading-order current collector";

    pub fn from_model(leading_order: &AssembledModel, resolved: bool) -> ModelResult<Self> {
        let registry = leading_order.variables();
        Ok(Self {
            current_density: registry.lookup(CURRENT_DENSITY, Self::NAME)?.clone(),
            negative_potential: registry.lookup(NEGATIVE_POTENTIAL, Self::NAME)?.clone(),
            resolved,
        })
    }
}

impl Submodel for LeadingOrderCurrentCollector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn coupled_inputs(&self) -> Vec<String> {
        names([LOCAL_POTENTIAL_DIFFERENCE])
    }

    fn coupled_outputs(&self) -> Vec<String> {
        names([POSITIVE_POTENTIAL, TERMINAL_VOLTAGE])
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new()
            .with(CURRENT_DENSITY, &self.current_density)
            .with(NEGATIVE_POTENTIAL, &self.negative_potential))
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        terminal_variables(vars, self.resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_model::VariableRegistry;
    use ec_model::testing::check_submodel;

    fn seed() -> VariableRegistry {
        let mut seed = VariableRegistry::new();
        seed.declare(LOCAL_POTENTIAL_DIFFERENCE, Expr::scalar(0.0), "test")
            .unwrap();
        seed
    }

    #[test]
    fn uniform_collector_has_no_states() {
        let check = check_submodel(&Uniform::new(Arc::default()), &seed()).unwrap();
        assert!(check.equations.is_empty());
        assert_eq!(check.events.len(), 2);
        assert!(check.registry.contains(TERMINAL_VOLTAGE));
    }

    #[test]
    fn potential_pairs_are_algebraic() {
        for geometry in [CollectorGeometry::Line, CollectorGeometry::Plane] {
            for conductivity in [
                CollectorConductivity::Finite,
                CollectorConductivity::QuiteConductive,
            ] {
                let submodel = PotentialPair::new(Arc::default(), geometry, conductivity);
                let check = check_submodel(&submodel, &seed()).unwrap();
                assert_eq!(check.equations.algebraic().len(), 2, "{}", submodel.name());
                assert!(check.equations.rhs().is_empty());
                let bcs = check.equations.boundary_conditions();
                assert_eq!(
                    bcs[NEGATIVE_POTENTIAL][&Side::NegativeTab].kind,
                    ec_model::BoundaryKind::Dirichlet
                );
                assert!(bcs[POSITIVE_POTENTIAL].contains_key(&Side::PositiveTab));
            }
        }
    }

    #[test]
    fn resolved_terminal_voltage_is_read_at_the_tab() {
        let submodel = PotentialPair::new(
            Arc::default(),
            CollectorGeometry::Plane,
            CollectorConductivity::Finite,
        );
        let check = check_submodel(&submodel, &seed()).unwrap();
        let voltage = check.registry.get(TERMINAL_VOLTAGE).unwrap();
        assert!(matches!(
            voltage.node(),
            ec_expr::Node::BoundaryValue {
                side: Side::PositiveTab,
                ..
            }
        ));
    }
}

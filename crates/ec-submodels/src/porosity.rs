//! Porosity submodels.

use std::sync::Arc;

use ec_core::{Domain, DomainSpec};
use ec_expr::{Expr, Variable};
use ec_model::{Event, ModelResult, NamedExprs, RegistryView, Submodel};

use crate::common::{
    Electrode, broadcast_cell, cell_field, cell_field_names, electrode_region_names, on_region,
    resolved_cell_field, x_averaged,
};
use crate::parameters::Parameters;
use crate::reactions::Reaction;

pub const POROSITY: &str = "Porosity";
pub const POROSITY_CHANGE: &str = "Porosity change";

pub fn porosity_names() -> [String; 3] {
    electrode_region_names("porosity")
}

pub fn porosity_change_names() -> [String; 3] {
    electrode_region_names("porosity change")
}

pub fn surface_area_name(electrode: Electrode) -> String {
    format!("{} electrode surface area to volume ratio", electrode.name())
}

/// Porosity change driven by the main reaction, per region.
fn reaction_driven_change(
    params: &Parameters,
    j_n: Expr,
    j_p: Expr,
    separator: Expr,
) -> [Expr; 3] {
    [
        -(&params.negative.beta_surf * j_n),
        separator,
        -(&params.positive.beta_surf * j_p),
    ]
}

/// Porosity fixed at its initial value; also supplies the electrode
/// surface area to volume ratios.
#[derive(Clone, Debug)]
pub struct Constant {
    params: Arc<Parameters>,
}

impl Constant {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }
}

impl Submodel for Constant {
    fn name(&self) -> &str {
        "constant porosity"
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let init = self.params.initial_porosities();
        let regions = [0, 1, 2].map(|i| {
            init[i]
                .broadcast(Domain::CurrentCollector)
                .broadcast(Domain::CELL_REGIONS[i])
        });
        let mut vars = resolved_cell_field(&porosity_names(), POROSITY, regions);

        let no_change = broadcast_cell(&Expr::zeros(DomainSpec::on(Domain::CurrentCollector)));
        vars.extend(cell_field(
            &porosity_change_names(),
            POROSITY_CHANGE,
            no_change,
            Expr::zeros(DomainSpec::on(Domain::CurrentCollector)),
        ));

        for electrode in Electrode::BOTH {
            let a_av = self.params.electrode(electrode).a.broadcast(Domain::CurrentCollector);
            let name = surface_area_name(electrode);
            vars.insert(name.as_str(), a_av.broadcast(electrode.domain()));
            vars.insert(x_averaged(&name), a_av);
        }
        Ok(vars)
    }
}

/// Leading-order porosity: one x-averaged porosity state per region.
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
        "leading-order porosity"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        Electrode::BOTH
            .map(|e| Reaction::Main.x_averaged_current_density(e))
            .to_vec()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        cell_field_names(&porosity_change_names(), POROSITY_CHANGE)
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let states = porosity_names()
            .map(|name| Expr::from(Variable::on(x_averaged(&name), Domain::CurrentCollector)));
        let regions = [
            states[0].broadcast(Domain::NegativeElectrode),
            states[1].broadcast(Domain::Separator),
            states[2].broadcast(Domain::PositiveElectrode),
        ];
        Ok(resolved_cell_field(&porosity_names(), POROSITY, regions))
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let j_n = vars.get(&Reaction::Main.x_averaged_current_density(Electrode::Negative))?;
        let j_p = vars.get(&Reaction::Main.x_averaged_current_density(Electrode::Positive))?;
        let averages = reaction_driven_change(
            &self.params,
            j_n,
            j_p,
            Expr::zeros(DomainSpec::on(Domain::CurrentCollector)),
        );
        let regions = [
            averages[0].broadcast(Domain::NegativeElectrode),
            averages[1].broadcast(Domain::Separator),
            averages[2].broadcast(Domain::PositiveElectrode),
        ];
        Ok(resolved_cell_field(
            &porosity_change_names(),
            POROSITY_CHANGE,
            regions,
        ))
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        porosity_names()
            .iter()
            .zip(porosity_change_names())
            .map(|(eps, change)| Ok((x_averaged(eps), vars.get(&x_averaged(&change))?)))
            .collect()
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(porosity_names()
            .iter()
            .zip(self.params.initial_porosities())
            .map(|(eps, init)| (x_averaged(eps), init))
            .collect())
    }

    fn set_events(&self, vars: &RegistryView<'_>) -> ModelResult<Vec<Event>> {
        let mut events = Vec::new();
        for electrode in Electrode::BOTH {
            let eps = vars.get(&format!("X-averaged {electrode} electrode porosity"))?;
            events.push(Event::termination(
                format!("Zero {electrode} electrode porosity cut-off"),
                eps.minimum(),
            ));
            events.push(Event::termination(
                format!("Max {electrode} electrode porosity cut-off"),
                (1.0 - eps).minimum(),
            ));
        }
        Ok(events)
    }
}

/// Spatially resolved porosity, one state per cell region.
#[derive(Clone, Debug)]
pub struct Full {
    params: Arc<Parameters>,
}

impl Full {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }
}

impl Submodel for Full {
    fn name(&self) -> &str {
        "full porosity"
    }

    fn coupled_inputs(&self) -> Vec<String> {
        Electrode::BOTH
            .map(|e| Reaction::Main.current_density(e))
            .to_vec()
    }

    fn coupled_outputs(&self) -> Vec<String> {
        cell_field_names(&porosity_change_names(), POROSITY_CHANGE)
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let names = porosity_names();
        let regions = [0, 1, 2].map(|i| {
            Expr::from(Variable::new(
                names[i].as_str(),
                on_region(Domain::CELL_REGIONS[i]),
            ))
        });
        Ok(resolved_cell_field(&names, POROSITY, regions))
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let j_n = vars.get(&Reaction::Main.current_density(Electrode::Negative))?;
        let j_p = vars.get(&Reaction::Main.current_density(Electrode::Positive))?;
        let regions = reaction_driven_change(
            &self.params,
            j_n,
            j_p,
            Expr::zeros(on_region(Domain::Separator)),
        );
        Ok(resolved_cell_field(
            &porosity_change_names(),
            POROSITY_CHANGE,
            regions,
        ))
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        porosity_names()
            .into_iter()
            .zip(porosity_change_names())
            .map(|(eps, change)| Ok((eps, vars.get(&change)?)))
            .collect()
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(porosity_names()
            .into_iter()
            .zip(self.params.initial_porosities())
            .collect())
    }
}

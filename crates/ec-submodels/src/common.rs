//! Electrode sides and the naming conventions shared by every submodel.

use core::fmt;

use ec_core::{Domain, DomainSpec};
use ec_expr::Expr;
use ec_model::{ModelResult, NamedExprs, RegistryView};

/// One of the two porous electrodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Electrode {
    Negative,
    Positive,
}

impl Electrode {
    pub const BOTH: [Electrode; 2] = [Electrode::Negative, Electrode::Positive];

    /// Capitalized label, as it starts a variable name.
    pub fn name(self) -> &'static str {
        match self {
            Electrode::Negative => "Negative",
            Electrode::Positive => "Positive",
        }
    }

    pub fn lower(self) -> &'static str {
        match self {
            Electrode::Negative => "negative",
            Electrode::Positive => "positive",
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Electrode::Negative => Domain::NegativeElectrode,
            Electrode::Positive => Domain::PositiveElectrode,
        }
    }

    /// Position among the cell regions.
    pub fn region_index(self) -> usize {
        match self {
            Electrode::Negative => 0,
            Electrode::Positive => 2,
        }
    }

    /// Sign of the interfacial current for a positive (discharge) current.
    pub fn current_sign(self) -> f64 {
        match self {
            Electrode::Negative => 1.0,
            Electrode::Positive => -1.0,
        }
    }
}

impl fmt::Display for Electrode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lower())
    }
}

/// `"X-averaged " + name`, with the first letter of `name` lowered unless
/// it starts an acronym.
pub fn x_averaged(name: &str) -> String {
    format!("X-averaged {}", lower_first(name))
}

/// `"Leading-order " + lowercase(name)`, the key of an imported
/// leading-order variable.
pub fn leading_order(name: &str) -> String {
    ec_model::LeadingOrderImport::leading_order_name(name)
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if !chars.clone().next().is_some_and(char::is_uppercase) => {
            first.to_lowercase().chain(chars).collect()
        }
        _ => name.to_string(),
    }
}

/// Field on `region` with a current-collector secondary domain.
pub fn on_region(region: Domain) -> DomainSpec {
    DomainSpec::with_secondary(region, Domain::CurrentCollector)
}

/// Broadcast a current-collector quantity onto each cell region and
/// concatenate the result.
pub fn broadcast_cell(x_av: &Expr) -> [Expr; 3] {
    Domain::CELL_REGIONS.map(|region| x_av.broadcast(region))
}

/// Region names for a quantity: `"Negative electrode porosity"`,
/// `"Separator porosity"`, `"Positive electrode porosity"`.
pub fn electrode_region_names(quantity: &str) -> [String; 3] {
    [
        format!("Negative electrode {quantity}"),
        format!("Separator {quantity}"),
        format!("Positive electrode {quantity}"),
    ]
}

/// Region names for an electrolyte quantity: `"Negative electrolyte
/// concentration"`, `"Separator electrolyte concentration"`, ...
pub fn electrolyte_region_names(quantity: &str) -> [String; 3] {
    [
        format!("Negative {quantity}"),
        format!("Separator {quantity}"),
        format!("Positive {quantity}"),
    ]
}

/// A quantity resolved over the three cell regions.
///
/// Declares each region field and its x-average, the whole-cell
/// concatenation under `whole`, and `average` as the x-average of the whole.
pub fn cell_field(
    region_names: &[String; 3],
    whole: &str,
    regions: [Expr; 3],
    average: Expr,
) -> NamedExprs {
    let mut vars = NamedExprs::new();
    for (name, field) in region_names.iter().zip(&regions) {
        vars.insert(name.as_str(), field);
        vars.insert(x_averaged(name), field.x_average());
    }
    vars.insert(whole, Expr::concatenate(regions.to_vec()));
    vars.insert(x_averaged(whole), average);
    vars
}

/// [`cell_field`] with the whole-cell average taken over the concatenation.
pub fn resolved_cell_field(region_names: &[String; 3], whole: &str, regions: [Expr; 3]) -> NamedExprs {
    let average = Expr::concatenate(regions.to_vec()).x_average();
    cell_field(region_names, whole, regions, average)
}

/// Look up one field per cell region.
pub fn get_regions(vars: &RegistryView<'_>, names: [String; 3]) -> ModelResult<[Expr; 3]> {
    let [n, s, p] = names;
    Ok([vars.get(&n)?, vars.get(&s)?, vars.get(&p)?])
}

/// Names declared by [`cell_field`].
pub fn cell_field_names(region_names: &[String; 3], whole: &str) -> Vec<String> {
    region_names
        .iter()
        .flat_map(|name| [name.clone(), x_averaged(name)])
        .chain([whole.to_string(), x_averaged(whole)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averaged_names_lower_only_the_first_letter() {
        assert_eq!(
            x_averaged("Negative electrode SEI thickness"),
            "X-averaged negative electrode SEI thickness"
        );
        assert_eq!(
            x_averaged("SEI interfacial current density"),
            "X-averaged SEI interfacial current density"
        );
        assert_eq!(
            leading_order("X-averaged negative electrode porosity"),
            "Leading-order x-averaged negative electrode porosity"
        );
    }

    #[test]
    fn broadcast_cell_concatenates() {
        let c = Expr::from(ec_expr::Variable::on("c", Domain::CurrentCollector));
        let parts = broadcast_cell(&c);
        let whole = Expr::concatenate(parts.to_vec());
        assert_eq!(whole.domain().unwrap(), on_region(Domain::WholeCell));
    }

    #[test]
    fn cell_field_declares_what_it_names() {
        let c = Expr::from(ec_expr::Variable::on("c", Domain::CurrentCollector));
        let regions = electrolyte_region_names("electrolyte concentration");
        let vars = cell_field(
            &regions,
            "Electrolyte concentration",
            broadcast_cell(&c),
            c.clone(),
        );
        let declared: Vec<&str> = vars.names().collect();
        assert_eq!(declared.len(), 8);
        for name in cell_field_names(&regions, "Electrolyte concentration") {
            assert!(declared.contains(&name.as_str()), "{name}");
        }
        assert_eq!(vars.get("X-averaged negative electrolyte concentration"), Some(&c));
    }
}

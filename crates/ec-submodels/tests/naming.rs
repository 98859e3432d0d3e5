//! Naming conventions shared between submodels.

use ec_core::Domain;
use ec_expr::{Expr, Variable};
use ec_submodels::common::{
    broadcast_cell, cell_field, cell_field_names, electrode_region_names, leading_order,
    x_averaged,
};
use ec_submodels::{Electrode, Reaction};
use proptest::prelude::*;

fn quantity() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,8}){0,2}"
}

proptest! {
    #[test]
    fn cell_field_declares_exactly_its_names(q in quantity()) {
        let regions = electrode_region_names(&q);
        let whole = format!("Cell {q}");
        let x_av = Expr::from(Variable::on(x_averaged(&whole), Domain::CurrentCollector));
        let declared = cell_field(&regions, &whole, broadcast_cell(&x_av), x_av);

        let mut expected = cell_field_names(&regions, &whole);
        let mut names: Vec<String> = declared.names().map(str::to_string).collect();
        expected.sort();
        names.sort();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn averaged_names_keep_the_quantity(q in quantity()) {
        let name = format!("Negative electrode {q}");
        let averaged = x_averaged(&name);
        prop_assert_eq!(averaged, format!("X-averaged negative electrode {q}"));
        prop_assert_eq!(
            leading_order(&x_averaged(&name)),
            format!("Leading-order x-averaged negative electrode {q}")
        );
    }
}

#[test]
fn reaction_current_names_are_distinct() {
    let mut names = Vec::new();
    for reaction in [Reaction::Main, Reaction::Oxygen] {
        for e in Electrode::BOTH {
            names.push(reaction.current_density(e));
            names.push(reaction.x_averaged_current_density(e));
        }
    }
    let count = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), count);
}

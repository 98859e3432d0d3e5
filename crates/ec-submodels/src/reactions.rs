//! Interfacial reactions that exchange species with the electrolyte.

use ec_expr::Expr;

use crate::common::{Electrode, x_averaged};
use crate::parameters::Parameters;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// The electrode's main charge-transfer reaction.
    Main,
    /// Oxygen evolution (positive) and recombination (negative).
    Oxygen,
}

impl Reaction {
    /// Registry name of the reaction's interfacial current density.
    pub fn current_density(self, electrode: Electrode) -> String {
        match self {
            Reaction::Main => format!("{} electrode interfacial current density", electrode.name()),
            Reaction::Oxygen => {
                format!("{} electrode oxygen interfacial current density", electrode.name())
            }
        }
    }

    pub fn x_averaged_current_density(self, electrode: Electrode) -> String {
        x_averaged(&self.current_density(electrode))
    }

    /// Electrolyte produced per unit interfacial current.
    pub fn electrolyte_stoichiometry(self, electrode: Electrode, params: &Parameters) -> Expr {
        match self {
            Reaction::Main => params.electrode(electrode).s.clone(),
            Reaction::Oxygen => params.oxygen.electrolyte_stoichiometry(electrode).clone(),
        }
    }
}

/// The reactions active in a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reactions {
    oxygen: bool,
}

impl Reactions {
    pub fn new(oxygen: bool) -> Self {
        Self { oxygen }
    }

    pub fn has_oxygen(self) -> bool {
        self.oxygen
    }

    pub fn iter(self) -> impl Iterator<Item = Reaction> {
        [Some(Reaction::Main), self.oxygen.then_some(Reaction::Oxygen)]
            .into_iter()
            .flatten()
    }

    /// Side reactions only.
    pub fn side_reactions(self) -> impl Iterator<Item = Reaction> {
        self.iter().filter(|r| *r != Reaction::Main)
    }
}

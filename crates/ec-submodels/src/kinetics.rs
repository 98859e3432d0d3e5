//! Butler-Volmer kinetics and their linearization.

use std::collections::BTreeMap;

use ec_expr::{Expr, ExprResult, Variable};
use ec_options::Kinetics;

use crate::parameters::ElectrodeParameters;

/// Forward kinetics law `j(j0, eta)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KineticsLaw {
    /// `j = 2 j0 sinh(ne eta / 2)`
    SymmetricButlerVolmer,
    /// `j = j0 (exp(ne alpha eta) - exp(-ne (1 - alpha) eta))`
    AsymmetricButlerVolmer,
}

impl From<Kinetics> for KineticsLaw {
    fn from(kinetics: Kinetics) -> Self {
        match kinetics {
            Kinetics::SymmetricButlerVolmer => KineticsLaw::SymmetricButlerVolmer,
            Kinetics::AsymmetricButlerVolmer => KineticsLaw::AsymmetricButlerVolmer,
        }
    }
}

impl KineticsLaw {
    pub fn current(self, j0: &Expr, ne: &Expr, eta: &Expr, alpha: &Expr) -> Expr {
        match self {
            KineticsLaw::SymmetricButlerVolmer => 2.0 * j0 * (ne * eta / 2.0).sinh(),
            KineticsLaw::AsymmetricButlerVolmer => {
                let oxidation = (ne * alpha * eta).exp();
                let reduction = (-(ne * (1.0 - alpha) * eta)).exp();
                j0 * (oxidation - reduction)
            }
        }
    }
}

/// Overpotential that drives current `j` through symmetric Butler-Volmer
/// kinetics.
pub fn inverse_symmetric(j: &Expr, j0: &Expr, ne: &Expr) -> Expr {
    (2.0 / ne) * (j / (2.0 * j0)).arcsinh()
}

/// Main-reaction kinetics of one electrode.
#[derive(Clone, Copy, Debug)]
pub struct InterfaceKinetics<'a> {
    pub law: KineticsLaw,
    pub params: &'a ElectrodeParameters,
}

impl<'a> InterfaceKinetics<'a> {
    pub fn new(law: KineticsLaw, params: &'a ElectrodeParameters) -> Self {
        Self { law, params }
    }

    pub fn current(&self, c_e: &Expr, t: &Expr, delta_phi: &Expr) -> Expr {
        let j0 = self.params.exchange_current_density(c_e, t);
        let eta = delta_phi - self.params.ocp(c_e, t);
        self.law.current(&j0, &self.params.ne, &eta, &self.params.alpha)
    }

    /// Surface potential difference that sustains interfacial current `j`.
    pub fn surface_potential_difference(&self, j: &Expr, c_e: &Expr, t: &Expr) -> Expr {
        let j0 = self.params.exchange_current_density(c_e, t);
        self.params.ocp(c_e, t) + inverse_symmetric(j, &j0, &self.params.ne)
    }

    pub fn dj_dc(&self, c_e: &Expr, t: &Expr, delta_phi: &Expr) -> ExprResult<Expr> {
        let (dc, _) = partials(&|c: &Expr, phi: &Expr| self.current(c, t, phi), c_e, delta_phi)?;
        Ok(dc)
    }

    pub fn dj_ddeltaphi(&self, c_e: &Expr, t: &Expr, delta_phi: &Expr) -> ExprResult<Expr> {
        let (_, dphi) = partials(&|c: &Expr, phi: &Expr| self.current(c, t, phi), c_e, delta_phi)?;
        Ok(dphi)
    }
}

/// `(dj/dc, dj/d(delta phi))` of `current` evaluated at `(c_e, delta_phi)`.
pub fn partials(
    current: &dyn Fn(&Expr, &Expr) -> Expr,
    c_e: &Expr,
    delta_phi: &Expr,
) -> ExprResult<(Expr, Expr)> {
    let c = Variable::uniform("linearization concentration");
    let phi = Variable::uniform("linearization potential difference");
    let j = current(&Expr::from(&c), &Expr::from(&phi));
    let at = BTreeMap::from([(c.clone(), c_e.clone()), (phi.clone(), delta_phi.clone())]);
    Ok((j.diff(&c)?.substitute(&at), j.diff(&phi)?.substitute(&at)))
}

/// First-order expansion of `current` about `(c_0, delta_phi_0)`, evaluated
/// at `(c_e, delta_phi)`.
pub fn linearized(
    current: &dyn Fn(&Expr, &Expr) -> Expr,
    (c_0, delta_phi_0): (&Expr, &Expr),
    (c_e, delta_phi): (&Expr, &Expr),
) -> ExprResult<Expr> {
    let (dj_dc, dj_dphi) = partials(current, c_0, delta_phi_0)?;
    Ok(current(c_0, delta_phi_0) + dj_dc * (c_e - c_0) + dj_dphi * (delta_phi - delta_phi_0))
}

//! Symbolic parameter set.
//!
//! Every physical constant is a named [`Expr::parameter`] and every material
//! property a named [`Expr::function`]; numerical values are substituted by
//! the caller after assembly. All quantities are dimensionless.

use ec_expr::Expr;

use crate::common::Electrode;

fn p(name: impl Into<String>) -> Expr {
    Expr::parameter(name)
}

/// Through-cell geometry (lengths scaled by the cell width).
#[derive(Clone, Debug)]
pub struct Geometry {
    pub l_n: Expr,
    pub l_s: Expr,
    pub l_p: Expr,
}

impl Geometry {
    pub fn electrode_length(&self, electrode: Electrode) -> &Expr {
        match electrode {
            Electrode::Negative => &self.l_n,
            Electrode::Positive => &self.l_p,
        }
    }

    /// Negative, separator and positive lengths, in cell order.
    pub fn lengths(&self) -> [&Expr; 3] {
        [&self.l_n, &self.l_s, &self.l_p]
    }
}

/// Per-electrode constants of the main reaction and the solid phase.
#[derive(Clone, Debug)]
pub struct ElectrodeParameters {
    electrode: Electrode,
    /// Electrons transferred in the main reaction.
    pub ne: Expr,
    /// Butler-Volmer transfer coefficient.
    pub alpha: Expr,
    /// Double-layer capacitance.
    pub c_dl: Expr,
    /// Solid-phase conductivity.
    pub sigma: Expr,
    /// Initial porosity.
    pub eps_init: Expr,
    /// Surface area to volume ratio.
    pub a: Expr,
    /// Porosity change per unit interfacial current.
    pub beta_surf: Expr,
    /// Electrolyte stoichiometry of the main reaction.
    pub s: Expr,
    /// Partial molar volume change per unit interfacial current.
    pub delta_v: Expr,
}

impl ElectrodeParameters {
    fn new(electrode: Electrode) -> Self {
        let e = electrode.name();
        Self {
            electrode,
            ne: p(format!("{e} electrode electrons in reaction")),
            alpha: p(format!("{e} electrode Butler-Volmer transfer coefficient")),
            c_dl: p(format!("{e} electrode double-layer capacity")),
            sigma: p(format!("{e} electrode conductivity")),
            eps_init: p(format!("{e} electrode initial porosity")),
            a: p(format!("{e} electrode surface area to volume ratio")),
            beta_surf: p(format!("{e} electrode porosity change coefficient")),
            s: p(format!("{e} electrode electrolyte stoichiometry")),
            delta_v: p(format!("{e} electrode volume change")),
        }
    }

    /// Open-circuit potential of the main reaction.
    pub fn ocp(&self, c_e: &Expr, t: &Expr) -> Expr {
        Expr::function(
            format!("{} electrode OCP", self.electrode.name()),
            vec![c_e.clone(), t.clone()],
        )
    }

    pub fn exchange_current_density(&self, c_e: &Expr, t: &Expr) -> Expr {
        Expr::function(
            format!("{} electrode exchange-current density", self.electrode.name()),
            vec![c_e.clone(), t.clone()],
        )
    }
}

#[derive(Clone, Debug)]
pub struct ElectrolyteParameters {
    /// Initial concentration.
    pub c_init: Expr,
    /// Ratio of diffusion and discharge timescales; the size of first-order
    /// corrections.
    pub c_e: Expr,
    /// Cation transference number.
    pub t_plus: Expr,
    /// Bruggeman exponent.
    pub b: Expr,
    /// Separator initial porosity.
    pub eps_s_init: Expr,
}

impl ElectrolyteParameters {
    pub fn diffusivity(&self, c: &Expr, t: &Expr) -> Expr {
        Expr::function("Electrolyte diffusivity", vec![c.clone(), t.clone()])
    }

    pub fn conductivity(&self, c: &Expr, t: &Expr) -> Expr {
        Expr::function("Electrolyte conductivity", vec![c.clone(), t.clone()])
    }
}

#[derive(Clone, Debug)]
pub struct CurrentCollectorParameters {
    pub sigma_cn: Expr,
    pub sigma_cp: Expr,
    pub l_cn: Expr,
    pub l_cp: Expr,
    /// Aspect ratio of the cell.
    pub delta: Expr,
}

#[derive(Clone, Debug)]
pub struct ThermalParameters {
    pub t_ambient: Expr,
    /// Temperature sensitivity of the SEI reaction rates.
    pub theta: Expr,
}

#[derive(Clone, Debug)]
pub struct VoltageCutoffs {
    pub minimum: Expr,
    pub maximum: Expr,
}

#[derive(Clone, Debug)]
pub struct SeiParameters {
    pub l_inner_0: Expr,
    pub l_outer_0: Expr,
    pub r_sei: Expr,
    pub alpha: Expr,
    pub gamma: Expr,
    /// Ratio of inner and outer partial molar volumes.
    pub v_bar: Expr,
    pub c_reaction: Expr,
    pub c_electron: Expr,
    pub c_inter: Expr,
    pub c_solvent: Expr,
    pub c_ec: Expr,
    /// EC diffusion resistance of the outer layer.
    pub c_ec_diffusion: Expr,
    pub u_inner_electron: Expr,
}

#[derive(Clone, Debug)]
pub struct CrackParameters {
    pub l_cr_0: Expr,
    pub k_cr: Expr,
    pub m_cr: Expr,
}

impl CrackParameters {
    /// Tangential stress swing at the particle surface.
    pub fn stress(&self, t: &Expr) -> Expr {
        Expr::function("Negative particle tangential stress", vec![t.clone()])
    }
}

#[derive(Clone, Debug)]
pub struct OxygenParameters {
    pub c_init: Expr,
    pub ne: Expr,
    pub u: Expr,
    /// Oxygen stoichiometry in each electrode.
    pub s_n: Expr,
    pub s_p: Expr,
    /// Electrolyte stoichiometry of the oxygen reaction in each electrode.
    pub s_e_n: Expr,
    pub s_e_p: Expr,
    pub diffusivity: Expr,
}

impl OxygenParameters {
    pub fn exchange_current_density(&self, c_e: &Expr, t: &Expr) -> Expr {
        Expr::function(
            "Positive electrode oxygen exchange-current density",
            vec![c_e.clone(), t.clone()],
        )
    }

    pub fn oxygen_stoichiometry(&self, electrode: Electrode) -> &Expr {
        match electrode {
            Electrode::Negative => &self.s_n,
            Electrode::Positive => &self.s_p,
        }
    }

    pub fn electrolyte_stoichiometry(&self, electrode: Electrode) -> &Expr {
        match electrode {
            Electrode::Negative => &self.s_e_n,
            Electrode::Positive => &self.s_e_p,
        }
    }
}

/// The full symbolic parameter set shared by every submodel of a build.
#[derive(Clone, Debug)]
pub struct Parameters {
    pub geometry: Geometry,
    /// Applied current density.
    pub current: Expr,
    pub voltage: VoltageCutoffs,
    pub negative: ElectrodeParameters,
    pub positive: ElectrodeParameters,
    pub electrolyte: ElectrolyteParameters,
    pub current_collector: CurrentCollectorParameters,
    pub thermal: ThermalParameters,
    pub sei: SeiParameters,
    pub cracks: CrackParameters,
    pub oxygen: OxygenParameters,
}

impl Parameters {
    pub fn electrode(&self, electrode: Electrode) -> &ElectrodeParameters {
        match electrode {
            Electrode::Negative => &self.negative,
            Electrode::Positive => &self.positive,
        }
    }

    /// Initial porosity of each cell region, in cell order.
    pub fn initial_porosities(&self) -> [Expr; 3] {
        [
            self.negative.eps_init.clone(),
            self.electrolyte.eps_s_init.clone(),
            self.positive.eps_init.clone(),
        ]
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            geometry: Geometry {
                l_n: p("Negative electrode thickness"),
                l_s: p("Separator thickness"),
                l_p: p("Positive electrode thickness"),
            },
            current: p("Current function"),
            voltage: VoltageCutoffs {
                minimum: p("Lower voltage cut-off"),
                maximum: p("Upper voltage cut-off"),
            },
            negative: ElectrodeParameters::new(Electrode::Negative),
            positive: ElectrodeParameters::new(Electrode::Positive),
            electrolyte: ElectrolyteParameters {
                c_init: p("Initial electrolyte concentration"),
                c_e: p("Electrolyte diffusion timescale ratio"),
                t_plus: p("Cation transference number"),
                b: p("Bruggeman coefficient"),
                eps_s_init: p("Separator initial porosity"),
            },
            current_collector: CurrentCollectorParameters {
                sigma_cn: p("Negative current collector conductivity"),
                sigma_cp: p("Positive current collector conductivity"),
                l_cn: p("Negative current collector thickness"),
                l_cp: p("Positive current collector thickness"),
                delta: p("Cell aspect ratio"),
            },
            thermal: ThermalParameters {
                t_ambient: p("Ambient temperature"),
                theta: p("SEI temperature sensitivity"),
            },
            sei: SeiParameters {
                l_inner_0: p("Initial inner SEI thickness"),
                l_outer_0: p("Initial outer SEI thickness"),
                r_sei: p("SEI resistivity"),
                alpha: p("Inner SEI reaction proportion"),
                gamma: p("SEI growth rate"),
                v_bar: p("Ratio of inner and outer SEI partial molar volumes"),
                c_reaction: p("SEI reaction-limited rate constant"),
                c_electron: p("SEI electron-migration rate constant"),
                c_inter: p("SEI interstitial-diffusion rate constant"),
                c_solvent: p("SEI solvent-diffusion rate constant"),
                c_ec: p("SEI EC reaction rate constant"),
                c_ec_diffusion: p("EC diffusion resistance"),
                u_inner_electron: p("Inner SEI open-circuit potential"),
            },
            cracks: CrackParameters {
                l_cr_0: p("Negative particle initial crack length"),
                k_cr: p("Negative particle cracking rate constant"),
                m_cr: p("Negative particle Paris law exponent"),
            },
            oxygen: OxygenParameters {
                c_init: p("Initial oxygen concentration"),
                ne: p("Oxygen electrons in reaction"),
                u: p("Oxygen reference OCP"),
                s_n: p("Negative electrode oxygen stoichiometry"),
                s_p: p("Positive electrode oxygen stoichiometry"),
                s_e_n: p("Negative electrode oxygen electrolyte stoichiometry"),
                s_e_p: p("Positive electrode oxygen electrolyte stoichiometry"),
                diffusivity: p("Oxygen diffusivity"),
            },
        }
    }
}

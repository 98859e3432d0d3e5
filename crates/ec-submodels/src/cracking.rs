//! Particle cracking in the negative electrode.

use std::f64::consts::PI;
use std::sync::Arc;

use ec_core::Domain;
use ec_expr::{Expr, Variable};
use ec_model::{ModelResult, NamedExprs, RegistryView, Submodel};

use crate::common::{on_region, x_averaged};
use crate::parameters::Parameters;

pub const CRACK_LENGTH: &str = "Negative particle crack length";
pub const CRACKING_RATE: &str = "Negative particle cracking rate";

/// Crack growth under a Paris-law rate driven by the particle surface
/// stress.
#[derive(Clone, Debug)]
pub struct CrackPropagation {
    params: Arc<Parameters>,
    x_average: bool,
}

impl CrackPropagation {
    /// Crack length resolved through the negative electrode.
    pub fn new(params: Arc<Parameters>) -> Self {
        Self {
            params,
            x_average: false,
        }
    }

    /// A single x-averaged crack length.
    pub fn x_averaged(params: Arc<Parameters>) -> Self {
        Self {
            params,
            x_average: true,
        }
    }

    fn state(&self) -> String {
        if self.x_average {
            x_averaged(CRACK_LENGTH)
        } else {
            CRACK_LENGTH.to_string()
        }
    }

    fn temperature(&self) -> String {
        let name = "Negative electrode temperature";
        if self.x_average {
            x_averaged(name)
        } else {
            name.to_string()
        }
    }

    fn rate(&self) -> String {
        if self.x_average {
            x_averaged(CRACKING_RATE)
        } else {
            CRACKING_RATE.to_string()
        }
    }
}

impl Submodel for CrackPropagation {
    fn name(&self) -> &str {
        if self.x_average {
            "x-averaged negative particle cracking"
        } else {
            "negative particle cracking"
        }
    }

    fn coupled_inputs(&self) -> Vec<String> {
        vec![self.temperature()]
    }

    fn coupled_outputs(&self) -> Vec<String> {
        vec![CRACKING_RATE.to_string(), x_averaged(CRACKING_RATE)]
    }

    fn fundamental_variables(&self) -> ModelResult<NamedExprs> {
        let n = Domain::NegativeElectrode;
        let vars = if self.x_average {
            let l_cr = Expr::from(Variable::on(self.state(), Domain::CurrentCollector));
            NamedExprs::new()
                .with(CRACK_LENGTH, l_cr.broadcast(n))
                .with(x_averaged(CRACK_LENGTH), l_cr)
        } else {
            let l_cr = Expr::from(Variable::new(self.state(), on_region(n)));
            NamedExprs::new()
                .with(x_averaged(CRACK_LENGTH), l_cr.x_average())
                .with(CRACK_LENGTH, l_cr)
        };
        Ok(vars)
    }

    fn coupled_variables(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        let cracks = &self.params.cracks;
        let l_cr = vars.get(&self.state())?;
        let stress = cracks.stress(&vars.get(&self.temperature())?);
        let rate = &cracks.k_cr * (stress * (PI * l_cr).sqrt()).pow(&cracks.m_cr);
        Ok(if self.x_average {
            NamedExprs::new()
                .with(CRACKING_RATE, rate.broadcast(Domain::NegativeElectrode))
                .with(x_averaged(CRACKING_RATE), rate)
        } else {
            NamedExprs::new()
                .with(x_averaged(CRACKING_RATE), rate.x_average())
                .with(CRACKING_RATE, rate)
        })
    }

    fn set_rhs(&self, vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with(self.state(), vars.get(&self.rate())?))
    }

    fn set_initial_conditions(&self, _vars: &RegistryView<'_>) -> ModelResult<NamedExprs> {
        Ok(NamedExprs::new().with(self.state(), &self.params.cracks.l_cr_0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::DomainSpec;
    use ec_model::VariableRegistry;
    use ec_model::testing::check_submodel;

    #[test]
    fn crack_length_is_a_state_in_both_forms() {
        for (model, domain) in [
            (
                CrackPropagation::new(Arc::default()),
                on_region(Domain::NegativeElectrode),
            ),
            (
                CrackPropagation::x_averaged(Arc::default()),
                DomainSpec::on(Domain::CurrentCollector),
            ),
        ] {
            let mut seed = VariableRegistry::new();
            seed.declare(model.temperature(), Expr::filled(1.0, domain), "test")
                .unwrap();
            let check = check_submodel(&model, &seed).unwrap();
            let state = check.equations.rhs().keys().next().unwrap();
            assert_eq!(state.domain(), domain);
            assert!(check.registry.contains(CRACKING_RATE));
        }
    }
}

//! Electrolyte submodels: concentration (diffusion) and potential
//! (conductivity).

pub mod conductivity;
pub mod constant;
pub mod diffusion;

pub use constant::ConstantConcentration;

use ec_core::Domain;
use ec_expr::Expr;

use crate::common::electrolyte_region_names;

pub const CONCENTRATION: &str = "Electrolyte concentration";
pub const X_AVERAGED_CONCENTRATION: &str = "X-averaged electrolyte concentration";
pub const POTENTIAL: &str = "Electrolyte potential";
pub const FLUX: &str = "Electrolyte flux";

/// `"Negative electrolyte concentration"`, `"Separator ..."`, `"Positive ..."`.
pub fn concentration_names() -> [String; 3] {
    electrolyte_region_names("electrolyte concentration")
}

pub fn potential_names() -> [String; 3] {
    electrolyte_region_names("electrolyte potential")
}

/// Quasi-static first-order profile across the cell.
///
/// Each region has a uniform volumetric source `sources[k]` and an effective
/// diffusivity `diffusivities[k]` (both on the current collector). The
/// profile carries no flux through either end of the cell, is continuous
/// at the internal interfaces, and has zero through-cell average.
pub(crate) fn quasi_static_profile(
    sources: &[Expr; 3],
    diffusivities: &[Expr; 3],
    lengths: [&Expr; 3],
) -> [Expr; 3] {
    let [n, s, p] = Domain::CELL_REGIONS;
    let [l_n, l_s, _] = lengths;
    let b = |e: &Expr, region: Domain| e.broadcast(region);

    let x_n = Expr::spatial_variable(n);
    let raw_n = -(b(&sources[0], n) * x_n.pow(2.0)) / (2.0 * b(&diffusivities[0], n));
    let at_l_n = -(&sources[0] * l_n.pow(2.0)) / (2.0 * &diffusivities[0]);

    // distances from the left edge of the separator and positive electrode
    let y_s = Expr::spatial_variable(s) - l_n;
    let flux_l_n = &sources[0] * l_n;
    let raw_s = b(&at_l_n, s)
        - (b(&flux_l_n, s) * &y_s + b(&sources[1], s) * y_s.pow(2.0) / 2.0)
            / b(&diffusivities[1], s);
    let at_l_s = &at_l_n
        - (&flux_l_n * l_s + &sources[1] * l_s.pow(2.0) / 2.0) / &diffusivities[1];

    let y_p = Expr::spatial_variable(p) - (l_n + l_s);
    let flux_l_s = &flux_l_n + &sources[1] * l_s;
    let raw_p = b(&at_l_s, p)
        - (b(&flux_l_s, p) * &y_p + b(&sources[2], p) * y_p.pow(2.0) / 2.0)
            / b(&diffusivities[2], p);

    let raw = [raw_n, raw_s, raw_p];
    let mean = Expr::concatenate(raw.to_vec()).x_average();
    let [rn, rs, rp] = raw;
    [rn - b(&mean, n), rs - b(&mean, s), rp - b(&mean, p)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_core::DomainSpec;
    use ec_expr::Variable;

    use crate::common::on_region;

    #[test]
    fn profile_lives_on_each_region() {
        let cc = |name: &str| Expr::from(Variable::on(name, Domain::CurrentCollector));
        let sources = [cc("S_n"), cc("S_s"), cc("S_p")];
        let diffusivities = [cc("D_n"), cc("D_s"), cc("D_p")];
        let l = [
            Expr::parameter("l_n"),
            Expr::parameter("l_s"),
            Expr::parameter("l_p"),
        ];
        let profile = quasi_static_profile(&sources, &diffusivities, [&l[0], &l[1], &l[2]]);
        for (field, region) in profile.iter().zip(Domain::CELL_REGIONS) {
            assert_eq!(field.domain().unwrap(), on_region(region));
        }
        let whole = Expr::concatenate(profile.to_vec());
        assert_eq!(
            whole.x_average().domain().unwrap(),
            DomainSpec::on(Domain::CurrentCollector)
        );
    }
}

//! Properties of expression construction and differentiation.

use ec_core::Domain;
use ec_expr::{Expr, Variable};
use proptest::prelude::*;

fn c() -> Variable {
    Variable::on("Electrolyte concentration", Domain::NegativeElectrode)
}

#[test]
fn shared_subexpression_is_reused_across_trees() {
    let temperature = Expr::from(Variable::on("Cell temperature", Domain::CurrentCollector));
    let a = &temperature * 2.0;
    let b = temperature.exp();
    // Both trees hold the same node; neither build changed it.
    assert_eq!(a.children()[0], &temperature);
    assert_eq!(b.children()[0], &temperature);
}

#[test]
fn butler_volmer_partial_derivatives() {
    let c = c();
    let eta = Variable::on("Reaction overpotential", Domain::NegativeElectrode);
    let j0 = Expr::parameter("m_n") * Expr::from(&c).sqrt();
    let j = 2.0 * &j0 * (Expr::parameter("ne_n") / 2.0 * Expr::from(&eta)).sinh();

    let dj_deta = j.diff(&eta).unwrap();
    assert!(dj_deta.depends_on(&eta));
    assert!(dj_deta.depends_on(&c));

    let dj_dc = j.diff(&c).unwrap();
    let at_eta0 = dj_dc.substitute_one(&eta, &Expr::zero());
    assert!(at_eta0.is_zero());
}

proptest! {
    #[test]
    fn scalar_folding_matches_arithmetic(a in -1e3_f64..1e3, b in -1e3_f64..1e3) {
        let e = (Expr::scalar(a) + b) * Expr::scalar(a) - b;
        let folded = e.as_scalar().unwrap();
        let expected = (a + b) * a - b;
        prop_assert!((folded - expected).abs() <= 1e-9 * expected.abs().max(1.0));
    }

    #[test]
    fn derivative_of_polynomial(k in 0.1_f64..10.0, x0 in 0.1_f64..10.0) {
        let c = c();
        let x = Expr::from(&c);
        let e = k * x.pow(2.0);
        let d = e.diff(&c).unwrap().substitute_one(&c, &Expr::scalar(x0));
        let value = d.as_scalar().unwrap();
        prop_assert!((value - 2.0 * k * x0).abs() <= 1e-9 * (2.0 * k * x0));
    }

    #[test]
    fn substitution_removes_the_variable(v in -5.0_f64..5.0) {
        let c = c();
        let e = Expr::from(&c).sinh() * Expr::parameter("k") + Expr::from(&c);
        let out = e.substitute_one(&c, &Expr::scalar(v));
        prop_assert!(!out.depends_on(&c));
        prop_assert!(out.free_variables().is_empty());
    }
}

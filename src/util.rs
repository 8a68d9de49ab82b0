use float_cmp::{approx_eq, F64Margin};
use num_complex::Complex64;

pub fn comp_vec_f64(exemplar: &[f64], calc: &[f64], precision: F64Margin, test: &str) {
    assert_eq!(
        exemplar.len(),
        calc.len(),
        " Failed test {} length mismatch",
        test
    );
    for k in 0..calc.len() {
        comp_f64(
            &exemplar[k],
            &calc[k],
            precision,
            test,
            &(format!("({})", k)),
        );
    }
}

pub fn comp_c64(
    exemplar: &Complex64,
    calc: &Complex64,
    precision: F64Margin,
    test: &str,
    idx: &str,
) {
    comp_f64(
        &(exemplar.re),
        &(calc.re),
        precision,
        test,
        &(idx.to_owned() + ".re"),
    );
    comp_f64(
        &(exemplar.im),
        &(calc.im),
        precision,
        test,
        &(idx.to_owned() + ".im"),
    );
}

pub fn comp_f64(exemplar: &f64, calc: &f64, precision: F64Margin, test: &str, idx: &str) {
    assert!(
        approx_eq!(f64, *calc, *exemplar, precision),
        " Failed test {} at location {}\n  exemplar: {}\n      calc: {}",
        test,
        idx,
        exemplar,
        calc
    );
}

/// Relative comparison for values far from unity (nH, pF, MHz)
pub fn comp_rel(exemplar: &f64, calc: &f64, rel: f64, test: &str) {
    let tol = rel * exemplar.abs().max(calc.abs());
    assert!(
        (calc - exemplar).abs() <= tol,
        " Failed test {}\n  exemplar: {}\n      calc: {}",
        test,
        exemplar,
        calc
    );
}

use crate::error::CalcError;
use crate::matching::{equal_resistance, min_q, nearly_equal, partial_q, Design, Synthesis, DEFAULT_Q};

/// Half of a Pi: shunt element across a port of admittance G + jB feeding
/// a series arm down to the virtual resistance `rv`.
///
/// Returns (shunt susceptance, series reactance, partial Q).
fn half_section(g: f64, b: f64, rv: f64, sign: f64) -> (f64, f64, f64) {
    let rp = 1.0 / g;
    let q = partial_q(rp / rv);
    let b_total = sign * q / rp;
    (b_total - b, sign * q * rv, q)
}

/// Three-element Pi network: shunt across source, series, shunt across load.
/// Built as two L sections meeting at `rv = max(rs, rl) / (Q² + 1)`.
pub(crate) fn synthesize(design: &Design, q: Option<f64>) -> Result<Synthesis, CalcError> {
    let min_q = min_q(design.rs, design.rl);
    if q == Some(0.0) && nearly_equal(design.rs, design.rl) {
        return equal_resistance(design);
    }
    let q = q.unwrap_or_else(|| DEFAULT_Q.max(min_q + 1.0));
    if q < min_q {
        return Err(CalcError::InsufficientQ { min_q, q });
    }

    let sign = design.topology.sign();
    let rv = design.rmax() / (q * q + 1.0);
    let ys = design.source().y();
    let yl = design.load().y();
    let (b1, x1, q1) = half_section(ys.re, ys.im, rv, sign);
    let (b2, x2, q2) = half_section(yl.re, yl.im, rv, sign);
    tracing::debug!(rv, q1, q2, "Pi network sections");

    // At Q == min Q the side at rmin has q = 0 and only an L remains
    let components = [
        design.section_shunt(b1, q1, "across source")?,
        Some(design.series(x1 + x2, "middle")?),
        design.section_shunt(b2, q2, "across load")?,
    ];

    Ok(Synthesis {
        components: components.into_iter().flatten().collect(),
        calculated_q: q1.max(q2),
    })
}

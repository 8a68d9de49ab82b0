use crate::error::CalcError;
use crate::matching::{equal_resistance, min_q, nearly_equal, Design, Synthesis};

/// Shunt section that turns a port of admittance G + jB into resistance `r`.
///
/// Returns (shunt susceptance to add, total shunt-node susceptance,
/// reactance left at the series side of the node).
fn shunt_section(g: f64, b: f64, r: f64, sign: f64) -> (f64, f64, f64) {
    let b_total = sign * (g / r - g * g).max(0.0).sqrt();
    let x_node = -b_total / (g * g + b_total * b_total);
    (b_total - b, b_total, x_node)
}

/// Two-element L network. The shunt element always sits across the port
/// with the larger resistance.
pub(crate) fn synthesize(design: &Design, q: Option<f64>) -> Result<Synthesis, CalcError> {
    if nearly_equal(design.rs, design.rl) {
        return equal_resistance(design);
    }

    let min_q = min_q(design.rs, design.rl);
    if let Some(q) = q {
        if q < min_q {
            return Err(CalcError::InsufficientQ { min_q, q });
        }
    }
    let sign = design.topology.sign();

    if design.rl > design.rs {
        let y = design.load().y();
        let (b_shunt, b_total, x_node) = shunt_section(y.re, y.im, design.rs, sign);
        let x_series = -design.xs - x_node;
        tracing::debug!(b_shunt, x_series, "L network, shunt across load");

        Ok(Synthesis {
            components: vec![
                design.series(x_series, "source side")?,
                design.shunt(b_shunt, "across load")?,
            ],
            calculated_q: b_total.abs() / y.re,
        })
    } else {
        let y = design.source().y();
        let (b_shunt, b_total, x_node) = shunt_section(y.re, y.im, design.rl, sign);
        let x_series = -design.xl - x_node;
        tracing::debug!(b_shunt, x_series, "L network, shunt across source");

        Ok(Synthesis {
            components: vec![
                design.shunt(b_shunt, "across source")?,
                design.series(x_series, "load side")?,
            ],
            calculated_q: b_total.abs() / y.re,
        })
    }
}

//! Smith chart coordinates for plotting. Pure transforms, nothing here
//! feeds back into a calculation.

use crate::element::{Placement, ReactiveComponent};
use crate::error::{require_positive, CalcError};
use crate::impedance::Impedance;
use num_complex::c64;
use serde::Serialize;

/// Point in the reflection-coefficient plane
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SmithPoint {
    pub re: f64,
    pub im: f64,
}

impl SmithPoint {
    pub fn magnitude(&self) -> f64 {
        self.re.hypot(self.im)
    }
}

/// Projects `z` onto the Smith chart normalized to `z0`
pub fn project(z: Impedance, z0: f64) -> Result<SmithPoint, CalcError> {
    require_positive("reference impedance", z0)?;
    let n = z.normalize(z0);
    let denom = (n.r + 1.0).powi(2) + n.x * n.x;
    if !(denom > 0.0) || !denom.is_finite() {
        return Err(CalcError::NonFinite {
            what: "Smith chart coordinate".to_string(),
        });
    }

    Ok(SmithPoint {
        re: (n.r * n.r + n.x * n.x - 1.0) / denom,
        im: 2.0 * n.x / denom,
    })
}

/// Inverse of `project`
pub fn to_impedance(pt: SmithPoint, z0: f64) -> Result<Impedance, CalcError> {
    require_positive("reference impedance", z0)?;
    let gamma = c64(pt.re, pt.im);
    if (c64(1.0, 0.0) - gamma).norm() == 0.0 {
        return Err(CalcError::NonFinite {
            what: "impedance at the open-circuit point".to_string(),
        });
    }
    Ok(Impedance::from_z(z0 * (1.0 + gamma) / (1.0 - gamma)))
}

/// Impedance trace from the load toward the source, one point per element.
///
/// The first point is the load itself; each following point is the
/// impedance looking into the network after adding the next element.
pub fn impedance_path(
    components: &[ReactiveComponent],
    load: Impedance,
    w: f64,
    z0: f64,
) -> Result<Vec<SmithPoint>, CalcError> {
    let mut z = load.z();
    let mut out = vec![project(load, z0)?];

    for comp in components.iter().rev() {
        let ze = comp.z_at(w);
        z = match comp.placement() {
            Placement::Series => z + ze,
            Placement::Shunt => (z.inv() + ze.inv()).inv(),
        };
        out.push(project(Impedance::from_z(z), z0)?);
    }

    Ok(out)
}

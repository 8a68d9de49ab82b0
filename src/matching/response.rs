use crate::element::{Placement, ReactiveComponent};
use crate::error::CalcError;
use crate::frequency::Frequency;
use crate::impedance::{return_loss_db, vswr, Impedance};
use crate::matching::{MatchingConfig, MatchingResult};
use num_complex::{c64, Complex64};
use serde::Serialize;

/// Two-port chain (ABCD) matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Abcd {
    pub a: Complex64,
    pub b: Complex64,
    pub c: Complex64,
    pub d: Complex64,
}

impl Abcd {
    pub fn identity() -> Self {
        Abcd {
            a: c64(1.0, 0.0),
            b: Complex64::ZERO,
            c: Complex64::ZERO,
            d: c64(1.0, 0.0),
        }
    }

    /// Series impedance [[1, Z], [0, 1]]
    pub fn series(z: Complex64) -> Self {
        Abcd {
            b: z,
            ..Abcd::identity()
        }
    }

    /// Shunt admittance [[1, 0], [Y, 1]]
    pub fn shunt(y: Complex64) -> Self {
        Abcd {
            c: y,
            ..Abcd::identity()
        }
    }

    /// Matrix product self · next
    pub fn cascade(&self, next: &Abcd) -> Abcd {
        Abcd {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
        }
    }

    /// Input impedance with port 2 terminated in `zl`
    pub fn input_impedance(&self, zl: Complex64) -> Complex64 {
        (self.a * zl + self.b) / (self.c * zl + self.d)
    }
}

/// Chain matrix of a component list in source-to-load order
pub fn network_abcd(components: &[ReactiveComponent], w: f64) -> Abcd {
    components.iter().fold(Abcd::identity(), |acc, comp| {
        let z = comp.z_at(w);
        let stage = match comp.placement() {
            Placement::Series => Abcd::series(z),
            Placement::Shunt => Abcd::shunt(z.inv()),
        };
        acc.cascade(&stage)
    })
}

/// Impedance seen at the source terminals with the network terminated in `load`
pub fn input_impedance(components: &[ReactiveComponent], load: Impedance, w: f64) -> Complex64 {
    network_abcd(components, w).input_impedance(load.z())
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SweepPoint {
    pub freq: f64,
    pub input_impedance: Impedance,
    pub gamma: f64,
    pub return_loss_db: f64,
    pub vswr: f64,
}

/// Power-wave reflection of `zin` against a source of impedance `zs`
pub fn power_wave_gamma(zin: Complex64, zs: Complex64) -> Complex64 {
    (zin - zs.conj()) / (zin + zs)
}

/// Evaluates a synthesized network across `freq`.
/// Port impedances are held constant over the sweep.
pub fn sweep(
    config: &MatchingConfig,
    result: &MatchingResult,
    freq: &Frequency,
) -> Result<Vec<SweepPoint>, CalcError> {
    let zs = config.source.z();
    let zl = config.load.z();
    let mut out = Vec::with_capacity(freq.npts());

    for i in 0..freq.npts() {
        let w = freq.w_at(i);
        if !(w > 0.0) {
            return Err(CalcError::invalid("frequency", "sweep points must be above 0 Hz"));
        }
        let zin = network_abcd(&result.components, w).input_impedance(zl);
        let gamma = power_wave_gamma(zin, zs).norm();
        if !gamma.is_finite() {
            return Err(CalcError::NonFinite {
                what: format!("reflection at {} Hz", freq.freq_at(i)),
            });
        }
        out.push(SweepPoint {
            freq: freq.freq_at(i),
            input_impedance: Impedance::from_z(zin),
            gamma,
            return_loss_db: return_loss_db(gamma),
            vswr: vswr(gamma),
        });
    }
    tracing::trace!(npts = out.len(), "matching network sweep");

    Ok(out)
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use crate::impedance::Impedance;
    use crate::matching::{synthesize, MatchingConfigBuilder, NetworkKind};
    use crate::util::comp_c64;
    use float_cmp::F64Margin;

    #[test]
    fn abcd_cascade() {
        let z = c64(0.0, 10.0);
        let y = c64(0.0, 0.02);
        let net = Abcd::series(z).cascade(&Abcd::shunt(y));

        comp_c64(&(c64(1.0, 0.0) + z * y), &net.a, F64Margin::default(), "cascade()", "a");
        comp_c64(&z, &net.b, F64Margin::default(), "cascade()", "b");
        comp_c64(&y, &net.c, F64Margin::default(), "cascade()", "c");
        comp_c64(&c64(1.0, 0.0), &net.d, F64Margin::default(), "cascade()", "d");

        let zl = c64(50.0, 0.0);
        let expected = z + (y + zl.inv()).inv();
        let margin = F64Margin {
            epsilon: 1e-12,
            ulps: 10,
        };
        comp_c64(&expected, &net.input_impedance(zl), margin, "input_impedance()", "");
        comp_c64(&zl, &Abcd::identity().input_impedance(zl), margin, "identity", "");
    }

    #[test]
    fn sweep_center_matched() {
        let config = MatchingConfigBuilder::new()
            .source(Impedance::resistive(50.0))
            .load(Impedance::new(20.0, -15.0))
            .freq(433e6)
            .network(NetworkKind::Pi)
            .q(3.0)
            .build();
        let result = synthesize(&config).unwrap();
        let freq = Frequency::from_center_span(433e6, 200e6, 11).unwrap();
        let pts = sweep(&config, &result, &freq).unwrap();

        assert_eq!(11, pts.len());
        assert!(pts[5].gamma < 1e-9, "center gamma {}", pts[5].gamma);
        assert!(pts[5].return_loss_db > 100.0);
        assert!(pts[0].gamma > pts[5].gamma);
        assert!(pts[10].gamma > pts[5].gamma);
        assert!(pts.iter().all(|p| p.gamma <= 1.0 + 1e-12));
    }
}

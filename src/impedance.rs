use crate::error::{require_finite, require_positive, CalcError, Port};
use num_complex::{c64, Complex64};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Complex impedance R + jX in ohms
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Impedance {
    pub r: f64,
    pub x: f64,
}

impl Impedance {
    pub fn new(r: f64, x: f64) -> Self {
        Impedance { r, x }
    }

    pub fn resistive(r: f64) -> Self {
        Impedance { r, x: 0.0 }
    }

    pub fn z(&self) -> Complex64 {
        c64(self.r, self.x)
    }

    pub fn from_z(z: Complex64) -> Self {
        Impedance { r: z.re, x: z.im }
    }

    pub fn conj(&self) -> Self {
        Impedance {
            r: self.r,
            x: -self.x,
        }
    }

    /// Admittance G + jB of the impedance
    pub fn y(&self) -> Complex64 {
        self.z().inv()
    }

    /// Resistance of the equivalent parallel R || X representation
    pub fn parallel_r(&self) -> f64 {
        (self.r * self.r + self.x * self.x) / self.r
    }

    /// Impedance normalized to a reference Z0
    pub fn normalize(&self, z0: f64) -> Self {
        Impedance {
            r: self.r / z0,
            x: self.x / z0,
        }
    }

    /// Validates a matching port: finite and R > 0
    pub fn validate(&self, port: Port) -> Result<Self, CalcError> {
        require_finite(&format!("{} resistance", port), self.r)?;
        require_finite(&format!("{} reactance", port), self.x)?;
        if self.r <= 0.0 {
            return Err(CalcError::NonPositiveResistance {
                port,
                value: self.r,
            });
        }
        Ok(*self)
    }
}

impl From<Complex64> for Impedance {
    fn from(z: Complex64) -> Self {
        Impedance::from_z(z)
    }
}

impl fmt::Display for Impedance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.x < 0.0 {
            write!(f, "{:.2} - j{:.2} Ω", self.r, -self.x)
        } else {
            write!(f, "{:.2} + j{:.2} Ω", self.r, self.x)
        }
    }
}

impl FromStr for Impedance {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse_impedance(s)
    }
}

/// Complex reflection coefficient (Z - Z0) / (Z + Z0)
pub fn z_to_gamma(z: Complex64, z0: f64) -> Complex64 {
    (z - z0) / (z + z0)
}

/// Impedance from reflection coefficient, Z0 (1 + Γ) / (1 - Γ)
pub fn gamma_to_z(gamma: Complex64, z0: f64) -> Complex64 {
    z0 * (1.0 + gamma) / (1.0 - gamma)
}

/// VSWR from reflection magnitude; infinite for total reflection
pub fn vswr(gamma_mag: f64) -> f64 {
    if gamma_mag >= 1.0 {
        f64::INFINITY
    } else {
        (1.0 + gamma_mag) / (1.0 - gamma_mag)
    }
}

/// Inverse of `vswr`
pub fn gamma_from_vswr(vswr: f64) -> f64 {
    if vswr.is_infinite() {
        1.0
    } else {
        (vswr - 1.0) / (vswr + 1.0)
    }
}

/// Return loss in dB as a positive number; infinite for a perfect match
pub fn return_loss_db(gamma_mag: f64) -> f64 {
    if gamma_mag <= 0.0 {
        f64::INFINITY
    } else {
        -20.0 * gamma_mag.log10()
    }
}

/// Fraction of incident power delivered, in percent
pub fn matching_efficiency(gamma_mag: f64) -> f64 {
    (1.0 - gamma_mag * gamma_mag) * 100.0
}

/// Mismatch figures of one port against the reference impedance
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Reflection {
    pub gamma: f64,
    pub gamma_angle_deg: f64,
    pub vswr: f64,
    pub return_loss_db: f64,
    pub efficiency_percent: f64,
    pub mismatch_loss_db: f64,
}

impl Reflection {
    pub fn new(z: Impedance, z0: f64) -> Result<Self, CalcError> {
        require_positive("reference impedance", z0)?;
        let g = z_to_gamma(z.z(), z0);
        if !g.re.is_finite() || !g.im.is_finite() {
            return Err(CalcError::NonFinite {
                what: "reflection coefficient".to_string(),
            });
        }
        let mag = g.norm();
        let efficiency = matching_efficiency(mag);

        Ok(Reflection {
            gamma: mag,
            gamma_angle_deg: g.arg().to_degrees(),
            vswr: vswr(mag),
            return_loss_db: return_loss_db(mag),
            efficiency_percent: efficiency,
            mismatch_loss_db: if efficiency > 0.0 {
                -10.0 * (efficiency / 100.0).log10()
            } else {
                f64::INFINITY
            },
        })
    }
}

#[cfg(test)]
mod impedance_tests {
    use super::*;
    use crate::util::{comp_c64, comp_f64};
    use float_cmp::F64Margin;

    const MARGIN: F64Margin = F64Margin {
        epsilon: 1e-9,
        ulps: 10,
    };

    #[test]
    fn test_impedance() {
        let z = Impedance::new(100.0, 50.0);

        comp_c64(&c64(100.0, 50.0), &z.z(), MARGIN, "z()", "");
        comp_c64(&c64(0.008, -0.004), &z.y(), MARGIN, "y()", "");
        comp_f64(&125.0, &z.parallel_r(), MARGIN, "parallel_r()", "");
        assert_eq!(Impedance::new(2.0, 1.0), z.normalize(50.0));
        assert_eq!(Impedance::new(100.0, -50.0), z.conj());
        assert_eq!("100.00 + j50.00 Ω", z.to_string());
        assert_eq!("100.00 - j50.00 Ω", z.conj().to_string());
    }

    #[test]
    fn test_validate() {
        assert!(Impedance::new(50.0, -10.0).validate(Port::Source).is_ok());
        match Impedance::new(0.0, 10.0).validate(Port::Load) {
            Err(CalcError::NonPositiveResistance { port, .. }) => assert_eq!(Port::Load, port),
            _ => panic!("zero resistance accepted"),
        }
        assert!(Impedance::new(f64::NAN, 0.0).validate(Port::Source).is_err());
    }

    #[test]
    fn test_gamma() {
        comp_c64(&c64(0.0, 0.0), &z_to_gamma(c64(50.0, 0.0), 50.0), MARGIN, "z_to_gamma()", "matched");
        comp_c64(&c64(1.0 / 3.0, 0.0), &z_to_gamma(c64(100.0, 0.0), 50.0), MARGIN, "z_to_gamma()", "100");
        comp_c64(&c64(-1.0, 0.0), &z_to_gamma(c64(0.0, 0.0), 50.0), MARGIN, "z_to_gamma()", "short");

        let z = c64(42.4, -19.6);
        let gamma = z_to_gamma(z, 50.0);
        comp_c64(&z, &gamma_to_z(gamma, 50.0), MARGIN, "gamma_to_z()", "roundtrip");
    }

    #[test]
    fn test_vswr_roundtrip() {
        for g in [0.0, 0.1, 1.0 / 3.0, 0.5, 0.9] {
            comp_f64(&g, &gamma_from_vswr(vswr(g)), MARGIN, "gamma_from_vswr()", "roundtrip");
        }
        comp_f64(&2.0, &vswr(1.0 / 3.0), MARGIN, "vswr()", "2:1");
        assert!(vswr(1.0).is_infinite());
        assert_eq!(1.0, gamma_from_vswr(f64::INFINITY));
    }

    #[test]
    fn test_reflection() {
        let refl = Reflection::new(Impedance::resistive(100.0), 50.0).unwrap();

        comp_f64(&(1.0 / 3.0), &refl.gamma, MARGIN, "gamma", "");
        comp_f64(&2.0, &refl.vswr, MARGIN, "vswr", "");
        comp_f64(&9.542425094393248, &refl.return_loss_db, MARGIN, "return_loss_db", "");
        comp_f64(&(800.0 / 9.0), &refl.efficiency_percent, MARGIN, "efficiency_percent", "");
        comp_f64(&0.5115252244738129, &refl.mismatch_loss_db, MARGIN, "mismatch_loss_db", "");

        let matched = Reflection::new(Impedance::resistive(50.0), 50.0).unwrap();
        assert!(matched.return_loss_db.is_infinite());
        assert_eq!(1.0, matched.vswr);
        assert_eq!(100.0, matched.efficiency_percent);

        assert!(Reflection::new(Impedance::resistive(50.0), 0.0).is_err());
    }
}

//! Power factor correction capacitor sizing.

use crate::error::{require_positive, CalcError};
use crate::frequency::angular;
use crate::unit::{Unit, UnitVal};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Supply {
    Single,
    #[default]
    Three,
}

impl FromStr for Supply {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" | "1" | "single_phase" => Ok(Supply::Single),
            "three" | "3" | "three_phase" => Ok(Supply::Three),
            _ => Err("Supply not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for Supply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Supply::Single => write!(f, "single-phase"),
            Supply::Three => write!(f, "three-phase"),
        }
    }
}

/// Capacitor bank connection on a three-phase supply
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connection {
    Star,
    #[default]
    Delta,
}

impl FromStr for Connection {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "star" | "wye" | "Y" => Ok(Connection::Star),
            "delta" | "D" => Ok(Connection::Delta),
            _ => Err("Connection not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Star => write!(f, "star"),
            Connection::Delta => write!(f, "delta"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PfcConfig {
    /// Active power (kW)
    pub active_power: f64,
    pub existing_pf: f64,
    pub target_pf: f64,
    /// Line voltage (V)
    pub voltage: f64,
    /// Supply frequency (Hz)
    pub freq: f64,
    pub supply: Supply,
    pub connection: Connection,
}

impl Default for PfcConfig {
    fn default() -> Self {
        PfcConfig {
            active_power: 100.0,
            existing_pf: 0.8,
            target_pf: 0.95,
            voltage: 400.0,
            freq: 50.0,
            supply: Supply::Three,
            connection: Connection::Delta,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PfcResult {
    /// Required compensation (kvar)
    pub required_kvar: f64,
    /// Capacitance per phase
    pub capacitance: UnitVal,
    pub apparent_before: f64,
    pub apparent_after: f64,
    pub reactive_before: f64,
    pub reactive_after: f64,
    /// Line current before and after correction (A)
    pub current_before: f64,
    pub current_after: f64,
}

fn require_pf(field: &str, pf: f64) -> Result<f64, CalcError> {
    if !(pf > 0.0 && pf <= 1.0) {
        return Err(CalcError::invalid(field, "must be greater than 0 and at most 1"));
    }
    Ok(pf)
}

fn line_current(kva: f64, voltage: f64, supply: Supply) -> f64 {
    match supply {
        Supply::Single => kva * 1000.0 / voltage,
        Supply::Three => kva * 1000.0 / (3.0_f64.sqrt() * voltage),
    }
}

/// Qc = P (tan φ1 − tan φ2)
pub fn correct_power_factor(config: &PfcConfig) -> Result<PfcResult, CalcError> {
    let p = require_positive("active power", config.active_power)?;
    let pf1 = require_pf("existing power factor", config.existing_pf)?;
    let pf2 = require_pf("target power factor", config.target_pf)?;
    let voltage = require_positive("voltage", config.voltage)?;
    let w = angular(require_positive("frequency", config.freq)?);

    let tan1 = pf1.acos().tan();
    let target = pf2.max(pf1);
    let tan2 = target.acos().tan();
    let required_kvar = p * (tan1 - tan2);
    if pf2 <= pf1 {
        tracing::debug!(pf1, pf2, "target power factor already met");
    }

    let qc = required_kvar * 1000.0;
    let farads = match (config.supply, config.connection) {
        (Supply::Single, _) | (Supply::Three, Connection::Star) => qc / (w * voltage * voltage),
        (Supply::Three, Connection::Delta) => qc / (3.0 * w * voltage * voltage),
    };

    let apparent_before = p / pf1;
    let apparent_after = p / target;

    Ok(PfcResult {
        required_kvar,
        capacitance: UnitVal::best_fit(farads, Unit::Farad),
        apparent_before,
        apparent_after,
        reactive_before: p * tan1,
        reactive_after: p * tan2,
        current_before: line_current(apparent_before, voltage, config.supply),
        current_after: line_current(apparent_after, voltage, config.supply),
    })
}

#[cfg(test)]
mod pfc_tests {
    use super::*;
    use crate::util::comp_rel;

    #[test]
    fn pfc_three_phase_delta() {
        let result = correct_power_factor(&PfcConfig::default()).unwrap();

        comp_rel(&42.13, &result.required_kvar, 1e-3, "required_kvar");
        comp_rel(&279.4e-6, &result.capacitance.val(), 1e-3, "capacitance");
        assert_eq!("279.39 uF", result.capacitance.format(2));
        comp_rel(&125.0, &result.apparent_before, 1e-12, "apparent_before");
        comp_rel(&105.263, &result.apparent_after, 1e-5, "apparent_after");
        comp_rel(&180.42, &result.current_before, 1e-4, "current_before");
        assert!(result.current_after < result.current_before);
    }

    #[test]
    fn pfc_star_and_single() {
        let delta = correct_power_factor(&PfcConfig::default()).unwrap();
        let star = correct_power_factor(&PfcConfig {
            connection: Connection::Star,
            ..PfcConfig::default()
        })
        .unwrap();
        comp_rel(&(3.0 * delta.capacitance.val()), &star.capacitance.val(), 1e-12, "star");

        let single = correct_power_factor(&PfcConfig {
            active_power: 5.0,
            voltage: 230.0,
            supply: Supply::Single,
            ..PfcConfig::default()
        })
        .unwrap();
        let qc = 5000.0 * (0.75 - 0.95_f64.acos().tan());
        comp_rel(&(qc / (angular(50.0) * 230.0 * 230.0)), &single.capacitance.val(), 1e-12, "single");
    }

    #[test]
    fn pfc_no_correction() {
        let result = correct_power_factor(&PfcConfig {
            existing_pf: 0.97,
            target_pf: 0.9,
            ..PfcConfig::default()
        })
        .unwrap();
        assert_eq!(0.0, result.required_kvar);
        assert_eq!(0.0, result.capacitance.val());
        assert_eq!(result.current_before, result.current_after);
    }

    #[test]
    fn pfc_invalid() {
        for pf in [0.0, 1.2, f64::NAN] {
            let config = PfcConfig {
                existing_pf: pf,
                ..PfcConfig::default()
            };
            assert!(correct_power_factor(&config).is_err());
        }
        let config = PfcConfig {
            voltage: -400.0,
            ..PfcConfig::default()
        };
        assert!(correct_power_factor(&config).is_err());
    }
}

//! Three-phase load balance.

use crate::error::{require_finite, require_positive, CalcError};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::{fmt, str::FromStr};

/// Default unbalance limit in percent
pub const DEFAULT_UNBALANCE_LIMIT: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    L1,
    L2,
    L3,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::L1, Phase::L2, Phase::L3];

    pub fn to_str(&self) -> &str {
        match self {
            Phase::L1 => "L1",
            Phase::L2 => "L2",
            Phase::L3 => "L3",
        }
    }

    fn index(&self) -> usize {
        match self {
            Phase::L1 => 0,
            Phase::L2 => 1,
            Phase::L3 => 2,
        }
    }
}

impl FromStr for Phase {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L1" | "l1" | "R" => Ok(Phase::L1),
            "L2" | "l2" | "Y" => Ok(Phase::L2),
            "L3" | "l3" | "B" => Ok(Phase::L3),
            _ => Err("Phase not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Phase currents L1, L2, L3 (A)
    pub currents: [f64; 3],
    /// Unbalance limit (%)
    pub limit: f64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        BalanceConfig {
            currents: [0.0; 3],
            limit: DEFAULT_UNBALANCE_LIMIT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalanceResult {
    pub average: f64,
    pub max_deviation: f64,
    pub unbalance_percent: f64,
    pub compliant: bool,
    pub heaviest: Phase,
    pub lightest: Phase,
    /// Neutral current for unity power factor loads (A)
    pub neutral_current: f64,
}

/// Neutral current as the phasor sum of the phase currents at 0°, -120°, +120°
pub fn neutral_current(currents: &[f64; 3]) -> f64 {
    currents
        .iter()
        .enumerate()
        .map(|(i, amps)| Complex64::from_polar(*amps, -2.0 * PI / 3.0 * i as f64))
        .sum::<Complex64>()
        .norm()
}

fn round_centi(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

/// Unbalance as the largest excess over the average current.
///
/// Average and deviation are reported to 0.01 A and the percentage is
/// taken from the reported figures.
pub fn check_balance(config: &BalanceConfig) -> Result<BalanceResult, CalcError> {
    for (phase, amps) in Phase::ALL.iter().zip(config.currents.iter()) {
        require_finite(&format!("{} current", phase), *amps)?;
        if *amps < 0.0 {
            return Err(CalcError::invalid(&format!("{} current", phase), "must not be negative"));
        }
    }
    let limit = require_positive("unbalance limit", config.limit)?;

    let average = round_centi(config.currents.iter().sum::<f64>() / 3.0);
    if average <= 0.0 {
        return Err(CalcError::invalid("phase currents", "at least one phase must carry current"));
    }
    let (heaviest, max) = Phase::ALL
        .iter()
        .map(|p| (*p, config.currents[p.index()]))
        .fold((Phase::L1, f64::MIN), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
    let lightest = Phase::ALL
        .iter()
        .copied()
        .fold(Phase::L1, |acc, p| {
            if config.currents[p.index()] < config.currents[acc.index()] {
                p
            } else {
                acc
            }
        });

    let max_deviation = round_centi(max - average);
    let unbalance_percent = max_deviation / average * 100.0;
    tracing::debug!(average, max_deviation, unbalance_percent, "phase balance");

    Ok(BalanceResult {
        average,
        max_deviation,
        unbalance_percent,
        compliant: unbalance_percent <= limit,
        heaviest,
        lightest,
        neutral_current: neutral_current(&config.currents),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SinglePhaseLoad {
    pub name: String,
    /// Load current (A)
    pub current: f64,
}

impl SinglePhaseLoad {
    pub fn new(name: &str, current: f64) -> Self {
        SinglePhaseLoad {
            name: name.to_string(),
            current,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assignment {
    pub name: String,
    pub current: f64,
    pub phase: Phase,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Distribution {
    pub assignments: Vec<Assignment>,
    pub totals: [f64; 3],
    pub balance: BalanceResult,
}

/// Greedy assignment: largest load first, each to the least loaded phase
pub fn distribute(loads: &[SinglePhaseLoad], limit: f64) -> Result<Distribution, CalcError> {
    if loads.is_empty() {
        return Err(CalcError::invalid("loads", "no loads to distribute"));
    }
    for load in loads.iter() {
        require_positive(&format!("{} current", load.name), load.current)?;
    }

    let mut order: Vec<&SinglePhaseLoad> = loads.iter().collect();
    order.sort_by(|a, b| b.current.total_cmp(&a.current));

    let mut totals = [0.0_f64; 3];
    let mut assignments = Vec::with_capacity(loads.len());
    for load in order {
        let phase = Phase::ALL
            .iter()
            .copied()
            .fold(Phase::L1, |acc, p| if totals[p.index()] < totals[acc.index()] { p } else { acc });
        totals[phase.index()] += load.current;
        assignments.push(Assignment {
            name: load.name.clone(),
            current: load.current,
            phase,
        });
    }

    let balance = check_balance(&BalanceConfig {
        currents: totals,
        limit,
    })?;

    Ok(Distribution {
        assignments,
        totals,
        balance,
    })
}

#[cfg(test)]
mod balance_tests {
    use super::*;
    use crate::util::comp_f64;
    use float_cmp::F64Margin;

    const MARGIN: F64Margin = F64Margin {
        epsilon: 1e-9,
        ulps: 10,
    };

    #[test]
    fn balance_three_phase() {
        let config = BalanceConfig {
            currents: [400.0, 425.0, 370.0],
            ..BalanceConfig::default()
        };
        let result = check_balance(&config).unwrap();

        comp_f64(&398.33, &result.average, MARGIN, "average", "");
        comp_f64(&26.67, &result.max_deviation, MARGIN, "max_deviation", "");
        assert_eq!("6.70", format!("{:.2}", result.unbalance_percent));
        assert!(result.compliant);
        assert_eq!(Phase::L2, result.heaviest);
        assert_eq!(Phase::L3, result.lightest);
    }

    #[test]
    fn balance_neutral() {
        comp_f64(&0.0, &neutral_current(&[100.0, 100.0, 100.0]), MARGIN, "neutral_current()", "balanced");
        comp_f64(&100.0, &neutral_current(&[100.0, 0.0, 0.0]), MARGIN, "neutral_current()", "single");
        comp_f64(&50.0, &neutral_current(&[100.0, 50.0, 50.0]), MARGIN, "neutral_current()", "pair");
    }

    #[test]
    fn balance_invalid() {
        let negative = BalanceConfig {
            currents: [10.0, -1.0, 10.0],
            ..BalanceConfig::default()
        };
        match check_balance(&negative) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!("L2 current", field),
            _ => panic!("negative current accepted"),
        }
        assert!(check_balance(&BalanceConfig::default()).is_err());
    }

    #[test]
    fn balance_distribute() {
        let loads = vec![
            SinglePhaseLoad::new("heater", 30.0),
            SinglePhaseLoad::new("lights", 10.0),
            SinglePhaseLoad::new("sockets", 20.0),
            SinglePhaseLoad::new("oven", 25.0),
            SinglePhaseLoad::new("pump", 15.0),
        ];
        let dist = distribute(&loads, DEFAULT_UNBALANCE_LIMIT).unwrap();

        assert_eq!(5, dist.assignments.len());
        assert_eq!("heater", dist.assignments[0].name);
        comp_f64(&100.0, &dist.totals.iter().sum::<f64>(), MARGIN, "totals", "");
        // 30 | 25+10 | 20+15
        assert_eq!([30.0, 35.0, 35.0], dist.totals);
        assert!(dist.balance.compliant);
        assert!(distribute(&[], 10.0).is_err());
    }
}

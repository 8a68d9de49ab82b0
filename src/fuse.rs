//! gG fuse operating time and adiabatic cable withstand.

use crate::cable::Insulation;
use crate::error::{require_positive, CalcError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prospective current (A) to operate in 5 s, 0.4 s and 0.1 s
#[rustfmt::skip]
const GG_POINTS: [(f64, [f64; 3]); 14] = [
    (6.0,   [17.0,   27.0,   40.0]),
    (10.0,  [31.0,   47.0,   70.0]),
    (16.0,  [52.0,   81.0,   120.0]),
    (20.0,  [68.0,   110.0,  165.0]),
    (25.0,  [86.0,   150.0,  220.0]),
    (32.0,  [115.0,  210.0,  310.0]),
    (40.0,  [150.0,  280.0,  420.0]),
    (50.0,  [190.0,  390.0,  580.0]),
    (63.0,  [270.0,  520.0,  780.0]),
    (80.0,  [350.0,  700.0,  1050.0]),
    (100.0, [440.0,  940.0,  1400.0]),
    (125.0, [580.0,  1250.0, 1900.0]),
    (160.0, [760.0,  1650.0, 2500.0]),
    (200.0, [1000.0, 2200.0, 3300.0]),
];

const POINT_TIMES: [f64; 3] = [5.0, 0.4, 0.1];

pub const NON_FUSING_MULTIPLE: f64 = 1.25;
pub const FUSING_MULTIPLE: f64 = 1.6;
/// Conventional time (s) at the fusing current
pub const CONVENTIONAL_TIME: f64 = 3600.0;

/// Tabulated gG ratings (A)
pub fn gg_ratings() -> impl Iterator<Item = f64> {
    GG_POINTS.iter().map(|(rating, _)| *rating)
}

fn gg_row(rating: f64) -> Result<&'static [f64; 3], CalcError> {
    GG_POINTS
        .iter()
        .find(|(r, _)| (r - rating).abs() < 1e-9)
        .map(|(_, row)| row)
        .ok_or_else(|| CalcError::invalid("fuse rating", format!("no gG characteristic for {} A", rating)))
}

/// Current (A) that operates a gG fuse of `rating` within `time` seconds,
/// for one of the tabulated times (5 s, 0.4 s, 0.1 s).
pub fn gg_current_for(rating: f64, time: f64) -> Result<f64, CalcError> {
    let row = gg_row(rating)?;
    POINT_TIMES
        .iter()
        .position(|t| (t - time).abs() < 1e-9)
        .map(|k| row[k])
        .ok_or_else(|| CalcError::invalid("disconnection time", "must be 5 s, 0.4 s or 0.1 s"))
}

/// Characteristic of one rating as (current, time) points, rising current
pub fn characteristic(rating: f64) -> Result<Vec<(f64, f64)>, CalcError> {
    let row = gg_row(rating)?;
    let mut points = vec![(FUSING_MULTIPLE * rating, CONVENTIONAL_TIME)];
    points.extend(row.iter().copied().zip(POINT_TIMES.iter().copied()));
    Ok(points)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FuseOperation {
    /// At or below the non-fusing current
    NoOperation,
    /// Between the non-fusing and fusing currents
    BeyondConventional { conventional_time: f64 },
    /// Operating time (s)
    Operates { time: f64 },
}

impl FuseOperation {
    pub fn time(&self) -> Option<f64> {
        match self {
            FuseOperation::Operates { time } => Some(*time),
            _ => None,
        }
    }
}

impl fmt::Display for FuseOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuseOperation::NoOperation => write!(f, "does not operate"),
            FuseOperation::BeyondConventional { conventional_time } => {
                write!(f, "operates after more than {} s", conventional_time)
            }
            FuseOperation::Operates { time } if *time < 1.0 => write!(f, "operates in {:.3} s", time),
            FuseOperation::Operates { time } => write!(f, "operates in {:.1} s", time),
        }
    }
}

/// Operating time of a gG fuse at a prospective current.
///
/// Log–log interpolation between characteristic points; above the 0.1 s
/// point the curve continues at constant I²t.
pub fn operating_time(rating: f64, current: f64) -> Result<FuseOperation, CalcError> {
    let current = require_positive("fault current", current)?;
    let points = characteristic(rating)?;

    if current <= NON_FUSING_MULTIPLE * rating {
        return Ok(FuseOperation::NoOperation);
    }
    if current < points[0].0 {
        return Ok(FuseOperation::BeyondConventional {
            conventional_time: CONVENTIONAL_TIME,
        });
    }

    let time = match points.windows(2).find(|w| current <= w[1].0) {
        Some(w) => {
            let ((i1, t1), (i2, t2)) = (w[0], w[1]);
            let slope = (t2.ln() - t1.ln()) / (i2.ln() - i1.ln());
            (t1.ln() + slope * (current.ln() - i1.ln())).exp()
        }
        None => {
            let (i_fast, t_fast) = points[points.len() - 1];
            t_fast * (i_fast / current).powi(2)
        }
    };
    tracing::trace!(rating, current, time, "gG operating time");
    Ok(FuseOperation::Operates { time })
}

/// Adiabatic k factor for copper conductors
pub fn k_factor(insulation: Insulation) -> f64 {
    match insulation {
        Insulation::Pvc => 115.0,
        Insulation::Xlpe => 143.0,
    }
}

/// Time (s) a conductor of `size` mm² withstands `current` adiabatically
pub fn withstand_time(size: f64, insulation: Insulation, current: f64) -> Result<f64, CalcError> {
    let size = require_positive("conductor size", size)?;
    let current = require_positive("fault current", current)?;
    Ok((k_factor(insulation) * size / current).powi(2))
}

/// Conductor protected by the fuse
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conductor {
    /// Cross-section (mm²)
    pub size: f64,
    pub insulation: Insulation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuseConfig {
    /// Fuse rating In (A)
    pub rating: f64,
    /// Prospective fault current (A)
    pub current: f64,
    pub conductor: Option<Conductor>,
}

impl Default for FuseConfig {
    fn default() -> Self {
        FuseConfig {
            rating: 32.0,
            current: 500.0,
            conductor: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FuseResult {
    pub operation: FuseOperation,
    /// Current as a multiple of the rating
    pub multiple: f64,
    pub withstand_time: Option<f64>,
    /// Fuse clears before the conductor reaches its limit
    pub conductor_protected: Option<bool>,
}

pub fn check_fuse(config: &FuseConfig) -> Result<FuseResult, CalcError> {
    let operation = operating_time(config.rating, config.current)?;
    let withstand_time = match config.conductor {
        Some(c) => Some(withstand_time(c.size, c.insulation, config.current)?),
        None => None,
    };
    let conductor_protected = withstand_time.map(|limit| operation.time().is_some_and(|t| t <= limit));

    Ok(FuseResult {
        operation,
        multiple: config.current / config.rating,
        withstand_time,
        conductor_protected,
    })
}

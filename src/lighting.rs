//! Lighting power density against space-type allowances.

use crate::error::{require_positive, CalcError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceType {
    #[default]
    OpenOffice,
    EnclosedOffice,
    Corridor,
    Restroom,
    Storage,
    Classroom,
    Conference,
    Lobby,
}

impl SpaceType {
    pub fn to_str(&self) -> &str {
        match self {
            SpaceType::OpenOffice => "open office",
            SpaceType::EnclosedOffice => "enclosed office",
            SpaceType::Corridor => "corridor",
            SpaceType::Restroom => "restroom",
            SpaceType::Storage => "storage",
            SpaceType::Classroom => "classroom",
            SpaceType::Conference => "conference room",
            SpaceType::Lobby => "lobby",
        }
    }

    /// Allowed lighting power density (W/m²)
    pub fn allowance(&self) -> f64 {
        match self {
            SpaceType::OpenOffice => 6.57,
            SpaceType::EnclosedOffice => 7.99,
            SpaceType::Corridor => 4.41,
            SpaceType::Restroom => 6.78,
            SpaceType::Storage => 4.09,
            SpaceType::Classroom => 7.64,
            SpaceType::Conference => 10.44,
            SpaceType::Lobby => 9.04,
        }
    }
}

impl FromStr for SpaceType {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open_office" | "open office" => Ok(SpaceType::OpenOffice),
            "enclosed_office" | "enclosed office" | "office" => Ok(SpaceType::EnclosedOffice),
            "corridor" => Ok(SpaceType::Corridor),
            "restroom" | "toilet" => Ok(SpaceType::Restroom),
            "storage" => Ok(SpaceType::Storage),
            "classroom" => Ok(SpaceType::Classroom),
            "conference" | "conference room" | "meeting" => Ok(SpaceType::Conference),
            "lobby" => Ok(SpaceType::Lobby),
            _ => Err("SpaceType not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for SpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LuminaireGroup {
    pub count: u32,
    /// Power per luminaire (W)
    pub watts: f64,
}

/// Lighting controls that earn a power credit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub occupancy: bool,
    pub daylight: bool,
    pub scheduling: bool,
    pub dimming: bool,
}

impl Controls {
    /// Fraction of installed power credited
    pub fn credit(&self) -> f64 {
        [
            (self.occupancy, 0.10),
            (self.daylight, 0.10),
            (self.scheduling, 0.05),
            (self.dimming, 0.05),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, credit)| credit)
        .sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Floor area (m²)
    pub area: f64,
    pub groups: Vec<LuminaireGroup>,
    pub space: SpaceType,
    /// Overrides the space-type allowance (W/m²)
    pub custom_allowance: Option<f64>,
    pub controls: Controls,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LightingResult {
    pub installed_watts: f64,
    pub lpd: f64,
    pub credit: f64,
    pub effective_lpd: f64,
    pub allowance: f64,
    pub compliant: bool,
    /// Headroom below the allowance, negative when exceeded (%)
    pub margin_percent: f64,
}

pub fn lighting_density(config: &LightingConfig) -> Result<LightingResult, CalcError> {
    let area = require_positive("area", config.area)?;
    if config.groups.is_empty() {
        return Err(CalcError::invalid("luminaires", "at least one luminaire group is required"));
    }
    let mut installed_watts = 0.0;
    for group in config.groups.iter() {
        require_positive("luminaire power", group.watts)?;
        installed_watts += group.count as f64 * group.watts;
    }
    let allowance = match config.custom_allowance {
        Some(lpd) => require_positive("custom allowance", lpd)?,
        None => config.space.allowance(),
    };

    let lpd = installed_watts / area;
    let credit = config.controls.credit();
    let effective_lpd = lpd * (1.0 - credit);
    tracing::debug!(lpd, effective_lpd, allowance, "lighting power density");

    Ok(LightingResult {
        installed_watts,
        lpd,
        credit,
        effective_lpd,
        allowance,
        compliant: effective_lpd <= allowance,
        margin_percent: (allowance - effective_lpd) / allowance * 100.0,
    })
}

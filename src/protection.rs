//! Protective device selection, overload coordination and earth fault
//! loop impedance.

use crate::cable::Insulation;
use crate::error::{require_finite, require_positive, CalcError};
use crate::fuse::{gg_current_for, gg_ratings};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// MCB ratings In (A)
pub const MCB_RATINGS: [f64; 12] = [6.0, 10.0, 16.0, 20.0, 25.0, 32.0, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0];

/// BS 3036 rewirable fuse ratings In (A)
pub const REWIRABLE_RATINGS: [f64; 7] = [5.0, 15.0, 20.0, 30.0, 45.0, 60.0, 100.0];

/// Minimum voltage factor
pub const CMIN: f64 = 0.95;
/// Overload coordination limit as a multiple of Iz
pub const OVERLOAD_LIMIT: f64 = 1.45;

/// Copper conductor resistance at 20 °C (mm², mΩ/m)
#[rustfmt::skip]
const COPPER_RESISTANCE: [(f64, f64); 16] = [
    (1.5, 12.10), (2.5, 7.41), (4.0, 4.61), (6.0, 3.08), (10.0, 1.83), (16.0, 1.15),
    (25.0, 0.727), (35.0, 0.524), (50.0, 0.387), (70.0, 0.268), (95.0, 0.193),
    (120.0, 0.153), (150.0, 0.124), (185.0, 0.0991), (240.0, 0.0754), (300.0, 0.0601),
];

/// Conductor resistance (mΩ/m) at 20 °C
pub fn conductor_resistance(size: f64) -> Result<f64, CalcError> {
    COPPER_RESISTANCE
        .iter()
        .find(|(s, _)| (s - size).abs() < 1e-9)
        .map(|(_, r)| *r)
        .ok_or_else(|| CalcError::invalid("conductor size", format!("{} mm² is not a standard size", size)))
}

/// Multiplier from 20 °C to the conductor operating temperature
pub fn temperature_multiplier(insulation: Insulation) -> f64 {
    match insulation {
        Insulation::Pvc => 1.20,
        Insulation::Xlpe => 1.28,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    McbB,
    #[default]
    McbC,
    McbD,
    FuseGg,
    Rewirable,
}

impl Device {
    pub fn to_str(&self) -> &str {
        match self {
            Device::McbB => "MCB type B",
            Device::McbC => "MCB type C",
            Device::McbD => "MCB type D",
            Device::FuseGg => "BS 88 gG fuse",
            Device::Rewirable => "BS 3036 rewirable fuse",
        }
    }

    /// Ratings made for this device family, ascending
    pub fn ratings(&self) -> Vec<f64> {
        match self {
            Device::McbB | Device::McbC | Device::McbD => MCB_RATINGS.to_vec(),
            Device::FuseGg => gg_ratings().collect(),
            Device::Rewirable => REWIRABLE_RATINGS.to_vec(),
        }
    }

    /// Conventional tripping current as a multiple of In
    pub fn fusing_multiple(&self) -> f64 {
        match self {
            Device::Rewirable => 2.0,
            _ => 1.45,
        }
    }

    /// Current (A) that disconnects within `time` seconds
    pub fn disconnection_current(&self, rating: f64, time: DisconnectionTime) -> Result<f64, CalcError> {
        match self {
            Device::McbB => Ok(5.0 * rating),
            Device::McbC => Ok(10.0 * rating),
            Device::McbD => Ok(20.0 * rating),
            Device::FuseGg => gg_current_for(rating, time.seconds()),
            Device::Rewirable => match time {
                DisconnectionTime::Fast => Ok(6.0 * rating),
                DisconnectionTime::Slow => Ok(2.5 * rating),
            },
        }
    }
}

impl FromStr for Device {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" | "mcb_b" => Ok(Device::McbB),
            "C" | "mcb_c" => Ok(Device::McbC),
            "D" | "mcb_d" => Ok(Device::McbD),
            "gG" | "gg" | "fuse_gg" | "bs88" => Ok(Device::FuseGg),
            "rewirable" | "bs3036" => Ok(Device::Rewirable),
            _ => Err("Device not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Maximum disconnection time for the circuit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectionTime {
    /// 0.4 s final circuits
    #[default]
    Fast,
    /// 5 s distribution circuits
    Slow,
}

impl DisconnectionTime {
    pub fn seconds(&self) -> f64 {
        match self {
            DisconnectionTime::Fast => 0.4,
            DisconnectionTime::Slow => 5.0,
        }
    }
}

/// Circuit data for the actual loop impedance
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// External loop impedance Ze (Ω)
    pub ze: f64,
    /// Line conductor (mm²)
    pub line_size: f64,
    /// Protective conductor (mm²), line size when absent
    pub cpc_size: Option<f64>,
    /// Route length (m)
    pub length: f64,
    pub insulation: Insulation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Design current Ib (A)
    pub design_current: f64,
    /// Cable current-carrying capacity Iz (A)
    pub cable_capacity: f64,
    pub device: Device,
    pub disconnection: DisconnectionTime,
    /// Nominal voltage to earth U0 (V)
    pub voltage: f64,
    pub circuit: Option<Circuit>,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        ProtectionConfig {
            design_current: 20.0,
            cable_capacity: 27.0,
            device: Device::McbC,
            disconnection: DisconnectionTime::Fast,
            voltage: 230.0,
            circuit: None,
        }
    }
}

#[derive(Default)]
pub struct ProtectionConfigBuilder {
    config: ProtectionConfig,
}

impl ProtectionConfigBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn design_current(mut self, amps: f64) -> Self {
        self.config.design_current = amps;
        self
    }

    pub fn cable_capacity(mut self, amps: f64) -> Self {
        self.config.cable_capacity = amps;
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.config.device = device;
        self
    }

    pub fn disconnection(mut self, time: DisconnectionTime) -> Self {
        self.config.disconnection = time;
        self
    }

    pub fn voltage(mut self, volts: f64) -> Self {
        self.config.voltage = volts;
        self
    }

    pub fn circuit(mut self, circuit: Circuit) -> Self {
        self.config.circuit = Some(circuit);
        self
    }

    pub fn build(self) -> ProtectionConfig {
        self.config
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProtectionResult {
    pub device: Device,
    /// Selected rating In (A)
    pub rating: f64,
    /// Conventional tripping current I2 (A)
    pub i2: f64,
    pub overload_ok: bool,
    /// Disconnection current Ia (A)
    pub ia: f64,
    pub zs_max: f64,
    pub zs_actual: Option<f64>,
    pub disconnection_ok: Option<bool>,
    pub compliant: bool,
}

/// Smallest rating of `device` with Ib ≤ In ≤ Iz
pub fn select_rating(device: Device, ib: f64, iz: f64) -> Result<f64, CalcError> {
    let rating = device
        .ratings()
        .into_iter()
        .find(|r| *r >= ib)
        .ok_or_else(|| CalcError::NoSolution {
            reason: format!("design current {} A exceeds the largest {} rating", ib, device),
        })?;
    if rating > iz {
        return Err(CalcError::NoSolution {
            reason: format!("no {} rating between Ib = {} A and Iz = {} A", device, ib, iz),
        });
    }
    Ok(rating)
}

/// Zs = Ze + (R1 + R2) · L · multiplier
pub fn loop_impedance(circuit: &Circuit) -> Result<f64, CalcError> {
    let ze = require_finite("Ze", circuit.ze)?;
    if ze < 0.0 {
        return Err(CalcError::invalid("Ze", "must not be negative"));
    }
    let length = require_positive("length", circuit.length)?;
    let r1 = conductor_resistance(circuit.line_size)?;
    let r2 = conductor_resistance(circuit.cpc_size.unwrap_or(circuit.line_size))?;
    Ok(ze + (r1 + r2) * length / 1000.0 * temperature_multiplier(circuit.insulation))
}

pub fn check_protection(config: &ProtectionConfig) -> Result<ProtectionResult, CalcError> {
    let ib = require_positive("design current", config.design_current)?;
    let iz = require_positive("cable capacity", config.cable_capacity)?;
    let u0 = require_positive("voltage", config.voltage)?;

    let rating = select_rating(config.device, ib, iz)?;
    let i2 = config.device.fusing_multiple() * rating;
    let overload_ok = i2 <= OVERLOAD_LIMIT * iz + 1e-9;

    let ia = config.device.disconnection_current(rating, config.disconnection)?;
    let zs_max = CMIN * u0 / ia;
    let zs_actual = match config.circuit.as_ref() {
        Some(circuit) => Some(loop_impedance(circuit)?),
        None => None,
    };
    let disconnection_ok = zs_actual.map(|zs| zs <= zs_max);
    tracing::debug!(rating, i2, ia, zs_max, ?zs_actual, "protective device");

    Ok(ProtectionResult {
        device: config.device,
        rating,
        i2,
        overload_ok,
        ia,
        zs_max,
        zs_actual,
        disconnection_ok,
        compliant: overload_ok && disconnection_ok.unwrap_or(true),
    })
}

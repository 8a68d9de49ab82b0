//! Cable sizing against tabulated current-carrying capacity and voltage drop.

use crate::error::{require_finite, require_positive, CalcError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub mod factors;
pub mod resolver;
pub mod tables;

pub use self::factors::Grouping;
pub use self::resolver::{resolve, Route, RouteKey};
pub use self::tables::{CableTables, TableKey, STANDARD_SIZES};

/// Default voltage-drop limit in percent of nominal voltage
pub const DEFAULT_VD_LIMIT: f64 = 5.0;

/// Implements `to_str`, `FromStr` and `Display` for a unit-variant enum
macro_rules! keyed_enum {
    ($name:ident { $($variant:ident => $key:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            pub fn to_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = Box<dyn std::error::Error>;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key $(| $alias)* => Ok($name::$variant),)+
                    _ => Err(format!("{} not recognized", stringify!($name)).into()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_str())
            }
        }
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insulation {
    #[default]
    Pvc,
    Xlpe,
}

keyed_enum!(Insulation { Pvc => "pvc" | "PVC", Xlpe => "xlpe" | "XLPE" });

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Armour {
    #[default]
    NonArmoured,
    Armoured,
}

keyed_enum!(Armour {
    NonArmoured => "non_armoured" | "non-armoured" | "unarmoured",
    Armoured => "armoured" | "swa",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrangement {
    SingleCore,
    #[default]
    Multicore,
}

keyed_enum!(Arrangement {
    SingleCore => "single_core" | "single-core" | "single",
    Multicore => "multicore" | "multi-core" | "multi",
});

/// Reference installation method
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Enclosed in conduit in a thermally insulating wall
    A,
    /// Enclosed in conduit or trunking on a wall
    B,
    /// Clipped direct
    #[default]
    C,
    /// Multicore in free air
    E,
    /// Single-core touching in free air
    F,
    /// Single-core spaced in free air
    G,
}

keyed_enum!(Method { A => "A" | "a", B => "B" | "b", C => "C" | "c", E => "E" | "e", F => "F" | "f", G => "G" | "g" });

/// Loaded conductors: two for single-phase, three for three-phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conductors {
    Two,
    #[default]
    Three,
}

keyed_enum!(Conductors { Two => "two" | "2" | "single_phase", Three => "three" | "3" | "three_phase" });

impl Conductors {
    /// Key used in the table tree
    pub fn key(&self) -> &'static str {
        match self {
            Conductors::Two => "2",
            Conductors::Three => "3",
        }
    }

    /// Nominal voltage the drop percentage is taken against
    pub fn nominal_voltage(&self) -> f64 {
        match self {
            Conductors::Two => 230.0,
            Conductors::Three => 400.0,
        }
    }
}

/// Single-core cable formation for methods F and G
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    Touching,
    Trefoil,
    SpacedHorizontal,
    SpacedVertical,
}

keyed_enum!(Formation {
    Touching => "touching" | "flat",
    Trefoil => "trefoil",
    SpacedHorizontal => "spaced_horizontal" | "horizontal",
    SpacedVertical => "spaced_vertical" | "vertical",
});

/// Table category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ampacity,
    VoltageDrop,
}

keyed_enum!(Category { Ampacity => "ampacity", VoltageDrop => "voltage_drop" });

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableConfig {
    /// Design current Ib (A)
    pub design_current: f64,
    /// Protective device rating In (A)
    pub device_rating: Option<f64>,
    pub insulation: Insulation,
    pub armour: Armour,
    pub arrangement: Arrangement,
    pub method: Method,
    pub conductors: Conductors,
    pub formation: Option<Formation>,
    /// Ambient temperature (°C)
    pub ambient: f64,
    pub circuits: u32,
    pub grouping: Grouping,
    /// Thermal insulation factor Ci
    pub thermal_insulation: f64,
    /// Route length (m)
    pub length: f64,
    /// Overrides the 230 V / 400 V nominal voltage
    pub voltage: Option<f64>,
    /// Voltage-drop limit (%)
    pub vd_limit: f64,
}

impl Default for CableConfig {
    fn default() -> Self {
        CableConfig {
            design_current: 32.0,
            device_rating: None,
            insulation: Insulation::Pvc,
            armour: Armour::NonArmoured,
            arrangement: Arrangement::Multicore,
            method: Method::C,
            conductors: Conductors::Three,
            formation: None,
            ambient: 30.0,
            circuits: 1,
            grouping: Grouping::Bunched,
            thermal_insulation: 1.0,
            length: 20.0,
            voltage: None,
            vd_limit: DEFAULT_VD_LIMIT,
        }
    }
}

impl CableConfig {
    pub fn route_key(&self) -> RouteKey {
        RouteKey {
            arrangement: self.arrangement,
            armour: self.armour,
            method: self.method,
            conductors: self.conductors,
            formation: self.formation,
        }
    }

    fn table_key<'a>(&self, category: Category, method: &'a str) -> TableKey<'a> {
        TableKey {
            insulation: self.insulation,
            armour: self.armour,
            arrangement: self.arrangement,
            category,
            method,
            conductors: self.conductors,
        }
    }
}

/// Builder design pattern for CableConfig.
///
/// ## Example
/// ```
/// use elecalc::cable::{size_cable, CableConfigBuilder, Insulation};
///
/// let config = CableConfigBuilder::new()
///     .design_current(100.0)
///     .insulation(Insulation::Xlpe)
///     .build();
/// let result = size_cable(&config).unwrap();
/// assert!(result.tabulated_ampacity >= 100.0);
/// ```
#[derive(Default)]
pub struct CableConfigBuilder {
    config: CableConfig,
}

impl CableConfigBuilder {
    pub fn new() -> Self {
        CableConfigBuilder::default()
    }

    pub fn design_current(mut self, ib: f64) -> Self {
        self.config.design_current = ib;
        self
    }

    pub fn device_rating(mut self, rating: f64) -> Self {
        self.config.device_rating = Some(rating);
        self
    }

    pub fn insulation(mut self, insulation: Insulation) -> Self {
        self.config.insulation = insulation;
        self
    }

    pub fn armour(mut self, armour: Armour) -> Self {
        self.config.armour = armour;
        self
    }

    pub fn arrangement(mut self, arrangement: Arrangement) -> Self {
        self.config.arrangement = arrangement;
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.config.method = method;
        self
    }

    pub fn conductors(mut self, conductors: Conductors) -> Self {
        self.config.conductors = conductors;
        self
    }

    pub fn formation(mut self, formation: Formation) -> Self {
        self.config.formation = Some(formation);
        self
    }

    pub fn ambient(mut self, ambient: f64) -> Self {
        self.config.ambient = ambient;
        self
    }

    pub fn circuits(mut self, circuits: u32) -> Self {
        self.config.circuits = circuits;
        self
    }

    pub fn grouping(mut self, grouping: Grouping) -> Self {
        self.config.grouping = grouping;
        self
    }

    pub fn thermal_insulation(mut self, ci: f64) -> Self {
        self.config.thermal_insulation = ci;
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.config.length = length;
        self
    }

    pub fn voltage(mut self, voltage: f64) -> Self {
        self.config.voltage = Some(voltage);
        self
    }

    pub fn vd_limit(mut self, limit: f64) -> Self {
        self.config.vd_limit = limit;
        self
    }

    pub fn build(self) -> CableConfig {
        self.config
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CableResult {
    pub route: Route,
    pub ca: f64,
    pub cg: f64,
    pub ci: f64,
    /// Minimum tabulated capacity It (A)
    pub required_ccc: f64,
    /// Selected size (mm²)
    pub size: f64,
    /// Smallest size meeting It alone (mm²)
    pub thermal_size: f64,
    pub tabulated_ampacity: f64,
    /// Tabulated capacity after the rating factors, Iz (A)
    pub derated_ampacity: f64,
    /// mV/A/m
    pub vd_factor: f64,
    pub voltage_drop: f64,
    pub voltage_drop_percent: f64,
    pub vd_limit: f64,
    pub vd_compliant: bool,
    /// Size was raised above `thermal_size` to meet the drop limit
    pub increased_for_voltage_drop: bool,
}

/// Sizes a cable against the built-in tables
pub fn size_cable(config: &CableConfig) -> Result<CableResult, CalcError> {
    size_cable_with(CableTables::builtin(), config)
}

/// Sizes a cable against a supplied dataset.
///
/// It = max(Ib, In) / (Ca·Cg·Ci). The smallest size whose ampacity meets It
/// is raised, if needed, to the smallest size whose drop is within the limit.
pub fn size_cable_with(tables: &CableTables, config: &CableConfig) -> Result<CableResult, CalcError> {
    let ib = require_positive("design current", config.design_current)?;
    let current = match config.device_rating {
        Some(rating) => {
            require_positive("device rating", rating)?;
            if rating < ib {
                return Err(CalcError::invalid(
                    "device rating",
                    "must be at least the design current",
                ));
            }
            rating
        }
        None => ib,
    };
    let length = require_finite("length", config.length)?;
    if length < 0.0 {
        return Err(CalcError::invalid("length", "must not be negative"));
    }
    let vd_limit = require_positive("voltage drop limit", config.vd_limit)?;
    let voltage = match config.voltage {
        Some(v) => require_positive("voltage", v)?,
        None => config.conductors.nominal_voltage(),
    };

    let ca = factors::temperature_factor(config.insulation, config.ambient)?;
    let cg = factors::grouping_factor(config.grouping, config.circuits)?;
    let ci = factors::insulation_factor(config.thermal_insulation)?;
    let required_ccc = current / (ca * cg * ci);

    let route = resolve(&config.route_key())?;
    let amp_key = config.table_key(Category::Ampacity, route.ampacity);
    let vd_key = config.table_key(Category::VoltageDrop, route.voltage_drop);
    let amps = tables.column(&amp_key)?;
    tables.column(&vd_key)?;

    let Some((thermal_idx, _)) = STANDARD_SIZES
        .iter()
        .enumerate()
        .filter_map(|(i, s)| amps.get(&tables::size_key(*s)).map(|a| (i, *a)))
        .find(|(_, amp)| *amp >= required_ccc)
    else {
        return Err(CalcError::NoSolution {
            reason: format!(
                "required capacity {:.1} A exceeds the largest tabulated size for {}",
                required_ccc,
                amp_key.path()
            ),
        });
    };
    let thermal_size = STANDARD_SIZES[thermal_idx];
    tracing::debug!(required_ccc, thermal_size, "cable sized for current");

    for size in STANDARD_SIZES[thermal_idx..].iter().copied() {
        let Some(tabulated) = amps.get(&tables::size_key(size)).copied() else {
            continue;
        };
        let vd_factor = tables.lookup(&vd_key, size)?;
        let voltage_drop = vd_factor * ib * length / 1000.0;
        let voltage_drop_percent = voltage_drop / voltage * 100.0;

        if voltage_drop_percent <= vd_limit {
            tracing::debug!(size, voltage_drop_percent, "cable sized for voltage drop");
            return Ok(CableResult {
                route,
                ca,
                cg,
                ci,
                required_ccc,
                size,
                thermal_size,
                tabulated_ampacity: tabulated,
                derated_ampacity: tabulated * ca * cg * ci,
                vd_factor,
                voltage_drop,
                voltage_drop_percent,
                vd_limit,
                vd_compliant: true,
                increased_for_voltage_drop: size > thermal_size,
            });
        }
    }

    Err(CalcError::NoSolution {
        reason: format!(
            "voltage drop exceeds {}% at every size up to {} mm²",
            vd_limit,
            STANDARD_SIZES[STANDARD_SIZES.len() - 1]
        ),
    })
}

use crate::scale::Scale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Descriptor of unit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    None, // No Unit
    Hz,       // Frequency in Hz
    Second,   // Time in seconds
    Meter,    // Length in meters
    Farad,    // Capacitance in farads
    Henry,    // Inductance in henries
    Ohm,      // Resistance or reactance in ohms
    Sieman,   // Conductance or susceptance in siemans
    Ampere,   // Current in amperes
    Volt,     // Potential in volts
    Watt,     // Active power
    Var,      // Reactive power
    VoltAmp,  // Apparent power
    Decibel,  // Ratio in dB
    Percent,  // Ratio in percent
    SqMm,     // Conductor cross-section
    WattPerSqM, // Lighting power density
    MvPerAm,  // Voltage drop factor in mV/A/m
}

impl Unit {
    pub fn to_long_string(&self) -> String {
        match self {
            Unit::None => "".to_string(),
            Unit::Hz => "hertz".to_string(),
            Unit::Second => "second".to_string(),
            Unit::Meter => "meter".to_string(),
            Unit::Farad => "farad".to_string(),
            Unit::Henry => "henry".to_string(),
            Unit::Ohm => "ohm".to_string(),
            Unit::Sieman => "sieman".to_string(),
            Unit::Ampere => "ampere".to_string(),
            Unit::Volt => "volt".to_string(),
            Unit::Watt => "watt".to_string(),
            Unit::Var => "volt-ampere reactive".to_string(),
            Unit::VoltAmp => "volt-ampere".to_string(),
            Unit::Decibel => "decibel".to_string(),
            Unit::Percent => "percent".to_string(),
            Unit::SqMm => "square millimetre".to_string(),
            Unit::WattPerSqM => "watt per square metre".to_string(),
            Unit::MvPerAm => "millivolt per ampere per metre".to_string(),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Unit::None => "",
            Unit::Hz => "Hz",
            Unit::Second => "s",
            Unit::Meter => "m",
            Unit::Farad => "F",
            Unit::Henry => "H",
            Unit::Ohm => "Ω",
            Unit::Sieman => "S",
            Unit::Ampere => "A",
            Unit::Volt => "V",
            Unit::Watt => "W",
            Unit::Var => "var",
            Unit::VoltAmp => "VA",
            Unit::Decibel => "dB",
            Unit::Percent => "%",
            Unit::SqMm => "mm²",
            Unit::WattPerSqM => "W/m²",
            Unit::MvPerAm => "mV/A/m",
        }
    }
}

impl FromStr for Unit {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HZ" | "Hz" | "hz" => Ok(Unit::Hz),
            "Second" | "second" | "sec" | "s" => Ok(Unit::Second),
            "Meter" | "meter" | "m" => Ok(Unit::Meter),
            "Farad" | "farad" | "F" => Ok(Unit::Farad),
            "Henry" | "henry" | "H" => Ok(Unit::Henry),
            "Ohm" | "ohm" | "ohms" | "Ω" => Ok(Unit::Ohm),
            "Sieman" | "sieman" | "S" => Ok(Unit::Sieman),
            "Ampere" | "ampere" | "amp" | "A" => Ok(Unit::Ampere),
            "Volt" | "volt" | "V" => Ok(Unit::Volt),
            "Watt" | "watt" | "W" => Ok(Unit::Watt),
            "var" | "VAr" | "VAR" => Ok(Unit::Var),
            "VA" => Ok(Unit::VoltAmp),
            "dB" | "db" => Ok(Unit::Decibel),
            "%" | "percent" => Ok(Unit::Percent),
            "mm2" | "mm²" => Ok(Unit::SqMm),
            "W/m2" | "W/m²" => Ok(Unit::WattPerSqM),
            "mV/A/m" => Ok(Unit::MvPerAm),
            _ => Ok(Unit::None),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Encapsulation of a value with scale. Value is stored unscaled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitVal {
    val: f64,
    scale: Scale,
    unit: Unit,
}

impl UnitVal {
    pub fn new(val: f64, scale: Scale, unit: Unit) -> Self {
        UnitVal { val, scale, unit }
    }

    pub fn new_scaled(val: f64, scale: Scale, unit: Unit) -> Self {
        UnitVal {
            val: scale.unscale(val),
            scale,
            unit,
        }
    }

    /// Value with the engineering prefix picked from its magnitude
    pub fn best_fit(val: f64, unit: Unit) -> Self {
        UnitVal {
            val,
            scale: Scale::best_fit(val),
            unit,
        }
    }

    /// Retrieve value unscaled
    pub fn val(&self) -> f64 {
        self.val
    }

    /// Retrieve value in scaled scale
    pub fn val_scaled(&self) -> f64 {
        self.scale.scale(self.val)
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn set_val(&mut self, val: f64) -> &Self {
        self.val = val;
        self
    }

    pub fn set_val_scaled(&mut self, val: f64) -> &Self {
        self.val = self.scale.unscale(val);
        self
    }

    pub fn set_scale(&mut self, scale: Scale) -> &Self {
        self.scale = scale;
        self
    }

    pub fn set_unit(&mut self, unit: Unit) -> &Self {
        self.unit = unit;
        self
    }

    /// Fixed-decimal display string, e.g. `97.46 nH`
    pub fn format(&self, decimals: usize) -> String {
        format!(
            "{:.*} {}{}",
            decimals,
            self.val_scaled(),
            self.scale.to_str(),
            self.unit.to_str()
        )
    }
}

impl Default for UnitVal {
    fn default() -> Self {
        UnitVal {
            val: 0.0,
            scale: Scale::Base,
            unit: Unit::None,
        }
    }
}

impl fmt::Display for UnitVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(2))
    }
}

/// Builder design pattern for UnitVal.
///
/// ## Example
/// ```
/// use elecalc::scale::Scale;
/// use elecalc::unit::{Unit, UnitValBuilder};
///
/// let unitval = UnitValBuilder::new()
///     .val_scaled(1.2, Scale::Pico)
///     .unit(Unit::Farad)
///     .build();
/// assert_eq!(unitval.format(1), "1.2 pF");
/// ```
#[derive(Default)]
pub struct UnitValBuilder {
    val: f64,
    scale: Scale,
    unit: Unit,
}

impl UnitValBuilder {
    pub fn new() -> Self {
        UnitValBuilder::default()
    }

    pub fn val(mut self, val: f64) -> Self {
        self.val = val;
        self
    }

    pub fn val_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.val = scale.unscale(val);
        self.scale = scale;
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn build(self) -> UnitVal {
        UnitVal {
            val: self.val,
            scale: self.scale,
            unit: self.unit,
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::util::comp_f64;
    use float_cmp::F64Margin;

    #[test]
    fn test_unit_from_str() {
        let hz = ["HZ", "Hz", "hz"];
        let farad = ["Farad", "farad", "F"];
        let henry = ["Henry", "henry", "H"];
        let ohm = ["Ohm", "ohm", "Ω"];
        let amp = ["Ampere", "amp", "A"];
        let var = ["var", "VAr"];
        let nada = ["", "google", ".sfwe"];

        for mult in hz.iter() {
            assert_eq!(Unit::from_str(mult).unwrap(), Unit::Hz);
        }

        for mult in farad.iter() {
            assert_eq!(Unit::from_str(mult).unwrap(), Unit::Farad);
        }

        for mult in henry.iter() {
            assert_eq!(Unit::from_str(mult).unwrap(), Unit::Henry);
        }

        for mult in ohm.iter() {
            assert_eq!(Unit::from_str(mult).unwrap(), Unit::Ohm);
        }

        for mult in amp.iter() {
            assert_eq!(Unit::from_str(mult).unwrap(), Unit::Ampere);
        }

        for mult in var.iter() {
            assert_eq!(Unit::from_str(mult).unwrap(), Unit::Var);
        }

        for mult in nada.iter() {
            assert_eq!(Unit::from_str(mult).unwrap(), Unit::None);
        }
    }

    #[test]
    fn test_unitval() {
        let val: f64 = 10.34e-12;
        let val_scaled: f64 = 10.34;
        let scale = Scale::Pico;
        let unit = Unit::Farad;
        let mut unitval = UnitVal::new(val, scale, unit);
        let val2: f64 = 4.74e-15;
        let scale2 = Scale::Femto;

        comp_f64(&unitval.val(), &val, F64Margin::default(), "val()", "");
        comp_f64(
            &unitval.val_scaled(),
            &val_scaled,
            F64Margin::default(),
            "val_scaled()",
            "",
        );
        assert_eq!(&unitval.scale(), &scale);

        unitval.set_val(val2);
        comp_f64(&unitval.val(), &val2, F64Margin::default(), "set_val()", "");
        assert_eq!(&unitval.scale(), &scale);

        unitval.set_val_scaled(val_scaled);
        comp_f64(&unitval.val(), &val, F64Margin::default(), "set_val_scaled()", "");

        unitval.set_scale(scale2);
        comp_f64(&unitval.val(), &val, F64Margin::default(), "set_scale()", "");
        assert_eq!(&unitval.scale(), &scale2);
    }

    #[test]
    fn test_unitval_format() {
        let l = UnitVal::best_fit(97.4659e-9, Unit::Henry);
        assert_eq!(l.scale(), Scale::Nano);
        assert_eq!(l.format(2), "97.47 nH");

        let c = UnitVal::best_fit(21.96e-12, Unit::Farad);
        assert_eq!(c.to_string(), "21.96 pF");

        let r = UnitValBuilder::new().val(50.0).unit(Unit::Ohm).build();
        assert_eq!(r.format(1), "50.0 Ω");
    }
}

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Descriptor of scaling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    Atto,
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    #[default]
    Base,
    Kilo,
    Mega,
    Giga,
    Tera,
}

const ENGINEERING: [Scale; 11] = [
    Scale::Atto,
    Scale::Femto,
    Scale::Pico,
    Scale::Nano,
    Scale::Micro,
    Scale::Milli,
    Scale::Base,
    Scale::Kilo,
    Scale::Mega,
    Scale::Giga,
    Scale::Tera,
];

impl Scale {
    pub fn to_long_string(&self) -> String {
        match self {
            Scale::Tera => "tera".to_string(),
            Scale::Giga => "giga".to_string(),
            Scale::Mega => "mega".to_string(),
            Scale::Kilo => "kilo".to_string(),
            Scale::Base => "".to_string(),
            Scale::Milli => "milli".to_string(),
            Scale::Micro => "micro".to_string(),
            Scale::Nano => "nano".to_string(),
            Scale::Pico => "pico".to_string(),
            Scale::Femto => "femto".to_string(),
            Scale::Atto => "atto".to_string(),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Scale::Atto => "a",
            Scale::Femto => "f",
            Scale::Pico => "p",
            Scale::Nano => "n",
            Scale::Micro => "u",
            Scale::Milli => "m",
            Scale::Base => "",
            Scale::Kilo => "k",
            Scale::Mega => "M",
            Scale::Giga => "G",
            Scale::Tera => "T",
        }
    }

    /// Provides multiplier for scale
    /// Scale::Pico = 1e-12
    pub fn multiplier(&self) -> f64 {
        match self {
            Scale::Atto => 1e-18,
            Scale::Femto => 1e-15,
            Scale::Pico => 1e-12,
            Scale::Nano => 1e-9,
            Scale::Micro => 1e-6,
            Scale::Milli => 1e-3,
            Scale::Base => 1.0,
            Scale::Kilo => 1e3,
            Scale::Mega => 1e6,
            Scale::Giga => 1e9,
            Scale::Tera => 1e12,
        }
    }

    pub fn scale(&self, val: f64) -> f64 {
        val / self.multiplier()
    }

    pub fn unscale(&self, val: f64) -> f64 {
        val * self.multiplier()
    }

    /// Strict single-prefix lookup used by the form parser.
    /// Unlike `from_str`, unknown prefixes are rejected.
    pub fn from_prefix(prefix: &str) -> Option<Scale> {
        match prefix {
            "a" => Some(Scale::Atto),
            "f" => Some(Scale::Femto),
            "p" => Some(Scale::Pico),
            "n" => Some(Scale::Nano),
            "u" | "μ" | "µ" => Some(Scale::Micro),
            "m" => Some(Scale::Milli),
            "" => Some(Scale::Base),
            "k" | "K" => Some(Scale::Kilo),
            "M" => Some(Scale::Mega),
            "G" => Some(Scale::Giga),
            "T" => Some(Scale::Tera),
            _ => None,
        }
    }

    /// Engineering prefix that puts `val` in [1, 1000)
    pub fn best_fit(val: f64) -> Scale {
        let mag = val.abs();
        if mag == 0.0 || !mag.is_finite() {
            return Scale::Base;
        }
        let mut out = Scale::Atto;
        for scale in ENGINEERING.iter() {
            if mag >= scale.multiplier() * (1.0 - 1e-12) {
                out = *scale;
            }
        }
        out
    }
}

impl FromStr for Scale {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Atto" | "atto" | "a" | "aF" | "aH" => Ok(Scale::Atto),
            "Femto" | "femto" | "f" | "fF" | "fH" => Ok(Scale::Femto),
            "Pico" | "pico" | "p" | "pF" | "pH" => Ok(Scale::Pico),
            "Nano" | "nano" | "n" | "nF" | "nH" => Ok(Scale::Nano),
            "Micro" | "micro" | "u" | "uF" | "μF" | "uH" | "μH" => Ok(Scale::Micro),
            "Milli" | "milli" | "m" | "mΩ" | "mF" | "mH" | "mA" | "mV" => Ok(Scale::Milli),
            "Kilo" | "kilo" | "k" | "kΩ" | "kHz" | "kW" | "kV" | "kvar" | "kVA" => {
                Ok(Scale::Kilo)
            }
            "Mega" | "mega" | "M" | "MΩ" | "MHz" | "MW" | "MVA" => Ok(Scale::Mega),
            "Giga" | "giga" | "G" | "GHz" => Ok(Scale::Giga),
            "Tera" | "tera" | "T" | "THz" => Ok(Scale::Tera),
            _ => Ok(Scale::Base),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

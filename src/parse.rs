//! Form-field text parsing.
//!
//! Accepts plain numbers (`"0.95"`), quantities with an engineering prefix
//! and optional unit symbol (`"100MHz"`, `"2.2 nH"`, `"4.7k"`), and complex
//! impedances (`"50+25j"`, `"100 - j50"`, `"75 Ω"`).

use crate::error::CalcError;
use crate::impedance::Impedance;
use crate::scale::Scale;
use crate::unit::Unit;
use regex::Regex;
use simple_error::{bail, SimpleError};
use std::sync::OnceLock;

const NUM: &str = r"(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?";

fn re_quantity() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*(?<num>[+-]?{})\s*(?<rest>\S*)\s*$", NUM))
            .expect("Invalid regex!")
    })
}

fn re_impedance() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*(?<re>[+-]?{num})\s*(?:(?<sign>[+-])\s*(?:[jJiI]\s*(?<im1>{num})|(?<im2>{num})\s*[jJiI]))?\s*(?:Ω|[oO]hms?)?\s*$",
            num = NUM
        ))
        .expect("Invalid regex!")
    })
}

/// Unit symbols accepted after the prefix, besides `unit.to_str()`
fn unit_aliases(unit: Unit) -> &'static [&'static str] {
    match unit {
        Unit::Hz => &["Hz", "hz", "HZ"],
        Unit::Ohm => &["Ω", "ohm", "ohms", "Ohm"],
        Unit::Farad => &["F"],
        Unit::Henry => &["H"],
        Unit::Ampere => &["A"],
        Unit::Volt => &["V"],
        Unit::Watt => &["W"],
        Unit::Var => &["var", "VAr", "VAR"],
        Unit::VoltAmp => &["VA"],
        Unit::Meter => &["m"],
        Unit::Second => &["s"],
        Unit::Percent => &["%"],
        Unit::SqMm => &["mm2", "mm²"],
        _ => &[],
    }
}

/// Parses a quantity such as `100MHz` into its base-unit value.
/// A bare suffix equal to the unit symbol is read as the unit, so
/// `"5m"` with `Unit::Meter` is five metres.
pub fn parse_quantity(text: &str, unit: Unit) -> Result<f64, SimpleError> {
    let Some(caps) = re_quantity().captures(text) else {
        return Err(SimpleError::new(format!("'{}' is not a number", text.trim())));
    };
    let num: f64 = match caps["num"].parse() {
        Ok(val) => val,
        Err(_) => bail!("number could not be read"),
    };
    let rest = &caps["rest"];

    let mut prefix = rest;
    for alias in unit_aliases(unit).iter() {
        if rest == *alias {
            prefix = "";
            break;
        }
        if let Some(stripped) = rest.strip_suffix(alias) {
            prefix = stripped;
            break;
        }
    }

    let Some(scale) = Scale::from_prefix(prefix) else {
        return Err(SimpleError::new(format!(
            "unrecognised prefix or unit '{}' (expected {})",
            rest,
            unit.to_long_string()
        )));
    };
    let val = scale.unscale(num);
    if !val.is_finite() {
        bail!("value is out of range");
    }

    Ok(val)
}

/// Parses a plain number, reporting the failing field on error
pub fn parse_number(field: &str, text: &str) -> Result<f64, CalcError> {
    match text.trim().parse::<f64>() {
        Ok(val) if val.is_finite() => Ok(val),
        Ok(_) => Err(CalcError::invalid(field, "must be a finite number")),
        Err(_) => Err(CalcError::invalid(
            field,
            format!("'{}' is not a number", text.trim()),
        )),
    }
}

/// Parses a form field as a quantity, reporting the failing field on error
pub fn parse_field(field: &str, text: &str, unit: Unit) -> Result<f64, CalcError> {
    parse_quantity(text, unit).map_err(|err| CalcError::invalid(field, err.to_string()))
}

/// Parses `R ± jX` impedance text
pub fn parse_impedance(text: &str) -> Result<Impedance, CalcError> {
    let Some(caps) = re_impedance().captures(text) else {
        return Err(CalcError::Parse(SimpleError::new(format!(
            "'{}' is not an impedance (expected R+jX)",
            text.trim()
        ))));
    };
    let r: f64 = caps["re"]
        .parse()
        .map_err(|_| SimpleError::new("invalid resistance"))?;
    let x = match caps.name("im1").or(caps.name("im2")) {
        Some(im) => {
            let mag: f64 = im
                .as_str()
                .parse()
                .map_err(|_| SimpleError::new("invalid reactance"))?;
            match caps.name("sign").map(|s| s.as_str()) {
                Some("-") => -mag,
                _ => mag,
            }
        }
        None => 0.0,
    };

    Ok(Impedance::new(r, x))
}

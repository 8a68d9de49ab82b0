use crate::error::CalcError;
use crate::unit::{Unit, UnitVal};
use num_complex::{c64, Complex64};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Reactances or susceptances smaller than this, relative to the
/// reference resistance of the stage, are treated as zero.
pub const ZERO_TOL: f64 = 1e-9;

/// Reactances larger than this multiple of the reference resistance are an
/// open circuit in practice and are rejected.
pub const MAX_REACTANCE_RATIO: f64 = 1e6;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ElemType {
    #[default]
    Capacitor,
    Inductor,
}

impl ElemType {
    /// Convert ElemType to String
    pub fn to_str(&self) -> &str {
        match self {
            ElemType::Capacitor => "Capacitor",
            ElemType::Inductor => "Inductor",
        }
    }

    /// Element type selected by the sign of a reactance
    pub fn from_reactance(x: f64) -> ElemType {
        if x > 0.0 {
            ElemType::Inductor
        } else {
            ElemType::Capacitor
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            ElemType::Capacitor => Unit::Farad,
            ElemType::Inductor => Unit::Henry,
        }
    }
}

impl FromStr for ElemType {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" | "c" | "Cap" | "cap" | "Capacitor" | "capacitor" => Ok(ElemType::Capacitor),
            "L" | "l" | "Ind" | "ind" | "Inductor" | "inductor" => Ok(ElemType::Inductor),
            _ => Err("ElemType not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Where an element sits in the ladder
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Placement {
    Series,
    Shunt,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Series => write!(f, "series"),
            Placement::Shunt => write!(f, "shunt"),
        }
    }
}

/// Lumped L or C produced by network synthesis
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReactiveComponent {
    kind: ElemType,
    value: UnitVal,
    reactance: f64,
    placement: Placement,
    position: String,
    modified: bool,
}

impl ReactiveComponent {
    /// Builds a component from its reactance at angular frequency `w`.
    ///
    /// X > 0 becomes an inductor L = X/w, X < 0 a capacitor C = -1/(wX).
    /// `nominal` is the type the topology expects at this position; a sign
    /// flip keeps the physically required type and marks it modified.
    pub fn from_reactance(
        x: f64,
        w: f64,
        placement: Placement,
        position: &str,
        nominal: ElemType,
        reference: f64,
    ) -> Result<Self, CalcError> {
        if !x.is_finite() {
            return Err(CalcError::NonFinite {
                what: format!("reactance for the {} element", position),
            });
        }
        let scale = reference.abs().max(1.0);
        if x.abs() <= ZERO_TOL * scale || x.abs() > MAX_REACTANCE_RATIO * scale {
            return Err(CalcError::DegenerateElement {
                position: position.to_string(),
            });
        }

        let kind = ElemType::from_reactance(x);
        let val = match kind {
            ElemType::Inductor => x / w,
            ElemType::Capacitor => -1.0 / (w * x),
        };
        if !val.is_finite() || val <= 0.0 {
            return Err(CalcError::NonFinite {
                what: format!("{} value for the {} element", kind.to_str().to_lowercase(), position),
            });
        }
        let modified = kind != nominal;
        if modified {
            tracing::debug!(
                position,
                expected = nominal.to_str(),
                actual = kind.to_str(),
                "element type flipped by termination reactance"
            );
        }

        Ok(ReactiveComponent {
            kind,
            value: UnitVal::best_fit(val, kind.unit()),
            reactance: x,
            placement,
            position: position.to_string(),
            modified,
        })
    }

    /// Shunt element from its susceptance B; the reactance is -1/B
    pub fn from_susceptance(
        b: f64,
        w: f64,
        position: &str,
        nominal: ElemType,
        reference: f64,
    ) -> Result<Self, CalcError> {
        if !b.is_finite() {
            return Err(CalcError::NonFinite {
                what: format!("susceptance for the {} element", position),
            });
        }
        if b.abs() <= ZERO_TOL / reference.abs().max(1.0) {
            return Err(CalcError::DegenerateElement {
                position: position.to_string(),
            });
        }
        ReactiveComponent::from_reactance(-1.0 / b, w, Placement::Shunt, position, nominal, reference)
    }

    pub fn kind(&self) -> ElemType {
        self.kind
    }

    /// Component value in henries or farads
    pub fn value(&self) -> f64 {
        self.value.val()
    }

    pub fn unitval(&self) -> UnitVal {
        self.value
    }

    /// Reactance in ohms at the design frequency
    pub fn reactance(&self) -> f64 {
        self.reactance
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    /// Impedance of the element at angular frequency `w`
    pub fn z_at(&self, w: f64) -> Complex64 {
        match self.kind {
            ElemType::Inductor => c64(0.0, w * self.value.val()),
            ElemType::Capacitor => c64(0.0, -1.0 / (w * self.value.val())),
        }
    }

    /// Display label, e.g. `Series inductor (source side)`
    pub fn label(&self) -> String {
        let mut out = format!(
            "{} {} ({})",
            capitalize(&self.placement.to_string()),
            self.kind.to_str().to_lowercase(),
            self.position
        );
        if self.modified {
            out += " (modified)";
        }
        out
    }
}

impl fmt::Display for ReactiveComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.value.format(3))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod element_tests {
    use super::*;
    use crate::util::comp_rel;
    use std::f64::consts::PI;

    #[test]
    fn element_inductor() {
        let w = 2.0 * PI * 100e6;
        let elem =
            ReactiveComponent::from_reactance(61.237, w, Placement::Series, "source side", ElemType::Inductor, 50.0)
                .unwrap();

        assert_eq!(ElemType::Inductor, elem.kind());
        assert!(!elem.modified());
        comp_rel(&(61.237 / w), &elem.value(), 1e-12, "inductor value");
        comp_rel(&61.237, &elem.z_at(w).im, 1e-12, "inductor z_at()");
        assert_eq!("Series inductor (source side)", elem.label());
    }

    #[test]
    fn element_capacitor_from_susceptance() {
        let w = 2.0 * PI * 100e6;
        let elem =
            ReactiveComponent::from_susceptance(0.0138, w, "across load", ElemType::Capacitor, 50.0).unwrap();

        assert_eq!(ElemType::Capacitor, elem.kind());
        assert_eq!(Placement::Shunt, elem.placement());
        comp_rel(&(0.0138 / w), &elem.value(), 1e-12, "capacitor value");
        comp_rel(&(-1.0 / 0.0138), &elem.reactance(), 1e-12, "capacitor reactance");
        comp_rel(&(-1.0 / 0.0138), &elem.z_at(w).im, 1e-12, "capacitor z_at()");
    }

    #[test]
    fn element_modified() {
        let elem =
            ReactiveComponent::from_reactance(-20.0, 1e6, Placement::Series, "middle", ElemType::Inductor, 50.0)
                .unwrap();

        assert_eq!(ElemType::Capacitor, elem.kind());
        assert!(elem.modified());
        assert_eq!("Series capacitor (middle) (modified)", elem.label());
    }

    #[test]
    fn element_degenerate() {
        match ReactiveComponent::from_susceptance(0.0, 1e6, "across source", ElemType::Capacitor, 50.0) {
            Err(CalcError::DegenerateElement { position }) => assert_eq!("across source", position),
            _ => panic!("zero susceptance accepted"),
        }
        assert!(ReactiveComponent::from_reactance(f64::NAN, 1e6, Placement::Series, "x", ElemType::Inductor, 50.0)
            .is_err());
        assert!(ReactiveComponent::from_reactance(1e-12, 1e6, Placement::Series, "x", ElemType::Inductor, 50.0)
            .is_err());
    }

    #[test]
    fn element_open_circuit() {
        // X = -3.4e9 across a 50 ohm port is an open circuit
        match ReactiveComponent::from_reactance(-3.4e9, 1e6, Placement::Shunt, "across source", ElemType::Capacitor, 50.0)
        {
            Err(CalcError::DegenerateElement { position }) => assert_eq!("across source", position),
            other => panic!("open circuit accepted: {:?}", other),
        }
        assert!(ReactiveComponent::from_susceptance(2.0e-10, 1e6, "across load", ElemType::Capacitor, 50.0).is_err());
        // 1e6 times the reference is still a component
        assert!(ReactiveComponent::from_reactance(4.9e7, 1e6, Placement::Series, "middle", ElemType::Inductor, 50.0)
            .is_ok());
    }

    #[test]
    fn elemtype_from_str() {
        assert_eq!(ElemType::Inductor, ElemType::from_str("L").unwrap());
        assert_eq!(ElemType::Capacitor, ElemType::from_str("cap").unwrap());
        assert!(ElemType::from_str("R").is_err());
    }
}

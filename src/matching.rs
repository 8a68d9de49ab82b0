//! Lumped L, Pi and T matching network synthesis.
//!
//! Every network is a conjugate match: terminated in the load, it presents
//! conj(Zs) at the source terminals.

use crate::element::{ElemType, Placement, ReactiveComponent};
use crate::error::{require_finite, require_positive, CalcError, Port};
use crate::frequency::angular;
use crate::impedance::{Impedance, Reflection};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub mod lnet;
pub mod pinet;
pub mod response;
pub mod tnet;

/// Relative tolerance for treating two resistances or reactances as equal
pub const EQUAL_TOL: f64 = 1e-9;

/// Q used for Pi and T networks when none is supplied
pub const DEFAULT_Q: f64 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    #[default]
    LowPass,
    HighPass,
}

impl Topology {
    pub fn to_str(&self) -> &str {
        match self {
            Topology::LowPass => "low-pass",
            Topology::HighPass => "high-pass",
        }
    }

    /// Sign applied to the square-root branch of each section
    pub(crate) fn sign(&self) -> f64 {
        match self {
            Topology::LowPass => 1.0,
            Topology::HighPass => -1.0,
        }
    }

    /// Element type expected at a placement
    pub fn nominal(&self, placement: Placement) -> ElemType {
        match (self, placement) {
            (Topology::LowPass, Placement::Series) => ElemType::Inductor,
            (Topology::LowPass, Placement::Shunt) => ElemType::Capacitor,
            (Topology::HighPass, Placement::Series) => ElemType::Capacitor,
            (Topology::HighPass, Placement::Shunt) => ElemType::Inductor,
        }
    }
}

impl FromStr for Topology {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowpass" | "low-pass" | "LowPass" | "lp" | "LP" => Ok(Topology::LowPass),
            "highpass" | "high-pass" | "HighPass" | "hp" | "HP" => Ok(Topology::HighPass),
            _ => Err("Topology not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkKind {
    #[default]
    L,
    Pi,
    T,
}

impl NetworkKind {
    pub fn to_str(&self) -> &str {
        match self {
            NetworkKind::L => "L",
            NetworkKind::Pi => "Pi",
            NetworkKind::T => "T",
        }
    }
}

impl FromStr for NetworkKind {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" | "l" => Ok(NetworkKind::L),
            "Pi" | "pi" | "PI" | "π" => Ok(NetworkKind::Pi),
            "T" | "t" => Ok(NetworkKind::T),
            _ => Err("NetworkKind not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Port whose mismatch against Z0 is reported
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTarget {
    Source,
    #[default]
    Load,
}

impl FromStr for MatchTarget {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" | "Source" | "S" | "s" => Ok(MatchTarget::Source),
            "load" | "Load" | "L" | "l" => Ok(MatchTarget::Load),
            _ => Err("MatchTarget not recognized".to_string().into()),
        }
    }
}

impl fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTarget::Source => write!(f, "source"),
            MatchTarget::Load => write!(f, "load"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub source: Impedance,
    pub load: Impedance,
    /// Design frequency in Hz
    pub freq: f64,
    /// Reference impedance for the reflection block
    pub z0: f64,
    pub network: NetworkKind,
    pub topology: Topology,
    pub q: Option<f64>,
    pub target: MatchTarget,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            source: Impedance::resistive(50.0),
            load: Impedance::resistive(50.0),
            freq: 100e6,
            z0: 50.0,
            network: NetworkKind::L,
            topology: Topology::LowPass,
            q: None,
            target: MatchTarget::Load,
        }
    }
}

/// Builder design pattern for MatchingConfig.
///
/// ## Example
/// ```
/// use elecalc::impedance::Impedance;
/// use elecalc::matching::{synthesize, MatchingConfigBuilder, NetworkKind};
///
/// let config = MatchingConfigBuilder::new()
///     .source(Impedance::resistive(50.0))
///     .load(Impedance::new(100.0, 50.0))
///     .freq(100e6)
///     .network(NetworkKind::L)
///     .build();
/// let result = synthesize(&config).unwrap();
/// assert_eq!(result.components.len(), 2);
/// ```
#[derive(Default)]
pub struct MatchingConfigBuilder {
    config: MatchingConfig,
}

impl MatchingConfigBuilder {
    pub fn new() -> Self {
        MatchingConfigBuilder::default()
    }

    pub fn source(mut self, source: Impedance) -> Self {
        self.config.source = source;
        self
    }

    pub fn load(mut self, load: Impedance) -> Self {
        self.config.load = load;
        self
    }

    pub fn freq(mut self, freq: f64) -> Self {
        self.config.freq = freq;
        self
    }

    pub fn z0(mut self, z0: f64) -> Self {
        self.config.z0 = z0;
        self
    }

    pub fn network(mut self, network: NetworkKind) -> Self {
        self.config.network = network;
        self
    }

    pub fn topology(mut self, topology: Topology) -> Self {
        self.config.topology = topology;
        self
    }

    pub fn q(mut self, q: f64) -> Self {
        self.config.q = Some(q);
        self
    }

    pub fn target(mut self, target: MatchTarget) -> Self {
        self.config.target = target;
        self
    }

    pub fn build(self) -> MatchingConfig {
        self.config
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchingResult {
    /// Components in signal-path order, source to load
    pub components: Vec<ReactiveComponent>,
    pub reflection: Reflection,
    pub calculated_q: f64,
    pub min_q: f64,
    /// f0 / Q; `None` when no network is needed
    pub bandwidth_hz: Option<f64>,
    /// Impedance seen at the source terminals, should be conj(Zs)
    pub input_impedance: Impedance,
}

/// Validated inputs shared by the section calculators
#[derive(Clone, Copy, Debug)]
pub(crate) struct Design {
    pub rs: f64,
    pub xs: f64,
    pub rl: f64,
    pub xl: f64,
    pub w: f64,
    pub topology: Topology,
}

impl Design {
    pub fn source(&self) -> Impedance {
        Impedance::new(self.rs, self.xs)
    }

    pub fn load(&self) -> Impedance {
        Impedance::new(self.rl, self.xl)
    }

    pub fn rmax(&self) -> f64 {
        self.rs.max(self.rl)
    }

    pub fn rmin(&self) -> f64 {
        self.rs.min(self.rl)
    }

    pub fn series(&self, x: f64, position: &str) -> Result<ReactiveComponent, CalcError> {
        ReactiveComponent::from_reactance(
            x,
            self.w,
            Placement::Series,
            position,
            self.topology.nominal(Placement::Series),
            self.rmax(),
        )
    }

    pub fn shunt(&self, b: f64, position: &str) -> Result<ReactiveComponent, CalcError> {
        ReactiveComponent::from_susceptance(
            b,
            self.w,
            position,
            self.topology.nominal(Placement::Shunt),
            self.rmin(),
        )
    }

    /// Port-side shunt of a half section. When the section has nothing to
    /// transform (`q == 0`) and no port susceptance to cancel, the element
    /// is left out and the network collapses to its L equivalent.
    pub fn section_shunt(&self, b: f64, q: f64, position: &str) -> Result<Option<ReactiveComponent>, CalcError> {
        if q == 0.0 && (b * self.rmin()).abs() <= EQUAL_TOL {
            tracing::debug!(position, "half section vanishes at minimum Q");
            return Ok(None);
        }
        self.shunt(b, position).map(Some)
    }

    /// Port-side series arm of a half section, dropped on the same terms as
    /// `section_shunt`.
    pub fn section_series(&self, x: f64, q: f64, position: &str) -> Result<Option<ReactiveComponent>, CalcError> {
        if q == 0.0 && (x / self.rmax()).abs() <= EQUAL_TOL {
            tracing::debug!(position, "half section vanishes at minimum Q");
            return Ok(None);
        }
        self.series(x, position).map(Some)
    }
}

/// Output of a single network family
#[derive(Clone, Debug)]
pub(crate) struct Synthesis {
    pub components: Vec<ReactiveComponent>,
    pub calculated_q: f64,
}

/// Minimum Q for any network between two resistances
pub fn min_q(rs: f64, rl: f64) -> f64 {
    let ratio = rs.max(rl) / rs.min(rl);
    (ratio - 1.0).max(0.0).sqrt()
}

/// Partial Q of a half section stepping a resistance ratio `ratio >= 1`.
/// Ratios within rounding of 1 give exactly zero.
pub(crate) fn partial_q(ratio: f64) -> f64 {
    let excess = ratio - 1.0;
    if excess <= EQUAL_TOL {
        0.0
    } else {
        excess.sqrt()
    }
}

pub(crate) fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EQUAL_TOL * a.abs().max(b.abs()).max(1.0)
}

/// Equal resistances: nothing to transform, at most one series element
/// cancels the leftover reactance.
pub(crate) fn equal_resistance(design: &Design) -> Result<Synthesis, CalcError> {
    let x = -(design.xs + design.xl);
    if nearly_equal(design.xs, -design.xl) {
        tracing::debug!("ports already conjugate matched");
        return Ok(Synthesis {
            components: Vec::new(),
            calculated_q: 0.0,
        });
    }

    Ok(Synthesis {
        components: vec![design.series(x, "source side")?],
        calculated_q: x.abs() / design.rs,
    })
}

/// Relative tolerance on |Zin - conj(Zs)| for an accepted network
pub const MATCH_TOL: f64 = 1e-6;

/// Impedance the network presents at the source terminals, rejected unless
/// it is conj(Zs).
pub fn verify_conjugate(
    components: &[ReactiveComponent],
    source: Impedance,
    load: Impedance,
    w: f64,
) -> Result<Complex64, CalcError> {
    let zin = response::input_impedance(components, load, w);
    if !zin.re.is_finite() || !zin.im.is_finite() {
        return Err(CalcError::NonFinite {
            what: "input impedance".to_string(),
        });
    }
    let target = source.z().conj();
    let error = (zin - target).norm();
    if error > MATCH_TOL * target.norm().max(load.z().norm()) {
        tracing::debug!(zin = %zin, target = %target, error, "network fails conjugate check");
        return Err(CalcError::NoSolution {
            reason: format!(
                "network presents {:.4} at the source instead of conj(Zs) = {:.4}",
                zin, target
            ),
        });
    }
    Ok(zin)
}

/// Synthesizes the matching network described by `config`
pub fn synthesize(config: &MatchingConfig) -> Result<MatchingResult, CalcError> {
    let source = config.source.validate(Port::Source)?;
    let load = config.load.validate(Port::Load)?;
    let freq = require_positive("frequency", config.freq)?;
    require_positive("reference impedance", config.z0)?;
    let q = match config.q {
        Some(q) => {
            require_finite("Q", q)?;
            if q < 0.0 {
                return Err(CalcError::invalid("Q", "must not be negative"));
            }
            Some(q)
        }
        None => None,
    };

    let design = Design {
        rs: source.r,
        xs: source.x,
        rl: load.r,
        xl: load.x,
        w: angular(freq),
        topology: config.topology,
    };
    let min_q = min_q(design.rs, design.rl);
    tracing::debug!(
        network = config.network.to_str(),
        topology = config.topology.to_str(),
        min_q,
        "synthesizing matching network"
    );

    let synthesis = match config.network {
        NetworkKind::L => lnet::synthesize(&design, q)?,
        NetworkKind::Pi => pinet::synthesize(&design, q)?,
        NetworkKind::T => tnet::synthesize(&design, q)?,
    };

    let zin = verify_conjugate(&synthesis.components, source, load, design.w)?;

    let reflection = match config.target {
        MatchTarget::Source => Reflection::new(source, config.z0)?,
        MatchTarget::Load => Reflection::new(load, config.z0)?,
    };
    let bandwidth_hz = if synthesis.calculated_q > 0.0 {
        Some(freq / synthesis.calculated_q)
    } else {
        None
    };

    Ok(MatchingResult {
        components: synthesis.components,
        reflection,
        calculated_q: synthesis.calculated_q,
        min_q,
        bandwidth_hz,
        input_impedance: Impedance::from_z(zin),
    })
}

#[cfg(test)]
mod matching_tests {
    use super::*;
    use crate::util::{comp_f64, comp_rel};
    use float_cmp::F64Margin;

    #[test]
    fn test_min_q() {
        comp_f64(&1.0, &min_q(50.0, 100.0), F64Margin::default(), "min_q()", "2:1");
        comp_f64(&1.0, &min_q(100.0, 50.0), F64Margin::default(), "min_q()", "1:2");
        comp_f64(&0.0, &min_q(50.0, 50.0), F64Margin::default(), "min_q()", "1:1");
        comp_f64(&3.0, &min_q(10.0, 100.0), F64Margin::default(), "min_q()", "10:1");
    }

    #[test]
    fn test_nominal() {
        assert_eq!(ElemType::Inductor, Topology::LowPass.nominal(Placement::Series));
        assert_eq!(ElemType::Capacitor, Topology::LowPass.nominal(Placement::Shunt));
        assert_eq!(ElemType::Capacitor, Topology::HighPass.nominal(Placement::Series));
        assert_eq!(ElemType::Inductor, Topology::HighPass.nominal(Placement::Shunt));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Topology::HighPass, Topology::from_str("high-pass").unwrap());
        assert_eq!(NetworkKind::Pi, NetworkKind::from_str("pi").unwrap());
        assert_eq!(MatchTarget::Source, MatchTarget::from_str("source").unwrap());
        assert!(NetworkKind::from_str("X").is_err());
    }

    #[test]
    fn test_synthesize_validation() {
        let bad_load = MatchingConfigBuilder::new().load(Impedance::new(0.0, 10.0)).build();
        match synthesize(&bad_load) {
            Err(CalcError::NonPositiveResistance { port, .. }) => assert_eq!(Port::Load, port),
            _ => panic!("zero load resistance accepted"),
        }
        let bad_freq = MatchingConfigBuilder::new().freq(0.0).build();
        assert!(synthesize(&bad_freq).is_err());
        let bad_q = MatchingConfigBuilder::new().q(-1.0).build();
        assert!(synthesize(&bad_q).is_err());
        let bad_z0 = MatchingConfigBuilder::new().z0(f64::NAN).build();
        assert!(synthesize(&bad_z0).is_err());
    }

    #[test]
    fn test_synthesize_reflection_target() {
        let config = MatchingConfigBuilder::new()
            .source(Impedance::resistive(50.0))
            .load(Impedance::resistive(150.0))
            .target(MatchTarget::Load)
            .build();
        let result = synthesize(&config).unwrap();
        comp_f64(&0.5, &result.reflection.gamma, F64Margin::default(), "gamma", "load");
        comp_f64(&3.0, &result.reflection.vswr, F64Margin::default(), "vswr", "load");

        let config = MatchingConfigBuilder::new()
            .source(Impedance::resistive(50.0))
            .load(Impedance::resistive(150.0))
            .target(MatchTarget::Source)
            .build();
        let result = synthesize(&config).unwrap();
        assert_eq!(0.0, result.reflection.gamma);
        assert!(result.reflection.return_loss_db.is_infinite());
    }

    #[test]
    fn test_verify_conjugate() {
        let config = MatchingConfigBuilder::new()
            .source(Impedance::new(25.0, 10.0))
            .load(Impedance::new(120.0, -40.0))
            .network(NetworkKind::Pi)
            .build();
        let result = synthesize(&config).unwrap();
        let w = angular(config.freq);
        let zin = verify_conjugate(&result.components, config.source, config.load, w).unwrap();
        comp_rel(&25.0, &zin.re, 1e-9, "zin.re");
        comp_rel(&-10.0, &result.input_impedance.x, 1e-9, "input_impedance.x");

        // the same components cannot match a different source
        match verify_conjugate(&result.components, Impedance::new(30.0, 10.0), config.load, w) {
            Err(CalcError::NoSolution { reason }) => assert!(reason.contains("conj(Zs)"), "{}", reason),
            other => panic!("mismatched network accepted: {:?}", other),
        }
        // nor the same source at another frequency
        assert!(verify_conjugate(&result.components, config.source, config.load, 2.0 * w).is_err());
    }

    #[test]
    fn test_synthesize_bandwidth() {
        let config = MatchingConfigBuilder::new()
            .source(Impedance::resistive(50.0))
            .load(Impedance::resistive(100.0))
            .freq(100e6)
            .build();
        let result = synthesize(&config).unwrap();
        comp_rel(&1.0, &result.calculated_q, 1e-9, "calculated_q");
        comp_rel(&100e6, &result.bandwidth_hz.unwrap(), 1e-9, "bandwidth_hz");

        let matched = MatchingConfigBuilder::new().build();
        let result = synthesize(&matched).unwrap();
        assert!(result.components.is_empty());
        assert_eq!(None, result.bandwidth_hz);
    }
}

//! elecalc prelude.
//!
//! This module contains the most used types and calculator functions that
//! you can import easily as a group.
//!
//! ```
//! use elecalc::prelude::*;
//!
//! let report: Report<_> = check_balance(&BalanceConfig {
//!     currents: [400.0, 425.0, 370.0],
//!     ..BalanceConfig::default()
//! })
//! .into();
//! assert!(report.is_ready());
//! ```

#[doc(no_inline)]
pub use crate::error::{CalcError, LookupDimension, LookupMiss, Port};
#[doc(no_inline)]
pub use crate::report::{run, Report};

#[doc(no_inline)]
pub use crate::frequency::Frequency;
#[doc(no_inline)]
pub use crate::scale::Scale;
#[doc(no_inline)]
pub use crate::unit::{Unit, UnitVal, UnitValBuilder};

#[doc(no_inline)]
pub use crate::parse::{parse_field, parse_impedance, parse_number};

#[doc(no_inline)]
pub use crate::element::{ElemType, Placement, ReactiveComponent};
#[doc(no_inline)]
pub use crate::impedance::{Impedance, Reflection};
#[doc(no_inline)]
pub use crate::matching::response::{sweep, SweepPoint};
#[doc(no_inline)]
pub use crate::matching::{
    synthesize, MatchTarget, MatchingConfig, MatchingConfigBuilder, MatchingResult, NetworkKind,
    Topology,
};
#[doc(no_inline)]
pub use crate::smith::{impedance_path, SmithPoint};

#[doc(no_inline)]
pub use crate::cable::{
    size_cable, Armour, Arrangement, CableConfig, CableConfigBuilder, CableResult, Conductors,
    Formation, Grouping, Insulation, Method,
};

#[doc(no_inline)]
pub use crate::balance::{check_balance, distribute, BalanceConfig, BalanceResult, SinglePhaseLoad};
#[doc(no_inline)]
pub use crate::fuse::{check_fuse, FuseConfig, FuseOperation, FuseResult};
#[doc(no_inline)]
pub use crate::lighting::{lighting_density, LightingConfig, LightingResult, LuminaireGroup, SpaceType};
#[doc(no_inline)]
pub use crate::pfc::{correct_power_factor, PfcConfig, PfcResult};
#[doc(no_inline)]
pub use crate::protection::{
    check_protection, Device, DisconnectionTime, ProtectionConfig, ProtectionConfigBuilder,
    ProtectionResult,
};

#[doc(no_inline)]
pub use crate::history::{prepare_export_data, CalculationHistory, ExportRecord, MemoryHistory};

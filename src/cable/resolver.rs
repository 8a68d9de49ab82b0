//! Decision table from an installation description to the canonical
//! method path of the ampacity and voltage-drop tables.

use crate::cable::{Armour, Arrangement, Conductors, Formation, Method};
use crate::cable::Armour::{Armoured, NonArmoured};
use crate::cable::Arrangement::{Multicore, SingleCore};
use crate::cable::Conductors::{Three, Two};
use crate::cable::Formation::{SpacedHorizontal, SpacedVertical, Touching, Trefoil};
use crate::error::{LookupDimension, LookupMiss};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub arrangement: Arrangement,
    pub armour: Armour,
    pub method: Method,
    pub conductors: Conductors,
    pub formation: Option<Formation>,
}

impl RouteKey {
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.arrangement.to_str(),
            self.armour.to_str(),
            self.method.to_str(),
            self.conductors.key(),
            self.formation.map_or("-", |f| f.to_str())
        )
    }
}

/// Canonical table paths for one installation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    pub ampacity: &'static str,
    pub voltage_drop: &'static str,
}

type Row = (
    Arrangement,
    Armour,
    Method,
    Conductors,
    Option<Formation>,
    &'static str,
    &'static str,
);

#[rustfmt::skip]
const ROWS: &[Row] = &[
    // single-core, non-armoured
    (SingleCore, NonArmoured, Method::A, Two,   None, "A", "single_phase"),
    (SingleCore, NonArmoured, Method::A, Three, None, "A", "three_phase_trefoil"),
    (SingleCore, NonArmoured, Method::B, Two,   None, "B", "single_phase"),
    (SingleCore, NonArmoured, Method::B, Three, None, "B", "three_phase_trefoil"),
    (SingleCore, NonArmoured, Method::C, Two,   None, "C", "single_phase"),
    (SingleCore, NonArmoured, Method::C, Three, None, "C", "three_phase_trefoil"),
    (SingleCore, NonArmoured, Method::F, Two,   Some(Touching), "F_touching", "single_phase"),
    (SingleCore, NonArmoured, Method::F, Three, Some(Trefoil), "F_trefoil", "three_phase_trefoil"),
    (SingleCore, NonArmoured, Method::F, Three, Some(Touching), "F_flat_touching", "three_phase_touching"),
    (SingleCore, NonArmoured, Method::G, Two,   Some(SpacedHorizontal), "G_spaced_horizontal", "single_phase"),
    (SingleCore, NonArmoured, Method::G, Two,   Some(SpacedVertical), "G_spaced_vertical", "single_phase"),
    (SingleCore, NonArmoured, Method::G, Three, Some(SpacedHorizontal), "G_spaced_horizontal", "three_phase_spaced"),
    (SingleCore, NonArmoured, Method::G, Three, Some(SpacedVertical), "G_spaced_vertical", "three_phase_spaced"),
    // single-core, armoured
    (SingleCore, Armoured, Method::C, Two,   None, "C", "single_phase"),
    (SingleCore, Armoured, Method::C, Three, None, "C", "three_phase_trefoil"),
    (SingleCore, Armoured, Method::F, Two,   Some(Touching), "F_touching", "single_phase"),
    (SingleCore, Armoured, Method::F, Three, Some(Trefoil), "F_trefoil", "three_phase_trefoil"),
    (SingleCore, Armoured, Method::F, Three, Some(Touching), "F_flat_touching", "three_phase_touching"),
    // multicore, non-armoured
    (Multicore, NonArmoured, Method::A, Two,   None, "A", "single_phase"),
    (Multicore, NonArmoured, Method::A, Three, None, "A", "three_phase"),
    (Multicore, NonArmoured, Method::B, Two,   None, "B", "single_phase"),
    (Multicore, NonArmoured, Method::B, Three, None, "B", "three_phase"),
    (Multicore, NonArmoured, Method::C, Two,   None, "C", "single_phase"),
    (Multicore, NonArmoured, Method::C, Three, None, "C", "three_phase"),
    (Multicore, NonArmoured, Method::E, Two,   None, "E", "single_phase"),
    (Multicore, NonArmoured, Method::E, Three, None, "E", "three_phase"),
    // multicore, armoured
    (Multicore, Armoured, Method::C, Two,   None, "C", "single_phase"),
    (Multicore, Armoured, Method::C, Three, None, "C", "three_phase"),
    (Multicore, Armoured, Method::E, Two,   None, "E", "single_phase"),
    (Multicore, Armoured, Method::E, Three, None, "E", "three_phase"),
];

fn table() -> &'static HashMap<RouteKey, Route> {
    static TABLE: OnceLock<HashMap<RouteKey, Route>> = OnceLock::new();
    TABLE.get_or_init(|| {
        ROWS.iter()
            .map(|&(arrangement, armour, method, conductors, formation, ampacity, voltage_drop)| {
                (
                    RouteKey {
                        arrangement,
                        armour,
                        method,
                        conductors,
                        formation,
                    },
                    Route {
                        ampacity,
                        voltage_drop,
                    },
                )
            })
            .collect()
    })
}

/// Resolves the table route for `key`.
///
/// A formation given for a method that does not distinguish formations is
/// ignored. On a miss the first dimension with no matching row is named.
pub fn resolve(key: &RouteKey) -> Result<Route, LookupMiss> {
    let table = table();
    if let Some(route) = table.get(key) {
        return Ok(*route);
    }
    if key.formation.is_some() {
        let loose = RouteKey {
            formation: None,
            ..*key
        };
        if let Some(route) = table.get(&loose) {
            return Ok(*route);
        }
    }

    let dimension = diagnose(key);
    tracing::debug!(path = %key.path(), %dimension, "no cable route");
    Err(LookupMiss {
        dimension,
        path: key.path(),
    })
}

fn diagnose(key: &RouteKey) -> LookupDimension {
    let rows: Vec<&Row> = ROWS.iter().filter(|r| r.0 == key.arrangement).collect();
    if rows.is_empty() {
        return LookupDimension::Arrangement;
    }
    let rows: Vec<&Row> = rows.into_iter().filter(|r| r.1 == key.armour).collect();
    if rows.is_empty() {
        return LookupDimension::Armour;
    }
    let rows: Vec<&Row> = rows.into_iter().filter(|r| r.2 == key.method).collect();
    if rows.is_empty() {
        return LookupDimension::Method;
    }
    if !rows.iter().any(|r| r.3 == key.conductors) {
        return LookupDimension::Conductors;
    }
    LookupDimension::Formation
}

//! Copper cable ratings, tabulated after BS 7671 Appendix 4.
//!
//! The dataset is a tree: insulation → armour → arrangement → category →
//! method path → loaded conductors → size (mm²) → value. Ampacities are in
//! amperes, voltage-drop factors in mV/A/m.

use crate::cable::{Armour, Arrangement, Category, Conductors, Insulation};
use crate::error::{CalcError, LookupDimension, LookupMiss};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Standard conductor cross-sections in mm²
pub const STANDARD_SIZES: [f64; 16] = [
    1.5, 2.5, 4.0, 6.0, 10.0, 16.0, 25.0, 35.0, 50.0, 70.0, 95.0, 120.0, 150.0, 185.0, 240.0, 300.0,
];

/// size key → value
pub type SizeColumn = BTreeMap<String, f64>;
/// method path → conductor count → column
pub type MethodTables = BTreeMap<String, BTreeMap<String, SizeColumn>>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTables {
    pub ampacity: MethodTables,
    pub voltage_drop: MethodTables,
}

impl CategoryTables {
    pub fn get(&self, category: Category) -> &MethodTables {
        match category {
            Category::Ampacity => &self.ampacity,
            Category::VoltageDrop => &self.voltage_drop,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut MethodTables {
        match category {
            Category::Ampacity => &mut self.ampacity,
            Category::VoltageDrop => &mut self.voltage_drop,
        }
    }
}

type ArrangementTables = BTreeMap<Arrangement, CategoryTables>;
type ArmourTables = BTreeMap<Armour, ArrangementTables>;

/// Full path to one column of the dataset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableKey<'a> {
    pub insulation: Insulation,
    pub armour: Armour,
    pub arrangement: Arrangement,
    pub category: Category,
    pub method: &'a str,
    pub conductors: Conductors,
}

impl<'a> TableKey<'a> {
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}",
            self.insulation.to_str(),
            self.armour.to_str(),
            self.arrangement.to_str(),
            self.category.to_str(),
            self.method,
            self.conductors.key()
        )
    }

    fn miss(&self, dimension: LookupDimension) -> LookupMiss {
        LookupMiss {
            dimension,
            path: self.path(),
        }
    }
}

/// Key of a size in a column, e.g. `2.5` or `25`
pub fn size_key(size: f64) -> String {
    format!("{}", size)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CableTables {
    pub tables: BTreeMap<Insulation, ArmourTables>,
}

impl CableTables {
    /// Loads an externally supplied dataset
    pub fn from_json(text: &str) -> Result<CableTables, CalcError> {
        serde_json::from_str(text)
            .map_err(|err| CalcError::invalid("cable tables", format!("malformed dataset: {}", err)))
    }

    /// Built-in copper tables
    pub fn builtin() -> &'static CableTables {
        static TABLES: OnceLock<CableTables> = OnceLock::new();
        TABLES.get_or_init(build_builtin)
    }

    /// Column for `key`, naming the first level that is missing
    pub fn column(&self, key: &TableKey) -> Result<&SizeColumn, LookupMiss> {
        let armours = self
            .tables
            .get(&key.insulation)
            .ok_or_else(|| key.miss(LookupDimension::Insulation))?;
        let arrangements = armours
            .get(&key.armour)
            .ok_or_else(|| key.miss(LookupDimension::Armour))?;
        let categories = arrangements
            .get(&key.arrangement)
            .ok_or_else(|| key.miss(LookupDimension::Arrangement))?;
        let methods = categories.get(key.category);
        if methods.is_empty() {
            return Err(key.miss(LookupDimension::Category));
        }
        let conductors = methods
            .get(key.method)
            .ok_or_else(|| key.miss(LookupDimension::Method))?;
        conductors
            .get(key.conductors.key())
            .ok_or_else(|| key.miss(LookupDimension::Conductors))
    }

    /// Single value for `key` at `size`
    pub fn lookup(&self, key: &TableKey, size: f64) -> Result<f64, LookupMiss> {
        let column = self.column(key)?;
        column.get(&size_key(size)).copied().ok_or_else(|| LookupMiss {
            dimension: LookupDimension::Size,
            path: format!("{}/{}", key.path(), size_key(size)),
        })
    }

    pub fn insert(&mut self, key: &TableKey, column: SizeColumn) {
        self.tables
            .entry(key.insulation)
            .or_default()
            .entry(key.armour)
            .or_default()
            .entry(key.arrangement)
            .or_default()
            .get_mut(key.category)
            .entry(key.method.to_string())
            .or_default()
            .insert(key.conductors.key().to_string(), column);
    }
}

/// Column starting at size `from`
fn column(from: f64, vals: &[f64]) -> SizeColumn {
    let start = STANDARD_SIZES.iter().position(|s| *s == from).unwrap_or(0);
    STANDARD_SIZES[start..]
        .iter()
        .zip(vals.iter())
        .map(|(size, val)| (size_key(*size), *val))
        .collect()
}

struct Sheet<'t> {
    tables: &'t mut CableTables,
    insulation: Insulation,
    armour: Armour,
    arrangement: Arrangement,
}

impl<'t> Sheet<'t> {
    fn put(&mut self, category: Category, method: &str, conductors: Conductors, from: f64, vals: &[f64]) {
        let key = TableKey {
            insulation: self.insulation,
            armour: self.armour,
            arrangement: self.arrangement,
            category,
            method,
            conductors,
        };
        self.tables.insert(&key, column(from, vals));
    }

    fn amps(&mut self, method: &str, conductors: Conductors, from: f64, vals: &[f64]) {
        self.put(Category::Ampacity, method, conductors, from, vals);
    }

    fn vd(&mut self, path: &str, from: f64, vals: &[f64]) {
        // voltage-drop columns are keyed by phase count too
        let conductors = if path.starts_with("single") {
            Conductors::Two
        } else {
            Conductors::Three
        };
        self.put(Category::VoltageDrop, path, conductors, from, vals);
    }
}

fn build_builtin() -> CableTables {
    use Conductors::{Three, Two};

    let mut tables = CableTables::default();

    // 4D1A / 4D1B: PVC 70 °C, non-armoured single-core
    let mut s = Sheet {
        tables: &mut tables,
        insulation: Insulation::Pvc,
        armour: Armour::NonArmoured,
        arrangement: Arrangement::SingleCore,
    };
    s.amps("A", Two, 1.5, &[14.5, 19.5, 26.0, 34.0, 46.0, 61.0, 80.0, 99.0, 119.0, 151.0, 182.0, 210.0, 240.0, 273.0, 321.0, 367.0]);
    s.amps("A", Three, 1.5, &[13.5, 18.0, 24.0, 31.0, 42.0, 56.0, 73.0, 89.0, 108.0, 136.0, 164.0, 188.0, 216.0, 245.0, 286.0, 328.0]);
    s.amps("B", Two, 1.5, &[17.5, 24.0, 32.0, 41.0, 57.0, 76.0, 101.0, 125.0, 151.0, 192.0, 232.0, 269.0, 300.0, 341.0, 400.0, 458.0]);
    s.amps("B", Three, 1.5, &[15.5, 21.0, 28.0, 36.0, 50.0, 68.0, 89.0, 110.0, 134.0, 171.0, 207.0, 239.0, 262.0, 296.0, 346.0, 394.0]);
    s.amps("C", Two, 1.5, &[20.0, 27.0, 37.0, 47.0, 65.0, 87.0, 114.0, 141.0, 182.0, 234.0, 284.0, 330.0, 381.0, 436.0, 515.0, 594.0]);
    s.amps("C", Three, 1.5, &[18.0, 25.0, 33.0, 43.0, 59.0, 79.0, 104.0, 129.0, 167.0, 214.0, 261.0, 303.0, 349.0, 400.0, 472.0, 545.0]);
    s.amps("F_touching", Two, 25.0, &[131.0, 162.0, 196.0, 251.0, 304.0, 352.0, 406.0, 463.0, 546.0, 629.0]);
    s.amps("F_trefoil", Three, 25.0, &[110.0, 137.0, 167.0, 216.0, 264.0, 308.0, 356.0, 409.0, 485.0, 561.0]);
    s.amps("F_flat_touching", Three, 25.0, &[114.0, 143.0, 174.0, 225.0, 275.0, 321.0, 372.0, 427.0, 507.0, 587.0]);
    for conductors in [Two, Three] {
        s.amps("G_spaced_horizontal", conductors, 25.0, &[146.0, 181.0, 219.0, 281.0, 341.0, 396.0, 456.0, 521.0, 615.0, 709.0]);
        s.amps("G_spaced_vertical", conductors, 25.0, &[130.0, 162.0, 197.0, 254.0, 311.0, 362.0, 419.0, 480.0, 569.0, 659.0]);
    }
    s.vd("single_phase", 1.5, &[29.0, 18.0, 11.0, 7.3, 4.4, 2.8, 1.8, 1.3, 0.97, 0.69, 0.52, 0.43, 0.37, 0.32, 0.28, 0.25]);
    s.vd("three_phase_trefoil", 1.5, &[25.0, 15.0, 9.5, 6.4, 3.8, 2.4, 1.55, 1.15, 0.86, 0.61, 0.46, 0.38, 0.33, 0.29, 0.25, 0.22]);
    s.vd("three_phase_touching", 1.5, &[25.0, 15.0, 9.5, 6.4, 3.8, 2.4, 1.6, 1.2, 0.9, 0.65, 0.5, 0.42, 0.37, 0.33, 0.29, 0.27]);
    s.vd("three_phase_spaced", 1.5, &[25.0, 15.0, 9.5, 6.4, 3.8, 2.4, 1.65, 1.25, 0.95, 0.7, 0.56, 0.48, 0.43, 0.39, 0.35, 0.33]);

    // 4D2A / 4D2B: PVC 70 °C, non-armoured multicore
    let mut s = Sheet {
        tables: &mut tables,
        insulation: Insulation::Pvc,
        armour: Armour::NonArmoured,
        arrangement: Arrangement::Multicore,
    };
    s.amps("A", Two, 1.5, &[14.0, 18.5, 25.0, 32.0, 43.0, 57.0, 75.0, 92.0, 110.0, 139.0, 167.0, 192.0, 219.0, 248.0, 291.0, 334.0]);
    s.amps("A", Three, 1.5, &[13.0, 17.5, 23.0, 29.0, 39.0, 52.0, 68.0, 83.0, 99.0, 125.0, 150.0, 172.0, 196.0, 223.0, 261.0, 298.0]);
    s.amps("B", Two, 1.5, &[16.5, 23.0, 30.0, 38.0, 52.0, 69.0, 90.0, 111.0, 133.0, 168.0, 201.0, 232.0, 258.0, 294.0, 344.0, 394.0]);
    s.amps("B", Three, 1.5, &[15.0, 20.0, 27.0, 34.0, 46.0, 62.0, 80.0, 99.0, 118.0, 149.0, 179.0, 206.0, 225.0, 255.0, 297.0, 339.0]);
    s.amps("C", Two, 1.5, &[19.5, 27.0, 36.0, 46.0, 63.0, 85.0, 112.0, 138.0, 168.0, 213.0, 258.0, 299.0, 344.0, 392.0, 461.0, 530.0]);
    s.amps("C", Three, 1.5, &[17.5, 24.0, 32.0, 41.0, 57.0, 76.0, 96.0, 119.0, 144.0, 184.0, 223.0, 259.0, 299.0, 341.0, 403.0, 464.0]);
    s.amps("E", Two, 1.5, &[22.0, 30.0, 40.0, 51.0, 70.0, 94.0, 119.0, 148.0, 180.0, 232.0, 282.0, 328.0, 379.0, 434.0, 514.0, 593.0]);
    s.amps("E", Three, 1.5, &[18.5, 25.0, 34.0, 43.0, 60.0, 80.0, 101.0, 126.0, 153.0, 196.0, 238.0, 276.0, 319.0, 364.0, 430.0, 497.0]);
    s.vd("single_phase", 1.5, &[29.0, 18.0, 11.0, 7.3, 4.4, 2.8, 1.75, 1.25, 0.93, 0.65, 0.49, 0.4, 0.34, 0.29, 0.24, 0.21]);
    s.vd("three_phase", 1.5, &[25.0, 15.0, 9.5, 6.4, 3.8, 2.4, 1.5, 1.1, 0.81, 0.57, 0.42, 0.35, 0.29, 0.25, 0.21, 0.185]);

    // 4D4A / 4D4B: PVC 70 °C, armoured multicore
    let mut s = Sheet {
        tables: &mut tables,
        insulation: Insulation::Pvc,
        armour: Armour::Armoured,
        arrangement: Arrangement::Multicore,
    };
    s.amps("C", Two, 1.5, &[21.0, 28.0, 38.0, 49.0, 67.0, 89.0, 118.0, 145.0, 175.0, 222.0, 269.0, 310.0, 356.0, 405.0, 476.0, 547.0]);
    s.amps("C", Three, 1.5, &[18.0, 25.0, 33.0, 42.0, 58.0, 77.0, 102.0, 125.0, 151.0, 192.0, 231.0, 267.0, 306.0, 348.0, 409.0, 469.0]);
    s.amps("E", Two, 1.5, &[22.0, 31.0, 41.0, 53.0, 72.0, 97.0, 128.0, 157.0, 190.0, 241.0, 291.0, 336.0, 386.0, 439.0, 516.0, 592.0]);
    s.amps("E", Three, 1.5, &[19.0, 26.0, 35.0, 45.0, 62.0, 83.0, 110.0, 135.0, 163.0, 207.0, 251.0, 290.0, 332.0, 378.0, 445.0, 510.0]);
    s.vd("single_phase", 1.5, &[29.0, 18.0, 11.0, 7.3, 4.4, 2.8, 1.75, 1.25, 0.93, 0.65, 0.49, 0.4, 0.34, 0.29, 0.24, 0.21]);
    s.vd("three_phase", 1.5, &[25.0, 15.0, 9.5, 6.4, 3.8, 2.4, 1.5, 1.1, 0.81, 0.57, 0.42, 0.35, 0.29, 0.25, 0.21, 0.185]);

    // 4E1A / 4E1B: XLPE 90 °C, non-armoured single-core
    let mut s = Sheet {
        tables: &mut tables,
        insulation: Insulation::Xlpe,
        armour: Armour::NonArmoured,
        arrangement: Arrangement::SingleCore,
    };
    s.amps("A", Two, 1.5, &[19.0, 26.0, 35.0, 45.0, 61.0, 81.0, 106.0, 131.0, 158.0, 200.0, 241.0, 278.0, 318.0, 362.0, 424.0, 486.0]);
    s.amps("A", Three, 1.5, &[17.0, 23.0, 31.0, 40.0, 54.0, 73.0, 95.0, 117.0, 141.0, 179.0, 216.0, 249.0, 285.0, 324.0, 380.0, 435.0]);
    s.amps("B", Two, 1.5, &[23.0, 31.0, 42.0, 54.0, 75.0, 100.0, 133.0, 164.0, 198.0, 253.0, 306.0, 354.0, 393.0, 449.0, 528.0, 603.0]);
    s.amps("B", Three, 1.5, &[20.0, 28.0, 37.0, 48.0, 66.0, 88.0, 117.0, 144.0, 175.0, 222.0, 269.0, 312.0, 342.0, 384.0, 450.0, 514.0]);
    s.amps("C", Two, 1.5, &[25.0, 34.0, 46.0, 59.0, 81.0, 109.0, 143.0, 176.0, 228.0, 293.0, 355.0, 413.0, 476.0, 545.0, 644.0, 743.0]);
    s.amps("C", Three, 1.5, &[22.0, 30.0, 40.0, 52.0, 71.0, 96.0, 127.0, 157.0, 196.0, 252.0, 306.0, 357.0, 410.0, 470.0, 556.0, 642.0]);
    s.amps("F_touching", Two, 25.0, &[161.0, 200.0, 242.0, 310.0, 377.0, 437.0, 504.0, 575.0, 679.0, 783.0]);
    s.amps("F_trefoil", Three, 25.0, &[135.0, 169.0, 207.0, 268.0, 328.0, 383.0, 444.0, 510.0, 607.0, 703.0]);
    s.amps("F_flat_touching", Three, 25.0, &[141.0, 176.0, 216.0, 279.0, 342.0, 400.0, 464.0, 533.0, 634.0, 736.0]);
    for conductors in [Two, Three] {
        s.amps("G_spaced_horizontal", conductors, 25.0, &[182.0, 226.0, 275.0, 353.0, 430.0, 500.0, 577.0, 661.0, 781.0, 902.0]);
        s.amps("G_spaced_vertical", conductors, 25.0, &[161.0, 201.0, 246.0, 318.0, 389.0, 454.0, 527.0, 605.0, 719.0, 833.0]);
    }
    s.vd("single_phase", 1.5, &[31.0, 19.0, 12.0, 7.9, 4.7, 2.9, 1.9, 1.35, 1.0, 0.73, 0.56, 0.47, 0.41, 0.36, 0.32, 0.29]);
    s.vd("three_phase_trefoil", 1.5, &[27.0, 16.0, 10.0, 6.8, 4.0, 2.5, 1.65, 1.2, 0.87, 0.63, 0.49, 0.41, 0.36, 0.32, 0.28, 0.26]);
    s.vd("three_phase_touching", 1.5, &[27.0, 16.0, 10.0, 6.8, 4.0, 2.5, 1.7, 1.25, 0.93, 0.68, 0.54, 0.46, 0.41, 0.37, 0.33, 0.31]);
    s.vd("three_phase_spaced", 1.5, &[27.0, 16.0, 10.0, 6.8, 4.0, 2.5, 1.75, 1.3, 0.98, 0.74, 0.6, 0.52, 0.47, 0.43, 0.39, 0.37]);

    // 4E2A / 4E2B: XLPE 90 °C, non-armoured multicore
    let mut s = Sheet {
        tables: &mut tables,
        insulation: Insulation::Xlpe,
        armour: Armour::NonArmoured,
        arrangement: Arrangement::Multicore,
    };
    s.amps("A", Two, 1.5, &[19.0, 26.0, 35.0, 45.0, 61.0, 81.0, 106.0, 131.0, 158.0, 200.0, 241.0, 278.0, 318.0, 362.0, 424.0, 486.0]);
    s.amps("A", Three, 1.5, &[16.5, 22.0, 30.0, 38.0, 52.0, 69.0, 90.0, 111.0, 133.0, 168.0, 201.0, 232.0, 258.0, 294.0, 344.0, 394.0]);
    s.amps("B", Two, 1.5, &[22.0, 30.0, 40.0, 51.0, 69.0, 91.0, 119.0, 146.0, 175.0, 221.0, 265.0, 305.0, 334.0, 384.0, 459.0, 532.0]);
    s.amps("B", Three, 1.5, &[19.5, 26.0, 35.0, 44.0, 60.0, 80.0, 105.0, 128.0, 154.0, 194.0, 233.0, 268.0, 300.0, 340.0, 398.0, 455.0]);
    s.amps("C", Two, 1.5, &[27.0, 36.0, 49.0, 63.0, 86.0, 115.0, 149.0, 185.0, 225.0, 289.0, 352.0, 410.0, 473.0, 542.0, 641.0, 741.0]);
    s.amps("C", Three, 1.5, &[23.0, 31.0, 42.0, 54.0, 75.0, 100.0, 127.0, 158.0, 192.0, 246.0, 298.0, 346.0, 399.0, 456.0, 538.0, 621.0]);
    s.amps("E", Two, 1.5, &[29.0, 39.0, 52.0, 68.0, 96.0, 125.0, 160.0, 195.0, 238.0, 305.0, 370.0, 430.0, 497.0, 569.0, 671.0, 775.0]);
    s.amps("E", Three, 1.5, &[25.0, 33.0, 44.0, 56.0, 78.0, 101.0, 134.0, 168.0, 207.0, 268.0, 328.0, 383.0, 444.0, 510.0, 607.0, 703.0]);
    s.vd("single_phase", 1.5, &[31.0, 19.0, 12.0, 7.9, 4.7, 2.9, 1.85, 1.35, 0.98, 0.67, 0.49, 0.39, 0.31, 0.25, 0.195, 0.16]);
    s.vd("three_phase", 1.5, &[27.0, 16.0, 10.0, 6.8, 4.0, 2.5, 1.65, 1.15, 0.87, 0.6, 0.44, 0.35, 0.29, 0.23, 0.185, 0.15]);

    // 4E3A / 4E3B: XLPE 90 °C, armoured single-core (non-magnetic armour)
    let mut s = Sheet {
        tables: &mut tables,
        insulation: Insulation::Xlpe,
        armour: Armour::Armoured,
        arrangement: Arrangement::SingleCore,
    };
    s.amps("C", Two, 50.0, &[237.0, 303.0, 367.0, 425.0, 488.0, 557.0, 656.0, 755.0]);
    s.amps("C", Three, 50.0, &[220.0, 281.0, 341.0, 396.0, 456.0, 521.0, 615.0, 709.0]);
    s.amps("F_touching", Two, 50.0, &[253.0, 322.0, 389.0, 449.0, 516.0, 587.0, 689.0, 792.0]);
    s.amps("F_trefoil", Three, 50.0, &[232.0, 297.0, 361.0, 419.0, 483.0, 551.0, 648.0, 746.0]);
    s.amps("F_flat_touching", Three, 50.0, &[222.0, 285.0, 346.0, 402.0, 463.0, 529.0, 625.0, 720.0]);
    s.vd("single_phase", 50.0, &[0.99, 0.71, 0.55, 0.46, 0.4, 0.36, 0.32, 0.3]);
    s.vd("three_phase_trefoil", 50.0, &[0.86, 0.62, 0.48, 0.4, 0.35, 0.31, 0.28, 0.26]);
    s.vd("three_phase_touching", 50.0, &[0.87, 0.64, 0.5, 0.42, 0.37, 0.33, 0.3, 0.28]);

    // 4E4A / 4E4B: XLPE 90 °C, armoured multicore
    let mut s = Sheet {
        tables: &mut tables,
        insulation: Insulation::Xlpe,
        armour: Armour::Armoured,
        arrangement: Arrangement::Multicore,
    };
    s.amps("C", Two, 1.5, &[27.0, 36.0, 49.0, 62.0, 85.0, 110.0, 146.0, 180.0, 219.0, 279.0, 338.0, 392.0, 451.0, 515.0, 607.0, 698.0]);
    s.amps("C", Three, 1.5, &[23.0, 31.0, 42.0, 53.0, 73.0, 94.0, 124.0, 154.0, 187.0, 238.0, 289.0, 335.0, 386.0, 441.0, 520.0, 599.0]);
    s.amps("E", Two, 1.5, &[29.0, 39.0, 52.0, 66.0, 90.0, 115.0, 152.0, 188.0, 228.0, 291.0, 354.0, 410.0, 472.0, 539.0, 636.0, 732.0]);
    s.amps("E", Three, 1.5, &[25.0, 33.0, 44.0, 56.0, 78.0, 99.0, 131.0, 162.0, 197.0, 251.0, 304.0, 353.0, 406.0, 463.0, 546.0, 628.0]);
    s.vd("single_phase", 1.5, &[31.0, 19.0, 12.0, 7.9, 4.7, 2.9, 1.85, 1.35, 0.98, 0.67, 0.49, 0.39, 0.31, 0.25, 0.195, 0.16]);
    s.vd("three_phase", 1.5, &[27.0, 16.0, 10.0, 6.8, 4.0, 2.5, 1.65, 1.15, 0.87, 0.6, 0.44, 0.35, 0.29, 0.23, 0.185, 0.15]);

    tracing::trace!("built-in cable tables loaded");
    tables
}

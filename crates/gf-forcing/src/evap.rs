//! Potential-evapotranspiration series construction.
//!
//! Every source hands out day-granular (or month-granular) rates; the
//! builder spreads them across the hours of the simulation window. Month
//! normals apply to every hour of that month; day-keyed values hold for all
//! 24 hours of the day. Daily rates divide by the sub-periods per day, so
//! an hourly run turns `V` per day into `V / 24` per step.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration};
use gf_core::{MM_TO_INCH, SimInfo};
use serde::Deserialize;
use serde_json::Value;

use crate::{ForcingError, ForcingResult};

/// Region-wide monthly pan-evaporation normals in inches per day. The
/// fallback when a job has no per-cell PET source.
const MONTHLY_PET_IN_PER_DAY: MonthlyNormals = MonthlyNormals::new([
    0.010, 0.020, 0.040, 0.070, 0.105, 0.130, 0.150, 0.125, 0.080, 0.040, 0.018, 0.010,
]);

pub fn builtin_monthly() -> &'static MonthlyNormals {
    &MONTHLY_PET_IN_PER_DAY
}

/// Twelve monthly rates, January first, in inches per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyNormals {
    values: [f64; 12],
}

impl MonthlyNormals {
    pub const fn new(values: [f64; 12]) -> Self {
        Self { values }
    }

    /// Rate for a 1-based calendar month.
    pub fn value_for_month(&self, month: u32) -> f64 {
        self.values[(month - 1) as usize]
    }
}

#[derive(Debug, Deserialize)]
struct DailyNormalsDoc {
    cells: Vec<String>,
    days: BTreeMap<String, Vec<f64>>,
}

/// Per-cell daily PET normals in mm per day, keyed by `MM-DD`.
///
/// The table carries one column per grid cell and one row per calendar day
/// of an arbitrary (leap) year. A non-leap table resolves Feb 29 to Feb 28.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyNormals {
    cells: Vec<String>,
    days: BTreeMap<(u32, u32), Vec<f64>>,
}

impl DailyNormals {
    pub fn from_value(value: Value) -> ForcingResult<Self> {
        let doc: DailyNormalsDoc = serde_json::from_value(value)?;
        let mut days = BTreeMap::new();
        for (key, row) in doc.days {
            let (month, day) = parse_day_key(&key)?;
            if row.len() != doc.cells.len() {
                return Err(ForcingError::BadNormals {
                    what: format!(
                        "row {key} has {} values for {} cells",
                        row.len(),
                        doc.cells.len()
                    ),
                });
            }
            days.insert((month, day), row);
        }
        Ok(Self {
            cells: doc.cells,
            days,
        })
    }

    pub fn has_cell(&self, gridcell: &str) -> bool {
        self.cells.iter().any(|c| c == gridcell)
    }

    /// mm/day for one cell and calendar day.
    pub fn value(&self, gridcell: &str, month: u32, day: u32) -> ForcingResult<f64> {
        let col = self
            .cells
            .iter()
            .position(|c| c == gridcell)
            .ok_or_else(|| ForcingError::UnknownCell {
                gridcell: gridcell.to_string(),
            })?;
        let row = match self.days.get(&(month, day)) {
            Some(row) => row,
            // leap day resolves to Feb 28 when the table lacks it
            None if (month, day) == (2, 29) => {
                self.days
                    .get(&(2, 28))
                    .ok_or(ForcingError::MissingDay { month, day })?
            }
            None => return Err(ForcingError::MissingDay { month, day }),
        };
        Ok(row[col])
    }
}

fn parse_day_key(key: &str) -> ForcingResult<(u32, u32)> {
    let bad = || ForcingError::BadNormals {
        what: format!("day key {key:?} is not MM-DD"),
    };
    let (m, d) = key.split_once('-').ok_or_else(bad)?;
    let month: u32 = m.parse().map_err(|_| bad())?;
    let day: u32 = d.parse().map_err(|_| bad())?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(bad());
    }
    Ok((month, day))
}

/// Where one job's PET series comes from, in selection order: a series
/// supplied by the input document wins, then the model's per-cell daily
/// normals, then the embedded monthly normals.
#[derive(Debug, Clone, Copy)]
pub enum EvapSource<'a> {
    Monthly(&'a MonthlyNormals),
    Daily {
        table: &'a DailyNormals,
        gridcell: &'a str,
    },
    /// Daily series from the input document itself, mm/day, first value on
    /// the window's first day.
    Supplied { daily_mm: &'a [f64] },
}

/// Hourly (or sub-daily) PET series for the window, in inches per step.
pub fn build_evap_series(info: &SimInfo, source: EvapSource<'_>) -> ForcingResult<Vec<f64>> {
    if info.steps == 0 {
        return Ok(Vec::new());
    }
    let per_day = info.steps_per_day() as f64;
    let delt = i64::from(info.delt_minutes);
    let mut out = Vec::with_capacity(info.steps);

    if let EvapSource::Supplied { daily_mm } = source {
        let last = info.start + Duration::minutes((info.steps as i64 - 1) * delt);
        let days_needed = ((last.date() - info.start.date()).num_days() + 1) as usize;
        if daily_mm.len() < days_needed {
            return Err(ForcingError::SeriesLength {
                name: "petinp",
                expected: days_needed,
                actual: daily_mm.len(),
            });
        }
    }

    for i in 0..info.steps {
        let ts = info.start + Duration::minutes(i as i64 * delt);
        let step_value = match source {
            EvapSource::Monthly(normals) => normals.value_for_month(ts.month()) / per_day,
            EvapSource::Daily { table, gridcell } => {
                table.value(gridcell, ts.month(), ts.day())? / per_day * MM_TO_INCH
            }
            EvapSource::Supplied { daily_mm } => {
                let offset = (ts.date() - info.start.date()).num_days() as usize;
                daily_mm[offset] / per_day * MM_TO_INCH
            }
        };
        out.push(step_value);
    }
    Ok(out)
}

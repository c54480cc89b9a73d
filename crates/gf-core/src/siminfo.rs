//! Simulation window descriptor shared by every run collaborator.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CoreError, CoreResult};

pub const MINUTES_PER_DAY: u32 = 1440;

/// Unit system flag handed to the solver. Forcing and parameter tables are
/// all kept in English units; the metric variant exists for solver
/// implementations that want it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    English,
    Metric,
}

impl UnitSystem {
    /// Conventional numeric flag (1 = English, 2 = metric).
    pub fn flag(self) -> u8 {
        match self {
            UnitSystem::English => 1,
            UnitSystem::Metric => 2,
        }
    }
}

/// Identity and timing for one grid-cell run.
///
/// `steps` is derived, never stored independently: whole days in the window
/// times the sub-daily periods per day. Partial trailing days do not add
/// steps.
#[derive(Debug, Clone, PartialEq)]
pub struct SimInfo {
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub delt_minutes: u32,
    pub steps: usize,
    pub units: UnitSystem,
    pub model: String,
    pub gridcell: String,
}

impl SimInfo {
    pub const DEFAULT_DELT_MINUTES: u32 = 60;

    pub fn new(
        start: NaiveDateTime,
        stop: NaiveDateTime,
        delt_minutes: u32,
        model: impl Into<String>,
        gridcell: impl Into<String>,
    ) -> CoreResult<Self> {
        if delt_minutes == 0 || MINUTES_PER_DAY % delt_minutes != 0 {
            return Err(CoreError::BadStepLength { delt: delt_minutes });
        }
        if stop < start {
            return Err(CoreError::WindowOrder {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }
        let days = (stop - start).num_days();
        let steps = days as usize * (MINUTES_PER_DAY / delt_minutes) as usize;
        Ok(Self {
            start,
            stop,
            delt_minutes,
            steps,
            units: UnitSystem::English,
            model: model.into(),
            gridcell: gridcell.into(),
        })
    }

    /// Hourly window, the production configuration.
    pub fn hourly(
        start: NaiveDateTime,
        stop: NaiveDateTime,
        model: impl Into<String>,
        gridcell: impl Into<String>,
    ) -> CoreResult<Self> {
        Self::new(start, stop, Self::DEFAULT_DELT_MINUTES, model, gridcell)
    }

    pub fn steps_per_day(&self) -> usize {
        (MINUTES_PER_DAY / self.delt_minutes) as usize
    }
}

/// Parse the timestamp shapes that appear in input documents: ISO-8601 with
/// `T` or space separators, with or without seconds, or a bare date (read
/// as midnight). A trailing `Z` is tolerated and ignored.
pub fn parse_timestamp(text: &str) -> CoreResult<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(CoreError::BadTimestamp {
        text: text.to_string(),
    })
}

//! Metadata records persisted alongside artifacts.

use gf_core::{Hru, SimInfo};
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One HRU's run identity plus either solver warnings (success) or the
/// captured error (failure). The numeric series live in the columnar
/// artifact, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HruRecord {
    pub model: String,
    pub gridcell: String,
    pub hru: String,
    pub start: String,
    pub stop: String,
    pub delt_minutes: u32,
    pub steps: usize,
    pub units: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl HruRecord {
    pub fn success(info: &SimInfo, hru: Hru, messages: &[String]) -> Self {
        Self {
            messages: messages.to_vec(),
            ..Self::base(info, hru)
        }
    }

    pub fn failure(info: &SimInfo, hru: Hru, message: &str, detail: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            error_detail: Some(detail.to_string()),
            ..Self::base(info, hru)
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    fn base(info: &SimInfo, hru: Hru) -> Self {
        Self {
            model: info.model.clone(),
            gridcell: info.gridcell.clone(),
            hru: hru.code(),
            start: info.start.format(TIMESTAMP_FORMAT).to_string(),
            stop: info.stop.format(TIMESTAMP_FORMAT).to_string(),
            delt_minutes: info.delt_minutes,
            steps: info.steps,
            units: info.units.flag(),
            messages: Vec::new(),
            error: None,
            error_detail: None,
        }
    }
}

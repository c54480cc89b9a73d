use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Simulation stop {stop} precedes start {start}")]
    WindowOrder { start: String, stop: String },

    #[error("Step length {delt} minutes does not divide a day evenly")]
    BadStepLength { delt: u32 },

    #[error("Unrecognized HRU code: {code}")]
    UnknownHru { code: String },

    #[error("Unparseable timestamp: {text}")]
    BadTimestamp { text: String },
}

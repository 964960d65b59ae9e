use thiserror::Error;

pub type PsResult<T> = Result<T, PsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PsError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Not enough points for {what}: need {needed}, got {got}")]
    TooFewPoints {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("{what} = {value} lies outside [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

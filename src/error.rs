//! Error module for the Rusty Spikes library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SpikeError {
    /// Error for invalid simulation parameters, e.g., a negative firing rate or zero trials.
    InvalidParameter(String),
    /// Error for invalid firing times, e.g., NaN values or times outside of the simulation window.
    InvalidFiringTimes(String),
    /// Error for I/O operations, including (de)serialization.
    IOError(String),
}

impl fmt::Display for SpikeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpikeError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            SpikeError::InvalidFiringTimes(e) => write!(f, "Invalid firing times: {}", e),
            SpikeError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SpikeError {}

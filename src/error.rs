use std::error::Error;
use std::fmt::{Display, Formatter};

/// Possible errors that arise due to issues with the input volume.
#[derive(Debug, Clone)]
pub enum WatershedError {
    EmptyVolume,
    NonFiniteValue(String),
}

impl Error for WatershedError {}

impl Display for WatershedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            WatershedError::EmptyVolume => {
                String::from("The volume provided has a zero-length axis")
            }
            WatershedError::NonFiniteValue(msg) => {
                format!("Non finite value: {msg}")
            }
        };
        write!(f, "{message}")
    }
}

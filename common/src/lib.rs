pub mod config;
pub mod error;
pub mod sdm;
pub mod setpoint;
pub mod table;
pub mod types;
pub mod units;

pub use config::{FinalCommand, NestConfig};
pub use error::{Error, Result};
pub use sdm::{Device, DeviceList};
pub use types::{
    CommandOutcome, DeviceCommand, SetpointOutcome, ThermostatMode, ThermostatReading,
    READING_COLUMNS, TIMESTAMP_FORMAT,
};

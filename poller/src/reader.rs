use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::info;

use nest_common::{table, NestConfig, Result, ThermostatReading};

use crate::{client::DeviceApi, token::AccessToken};

pub async fn read_and_log<A: DeviceApi>(
    api: &A,
    config: &NestConfig,
    token: &AccessToken,
) -> Result<ThermostatReading> {
    let devices = api.list_devices(token).await?;
    let device = devices.find(&config.thermostat)?;
    let reading = device.reading(
        now_in_timezone(config.timezone.as_deref()),
        &config.localization,
    )?;

    table::append_row(&config.readings_path, reading.record())?;

    info!(
        "{} {}: {:.1}C ({:.1}F) humidity {}% mode {} hvac {}",
        reading.timestamp.format(nest_common::TIMESTAMP_FORMAT),
        reading.device_name,
        reading.ambient_celsius,
        reading.ambient_fahrenheit,
        reading.humidity_percent,
        reading.mode,
        reading.hvac_status
    );

    Ok(reading)
}

fn now_in_timezone(timezone: Option<&str>) -> NaiveDateTime {
    match timezone.and_then(|name| name.parse::<Tz>().ok()) {
        Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
        None => Local::now().naive_local(),
    }
}

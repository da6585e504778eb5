use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    types::ThermostatReading,
    units::celsius_to_fahrenheit,
};

pub const TRAIT_PREFIX: &str = "sdm.devices.traits.";

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub devices: Vec<Device>,
}

impl DeviceList {
    // Bare id or full `enterprises/<project>/devices/<id>` name.
    pub fn find(&self, device_id: &str) -> Result<&Device> {
        let suffix = format!("/devices/{device_id}");
        self.devices
            .iter()
            .find(|device| device.name == device_id || device.name.ends_with(&suffix))
            .ok_or_else(|| Error::DeviceNotFound(device_id.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub traits: Map<String, Value>,
}

impl Device {
    fn field(&self, trait_name: &str, key: &str) -> Option<&Value> {
        self.traits
            .get(&format!("{TRAIT_PREFIX}{trait_name}"))
            .and_then(|traits| traits.get(key))
    }

    fn required(&self, trait_name: &str, key: &str) -> Result<&Value> {
        self.field(trait_name, key)
            .ok_or_else(|| Error::MissingField(format!("{TRAIT_PREFIX}{trait_name}.{key}")))
    }

    fn number(&self, trait_name: &str, key: &str) -> Result<f64> {
        self.required(trait_name, key)?
            .as_f64()
            .ok_or_else(|| Error::MissingField(format!("{TRAIT_PREFIX}{trait_name}.{key}")))
    }

    fn text(&self, trait_name: &str, key: &str) -> Result<String> {
        self.required(trait_name, key)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::MissingField(format!("{TRAIT_PREFIX}{trait_name}.{key}")))
    }

    fn optional_number(&self, trait_name: &str, key: &str) -> Option<f64> {
        self.field(trait_name, key).and_then(Value::as_f64)
    }

    fn optional_text(&self, trait_name: &str, key: &str) -> Option<String> {
        self.field(trait_name, key)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    fn text_list(&self, trait_name: &str, key: &str) -> Result<Vec<String>> {
        let values = self
            .required(trait_name, key)?
            .as_array()
            .ok_or_else(|| Error::MissingField(format!("{TRAIT_PREFIX}{trait_name}.{key}")))?;
        Ok(values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect())
    }

    pub fn reading(&self, timestamp: NaiveDateTime, localization: &str) -> Result<ThermostatReading> {
        let ambient_celsius = self.number("Temperature", "ambientTemperatureCelsius")?;
        let eco_heat_celsius = self.number("ThermostatEco", "heatCelsius")?;
        let eco_cool_celsius = self.number("ThermostatEco", "coolCelsius")?;

        Ok(ThermostatReading {
            timestamp,
            device_name: self.name.clone(),
            device_type: self.device_type.clone(),
            localization: localization.to_string(),
            connectivity: self.text("Connectivity", "status")?,
            ambient_celsius,
            ambient_fahrenheit: celsius_to_fahrenheit(ambient_celsius),
            mode: self.text("ThermostatMode", "mode")?,
            available_modes: self.text_list("ThermostatMode", "availableModes")?,
            heat_target_celsius: self.number("ThermostatTemperatureSetpoint", "heatCelsius")?,
            cool_target_celsius: self.optional_number("ThermostatTemperatureSetpoint", "coolCelsius"),
            humidity_percent: self.number("Humidity", "ambientHumidityPercent")?,
            fan_timer_mode: self.optional_text("Fan", "timerMode"),
            eco_mode: self.text("ThermostatEco", "mode")?,
            eco_heat_celsius,
            eco_heat_fahrenheit: celsius_to_fahrenheit(eco_heat_celsius),
            eco_cool_celsius,
            eco_cool_fahrenheit: celsius_to_fahrenheit(eco_cool_celsius),
            hvac_status: self.text("ThermostatHvac", "status")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn sample_list() -> DeviceList {
        serde_json::from_value(json!({
            "devices": [
                {
                    "name": "enterprises/project-1/devices/camera-1",
                    "type": "sdm.devices.types.CAMERA",
                    "traits": {}
                },
                {
                    "name": "enterprises/project-1/devices/thermo-1",
                    "type": "sdm.devices.types.THERMOSTAT",
                    "traits": {
                        "sdm.devices.traits.Connectivity": { "status": "ONLINE" },
                        "sdm.devices.traits.Temperature": { "ambientTemperatureCelsius": 22.5 },
                        "sdm.devices.traits.ThermostatMode": {
                            "mode": "HEAT",
                            "availableModes": ["HEAT", "COOL", "HEATCOOL", "OFF"]
                        },
                        "sdm.devices.traits.ThermostatTemperatureSetpoint": { "heatCelsius": 21.0 },
                        "sdm.devices.traits.Humidity": { "ambientHumidityPercent": 38 },
                        "sdm.devices.traits.ThermostatEco": {
                            "mode": "OFF",
                            "heatCelsius": 10.0,
                            "coolCelsius": 30.0
                        },
                        "sdm.devices.traits.ThermostatHvac": { "status": "HEATING" }
                    }
                }
            ]
        }))
        .unwrap()
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn finds_device_by_id_not_position() {
        let list = sample_list();
        let device = list.find("thermo-1").unwrap();
        assert_eq!(device.device_type, "sdm.devices.types.THERMOSTAT");

        let by_name = list.find("enterprises/project-1/devices/thermo-1").unwrap();
        assert_eq!(by_name.name, device.name);

        assert!(matches!(list.find("thermo-2"), Err(Error::DeviceNotFound(_))));
    }

    #[test]
    fn extracts_reading_with_absent_optionals() {
        let list = sample_list();
        let reading = list
            .find("thermo-1")
            .unwrap()
            .reading(timestamp(), "Hallway")
            .unwrap();

        assert_eq!(reading.ambient_fahrenheit, 72.5);
        assert_eq!(reading.localization, "Hallway");
        assert_eq!(reading.available_modes.len(), 4);
        assert_eq!(reading.cool_target_celsius, None);
        assert_eq!(reading.fan_timer_mode, None);
        assert_eq!(reading.humidity_percent, 38.0);
        assert_eq!(reading.eco_heat_fahrenheit, 50.0);
        assert_eq!(reading.eco_cool_fahrenheit, 86.0);
    }

    #[test]
    fn missing_required_field_names_its_path() {
        let mut list = sample_list();
        list.devices[1]
            .traits
            .remove("sdm.devices.traits.ThermostatHvac");

        let err = list.devices[1].reading(timestamp(), "Thermostat").unwrap_err();
        match err {
            Error::MissingField(path) => {
                assert_eq!(path, "sdm.devices.traits.ThermostatHvac.status")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_enterprise_has_no_devices() {
        let list: DeviceList = serde_json::from_str("{}").unwrap();
        assert!(list.devices.is_empty());
    }
}

use std::{path::PathBuf, sync::Mutex};

use serde_json::{json, Value};

use nest_common::{CommandOutcome, DeviceCommand, DeviceList, NestConfig, Result};

use crate::{client::DeviceApi, token::AccessToken};

pub fn scratch_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "nest-poller-{}-{name}.csv",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

pub fn test_config(name: &str) -> NestConfig {
    NestConfig {
        project_id: "project-1".to_string(),
        client_id: "client-1.apps.googleusercontent.com".to_string(),
        client_secret: "secret".to_string(),
        email: "owner@example.com".to_string(),
        thermostat: "thermo-1".to_string(),
        readings_path: scratch_path(&format!("{name}-readings")),
        setpoint_path: scratch_path(&format!("{name}-setpoint")),
        ..NestConfig::default()
    }
}

pub fn thermostat_devices(ambient_celsius: f64) -> Value {
    json!({
        "devices": [{
            "name": "enterprises/project-1/devices/thermo-1",
            "type": "sdm.devices.types.THERMOSTAT",
            "traits": {
                "sdm.devices.traits.Connectivity": { "status": "ONLINE" },
                "sdm.devices.traits.Temperature": { "ambientTemperatureCelsius": ambient_celsius },
                "sdm.devices.traits.ThermostatMode": {
                    "mode": "HEAT",
                    "availableModes": ["HEAT", "COOL", "HEATCOOL", "OFF"]
                },
                "sdm.devices.traits.ThermostatTemperatureSetpoint": { "heatCelsius": 20.0 },
                "sdm.devices.traits.Humidity": { "ambientHumidityPercent": 44 },
                "sdm.devices.traits.Fan": { "timerMode": "OFF" },
                "sdm.devices.traits.ThermostatEco": {
                    "mode": "OFF",
                    "heatCelsius": 9.0,
                    "coolCelsius": 29.0
                },
                "sdm.devices.traits.ThermostatHvac": { "status": "OFF" }
            }
        }]
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    ListDevices { authorization: String },
    Command { authorization: String, body: Value },
}

pub struct FakeApi {
    pub devices: Value,
    pub command_status: u16,
    pub requests: Mutex<Vec<Recorded>>,
}

impl FakeApi {
    pub fn new(devices: Value) -> Self {
        Self {
            devices,
            command_status: 200,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

impl DeviceApi for FakeApi {
    async fn list_devices(&self, token: &AccessToken) -> Result<DeviceList> {
        self.requests.lock().unwrap().push(Recorded::ListDevices {
            authorization: token.bearer(),
        });
        Ok(serde_json::from_value(self.devices.clone())?)
    }

    async fn execute_command(
        &self,
        token: &AccessToken,
        command: &DeviceCommand,
    ) -> Result<CommandOutcome> {
        self.requests.lock().unwrap().push(Recorded::Command {
            authorization: token.bearer(),
            body: serde_json::to_value(command)?,
        });
        Ok(CommandOutcome {
            status: self.command_status,
            body: json!({}),
        })
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const READING_COLUMNS: [&str; 19] = [
    "Timestamp",
    "Device_Name",
    "Device_Type",
    "Localization",
    "Connectivity",
    "Temp_Celsius",
    "Temp_Fahrenheit",
    "Thermostat_Mode",
    "Thermostat_Available_Modes",
    "Heat_Target Temperature",
    "Cool_Target_Temperature",
    "Humidity",
    "Fan",
    "Thermostat_Eco_Mode",
    "Thermostat_Eco_Heat_Celsius",
    "Thermostat_Eco_Heat_Fahrenheit",
    "Thermostat_Eco_Cool_Celsius",
    "Thermostat_Eco_Cool_Fahrenheit",
    "Thermostat_HVAC",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThermostatMode {
    Heat,
    Cool,
    HeatCool,
}

impl ThermostatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
            Self::HeatCool => "HEATCOOL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", content = "params")]
pub enum DeviceCommand {
    #[serde(rename = "sdm.devices.commands.ThermostatMode.SetMode")]
    SetMode { mode: ThermostatMode },
    #[serde(
        rename = "sdm.devices.commands.ThermostatTemperatureSetpoint.SetHeat",
        rename_all = "camelCase"
    )]
    SetHeat { heat_celsius: f64 },
    #[serde(
        rename = "sdm.devices.commands.ThermostatTemperatureSetpoint.SetCool",
        rename_all = "camelCase"
    )]
    SetCool { cool_celsius: f64 },
    #[serde(
        rename = "sdm.devices.commands.ThermostatTemperatureSetpoint.SetRange",
        rename_all = "camelCase"
    )]
    SetRange { heat_celsius: f64, cool_celsius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub status: u16,
    pub body: Value,
}

impl CommandOutcome {
    pub fn new(status: u16, raw_body: &str) -> Self {
        let body = if raw_body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw_body).unwrap_or_else(|_| Value::String(raw_body.to_owned()))
        };
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetpointOutcome {
    pub mode: CommandOutcome,
    pub setpoint: CommandOutcome,
}

impl SetpointOutcome {
    pub fn is_success(&self) -> bool {
        self.mode.is_success() && self.setpoint.is_success()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThermostatReading {
    pub timestamp: NaiveDateTime,
    pub device_name: String,
    pub device_type: String,
    pub localization: String,
    pub connectivity: String,
    pub ambient_celsius: f64,
    pub ambient_fahrenheit: f64,
    pub mode: String,
    pub available_modes: Vec<String>,
    pub heat_target_celsius: f64,
    // Absent outside COOL/HEATCOOL or on systems without cooling.
    pub cool_target_celsius: Option<f64>,
    pub humidity_percent: f64,
    pub fan_timer_mode: Option<String>,
    pub eco_mode: String,
    pub eco_heat_celsius: f64,
    pub eco_heat_fahrenheit: f64,
    pub eco_cool_celsius: f64,
    pub eco_cool_fahrenheit: f64,
    pub hvac_status: String,
}

impl ThermostatReading {
    pub fn record(&self) -> [String; 19] {
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.device_name.clone(),
            self.device_type.clone(),
            self.localization.clone(),
            self.connectivity.clone(),
            self.ambient_celsius.to_string(),
            self.ambient_fahrenheit.to_string(),
            self.mode.clone(),
            self.available_modes.join(" "),
            self.heat_target_celsius.to_string(),
            self.cool_target_celsius
                .map(|value| value.to_string())
                .unwrap_or_default(),
            self.humidity_percent.to_string(),
            self.fan_timer_mode.clone().unwrap_or_default(),
            self.eco_mode.clone(),
            self.eco_heat_celsius.to_string(),
            self.eco_heat_fahrenheit.to_string(),
            self.eco_cool_celsius.to_string(),
            self.eco_cool_fahrenheit.to_string(),
            self.hvac_status.clone(),
        ]
    }
}

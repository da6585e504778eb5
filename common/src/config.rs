use std::{path::PathBuf, time::Duration};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://smartdevicemanagement.googleapis.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://nestservices.google.com/partnerconnections";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalCommand {
    Heat,
    Cool,
    HeatCool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NestConfig {
    pub project_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub email: String,
    pub refresh_token: Option<String>,
    pub thermostat: String,

    pub api_base_url: String,
    pub token_url: String,
    pub authorize_url: String,

    pub readings_path: PathBuf,
    pub setpoint_path: PathBuf,
    pub localization: String,
    pub timezone: Option<String>,

    pub poll_duration_secs: u64,
    pub poll_interval_secs: u64,
    pub http_timeout_secs: u64,

    pub cool_placeholder_celsius: f64,
    pub final_command: FinalCommand,
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "https://www.google.com".to_string(),
            email: String::new(),
            refresh_token: None,
            thermostat: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            readings_path: PathBuf::from("thermostat_readings.csv"),
            setpoint_path: PathBuf::from("FDD.csv"),
            localization: "Thermostat".to_string(),
            timezone: None,
            poll_duration_secs: 300,
            poll_interval_secs: 20,
            http_timeout_secs: 30,
            cool_placeholder_celsius: 11.0,
            final_command: FinalCommand::Heat,
        }
    }
}

impl NestConfig {
    // Does not validate; overrides are applied first.
    pub fn from_json(raw: &[u8]) -> Result<Self> {
        let mut config: Self = serde_json::from_slice(raw)?;
        config.sanitize();
        Ok(config)
    }

    pub fn sanitize(&mut self) {
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self.authorize_url = self.authorize_url.trim_end_matches('/').to_string();
        if self.poll_interval_secs == 0 {
            self.poll_interval_secs = 1;
        }
        if self.http_timeout_secs == 0 {
            self.http_timeout_secs = 30;
        }
        if self.refresh_token.as_deref().is_some_and(str::is_empty) {
            self.refresh_token = None;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("project_id", &self.project_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("thermostat", &self.thermostat),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("`{name}` must be set")));
            }
        }

        if let Some(timezone) = &self.timezone {
            timezone
                .parse::<Tz>()
                .map_err(|_| Error::Config(format!("unknown timezone `{timezone}`")))?;
        }

        if !self.cool_placeholder_celsius.is_finite() {
            return Err(Error::Config(
                "`cool_placeholder_celsius` must be a finite number".to_string(),
            ));
        }

        Ok(())
    }

    pub fn poll_duration(&self) -> Duration {
        Duration::from_secs(self.poll_duration_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn devices_url(&self) -> String {
        format!("{}/enterprises/{}/devices", self.api_base_url, self.project_id)
    }

    // `thermostat` may be the bare id or the full resource name.
    pub fn device_id(&self) -> &str {
        let prefix = format!("enterprises/{}/devices/", self.project_id);
        self.thermostat
            .strip_prefix(prefix.as_str())
            .unwrap_or(&self.thermostat)
    }

    pub fn command_url(&self) -> String {
        format!(
            "{}/enterprises/{}/devices/{}:executeCommand",
            self.api_base_url,
            self.project_id,
            self.device_id()
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const MINIMAL: &str = r#"{
        "project_id": "project-1",
        "client_id": "client.apps.googleusercontent.com",
        "client_secret": "secret",
        "thermostat": "thermo-1"
    }"#;

    #[test]
    fn fills_defaults() {
        let config = NestConfig::from_json(MINIMAL.as_bytes()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.poll_duration(), Duration::from_secs(300));
        assert_eq!(config.poll_interval(), Duration::from_secs(20));
        assert_eq!(config.readings_path, PathBuf::from("thermostat_readings.csv"));
        assert_eq!(config.setpoint_path, PathBuf::from("FDD.csv"));
        assert_eq!(config.final_command, FinalCommand::Heat);
        assert_eq!(config.cool_placeholder_celsius, 11.0);
    }

    #[test]
    fn builds_enterprise_scoped_urls() {
        let mut config = NestConfig::from_json(MINIMAL.as_bytes()).unwrap();
        config.api_base_url = "http://127.0.0.1:9000/v1/".to_string();
        config.sanitize();

        assert_eq!(
            config.devices_url(),
            "http://127.0.0.1:9000/v1/enterprises/project-1/devices"
        );
        assert_eq!(
            config.command_url(),
            "http://127.0.0.1:9000/v1/enterprises/project-1/devices/thermo-1:executeCommand"
        );
    }

    #[test]
    fn command_url_accepts_full_resource_name() {
        let mut config = NestConfig::from_json(MINIMAL.as_bytes()).unwrap();
        config.api_base_url = "https://sdm/v1".to_string();
        config.thermostat = "enterprises/project-1/devices/thermo-1".to_string();

        assert_eq!(config.device_id(), "thermo-1");
        assert_eq!(
            config.command_url(),
            "https://sdm/v1/enterprises/project-1/devices/thermo-1:executeCommand"
        );
    }

    #[test]
    fn rejects_missing_identifiers() {
        let config = NestConfig::from_json(br#"{ "project_id": "p" }"#).unwrap();
        match config.validate() {
            Err(Error::Config(message)) => assert_eq!(message, "`client_id` must be set"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut config = NestConfig::from_json(MINIMAL.as_bytes()).unwrap();
        config.timezone = Some("Mars/Olympus_Mons".to_string());
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.timezone = Some("America/Los_Angeles".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_is_raised_to_one_second() {
        let mut config = NestConfig::from_json(MINIMAL.as_bytes()).unwrap();
        config.poll_interval_secs = 0;
        config.sanitize();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn parses_final_command_names() {
        let raw = MINIMAL.replace('}', r#", "final_command": "heat_cool" }"#);
        let config = NestConfig::from_json(raw.as_bytes()).unwrap();
        assert_eq!(config.final_command, FinalCommand::HeatCool);
    }
}

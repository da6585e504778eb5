use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use tracing::debug;

use nest_common::{CommandOutcome, DeviceCommand, DeviceList, Error, NestConfig, Result};

use crate::token::AccessToken;

pub trait DeviceApi {
    // Non-2xx answers are `Error::Api`.
    async fn list_devices(&self, token: &AccessToken) -> Result<DeviceList>;

    // The answer is returned whatever its status.
    async fn execute_command(
        &self,
        token: &AccessToken,
        command: &DeviceCommand,
    ) -> Result<CommandOutcome>;
}

#[derive(Clone)]
pub struct SdmClient {
    http: reqwest::Client,
    config: Arc<NestConfig>,
}

impl SdmClient {
    pub fn new(http: reqwest::Client, config: Arc<NestConfig>) -> Self {
        Self { http, config }
    }
}

impl DeviceApi for SdmClient {
    async fn list_devices(&self, token: &AccessToken) -> Result<DeviceList> {
        let url = self.config.devices_url();
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn execute_command(
        &self,
        token: &AccessToken,
        command: &DeviceCommand,
    ) -> Result<CommandOutcome> {
        let url = self.config.command_url();
        debug!("POST {url}: {command:?}");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, token.bearer())
            .json(command)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        Ok(CommandOutcome::new(status, &body))
    }
}

pub fn transport(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

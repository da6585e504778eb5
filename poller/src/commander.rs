use tracing::debug;

use nest_common::{
    setpoint::read_setpoint_celsius, CommandOutcome, DeviceCommand, FinalCommand, NestConfig,
    Result, SetpointOutcome, ThermostatMode,
};

use crate::{client::DeviceApi, token::AccessToken};

pub struct Commander<'a, A> {
    api: &'a A,
    config: &'a NestConfig,
}

impl<'a, A: DeviceApi> Commander<'a, A> {
    pub fn new(api: &'a A, config: &'a NestConfig) -> Self {
        Self { api, config }
    }

    async fn send(&self, token: &AccessToken, command: DeviceCommand) -> Result<CommandOutcome> {
        let outcome = self.api.execute_command(token, &command).await?;
        debug!("{command:?} -> {} {}", outcome.status, outcome.body);
        Ok(outcome)
    }

    pub async fn set_mode_to_heat(&self, token: &AccessToken) -> Result<CommandOutcome> {
        self.send(token, DeviceCommand::SetMode { mode: ThermostatMode::Heat })
            .await
    }

    pub async fn set_mode_to_cool(&self, token: &AccessToken) -> Result<CommandOutcome> {
        self.send(token, DeviceCommand::SetMode { mode: ThermostatMode::Cool })
            .await
    }

    pub async fn set_mode_to_heat_cool(&self, token: &AccessToken) -> Result<CommandOutcome> {
        self.send(
            token,
            DeviceCommand::SetMode {
                mode: ThermostatMode::HeatCool,
            },
        )
        .await
    }

    pub async fn set_target_heat_temperature(&self, token: &AccessToken) -> Result<SetpointOutcome> {
        let mode = self.set_mode_to_heat(token).await?;
        let heat_celsius = read_setpoint_celsius(&self.config.setpoint_path)?;
        let setpoint = self
            .send(token, DeviceCommand::SetHeat { heat_celsius })
            .await?;
        Ok(SetpointOutcome { mode, setpoint })
    }

    pub async fn set_target_cool_temperature(&self, token: &AccessToken) -> Result<SetpointOutcome> {
        let mode = self.set_mode_to_cool(token).await?;
        let cool_celsius = read_setpoint_celsius(&self.config.setpoint_path)?;
        let setpoint = self
            .send(token, DeviceCommand::SetCool { cool_celsius })
            .await?;
        Ok(SetpointOutcome { mode, setpoint })
    }

    pub async fn set_target_heat_and_cool_temperature(
        &self,
        token: &AccessToken,
    ) -> Result<SetpointOutcome> {
        let mode = self.set_mode_to_heat_cool(token).await?;
        let heat_celsius = read_setpoint_celsius(&self.config.setpoint_path)?;
        let setpoint = self
            .send(
                token,
                DeviceCommand::SetRange {
                    heat_celsius,
                    cool_celsius: self.config.cool_placeholder_celsius,
                },
            )
            .await?;
        Ok(SetpointOutcome { mode, setpoint })
    }

    pub async fn run(&self, command: FinalCommand, token: &AccessToken) -> Result<SetpointOutcome> {
        match command {
            FinalCommand::Heat => self.set_target_heat_temperature(token).await,
            FinalCommand::Cool => self.set_target_cool_temperature(token).await,
            FinalCommand::HeatCool => self.set_target_heat_and_cool_temperature(token).await,
        }
    }
}

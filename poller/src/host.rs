use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use tokio::sync::watch;
use tracing::{info, warn};

use nest_common::{table::ensure_table, NestConfig, SetpointOutcome, READING_COLUMNS};

use crate::{
    client::SdmClient,
    commander::Commander,
    poll::{poll_for, unless_stopped},
    reader::read_and_log,
    token::{OAuthTokenProvider, TokenProvider},
};

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Arc::new(load_config().await?);

    if ensure_table(&config.readings_path, READING_COLUMNS)
        .with_context(|| format!("failed to prepare {}", config.readings_path.display()))?
    {
        info!("created readings table {}", config.readings_path.display());
    }

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .context("failed to build http client")?;
    let api = SdmClient::new(http.clone(), config.clone());
    let tokens = OAuthTokenProvider::new(http, config.clone(), std::env::var("NEST_AUTH_CODE").ok());

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => warn!("failed to listen for ctrl-c: {err}"),
        }
    });

    let Some(token) = unless_stopped(&mut shutdown_rx, tokens.access_token()).await else {
        info!("shutdown requested before polling started");
        return Ok(());
    };
    let token = token.context("failed to acquire access token for polling")?;

    info!(
        "polling {} every {}s for {}s",
        config.thermostat, config.poll_interval_secs, config.poll_duration_secs
    );
    let report = poll_for(
        config.poll_duration(),
        config.poll_interval(),
        &mut shutdown_rx,
        || read_and_log(&api, &config, &token),
    )
    .await;
    info!(
        "polling finished: {} reads, {} failed",
        report.attempts, report.failures
    );

    if report.cancelled {
        info!("polling cancelled; skipping {:?} command", config.final_command);
        return Ok(());
    }

    let command = async {
        let token = tokens
            .access_token()
            .await
            .context("failed to acquire access token for command")?;
        let outcome = Commander::new(&api, &config)
            .run(config.final_command, &token)
            .await
            .with_context(|| format!("{:?} command failed", config.final_command))?;
        anyhow::Ok(outcome)
    };
    match unless_stopped(&mut shutdown_rx, command).await {
        Some(outcome) => report_outcome(&outcome?),
        None => info!("shutdown requested; abandoning {:?} command", config.final_command),
    }

    Ok(())
}

async fn load_config() -> anyhow::Result<NestConfig> {
    let path = std::env::var("NEST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./nest.json"));

    let raw = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut config = NestConfig::from_json(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    if let Ok(secret) = std::env::var("NEST_CLIENT_SECRET") {
        config.client_secret = secret;
    }
    if let Ok(refresh_token) = std::env::var("NEST_REFRESH_TOKEN") {
        config.refresh_token = Some(refresh_token);
    }
    config.sanitize();
    config.validate()?;

    Ok(config)
}

fn report_outcome(outcome: &SetpointOutcome) {
    for (step, result) in [("mode", &outcome.mode), ("setpoint", &outcome.setpoint)] {
        if result.is_success() {
            info!("{step} command accepted ({}): {}", result.status, result.body);
        } else {
            warn!("{step} command rejected ({}): {}", result.status, result.body);
        }
    }
}

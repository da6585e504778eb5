use std::{fmt, sync::Arc};

use reqwest::Url;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::info;

use nest_common::{Error, NestConfig, Result};

use crate::client::transport;

const SDM_SCOPE: &str = "https://www.googleapis.com/auth/sdm.service";

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

pub trait TokenProvider {
    async fn access_token(&self) -> Result<AccessToken>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

pub struct OAuthTokenProvider {
    http: reqwest::Client,
    config: Arc<NestConfig>,
    auth_code: Option<String>,
    refresh_token: Mutex<Option<String>>,
}

impl OAuthTokenProvider {
    pub fn new(http: reqwest::Client, config: Arc<NestConfig>, auth_code: Option<String>) -> Self {
        let refresh_token = config.refresh_token.clone();
        Self {
            http,
            config,
            auth_code,
            refresh_token: Mutex::new(refresh_token),
        }
    }

    pub fn authorization_url(&self) -> Result<Url> {
        let base = format!(
            "{}/{}/auth",
            self.config.authorize_url, self.config.project_id
        );
        let mut params = vec![
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("client_id", self.config.client_id.as_str()),
            ("response_type", "code"),
            ("scope", SDM_SCOPE),
        ];
        if !self.config.email.is_empty() {
            params.push(("login_hint", self.config.email.as_str()));
        }

        Url::parse_with_params(&base, &params)
            .map_err(|err| Error::Config(format!("bad authorization url {base}: {err}")))
    }

    async fn request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(Error::Auth(format!(
                "token endpoint returned {}: {body}",
                status.as_u16()
            )));
        }

        serde_json::from_str(&body)
            .map_err(|err| Error::Auth(format!("unreadable token response: {err}")))
    }
}

impl TokenProvider for OAuthTokenProvider {
    async fn access_token(&self) -> Result<AccessToken> {
        let mut refresh_token = self.refresh_token.lock().await;
        let current = refresh_token.clone();

        let response = if let Some(token) = current.as_deref() {
            self.request(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", token),
                ("grant_type", "refresh_token"),
            ])
            .await?
        } else if let Some(code) = self.auth_code.as_deref() {
            let response = self
                .request(&[
                    ("client_id", self.config.client_id.as_str()),
                    ("client_secret", self.config.client_secret.as_str()),
                    ("code", code),
                    ("grant_type", "authorization_code"),
                    ("redirect_uri", self.config.redirect_uri.as_str()),
                ])
                .await?;
            if let Some(token) = &response.refresh_token {
                info!("authorization code exchanged; store the refresh token as NEST_REFRESH_TOKEN");
                *refresh_token = Some(token.clone());
            }
            response
        } else {
            return Err(Error::Auth(format!(
                "no refresh token configured; grant access at {} and set NEST_AUTH_CODE",
                self.authorization_url()?
            )));
        };

        response
            .access_token
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| Error::Auth("token response carried no access_token".to_string()))
    }
}

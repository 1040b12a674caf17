use std::fmt;
use std::sync::Mutex as StdMutex;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::{Value, from_str};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::reddit::RedditError;
use crate::reddit::ratelimit::RateLimit;

const TOKEN_ENDPOINT: &str = "https://www.reddit.com/api/v1/access_token";
const REVOKE_ENDPOINT: &str = "https://www.reddit.com/api/v1/revoke_token";
const API_BASE: &str = "https://oauth.reddit.com";
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// One authenticated connection to the API, built once per run and closed
/// when the run ends.
#[derive(Debug)]
pub struct RedditSession {
    http: reqwest::Client,
    credentials: Credentials,
    token: Mutex<Option<AccessToken>>,
    rate_limit: StdMutex<RateLimit>,
}

impl RedditSession {
    pub async fn connect(
        http: reqwest::Client,
        credentials: Credentials,
    ) -> Result<Self, RedditError> {
        let session = Self {
            http,
            credentials,
            token: Mutex::new(None),
            rate_limit: StdMutex::new(RateLimit::default()),
        };
        session.bearer().await?;
        info!(username = %session.credentials.username, "reddit session established");
        Ok(session)
    }

    /// GETs an API path. `Ok(None)` means the resource does not exist.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<Value>, RedditError> {
        self.pace().await;
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!("{API_BASE}{path}"))
            .query(&[("raw_json", "1")])
            .query(params)
            .bearer_auth(token)
            .header(USER_AGENT, self.credentials.user_agent.as_str())
            .send()
            .await?;
        if let Ok(mut rate_limit) = self.rate_limit.lock() {
            rate_limit.update(response.headers(), Instant::now());
        }
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RedditError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(Some(response.json().await?))
    }

    pub async fn close(self) -> Result<(), RedditError> {
        let Some(token) = self.token.lock().await.take() else {
            return Ok(());
        };
        let response = self
            .http
            .post(REVOKE_ENDPOINT)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(USER_AGENT, self.credentials.user_agent.as_str())
            .form(&[
                ("token", token.value.as_str()),
                ("token_type_hint", "access_token"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "token revocation rejected");
        }
        info!("reddit session closed");
        Ok(())
    }

    async fn pace(&self) {
        let delay = self
            .rate_limit
            .lock()
            .ok()
            .and_then(|rate_limit| rate_limit.delay(Instant::now()));
        if let Some(delay) = delay {
            info!(wait_secs = delay.as_secs_f64(), "rate limit exhausted, waiting for reset");
            tokio::time::sleep(delay).await;
        }
    }

    async fn bearer(&self) -> Result<String, RedditError> {
        let mut token = self.token.lock().await;
        let now = Utc::now();
        if let Some(current) = token.as_ref().filter(|current| current.is_fresh(now)) {
            return Ok(current.value.clone());
        }
        debug!("requesting access token");
        let fresh = self.request_token().await?;
        let value = fresh.value.clone();
        *token = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken, RedditError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(USER_AGENT, self.credentials.user_agent.as_str())
            .form(&[
                ("grant_type", "password"),
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RedditError::Auth(format!(
                "token request failed: status {status}, body {body}"
            )));
        }
        parse_token(&body, Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
}

fn parse_token(body: &str, now: DateTime<Utc>) -> Result<AccessToken, RedditError> {
    let payload: TokenResponse = from_str(body)
        .map_err(|_| RedditError::InvalidResponse(format!("invalid token payload: {body}")))?;
    if let Some(error) = payload.error {
        return Err(RedditError::Auth(error));
    }
    let value = payload
        .access_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| RedditError::Auth("missing token".to_string()))?;
    let expires_in = payload.expires_in.unwrap_or(3600);
    Ok(AccessToken {
        value,
        expires_at: now + Duration::seconds(expires_in),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parse_token_reads_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let token = parse_token(
            r#"{"access_token": "abc", "token_type": "bearer", "expires_in": 86400, "scope": "*"}"#,
            now,
        )
        .unwrap();
        assert_eq!(token.value, "abc");
        assert_eq!(token.expires_at, now + Duration::days(1));
    }

    #[test]
    fn parse_token_surfaces_grant_error() {
        let now = Utc::now();
        let err = parse_token(r#"{"error": "invalid_grant"}"#, now).unwrap_err();
        assert!(matches!(err, RedditError::Auth(message) if message == "invalid_grant"));
    }

    #[test]
    fn parse_token_rejects_garbage() {
        assert!(matches!(
            parse_token("<html>", Utc::now()),
            Err(RedditError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_token(r#"{"access_token": " "}"#, Utc::now()),
            Err(RedditError::Auth(_))
        ));
    }

    #[test]
    fn token_refreshes_near_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let token = AccessToken {
            value: "abc".to_string(),
            expires_at: now + Duration::seconds(90),
        };
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + Duration::seconds(31)));
    }

    #[test]
    fn credentials_debug_hides_secrets() {
        let credentials = Credentials {
            client_id: "id".to_string(),
            client_secret: "secret-value".to_string(),
            username: "analyst".to_string(),
            password: "hunter2".to_string(),
            user_agent: "harvest/0.1".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("secret-value"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("analyst"));
    }
}

use harvest_infra::output::ErrorLog;
use harvest_infra::reddit::{RedditError, RedditSession};
use reqwest::Client;
use thiserror::Error;

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("reddit session error: {0}")]
    Session(#[from] RedditError),
}

pub async fn build_state(config: AppConfig) -> Result<AppState, WiringError> {
    let client = Client::builder().timeout(config.request_timeout).build()?;
    let session = RedditSession::connect(client, config.credentials.clone()).await?;
    let error_log = ErrorLog::new(config.error_log.clone());
    Ok(AppState {
        config,
        session,
        error_log,
    })
}

use std::path::PathBuf;
use std::time::Duration;

use harvest_core::domain::TraversalMode;
use harvest_core::error::CoreError;
use harvest_core::types::{Ranking, Subreddit, TimeFilter};
use harvest_infra::reddit::Credentials;
use thiserror::Error;

use crate::cli::{Cli, Mode};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub subreddit: Subreddit,
    pub output_dir: PathBuf,
    pub error_log: PathBuf,
    pub limit: usize,
    pub skip: usize,
    pub time_filter: TimeFilter,
    pub keywords: Vec<String>,
    pub rankings: Vec<Ranking>,
    pub request_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required variable {0}")]
    Missing(&'static str),
    #[error("invalid integer for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, CoreError),
    #[error("dotenv error: {0}")]
    Dotenv(String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };
        let credentials = Credentials {
            client_id: env.required("HARVEST_CLIENT_ID")?,
            client_secret: env.required("HARVEST_CLIENT_SECRET")?,
            username: env.required("HARVEST_USERNAME")?,
            password: env.required("HARVEST_PASSWORD")?,
            user_agent: env.string("HARVEST_USER_AGENT", "harvest/0.1"),
        };
        let subreddit = Subreddit::try_from(env.string("HARVEST_SUBREDDIT", "uberdrivers").as_str())
            .map_err(|err| ConfigError::InvalidValue("HARVEST_SUBREDDIT", err))?;
        let time_filter = env
            .string("HARVEST_TIME_FILTER", "all")
            .parse::<TimeFilter>()
            .map_err(|err| ConfigError::InvalidValue("HARVEST_TIME_FILTER", err))?;
        let rankings = Ranking::parse_list(&env.string("HARVEST_RANKINGS", "top"))
            .map_err(|err| ConfigError::InvalidValue("HARVEST_RANKINGS", err))?;
        let request_timeout_secs = env.number("HARVEST_REQUEST_TIMEOUT_SECS", 30)?;

        Ok(Self {
            credentials,
            subreddit,
            output_dir: PathBuf::from(env.string("HARVEST_OUTPUT_DIR", "./data")),
            error_log: PathBuf::from(env.string("HARVEST_ERROR_LOG", "./data_read_errors.log")),
            limit: env.number("HARVEST_LIMIT", 1000)? as usize,
            skip: env.number("HARVEST_SKIP", 0)? as usize,
            time_filter,
            keywords: parse_keywords(&env.string("HARVEST_KEYWORDS", "")),
            rankings,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    /// Command line flags win over the environment.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<(), ConfigError> {
        if let Some(limit) = cli.limit {
            self.limit = limit;
        }
        if let Some(skip) = cli.skip {
            self.skip = skip;
        }
        if let Some(subreddit) = cli.subreddit.as_deref() {
            self.subreddit = Subreddit::try_from(subreddit)
                .map_err(|err| ConfigError::InvalidValue("--subreddit", err))?;
        }
        if let Some(keywords) = cli.keywords.as_deref() {
            self.keywords = parse_keywords(keywords);
        }
        if let Some(rankings) = cli.rankings.as_deref() {
            self.rankings = Ranking::parse_list(rankings)
                .map_err(|err| ConfigError::InvalidValue("--rankings", err))?;
        }
        if let Some(time_filter) = cli.time_filter.as_deref() {
            self.time_filter = time_filter
                .parse::<TimeFilter>()
                .map_err(|err| ConfigError::InvalidValue("--time-filter", err))?;
        }
        if let Some(output_dir) = cli.output_dir.as_ref() {
            self.output_dir = output_dir.clone();
        }
        if let Some(error_log) = cli.error_log.as_ref() {
            self.error_log = error_log.clone();
        }
        Ok(())
    }

    pub fn traversal(&self, mode: Mode) -> TraversalMode {
        match mode {
            Mode::Top => TraversalMode::Top {
                time_filter: self.time_filter,
            },
            Mode::Search => TraversalMode::KeywordSearch {
                keywords: self.keywords.clone(),
                rankings: self.rankings.clone(),
                time_filter: self.time_filter,
            },
        }
    }
}

pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &'static str, default: &'static str) -> String {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(key))
    }

    fn number(&self, key: &'static str, default: u64) -> Result<u64, ConfigError> {
        let raw = self.string(key, "");
        if raw.is_empty() {
            return Ok(default);
        }
        raw.parse()
            .map_err(|_| ConfigError::InvalidNumber(key, raw))
    }
}

fn parse_keywords(input: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for keyword in input.split(',').map(str::trim).filter(|value| !value.is_empty()) {
        if !keywords.iter().any(|existing| existing == keyword) {
            keywords.push(keyword.to_string());
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const CREDENTIALS: [(&str, &str); 4] = [
        ("HARVEST_CLIENT_ID", "client"),
        ("HARVEST_CLIENT_SECRET", "secret"),
        ("HARVEST_USERNAME", "analyst"),
        ("HARVEST_PASSWORD", "pw"),
    ];

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&CREDENTIALS)).unwrap();
        assert_eq!(config.subreddit.as_str(), "uberdrivers");
        assert_eq!(config.limit, 1000);
        assert_eq!(config.skip, 0);
        assert_eq!(config.time_filter, TimeFilter::All);
        assert_eq!(config.rankings, vec![Ranking::Top]);
        assert!(config.keywords.is_empty());
        assert_eq!(config.output_dir, PathBuf::from("./data"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.credentials.user_agent, "harvest/0.1");
    }

    #[test]
    fn missing_credentials_are_reported() {
        let err = AppConfig::from_lookup(lookup(&CREDENTIALS[..3])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("HARVEST_PASSWORD")));
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("HARVEST_LIMIT", "ten"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber("HARVEST_LIMIT", _)));
    }

    #[test]
    fn keywords_and_rankings_parse() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("HARVEST_KEYWORDS", "strike, tips ,strike,"));
        pairs.push(("HARVEST_RANKINGS", "top,new"));
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.keywords, vec!["strike", "tips"]);
        assert_eq!(config.rankings, vec![Ranking::Top, Ranking::New]);
    }

    #[test]
    fn cli_overrides_environment() {
        let mut config = AppConfig::from_lookup(lookup(&CREDENTIALS)).unwrap();
        let cli = Cli {
            mode: Mode::Search,
            limit: Some(10),
            skip: Some(2),
            subreddit: Some("r/lyftdrivers".to_string()),
            keywords: Some("strike".to_string()),
            rankings: Some("new,top".to_string()),
            time_filter: Some("year".to_string()),
            ..Cli::default()
        };
        config.apply_cli(&cli).unwrap();
        assert_eq!(config.limit, 10);
        assert_eq!(config.skip, 2);
        assert_eq!(config.subreddit.as_str(), "lyftdrivers");
        assert_eq!(
            config.traversal(cli.mode),
            TraversalMode::KeywordSearch {
                keywords: vec!["strike".to_string()],
                rankings: vec![Ranking::New, Ranking::Top],
                time_filter: TimeFilter::Year,
            }
        );
    }

    #[test]
    fn cli_rejects_bad_ranking() {
        let mut config = AppConfig::from_lookup(lookup(&CREDENTIALS)).unwrap();
        let cli = Cli {
            rankings: Some("best".to_string()),
            ..Cli::default()
        };
        assert!(matches!(
            config.apply_cli(&cli),
            Err(ConfigError::InvalidValue("--rankings", _))
        ));
    }
}

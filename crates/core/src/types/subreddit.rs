use std::fmt;

use crate::error::CoreError;

const MAX_LEN: usize = 21;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subreddit(String);

impl Subreddit {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Subreddit {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim().trim_start_matches('/');
        let trimmed = trimmed.strip_prefix("r/").unwrap_or(trimmed).trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(CoreError::InvalidSubreddit("empty subreddit".to_string()));
        }
        if trimmed.len() > MAX_LEN
            || !trimmed
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            return Err(CoreError::InvalidSubreddit(trimmed.to_string()));
        }
        Ok(Subreddit(trimmed.to_string()))
    }
}

impl fmt::Display for Subreddit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

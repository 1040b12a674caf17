use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid ranking: {0}")]
    InvalidRanking(String),
    #[error("invalid time filter: {0}")]
    InvalidTimeFilter(String),
    #[error("invalid subreddit: {0}")]
    InvalidSubreddit(String),
}

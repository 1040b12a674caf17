pub mod client;
pub mod listing;
pub mod ratelimit;
pub mod session;
pub mod source;

use thiserror::Error;

pub use client::SubredditSource;
pub use listing::{Listing, PAGE_SIZE};
pub use session::{Credentials, RedditSession};
pub use source::{ListingQuery, Page, ThreadSource};

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("auth error: {0}")]
    Auth(String),
    #[error("request failed: status {status}, body {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("missing data: {0}")]
    MissingData(&'static str),
}

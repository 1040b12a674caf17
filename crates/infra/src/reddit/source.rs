use async_trait::async_trait;
use harvest_core::domain::RawRecord;
use harvest_core::types::{Ranking, TimeFilter};

use crate::reddit::RedditError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingQuery {
    Top {
        time_filter: TimeFilter,
    },
    Search {
        keyword: String,
        ranking: Ranking,
        time_filter: TimeFilter,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<RawRecord>,
    pub after: Option<String>,
}

/// Read access to one collection of threads: ranked listings, comment trees
/// and author lookups. Every call completes before the caller moves on.
#[async_trait]
pub trait ThreadSource: Send + Sync {
    async fn listing_page(
        &self,
        query: &ListingQuery,
        after: Option<&str>,
        page_size: usize,
    ) -> Result<Page, RedditError>;

    /// All comments of a thread, parents before their replies.
    async fn comments(&self, thread_id: &str) -> Result<Vec<RawRecord>, RedditError>;

    /// `Ok(None)` when the account no longer exists.
    async fn author(&self, name: &str) -> Result<Option<RawRecord>, RedditError>;
}

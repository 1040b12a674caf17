use std::collections::VecDeque;

use harvest_core::domain::RawRecord;
use tracing::debug;

use crate::reddit::RedditError;
use crate::reddit::source::{ListingQuery, ThreadSource};

pub const PAGE_SIZE: usize = 100;

/// Walks a paginated listing page by page, yielding at most `limit` records.
pub struct Listing<'a, S: ThreadSource + ?Sized> {
    source: &'a S,
    query: ListingQuery,
    limit: usize,
    yielded: usize,
    buffer: VecDeque<RawRecord>,
    after: Option<String>,
    exhausted: bool,
}

impl<'a, S: ThreadSource + ?Sized> Listing<'a, S> {
    pub fn new(source: &'a S, query: ListingQuery, limit: usize) -> Self {
        Self {
            source,
            query,
            limit,
            yielded: 0,
            buffer: VecDeque::new(),
            after: None,
            exhausted: false,
        }
    }

    pub fn yielded(&self) -> usize {
        self.yielded
    }

    pub async fn next_record(&mut self) -> Option<Result<RawRecord, RedditError>> {
        if self.yielded >= self.limit {
            return None;
        }
        if self.buffer.is_empty() {
            if self.exhausted {
                return None;
            }
            if let Err(err) = self.fetch_page().await {
                self.exhausted = true;
                return Some(Err(err));
            }
        }
        let record = self.buffer.pop_front()?;
        self.yielded += 1;
        Some(Ok(record))
    }

    async fn fetch_page(&mut self) -> Result<(), RedditError> {
        let page_size = PAGE_SIZE.min(self.limit - self.yielded);
        let page = self
            .source
            .listing_page(&self.query, self.after.as_deref(), page_size)
            .await?;
        debug!(
            records = page.records.len(),
            after = ?page.after,
            "listing page fetched"
        );
        if page.records.is_empty() || page.after.is_none() || page.after == self.after {
            self.exhausted = true;
        }
        self.after = page.after;
        self.buffer.extend(page.records);
        Ok(())
    }
}

use std::path::Path;

use harvest_core::domain::{
    EntityKind, ProjectionError, RawRecord, TraversalMode, project,
};
use harvest_infra::output::{ErrorLog, OutputSinks, SinkError};
use harvest_infra::reddit::{Listing, ListingQuery, RedditError, ThreadSource};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::jobs::JobError;
use crate::jobs::tasks::search::search_by_keywords;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureScope {
    /// Only the current comment is lost.
    Record,
    /// The rest of the current thread is abandoned.
    Thread,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    Projection(#[from] ProjectionError),
    #[error("{0}")]
    Source(#[from] RedditError),
    #[error("{0}")]
    Sink(#[from] SinkError),
}

impl ExtractError {
    pub fn scope(&self) -> FailureScope {
        match self {
            ExtractError::Projection(_) => FailureScope::Record,
            ExtractError::Source(_) | ExtractError::Sink(_) => FailureScope::Thread,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub limit: usize,
    pub skip: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractStats {
    pub threads_visited: usize,
    pub threads_skipped: usize,
    pub threads_written: usize,
    pub messages_written: usize,
    pub authors_written: usize,
    pub record_failures: usize,
    pub thread_failures: usize,
}

/// Streams every visited thread, its comments and their authors into the
/// three CSV files under `output_dir`. Listing failures end the run; failures
/// inside a thread are logged to `error_log` and skipped.
pub async fn extract_all<S: ThreadSource + ?Sized>(
    source: &S,
    output_dir: &Path,
    error_log: &ErrorLog,
    options: &ExtractOptions,
    mode: &TraversalMode,
) -> Result<ExtractStats, JobError> {
    let mut extraction = Extraction {
        source,
        sinks: OutputSinks::create(output_dir)?,
        error_log,
        skip: options.skip,
        stats: ExtractStats::default(),
    };

    match mode {
        TraversalMode::Top { time_filter } => {
            let query = ListingQuery::Top {
                time_filter: *time_filter,
            };
            let mut listing = Listing::new(source, query, options.limit);
            while let Some(record) = listing.next_record().await {
                extraction.visit(record?).await;
            }
        }
        TraversalMode::KeywordSearch {
            keywords,
            rankings,
            time_filter,
        } => {
            let results =
                search_by_keywords(source, keywords, options.limit, rankings, *time_filter)
                    .await?;
            for (keyword, ranking, set) in results.into_sets() {
                info!(keyword = %keyword, %ranking, threads = set.len(), "extracting search matches");
                for record in set {
                    extraction.visit(record).await;
                }
            }
        }
    }

    let Extraction { sinks, stats, .. } = extraction;
    sinks.close()?;
    Ok(stats)
}

struct Extraction<'a, S: ThreadSource + ?Sized> {
    source: &'a S,
    sinks: OutputSinks,
    error_log: &'a ErrorLog,
    skip: usize,
    stats: ExtractStats,
}

impl<S: ThreadSource + ?Sized> Extraction<'_, S> {
    async fn visit(&mut self, record: RawRecord) {
        self.stats.threads_visited += 1;
        let ordinal = self.stats.threads_visited;
        if ordinal <= self.skip {
            self.stats.threads_skipped += 1;
            return;
        }
        info!(ordinal, thread_id = %record.label(), "processing thread");
        if let Err(err) = self.process_thread(&record).await {
            self.stats.thread_failures += 1;
            self.log_failure(&format!("thread[{ordinal}]: unexpected error: {err}"));
        }
    }

    async fn process_thread(&mut self, record: &RawRecord) -> Result<(), ExtractError> {
        let mut thread = project(record, EntityKind::Thread)?;
        let author_ref = self.write_author(record).await?;
        thread.set_author_ref(author_ref);
        self.sinks.write(&thread)?;
        self.stats.threads_written += 1;

        let thread_id = record
            .id()
            .ok_or(ProjectionError::FieldUnavailable { field: "id" })?;
        let comments = self.source.comments(thread_id).await?;
        debug!(thread_id, comments = comments.len(), "comment tree fetched");
        for comment in comments {
            match self.process_message(&comment).await {
                Ok(()) => {}
                Err(err) if err.scope() == FailureScope::Record => {
                    self.stats.record_failures += 1;
                    debug!(thread_id, comment_id = %comment.label(), "comment skipped");
                    self.log_failure(&format!("message[{}]: {err}", comment.label()));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    async fn process_message(&mut self, record: &RawRecord) -> Result<(), ExtractError> {
        let mut message = project(record, EntityKind::Message)?;
        let author_ref = self.write_author(record).await?;
        message.set_author_ref(author_ref);
        self.sinks.write(&message)?;
        self.stats.messages_written += 1;
        Ok(())
    }

    /// Writes the author row of `record` and returns the author reference.
    async fn write_author(&mut self, record: &RawRecord) -> Result<Option<String>, ExtractError> {
        let Some(name) = record.author_name() else {
            return Ok(None);
        };
        let Some(account) = self.source.author(name).await? else {
            debug!(author = name, "author no longer resolves");
            return Ok(None);
        };
        let author = project(&account, EntityKind::Author)?;
        self.sinks.write(&author)?;
        self.stats.authors_written += 1;
        Ok(author.id().map(str::to_string))
    }

    fn log_failure(&self, message: &str) {
        if let Err(err) = self.error_log.append(message) {
            warn!(error = %err, path = %self.error_log.path().display(), "failed to append to error log");
        }
    }
}

pub mod tasks;

use std::time::Instant;

use harvest_infra::output::SinkError;
use harvest_infra::reddit::{RedditError, SubredditSource};
use thiserror::Error;
use tracing::info;

use crate::cli::Mode;
use crate::jobs::tasks::extract::{ExtractOptions, extract_all};
use crate::jobs::tasks::search::search_by_keywords;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("reddit error: {0}")]
    Reddit(#[from] RedditError),
    #[error("output error: {0}")]
    Sink(#[from] SinkError),
    #[error("invalid run: {0}")]
    InvalidRun(String),
}

pub async fn run(state: &AppState, mode: Mode, discover_only: bool) -> Result<(), JobError> {
    let config = &state.config;
    let source = SubredditSource::new(&state.session, config.subreddit.clone());
    let traversal = config.traversal(mode);
    if mode == Mode::Search && config.keywords.is_empty() {
        return Err(JobError::InvalidRun(
            "keyword search needs at least one keyword".to_string(),
        ));
    }
    let started = Instant::now();

    if discover_only {
        let results = search_by_keywords(
            &source,
            &config.keywords,
            config.limit,
            &config.rankings,
            config.time_filter,
        )
        .await?;
        for (keyword, ranking, set) in results.iter() {
            info!(keyword, %ranking, matched = set.len(), "search results");
        }
        info!(
            distinct = results.distinct_ids().len(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "discovery finished"
        );
        return Ok(());
    }

    info!(
        subreddit = %config.subreddit,
        mode = traversal.label(),
        limit = config.limit,
        skip = config.skip,
        output_dir = %config.output_dir.display(),
        "extraction starting"
    );
    let options = ExtractOptions {
        limit: config.limit,
        skip: config.skip,
    };
    let stats = extract_all(
        &source,
        &config.output_dir,
        &state.error_log,
        &options,
        &traversal,
    )
    .await?;
    info!(
        ?stats,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "extraction finished"
    );
    Ok(())
}

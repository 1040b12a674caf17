use crate::types::{Ranking, TimeFilter};

/// Which top-level records a run visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalMode {
    Top {
        time_filter: TimeFilter,
    },
    KeywordSearch {
        keywords: Vec<String>,
        rankings: Vec<Ranking>,
        time_filter: TimeFilter,
    },
}

impl TraversalMode {
    pub fn label(&self) -> &'static str {
        match self {
            TraversalMode::Top { .. } => "top",
            TraversalMode::KeywordSearch { .. } => "keyword-search",
        }
    }

    pub fn time_filter(&self) -> TimeFilter {
        match self {
            TraversalMode::Top { time_filter } => *time_filter,
            TraversalMode::KeywordSearch { time_filter, .. } => *time_filter,
        }
    }
}

use std::collections::HashSet;

use harvest_core::domain::RecordSet;
use harvest_core::types::{Ranking, TimeFilter};
use harvest_infra::reddit::{Listing, ListingQuery, RedditError, ThreadSource};
use tracing::info;

#[derive(Debug)]
pub struct KeywordMatches {
    pub keyword: String,
    pub rankings: Vec<(Ranking, RecordSet)>,
}

/// keyword -> ranking -> matched threads, in the order keywords and rankings
/// were requested.
#[derive(Debug, Default)]
pub struct SearchResults {
    entries: Vec<KeywordMatches>,
}

impl SearchResults {
    pub fn get(&self, keyword: &str, ranking: Ranking) -> Option<&RecordSet> {
        self.entries
            .iter()
            .find(|entry| entry.keyword == keyword)?
            .rankings
            .iter()
            .find(|(candidate, _)| *candidate == ranking)
            .map(|(_, set)| set)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.keyword.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Ranking, &RecordSet)> {
        self.entries.iter().flat_map(|entry| {
            entry
                .rankings
                .iter()
                .map(move |(ranking, set)| (entry.keyword.as_str(), *ranking, set))
        })
    }

    pub fn distinct_ids(&self) -> HashSet<&str> {
        self.iter().flat_map(|(_, _, set)| set.ids()).collect()
    }

    pub fn into_sets(self) -> impl Iterator<Item = (String, Ranking, RecordSet)> {
        self.entries.into_iter().flat_map(|entry| {
            let keyword = entry.keyword;
            entry
                .rankings
                .into_iter()
                .map(move |(ranking, set)| (keyword.clone(), ranking, set))
        })
    }
}

pub async fn search_by_keywords<S: ThreadSource + ?Sized>(
    source: &S,
    keywords: &[String],
    limit: usize,
    rankings: &[Ranking],
    time_filter: TimeFilter,
) -> Result<SearchResults, RedditError> {
    let mut results = SearchResults::default();
    for keyword in keywords {
        if results.keywords().any(|existing| existing == keyword) {
            continue;
        }
        let mut matches = KeywordMatches {
            keyword: keyword.clone(),
            rankings: Vec::with_capacity(rankings.len()),
        };
        for &ranking in rankings {
            if matches.rankings.iter().any(|(existing, _)| *existing == ranking) {
                continue;
            }
            let query = ListingQuery::Search {
                keyword: keyword.clone(),
                ranking,
                time_filter,
            };
            let mut listing = Listing::new(source, query, limit);
            let mut set = RecordSet::new();
            while let Some(record) = listing.next_record().await {
                set.insert(record?);
            }
            info!(keyword = %keyword, %ranking, matched = set.len(), "keyword search complete");
            matches.rankings.push((ranking, set));
        }
        results.entries.push(matches);
    }
    Ok(results)
}

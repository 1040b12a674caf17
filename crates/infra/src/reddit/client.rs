use async_trait::async_trait;
use harvest_core::domain::{RawRecord, RecordKind};
use harvest_core::types::Subreddit;
use serde_json::{Value, json};

use crate::reddit::RedditError;
use crate::reddit::session::RedditSession;
use crate::reddit::source::{ListingQuery, Page, ThreadSource};

const COMMENT_LIMIT: usize = 500;

/// The threads of one subreddit, read through a shared session.
#[derive(Debug, Clone)]
pub struct SubredditSource<'a> {
    session: &'a RedditSession,
    subreddit: Subreddit,
}

impl<'a> SubredditSource<'a> {
    pub fn new(session: &'a RedditSession, subreddit: Subreddit) -> Self {
        Self { session, subreddit }
    }

    pub fn subreddit(&self) -> &Subreddit {
        &self.subreddit
    }
}

#[async_trait]
impl ThreadSource for SubredditSource<'_> {
    async fn listing_page(
        &self,
        query: &ListingQuery,
        after: Option<&str>,
        page_size: usize,
    ) -> Result<Page, RedditError> {
        let (path, params) = listing_request(&self.subreddit, query, after, page_size);
        let value = self
            .session
            .get_json(&path, &params)
            .await?
            .ok_or(RedditError::MissingData("listing"))?;
        parse_listing(value)
    }

    async fn comments(&self, thread_id: &str) -> Result<Vec<RawRecord>, RedditError> {
        let path = format!("/comments/{thread_id}");
        let params = [("limit", COMMENT_LIMIT.to_string())];
        let value = self
            .session
            .get_json(&path, &params)
            .await?
            .ok_or(RedditError::MissingData("comment tree"))?;
        flatten_comments(value)
    }

    async fn author(&self, name: &str) -> Result<Option<RawRecord>, RedditError> {
        let path = format!("/user/{name}/about");
        let Some(value) = self.session.get_json(&path, &[]).await? else {
            return Ok(None);
        };
        let record = RawRecord::from_thing(value)
            .ok_or_else(|| RedditError::InvalidResponse(format!("account {name}")))?;
        Ok(Some(with_fullname(record)))
    }
}

fn listing_request(
    subreddit: &Subreddit,
    query: &ListingQuery,
    after: Option<&str>,
    page_size: usize,
) -> (String, Vec<(&'static str, String)>) {
    let (path, mut params) = match query {
        ListingQuery::Top { time_filter } => (
            format!("/r/{subreddit}/top"),
            vec![("t", time_filter.as_str().to_string())],
        ),
        ListingQuery::Search {
            keyword,
            ranking,
            time_filter,
        } => (
            format!("/r/{subreddit}/search"),
            vec![
                ("q", keyword.clone()),
                ("restrict_sr", "1".to_string()),
                ("type", "link".to_string()),
                ("sort", ranking.as_str().to_string()),
                ("t", time_filter.as_str().to_string()),
            ],
        ),
    };
    params.push(("limit", page_size.to_string()));
    if let Some(after) = after {
        params.push(("after", after.to_string()));
    }
    (path, params)
}

pub fn parse_listing(value: Value) -> Result<Page, RedditError> {
    let Value::Object(mut envelope) = value else {
        return Err(RedditError::InvalidResponse("listing is not an object".to_string()));
    };
    let Some(Value::Object(mut data)) = envelope.remove("data") else {
        return Err(RedditError::MissingData("listing data"));
    };
    let after = data
        .get("after")
        .and_then(Value::as_str)
        .filter(|cursor| !cursor.is_empty())
        .map(str::to_string);
    let children = match data.remove("children") {
        Some(Value::Array(children)) => children,
        _ => return Err(RedditError::MissingData("listing children")),
    };
    let records = children.into_iter().filter_map(RawRecord::from_thing).collect();
    Ok(Page { records, after })
}

/// Flattens the comment tree of a `/comments/{id}` response depth first.
pub fn flatten_comments(value: Value) -> Result<Vec<RawRecord>, RedditError> {
    let Value::Array(mut listings) = value else {
        return Err(RedditError::InvalidResponse(
            "comment response is not an array".to_string(),
        ));
    };
    if listings.len() < 2 {
        return Err(RedditError::MissingData("comment listing"));
    }
    let comments = listings.swap_remove(1);
    let mut records = Vec::new();
    flatten_into(listing_children(comments), &mut records);
    Ok(records)
}

fn flatten_into(children: Vec<Value>, out: &mut Vec<RawRecord>) {
    for child in children {
        let Some(mut record) = RawRecord::from_thing(child) else {
            continue;
        };
        let replies = record.take_attr("replies");
        out.push(record);
        if let Some(replies) = replies {
            flatten_into(listing_children(replies), out);
        }
    }
}

fn listing_children(listing: Value) -> Vec<Value> {
    match listing {
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Object(mut data)) => match data.remove("children") {
                Some(Value::Array(children)) => children,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn with_fullname(mut record: RawRecord) -> RawRecord {
    if record.kind() != RecordKind::Account || record.attr("fullname").is_some() {
        return record;
    }
    if let Some(id) = record.id().map(str::to_string) {
        record.insert("fullname", json!(format!("t2_{id}")));
    }
    record
}

#[cfg(test)]
mod tests {
    use harvest_core::types::{Ranking, TimeFilter};

    use super::*;

    fn comment(id: &str, replies: Value) -> Value {
        json!({
            "kind": "t1",
            "data": {
                "id": id,
                "link_id": "t3_abc",
                "parent_id": "t3_abc",
                "replies": replies
            }
        })
    }

    fn listing(children: Vec<Value>) -> Value {
        json!({"kind": "Listing", "data": {"after": null, "children": children}})
    }

    #[test]
    fn parse_listing_reads_children_and_cursor() {
        let page = parse_listing(json!({
            "kind": "Listing",
            "data": {
                "after": "t3_b",
                "children": [
                    {"kind": "t3", "data": {"id": "a"}},
                    {"kind": "t3", "data": {"id": "b"}}
                ]
            }
        }))
        .unwrap();
        assert_eq!(page.after.as_deref(), Some("t3_b"));
        let ids: Vec<_> = page.records.iter().filter_map(RawRecord::id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn parse_listing_treats_empty_cursor_as_end() {
        let page = parse_listing(json!({"data": {"after": "", "children": []}})).unwrap();
        assert!(page.after.is_none());
        assert!(page.records.is_empty());
    }

    #[test]
    fn parse_listing_rejects_missing_children() {
        assert!(parse_listing(json!({"data": {"after": null}})).is_err());
        assert!(parse_listing(json!([])).is_err());
    }

    #[test]
    fn flatten_comments_is_depth_first() {
        let tree = json!([
            listing(vec![json!({"kind": "t3", "data": {"id": "abc"}})]),
            listing(vec![
                comment(
                    "c1",
                    listing(vec![comment("c1a", json!("")), comment("c1b", json!(""))])
                ),
                comment("c2", json!("")),
                json!({"kind": "more", "data": {"id": "c3", "parent_id": "t3_abc", "children": ["c3", "c4"]}})
            ])
        ]);
        let records = flatten_comments(tree).unwrap();
        let ids: Vec<_> = records.iter().filter_map(RawRecord::id).collect();
        assert_eq!(ids, vec!["c1", "c1a", "c1b", "c2", "c3"]);
        assert_eq!(records[4].kind(), RecordKind::More);
        assert!(records.iter().all(|record| record.attr("replies").is_none()));
    }

    #[test]
    fn flatten_comments_requires_two_listings() {
        assert!(flatten_comments(json!([listing(vec![])])).is_err());
        assert!(flatten_comments(json!({})).is_err());
    }

    #[test]
    fn with_fullname_derives_account_fullname() {
        let record =
            RawRecord::from_thing(json!({"kind": "t2", "data": {"id": "8k2jd", "name": "driver"}}))
                .unwrap();
        let record = with_fullname(record);
        assert_eq!(record.attr("fullname"), Some(&json!("t2_8k2jd")));
    }

    #[test]
    fn with_fullname_skips_suspended_accounts() {
        let record = RawRecord::from_thing(
            json!({"kind": "t2", "data": {"name": "gone", "is_suspended": true}}),
        )
        .unwrap();
        assert!(with_fullname(record).attr("fullname").is_none());
    }

    #[test]
    fn search_request_is_restricted_to_subreddit() {
        let subreddit = Subreddit::try_from("uberdrivers").unwrap();
        let query = ListingQuery::Search {
            keyword: "strike".to_string(),
            ranking: Ranking::New,
            time_filter: TimeFilter::Year,
        };
        let (path, params) = listing_request(&subreddit, &query, Some("t3_x"), 25);
        assert_eq!(path, "/r/uberdrivers/search");
        assert!(params.contains(&("q", "strike".to_string())));
        assert!(params.contains(&("restrict_sr", "1".to_string())));
        assert!(params.contains(&("sort", "new".to_string())));
        assert!(params.contains(&("t", "year".to_string())));
        assert!(params.contains(&("limit", "25".to_string())));
        assert!(params.contains(&("after", "t3_x".to_string())));
    }

    #[test]
    fn top_request_uses_time_filter() {
        let subreddit = Subreddit::try_from("uberdrivers").unwrap();
        let query = ListingQuery::Top {
            time_filter: TimeFilter::All,
        };
        let (path, params) = listing_request(&subreddit, &query, None, 100);
        assert_eq!(path, "/r/uberdrivers/top");
        assert_eq!(
            params,
            vec![("t", "all".to_string()), ("limit", "100".to_string())]
        );
    }
}

pub mod ranking;
pub mod subreddit;
pub mod time_filter;

pub use ranking::Ranking;
pub use subreddit::Subreddit;
pub use time_filter::TimeFilter;

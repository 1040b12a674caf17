use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Sort order a listing or search is requested under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ranking {
    Relevance,
    Hot,
    Top,
    New,
    Comments,
}

impl Ranking {
    pub const ALL: [Ranking; 5] = [
        Ranking::Relevance,
        Ranking::Hot,
        Ranking::Top,
        Ranking::New,
        Ranking::Comments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Ranking::Relevance => "relevance",
            Ranking::Hot => "hot",
            Ranking::Top => "top",
            Ranking::New => "new",
            Ranking::Comments => "comments",
        }
    }

    /// Parses a comma separated list, keeping first-seen order and dropping repeats.
    pub fn parse_list(input: &str) -> Result<Vec<Ranking>, CoreError> {
        let mut rankings = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let ranking = part.parse::<Ranking>()?;
            if !rankings.contains(&ranking) {
                rankings.push(ranking);
            }
        }
        if rankings.is_empty() {
            return Err(CoreError::InvalidRanking(input.trim().to_string()));
        }
        Ok(rankings)
    }
}

impl FromStr for Ranking {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Ranking::ALL
            .into_iter()
            .find(|ranking| ranking.as_str() == normalized)
            .ok_or_else(|| CoreError::InvalidRanking(value.trim().to_string()))
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_ranking() {
        assert_eq!("top".parse::<Ranking>().unwrap(), Ranking::Top);
        assert_eq!(" New ".parse::<Ranking>().unwrap(), Ranking::New);
    }

    #[test]
    fn parse_list_dedupes_in_order() {
        let rankings = Ranking::parse_list("new, top,new,,relevance").unwrap();
        assert_eq!(rankings, vec![Ranking::New, Ranking::Top, Ranking::Relevance]);
    }

    #[test]
    fn reject_unknown_ranking() {
        assert!("best".parse::<Ranking>().is_err());
        assert!(Ranking::parse_list("top,best").is_err());
    }

    #[test]
    fn reject_empty_list() {
        assert!(Ranking::parse_list(" , ").is_err());
    }
}

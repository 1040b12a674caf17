use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

impl FromStr for TimeFilter {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(TimeFilter::Hour),
            "day" => Ok(TimeFilter::Day),
            "week" => Ok(TimeFilter::Week),
            "month" => Ok(TimeFilter::Month),
            "year" => Ok(TimeFilter::Year),
            "all" | "" => Ok(TimeFilter::All),
            _ => Err(CoreError::InvalidTimeFilter(value.trim().to_string())),
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_filters() {
        assert_eq!("day".parse::<TimeFilter>().unwrap(), TimeFilter::Day);
        assert_eq!("YEAR".parse::<TimeFilter>().unwrap(), TimeFilter::Year);
    }

    #[test]
    fn blank_means_all() {
        assert_eq!("  ".parse::<TimeFilter>().unwrap(), TimeFilter::All);
        assert_eq!(TimeFilter::default(), TimeFilter::All);
    }

    #[test]
    fn reject_unknown_filter() {
        assert!("decade".parse::<TimeFilter>().is_err());
    }
}

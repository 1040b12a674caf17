use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Request budget reported by the API on the last response.
#[derive(Debug, Default, Clone)]
pub struct RateLimit {
    remaining: Option<f64>,
    reset_at: Option<Instant>,
}

impl RateLimit {
    pub fn update(&mut self, headers: &HeaderMap, now: Instant) {
        let remaining = header_f64(headers, REMAINING_HEADER);
        let reset_secs = header_f64(headers, RESET_HEADER);
        if remaining.is_none() && reset_secs.is_none() {
            return;
        }
        self.remaining = remaining;
        self.reset_at = reset_secs
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| now + Duration::from_secs_f64(secs));
    }

    /// How long to wait before the next request, if the budget is spent.
    pub fn delay(&self, now: Instant) -> Option<Duration> {
        let remaining = self.remaining?;
        if remaining >= 1.0 {
            return None;
        }
        let reset_at = self.reset_at?;
        reset_at.checked_duration_since(now).filter(|wait| !wait.is_zero())
    }
}

fn header_f64(headers: &HeaderMap, name: &str) -> Option<f64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers(remaining: &str, reset: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REMAINING_HEADER, HeaderValue::from_str(remaining).unwrap());
        headers.insert(RESET_HEADER, HeaderValue::from_str(reset).unwrap());
        headers
    }

    #[test]
    fn no_delay_while_budget_remains() {
        let now = Instant::now();
        let mut limit = RateLimit::default();
        limit.update(&headers("598.0", "120"), now);
        assert_eq!(limit.delay(now), None);
    }

    #[test]
    fn waits_for_reset_when_spent() {
        let now = Instant::now();
        let mut limit = RateLimit::default();
        limit.update(&headers("0.0", "42"), now);
        assert_eq!(limit.delay(now), Some(Duration::from_secs(42)));
        assert_eq!(limit.delay(now + Duration::from_secs(50)), None);
    }

    #[test]
    fn ignores_responses_without_headers() {
        let now = Instant::now();
        let mut limit = RateLimit::default();
        limit.update(&headers("0", "10"), now);
        limit.update(&HeaderMap::new(), now);
        assert_eq!(limit.delay(now), Some(Duration::from_secs(10)));
    }

    #[test]
    fn unparseable_headers_mean_no_delay() {
        let now = Instant::now();
        let mut limit = RateLimit::default();
        limit.update(&headers("soon", "later"), now);
        assert_eq!(limit.delay(now), None);
    }
}

use std::fmt;
use std::time::Duration;

/// One configured feed: the URL to poll and how long to wait between polls.
///
/// The set of sources is fixed at startup. Duplicate URLs are allowed and
/// simply result in the same feed being polled twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub url: String,
    pub interval: Duration,
}

impl FeedSource {
    pub fn new(url: impl Into<String>, interval: Duration) -> Self {
        Self {
            url: url.into(),
            interval,
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (every {}s)", self.url, self.interval.as_secs())
    }
}

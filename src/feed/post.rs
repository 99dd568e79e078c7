use chrono::{DateTime, Utc};
use std::fmt;

/// A point on the globe attached to a post
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeoLocation{{latitude={:?}, longitude={:?}}}",
            self.latitude, self.longitude
        )
    }
}

/// One feed item, immutable once fetched
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Provider-native post id
    pub id: u64,

    /// Author handle (screen name)
    pub author: String,

    pub created_at: DateTime<Utc>,

    /// Body text
    pub text: String,

    pub retweet_count: u64,

    pub favorited: bool,

    pub geo: Option<GeoLocation>,

    /// Expanded URLs, in order of appearance
    pub urls: Vec<String>,

    /// Display names of mentioned users
    pub mentions: Vec<String>,

    /// Hashtag texts, without the leading `#`
    pub hashtags: Vec<String>,
}

impl Post {
    /// A post with only the fields the crawl algorithms look at
    pub fn new(id: u64, author: &str, created_at: DateTime<Utc>, text: &str) -> Self {
        Self {
            id,
            author: author.to_string(),
            created_at,
            text: text.to_string(),
            retweet_count: 0,
            favorited: false,
            geo: None,
            urls: Vec::new(),
            mentions: Vec::new(),
            hashtags: Vec::new(),
        }
    }
}

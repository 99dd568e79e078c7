//! Corpus record serialization
//!
//! Downstream consumers read this layout byte for byte, so field order, key
//! names and separators are fixed:
//!
//! ```text
//! {
//! id:<sequence id>,
//! origin:<body text>,
//! id:<post id>,
//! time:<Sun May 01 00:00:00 UTC 2011>,
//! screenname:<author>,
//! retweetcount:<n>,
//! favoritecount:<true|false>,
//! mentionedentities:<name,name>,
//! URL:<url,url>,
//! hashtags:<tag,tag>,
//! geolocation:<GeoLocation{latitude=.., longitude=..}|null>
//! }
//! ```
//!
//! The body text is written raw and may span lines. Everything after it is
//! single-line, which is what lets [`parse_record`] split the tail off.

use crate::feed::Post;
use crate::output::{OutputError, OutputResult};

const TIME_FORMAT: &str = "%a %b %d %H:%M:%S UTC %Y";

/// Number of single-line fields after the body text
const TAIL_FIELDS: usize = 9;

/// Serializes one post as a corpus record
pub fn format_record(post: &Post, sequence_id: u64) -> String {
    let geolocation = post
        .geo
        .map(|g| g.to_string())
        .unwrap_or_else(|| "null".to_string());

    format!(
        "{{\nid:{},\norigin:{},\nid:{},\ntime:{},\nscreenname:{},\nretweetcount:{},\nfavoritecount:{},\nmentionedentities:{},\nURL:{},\nhashtags:{},\ngeolocation:{}\n}}",
        sequence_id,
        post.text,
        post.id,
        post.created_at.format(TIME_FORMAT),
        post.author,
        post.retweet_count,
        post.favorited,
        join_entities(&post.mentions),
        join_entities(&post.urls),
        join_entities(&post.hashtags),
        geolocation,
    )
}

/// Comma-joins entity strings with no trailing separator
pub fn join_entities(items: &[String]) -> String {
    items.join(",")
}

/// Fields recovered from a serialized record
///
/// Entity lists are split on commas, so an entity that itself contains a
/// comma does not survive the round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub sequence_id: u64,
    pub text: String,
    pub post_id: u64,
    pub time: String,
    pub author: String,
    pub retweet_count: u64,
    pub favorited: bool,
    pub mentions: Vec<String>,
    pub urls: Vec<String>,
    pub hashtags: Vec<String>,
    pub geolocation: Option<String>,
}

/// Parses a record produced by [`format_record`]
pub fn parse_record(record: &str) -> OutputResult<ParsedRecord> {
    let body = record
        .trim()
        .strip_prefix("{\n")
        .and_then(|r| r.strip_suffix("\n}"))
        .ok_or_else(|| OutputError::Format("record is not wrapped in braces".to_string()))?;

    let (head, rest) = body
        .split_once('\n')
        .ok_or_else(|| OutputError::Format("record has no body".to_string()))?;
    let sequence_id = parse_number(field(head, "id:", true)?, "id")?;

    // The tail fields are the last nine lines; the body text is everything
    // between the first line and them.
    let lines: Vec<&str> = rest.split('\n').collect();
    if lines.len() < TAIL_FIELDS + 1 {
        return Err(OutputError::Format(format!(
            "record has {} lines after the id, expected at least {}",
            lines.len(),
            TAIL_FIELDS + 1
        )));
    }
    let split = lines.len() - TAIL_FIELDS;
    let origin = lines[..split].join("\n");
    let tail = &lines[split..];

    let text = field(&origin, "origin:", true)?.to_string();
    let post_id = parse_number(field(tail[0], "id:", true)?, "post id")?;
    let time = field(tail[1], "time:", true)?.to_string();
    let author = field(tail[2], "screenname:", true)?.to_string();
    let retweet_count = parse_number(field(tail[3], "retweetcount:", true)?, "retweetcount")?;
    let favorited = match field(tail[4], "favoritecount:", true)? {
        "true" => true,
        "false" => false,
        other => {
            return Err(OutputError::Format(format!(
                "favoritecount is not a boolean: '{}'",
                other
            )))
        }
    };
    let mentions = split_entities(field(tail[5], "mentionedentities:", true)?);
    let urls = split_entities(field(tail[6], "URL:", true)?);
    let hashtags = split_entities(field(tail[7], "hashtags:", true)?);
    let geolocation = match field(tail[8], "geolocation:", false)? {
        "null" => None,
        geo => Some(geo.to_string()),
    };

    Ok(ParsedRecord {
        sequence_id,
        text,
        post_id,
        time,
        author,
        retweet_count,
        favorited,
        mentions,
        urls,
        hashtags,
        geolocation,
    })
}

/// Strips `key` and, when `comma` is set, the trailing `,`
fn field<'a>(line: &'a str, key: &str, comma: bool) -> OutputResult<&'a str> {
    let value = line
        .strip_prefix(key)
        .ok_or_else(|| OutputError::Format(format!("expected '{}' in '{}'", key, line)))?;
    if comma {
        value
            .strip_suffix(',')
            .ok_or_else(|| OutputError::Format(format!("missing ',' after '{}'", key)))
    } else {
        Ok(value)
    }
}

fn parse_number(value: &str, name: &str) -> OutputResult<u64> {
    value
        .parse()
        .map_err(|_| OutputError::Format(format!("{} is not a number: '{}'", name, value)))
}

fn split_entities(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        value.split(',').map(str::to_string).collect()
    }
}

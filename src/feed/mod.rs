mod fetch;
mod parse;
mod plain;
mod tracklist;

pub use fetch::{FeedLocation, fetch_bytes, fetch_feed, is_url, read_feed_file};
pub use parse::{Feed, PodcastInfo, UNTITLED, parse_feed};
pub use plain::{PlainItemFields, scan_plain_item_fields};
pub use tracklist::{decode_markup_entities, extract_tracklist};

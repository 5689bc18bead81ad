// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rss::extension::ExtensionMap;

use crate::episode::{EpisodeRecord, normalize_duration, parse_positive};
use crate::error::ParseError;

use super::plain::{PlainItemFields, scan_plain_item_fields};
use super::tracklist::extract_tracklist;

/// Title given to items that do not carry one
pub const UNTITLED: &str = "Untitled";

/// Channel-level information shown on the admin overview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodcastInfo {
    pub title: String,
    pub description: String,
    pub language: String,
    pub author: String,
    pub email: String,
    pub website: String,
    pub image: String,
    pub last_build_date: String,
    pub generator: String,
}

/// A parsed feed: channel information plus one record per item
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub info: PodcastInfo,
    pub episodes: Vec<EpisodeRecord>,
}

/// Parse RSS feed XML bytes into channel information and episode records.
///
/// Every `<item>` yields exactly one record, in document order.
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Feed, ParseError> {
    let channel = rss::Channel::read_from(xml_bytes)?;
    let plain_fields = scan_plain_item_fields(xml_bytes);

    let episodes: Vec<EpisodeRecord> = channel
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| parse_episode(item, plain_fields.get(index)))
        .collect();

    log::debug!(
        "Parsed feed '{}' with {} episodes",
        channel.title(),
        episodes.len()
    );

    Ok(Feed {
        info: parse_info(&channel),
        episodes,
    })
}

fn parse_info(channel: &rss::Channel) -> PodcastInfo {
    let itunes = channel.itunes_ext();

    let author = itunes
        .and_then(|ext| ext.author().map(String::from))
        .or_else(|| extension_value(channel.extensions(), "author"))
        .unwrap_or_default();

    let email = itunes
        .and_then(|ext| ext.owner())
        .and_then(|owner| owner.email().map(String::from))
        .or_else(|| extension_value(channel.extensions(), "email"))
        .unwrap_or_default();

    let image = itunes
        .and_then(|ext| ext.image().map(String::from))
        .or_else(|| channel.image().map(|img| img.url().to_string()))
        .unwrap_or_default();

    PodcastInfo {
        title: channel.title().to_string(),
        description: channel.description().to_string(),
        language: channel.language().unwrap_or_default().to_string(),
        author,
        email,
        website: channel.link().to_string(),
        image,
        last_build_date: channel.last_build_date().unwrap_or_default().to_string(),
        generator: channel.generator().unwrap_or_default().to_string(),
    }
}

fn parse_episode(item: &rss::Item, plain: Option<&PlainItemFields>) -> EpisodeRecord {
    let itunes = item.itunes_ext();

    // itunes: first, then any other prefix with the same local name, then
    // the un-prefixed element
    let field = |itunes_value: Option<&str>, local_name: &str| -> Option<String> {
        itunes_value
            .map(String::from)
            .or_else(|| extension_value(item.extensions(), local_name))
            .or_else(|| plain.and_then(|p| p.get(local_name)).map(String::from))
    };

    let duration = field(itunes.and_then(|ext| ext.duration()), "duration");
    let episode = field(itunes.and_then(|ext| ext.episode()), "episode");
    let season = field(itunes.and_then(|ext| ext.season()), "season");

    EpisodeRecord {
        id: None,
        title: item
            .title()
            .map(String::from)
            .unwrap_or_else(|| UNTITLED.to_string()),
        description: item.description().unwrap_or_default().to_string(),
        audio_url: item
            .enclosure()
            .map(|enclosure| enclosure.url().to_string())
            .unwrap_or_default(),
        pub_date: item.pub_date().unwrap_or_default().to_string(),
        duration: duration.as_deref().map(normalize_duration).unwrap_or_default(),
        episode_number: episode.as_deref().and_then(parse_positive),
        season: season.as_deref().and_then(parse_positive),
        tracklist: item.content().map(extract_tracklist).unwrap_or_default(),
    }
}

/// First value of an extension element with the given local name, whatever
/// its prefix
fn extension_value(extensions: &ExtensionMap, local_name: &str) -> Option<String> {
    extensions
        .values()
        .filter_map(|elements| elements.get(local_name))
        .flat_map(|values| values.iter())
        .find_map(|ext| ext.value().map(|v| v.trim().to_string()))
        .filter(|v| !v.is_empty())
}

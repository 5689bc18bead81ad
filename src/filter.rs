use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::episode::EpisodeRecord;
use crate::error::FilterError;

/// Which slice of the catalogue is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonSelector {
    #[default]
    All,
    Season(u32),
}

impl SeasonSelector {
    pub fn matches(&self, episode: &EpisodeRecord) -> bool {
        match self {
            SeasonSelector::All => true,
            SeasonSelector::Season(n) => episode.season == Some(*n),
        }
    }

    /// Heading for the episode section
    pub fn section_title(&self) -> String {
        match self {
            SeasonSelector::All => "All episodes".to_string(),
            SeasonSelector::Season(n) => format!("Season {n}"),
        }
    }
}

impl FromStr for SeasonSelector {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "all" {
            return Ok(SeasonSelector::All);
        }
        s.parse::<u32>()
            .map(SeasonSelector::Season)
            .map_err(|_| FilterError::InvalidSelector(s.to_string()))
    }
}

impl fmt::Display for SeasonSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonSelector::All => write!(f, "all"),
            SeasonSelector::Season(n) => write!(f, "{n}"),
        }
    }
}

/// Episodes matching a selector, in their original order
pub fn filter_by_selector(episodes: &[EpisodeRecord], selector: SeasonSelector) -> Vec<EpisodeRecord> {
    episodes
        .iter()
        .filter(|episode| selector.matches(episode))
        .cloned()
        .collect()
}

/// Filter with a raw selector string, as it arrives from navigation.
///
/// `"all"` copies the whole list; a season number keeps the episodes of that
/// season. A selector that is neither matches nothing.
pub fn filter_episodes(episodes: &[EpisodeRecord], selector: &str) -> Vec<EpisodeRecord> {
    match selector.parse::<SeasonSelector>() {
        Ok(selector) => filter_by_selector(episodes, selector),
        Err(e) => {
            log::debug!("{e}; showing no episodes");
            Vec::new()
        }
    }
}

/// Distinct seasons present in the list, ascending
pub fn available_seasons(episodes: &[EpisodeRecord]) -> Vec<u32> {
    episodes
        .iter()
        .filter_map(|episode| episode.season)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `"1 episode"`, `"3 episodes"`
pub fn episode_count_label(count: usize) -> String {
    format!("{count} episode{}", if count == 1 { "" } else { "s" })
}

use crate::episode::{EpisodeRecord, format_hours_minutes, parse_clock};

/// Aggregate figures for the admin overview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeStats {
    pub total_episodes: usize,
    /// Sum over the episodes whose duration could be parsed
    pub total_duration_secs: u64,
    /// How many episodes contributed to `total_duration_secs`
    pub timed_episodes: usize,
    pub total_tracks: usize,
    pub episodes_with_tracklist: usize,
    /// Title and raw date of the first episode in source order
    pub latest: Option<(String, String)>,
}

impl EpisodeStats {
    /// Episodes with an unparseable duration still count toward
    /// `total_episodes` but are left out of the duration figures.
    pub fn compute(episodes: &[EpisodeRecord]) -> Self {
        let mut stats = EpisodeStats {
            total_episodes: episodes.len(),
            latest: episodes
                .first()
                .map(|ep| (ep.title.clone(), ep.pub_date.clone())),
            ..Default::default()
        };

        for episode in episodes {
            if let Some(secs) = parse_clock(&episode.duration) {
                stats.total_duration_secs = stats.total_duration_secs.saturating_add(secs);
                stats.timed_episodes += 1;
            }
            stats.total_tracks += episode.tracklist.len();
            if episode.has_tracklist() {
                stats.episodes_with_tracklist += 1;
            }
        }

        stats
    }

    /// `"{h}h {m}m"`, truncated to whole minutes
    pub fn total_duration_display(&self) -> String {
        format_hours_minutes(self.total_duration_secs)
    }

    /// Whole minutes per timed episode, floored
    pub fn average_minutes(&self) -> u64 {
        if self.timed_episodes == 0 {
            return 0;
        }
        self.total_duration_secs / (60 * self.timed_episodes as u64)
    }

    pub fn average_duration_display(&self) -> String {
        format!("{}m", self.average_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_episode(duration: &str, tracks: &[&str]) -> EpisodeRecord {
        EpisodeRecord {
            duration: duration.to_string(),
            tracklist: tracks.iter().map(|t| t.to_string()).collect(),
            ..EpisodeRecord::new("ep", "https://example.com/ep.mp3")
        }
    }

    #[test]
    fn total_and_average_truncate() {
        let episodes = vec![make_episode("1:30", &[]), make_episode("2:00", &[])];
        let stats = EpisodeStats::compute(&episodes);

        assert_eq!(stats.total_duration_secs, 210);
        assert_eq!(stats.total_duration_display(), "0h 3m");
        assert_eq!(stats.average_duration_display(), "1m");
    }

    #[test]
    fn unparseable_durations_only_leave_the_aggregate() {
        let episodes = vec![
            make_episode("1:00:00", &["a", "b"]),
            make_episode("unknown", &[]),
            make_episode("", &["c"]),
            make_episode("59:59", &[]),
        ];
        let stats = EpisodeStats::compute(&episodes);

        assert_eq!(stats.total_episodes, 4);
        assert_eq!(stats.timed_episodes, 2);
        assert_eq!(stats.total_duration_display(), "1h 59m");
        assert_eq!(stats.average_duration_display(), "59m");
        assert_eq!(stats.total_tracks, 3);
        assert_eq!(stats.episodes_with_tracklist, 2);
    }

    #[test]
    fn huge_durations_saturate_the_total() {
        let episodes = vec![
            make_episode("300000000000000000:00", &[]),
            make_episode("300000000000000000:00", &[]),
            make_episode("300000000000000000:00", &[]),
        ];
        let stats = EpisodeStats::compute(&episodes);

        assert_eq!(stats.timed_episodes, 3);
        assert_eq!(stats.total_duration_secs, u64::MAX);
        assert_eq!(stats.average_minutes(), u64::MAX / 180);
        assert!(stats.total_duration_display().ends_with('m'));
    }

    #[test]
    fn empty_catalogue() {
        let stats = EpisodeStats::compute(&[]);
        assert_eq!(stats.total_duration_display(), "0h 0m");
        assert_eq!(stats.average_duration_display(), "0m");
        assert!(stats.latest.is_none());
    }

    #[test]
    fn latest_is_first_in_source_order() {
        let mut first = make_episode("1:00", &[]);
        first.title = "Newest".to_string();
        first.pub_date = "Mon, 15 Jan 2024 12:00:00 GMT".to_string();
        let episodes = vec![first, make_episode("1:00", &[])];

        let stats = EpisodeStats::compute(&episodes);
        assert_eq!(
            stats.latest,
            Some((
                "Newest".to_string(),
                "Mon, 15 Jan 2024 12:00:00 GMT".to_string()
            ))
        );
    }
}

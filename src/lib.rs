pub mod app;
pub mod config;
pub mod episode;
pub mod error;
pub mod feed;
pub mod filter;
pub mod http;
pub mod notify;
pub mod render;
pub mod source;
pub mod stats;
pub mod upload;
pub mod view;

// Re-export main types for convenience
pub use app::{AppContext, Effect, ReloadOutcome};
pub use config::{Config, DEFAULT_BASE_URL};
pub use episode::{DateStyle, EpisodeRecord, format_display_date};
pub use error::{FetchError, FilterError, LoadError, ParseError, ProbeError, UploadError};
pub use feed::{Feed, FeedLocation, PodcastInfo, fetch_feed, is_url, parse_feed};
pub use filter::{SeasonSelector, available_seasons, episode_count_label, filter_episodes};
pub use http::{HttpClient, HttpResponse, MultipartBody, ReqwestClient};
pub use notify::{
    NoopSink, Notification, NotificationCenter, NotificationLevel, NotificationSink,
    SharedNotificationSink,
};
pub use render::{
    Variant, render_episode_list, render_notifications, render_podcast_info, render_stats,
};
pub use source::{EpisodeSource, JsonApiSource, RssFeedSource, SharedEpisodeSource};
pub use stats::EpisodeStats;
pub use upload::{
    DurationProbe, EpisodeForm, Prefill, SelectedFile, SymphoniaProbe, UploadCoordinator,
};
pub use view::{Action, EventTable, Node, Rendered, render};

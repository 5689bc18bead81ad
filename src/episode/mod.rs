mod date;
mod duration;
mod record;

pub use date::{DateStyle, format_display_date, parse_pub_date};
pub use duration::{
    format_clock, format_hours_minutes, format_seconds, normalize_duration, parse_clock,
};
pub use record::{EpisodeRecord, parse_positive};

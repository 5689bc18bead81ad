use crate::episode::{DateStyle, EpisodeRecord, format_display_date};
use crate::feed::PodcastInfo;
use crate::filter::{SeasonSelector, episode_count_label};
use crate::notify::{Notification, NotificationLevel};
use crate::stats::EpisodeStats;
use crate::view::{Action, Element, Node, icon, text_with_breaks};

/// Which page an episode list is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Public page backed by the API
    Viewer,
    /// Public page backed by the static feed; adds a download link
    StaticViewer,
    /// Admin panel backed by the API; adds deletion
    Admin,
    /// Read-only admin overview backed by the static feed
    AdminStatic,
}

impl Variant {
    fn can_play(self) -> bool {
        !matches!(self, Variant::AdminStatic)
    }
}

/// The `episodesList` container with one card per episode
pub fn render_episode_list(episodes: &[EpisodeRecord], variant: Variant) -> Node {
    let list = Element::new("div").id("episodesList");

    if episodes.is_empty() {
        return list
            .child(Element::new("div").class("loading").text("No episodes available"))
            .into();
    }

    list.children(
        episodes
            .iter()
            .enumerate()
            .map(|(index, episode)| render_episode_card(episode, index, variant)),
    )
    .into()
}

/// A single episode card; `index` is the episode's position in the list the
/// admin actions refer to
pub fn render_episode_card(episode: &EpisodeRecord, index: usize, variant: Variant) -> Node {
    let mut card = Element::new("div").class("episode-card");
    if variant == Variant::AdminStatic {
        card = card.class("admin-episode");
    }

    let header = Element::new("div")
        .class("episode-header")
        .child(
            Element::new("div")
                .child(Element::new("div").class("episode-title").text(&episode.title))
                .child(render_meta(episode)),
        )
        .child(render_actions(episode, index, variant));

    let content = Element::new("div")
        .class("episode-content")
        .child(
            Element::new("div")
                .class("episode-description")
                .children(text_with_breaks(&episode.description)),
        )
        .maybe_child(render_tracklist(&episode.tracklist, variant));

    card.child(header).child(content).into()
}

fn render_meta(episode: &EpisodeRecord) -> Element {
    let badge = |icon_name: &str, text: String| {
        Element::new("span")
            .child(icon(icon_name))
            .text(format!(" {text}"))
    };

    Element::new("div")
        .class("episode-meta")
        .child(badge("calendar", episode.display_date()))
        .child(badge("clock", episode.duration.clone()))
        .maybe_child(
            episode
                .episode_number
                .map(|n| badge("hashtag", format!("Episode {n}"))),
        )
        .maybe_child(episode.season.map(|n| badge("tv", format!("Season {n}"))))
}

/// Whether a value may be used as a link target: an `http`/`https` URL or a
/// relative reference. Other schemes such as `javascript:` are refused.
fn is_safe_href(raw: &str) -> bool {
    match url::Url::parse(raw.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(url::ParseError::RelativeUrlWithoutBase) => !raw.trim().is_empty(),
        Err(_) => false,
    }
}

fn render_actions(episode: &EpisodeRecord, index: usize, variant: Variant) -> Element {
    let linkable = episode.is_playable() && is_safe_href(&episode.audio_url);
    let mut actions = Element::new("div").class("episode-actions");

    if variant.can_play() && episode.is_playable() {
        actions = actions.child(
            Element::new("button")
                .class("btn")
                .class("btn-small")
                .class("btn-outline")
                .on_click(Action::Play {
                    audio_url: episode.audio_url.clone(),
                })
                .child(icon("play"))
                .text(" Play"),
        );
    }

    match variant {
        Variant::StaticViewer if linkable => {
            actions = actions.child(
                Element::new("a")
                    .class("btn")
                    .class("btn-small")
                    .class("btn-secondary")
                    .attr("href", &episode.audio_url)
                    .attr("download", "")
                    .child(icon("download"))
                    .text(" Download"),
            );
        }
        Variant::Admin => {
            actions = actions.child(
                Element::new("button")
                    .class("btn")
                    .class("btn-small")
                    .class("btn-danger")
                    .on_click(Action::ConfirmDelete { index })
                    .child(icon("trash"))
                    .text(" Delete"),
            );
        }
        Variant::AdminStatic if linkable => {
            actions = actions.child(
                Element::new("a")
                    .class("btn")
                    .class("btn-small")
                    .class("btn-outline")
                    .attr("href", &episode.audio_url)
                    .attr("target", "_blank")
                    .child(icon("external-link-alt"))
                    .text(" Open file"),
            );
        }
        _ => {}
    }

    actions
}

fn render_tracklist(tracklist: &[String], variant: Variant) -> Option<Element> {
    if tracklist.is_empty() {
        return (variant == Variant::AdminStatic).then(|| {
            Element::new("div")
                .class("no-tracklist")
                .child(icon("exclamation-triangle"))
                .text(" No tracklist")
        });
    }

    let heading = if variant == Variant::AdminStatic {
        format!(
            " Tracklist ({} track{})",
            tracklist.len(),
            if tracklist.len() == 1 { "" } else { "s" }
        )
    } else {
        " Tracklist".to_string()
    };

    Some(
        Element::new("div")
            .class("tracklist")
            .child(Element::new("h4").child(icon("music")).text(heading))
            .child(
                Element::new("ul").children(
                    tracklist
                        .iter()
                        .map(|track| Element::new("li").text(track).into()),
                ),
            ),
    )
}

/// Section heading and episode counter shown above the list
pub fn render_section_header(selector: SeasonSelector, shown: usize) -> Node {
    let icon_name = match selector {
        SeasonSelector::All => "headphones",
        SeasonSelector::Season(_) => "play",
    };

    Element::new("div")
        .class("section-header")
        .child(
            Element::new("h2")
                .id("sectionTitle")
                .child(icon(icon_name))
                .text(format!(" {}", selector.section_title())),
        )
        .child(
            Element::new("span")
                .id("episodeCount")
                .text(episode_count_label(shown)),
        )
        .into()
}

/// Navigation buttons: "All" plus one per season
pub fn render_season_nav(seasons: &[u32], active: SeasonSelector) -> Node {
    let button = |selector: SeasonSelector, label: String| -> Node {
        let mut el = Element::new("button")
            .class("nav-btn")
            .attr("data-filter", selector.to_string())
            .on_click(Action::Filter(selector))
            .text(label);
        if selector == active {
            el = el.class("active");
        }
        el.into()
    };

    Element::new("nav")
        .class("season-nav")
        .child(button(SeasonSelector::All, "All".to_string()))
        .children(
            seasons
                .iter()
                .map(|n| button(SeasonSelector::Season(*n), format!("Season {n}"))),
        )
        .into()
}

/// Statistics cards for the admin overview
pub fn render_stats(stats: &EpisodeStats) -> Node {
    let card = |value: String, icon_name: &str, label: &str| -> Node {
        Element::new("div")
            .class("stat-card")
            .child(Element::new("div").class("stat-number").text(value))
            .child(
                Element::new("div")
                    .class("stat-label")
                    .child(icon(icon_name))
                    .text(format!(" {label}")),
            )
            .into()
    };

    let latest = stats.latest.as_ref().map(|(title, pub_date)| {
        Element::new("div")
            .class("stat-card")
            .class("latest-episode")
            .child(
                Element::new("div")
                    .class("stat-label")
                    .child(icon("star"))
                    .text(" Latest episode"),
            )
            .child(Element::new("div").class("stat-text").text(title))
            .child(
                Element::new("div")
                    .class("stat-date")
                    .text(format_display_date(pub_date, DateStyle::Day)),
            )
    });

    Element::new("div").id("podcastStats").child(
        Element::new("div")
            .class("stats-grid")
            .child(card(stats.total_episodes.to_string(), "headphones", "Total episodes"))
            .child(card(stats.total_duration_display(), "clock", "Total duration"))
            .child(card(stats.average_duration_display(), "chart-line", "Average duration"))
            .child(card(stats.total_tracks.to_string(), "music", "Total tracks"))
            .child(card(
                stats.episodes_with_tracklist.to_string(),
                "list",
                "With tracklist",
            ))
            .maybe_child(latest),
    )
    .into()
}

/// Channel information cards for the admin overview
pub fn render_podcast_info(info: &PodcastInfo, feed_url: &str) -> Node {
    let item = |label: &str, value: Node| -> Node {
        Element::new("div")
            .class("info-item")
            .child(Element::new("strong").text(format!("{label}:")))
            .text(" ")
            .child(value)
            .into()
    };
    let link = |href: &str| -> Node {
        if !is_safe_href(href) {
            return Node::text(href);
        }
        Element::new("a")
            .attr("href", href)
            .attr("target", "_blank")
            .text(href)
            .into()
    };

    let general = Element::new("div")
        .class("info-card")
        .child(Element::new("h4").child(icon("podcast")).text(" General"))
        .child(item("Title", Node::text(&info.title)))
        .child(item("Author", Node::text(&info.author)))
        .child(item("Email", Node::text(&info.email)))
        .child(item("Language", Node::text(&info.language)))
        .child(item("Website", link(&info.website)));

    let feed = Element::new("div")
        .class("info-card")
        .child(Element::new("h4").child(icon("rss")).text(" RSS feed"))
        .child(item("Feed URL", link(feed_url)))
        .child(item(
            "Last updated",
            Node::text(format_display_date(&info.last_build_date, DateStyle::DayTime)),
        ))
        .child(item("Generator", Node::text(&info.generator)));

    Element::new("div")
        .id("podcastInfo")
        .child(Element::new("div").class("info-grid").child(general).child(feed))
        .child(
            Element::new("div")
                .class("info-card")
                .class("description-card")
                .child(Element::new("h4").child(icon("align-left")).text(" Description"))
                .child(Element::new("p").children(text_with_breaks(&info.description))),
        )
        .into()
}

/// The `notifications` container with the currently visible messages
pub fn render_notifications(notifications: &[Notification]) -> Node {
    Element::new("div")
        .id("notifications")
        .class("notifications")
        .children(notifications.iter().map(|n| {
            let icon_name = match n.level {
                NotificationLevel::Error => "exclamation-circle",
                NotificationLevel::Success => "check-circle",
                NotificationLevel::Info => "info-circle",
            };
            Element::new("div")
                .class("notification")
                .class(format!("notification-{}", n.level))
                .child(icon(icon_name))
                .child(Element::new("span").text(&n.message))
                .into()
        }))
        .into()
}

/// Deletion confirmation dialog; only rendered while a deletion is pending
pub fn render_confirm_modal(episode: &EpisodeRecord) -> Node {
    Element::new("div")
        .id("confirmModal")
        .class("modal")
        .child(
            Element::new("div")
                .class("modal-content")
                .child(Element::new("h3").text("Delete episode"))
                .child(Element::new("p").text(format!(
                    "\"{}\" will be removed permanently.",
                    episode.title
                )))
                .child(
                    Element::new("button")
                        .class("btn")
                        .class("btn-danger")
                        .on_click(Action::Delete)
                        .text("Delete"),
                )
                .child(
                    Element::new("button")
                        .class("btn")
                        .class("btn-outline")
                        .on_click(Action::CancelDelete)
                        .text("Cancel"),
                ),
        )
        .into()
}

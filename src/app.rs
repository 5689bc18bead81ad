// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::episode::EpisodeRecord;
use crate::error::LoadError;
use crate::filter::{SeasonSelector, available_seasons, filter_by_selector};
use crate::notify::{Notification, SharedNotificationSink};
use crate::render::{
    Variant, render_confirm_modal, render_episode_list, render_season_nav, render_section_header,
};
use crate::source::SharedEpisodeSource;
use crate::stats::EpisodeStats;
use crate::view::{Action, Element, EventTable, Node, Rendered, render};

/// Result of a reload that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The list was replaced with this many episodes
    Applied(usize),
    /// A reload requested later had already been applied; this result was dropped
    Stale,
}

/// What the host should do after an action was dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed
    None,
    /// Hand this URL to the audio player
    PlayAudio(String),
    /// View state changed; render again
    Rerender,
    /// The user confirmed deleting the episode at this list position
    DeleteEpisode(usize),
}

#[derive(Debug, Default)]
struct AppState {
    episodes: Vec<EpisodeRecord>,
    selector: SeasonSelector,
    pending_delete: Option<usize>,
    applied_ticket: u64,
}

/// Everything the viewer and the admin panel share: the episode source, the
/// loaded list, the current filter and the notification sink.
///
/// The state lock is only held for short synchronous sections, never across
/// an await.
pub struct AppContext {
    source: SharedEpisodeSource,
    notifier: SharedNotificationSink,
    config: Config,
    state: Mutex<AppState>,
    next_ticket: AtomicU64,
}

impl AppContext {
    pub fn new(source: SharedEpisodeSource, notifier: SharedNotificationSink, config: Config) -> Self {
        Self {
            source,
            notifier,
            config,
            state: Mutex::new(AppState::default()),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn notifier(&self) -> &SharedNotificationSink {
        &self.notifier
    }

    fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the full episode list from the source and replace the current one.
    ///
    /// When reloads overlap, the most recently requested one wins: a result
    /// arriving after a later request has been applied is discarded. On
    /// failure the current list is kept and a single error notification is
    /// emitted.
    pub async fn reload(&self) -> Result<ReloadOutcome, LoadError> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Reload #{ticket} from {}", self.source.describe());

        let episodes = match self.source.load().await {
            Ok(episodes) => episodes,
            Err(e) => {
                log::error!("Failed to load episodes from {}: {e}", self.source.describe());
                self.notifier
                    .notify(Notification::error(format!("Could not load episodes: {e}")));
                return Err(e);
            }
        };

        let mut state = self.state();
        if state.applied_ticket > ticket {
            log::warn!(
                "Discarding reload #{ticket}; reload #{} was already applied",
                state.applied_ticket
            );
            return Ok(ReloadOutcome::Stale);
        }

        let count = episodes.len();
        state.applied_ticket = ticket;
        state.episodes = episodes;
        if state.pending_delete.is_some_and(|index| index >= count) {
            state.pending_delete = None;
        }
        log::info!("Loaded {count} episodes");

        Ok(ReloadOutcome::Applied(count))
    }

    /// The complete loaded list
    pub fn episodes(&self) -> Vec<EpisodeRecord> {
        self.state().episodes.clone()
    }

    pub fn episode(&self, index: usize) -> Option<EpisodeRecord> {
        self.state().episodes.get(index).cloned()
    }

    pub fn selector(&self) -> SeasonSelector {
        self.state().selector
    }

    pub fn apply_filter(&self, selector: SeasonSelector) {
        self.state().selector = selector;
    }

    /// Episodes matching the current selector
    pub fn filtered(&self) -> Vec<EpisodeRecord> {
        let state = self.state();
        filter_by_selector(&state.episodes, state.selector)
    }

    pub fn seasons(&self) -> Vec<u32> {
        available_seasons(&self.state().episodes)
    }

    pub fn stats(&self) -> EpisodeStats {
        EpisodeStats::compute(&self.state().episodes)
    }

    /// Remember which episode the user wants to delete. Returns false when
    /// there is no episode at that position.
    pub fn confirm_delete(&self, index: usize) -> bool {
        let mut state = self.state();
        if index >= state.episodes.len() {
            return false;
        }
        state.pending_delete = Some(index);
        true
    }

    pub fn cancel_delete(&self) {
        self.state().pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<usize> {
        self.state().pending_delete
    }

    /// Clear and return the pending deletion
    pub fn take_pending_delete(&self) -> Option<usize> {
        self.state().pending_delete.take()
    }

    /// The page body for a variant.
    ///
    /// Viewer pages show the filtered list with season navigation. Admin
    /// pages list every episode so that positions match the server's.
    pub fn page(&self, variant: Variant) -> Node {
        let state = self.state();

        let mut page = Element::new("main");
        match variant {
            Variant::Viewer | Variant::StaticViewer => {
                let shown = filter_by_selector(&state.episodes, state.selector);
                page = page
                    .child(render_season_nav(
                        &available_seasons(&state.episodes),
                        state.selector,
                    ))
                    .child(render_section_header(state.selector, shown.len()))
                    .child(render_episode_list(&shown, variant));
            }
            Variant::Admin | Variant::AdminStatic => {
                page = page
                    .child(render_section_header(SeasonSelector::All, state.episodes.len()))
                    .child(render_episode_list(&state.episodes, variant));
            }
        }

        let pending = state
            .pending_delete
            .and_then(|index| state.episodes.get(index));
        page.maybe_child(pending.map(render_confirm_modal)).into()
    }

    pub fn render_page(&self, variant: Variant) -> Rendered {
        render(&self.page(variant))
    }

    /// Apply an action from a rendered view
    pub fn dispatch(&self, action: &Action) -> Effect {
        match action {
            Action::Play { audio_url } => Effect::PlayAudio(audio_url.clone()),
            Action::ConfirmDelete { index } => {
                if self.confirm_delete(*index) {
                    Effect::Rerender
                } else {
                    log::warn!("Ignoring delete request for unknown position {index}");
                    Effect::None
                }
            }
            Action::CancelDelete => {
                self.cancel_delete();
                Effect::Rerender
            }
            Action::Delete => match self.take_pending_delete() {
                Some(index) => Effect::DeleteEpisode(index),
                None => Effect::None,
            },
            Action::Filter(selector) => {
                self.apply_filter(*selector);
                Effect::Rerender
            }
        }
    }

    /// Look up a `data-action` id in the table of the last render and dispatch it
    pub fn handle_event(&self, events: &EventTable, id: usize) -> Effect {
        match events.get(id) {
            Some(action) => self.dispatch(action),
            None => {
                log::debug!("No action bound to id {id}");
                Effect::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::FetchError;
    use crate::notify::{NotificationLevel, RecordingSink};
    use crate::source::EpisodeSource;

    /// Answers each load with the next scripted response after its delay
    struct ScriptedSource {
        responses: Mutex<VecDeque<(Duration, Result<Vec<EpisodeRecord>, u16>)>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<(Duration, Result<Vec<EpisodeRecord>, u16>)>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
            })
        }
    }

    #[async_trait]
    impl EpisodeSource for ScriptedSource {
        async fn load(&self) -> Result<Vec<EpisodeRecord>, LoadError> {
            let (delay, response) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected load");
            tokio::time::sleep(delay).await;

            response.map_err(|status| {
                LoadError::Fetch(FetchError::Status {
                    url: "https://example.com/api/episodes".to_string(),
                    status,
                })
            })
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn make_episode(title: &str, season: Option<u32>) -> EpisodeRecord {
        EpisodeRecord {
            season,
            ..EpisodeRecord::new(title, format!("https://example.com/{title}.mp3"))
        }
    }

    fn titles(episodes: &[EpisodeRecord]) -> Vec<String> {
        episodes.iter().map(|e| e.title.clone()).collect()
    }

    fn context(source: Arc<ScriptedSource>) -> (AppContext, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let ctx = AppContext::new(source, sink.clone(), Config::default());
        (ctx, sink)
    }

    #[tokio::test]
    async fn reload_replaces_list_wholesale() {
        let source = ScriptedSource::new(vec![
            (Duration::ZERO, Ok(vec![make_episode("a", None), make_episode("b", None)])),
            (Duration::ZERO, Ok(vec![make_episode("c", None)])),
        ]);
        let (ctx, _) = context(source);

        assert_eq!(ctx.reload().await.unwrap(), ReloadOutcome::Applied(2));
        assert_eq!(ctx.reload().await.unwrap(), ReloadOutcome::Applied(1));
        assert_eq!(titles(&ctx.episodes()), vec!["c"]);
    }

    #[tokio::test]
    async fn failed_reload_keeps_list_and_notifies_once() {
        let source = ScriptedSource::new(vec![
            (Duration::ZERO, Ok(vec![make_episode("a", None)])),
            (Duration::ZERO, Err(500)),
        ]);
        let (ctx, sink) = context(source);

        ctx.reload().await.unwrap();
        let result = ctx.reload().await;

        assert!(matches!(
            result,
            Err(LoadError::Fetch(FetchError::Status { status: 500, .. }))
        ));
        assert_eq!(titles(&ctx.episodes()), vec!["a"]);
        assert_eq!(sink.count(NotificationLevel::Error), 1);
        assert_eq!(sink.received().len(), 1);
    }

    #[tokio::test]
    async fn stale_overlapping_reload_is_discarded() {
        let source = ScriptedSource::new(vec![
            (Duration::from_millis(80), Ok(vec![make_episode("old", None)])),
            (Duration::ZERO, Ok(vec![make_episode("new", None)])),
        ]);
        let (ctx, _) = context(source);

        let (first, second) = futures::join!(ctx.reload(), ctx.reload());

        assert_eq!(first.unwrap(), ReloadOutcome::Stale);
        assert_eq!(second.unwrap(), ReloadOutcome::Applied(1));
        assert_eq!(titles(&ctx.episodes()), vec!["new"]);
    }

    #[tokio::test]
    async fn earlier_request_finishing_first_is_still_applied() {
        let source = ScriptedSource::new(vec![
            (Duration::ZERO, Ok(vec![make_episode("first", None)])),
            (Duration::from_millis(30), Ok(vec![make_episode("second", None)])),
        ]);
        let (ctx, _) = context(source);

        let (first, second) = futures::join!(ctx.reload(), ctx.reload());

        assert_eq!(first.unwrap(), ReloadOutcome::Applied(1));
        assert_eq!(second.unwrap(), ReloadOutcome::Applied(1));
        assert_eq!(titles(&ctx.episodes()), vec!["second"]);
    }

    #[tokio::test]
    async fn filter_action_changes_viewer_page() {
        let source = ScriptedSource::new(vec![(
            Duration::ZERO,
            Ok(vec![
                make_episode("s1", Some(1)),
                make_episode("s2", Some(2)),
            ]),
        )]);
        let (ctx, _) = context(source);
        ctx.reload().await.unwrap();

        let effect = ctx.dispatch(&Action::Filter(SeasonSelector::Season(2)));
        assert_eq!(effect, Effect::Rerender);
        assert_eq!(titles(&ctx.filtered()), vec!["s2"]);

        let page = ctx.page(Variant::Viewer);
        assert_eq!(page.find_by_class("episode-card").len(), 1);
        assert_eq!(ctx.seasons(), vec![1, 2]);
    }

    #[tokio::test]
    async fn delete_confirmation_flow() {
        let source = ScriptedSource::new(vec![(
            Duration::ZERO,
            Ok(vec![make_episode("a", None), make_episode("b", None)]),
        )]);
        let (ctx, _) = context(source);
        ctx.reload().await.unwrap();

        let rendered = ctx.render_page(Variant::Admin);
        let (id, _) = rendered
            .events
            .iter()
            .find(|(_, action)| **action == Action::ConfirmDelete { index: 1 })
            .unwrap();

        assert_eq!(ctx.handle_event(&rendered.events, id), Effect::Rerender);
        assert_eq!(ctx.pending_delete(), Some(1));
        assert!(ctx.page(Variant::Admin).find_by_id("confirmModal").is_some());

        assert_eq!(ctx.dispatch(&Action::Delete), Effect::DeleteEpisode(1));
        assert_eq!(ctx.pending_delete(), None);
        assert_eq!(ctx.dispatch(&Action::Delete), Effect::None);
    }

    #[tokio::test]
    async fn cancel_and_unknown_positions() {
        let source = ScriptedSource::new(vec![(Duration::ZERO, Ok(vec![make_episode("a", None)]))]);
        let (ctx, _) = context(source);
        ctx.reload().await.unwrap();

        assert_eq!(ctx.dispatch(&Action::ConfirmDelete { index: 5 }), Effect::None);
        assert!(ctx.confirm_delete(0));
        ctx.dispatch(&Action::CancelDelete);
        assert!(ctx.page(Variant::Admin).find_by_id("confirmModal").is_none());
        assert_eq!(
            ctx.handle_event(&EventTable::default(), 3),
            Effect::None
        );
    }

    #[test]
    fn play_effect_carries_url() {
        let ctx = AppContext::new(
            ScriptedSource::new(Vec::new()),
            crate::notify::NoopSink::shared(),
            Config::default(),
        );
        assert_eq!(
            ctx.dispatch(&Action::Play {
                audio_url: "https://example.com/a.mp3".to_string()
            }),
            Effect::PlayAudio("https://example.com/a.mp3".to_string())
        );
    }
}

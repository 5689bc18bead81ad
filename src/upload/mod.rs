// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Creating and deleting episodes from the admin panel.

mod form;
mod media;
mod probe;

pub use form::{EpisodeForm, Prefill, SelectedFile};
pub use media::{UNKNOWN_MEDIA_TYPE, extension_for_media_type, is_audio, media_type_for_path};
pub use probe::{DurationProbe, SymphoniaProbe};

use std::path::Path;
use std::sync::Arc;

use crate::app::AppContext;
use crate::episode::format_seconds;
use crate::error::UploadError;
use crate::http::HttpClient;
use crate::notify::Notification;

/// Drives file selection, upload and deletion against the episode API.
///
/// Every operation reports its outcome through the context's notification
/// sink. Successful changes trigger a full reload of the context.
pub struct UploadCoordinator<C, P = SymphoniaProbe> {
    client: C,
    probe: P,
    app: Arc<AppContext>,
}

impl<C: HttpClient> UploadCoordinator<C, SymphoniaProbe> {
    /// Coordinator probing with symphonia under the context's probe timeout
    pub fn new(client: C, app: Arc<AppContext>) -> Self {
        let probe = SymphoniaProbe::new(app.config().probe_timeout);
        Self::with_probe(client, probe, app)
    }
}

impl<C: HttpClient, P: DurationProbe> UploadCoordinator<C, P> {
    pub fn with_probe(client: C, probe: P, app: Arc<AppContext>) -> Self {
        Self { client, probe, app }
    }

    /// Validate a picked file and derive form defaults from it.
    ///
    /// Returns `None` after an error notification when the file is not audio.
    /// An unreadable duration is reported too, but the file stays selected
    /// with no duration so it can be typed in by hand.
    pub async fn select_file(&self, path: &Path, media_type: Option<&str>) -> Option<Prefill> {
        let media_type = media_type
            .map(str::to_string)
            .or_else(|| media_type_for_path(path).map(String::from))
            .unwrap_or_else(|| UNKNOWN_MEDIA_TYPE.to_string());

        if !is_audio(&media_type) {
            let error = UploadError::NotAudio { media_type };
            log::warn!("Rejected {}: {error}", path.display());
            self.app
                .notifier()
                .notify(Notification::error("Please select an audio file"));
            return None;
        }

        let duration = match self.probe.probe(path, &media_type).await {
            Ok(secs) => {
                let duration = format_seconds(secs);
                self.app
                    .notifier()
                    .notify(Notification::success(format!("Duration detected: {duration}")));
                Some(duration)
            }
            Err(e) => {
                log::error!("Could not read duration of {}: {e}", path.display());
                self.app
                    .notifier()
                    .notify(Notification::error(format!("Could not read audio duration: {e}")));
                None
            }
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Some(Prefill {
            title,
            duration,
            file: SelectedFile {
                path: path.to_path_buf(),
                filename,
                media_type,
            },
        })
    }

    /// Upload a new episode, then reload the list.
    ///
    /// The form is only borrowed, so a failed upload leaves it intact for
    /// another attempt.
    pub async fn submit(&self, form: &EpisodeForm, file: &SelectedFile) -> Result<(), UploadError> {
        if let Err(e) = self.post_episode(form, file).await {
            log::error!("Upload of '{}' failed: {e}", form.title);
            self.app
                .notifier()
                .notify(Notification::error(format!("Upload failed: {e}")));
            return Err(e);
        }

        log::info!("Uploaded '{}'", form.title);
        self.app
            .notifier()
            .notify(Notification::success("Episode uploaded successfully"));
        self.reload_after_change().await;
        Ok(())
    }

    async fn post_episode(&self, form: &EpisodeForm, file: &SelectedFile) -> Result<(), UploadError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| UploadError::FileRead {
                path: file.path.clone(),
                source,
            })?;
        let body = form.to_multipart(file, bytes);

        let url = self.app.config().episodes_url()?.to_string();
        let status = self
            .client
            .post_multipart(&url, body)
            .await
            .map_err(|source| UploadError::Request {
                url: url.clone(),
                source,
            })?;

        check_status(url, status)
    }

    /// Delete the episode at a position of the loaded list, then reload.
    ///
    /// The server is addressed by the record's id, or by the position when
    /// the record carries none.
    pub async fn delete(&self, index: usize) -> Result<(), UploadError> {
        if let Err(e) = self.delete_episode(index).await {
            log::error!("Deleting episode {index} failed: {e}");
            self.app
                .notifier()
                .notify(Notification::error(format!("Delete failed: {e}")));
            return Err(e);
        }

        log::info!("Deleted episode {index}");
        self.app
            .notifier()
            .notify(Notification::success("Episode deleted successfully"));
        self.reload_after_change().await;
        Ok(())
    }

    async fn delete_episode(&self, index: usize) -> Result<(), UploadError> {
        let episode = self
            .app
            .episode(index)
            .ok_or(UploadError::UnknownEpisode(index))?;
        let id = episode.id.unwrap_or(index as u64);

        let url = self.app.config().episode_url(id)?.to_string();
        let status = self
            .client
            .delete(&url)
            .await
            .map_err(|source| UploadError::Request {
                url: url.clone(),
                source,
            })?;

        check_status(url, status)
    }

    async fn reload_after_change(&self) {
        // A failed reload has already been reported by the context
        let _ = self.app.reload().await;
    }
}

fn check_status(url: String, status: u16) -> Result<(), UploadError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(UploadError::Status { url, status })
    }
}

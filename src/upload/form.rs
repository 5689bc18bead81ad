use std::path::PathBuf;

use crate::http::MultipartBody;

/// An audio file the user picked, validated as audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Name sent with the upload
    pub filename: String,
    pub media_type: String,
}

/// Values derived from a selected file to pre-fill the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefill {
    /// File name without its extension
    pub title: String,
    /// Probed playing time, `m:ss` or `h:mm:ss`; `None` when it could not be
    /// read and has to be typed in
    pub duration: Option<String>,
    pub file: SelectedFile,
}

/// The admin panel's new-episode form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeForm {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub episode_number: Option<u32>,
    pub season: Option<u32>,
    /// One track per line, as typed
    pub tracklist_text: String,
}

impl EpisodeForm {
    /// Tracklist lines, trimmed, without blank ones
    pub fn tracklist(&self) -> Vec<String> {
        self.tracklist_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    /// Take over title and, when known, duration from a selected file
    pub fn apply_prefill(&mut self, prefill: &Prefill) {
        self.title = prefill.title.clone();
        if let Some(duration) = &prefill.duration {
            self.duration = duration.clone();
        }
    }

    /// The request body, in the field order the server reads it.
    ///
    /// Absent numbers are sent as empty strings and the tracklist as a JSON array.
    pub fn to_multipart(&self, file: &SelectedFile, bytes: Vec<u8>) -> MultipartBody {
        let number = |n: Option<u32>| n.map(|n| n.to_string()).unwrap_or_default();
        let tracklist = serde_json::Value::from(self.tracklist()).to_string();

        MultipartBody::new()
            .text("title", self.title.as_str())
            .text("description", self.description.as_str())
            .text("duration", self.duration.as_str())
            .text("episode_number", number(self.episode_number))
            .text("season", number(self.season))
            .text("tracklist", tracklist)
            .file("audio_file", &file.filename, &file.media_type, bytes)
    }
}

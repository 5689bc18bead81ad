// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when retrieving episode data
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read feed file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur when decoding a fetched document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to parse RSS feed: {0}")]
    Xml(#[from] rss::Error),

    #[error("Failed to parse episode list JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by an episode source
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors that can occur while estimating an audio file's duration
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to open audio file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unrecognized audio format: {0}")]
    Format(#[from] symphonia::core::errors::Error),

    #[error("No audio track found")]
    NoTrack,

    #[error("Audio track does not declare its length")]
    UnknownDuration,

    #[error("Reading audio metadata timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Metadata task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors that can occur when creating or deleting episodes
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("'{media_type}' is not an audio file")]
    NotAudio { media_type: String },

    #[error("Failed to read audio file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("No episode at position {0}")]
    UnknownEpisode(usize),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Errors from parsing a season selector strictly
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("'{0}' is neither 'all' nor a season number")]
    InvalidSelector(String),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::media::extension_for_media_type;
use crate::error::ProbeError;

/// Reads the playing time of an audio file
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Duration in seconds
    async fn probe(&self, path: &Path, media_type: &str) -> Result<f64, ProbeError>;
}

/// Probes container headers with symphonia on a blocking thread
#[derive(Debug, Clone)]
pub struct SymphoniaProbe {
    timeout: Duration,
}

impl SymphoniaProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl DurationProbe for SymphoniaProbe {
    async fn probe(&self, path: &Path, media_type: &str) -> Result<f64, ProbeError> {
        let path = path.to_path_buf();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .or_else(|| extension_for_media_type(media_type).map(String::from));

        let task = tokio::task::spawn_blocking(move || probe_file(path, extension));
        bounded(self.timeout, async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(ProbeError::Task(e)),
            }
        })
        .await
    }
}

/// Wait for a probe no longer than `limit`
async fn bounded<F>(limit: Duration, probe: F) -> Result<f64, ProbeError>
where
    F: Future<Output = Result<f64, ProbeError>>,
{
    tokio::time::timeout(limit, probe)
        .await
        .unwrap_or(Err(ProbeError::TimedOut(limit)))
}

fn probe_file(path: PathBuf, extension: Option<String>) -> Result<f64, ProbeError> {
    let file = File::open(&path).map_err(|source| ProbeError::Open {
        path: path.clone(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = &extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(ProbeError::NoTrack)?;

    let params = &track.codec_params;
    match (params.n_frames, params.sample_rate) {
        (Some(n_frames), Some(rate)) if rate > 0 => {
            let secs = n_frames as f64 / f64::from(rate);
            log::debug!("Probed {}: {secs:.2}s", path.display());
            Ok(secs)
        }
        _ => Err(ProbeError::UnknownDuration),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    /// One second of 8 kHz mono 16-bit silence
    fn wav_bytes() -> Vec<u8> {
        let data_len: u32 = 16_000;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&8_000u32.to_le_bytes());
        bytes.extend_from_slice(&16_000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(bytes.len() + data_len as usize, 0);
        bytes
    }

    #[tokio::test]
    async fn probes_wav_duration() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(&wav_bytes()).unwrap();

        let probe = SymphoniaProbe::new(Duration::from_secs(10));
        let secs = probe.probe(file.path(), "audio/wav").await.unwrap();

        assert!((secs - 1.0).abs() < 1e-6, "got {secs}");
    }

    #[tokio::test]
    async fn rejects_non_audio_content() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        file.write_all(b"definitely not audio").unwrap();

        let probe = SymphoniaProbe::new(Duration::from_secs(10));
        let result = probe.probe(file.path(), "audio/mpeg").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn missing_file_reports_open_error() {
        let probe = SymphoniaProbe::new(Duration::from_secs(10));
        let result = probe
            .probe(Path::new("/nonexistent/episode.mp3"), "audio/mpeg")
            .await;

        assert!(matches!(result, Err(ProbeError::Open { .. })));
    }

    #[tokio::test]
    async fn slow_probe_times_out() {
        let limit = Duration::from_millis(20);
        let result = bounded(limit, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1.0)
        })
        .await;

        assert!(matches!(result, Err(ProbeError::TimedOut(d)) if d == limit));
    }
}

use std::path::Path;

/// Media type assumed for files whose extension is not recognized
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Guess an audio media type from a file's extension
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "mp3" => Some("audio/mpeg"),
        "m4a" | "mp4" => Some("audio/mp4"),
        "aac" => Some("audio/aac"),
        "ogg" => Some("audio/ogg"),
        "opus" => Some("audio/opus"),
        "wav" => Some("audio/wav"),
        "flac" => Some("audio/flac"),
        _ => None,
    }
}

/// Map audio media types to the extension a demuxer would expect
pub fn extension_for_media_type(media_type: &str) -> Option<&'static str> {
    match media_type.to_lowercase().as_str() {
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some("m4a"),
        "audio/aac" => Some("aac"),
        "audio/ogg" => Some("ogg"),
        "audio/opus" => Some("opus"),
        "audio/wav" | "audio/x-wav" => Some("wav"),
        "audio/flac" | "audio/x-flac" => Some("flac"),
        _ => None,
    }
}

pub fn is_audio(media_type: &str) -> bool {
    media_type.trim().to_lowercase().starts_with("audio/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_audio_types() {
        assert_eq!(media_type_for_path(Path::new("ep1.mp3")), Some("audio/mpeg"));
        assert_eq!(media_type_for_path(Path::new("/tmp/Show.M4A")), Some("audio/mp4"));
        assert_eq!(media_type_for_path(Path::new("mix.flac")), Some("audio/flac"));
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(media_type_for_path(Path::new("notes.txt")), None);
        assert_eq!(media_type_for_path(Path::new("README")), None);
    }

    #[test]
    fn media_type_to_extension() {
        assert_eq!(extension_for_media_type("audio/x-wav"), Some("wav"));
        assert_eq!(extension_for_media_type("AUDIO/MPEG"), Some("mp3"));
        assert_eq!(extension_for_media_type("video/mp4"), None);
    }

    #[test]
    fn audio_check_uses_prefix() {
        assert!(is_audio("audio/mpeg"));
        assert!(is_audio("Audio/Ogg"));
        assert!(!is_audio("video/mp4"));
        assert!(!is_audio("text/plain"));
        assert!(!is_audio(UNKNOWN_MEDIA_TYPE));
    }
}

//! Media type lookup for uploads

use std::fmt;
use std::path::Path;

/// Media formats the API accepts, with their canonical MIME type and extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Aac,
    Aiff,
    Amr,
    Flac,
    M4a,
    Mp3,
    Ogg,
    Opus,
    Wav,
    Webm,
    Mp4,
    Mov,
}

const ALL: &[MediaType] = &[
    MediaType::Aac,
    MediaType::Aiff,
    MediaType::Amr,
    MediaType::Flac,
    MediaType::M4a,
    MediaType::Mp3,
    MediaType::Ogg,
    MediaType::Opus,
    MediaType::Wav,
    MediaType::Webm,
    MediaType::Mp4,
    MediaType::Mov,
];

impl MediaType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Aac => "audio/aac",
            Self::Aiff => "audio/aiff",
            Self::Amr => "audio/amr",
            Self::Flac => "audio/flac",
            Self::M4a => "audio/mp4",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Opus => "audio/opus",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Mp4 => "video/mp4",
            Self::Mov => "video/quicktime",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Aac => "aac",
            Self::Aiff => "aiff",
            Self::Amr => "amr",
            Self::Flac => "flac",
            Self::M4a => "m4a",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Opus => "opus",
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Mov => "mov",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "aif" => Some(Self::Aiff),
            "mpeg" | "mpga" => Some(Self::Mp3),
            "oga" => Some(Self::Ogg),
            "wave" => Some(Self::Wav),
            _ => ALL.iter().copied().find(|m| m.extension() == ext),
        }
    }

    /// Look up a MIME type, ignoring parameters such as `; codecs=opus`
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            "audio/mp3" => Some(Self::Mp3),
            "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/x-flac" => Some(Self::Flac),
            "audio/x-m4a" => Some(Self::M4a),
            "audio/x-aiff" => Some(Self::Aiff),
            _ => ALL.iter().copied().find(|m| m.as_str() == essence),
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a MIME type names audio or video content
pub fn is_media_mime(mime: &str) -> bool {
    let mime = mime.trim().to_lowercase();
    mime.starts_with("audio/") || mime.starts_with("video/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_and_extension() {
        assert_eq!(MediaType::Mp3.as_str(), "audio/mpeg");
        assert_eq!(MediaType::Mp3.extension(), "mp3");
        assert_eq!(MediaType::Mov.as_str(), "video/quicktime");
    }

    #[test]
    fn from_extension_handles_aliases() {
        assert_eq!(MediaType::from_extension(".MP3"), Some(MediaType::Mp3));
        assert_eq!(MediaType::from_extension("wave"), Some(MediaType::Wav));
        assert_eq!(MediaType::from_extension("txt"), None);
    }

    #[test]
    fn from_mime_ignores_parameters() {
        assert_eq!(MediaType::from_mime("audio/webm; codecs=opus"), Some(MediaType::Webm));
        assert_eq!(MediaType::from_mime("audio/mp3"), Some(MediaType::Mp3));
        assert_eq!(MediaType::from_mime("application/pdf"), None);
    }

    #[test]
    fn from_path_uses_extension() {
        assert_eq!(MediaType::from_path(Path::new("/tmp/call.flac")), Some(MediaType::Flac));
        assert_eq!(MediaType::from_path(Path::new("/tmp/noext")), None);
    }

    #[test]
    fn media_mime_classes() {
        assert!(is_media_mime("audio/mpeg"));
        assert!(is_media_mime("Video/MP4"));
        assert!(!is_media_mime("application/pdf"));
        assert!(!is_media_mime("text/plain"));
    }
}

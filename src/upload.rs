use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::analysis::Modality;

/// Largest recording accepted for inline upload (20 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please upload a video or audio file (got {mime_type}).")]
    UnsupportedType { mime_type: String },

    #[error("File size is too large ({size} bytes). Please use a file under 20MB.")]
    TooLarge { size: u64 },

    #[error("could not read recording: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone)]
enum Contents {
    Memory(Vec<u8>),
    /// Not read until the file has passed validation.
    Disk(PathBuf),
}

/// A file as picked by the user, before validation.
#[derive(Clone)]
pub struct RawFile {
    pub name: String,
    pub mime_type: String,
    size: u64,
    contents: Contents,
}

impl fmt::Debug for RawFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish()
    }
}

impl RawFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            contents: Contents::Memory(bytes),
        }
    }

    /// Describe a file on disk, inferring its MIME type from the extension.
    /// Only metadata is read here.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let size = fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            mime_type: mime_from_path(path).to_string(),
            size,
            contents: Contents::Disk(path.to_path_buf()),
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Load the bytes, reading at most one byte past the upload limit.
    fn load(self) -> io::Result<Vec<u8>> {
        match self.contents {
            Contents::Memory(bytes) => Ok(bytes),
            Contents::Disk(path) => {
                let mut bytes = Vec::new();
                File::open(&path)?
                    .take(MAX_UPLOAD_BYTES + 1)
                    .read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}

/// Guess a media MIME type from a file extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        "weba" => "audio/webm",
        _ => FALLBACK_MIME,
    }
}

/// Local copy of the media the user can open while the analysis runs.
///
/// The backing temp file is removed exactly once, when the preview is
/// dropped or explicitly released.
#[derive(Debug)]
pub struct Preview {
    file: NamedTempFile,
    url: String,
}

impl Preview {
    fn create(name: &str, bytes: &[u8]) -> io::Result<Self> {
        let suffix = Path::new(name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("speak-confident-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        let url = format!("file://{}", file.path().display());
        log::debug!("Allocated preview {url}");
        Ok(Self { file, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Remove the backing file now, reporting any error instead of
    /// swallowing it the way `Drop` has to.
    pub fn release(self) -> io::Result<()> {
        log::debug!("Releasing preview {}", self.url);
        self.file.close()
    }
}

/// A validated recording, owned by the controller for one analysis attempt.
#[derive(Debug)]
pub struct UploadFile {
    pub name: String,
    /// Trimmed and lowercased; this is what gets sent to Gemini.
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub preview: Preview,
    pub modality: Modality,
}

impl UploadFile {
    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }
}

/// Validate a picked file and allocate its preview.
///
/// Type is checked before size, and both before any file contents are
/// read. No network activity happens here.
pub fn select_file(raw: RawFile) -> Result<UploadFile, ValidationError> {
    let mime_type = raw.mime_type.trim().to_ascii_lowercase();
    let Some(modality) = Modality::from_mime(&mime_type) else {
        return Err(ValidationError::UnsupportedType {
            mime_type: raw.mime_type,
        });
    };

    if raw.size() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size: raw.size() });
    }

    let name = raw.name.clone();
    let bytes = raw.load()?;
    let size = bytes.len() as u64;
    // The file may have grown since its metadata was read.
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size });
    }

    let preview = Preview::create(&name, &bytes)?;
    log::info!(
        "Accepted {name} ({mime_type}, {:.1} MB)",
        size as f64 / 1_048_576.0
    );

    Ok(UploadFile {
        name,
        mime_type,
        bytes,
        preview,
        modality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(mime: &str, size: usize) -> RawFile {
        RawFile::new("talk.bin", mime, vec![0u8; size])
    }

    #[test]
    fn rejects_non_media_types() {
        for mime in ["image/png", "text/plain", "application/pdf", "", "videos/mp4"] {
            let err = select_file(raw(mime, 16)).unwrap_err();
            assert!(
                matches!(err, ValidationError::UnsupportedType { .. }),
                "{mime} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_oversized_files_of_any_type() {
        let size = MAX_UPLOAD_BYTES as usize + 1;
        let err = select_file(raw("audio/mpeg", size)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        let err = select_file(raw("video/mp4", size)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn accepts_file_at_limit() {
        let file = select_file(raw("audio/wav", MAX_UPLOAD_BYTES as usize)).unwrap();
        assert_eq!(file.modality, Modality::Audio);
    }

    #[test]
    fn accepted_file_gets_preview_that_is_released_on_drop() {
        let file = select_file(RawFile::new("talk.mp4", "video/mp4", b"frames".to_vec())).unwrap();
        assert_eq!(file.modality, Modality::Video);
        assert!(file.preview_url().starts_with("file://"));
        assert!(file.preview_url().ends_with(".mp4"));

        let path = file.preview.file.path().to_path_buf();
        assert_eq!(fs::read(&path).unwrap(), b"frames");
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn explicit_release_removes_preview() {
        let file = select_file(raw("audio/ogg", 4)).unwrap();
        let path = file.preview.file.path().to_path_buf();
        file.preview.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn declared_type_is_normalized_before_use() {
        let file = select_file(RawFile::new("talk.mp4", " Video/MP4 ", b"x".to_vec())).unwrap();
        assert_eq!(file.modality, Modality::Video);
        assert_eq!(file.mime_type, "video/mp4");
    }

    #[test]
    fn mime_is_inferred_from_extension() {
        assert_eq!(mime_from_path(Path::new("a/talk.MP4")), "video/mp4");
        assert_eq!(mime_from_path(Path::new("talk.mov")), "video/quicktime");
        assert_eq!(mime_from_path(Path::new("talk.mp3")), "audio/mpeg");
        assert_eq!(mime_from_path(Path::new("talk.wav")), "audio/wav");
        assert_eq!(mime_from_path(Path::new("notes.txt")), FALLBACK_MIME);
        assert_eq!(mime_from_path(Path::new("noext")), FALLBACK_MIME);
    }

    #[test]
    fn from_path_reads_metadata_and_bytes_load_on_accept() {
        let mut tmp = tempfile::Builder::new().suffix(".m4a").tempfile().unwrap();
        tmp.write_all(b"abc").unwrap();
        tmp.flush().unwrap();

        let raw = RawFile::from_path(tmp.path()).unwrap();
        assert_eq!(raw.mime_type, "audio/mp4");
        assert_eq!(raw.size(), 3);
        assert!(raw.name.ends_with(".m4a"));
        assert!(matches!(raw.contents, Contents::Disk(_)));

        let file = select_file(raw).unwrap();
        assert_eq!(file.bytes, b"abc");
    }

    #[test]
    fn huge_file_on_disk_is_rejected_without_reading_it() {
        let tmp = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        // Sparse: no blocks are written, so this stays cheap on disk.
        tmp.as_file().set_len(512 * 1024 * 1024).unwrap();

        let raw = RawFile::from_path(tmp.path()).unwrap();
        assert_eq!(raw.size(), 512 * 1024 * 1024);
        assert!(matches!(raw.contents, Contents::Disk(_)));

        let err = select_file(raw).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooLarge { size } if size == 512 * 1024 * 1024
        ));
    }

    #[test]
    fn file_that_grew_past_the_limit_is_rejected_after_bounded_read() {
        let tmp = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        let raw = RawFile::from_path(tmp.path()).unwrap();
        assert_eq!(raw.size(), 0);

        tmp.as_file().set_len(MAX_UPLOAD_BYTES + 4096).unwrap();
        let err = select_file(raw).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooLarge { size } if size == MAX_UPLOAD_BYTES + 1
        ));
    }
}

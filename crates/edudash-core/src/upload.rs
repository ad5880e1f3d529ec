// ── Asset upload prechecks ──
//
// Size and type limits are enforced locally before any bytes leave the
// machine. The backend enforces its own limits too; a rejection there
// surfaces as an API error on the individual asset.

use std::fmt;
use std::path::{Path, PathBuf};

use edudash_api::{AssetSlot, UploadPart};

use crate::error::CoreError;

/// Which media slot of a record an asset fills.
pub type AssetKind = AssetSlot;

pub const MIB: u64 = 1024 * 1024;
pub const MAX_IMAGE_BYTES: u64 = 5 * MIB;
pub const MAX_VIDEO_BYTES: u64 = 500 * MIB;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
const VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime"];

pub fn max_bytes(kind: AssetKind) -> u64 {
    match kind {
        AssetKind::Image => MAX_IMAGE_BYTES,
        AssetKind::Video => MAX_VIDEO_BYTES,
    }
}

pub fn accepted_types(kind: AssetKind) -> &'static [&'static str] {
    match kind {
        AssetKind::Image => IMAGE_TYPES,
        AssetKind::Video => VIDEO_TYPES,
    }
}

/// MIME type from the file extension, case-insensitively.
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(mime)
}

/// A local file staged for upload into one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    pub kind: AssetKind,
    pub path: PathBuf,
    pub file_name: String,
    pub mime: Option<&'static str>,
    pub size: u64,
}

impl AssetFile {
    /// Stat `path` and infer its type. Does not read the contents.
    pub async fn from_path(kind: AssetKind, path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let meta = tokio::fs::metadata(&path).await.map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::with_size(kind, path, meta.len()))
    }

    /// Build from an already known size.
    pub fn with_size(kind: AssetKind, path: PathBuf, size: u64) -> Self {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_owned();
        Self {
            kind,
            mime: mime_from_path(&path),
            path,
            file_name,
            size,
        }
    }

    /// Read the file into a multipart part. Call [`precheck`] first.
    pub async fn read_part(&self) -> Result<UploadPart, CoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CoreError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(UploadPart {
            file_name: self.file_name.clone(),
            mime: self.mime.unwrap_or("application/octet-stream").to_owned(),
            bytes,
        })
    }
}

/// Why a file was refused before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    TooLarge { size: u64, limit: u64 },
    UnsupportedType { mime: String },
    UnknownType,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRejection {
    pub kind: AssetKind,
    pub file_name: String,
    pub reason: RejectReason,
}

impl fmt::Display for AssetRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} rejected: ", self.kind, self.file_name)?;
        match &self.reason {
            RejectReason::TooLarge { size, limit } => write!(
                f,
                "{} exceeds the {} limit",
                human_size(*size),
                human_size(*limit)
            ),
            RejectReason::UnsupportedType { mime } => write!(
                f,
                "{mime} is not accepted (expected {})",
                accepted_types(self.kind).join(", ")
            ),
            RejectReason::UnknownType => f.write_str("file type could not be determined"),
            RejectReason::Empty => f.write_str("file is empty"),
        }
    }
}

impl std::error::Error for AssetRejection {}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn human_size(bytes: u64) -> String {
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Check type and size against the slot's limits.
pub fn precheck(file: &AssetFile) -> Result<(), AssetRejection> {
    let reject = |reason| AssetRejection {
        kind: file.kind,
        file_name: file.file_name.clone(),
        reason,
    };

    let Some(mime) = file.mime else {
        return Err(reject(RejectReason::UnknownType));
    };
    if !accepted_types(file.kind).contains(&mime) {
        return Err(reject(RejectReason::UnsupportedType {
            mime: mime.to_owned(),
        }));
    }
    if file.size == 0 {
        return Err(reject(RejectReason::Empty));
    }
    let limit = max_bytes(file.kind);
    if file.size > limit {
        return Err(reject(RejectReason::TooLarge {
            size: file.size,
            limit,
        }));
    }
    Ok(())
}

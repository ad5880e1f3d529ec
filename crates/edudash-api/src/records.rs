// Course / program record endpoints
//
// JSON record updates and per-asset multipart uploads. The two are
// independent requests: the caller decides how to report a failed upload
// after a successful record update.

use serde::Serialize;
use strum::{AsRefStr, Display};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

/// Which admin collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Course,
    Program,
}

impl RecordKind {
    /// Collection path segment (`courses` / `programs`).
    pub fn collection(self) -> &'static str {
        match self {
            Self::Course => "courses",
            Self::Program => "programs",
        }
    }
}

/// Which asset slot of a record an upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AssetSlot {
    Image,
    Video,
}

/// A file ready to be sent as the `file` part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    /// Update a course or program record.
    ///
    /// `PUT admin/{courses|programs}/{id}` with the record as JSON.
    /// Returns the backend's echo of the record (loosely typed).
    pub async fn update_record<B>(
        &self,
        kind: RecordKind,
        id: &str,
        record: &B,
    ) -> Result<serde_json::Value, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint_segments(&["admin", kind.collection(), id])?;
        debug!(%kind, id, "updating record");
        self.put_data(url, record).await
    }

    /// Upload one asset for a record.
    ///
    /// `POST admin/{courses|programs}/{id}/{image|video}` with a multipart
    /// body whose single part is named `file`.
    pub async fn upload_asset(
        &self,
        kind: RecordKind,
        id: &str,
        slot: AssetSlot,
        part: UploadPart,
    ) -> Result<serde_json::Value, Error> {
        let url = self.endpoint_segments(&["admin", kind.collection(), id, slot.as_ref()])?;
        debug!(%kind, id, %slot, file = %part.file_name, bytes = part.bytes.len(), "uploading asset");

        let file_part = reqwest::multipart::Part::bytes(part.bytes)
            .file_name(part.file_name)
            .mime_str(&part.mime)
            .map_err(|e| Error::Upload {
                asset: slot.to_string(),
                message: format!("invalid MIME type '{}': {e}", part.mime),
            })?;
        let form = reqwest::multipart::Form::new().part("file", file_part);

        self.post_multipart(url, form).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use url::Url;

    fn client() -> ApiClient {
        ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://edu.example.com/api/").unwrap(),
        )
    }

    #[test]
    fn collection_segments() {
        assert_eq!(RecordKind::Course.collection(), "courses");
        assert_eq!(RecordKind::Program.collection(), "programs");
        assert_eq!(AssetSlot::Video.as_ref(), "video");
        assert_eq!(RecordKind::Program.to_string(), "program");
    }

    #[test]
    fn ids_are_encoded_as_one_path_segment() {
        let c = client();
        let url = c.endpoint_segments(&["admin", "courses", "42"]).unwrap();
        assert_eq!(url.as_str(), "https://edu.example.com/api/admin/courses/42");

        let url = c.endpoint_segments(&["admin", "courses", "a b"]).unwrap();
        assert_eq!(url.path(), "/api/admin/courses/a%20b");

        let url = c
            .endpoint_segments(&["admin", "programs", "a/b+c", AssetSlot::Image.as_ref()])
            .unwrap();
        assert_eq!(url.path(), "/api/admin/programs/a%2Fb+c/image");
    }
}

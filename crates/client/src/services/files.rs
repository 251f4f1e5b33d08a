//! Course material transfer against the courses service.
//!
//! Binary content travels as base64 strings inside JSON bodies in both
//! directions. Outbound: one single-shot asynchronous read of the local
//! file - it yields exactly once, with no partial reads and no retries -
//! then the textual payload goes out in the request body, bare, because the
//! service only accepts the transport form. Inbound: the listed payload is
//! strictly decoded before any byte reaches disk, so a malformed payload
//! writes nothing.
//!
//! Every operation takes a [`CancelHandle`]; a completion observed after the
//! owner cancelled is discarded instead of committed.
//!
//! No size cap is enforced at this layer; callers moving very large files
//! must impose their own limits.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use campus_core::{
    CourseId, FileId, SubjectId, decode_transport, encode_display, strip_display_prefix,
};

use crate::cancel::CancelHandle;
use crate::error::ClientError;
use crate::session::SessionStore;

use super::auth::{check, endpoint};

/// Outbound body for a file upload.
#[derive(Serialize)]
struct UploadRequest<'a> {
    name: &'a str,
    content: &'a str,
    #[serde(rename = "userId")]
    user_id: SubjectId,
}

/// One course file as listed by the service.
///
/// `content` is the bare transport payload; the service stores and returns
/// base64, never raw bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseFile {
    /// File id assigned by the service.
    pub id: FileId,
    /// Original file name.
    pub name: String,
    /// Bare transport payload.
    pub content: String,
    /// Uploader.
    #[serde(rename = "userId")]
    pub user_id: SubjectId,
    /// Owning course.
    #[serde(rename = "courseId")]
    pub course_id: CourseId,
}

/// File transfer pipeline over the courses service.
pub struct FileTransferService {
    http: reqwest::Client,
    courses_url: Url,
    session: Arc<SessionStore>,
}

impl FileTransferService {
    /// Create a transfer client over the courses service.
    #[must_use]
    pub fn new(http: reqwest::Client, courses_url: Url, session: Arc<SessionStore>) -> Self {
        Self {
            http,
            courses_url,
            session,
        }
    }

    /// Read a local file once and produce its self-describing display payload.
    ///
    /// This is the inline-display variant: a data URL carrying the media type
    /// guessed from the file extension. The read is single-shot; if it fails,
    /// no payload is produced.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::FileRead`] if the read fails, or
    /// [`ClientError::Cancelled`] if the owner went away before the result
    /// was committed.
    pub async fn read_display_payload(
        &self,
        path: &Path,
        cancel: &CancelHandle,
    ) -> Result<String, ClientError> {
        let bytes = read_once(path).await?;
        if cancel.is_cancelled() {
            warn!(path = %path.display(), "read completed after cancellation; discarding");
            return Err(ClientError::Cancelled);
        }
        Ok(encode_display(&bytes, media_type_for(path)))
    }

    /// Upload a local file to a course.
    ///
    /// The pipeline is read -> encode (display form) -> strip prefix ->
    /// send: the service expects bare encoded bytes, so the media-type
    /// declaration never crosses the network.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] without an established
    /// session, [`ClientError::FileRead`] if the local read fails (nothing is
    /// sent), [`ClientError::Network`]/[`ClientError::Api`] on service
    /// failure, and [`ClientError::Cancelled`] if the owner went away - in
    /// which case the completion is discarded.
    #[instrument(skip(self, cancel), fields(path = %path.display()))]
    pub async fn upload(
        &self,
        course_id: CourseId,
        path: &Path,
        cancel: &CancelHandle,
    ) -> Result<(), ClientError> {
        let identity = self
            .session
            .current()
            .identity
            .ok_or(ClientError::NotAuthenticated)?;

        let display = self.read_display_payload(path, cancel).await?;
        let bare = strip_display_prefix(&display)?;

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let url = endpoint(&self.courses_url, &format!("courses/{course_id}/files"))?;
        let response = self
            .http
            .post(url)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", identity.credential.as_str()),
            )
            .json(&UploadRequest {
                name: &name,
                content: bare,
                user_id: identity.claims.subject_id,
            })
            .send()
            .await?;
        check(response).await?;

        if cancel.is_cancelled() {
            warn!(%course_id, "upload completed after cancellation; discarding result");
            return Err(ClientError::Cancelled);
        }
        debug!(%course_id, name = %name, "file uploaded");
        Ok(())
    }

    /// List the files attached to a course.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`]/[`ClientError::Api`] on service
    /// failure, and [`ClientError::Cancelled`] if the owner went away.
    pub async fn list(
        &self,
        course_id: CourseId,
        cancel: &CancelHandle,
    ) -> Result<Vec<CourseFile>, ClientError> {
        let url = endpoint(&self.courses_url, &format!("courses/{course_id}/files"))?;
        let response = self.http.get(url).send().await?;
        let files: Vec<CourseFile> = check(response).await?.json().await?;
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        Ok(files)
    }

    /// Download one course file and write its decoded bytes to `dest`.
    ///
    /// The inbound payload is decoded strictly and in full before any write:
    /// a malformed payload aborts with [`ClientError::Decode`] and no partial
    /// file exists afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the course has no such file,
    /// [`ClientError::Decode`] on a malformed payload,
    /// [`ClientError::FileWrite`] if the local write fails, and
    /// [`ClientError::Cancelled`] if the owner went away before the write.
    #[instrument(skip(self, cancel), fields(dest = %dest.display()))]
    pub async fn download(
        &self,
        course_id: CourseId,
        file_id: FileId,
        dest: &Path,
        cancel: &CancelHandle,
    ) -> Result<PathBuf, ClientError> {
        let files = self.list(course_id, cancel).await?;
        let file = files
            .into_iter()
            .find(|f| f.id == file_id)
            .ok_or_else(|| ClientError::NotFound(format!("file {file_id} in course {course_id}")))?;

        let bytes = decode_transport(&file.content)?;

        if cancel.is_cancelled() {
            warn!(%file_id, "download completed after cancellation; discarding bytes");
            return Err(ClientError::Cancelled);
        }

        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|source| ClientError::FileWrite {
                path: dest.to_path_buf(),
                source,
            })?;
        debug!(%file_id, name = %file.name, len = bytes.len(), "file downloaded");
        Ok(dest.to_path_buf())
    }
}

/// Single-shot asynchronous file read: yields exactly once with the whole
/// content or fails with [`ClientError::FileRead`].
async fn read_once(path: &Path) -> Result<Vec<u8>, ClientError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ClientError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Guess a media type from the file extension.
///
/// Matches the material the portal actually serves; anything unknown falls
/// back to the opaque byte type.
fn media_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::encode_transport;

    #[test]
    fn test_media_type_guesses() {
        assert_eq!(media_type_for(Path::new("notes.txt")), "text/plain");
        assert_eq!(media_type_for(Path::new("slides.PDF")), "application/pdf");
        assert_eq!(media_type_for(Path::new("diagram.png")), "image/png");
        assert_eq!(media_type_for(Path::new("blob")), "application/octet-stream");
    }

    #[test]
    fn test_course_file_wire_shape() {
        let json = serde_json::json!({
            "id": 5,
            "name": "apunte.pdf",
            "content": encode_transport(&[0x00, 0xFF, 0x10]),
            "userId": 7,
            "courseId": 2,
        });
        let file: CourseFile = serde_json::from_value(json).expect("deserialize");
        assert_eq!(file.id, FileId::new(5));
        assert_eq!(file.user_id, SubjectId::new(7));
        assert_eq!(
            decode_transport(&file.content).expect("decode"),
            vec![0x00, 0xFF, 0x10]
        );
    }

    #[tokio::test]
    async fn test_read_once_missing_file() {
        let err = read_once(Path::new("/definitely/not/here.txt")).await;
        assert!(matches!(err, Err(ClientError::FileRead { .. })));
    }

    #[tokio::test]
    async fn test_display_payload_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("material.txt");
        tokio::fs::write(&path, b"hola").await.expect("write");

        let store = Arc::new(SessionStore::new(Arc::new(
            crate::session::record::MemoryCredentialStore::new(),
        )));
        let svc = FileTransferService::new(
            reqwest::Client::new(),
            Url::parse("http://localhost:8080").expect("url"),
            store,
        );

        let cancel = CancelHandle::new();
        let payload = svc
            .read_display_payload(&path, &cancel)
            .await
            .expect("payload");
        assert!(payload.starts_with("data:text/plain;base64,"));
        let bare = strip_display_prefix(&payload).expect("strip");
        assert_eq!(decode_transport(bare).expect("decode"), b"hola");
    }

    #[tokio::test]
    async fn test_display_payload_discarded_after_cancel() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("material.txt");
        tokio::fs::write(&path, b"hola").await.expect("write");

        let store = Arc::new(SessionStore::new(Arc::new(
            crate::session::record::MemoryCredentialStore::new(),
        )));
        let svc = FileTransferService::new(
            reqwest::Client::new(),
            Url::parse("http://localhost:8080").expect("url"),
            store,
        );

        let cancel = CancelHandle::new();
        cancel.cancel();
        let err = svc.read_display_payload(&path, &cancel).await;
        assert!(matches!(err, Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn test_upload_requires_session() {
        let store = Arc::new(SessionStore::new(Arc::new(
            crate::session::record::MemoryCredentialStore::new(),
        )));
        let svc = FileTransferService::new(
            reqwest::Client::new(),
            Url::parse("http://localhost:8080").expect("url"),
            store,
        );
        let err = svc
            .upload(CourseId::new(1), Path::new("whatever.txt"), &CancelHandle::new())
            .await;
        assert!(matches!(err, Err(ClientError::NotAuthenticated)));
    }
}

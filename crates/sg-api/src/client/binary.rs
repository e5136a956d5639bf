//! Attachment upload and download.
//!
//! These calls bypass the JSON-RPC envelope. Credentials travel as form
//! fields on upload and as the `_session_id` cookie on download.

use std::path::Path;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use shotgun_json_client::Response;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, ErrorKind, Result};

const UPLOAD_FILE_PATH: &str = "/upload/upload_file";
const UPLOAD_THUMBNAIL_PATH: &str = "/upload/publish_thumbnail";
const THUMBNAIL_URL_PATH: &str = "/upload/get_thumbnail_url";
const FILE_SERVE_PATH: &str = "/file_serve";

/// Options for [`ShotgunClient::upload`](super::ShotgunClient::upload).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Attachment field to link the file to. Without one the file is only
    /// attached to the entity.
    pub field_name: Option<String>,
    /// Display name of the attachment. Defaults to the file name.
    pub display_name: Option<String>,
    /// Comma separated tags.
    pub tag_list: Option<String>,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_tag_list(mut self, tag_list: impl Into<String>) -> Self {
        self.tag_list = Some(tag_list.into());
        self
    }
}

impl super::ShotgunClient {
    /// Upload a file and attach it to an entity. Returns the attachment id.
    #[instrument(skip(self, path, options), fields(file = %path.as_ref().display()))]
    pub async fn upload(
        &mut self,
        entity_type: &str,
        id: i64,
        path: impl AsRef<Path>,
        options: UploadOptions,
    ) -> Result<i64> {
        let path = path.as_ref();
        let (file_name, part) = file_part(path).await?;

        let mut form = self.upload_form(entity_type, id).part("file", part);
        if let Some(field_name) = options.field_name {
            form = form.text("field_name", field_name);
        }
        form = form.text("display_name", options.display_name.unwrap_or(file_name));
        if let Some(tag_list) = options.tag_list {
            form = form.text("tag_list", tag_list);
        }

        self.send_upload(UPLOAD_FILE_PATH, form).await
    }

    /// Upload an image as the entity's thumbnail. Returns the attachment id.
    #[instrument(skip(self, path), fields(file = %path.as_ref().display()))]
    pub async fn upload_thumbnail(
        &mut self,
        entity_type: &str,
        id: i64,
        path: impl AsRef<Path>,
        tag_list: Option<&str>,
    ) -> Result<i64> {
        let (_, part) = file_part(path.as_ref()).await?;

        let mut form = self.upload_form(entity_type, id).part("thumb_image", part);
        if let Some(tag_list) = tag_list {
            form = form.text("tag_list", tag_list.to_string());
        }

        self.send_upload(UPLOAD_THUMBNAIL_PATH, form).await
    }

    /// Download an attachment into memory.
    #[instrument(skip(self))]
    pub async fn download_attachment(&mut self, attachment_id: i64) -> Result<Bytes> {
        let response = self.open_attachment(attachment_id).await?;

        let mut body = BytesMut::new();
        let mut stream = Box::pin(response.bytes_stream());
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_error(attachment_id, e))?;
            body.extend_from_slice(&chunk);
        }

        let body = body.freeze();
        reject_html(attachment_id, &body)?;
        debug!(bytes = body.len(), "Attachment downloaded");
        Ok(body)
    }

    /// Stream an attachment to a file. Returns the number of bytes written.
    ///
    /// The file is removed again if the download fails part way.
    #[instrument(skip(self, dest), fields(file = %dest.as_ref().display()))]
    pub async fn download_attachment_to(
        &mut self,
        attachment_id: i64,
        dest: impl AsRef<Path>,
    ) -> Result<u64> {
        let dest = dest.as_ref();
        let response = self.open_attachment(attachment_id).await?;
        let mut file = tokio::fs::File::create(dest).await?;

        let written = match write_body(attachment_id, response, &mut file).await {
            Ok(written) => written,
            Err(err) => {
                drop(file);
                if let Err(remove_err) = tokio::fs::remove_file(dest).await {
                    warn!(error = %remove_err, "Could not remove partial download");
                }
                return Err(err);
            }
        };

        info!(bytes = written, "Attachment saved");
        Ok(written)
    }

    /// Resolve the current thumbnail URL of an entity.
    #[instrument(skip(self))]
    pub async fn thumbnail_url(&mut self, entity_type: &str, id: i64) -> Result<String> {
        let request = self
            .http
            .get(THUMBNAIL_URL_PATH)
            .query("entity_type", entity_type)
            .query("entity_id", id.to_string());
        let body = self.http.execute(request).await?.text().await?;

        let mut lines = body.lines();
        let code = lines.next().unwrap_or_default().trim();
        let detail = lines.next().unwrap_or_default().trim();
        match code {
            "1" => Ok(self.endpoint().url(detail)),
            "0" => Err(Error::new(ErrorKind::Fault {
                message: shotgun_json_client::sanitize_error_message(detail),
                error_code: None,
            })),
            other => Err(Error::new(ErrorKind::UnexpectedResult(format!(
                "thumbnail url lookup returned code '{other}'"
            )))),
        }
    }

    fn upload_form(&self, entity_type: &str, id: i64) -> Form {
        let credentials = self.session.credentials();
        let mut form = Form::new()
            .text("entity_type", entity_type.to_string())
            .text("entity_id", id.to_string())
            .text("script_name", credentials.script_name().to_string())
            .text("script_key", credentials.script_key().to_string());
        if let Some(session_uuid) = self.session.session_uuid() {
            form = form.text("session_uuid", session_uuid.to_string());
        }
        form
    }

    async fn send_upload(&mut self, path: &str, form: Form) -> Result<i64> {
        let request = self.http.post(path).multipart(form);
        let body = self
            .http
            .execute(request)
            .await
            .map_err(upload_error)?
            .text()
            .await
            .map_err(upload_error)?;

        let attachment_id = parse_upload_reply(&body)?;
        info!(attachment_id, "Upload complete");
        Ok(attachment_id)
    }

    async fn open_attachment(&mut self, attachment_id: i64) -> Result<Response> {
        let token = self.session.ensure_token(&mut self.http).await?;
        let request = self
            .http
            .get(&format!("{FILE_SERVE_PATH}/{attachment_id}"))
            .cookie("_session_id", &token);
        self.http
            .execute(request)
            .await
            .map_err(|e| download_error(attachment_id, e))
    }
}

async fn file_part(path: &Path) -> Result<(String, Part)> {
    if !path.is_file() {
        return Err(Error::new(ErrorKind::InvalidInput(format!(
            "{} is not a file",
            path.display()
        ))));
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let data = tokio::fs::read(path).await?;
    let part = Part::bytes(data)
        .file_name(file_name.clone())
        .mime_str(mime_type(path))
        .map_err(|e| Error::with_source(ErrorKind::Upload(e.to_string()), e))?;
    Ok((file_name, part))
}

fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("tif" | "tiff") => "image/tiff",
        Some("mov") => "video/quicktime",
        Some("mp4") => "video/mp4",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Upload replies are `1` on success, optionally followed by `:<id>` on
/// the first line.
fn parse_upload_reply(body: &str) -> Result<i64> {
    let first_line = body.lines().next().unwrap_or_default().trim();
    if !first_line.starts_with('1') {
        return Err(Error::new(ErrorKind::Upload(format!(
            "server did not accept the file: {}",
            shotgun_json_client::sanitize_error_message(body)
        ))));
    }
    match first_line.split_once(':') {
        Some((_, id)) => id.trim().parse().map_err(|_| {
            Error::new(ErrorKind::Upload(format!(
                "attachment id '{id}' is not a number"
            )))
        }),
        None => Ok(0),
    }
}

async fn write_body(attachment_id: i64, response: Response, file: &mut tokio::fs::File) -> Result<u64> {
    let mut written = 0u64;
    let mut head = BodyHead::new(attachment_id);
    let mut stream = Box::pin(response.bytes_stream());
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| download_error(attachment_id, e))?;
        if let Some(ready) = head.push(chunk)? {
            file.write_all(&ready).await?;
            written += ready.len() as u64;
        }
    }
    if let Some(ready) = head.finish()? {
        file.write_all(&ready).await?;
        written += ready.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

const HTML_MARKER: &[u8] = b"<!DOCTYPE";

/// Holds back the start of a streamed download until enough of it has
/// arrived to tell a login page from file content.
#[derive(Debug)]
struct BodyHead {
    attachment_id: i64,
    pending: Option<BytesMut>,
}

impl BodyHead {
    fn new(attachment_id: i64) -> Self {
        Self {
            attachment_id,
            pending: Some(BytesMut::new()),
        }
    }

    /// Bytes that are ready to be written, if any.
    fn push(&mut self, chunk: Bytes) -> Result<Option<Bytes>> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(Some(chunk));
        };
        pending.extend_from_slice(&chunk);
        match pending.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(start) if pending.len() - start >= HTML_MARKER.len() => self.release(),
            _ => Ok(None),
        }
    }

    /// Whatever is still held back once the body has ended.
    fn finish(&mut self) -> Result<Option<Bytes>> {
        self.release()
    }

    fn release(&mut self) -> Result<Option<Bytes>> {
        match self.pending.take() {
            Some(head) => {
                reject_html(self.attachment_id, &head)?;
                Ok(Some(head.freeze()))
            }
            None => Ok(None),
        }
    }
}

// The server answers unknown or forbidden attachments with a login page.
fn reject_html(attachment_id: i64, body: &[u8]) -> Result<()> {
    let start = body.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(body.len());
    if body[start..].starts_with(HTML_MARKER) {
        return Err(Error::new(ErrorKind::Download(format!(
            "attachment {attachment_id} is not accessible"
        ))));
    }
    Ok(())
}

fn upload_error(err: shotgun_json_client::Error) -> Error {
    Error::with_source(ErrorKind::Upload(err.to_string()), err)
}

fn download_error(attachment_id: i64, err: shotgun_json_client::Error) -> Error {
    Error::with_source(
        ErrorKind::Download(format!("attachment {attachment_id}: {err}")),
        err,
    )
}

use crate::{
    mime::content_mime_type,
    security::contains_resource,
    uri::{normalize_request_path, REMOTE_HOST_SCHEME},
};
use async_trait::async_trait;
use serde_json::json;
use std::io;
use tracing::warn;
use url::Url;

/// Outcome of a resource load.
///
/// Denial and read failure are expected outcomes of serving untrusted views,
/// not system faults, so they travel as variants rather than errors. Read
/// failures are collapsed to a bare `Failed`: the underlying I/O detail is
/// logged here and deliberately kept away from the requesting view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceResponse {
    Success { data: Vec<u8>, mime_type: String },
    Failed,
    AccessDenied,
}

/// File-read capability injected into the loader. Production wires in
/// [`LocalFileReader`]; tests substitute in-memory readers.
#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read(&self, resource: &Url) -> io::Result<Vec<u8>>;
}

/// Reads `file://` URIs off the local disk.
pub struct LocalFileReader;

#[async_trait]
impl FileReader for LocalFileReader {
    async fn read(&self, resource: &Url) -> io::Result<Vec<u8>> {
        let path = resource.to_file_path().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a local file uri: {resource}"),
            )
        })?;
        tokio::fs::read(path).await
    }
}

/// Resolves a requested resource URI against the permitted roots and, when
/// some root contains it, reads it.
///
/// The request is normalized first (webview-resource URIs decode to the real
/// URI they embed), then the roots are scanned in order and the first
/// containing root wins. When `extension_location` carries the remote-host
/// scheme the read is delegated to a redirect URI on that host, with the
/// MIME type still computed from the original request. A request no root
/// contains is denied before the reader is ever invoked; at most one read
/// happens per call.
pub async fn load_local_resource(
    request: &Url,
    reader: &dyn FileReader,
    extension_location: Option<&Url>,
    roots: &[Url],
) -> ResourceResponse {
    let normalized = normalize_request_path(request);

    for root in roots {
        if !contains_resource(root, &normalized) {
            continue;
        }

        match extension_location {
            Some(ext) if ext.scheme() == REMOTE_HOST_SCHEME => {
                let redirected = match remote_redirect_uri(ext, &normalized) {
                    Some(uri) => uri,
                    None => return ResourceResponse::Failed,
                };
                return resolve_content(reader, &redirected, content_mime_type(request)).await;
            }
            _ => {
                return resolve_content(reader, &normalized, content_mime_type(&normalized)).await;
            }
        }
    }

    ResourceResponse::AccessDenied
}

/// Redirect target for resources owned by a remote-host extension: same
/// authority as the extension, fixed `/vscode-resource` path, and the real
/// resource path tucked into a JSON query payload.
fn remote_redirect_uri(extension_location: &Url, normalized: &Url) -> Option<Url> {
    let mut redirected = Url::parse(&format!(
        "{}://{}/vscode-resource",
        REMOTE_HOST_SCHEME,
        authority(extension_location)
    ))
    .ok()?;
    let payload = json!({ "requestResourcePath": normalized.path() }).to_string();
    redirected.set_query(Some(&payload));
    Some(redirected)
}

fn authority(uri: &Url) -> String {
    match (uri.host_str(), uri.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

async fn resolve_content(
    reader: &dyn FileReader,
    resource: &Url,
    mime_type: String,
) -> ResourceResponse {
    match reader.read(resource).await {
        Ok(data) => ResourceResponse::Success { data, mime_type },
        Err(err) => {
            warn!(resource = %resource, error = %err, "resource read failed");
            ResourceResponse::Failed
        }
    }
}

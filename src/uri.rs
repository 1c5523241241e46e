use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

/// Scheme used by embedded content views to smuggle a real resource URI
/// through the view's origin sandbox.
pub const WEBVIEW_RESOURCE_SCHEME: &str = "vscode-webview-resource";

/// Scheme marking an extension as living on a remote host.
pub const REMOTE_HOST_SCHEME: &str = "vscode-remote";

/// Rewrites a webview-resource URI into the real URI it encodes.
///
/// The webview scheme packs both the inner scheme and the rest of the URI
/// into its path as consecutive segments (`/https//example.com/x`), so
/// decoding is a single segment rewrite back to `https://example.com/x`.
/// The original query and fragment are carried over. URIs with any other
/// scheme, and paths that do not match the encoding, come back unchanged.
pub fn normalize_request_path(request: &Url) -> Url {
    if request.scheme() != WEBVIEW_RESOURCE_SCHEME {
        return request.clone();
    }
    decode_embedded_uri(request).unwrap_or_else(|| request.clone())
}

fn decode_embedded_uri(request: &Url) -> Option<Url> {
    let re = Regex::new(r"^/+(\w+)//").ok()?;
    let path = request.path();
    if !re.is_match(path) {
        return None;
    }
    let rewritten = re.replace(path, "$1://");
    let mut inner = Url::parse(&rewritten).ok()?;
    inner.set_query(match request.query() {
        Some(q) if !q.is_empty() => Some(q),
        _ => None,
    });
    inner.set_fragment(request.fragment());
    Some(inner)
}

/// Renders a URI as a filesystem-style path string.
///
/// A `file://` URI with a non-empty host denotes a network share and renders
/// in UNC form (`\\host\dir\file`); everything else is the percent-decoded
/// URI path. Containment checks compare these strings, so the rendering must
/// be stable for a given URI.
pub fn fs_path(uri: &Url) -> String {
    let decoded = percent_decode_str(uri.path()).decode_utf8_lossy();
    match uri.host_str() {
        Some(host) if uri.scheme() == "file" && !host.is_empty() => {
            format!("\\\\{}{}", host, decoded.replace('/', "\\"))
        }
        _ => decoded.into_owned(),
    }
}

/// UNC share path: `\\server\share...` with a real server segment.
pub fn is_unc(path: &str) -> bool {
    let Some(rest) = path.strip_prefix("\\\\") else {
        return false;
    };
    match rest.split('\\').next() {
        Some(server) => !server.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_webview_uri_unchanged() {
        let uri = Url::parse("https://example.com/a/b?x=1#frag").unwrap();
        assert_eq!(normalize_request_path(&uri), uri);
    }

    #[test]
    fn normalize_is_idempotent() {
        let uri = Url::parse("file:///home/user/page.html").unwrap();
        let once = normalize_request_path(&uri);
        let twice = normalize_request_path(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn webview_uri_decodes_embedded_scheme() {
        let uri = Url::parse("vscode-webview-resource:/https//example.com/x?k=v#top").unwrap();
        let normalized = normalize_request_path(&uri);
        assert_eq!(normalized.scheme(), "https");
        assert_eq!(normalized.host_str(), Some("example.com"));
        assert_eq!(normalized.path(), "/x");
        assert_eq!(normalized.query(), Some("k=v"));
        assert_eq!(normalized.fragment(), Some("top"));
    }

    #[test]
    fn webview_uri_decodes_file_scheme() {
        let uri = Url::parse("vscode-webview-resource:/file///home/user/media/img.png").unwrap();
        let normalized = normalize_request_path(&uri);
        assert_eq!(normalized.scheme(), "file");
        assert_eq!(normalized.path(), "/home/user/media/img.png");
    }

    #[test]
    fn malformed_webview_path_returned_as_is() {
        let uri = Url::parse("vscode-webview-resource:no-embedded-scheme-here").unwrap();
        assert_eq!(normalize_request_path(&uri), uri);
    }

    #[test]
    fn fs_path_decodes_percent_escapes() {
        let uri = Url::parse("file:///tmp/with%20space.txt").unwrap();
        assert_eq!(fs_path(&uri), "/tmp/with space.txt");
    }

    #[test]
    fn fs_path_renders_unc_for_file_host() {
        let uri = Url::parse("file://server/share/doc.txt").unwrap();
        assert_eq!(fs_path(&uri), "\\\\server\\share\\doc.txt");
    }

    #[test]
    fn unc_detection() {
        assert!(is_unc("\\\\server\\share"));
        assert!(!is_unc("\\\\"));
        assert!(!is_unc("/home/user"));
        assert!(!is_unc("C:\\Users"));
    }
}

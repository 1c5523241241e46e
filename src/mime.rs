use url::Url;

/// Resolves the content type a view should use to interpret a resource,
/// keyed off the URI's path extension. Unknown extensions fall back to
/// `text/plain` so the view renders something inspectable rather than
/// triggering a download.
pub fn content_mime_type(uri: &Url) -> String {
    mime_guess::from_path(uri.path())
        .first_raw()
        .unwrap_or("text/plain")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mime(s: &str) -> String {
        content_mime_type(&Url::parse(s).unwrap())
    }

    #[test]
    fn common_web_types() {
        assert_eq!(mime("file:///a/index.html"), "text/html");
        assert_eq!(mime("file:///a/site.css"), "text/css");
        assert_eq!(mime("file:///a/img.svg"), "image/svg+xml");
    }

    #[test]
    fn unknown_extension_falls_back_to_text() {
        assert_eq!(mime("file:///a/notes.xyzzy"), "text/plain");
        assert_eq!(mime("file:///a/no-extension"), "text/plain");
    }
}

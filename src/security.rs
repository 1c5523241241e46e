use crate::errors::AppError;
use crate::uri::{fs_path, is_unc};
use axum::http::HeaderMap;
use url::Url;

/// Embedded views present their origin on resource fetches; anything not on
/// the allowlist is refused before the loader runs.
pub fn check_origin(headers: &HeaderMap, allowed: &[String]) -> Result<(), AppError> {
    let origin = headers
        .get("Origin")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::OriginDenied)?;
    if allowed.iter().any(|o| o == origin) {
        Ok(())
    } else {
        Err(AppError::OriginDenied)
    }
}

/// Decides whether `resource` lies beneath `root`.
///
/// The comparison is a prefix check over filesystem-style renderings of both
/// URIs, with a trailing separator forced onto the root so that `/root2`
/// never matches a root of `/root`. When both sides are UNC share paths the
/// comparison is case-insensitive, matching share filesystem semantics;
/// otherwise it is case-sensitive. No symlink resolution and no `..`
/// normalization happens here: callers hand in pre-normalized URIs.
pub fn contains_resource(root: &Url, resource: &Url) -> bool {
    let root_fs = fs_path(root);
    let sep = if is_unc(&root_fs) { '\\' } else { '/' };

    let mut root_path = root_fs.clone();
    if !root_path.ends_with(sep) {
        root_path.push(sep);
    }
    let mut resource_path = fs_path(resource);

    if is_unc(&root_fs) && is_unc(&resource_path) {
        root_path = root_path.to_lowercase();
        resource_path = resource_path.to_lowercase();
    }

    resource_path.starts_with(&root_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn path_under_root_is_contained() {
        assert!(contains_resource(
            &u("file:///srv/assets"),
            &u("file:///srv/assets/css/site.css")
        ));
    }

    #[test]
    fn sibling_with_shared_prefix_is_not_contained() {
        assert!(!contains_resource(&u("file:///a/b"), &u("file:///a/bc")));
    }

    #[test]
    fn root_itself_is_not_contained() {
        assert!(!contains_resource(&u("file:///a/b"), &u("file:///a/b")));
    }

    #[test]
    fn trailing_slash_on_root_is_equivalent() {
        assert!(contains_resource(
            &u("file:///a/b/"),
            &u("file:///a/b/c.txt")
        ));
    }

    #[test]
    fn non_unc_comparison_is_case_sensitive() {
        assert!(!contains_resource(
            &u("file:///srv/Assets"),
            &u("file:///srv/assets/site.css")
        ));
    }

    #[test]
    fn origin_allowlist_enforced() {
        let mut h = HeaderMap::new();
        h.insert("Origin", "https://good.example".parse().unwrap());
        assert!(check_origin(&h, &["https://good.example".into()]).is_ok());
        assert!(check_origin(&h, &["https://bad.example".into()]).is_err());
        assert!(check_origin(&HeaderMap::new(), &["https://good.example".into()]).is_err());
    }

    #[test]
    fn unc_comparison_is_case_insensitive() {
        assert!(contains_resource(
            &u("file://Server/Share"),
            &u("file://server/share/doc.txt")
        ));
    }
}

#[cfg(all(test, feature = "proptests"))]
mod prop {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn child_segment_is_always_contained(seg in "[a-z0-9]{1,12}") {
            let root = Url::parse("file:///var/roots/base").unwrap();
            let child = Url::parse(&format!("file:///var/roots/base/{seg}")).unwrap();
            prop_assert!(contains_resource(&root, &child));
        }

        #[test]
        fn suffix_without_separator_is_never_contained(suffix in "[a-z0-9]{1,12}") {
            let root = Url::parse("file:///var/roots/base").unwrap();
            let sibling = Url::parse(&format!("file:///var/roots/base{suffix}")).unwrap();
            prop_assert!(!contains_resource(&root, &sibling));
        }
    }
}

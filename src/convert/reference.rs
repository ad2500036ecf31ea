//! Classification and normalization of `src`/`href` values.
//!
//! The locator and the rewriter must agree on how a raw attribute value maps
//! to a site-relative key, so both go through [`normalize`].

/// Attributes that may carry asset references.
pub const ASSET_ATTRS: [&str; 2] = ["src", "href"];

/// File extensions treated as copyable assets.
pub const ASSET_EXTS: [&str; 13] = [
    "css", "js", "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "woff", "woff2", "ttf", "otf",
];

/// Prefixes of values that never point at a local file.
const REMOTE_PREFIXES: [&str; 6] = ["http://", "https://", "//", "mailto:", "tel:", "#"];

/// Check whether a reference is remote or otherwise not a file on disk.
///
/// Empty values are not remote; they simply never resolve.
#[inline]
pub fn is_remote(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && REMOTE_PREFIXES.iter().any(|p| value.starts_with(p))
}

/// Normalize a reference into a forward-slash, site-relative key.
///
/// Converts backslashes, then strips any run of leading `./` and `/`.
/// Parent segments (`../`) are kept as-is.
///
/// ```ignore
/// assert_eq!(normalize("./css/site.css"), "css/site.css");
/// assert_eq!(normalize("/img\\logo.png"), "img/logo.png");
/// ```
pub fn normalize(value: &str) -> String {
    let value = value.trim().replace('\\', "/");
    let mut rest = value.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }
    rest.to_string()
}

/// Last path segment of a normalized key.
#[inline]
pub fn base_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Lowercase extension of a normalized key, if any.
pub fn extension(key: &str) -> Option<String> {
    let name = base_name(key);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check whether a normalized key names an allow-listed asset type.
#[inline]
pub fn is_asset(key: &str) -> bool {
    extension(key).is_some_and(|ext| ASSET_EXTS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_values() {
        for value in [
            "http://example.com/a.css",
            "https://cdn.example.com/tailwind.js",
            "//fonts.googleapis.com/css",
            "mailto:info@example.com",
            "tel:+38640000000",
            "#contact",
            "  https://padded.example.com  ",
        ] {
            assert!(is_remote(value), "{value} should be remote");
        }
    }

    #[test]
    fn test_local_values() {
        for value in ["css/site.css", "./img/a.png", "/js/app.js", "", "page.html"] {
            assert!(!is_remote(value), "{value} should be local");
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("./css/site.css"), "css/site.css");
        assert_eq!(normalize("././css/site.css"), "css/site.css");
        assert_eq!(normalize("/css/site.css"), "css/site.css");
        assert_eq!(normalize("img\\icons\\logo.svg"), "img/icons/logo.svg");
        assert_eq!(normalize("../shared/a.css"), "../shared/a.css");
        assert_eq!(normalize("style.css"), "style.css");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("css/site.css"), "site.css");
        assert_eq!(base_name("site.css"), "site.css");
    }

    #[test]
    fn test_is_asset() {
        assert!(is_asset("css/site.css"));
        assert!(is_asset("fonts/Inter.WOFF2"));
        assert!(is_asset("favicon.ico"));
        assert!(!is_asset("about.html"));
        assert!(!is_asset("css/site.css?v=2"));
        assert!(!is_asset("README"));
        assert!(!is_asset("images/.png"));
    }
}

//! Asset reference rewriting inside serialized fragments.
//!
//! Works on text rather than on the parsed tree, so it applies equally to any
//! fragment cut from the document.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::reference::{base_name, is_remote, normalize};
use super::relocate::{ASSETS_DIR, PathMapping};

/// PHP expression that resolves to the active theme's root URI.
pub const TEMPLATE_URI: &str = "<?php echo get_template_directory_uri(); ?>";

/// `src="..."` / `href='...'`, attribute name case-insensitive.
static ASSET_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(src|href)=(?:"([^"']+)"|'([^"']+)')"#).expect("valid asset attribute regex")
});

/// Theme URL for a mapped asset path.
///
/// ```ignore
/// assert_eq!(
///     asset_url("css/site.css"),
///     "<?php echo get_template_directory_uri(); ?>/assets/css/site.css"
/// );
/// ```
pub fn asset_url(mapped: &str) -> String {
    format!("{TEMPLATE_URI}/{ASSETS_DIR}/{}", mapped.trim_start_matches('/'))
}

/// Resolve one attribute value against the mapping.
///
/// Returns `None` when the value must be left untouched: remote, already a
/// theme URL, or unknown to the mapping.
pub fn resolve<'m>(value: &str, mapping: &'m PathMapping) -> Option<&'m str> {
    if is_remote(value) || value.contains(TEMPLATE_URI) {
        return None;
    }

    let key = normalize(value);
    mapping
        .get(&key)
        .or_else(|| mapping.find_by_base_name(base_name(&key)))
}

/// Rewrite every mapped `src`/`href` in a fragment to its theme URL.
pub fn rewrite_fragment<'a>(html: &'a str, mapping: &PathMapping) -> Cow<'a, str> {
    if mapping.is_empty() {
        return Cow::Borrowed(html);
    }

    ASSET_ATTR_RE.replace_all(html, |caps: &Captures| {
        let attr = &caps[1];
        let (quote, value) = match (caps.get(2), caps.get(3)) {
            (Some(value), _) => ('"', value.as_str()),
            (None, Some(value)) => ('\'', value.as_str()),
            (None, None) => return caps[0].to_string(),
        };

        match resolve(value, mapping) {
            Some(mapped) => format!("{attr}={quote}{}{quote}", asset_url(mapped)),
            None => caps[0].to_string(),
        }
    })
}

/// Final textual clean-ups on the head fragment.
///
/// Folds a CSS build output path written relative to the site root
/// (`<theme>/assets/css/tailwind.css`) onto the theme-relative one, and
/// collapses any doubled `/assets/assets/` segment.
pub fn clean_head(head: &str, theme_name: &str) -> String {
    let mut head = head.to_string();
    if !theme_name.is_empty() {
        head = head.replace(
            &format!("{theme_name}/{ASSETS_DIR}/css/tailwind.css"),
            &format!("{ASSETS_DIR}/css/tailwind.css"),
        );
    }
    let doubled = format!("/{ASSETS_DIR}/{ASSETS_DIR}/");
    while head.contains(&doubled) {
        head = head.replace(&doubled, &format!("/{ASSETS_DIR}/"));
    }
    head
}

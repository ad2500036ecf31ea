//! Asset location: find local files referenced by a document (pure, no side effects).

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use super::document::Document;
use super::reference::{ASSET_ATTRS, is_asset, is_remote, normalize};
use crate::debug;

/// A single `src`/`href` value found on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference<'a> {
    pub tag: &'a str,
    pub attr: &'static str,
    pub value: &'a str,
}

/// A reference resolved to an existing file under the site root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRecord {
    /// Absolute (root-joined) path of the file.
    pub path: PathBuf,
    /// Normalized forward-slash path relative to the root.
    pub key: String,
}

/// Collect every `src`/`href` reference in document order.
pub fn references(doc: &Document) -> Vec<AssetReference<'_>> {
    doc.elements()
        .into_iter()
        .flat_map(|el| {
            ASSET_ATTRS.into_iter().filter_map(move |attr| {
                el.attr(attr).map(|value| AssetReference {
                    tag: el.name.as_str(),
                    attr,
                    value,
                })
            })
        })
        .collect()
}

/// Find the distinct on-disk assets a document references.
///
/// Remote values, non-asset extensions and missing files are skipped
/// silently. The result keeps first-reference order so stylesheets are later
/// enqueued in the order the page loads them.
pub fn locate_assets(doc: &Document, root: &Path) -> IndexSet<AssetRecord> {
    let mut assets = IndexSet::new();

    for reference in references(doc) {
        if is_remote(reference.value) {
            continue;
        }

        let key = normalize(reference.value);
        if !is_asset(&key) {
            continue;
        }

        let candidate = root.join(&key);
        if !candidate.is_file() {
            debug!("locate"; "<{} {}> `{}` not found, skipping", reference.tag, reference.attr, reference.value);
            continue;
        }

        assets.insert(AssetRecord {
            path: candidate,
            key,
        });
    }

    assets
}

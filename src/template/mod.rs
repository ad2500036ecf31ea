//! Jinja-style HTML generation from `data.json` + `template.html` units.
//!
//! Every immediate subdirectory of the generator folder that holds both files
//! is a unit. A unit renders either once with the whole data bound to `data`
//! (`"render": "full"`), or once per element of `data.objs` with the
//! element's keys as top-level variables.

mod error;

pub use error::RenderError;

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, path_loader};
use serde_json::{Value, json};

use crate::debug;

pub const DATA_FILE: &str = "data.json";
pub const TEMPLATE_FILE: &str = "template.html";

/// One rendered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub name: String,
    pub html: String,
}

/// Outcome of rendering a generator folder.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub units: Vec<RenderedUnit>,
    /// Units that failed, with the reason. Other units still render.
    pub failed: Vec<(String, RenderError)>,
}

/// Render every unit under `dir` in sorted name order.
pub fn render_dir(dir: &Path) -> Result<RenderReport, RenderError> {
    let mut report = RenderReport::default();

    for unit_dir in unit_dirs(dir)? {
        let name = unit_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match render_unit(&unit_dir, &name) {
            Ok(html) => report.units.push(RenderedUnit { name, html }),
            Err(e) => report.failed.push((name, e)),
        }
    }
    Ok(report)
}

/// Subdirectories holding both a data file and a template, sorted.
fn unit_dirs(dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    let io = |source| RenderError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut units = Vec::new();
    for entry in fs::read_dir(dir).map_err(io)? {
        let path = entry.map_err(io)?.path();
        if !path.is_dir() {
            continue;
        }
        if path.join(DATA_FILE).is_file() && path.join(TEMPLATE_FILE).is_file() {
            units.push(path);
        } else {
            debug!("render"; "skipping {}: no {DATA_FILE} + {TEMPLATE_FILE}", path.display());
        }
    }
    units.sort();
    Ok(units)
}

/// Render a single unit directory.
pub fn render_unit(unit_dir: &Path, name: &str) -> Result<String, RenderError> {
    let data_path = unit_dir.join(DATA_FILE);
    let content = fs::read_to_string(&data_path).map_err(|source| RenderError::Io {
        path: data_path.clone(),
        source,
    })?;
    let data: Value = serde_json::from_str(&content).map_err(|source| RenderError::Json {
        path: data_path,
        source,
    })?;

    let template_err = |source| RenderError::Template {
        unit: name.to_string(),
        source,
    };

    let mut env = Environment::new();
    env.set_loader(path_loader(unit_dir));
    env.set_auto_escape_callback(|_| AutoEscape::None);
    let template = env.get_template(TEMPLATE_FILE).map_err(template_err)?;

    if is_full_render(&data) {
        return template.render(json!({ "data": data })).map_err(template_err);
    }

    let objs = data
        .get("objs")
        .and_then(Value::as_array)
        .ok_or_else(|| RenderError::MissingObjs {
            unit: name.to_string(),
        })?;

    let mut html = String::new();
    for obj in objs {
        html.push_str(&template.render(obj).map_err(template_err)?);
    }
    Ok(html)
}

fn is_full_render(data: &Value) -> bool {
    data.get("render").and_then(Value::as_str) == Some("full")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unit(root: &Path, name: &str, data: &str, template: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DATA_FILE), data).unwrap();
        fs::write(dir.join(TEMPLATE_FILE), template).unwrap();
        dir
    }

    #[test]
    fn test_objs_rendered_per_element() {
        let root = TempDir::new().unwrap();
        let dir = unit(
            root.path(),
            "news",
            r#"{"objs": [{"title": "Žiri"}, {"title": "<b>Bled</b>"}]}"#,
            "<li>{{ title }}</li>",
        );
        assert_eq!(
            render_unit(&dir, "news").unwrap(),
            "<li>Žiri</li><li><b>Bled</b></li>"
        );
    }

    #[test]
    fn test_full_render_binds_data() {
        let root = TempDir::new().unwrap();
        let dir = unit(
            root.path(),
            "team",
            r#"{"render": "full", "people": ["Ana", "Jan"]}"#,
            "{% for p in data.people %}<p>{{ p }}</p>{% endfor %}",
        );
        assert_eq!(render_unit(&dir, "team").unwrap(), "<p>Ana</p><p>Jan</p>");
    }

    #[test]
    fn test_include_sibling_template() {
        let root = TempDir::new().unwrap();
        let dir = unit(
            root.path(),
            "cards",
            r#"{"objs": [{"name": "A"}]}"#,
            "<div>{% include \"card.html\" %}</div>",
        );
        fs::write(dir.join("card.html"), "<span>{{ name }}</span>").unwrap();
        assert_eq!(render_unit(&dir, "cards").unwrap(), "<div><span>A</span></div>");
    }

    #[test]
    fn test_missing_objs_is_error() {
        let root = TempDir::new().unwrap();
        let dir = unit(root.path(), "bad", r#"{"items": []}"#, "x");
        assert!(matches!(
            render_unit(&dir, "bad"),
            Err(RenderError::MissingObjs { .. })
        ));
    }

    #[test]
    fn test_render_dir_sorted_and_skips_incomplete() {
        let root = TempDir::new().unwrap();
        unit(root.path(), "b", r#"{"objs": [{"v": 2}]}"#, "{{ v }}");
        unit(root.path(), "a", r#"{"objs": [{"v": 1}]}"#, "{{ v }}");
        unit(root.path(), "c", "not json", "{{ v }}");
        fs::create_dir_all(root.path().join("empty")).unwrap();
        fs::write(root.path().join("stray.txt"), "x").unwrap();

        let report = render_dir(root.path()).unwrap();
        let names: Vec<_> = report.units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(report.units[0].html, "1");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "c");
        assert!(matches!(report.failed[0].1, RenderError::Json { .. }));
    }
}

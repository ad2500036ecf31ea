//! Theme file generation from rewritten fragments.

use std::fs;
use std::path::Path;

use super::ConvertError;
use super::fragment::Fragments;
use super::relocate::{ASSETS_DIR, PathMapping};
use crate::config::ThemeSectionConfig;

/// `style.css` with the WordPress theme header block.
pub fn style_css(theme: &ThemeSectionConfig) -> String {
    format!(
        "/*
Theme Name: {name}
Theme URI: {uri}
Author: {author}
Description: {description}
Version: {version}
*/

/* Add your theme CSS below or edit assets/*.css files copied from the site */
",
        name = theme.name,
        uri = theme.uri,
        author = theme.author,
        description = theme.description,
        version = theme.version,
    )
}

/// `functions.php` enqueueing the theme stylesheet plus every copied CSS/JS file.
pub fn functions_php(theme: &ThemeSectionConfig, mapping: &PathMapping) -> String {
    let slug = &theme.slug;
    let mut lines = vec![format!(
        "\twp_enqueue_style('{slug}-style', get_stylesheet_uri());"
    )];

    for (i, css) in mapping.mapped_with_ext("css").enumerate() {
        lines.push(format!(
            "\twp_enqueue_style('{slug}-extra-{i}', get_template_directory_uri() . '/{ASSETS_DIR}/{css}');"
        ));
    }
    for (i, js) in mapping.mapped_with_ext("js").enumerate() {
        lines.push(format!(
            "\twp_enqueue_script('{slug}-extra-js-{i}', get_template_directory_uri() . '/{ASSETS_DIR}/{js}', array(), null, true);"
        ));
    }

    format!(
        "<?php
function {slug}_theme_enqueue() {{
{}
}}
add_action('wp_enqueue_scripts', '{slug}_theme_enqueue');
",
        lines.join("\n")
    )
}

/// `header.php`: document head (site head fragment before `wp_head()`) and
/// the opening of the body with the header fragment.
pub fn header_php(head: &str, header: &str) -> String {
    let head = if head.is_empty() {
        String::new()
    } else {
        format!("{head}\n")
    };
    format!(
        r#"<?php
/**
 * Header for the converted theme
 */
?><!doctype html>
<html <?php language_attributes(); ?>>
<head>
<meta charset="<?php bloginfo( 'charset' ); ?>">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head}<?php wp_head(); ?>
</head>
<body <?php body_class(); ?>>
<?php wp_body_open(); ?>

{header}
"#
    )
}

/// `footer.php`: footer fragment followed by `wp_footer()` and closing tags.
pub fn footer_php(footer: &str) -> String {
    let mut out = String::from(
        "<?php
/**
 * Footer for the converted theme
 */
?>
",
    );
    if !footer.is_empty() {
        out.push('\n');
        out.push_str(footer);
        out.push('\n');
    }
    out.push_str("<?php wp_footer(); ?>\n</body>\n</html>\n");
    out
}

/// `index.php` wrapping the main fragment.
pub fn index_php(main: &str) -> String {
    format!(
        "<?php
/*
 * Index template generated from static site. Replace with dynamic loop as needed.
 */
get_header();
?>
<main>
{main}
</main>
<?php get_footer(); ?>
"
    )
}

/// Write all theme files into `theme_dir`.
///
/// `fragments` must already be rewritten; the head is expected to be cleaned.
pub fn write_theme(
    theme_dir: &Path,
    theme: &ThemeSectionConfig,
    fragments: &Fragments,
    mapping: &PathMapping,
) -> Result<(), ConvertError> {
    let files = [
        ("style.css", style_css(theme)),
        ("functions.php", functions_php(theme, mapping)),
        ("header.php", header_php(&fragments.head, &fragments.header)),
        ("footer.php", footer_php(&fragments.footer)),
        ("index.php", index_php(&fragments.main)),
    ];

    for (name, content) in files {
        write_file(&theme_dir.join(name), &content)?;
    }
    Ok(())
}

/// Copy every top-level `*.html` except `index.html` into the theme root.
///
/// Returns the number of files copied.
pub fn copy_extra_pages(site_dir: &Path, theme_dir: &Path) -> Result<usize, ConvertError> {
    let entries = fs::read_dir(site_dir).map_err(|e| ConvertError::io(site_dir, e))?;

    let mut pages: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().is_some_and(|ext| ext == "html")
                && path.file_name().is_some_and(|name| name != "index.html")
        })
        .collect();
    pages.sort();

    for page in &pages {
        let Some(name) = page.file_name() else {
            continue;
        };
        fs::copy(page, theme_dir.join(name)).map_err(|e| ConvertError::io(page, e))?;
    }
    Ok(pages.len())
}

fn write_file(path: &Path, content: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| ConvertError::io(path, e))
}

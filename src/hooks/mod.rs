//! Hook system for external build steps.
//!
//! - `css`: the npm/npx stylesheet build that runs before a conversion

pub mod css;

pub use css::run_css_build;

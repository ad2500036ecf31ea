//! Configuration section definitions.
//!
//! Each module corresponds to a section in `pressify.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `theme`   | `[theme]`    | WordPress theme header and handle prefix |
//! | `convert` | `[convert]`  | Output folder name, CSS build toggle     |

mod convert;
mod theme;

pub use convert::ConvertSectionConfig;
pub use theme::ThemeSectionConfig;

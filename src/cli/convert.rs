//! `convert` command.

use anyhow::{Context, Result};
use std::path::Path;

use super::ConvertArgs;
use super::prompt::prompt_overwrite;
use crate::config::PressConfig;
use crate::convert::{Overwrite, convert_site};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Convert the site named by `args` into a theme.
pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    let site = args
        .site
        .canonicalize()
        .with_context(|| format!("site folder `{}` not found", args.site.display()))?;

    let config = PressConfig::load(&site, args)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    let overwrite = if args.yes {
        Overwrite::Always
    } else {
        Overwrite::Ask(Box::new(|path: &Path| {
            prompt_overwrite(path).unwrap_or_else(|e| {
                log!("error"; "reading answer failed: {e}");
                false
            })
        }))
    };

    log!("convert"; "{} -> {}", site.display(), config.convert.out);
    match convert_site(&site, &config, overwrite)? {
        Some(report) => {
            log!("done"; "theme generated at {}", report.theme_dir.display());
            log!("done"; "{} in {}", plural_count(report.assets, "asset"), report.assets_dir.display());
            if report.pages > 0 {
                debug!("done"; "{} copied verbatim", plural_count(report.pages, "extra page"));
            }
        }
        None => log!("convert"; "cancelled"),
    }
    Ok(())
}

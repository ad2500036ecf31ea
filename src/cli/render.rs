//! `render` command.

use anyhow::{Context, Result, bail};
use std::error::Error;
use std::fs;

use super::RenderArgs;
use crate::log;
use crate::template::render_dir;
use crate::utils::plural::plural_count;

/// Render every generator unit, printing or writing the HTML.
pub fn run_render(args: &RenderArgs) -> Result<()> {
    let report = render_dir(&args.dir)
        .with_context(|| format!("cannot read generator folder `{}`", args.dir.display()))?;

    if let Some(out) = &args.out {
        fs::create_dir_all(out).with_context(|| format!("cannot create `{}`", out.display()))?;
    }

    for unit in &report.units {
        match &args.out {
            Some(out) => {
                let path = out.join(format!("{}.html", unit.name));
                fs::write(&path, &unit.html)
                    .with_context(|| format!("cannot write `{}`", path.display()))?;
                log!("render"; "{} -> {}", unit.name, path.display());
            }
            None => {
                println!("Generated HTML for {}:", unit.name);
                println!("{}", unit.html);
                println!();
            }
        }
    }

    for (name, err) in &report.failed {
        log!("error"; "{name}: {}", error_chain(err));
    }
    if !report.failed.is_empty() {
        bail!("{} failed to render", plural_count(report.failed.len(), "unit"));
    }

    if args.out.is_some() {
        log!("done"; "rendered {}", plural_count(report.units.len(), "unit"));
    }
    Ok(())
}

/// `err` followed by each of its sources.
fn error_chain(err: &dyn Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        msg.push_str(": ");
        msg.push_str(&e.to_string());
        source = e.source();
    }
    msg
}

//! CSS build hook for sites that carry a `package.json`.
//!
//! Preference order: the project's own npm scripts, then a direct
//! `npx tailwindcss` call, then a warning with manual instructions. Nothing
//! here fails the conversion; every error is downgraded to a warning.

use crate::log;
use crate::utils::exec::{Cmd, NPM_FILTER};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// npm script tried first.
const PROD_SCRIPT: &str = "build:css:prod";
/// npm script used when the production one fails.
const DEV_SCRIPT: &str = "build:css";
/// Tailwind entry stylesheet, relative to the site directory.
const TAILWIND_INPUT: &str = "./src/css/input.css";

/// What the hook will do for a given site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssBuildPlan {
    /// Run the npm scripts, installing dependencies first if needed.
    Npm { npm: PathBuf, install: bool },
    /// Call the Tailwind CLI through npx.
    Npx { npx: PathBuf },
    /// No Node tooling on `PATH`.
    Unavailable,
}

impl CssBuildPlan {
    /// Decide the plan using `find` to locate executables.
    pub fn detect(site_dir: &Path, find: impl Fn(&str) -> Option<PathBuf>) -> Self {
        if let Some(npm) = find("npm") {
            let install = !site_dir.join("node_modules").is_dir();
            return Self::Npm { npm, install };
        }
        match find("npx") {
            Some(npx) => Self::Npx { npx },
            None => Self::Unavailable,
        }
    }

    /// Decide the plan from the executables on `PATH`.
    pub fn from_path(site_dir: &Path) -> Self {
        Self::detect(site_dir, |name| which::which(name).ok())
    }
}

/// Arguments for the direct Tailwind build writing into the theme.
pub fn tailwind_args(out: &str) -> Vec<String> {
    vec![
        "tailwindcss".into(),
        "-i".into(),
        TAILWIND_INPUT.into(),
        "-o".into(),
        format!("./{out}/assets/css/tailwind.css"),
        "--minify".into(),
    ]
}

/// Run the CSS build for `site_dir` when it has a `package.json`.
///
/// `out` is the theme folder name inside the site directory.
pub fn run_css_build(site_dir: &Path, out: &str) {
    if !site_dir.join("package.json").is_file() {
        crate::debug!("css"; "no package.json, skipping css build");
        return;
    }

    let plan = CssBuildPlan::from_path(site_dir);
    if let Err(e) = execute(&plan, site_dir, out) {
        log!("warning"; "css build failed: {e}");
        log!("warning"; "continuing without a fresh stylesheet");
    }
}

fn execute(plan: &CssBuildPlan, site_dir: &Path, out: &str) -> Result<()> {
    // PTY keeps npm's colors; the filter logs what is left of its output
    execute_with(plan, site_dir, out, |cmd: Cmd| {
        cmd.pty(true).filter(&NPM_FILTER).run().map(drop)
    })
}

/// Carry out `plan`, handing every command to `run`.
fn execute_with(
    plan: &CssBuildPlan,
    site_dir: &Path,
    out: &str,
    mut run: impl FnMut(Cmd) -> Result<()>,
) -> Result<()> {
    match plan {
        CssBuildPlan::Npm { npm, install } => {
            if *install {
                log!("css"; "node_modules missing, running `npm install`");
                run(Cmd::new(npm).arg("install").cwd(site_dir))?;
            }
            log!("css"; "running `npm run {PROD_SCRIPT}`");
            if let Err(e) = run(Cmd::new(npm).args(["run", PROD_SCRIPT]).cwd(site_dir)) {
                crate::debug!("css"; "{e}");
                log!("css"; "`{PROD_SCRIPT}` failed, trying `npm run {DEV_SCRIPT}`");
                run(Cmd::new(npm).args(["run", DEV_SCRIPT]).cwd(site_dir))?;
            }
            log!("css"; "stylesheet built");
        }
        CssBuildPlan::Npx { npx } => {
            let cmd = Cmd::new(npx).args(tailwind_args(out)).cwd(site_dir);
            log!("css"; "running `{}`", cmd.display());
            run(cmd)?;
            log!("css"; "stylesheet built");
        }
        CssBuildPlan::Unavailable => {
            log!("warning"; "package.json found but neither npm nor npx is on PATH");
            log!("warning"; "build the stylesheet manually, e.g. `npx tailwindcss -i {TAILWIND_INPUT} -o ./{out}/assets/css/tailwind.css --minify`");
        }
    }
    Ok(())
}

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Directory holding the top-level demos.
pub const DEMO_DIR: &str = "demos";
/// File whose presence marks a demo root.
pub const MARKER: &str = "welcome.demo";

/// Default discovery pattern under `root`.
pub fn default_pattern(root: &Path) -> String {
    format!("{}/{{*.demo,features/*.demo}}", root.display())
}

/// Finds the demo root: `hint` if given, otherwise a `demos/` directory
/// holding `welcome.demo` above the working directory, then above the
/// executable.
pub fn find_demo_root(hint: Option<&Path>) -> Result<PathBuf> {
    if let Some(hint) = hint {
        if hint.is_dir() {
            return Ok(hint.to_path_buf());
        }
        bail!("demo directory {} does not exist", hint.display());
    }

    if let Ok(cwd) = env::current_dir()
        && let Some(root) = search_upwards(&cwd)
    {
        return Ok(root);
    }

    if let Ok(exe) = env::current_exe()
        && let Some(dir) = exe.parent()
        && let Some(root) = search_upwards(dir)
    {
        return Ok(root);
    }

    bail!("cannot find a `{DEMO_DIR}/{MARKER}`; pass --demos <DIR> or set SHOWBOX_DEMOS");
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(DEMO_DIR)).find(|candidate| candidate.join(MARKER).is_file())
}

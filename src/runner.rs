use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

use crate::script::Script;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Writing and running generated scripts
// ---------------------------------------------------------------------------

/// Write the script text to `path`, creating parent directories.
pub fn save_script(script: &Script, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, &script.text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("script written to {}", path.display());
    Ok(())
}

/// An interpreter process started by [`run_script`]. Owned until it has been
/// reaped through [`ScriptRun::poll`].
#[derive(Debug)]
pub struct ScriptRun {
    path: PathBuf,
    child: Child,
}

impl ScriptRun {
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exit status once the process has finished, without blocking.
    pub fn poll(&mut self) -> Result<Option<ExitStatus>> {
        self.child
            .try_wait()
            .with_context(|| format!("checking process {}", self.child.id()))
    }
}

/// Write the script into the configured directory and start the interpreter
/// on it. Output goes straight to the launcher's own stdout/stderr.
pub fn run_script(settings: &Settings, script: &Script) -> Result<ScriptRun> {
    let path = settings.script_path();
    save_script(script, &path)?;

    let child = Command::new(&settings.python)
        .arg(&path)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("starting '{}'", settings.python))?;
    log::info!(
        "running {} {} (pid {})",
        settings.python,
        path.display(),
        child.id()
    );
    Ok(ScriptRun { path, child })
}

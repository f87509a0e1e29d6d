use std::path::PathBuf;

/// File name used for scripts written before a run.
pub const SCRIPT_FILE_NAME: &str = "xccd_analysis.py";

// ---------------------------------------------------------------------------
// Runtime settings (environment)
// ---------------------------------------------------------------------------

/// Launcher settings read once at start-up.
///
/// * `XCCD_PYTHON`     – interpreter used by "Run"
/// * `XCCD_SCRIPT_DIR` – where "Run" writes the script before executing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub python: String,
    pub script_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            python: default_python().to_string(),
            script_dir: std::env::temp_dir(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let settings = Self {
            python: non_empty("XCCD_PYTHON").unwrap_or(defaults.python),
            script_dir: non_empty("XCCD_SCRIPT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.script_dir),
        };
        log::debug!("settings: {settings:?}");
        settings
    }

    pub fn script_path(&self) -> PathBuf {
        self.script_dir.join(SCRIPT_FILE_NAME)
    }
}

fn default_python() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_lookup(|key| match key {
            "XCCD_PYTHON" => Some("/opt/conda/bin/python".into()),
            "XCCD_SCRIPT_DIR" => Some("/work/scripts".into()),
            _ => None,
        });
        assert_eq!(settings.python, "/opt/conda/bin/python");
        assert_eq!(
            settings.script_path(),
            PathBuf::from("/work/scripts").join(SCRIPT_FILE_NAME)
        );
    }

    #[test]
    fn blank_values_fall_back() {
        let settings = Settings::from_lookup(|_| Some("  ".into()));
        assert_eq!(settings, Settings::default());
    }
}

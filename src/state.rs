use std::path::Path;

use crate::color::BandColors;
use crate::config::error::ConfigError;
use crate::config::params::RawParameters;
use crate::config::selection::ColumnSelection;
use crate::data::dates;
use crate::data::model::Dataset;
use crate::pipeline;
use crate::runner::{self, ScriptRun};
use crate::script::Script;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Status line shown in the top bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Column roles. Mutated through [`AppState::edit_selection`].
    selection: ColumnSelection,

    /// Parameter form contents.
    pub params: RawParameters,

    /// Normalized date column for the preview, refreshed when the date
    /// column changes.
    pub dates: Option<Result<Vec<i64>, ConfigError>>,

    /// Colours of the selected bands.
    pub band_colors: BandColors,

    pub status: Option<Status>,

    /// Advisory findings of the last submission.
    pub warnings: Vec<String>,

    /// Last successfully synthesized script.
    pub script: Option<Script>,

    /// Whether the script window is open.
    pub show_script: bool,

    /// Interpreter process of the last "Run", until it has exited.
    pub running: Option<ScriptRun>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    /// Ingest a newly loaded dataset and reset every column role.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection.load(dataset.column_names());
        self.dataset = Some(dataset);
        self.dates = None;
        self.band_colors = BandColors::default();
        self.warnings.clear();
        self.script = None;
        self.show_script = false;
        self.status = None;
    }

    /// Load a file and make it the current dataset.
    pub fn open(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status = Some(Status::Error(format!("Error: {e:#}")));
            }
        }
    }

    /// Apply a column-role edit, then refresh what depends on the roles.
    pub fn edit_selection(&mut self, edit: impl FnOnce(&mut ColumnSelection)) {
        let date_before = self.selection.roles().date_column().map(str::to_string);
        let bands_before = self.selection.roles().bands().to_vec();

        edit(&mut self.selection);

        let roles = self.selection.roles();
        let date_changed = roles.date_column() != date_before.as_deref();
        if roles.bands() != bands_before.as_slice() {
            self.band_colors = BandColors::new(roles.bands());
        }
        if date_changed {
            self.refresh_dates();
        }
    }

    fn refresh_dates(&mut self) {
        self.dates = match (&self.dataset, self.selection.roles().date_column()) {
            (Some(ds), Some(name)) => ds.column(name).map(|c| dates::normalize(&c.values)),
            _ => None,
        };
        if let Some(Err(e)) = &self.dates {
            log::debug!("date preview unavailable: {e}");
        }
    }

    /// Validate the configuration and synthesize the script. Returns whether
    /// a script is now available.
    pub fn submit(&mut self) -> bool {
        let Some(dataset) = &self.dataset else {
            self.status = Some(Status::Error("Open a data file first".into()));
            return false;
        };
        match pipeline::submit(dataset, &self.selection, &self.params) {
            Ok(submission) => {
                self.warnings = submission.diagnostics.iter().map(ToString::to_string).collect();
                self.status = Some(Status::Info(format!(
                    "Script ready ({} warning(s))",
                    self.warnings.len()
                )));
                self.script = Some(submission.script);
                true
            }
            Err(e) => {
                log::warn!("submission rejected on {}: {e}", e.field());
                self.status = Some(Status::Error(e.to_string()));
                self.script = None;
                false
            }
        }
    }

    /// Submit and write the script to `path`.
    pub fn save(&mut self, path: &Path) {
        if !self.submit() {
            return;
        }
        let Some(script) = &self.script else { return };
        self.status = Some(match runner::save_script(script, path) {
            Ok(()) => Status::Info(format!("Saved {}", path.display())),
            Err(e) => Status::Error(format!("Error: {e:#}")),
        });
    }

    /// Submit and hand the script to the configured interpreter. Refused
    /// while a previous run is still going, since every run writes the same
    /// script file.
    pub fn run(&mut self) {
        if let Some(run) = &self.running {
            self.status = Some(Status::Error(format!(
                "A script is already running (pid {})",
                run.id()
            )));
            return;
        }
        if !self.submit() {
            return;
        }
        let Some(script) = &self.script else { return };
        match runner::run_script(&self.settings, script) {
            Ok(run) => self.track_run(run),
            Err(e) => {
                log::error!("run failed: {e:#}");
                self.status = Some(Status::Error(format!("Error: {e:#}")));
            }
        }
    }

    fn track_run(&mut self, run: ScriptRun) {
        self.status = Some(Status::Info(format!(
            "Running {} (pid {})",
            run.path().display(),
            run.id()
        )));
        self.running = Some(run);
    }

    /// Reap the running interpreter if it has exited and report how it ended.
    /// Called once per frame.
    pub fn poll_run(&mut self) {
        let Some(run) = &mut self.running else {
            return;
        };
        let pid = run.id();
        let status = match run.poll() {
            Ok(None) => return,
            Ok(Some(exit)) if exit.success() => {
                log::info!("script process {pid} finished");
                Status::Info("Script finished".into())
            }
            Ok(Some(exit)) => {
                log::warn!("script process {pid} failed: {exit}");
                Status::Error(match exit.code() {
                    Some(code) => format!("Script failed with exit code {code}"),
                    None => "Script was terminated by a signal".into(),
                })
            }
            Err(e) => {
                log::error!("{e:#}");
                Status::Error(format!("Error: {e:#}"))
            }
        };
        self.status = Some(status);
        self.running = None;
    }
}

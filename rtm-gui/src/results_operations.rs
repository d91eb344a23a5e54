use crate::file_dialogs::{browse_dir_dialog, open_results_dialog, save_results_dialog};
use crate::state::ConfirmAction;
use crate::ui::describe_results;
use crate::GuiApp;
use rtm_core::{scan_result_files, suggested_file_name};
use rtm_dataset::{check_version, Results};
use std::path::{Path, PathBuf};

impl GuiApp {
    pub(crate) fn open_results_browser(&mut self) {
        if self.file_dialogs.open_results_rx.is_some() {
            self.show_info("Results", "Open dialog already open.");
            return;
        }
        self.file_dialogs.open_results_rx = Some(open_results_dialog());
    }

    pub(crate) fn open_dir_browser(&mut self) {
        if self.file_dialogs.browse_dir_rx.is_none() {
            self.file_dialogs.browse_dir_rx = Some(browse_dir_dialog());
        }
    }

    pub(crate) fn refresh_file_browser(&mut self) {
        match scan_result_files(&self.file_browser.dir) {
            Ok(entries) => {
                self.file_browser.entries = entries;
                self.file_browser.error = None;
            }
            Err(err) => {
                log::warn!(
                    "failed to list {}: {err}",
                    self.file_browser.dir.display()
                );
                self.file_browser.entries.clear();
                self.file_browser.error = Some(err.to_string());
            }
        }
    }

    pub(crate) fn enter_dir(&mut self, dir: PathBuf) {
        self.file_browser.dir = dir;
        self.refresh_file_browser();
    }

    /// Loads a results file, asking for confirmation when it was produced by
    /// an incompatible version.
    pub(crate) fn load_results_file(&mut self, path: &Path) {
        let results = match Results::load(path) {
            Ok(results) => results,
            Err(err) => {
                log::warn!("failed to load dataset {}: {err}", path.display());
                self.show_warning(
                    "Invalid results file",
                    &format!("{} is not a valid results file.\n\n{err}", path.display()),
                );
                return;
            }
        };
        log::debug!("loaded dataset {}", path.display());

        let verdict = check_version(&results.dataset, rtm_core::VERSION);
        if verdict.is_compatible() {
            self.add_results(results);
        } else {
            log::info!("{}: {}", path.display(), verdict.title());
            self.confirm_dialog.ask(
                verdict.title(),
                verdict.message(),
                "Load",
                ConfirmAction::LoadResults(results),
            );
        }
    }

    pub(crate) fn add_results(&mut self, results: Results) {
        self.results_tabs.add(results);
        self.publish_current_results();
    }

    pub(crate) fn select_results(&mut self, index: usize) {
        log::debug!("selected results index {index}");
        if self.results_tabs.select(index) {
            self.publish_current_results();
        }
    }

    /// Closes a tab, asking first when its results were never saved.
    pub(crate) fn request_close_results(&mut self, index: usize) {
        let Some(tab) = self.results_tabs.get(index) else {
            return;
        };
        if tab.results.is_saved() {
            self.close_results(index);
            return;
        }
        let message = format!("Close '{}' without saving?", tab.name);
        self.confirm_dialog.ask(
            "Close unsaved results",
            message,
            "Discard",
            ConfirmAction::CloseResults(index),
        );
    }

    pub(crate) fn close_results(&mut self, index: usize) {
        let before = self.results_tabs.current();
        if let Some(tab) = self.results_tabs.close(index) {
            log::debug!("closed results tab '{}'", tab.name);
            if before == Some(index) {
                self.publish_current_results();
            }
        }
    }

    pub(crate) fn prompt_save(&mut self, index: usize) {
        if self.file_dialogs.save_results_rx.is_some() {
            self.show_info("Results", "Save dialog already open.");
            return;
        }
        let Some(tab) = self.results_tabs.get(index) else {
            return;
        };
        let suggested = suggested_file_name(&tab.results);
        self.file_dialogs.save_results_rx = Some(save_results_dialog(index, suggested));
    }

    pub(crate) fn save_results(&mut self, index: usize, path: PathBuf) {
        if let Err(err) = self.results_tabs.save(index, path.clone()) {
            log::error!("failed to save results to {}: {err}", path.display());
            self.show_warning(
                "Failed to save results",
                &format!("Could not write {}.\n\n{err}", path.display()),
            );
            return;
        }
        if self.results_tabs.current() == Some(index) {
            let current = self.results_tabs.current_results();
            self.status = describe_results(current.as_ref());
        }
        if path.parent() == Some(self.file_browser.dir.as_path()) {
            self.refresh_file_browser();
        }
    }
}

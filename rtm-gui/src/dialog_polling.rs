use crate::plot_export::{export_figure, EXPORT_SIZE};
use crate::ui::describe_results;
use crate::GuiApp;
use rtm_core::WorkerEvent;
use rtm_dataset::Results;

impl GuiApp {
    pub(crate) fn poll_open_results_dialog(&mut self) {
        let result = match &self.file_dialogs.open_results_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        if let Some(selection) = result {
            self.file_dialogs.open_results_rx = None;
            match selection {
                Some(path) => self.load_results_file(&path),
                None => log::debug!("file selection cancelled"),
            }
        }
    }

    pub(crate) fn poll_browse_dir_dialog(&mut self) {
        let result = match &self.file_dialogs.browse_dir_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        if let Some(selection) = result {
            self.file_dialogs.browse_dir_rx = None;
            if let Some(dir) = selection {
                self.file_browser.dir = dir;
                self.refresh_file_browser();
            }
        }
    }

    pub(crate) fn poll_save_results_dialog(&mut self) {
        let result = match &self.file_dialogs.save_results_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        if let Some((index, selection)) = result {
            self.file_dialogs.save_results_rx = None;
            match selection {
                Some(path) => self.save_results(index, path),
                None => log::debug!("file selection cancelled"),
            }
        }
    }

    pub(crate) fn poll_export_figure_dialog(&mut self) {
        let result = match &self.file_dialogs.export_figure_rx {
            Some(rx) => rx.try_recv().ok(),
            None => None,
        };
        if let Some(selection) = result {
            self.file_dialogs.export_figure_rx = None;
            let Some(path) = selection else {
                return;
            };
            if let Err(err) = export_figure(self.plot_panel.figure.published(), &path, EXPORT_SIZE)
            {
                log::warn!("figure export failed: {err}");
                self.show_warning("Export failed", &err.to_string());
            }
        }
    }

    pub(crate) fn poll_script_worker(&mut self) {
        let event = self.script_worker.as_mut().and_then(|w| w.try_recv());
        match event {
            Some(WorkerEvent::Finished(job)) => {
                log::debug!("script interpreted: {job:?}");
                self.confirm_simulation(job.into());
            }
            Some(WorkerEvent::Failed(message)) => {
                log::warn!("script failed: {message}");
                self.show_warning(
                    "Error running script",
                    &format!("Exception raised during script interpretation:\n\n{message}"),
                );
            }
            Some(WorkerEvent::Progress(_)) | None => {}
        }
    }

    /// Drains simulation events; progress updates are coalesced.
    pub(crate) fn poll_sim_worker(&mut self) {
        while let Some(event) = self.sim_worker.as_mut().and_then(|w| w.try_recv()) {
            match event {
                WorkerEvent::Progress(completed) => {
                    if let Some(progress) = self.sim_progress.as_mut() {
                        progress.completed = completed;
                    }
                }
                WorkerEvent::Finished(dataset) => {
                    self.sim_progress = None;
                    log::info!("simulation finished");
                    self.add_results(Results::unsaved(dataset));
                }
                WorkerEvent::Failed(message) => {
                    self.sim_progress = None;
                    log::error!("simulation failed: {message}");
                    self.show_warning(
                        "Error running simulation",
                        &format!("Exception raised during simulation execution:\n\n{message}"),
                    );
                }
            }
        }
    }

    /// Follows the active results box for the status line.
    pub(crate) fn poll_status(&mut self) {
        while let Ok(results) = self.status_rx.try_recv() {
            self.status = describe_results(results.as_ref());
        }
    }
}

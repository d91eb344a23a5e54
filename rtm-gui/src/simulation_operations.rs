use crate::state::{ConfirmAction, SimulationProgress};
use crate::GuiApp;
use rtm_core::script::{check_script, format_script, EXAMPLE_SCRIPTS};
use rtm_core::SimulationJob;

impl GuiApp {
    pub(crate) fn check_current_script(&mut self) -> bool {
        match check_script(&self.script_text) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("script check failed: {err}");
                self.show_warning(err.title(), &err.to_string());
                false
            }
        }
    }

    /// Interprets the script on the script worker after a synchronous check.
    pub(crate) fn run_current_script(&mut self) {
        if !self.check_current_script() {
            return;
        }
        let Some(worker) = self.script_worker.as_mut() else {
            self.show_warning("Cannot execute script", "The script worker is not running.");
            return;
        };
        if let Err(err) = worker.submit(self.script_text.clone()) {
            log::warn!("script submission rejected: {err}");
            self.show_warning("Cannot execute script", &err.to_string());
        }
    }

    pub(crate) fn format_current_script(&mut self) {
        match format_script(&self.script_text) {
            Ok(formatted) => self.script_text = formatted,
            Err(err) => self.show_warning("Failed to format script", &err.to_string()),
        }
    }

    pub(crate) fn load_example(&mut self, name: &str) {
        match EXAMPLE_SCRIPTS.iter().find(|(example, _)| *example == name) {
            Some((_, text)) => {
                log::debug!("loading example '{name}'");
                self.script_text = text.to_string();
            }
            None => log::warn!("no example named '{name}'"),
        }
    }

    pub(crate) fn run_form_clicked(&mut self) {
        match self.run_form.build() {
            Ok(job) => self.confirm_simulation(job),
            Err(err) => self.show_warning("Invalid sweep", &err.to_string()),
        }
    }

    /// Asks before running a sweep, listing its size per dimension.
    pub(crate) fn confirm_simulation(&mut self, job: SimulationJob) {
        let dims: Vec<String> = job
            .sweep
            .dims()
            .iter()
            .map(|(name, size)| format!("{name}: {size}"))
            .collect();
        let message = format!(
            "Requested simulation has {} steps.\n\n{}\n\nRun simulation?",
            job.sweep.sweep_size(),
            dims.join("\n")
        );
        self.confirm_dialog.ask(
            "Confirm simulation",
            message,
            "Run",
            ConfirmAction::RunSimulation(job),
        );
    }

    pub(crate) fn start_simulation(&mut self, job: SimulationJob) {
        let total = job.sweep.sweep_size();
        let Some(worker) = self.sim_worker.as_mut() else {
            self.show_warning("Error running simulation", "The simulation worker is not running.");
            return;
        };
        match worker.submit(job) {
            Ok(()) => {
                log::info!("simulation of {total} steps submitted");
                self.sim_progress = Some(SimulationProgress {
                    completed: 0,
                    total,
                });
            }
            Err(err) => self.show_warning("Error running simulation", &err.to_string()),
        }
    }

    pub(crate) fn perform_confirm_action(&mut self, action: ConfirmAction) {
        log::debug!("confirmed {action:?}");
        match action {
            ConfirmAction::LoadResults(results) => self.add_results(results),
            ConfirmAction::CloseResults(index) => self.close_results(index),
            ConfirmAction::RunSimulation(job) => self.start_simulation(job),
        }
    }
}

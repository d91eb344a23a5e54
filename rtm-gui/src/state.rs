use rtm_core::SimulationJob;
use rtm_dataset::Results;

/// Work deferred until the user confirms the dialog.
pub(crate) enum ConfirmAction {
    /// Results that failed the version gate.
    LoadResults(Results),
    /// Tab index of unsaved results.
    CloseResults(usize),
    RunSimulation(SimulationJob),
}

impl std::fmt::Debug for ConfirmAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfirmAction::LoadResults(results) => {
                f.debug_tuple("LoadResults").field(&results.file).finish()
            }
            ConfirmAction::CloseResults(index) => {
                f.debug_tuple("CloseResults").field(index).finish()
            }
            ConfirmAction::RunSimulation(job) => f
                .debug_tuple("RunSimulation")
                .field(&job.sweep.sweep_size())
                .finish(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ConfirmDialogState {
    pub(crate) open: bool,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) action_label: String,
    pub(crate) action: Option<ConfirmAction>,
}

impl Default for ConfirmDialogState {
    fn default() -> Self {
        Self {
            open: false,
            title: String::new(),
            message: String::new(),
            action_label: "OK".to_string(),
            action: None,
        }
    }
}

impl ConfirmDialogState {
    pub(crate) fn ask(&mut self, title: &str, message: String, label: &str, action: ConfirmAction) {
        self.open = true;
        self.title = title.to_string();
        self.message = message;
        self.action_label = label.to_string();
        self.action = Some(action);
    }

    pub(crate) fn dismiss(&mut self) {
        self.open = false;
        self.action = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SimulationTab {
    File,
    Run,
    Script,
}

impl SimulationTab {
    pub(crate) const ALL: [SimulationTab; 3] =
        [SimulationTab::File, SimulationTab::Run, SimulationTab::Script];

    pub(crate) fn label(self) -> &'static str {
        match self {
            SimulationTab::File => "File",
            SimulationTab::Run => "Run",
            SimulationTab::Script => "Script",
        }
    }
}

/// Progress of the sweep running on the simulation worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SimulationProgress {
    pub(crate) completed: u64,
    pub(crate) total: usize,
}

impl SimulationProgress {
    pub(crate) fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f32 / self.total as f32).clamp(0.0, 1.0)
    }
}

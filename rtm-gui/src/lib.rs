use eframe::egui;
use rtm_core::plot::{PlotPanel, PlotterRegistry};
use rtm_core::{
    spawn_script_worker, spawn_sim_worker, FileEntry, ScriptWorker, SimulationWorker, WatchedBox,
};
use rtm_dataset::Results;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

mod dialog_polling;
mod file_dialogs;
mod notifications;
pub mod plot_export;
mod results_operations;
mod results_tabs;
mod run_form;
mod simulation_operations;
mod state;
mod ui;

use file_dialogs::FileDialogManager;
use notifications::NotificationHandler;
use results_tabs::ResultsTabs;
use run_form::RunForm;
use state::{ConfirmDialogState, SimulationProgress, SimulationTab};

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Text shown on the figure before anything is plotted.
    pub splash: String,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            title: "RTM Wrapper GUI".to_string(),
            width: 1280.0,
            height: 800.0,
            splash: format!("rtm-gui {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("gui error: {0}")]
    Gui(String),
}

/// Opens the main window and blocks until it is closed.
///
/// The plot selector lists the configs of `registry` in registration order.
/// Background workers are started here and joined when the window closes.
pub fn run_gui(config: GuiConfig, registry: PlotterRegistry) -> Result<(), GuiError> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([config.width, config.height]),
        ..Default::default()
    };
    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Box::new(GuiApp::new(&config, &registry))),
    )
    .map_err(|err| GuiError::Gui(err.to_string()))
}

/// Directory listing shown in the "File" tab.
pub(crate) struct FileBrowser {
    pub(crate) dir: PathBuf,
    pub(crate) entries: Vec<FileEntry>,
    pub(crate) error: Option<String>,
}

pub struct GuiApp {
    plot_panel: PlotPanel,
    active_results: WatchedBox<Option<Results>>,
    status_rx: Receiver<Option<Results>>,
    status: String,
    results_tabs: ResultsTabs,
    sim_tab: SimulationTab,
    file_browser: FileBrowser,
    run_form: RunForm,
    script_text: String,
    script_worker: Option<ScriptWorker>,
    sim_worker: Option<SimulationWorker>,
    sim_progress: Option<SimulationProgress>,
    file_dialogs: FileDialogManager,
    notifications: NotificationHandler,
    confirm_dialog: ConfirmDialogState,
}

impl GuiApp {
    pub fn new(config: &GuiConfig, registry: &PlotterRegistry) -> Self {
        let mut active_results = WatchedBox::new(None);
        let mut plot_panel =
            PlotPanel::new(registry).with_results_feed(active_results.subscribe());
        let status_rx = active_results.subscribe();
        plot_panel.figure.show_splash(&config.splash);
        plot_panel.figure.redraw();

        let script_worker = spawn_script_worker()
            .map_err(|err| log::error!("script worker unavailable: {err}"))
            .ok();
        let sim_worker = spawn_sim_worker()
            .map_err(|err| log::error!("simulation worker unavailable: {err}"))
            .ok();

        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut app = Self {
            plot_panel,
            active_results,
            status_rx,
            status: ui::describe_results(None),
            results_tabs: ResultsTabs::default(),
            sim_tab: SimulationTab::File,
            file_browser: FileBrowser {
                dir,
                entries: Vec::new(),
                error: None,
            },
            run_form: RunForm::default(),
            script_text: rtm_core::script::DEFAULT_SCRIPT.to_string(),
            script_worker,
            sim_worker,
            sim_progress: None,
            file_dialogs: FileDialogManager::default(),
            notifications: NotificationHandler::default(),
            confirm_dialog: ConfirmDialogState::default(),
        };
        app.refresh_file_browser();
        app
    }

    fn show_info(&mut self, title: &str, message: &str) {
        self.notifications.show_info(title, message);
    }

    fn show_warning(&mut self, title: &str, message: &str) {
        self.notifications.show_warning(title, message);
    }

    /// Publishes the current tab's results to every subscriber.
    fn publish_current_results(&mut self) {
        let current = self.results_tabs.current_results();
        log::debug!(
            "active results: {:?}",
            current.as_ref().map(|r| r.file.as_deref())
        );
        self.active_results.set(current);
    }

    fn has_pending_work(&self) -> bool {
        self.sim_progress.is_some()
            || self.script_worker.as_ref().is_some_and(|w| w.is_busy())
            || self.file_dialogs.open_results_rx.is_some()
            || self.file_dialogs.save_results_rx.is_some()
            || self.file_dialogs.export_figure_rx.is_some()
            || self.file_dialogs.browse_dir_rx.is_some()
    }
}

impl eframe::App for GuiApp {
    /// Polls background work, then draws the panels and any modal on top.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_open_results_dialog();
        self.poll_browse_dir_dialog();
        self.poll_save_results_dialog();
        self.poll_export_figure_dialog();
        self.poll_script_worker();
        self.poll_sim_worker();
        self.poll_status();
        self.plot_panel.poll_results();

        if self.has_pending_work() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        let modal_open = self.confirm_dialog.open || self.notifications.current().is_some();
        if !modal_open {
            self.handle_shortcuts(ctx);
        }

        self.render_status_bar(ctx);
        self.render_simulation_panel(ctx);
        self.render_plot_panel(ctx);
        self.render_confirm_dialog(ctx);
        self.render_notification_dialog(ctx);
    }
}

impl Drop for GuiApp {
    fn drop(&mut self) {
        if let Some(worker) = self.script_worker.as_mut() {
            worker.shutdown();
        }
        if let Some(worker) = self.sim_worker.as_mut() {
            worker.shutdown();
        }
    }
}

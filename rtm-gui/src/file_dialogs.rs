use rtm_dataset::RESULTS_EXTENSION;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

/// Pending native file dialogs. Each runs on its own thread and reports the
/// picked path over a channel polled every frame.
#[derive(Default)]
pub(crate) struct FileDialogManager {
    pub(crate) open_results_rx: Option<Receiver<Option<PathBuf>>>,
    /// Tab index being saved, with the picked path.
    pub(crate) save_results_rx: Option<Receiver<(usize, Option<PathBuf>)>>,
    pub(crate) export_figure_rx: Option<Receiver<Option<PathBuf>>>,
    pub(crate) browse_dir_rx: Option<Receiver<Option<PathBuf>>>,
}

pub(crate) fn spawn_file_dialog_thread<F, T>(f: F) -> std::thread::JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    std::thread::spawn(f)
}

fn start_dir() -> Option<PathBuf> {
    std::env::current_dir().ok()
}

pub(crate) fn open_results_dialog() -> Receiver<Option<PathBuf>> {
    let (tx, rx) = mpsc::channel();
    spawn_file_dialog_thread(move || {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Select results file")
            .add_filter("Results file", &[RESULTS_EXTENSION])
            .add_filter("Any file", &["*"]);
        if let Some(dir) = start_dir() {
            dialog = dialog.set_directory(dir);
        }
        let _ = tx.send(dialog.pick_file());
    });
    rx
}

pub(crate) fn browse_dir_dialog() -> Receiver<Option<PathBuf>> {
    let (tx, rx) = mpsc::channel();
    spawn_file_dialog_thread(move || {
        let _ = tx.send(rfd::FileDialog::new().pick_folder());
    });
    rx
}

pub(crate) fn save_results_dialog(
    index: usize,
    suggested_name: String,
) -> Receiver<(usize, Option<PathBuf>)> {
    let (tx, rx) = mpsc::channel();
    spawn_file_dialog_thread(move || {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Select save location")
            .add_filter("Results file", &[RESULTS_EXTENSION])
            .set_file_name(&suggested_name);
        if let Some(dir) = start_dir() {
            dialog = dialog.set_directory(dir);
        }
        let _ = tx.send((index, dialog.save_file()));
    });
    rx
}

pub(crate) fn export_figure_dialog() -> Receiver<Option<PathBuf>> {
    let (tx, rx) = mpsc::channel();
    spawn_file_dialog_thread(move || {
        let file = rfd::FileDialog::new()
            .set_title("Export figure")
            .add_filter("PNG", &["png"])
            .add_filter("SVG", &["svg"])
            .set_file_name("figure.png")
            .save_file();
        let _ = tx.send(file);
    });
    rx
}

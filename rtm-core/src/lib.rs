pub mod files;
pub mod plot;
pub mod script;
pub mod simulation;
pub mod summary;
pub mod watched;
pub mod workers;

pub use files::{scan_result_files, suggested_file_name, FileEntry};
pub use summary::{format_size, summarize, SummaryNode};
pub use watched::WatchedBox;
pub use workers::{
    spawn_script_worker, spawn_sim_worker, ScriptWorker, SimulationJob, SimulationWorker, Worker,
    WorkerError, WorkerEvent,
};

/// Version recorded in produced results and checked when loading them.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

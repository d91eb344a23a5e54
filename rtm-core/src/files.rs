use rtm_dataset::{Results, ATTR_SIM_START, RESULTS_EXTENSION};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    /// Carries the results extension.
    pub is_results: bool,
}

/// Lists `dir`, sorted by name.
pub fn scan_result_files(dir: &Path) -> io::Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let is_dir = path.is_dir();
        let is_results = !is_dir
            && path.extension().and_then(|s| s.to_str()) == Some(RESULTS_EXTENSION);
        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            is_dir,
            is_results,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// File name offered when saving: the current file name, or one derived from
/// the simulation start time.
pub fn suggested_file_name(results: &Results) -> String {
    if let Some(name) = results.file.as_deref().and_then(Path::file_name) {
        return name.to_string_lossy().into_owned();
    }
    let started = results
        .dataset
        .attrs
        .get(ATTR_SIM_START)
        .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
        .map(|t| t.naive_local())
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    format!("results_{}.{RESULTS_EXTENSION}", started.format("%Y%m%dT%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtm_dataset::Dataset;

    #[test]
    fn suggestion_uses_sim_start() {
        let mut dataset = Dataset::new();
        dataset.attrs.insert(
            ATTR_SIM_START.to_string(),
            "2024-03-05T07:08:09+00:00".to_string(),
        );
        let results = Results::unsaved(dataset);
        assert_eq!(suggested_file_name(&results), "results_20240305T070809.json");
    }
}

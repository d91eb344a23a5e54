use rtm_core::{summarize, SummaryNode};
use rtm_dataset::{DatasetError, Results};
use std::path::{Path, PathBuf};

/// One open results tab with its cached summary tree.
pub(crate) struct ResultsTab {
    pub(crate) name: String,
    pub(crate) results: Results,
    pub(crate) summary: Vec<SummaryNode>,
}

impl ResultsTab {
    fn file_name(path: &Path) -> Option<String> {
        path.file_name().map(|name| name.to_string_lossy().into_owned())
    }
}

/// Open results in display order, plus the current tab.
///
/// Unsaved results are named `*Unsaved N` with a counter that is never
/// reused, even after the tab is closed.
#[derive(Default)]
pub(crate) struct ResultsTabs {
    tabs: Vec<ResultsTab>,
    current: Option<usize>,
    unsaved_counter: usize,
}

impl ResultsTabs {
    pub(crate) fn tabs(&self) -> &[ResultsTab] {
        &self.tabs
    }

    pub(crate) fn current(&self) -> Option<usize> {
        self.current
    }

    pub(crate) fn current_results(&self) -> Option<Results> {
        self.current
            .and_then(|i| self.tabs.get(i))
            .map(|tab| tab.results.clone())
    }

    pub(crate) fn get(&self, index: usize) -> Option<&ResultsTab> {
        self.tabs.get(index)
    }

    /// Appends a tab and makes it current.
    pub(crate) fn add(&mut self, results: Results) -> usize {
        let name = match results.file.as_deref().and_then(ResultsTab::file_name) {
            Some(name) => name,
            None => {
                self.unsaved_counter += 1;
                format!("*Unsaved {}", self.unsaved_counter)
            }
        };
        let summary = summarize(&results);
        self.tabs.push(ResultsTab {
            name,
            results,
            summary,
        });
        let index = self.tabs.len() - 1;
        self.current = Some(index);
        index
    }

    /// Returns whether the current tab changed.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() || self.current == Some(index) {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// Removes a tab. Closing the current tab moves to its right neighbour,
    /// or to the left one when it was the last.
    pub(crate) fn close(&mut self, index: usize) -> Option<ResultsTab> {
        if index >= self.tabs.len() {
            return None;
        }
        let removed = self.tabs.remove(index);
        self.current = match self.current {
            _ if self.tabs.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) if current == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };
        Some(removed)
    }

    /// Writes the tab's dataset to `path`, then renames the tab and rebuilds
    /// its summary.
    pub(crate) fn save(&mut self, index: usize, path: PathBuf) -> Result<(), DatasetError> {
        let Some(tab) = self.tabs.get_mut(index) else {
            return Ok(());
        };
        tab.results.save_as(&path)?;
        if let Some(name) = ResultsTab::file_name(&path) {
            tab.name = name;
        }
        tab.summary = summarize(&tab.results);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtm_dataset::Dataset;

    fn unsaved() -> Results {
        Results::unsaved(Dataset::new())
    }

    #[test]
    fn unsaved_names_are_never_reused() {
        let mut tabs = ResultsTabs::default();
        tabs.add(unsaved());
        tabs.add(unsaved());
        tabs.close(1);
        tabs.add(unsaved());
        let names: Vec<_> = tabs.tabs().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["*Unsaved 1", "*Unsaved 3"]);
    }

    #[test]
    fn closing_current_tab_selects_right_neighbour() {
        let mut tabs = ResultsTabs::default();
        for _ in 0..3 {
            tabs.add(unsaved());
        }
        tabs.select(1);
        tabs.close(1);
        assert_eq!(tabs.current(), Some(1));
        tabs.close(1);
        assert_eq!(tabs.current(), Some(0));
        tabs.close(0);
        assert_eq!(tabs.current(), None);
        assert!(tabs.current_results().is_none());
    }

    #[test]
    fn closing_left_tab_keeps_current_results() {
        let mut tabs = ResultsTabs::default();
        tabs.add(unsaved());
        tabs.add(unsaved());
        tabs.close(0);
        assert_eq!(tabs.current(), Some(0));
        assert_eq!(tabs.tabs()[0].name, "*Unsaved 2");
    }

    #[test]
    fn save_renames_tab() {
        let dir = tempfile::tempdir().unwrap();
        let mut tabs = ResultsTabs::default();
        tabs.add(unsaved());
        let path = dir.path().join("sweep.json");
        tabs.save(0, path.clone()).unwrap();
        let tab = tabs.get(0).unwrap();
        assert_eq!(tab.name, "sweep.json");
        assert_eq!(tab.results.file.as_deref(), Some(path.as_path()));
        assert_eq!(tab.summary[0].value, "sweep.json");
    }
}

use crate::plot::config::PlotterConfig;
use crate::plot::registry::PlotterRegistry;
use rtm_dataset::Dataset;

pub struct ControlEntry {
    pub config: Box<dyn PlotterConfig>,
    pub enabled: bool,
}

/// Plotter selector state: one config per registered factory, each enabled
/// only while the active dataset suits it.
pub struct PlotControls {
    entries: Vec<ControlEntry>,
    selected: Option<usize>,
}

impl PlotControls {
    pub fn new(registry: &PlotterRegistry) -> Self {
        let entries = registry
            .iter()
            .map(|factory| ControlEntry {
                config: factory(),
                enabled: false,
            })
            .collect();
        Self {
            entries,
            selected: None,
        }
    }

    pub fn entries(&self) -> &[ControlEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_config(&self) -> Option<&dyn PlotterConfig> {
        self.selected
            .and_then(|i| self.entries.get(i))
            .map(|entry| entry.config.as_ref())
    }

    pub fn selected_config_mut(&mut self) -> Option<&mut (dyn PlotterConfig + 'static)> {
        let index = self.selected?;
        self.entries.get_mut(index).map(|entry| entry.config.as_mut())
    }

    /// Activates entry `index`; disabled or unknown entries are refused.
    pub fn select(&mut self, index: usize) -> bool {
        match self.entries.get(index) {
            Some(entry) if entry.enabled => {
                self.selected = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn on_results_changed(&mut self, dataset: Option<&Dataset>) {
        let Some(dataset) = dataset else {
            log::debug!("results is None - disabling all plotters");
            for entry in &mut self.entries {
                entry.enabled = false;
            }
            self.selected = None;
            return;
        };

        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.config.refresh_for(dataset);
            entry.enabled = entry.config.can_plot(dataset);
            log::debug!(
                "plotter {index} {} enabled: {}",
                entry.config.display_name(),
                entry.enabled
            );
        }

        if let Some(index) = self.selected {
            if !self.entries[index].enabled {
                log::debug!("active plotter was disabled - resetting to no active plotter");
                self.selected = None;
            }
        }
    }
}

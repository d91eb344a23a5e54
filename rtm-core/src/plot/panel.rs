use crate::plot::config::ConfigError;
use crate::plot::controls::PlotControls;
use crate::plot::figure::Figure;
use crate::plot::plotters::PlotError;
use crate::plot::registry::PlotterRegistry;
use rtm_dataset::Results;
use std::sync::mpsc::Receiver;

#[derive(thiserror::Error, Debug)]
pub enum PlotActionError {
    #[error("Cannot create plot: no simulation results are loaded")]
    NoResults,
    #[error("Cannot create plot: no plotter selected")]
    NoPlotterSelected,
    #[error("Cannot create plot with current configuration: {0}")]
    Misconfigured(#[from] ConfigError),
    #[error("Exception raised during plotting: {0}")]
    Render(#[from] PlotError),
}

impl PlotActionError {
    /// Dialog title for this failure.
    pub fn title(&self) -> &'static str {
        match self {
            PlotActionError::Render(_) => "Error plotting",
            _ => "Misconfigured plotter",
        }
    }
}

/// Figure, plotter selector and the results they act on.
pub struct PlotPanel {
    pub figure: Figure,
    pub controls: PlotControls,
    active: Option<Results>,
    results_rx: Option<Receiver<Option<Results>>>,
}

impl PlotPanel {
    pub fn new(registry: &PlotterRegistry) -> Self {
        Self {
            figure: Figure::new(),
            controls: PlotControls::new(registry),
            active: None,
            results_rx: None,
        }
    }

    /// Follows a results box; see [`crate::watched::WatchedBox::subscribe`].
    pub fn with_results_feed(mut self, rx: Receiver<Option<Results>>) -> Self {
        self.results_rx = Some(rx);
        self
    }

    pub fn active_results(&self) -> Option<&Results> {
        self.active.as_ref()
    }

    /// Drains pending results changes, applying only the latest. Changes
    /// that arrive between two polls are coalesced, so configs refresh once
    /// per poll.
    pub fn poll_results(&mut self) {
        let Some(rx) = &self.results_rx else {
            return;
        };
        let mut latest = None;
        while let Ok(value) = rx.try_recv() {
            latest = Some(value);
        }
        if let Some(value) = latest {
            self.set_results(value);
        }
    }

    pub fn set_results(&mut self, results: Option<Results>) {
        self.controls
            .on_results_changed(results.as_ref().map(|r| r.dataset.as_ref()));
        self.active = results;
    }

    pub fn plot_clicked(&mut self) -> Result<(), PlotActionError> {
        log::debug!("plot button clicked");
        let Some(results) = &self.active else {
            return Err(PlotActionError::NoResults);
        };
        let Some(config) = self.controls.selected_config() else {
            log::warn!("plot button clicked, but no plotter is active");
            return Err(PlotActionError::NoPlotterSelected);
        };
        let plotter = config.build_plotter().map_err(|err| {
            log::warn!("plotter creation failed: {err}");
            err
        })?;

        log::debug!("plotting");
        self.figure.wipe();
        let outcome = plotter.plot(&mut self.figure, &results.dataset);
        if let Err(err) = &outcome {
            log::error!("error raised during plotting: {err}");
            self.figure.wipe();
        }
        self.figure.redraw();
        outcome.map_err(PlotActionError::from)
    }

    pub fn reset_figure(&mut self) {
        self.figure.wipe();
        self.figure.redraw();
    }
}

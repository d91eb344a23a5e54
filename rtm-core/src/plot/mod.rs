pub mod config;
pub mod controls;
pub mod figure;
pub mod panel;
pub mod plotters;
pub mod registry;

pub use config::{ChoiceField, ConfigError, PlotterConfig};
pub use controls::{ControlEntry, PlotControls};
pub use figure::{Axes, Figure, FigureSnapshot, Series};
pub use panel::{PlotActionError, PlotPanel};
pub use plotters::{
    DatasetPlotter, GridSweepPlotter, LegendSweepPlotter, PlotError, SingleSweepAllPlotter,
    SingleSweepPlotter,
};
pub use registry::{ConfigFactory, PlotterRegistry};

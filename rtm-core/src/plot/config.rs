use crate::plot::plotters::{
    DatasetPlotter, GridSweepPlotter, LegendSweepPlotter, SingleSweepAllPlotter,
    SingleSweepPlotter,
};
use rtm_dataset::Dataset;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing selection for {0}")]
    MissingSelection(String),
    #[error("'{value}' is not a choice for {field}")]
    InvalidChoice { field: String, value: String },
}

/// A single-choice list offered by a plotter config.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceField {
    key: &'static str,
    options: Vec<(String, String)>,
    selected: Option<usize>,
}

impl ChoiceField {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            options: Vec::new(),
            selected: None,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// `(label, value)` pairs in display order.
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    /// Replaces the offered options and clears the selection.
    pub fn set_options(&mut self, options: Vec<(String, String)>) {
        self.options = options;
        self.selected = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|(_, value)| value.as_str())
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|(label, _)| label.as_str())
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.options.len());
    }

    pub fn select_value(&mut self, value: &str) -> Result<(), ConfigError> {
        let index = self
            .options
            .iter()
            .position(|(_, v)| v == value)
            .ok_or_else(|| ConfigError::InvalidChoice {
                field: self.key.to_string(),
                value: value.to_string(),
            })?;
        self.selected = Some(index);
        Ok(())
    }

    fn require(&self) -> Result<String, ConfigError> {
        self.selected_value()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingSelection(self.key.to_string()))
    }
}

/// User-facing configuration of one kind of plot.
pub trait PlotterConfig {
    fn display_name(&self) -> &str;

    /// Whether a plotter of this kind can draw `dataset`.
    fn can_plot(&self, dataset: &Dataset) -> bool;

    /// Rebuilds the offered choices for `dataset`. Called for every dataset,
    /// including ones this config cannot plot.
    fn refresh_for(&mut self, _dataset: &Dataset) {}

    fn choices(&self) -> &[ChoiceField] {
        &[]
    }

    fn choices_mut(&mut self) -> &mut [ChoiceField] {
        &mut []
    }

    fn build_plotter(&self) -> Result<Box<dyn DatasetPlotter>, ConfigError>;
}

fn variable_options(dataset: &Dataset) -> Vec<(String, String)> {
    dataset
        .data_vars
        .iter()
        .map(|v| (v.title().to_string(), v.name.clone()))
        .collect()
}

fn dim_options(dataset: &Dataset) -> Vec<(String, String)> {
    dataset
        .sweep_dims()
        .iter()
        .map(|d| (dataset.dim_title(&d.name).to_string(), d.name.clone()))
        .collect()
}

fn sweep_dim_count(dataset: &Dataset) -> usize {
    dataset.sweep_dims().len()
}

/// Collects the selected value of every field, failing on the first unset one.
fn selections<const N: usize>(fields: &[ChoiceField; N]) -> Result<[String; N], ConfigError> {
    let mut values: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = field.require()?;
    }
    Ok(values)
}

pub struct SingleSweepConfig {
    fields: [ChoiceField; 1],
}

impl SingleSweepConfig {
    pub fn create() -> Box<dyn PlotterConfig> {
        Box::new(Self {
            fields: [ChoiceField::new("variable")],
        })
    }
}

impl PlotterConfig for SingleSweepConfig {
    fn display_name(&self) -> &str {
        "Single Sweep"
    }

    fn can_plot(&self, dataset: &Dataset) -> bool {
        sweep_dim_count(dataset) == 1
    }

    fn refresh_for(&mut self, dataset: &Dataset) {
        self.fields[0].set_options(variable_options(dataset));
    }

    fn choices(&self) -> &[ChoiceField] {
        &self.fields
    }

    fn choices_mut(&mut self) -> &mut [ChoiceField] {
        &mut self.fields
    }

    fn build_plotter(&self) -> Result<Box<dyn DatasetPlotter>, ConfigError> {
        let [variable] = selections(&self.fields)?;
        Ok(Box::new(SingleSweepPlotter { variable }))
    }
}

pub struct SingleSweepAllConfig;

impl SingleSweepAllConfig {
    pub fn create() -> Box<dyn PlotterConfig> {
        Box::new(Self)
    }
}

impl PlotterConfig for SingleSweepAllConfig {
    fn display_name(&self) -> &str {
        "Single Sweep - all"
    }

    fn can_plot(&self, dataset: &Dataset) -> bool {
        sweep_dim_count(dataset) == 1
    }

    fn build_plotter(&self) -> Result<Box<dyn DatasetPlotter>, ConfigError> {
        Ok(Box::new(SingleSweepAllPlotter))
    }
}

pub struct LegendSweepConfig {
    fields: [ChoiceField; 3],
}

impl LegendSweepConfig {
    pub fn create() -> Box<dyn PlotterConfig> {
        Box::new(Self {
            fields: [
                ChoiceField::new("variable"),
                ChoiceField::new("xaxis_dim"),
                ChoiceField::new("legend_dim"),
            ],
        })
    }
}

impl PlotterConfig for LegendSweepConfig {
    fn display_name(&self) -> &str {
        "Legend Sweep"
    }

    fn can_plot(&self, dataset: &Dataset) -> bool {
        sweep_dim_count(dataset) == 2
    }

    fn refresh_for(&mut self, dataset: &Dataset) {
        self.fields[0].set_options(variable_options(dataset));
        for field in &mut self.fields[1..] {
            field.set_options(dim_options(dataset));
        }
    }

    fn choices(&self) -> &[ChoiceField] {
        &self.fields
    }

    fn choices_mut(&mut self) -> &mut [ChoiceField] {
        &mut self.fields
    }

    fn build_plotter(&self) -> Result<Box<dyn DatasetPlotter>, ConfigError> {
        let [variable, xaxis_dim, legend_dim] = selections(&self.fields)?;
        Ok(Box::new(LegendSweepPlotter {
            variable,
            xaxis_dim,
            legend_dim,
        }))
    }
}

pub struct GridSweepConfig {
    fields: [ChoiceField; 4],
}

impl GridSweepConfig {
    pub fn create() -> Box<dyn PlotterConfig> {
        Box::new(Self {
            fields: [
                ChoiceField::new("variable"),
                ChoiceField::new("xaxis_dim"),
                ChoiceField::new("grid_y_dim"),
                ChoiceField::new("grid_x_dim"),
            ],
        })
    }
}

impl PlotterConfig for GridSweepConfig {
    fn display_name(&self) -> &str {
        "2D Grid Comparison"
    }

    fn can_plot(&self, dataset: &Dataset) -> bool {
        sweep_dim_count(dataset) == 3
    }

    fn refresh_for(&mut self, dataset: &Dataset) {
        self.fields[0].set_options(variable_options(dataset));
        for field in &mut self.fields[1..] {
            field.set_options(dim_options(dataset));
        }
    }

    fn choices(&self) -> &[ChoiceField] {
        &self.fields
    }

    fn choices_mut(&mut self) -> &mut [ChoiceField] {
        &mut self.fields
    }

    fn build_plotter(&self) -> Result<Box<dyn DatasetPlotter>, ConfigError> {
        let [variable, xaxis_dim, grid_y_dim, grid_x_dim] = selections(&self.fields)?;
        Ok(Box::new(GridSweepPlotter {
            variable,
            xaxis_dim,
            grid_y_dim,
            grid_x_dim,
        }))
    }
}

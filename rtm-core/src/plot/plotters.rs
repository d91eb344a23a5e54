use crate::plot::figure::{Axes, Figure};
use rtm_dataset::{CoordValues, Dataset, DatasetError, Variable, ATTR_UNIT};

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("dimension '{0}' has no index coordinate")]
    MissingCoordinate(String),
    #[error("dimension '{0}' was selected more than once")]
    RepeatedDim(String),
    #[error("dataset has no variables to plot")]
    EmptyDataset,
    #[error("expected a single axes, but the figure holds {count} in a {rows}x{cols} grid")]
    NotSingleAxes {
        rows: usize,
        cols: usize,
        count: usize,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Strategy drawing one kind of plot for a dataset onto a [`Figure`].
pub trait DatasetPlotter: Send {
    fn plot(&self, figure: &mut Figure, dataset: &Dataset) -> Result<(), PlotError>;
}

fn variable<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Variable, PlotError> {
    dataset
        .var(name)
        .ok_or_else(|| PlotError::UnknownVariable(name.to_string()))
}

fn index_values<'a>(dataset: &'a Dataset, dim: &str) -> Result<&'a CoordValues, PlotError> {
    dataset
        .index_coord(dim)
        .map(|c| &c.values)
        .ok_or_else(|| PlotError::MissingCoordinate(dim.to_string()))
}

fn distinct(dims: &[&str]) -> Result<(), PlotError> {
    for (i, dim) in dims.iter().enumerate() {
        if dims[..i].contains(dim) {
            return Err(PlotError::RepeatedDim(dim.to_string()));
        }
    }
    Ok(())
}

fn x_label(dataset: &Dataset, dim: &str, values: &CoordValues) -> String {
    let title = dataset.dim_title(dim);
    if values.is_text() {
        format!("{title} [{}]", values.labels().join(", "))
    } else {
        title.to_string()
    }
}

fn y_label(variable: &Variable) -> String {
    match variable.attrs.get(ATTR_UNIT) {
        Some(unit) if !unit.is_empty() => format!("{} ({unit})", variable.title()),
        _ => variable.title().to_string(),
    }
}

/// Draws a one-dimensional variable against its only dimension.
fn plot_line(
    axes: &mut Axes,
    dataset: &Dataset,
    data: &Variable,
    dim: &str,
) -> Result<(), PlotError> {
    let xs = index_values(dataset, dim)?;
    axes.plot(None, &xs.positions(), &data.values);
    axes.x_label = Some(x_label(dataset, dim, xs));
    axes.y_label = Some(y_label(data));
    Ok(())
}

/// Plots one variable of a dataset with a single sweep dimension.
#[derive(Debug, Clone)]
pub struct SingleSweepPlotter {
    pub variable: String,
}

impl DatasetPlotter for SingleSweepPlotter {
    fn plot(&self, figure: &mut Figure, dataset: &Dataset) -> Result<(), PlotError> {
        let var = variable(dataset, &self.variable)?;
        let dim = sole_sweep_dim(dataset)?;
        let data = var.transpose(&[dim.as_str()])?;
        figure.repartition(1, 1);
        let axes = figure.single_axes_mut()?;
        axes.title = Some(var.title().to_string());
        plot_line(axes, dataset, &data, &dim)
    }
}

fn sole_sweep_dim(dataset: &Dataset) -> Result<String, PlotError> {
    let dims = dataset.sweep_dims();
    match dims.as_slice() {
        [dim] => Ok(dim.name.clone()),
        _ => Err(PlotError::Dataset(DatasetError::DimMismatch {
            expected: vec!["<one sweep dimension>".to_string()],
            found: dims.iter().map(|d| d.name.clone()).collect(),
        })),
    }
}

/// Grid shape used to lay out `count` subplots.
pub fn grid_shape(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    (rows, cols)
}

/// Plots every variable of a single-sweep dataset, one subplot each.
#[derive(Debug, Clone, Default)]
pub struct SingleSweepAllPlotter;

impl DatasetPlotter for SingleSweepAllPlotter {
    fn plot(&self, figure: &mut Figure, dataset: &Dataset) -> Result<(), PlotError> {
        let count = dataset.data_vars.len();
        if count == 0 {
            return Err(PlotError::EmptyDataset);
        }
        let dim = sole_sweep_dim(dataset)?;
        let lines = dataset
            .data_vars
            .iter()
            .map(|var| var.transpose(&[dim.as_str()]))
            .collect::<Result<Vec<_>, _>>()?;

        let (rows, cols) = grid_shape(count);
        let cells = figure.repartition(rows, cols);
        for (axes, data) in cells.iter_mut().zip(&lines) {
            axes.title = Some(data.title().to_string());
            plot_line(axes, dataset, data, &dim)?;
        }
        for axes in cells.iter_mut().skip(count) {
            axes.hide();
        }
        log::debug!("plotted {count} variables on a {rows}x{cols} grid");
        Ok(())
    }
}

/// Plots one variable of a two-sweep dataset, one curve per value of the
/// legend dimension.
#[derive(Debug, Clone)]
pub struct LegendSweepPlotter {
    pub variable: String,
    pub xaxis_dim: String,
    pub legend_dim: String,
}

impl DatasetPlotter for LegendSweepPlotter {
    fn plot(&self, figure: &mut Figure, dataset: &Dataset) -> Result<(), PlotError> {
        distinct(&[self.xaxis_dim.as_str(), self.legend_dim.as_str()])?;
        let var = variable(dataset, &self.variable)?;
        let data = var.transpose(&[self.legend_dim.as_str(), self.xaxis_dim.as_str()])?;
        let xs = index_values(dataset, &self.xaxis_dim)?;
        let keys = index_values(dataset, &self.legend_dim)?;
        let positions = xs.positions();

        figure.repartition(1, 1);
        let axes = figure.single_axes_mut()?;
        for index in 0..keys.len() {
            let curve = data.isel(&self.legend_dim, index)?;
            axes.plot(Some(keys.label(index)), &positions, &curve.values);
        }
        axes.title = Some(var.title().to_string());
        axes.legend_title = Some(dataset.dim_title(&self.legend_dim).to_string());
        axes.x_label = Some(x_label(dataset, &self.xaxis_dim, xs));
        axes.y_label = Some(y_label(var));
        Ok(())
    }
}

/// Plots one variable of a three-sweep dataset as a grid of subplots, one per
/// combination of the two grid dimensions.
#[derive(Debug, Clone)]
pub struct GridSweepPlotter {
    pub variable: String,
    pub xaxis_dim: String,
    pub grid_y_dim: String,
    pub grid_x_dim: String,
}

impl DatasetPlotter for GridSweepPlotter {
    fn plot(&self, figure: &mut Figure, dataset: &Dataset) -> Result<(), PlotError> {
        distinct(&[
            self.xaxis_dim.as_str(),
            self.grid_y_dim.as_str(),
            self.grid_x_dim.as_str(),
        ])?;
        let var = variable(dataset, &self.variable)?;
        let data = var.transpose(&[
            self.grid_y_dim.as_str(),
            self.grid_x_dim.as_str(),
            self.xaxis_dim.as_str(),
        ])?;
        let xs = index_values(dataset, &self.xaxis_dim)?;
        let grid_y = index_values(dataset, &self.grid_y_dim)?;
        let grid_x = index_values(dataset, &self.grid_x_dim)?;
        let positions = xs.positions();
        let y_title = dataset.dim_title(&self.grid_y_dim);
        let x_title = dataset.dim_title(&self.grid_x_dim);

        let rows = grid_y.len();
        let cols = grid_x.len();
        let cells = figure.repartition(rows, cols);
        for row in 0..rows {
            let slab = data.isel(&self.grid_y_dim, row)?;
            for col in 0..cols {
                let curve = slab.isel(&self.grid_x_dim, col)?;
                let axes = &mut cells[row * cols + col];
                axes.plot(None, &positions, &curve.values);
                axes.title = Some(format!(
                    "{y_title}={}, {x_title}={}",
                    grid_y.label(row),
                    grid_x.label(col)
                ));
                if row + 1 == rows {
                    axes.x_label = Some(x_label(dataset, &self.xaxis_dim, xs));
                }
                if col == 0 {
                    axes.y_label = Some(y_label(var));
                }
            }
        }
        Ok(())
    }
}

use crate::plot::plotters::PlotError;

/// One named curve of an [`Axes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub name: Option<String>,
    pub points: Vec<[f64; 2]>,
}

/// One subplot cell. Hidden axes render as blank space with no ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub legend_title: Option<String>,
    pub series: Vec<Series>,
    pub visible: bool,
    pub text: Option<String>,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            legend_title: None,
            series: Vec::new(),
            visible: true,
            text: None,
        }
    }
}

impl Axes {
    pub fn plot(&mut self, name: Option<String>, xs: &[f64], ys: &[f64]) {
        let points = xs.iter().zip(ys).map(|(x, y)| [*x, *y]).collect();
        self.series.push(Series { name, points });
    }

    /// Hides the frame, ticks and labels of this cell.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn has_legend(&self) -> bool {
        self.series.iter().any(|s| s.name.is_some())
    }
}

/// Published state of a [`Figure`], what the display surface renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigureSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub axes: Vec<Axes>,
    pub nav_epoch: u64,
}

impl FigureSnapshot {
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Axes> {
        if col >= self.cols {
            return None;
        }
        self.axes.get(row * self.cols + col)
    }
}

/// Drawing surface shared by the plotters. Edits go to a working set of axes
/// that only becomes visible on [`Figure::redraw`].
#[derive(Debug, Default)]
pub struct Figure {
    rows: usize,
    cols: usize,
    axes: Vec<Axes>,
    nav_epoch: u64,
    redraw_count: u64,
    published: FigureSnapshot,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases the current axes and allocates a fresh `rows x cols` grid in
    /// row-major order. Navigation history restarts.
    pub fn repartition(&mut self, rows: usize, cols: usize) -> &mut [Axes] {
        self.wipe();
        self.rows = rows;
        self.cols = cols;
        self.axes = vec![Axes::default(); rows * cols];
        self.nav_epoch += 1;
        &mut self.axes
    }

    pub fn wipe(&mut self) {
        self.axes.clear();
        self.rows = 0;
        self.cols = 0;
    }

    pub fn redraw(&mut self) {
        self.published = FigureSnapshot {
            rows: self.rows,
            cols: self.cols,
            axes: self.axes.clone(),
            nav_epoch: self.nav_epoch,
        };
        self.redraw_count += 1;
    }

    pub fn show_splash(&mut self, message: &str) {
        let axes = self.repartition(1, 1);
        axes[0].hide();
        axes[0].text = Some(message.to_string());
    }

    pub fn single_axes_mut(&mut self) -> Result<&mut Axes, PlotError> {
        match self.axes.as_mut_slice() {
            [only] => Ok(only),
            other => Err(PlotError::NotSingleAxes {
                rows: self.rows,
                cols: self.cols,
                count: other.len(),
            }),
        }
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn axes_count(&self) -> usize {
        self.axes.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn nav_epoch(&self) -> u64 {
        self.nav_epoch
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    pub fn published(&self) -> &FigureSnapshot {
        &self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_are_invisible_until_redraw() {
        let mut figure = Figure::new();
        figure.repartition(2, 2);
        assert_eq!(figure.axes_count(), 4);
        assert!(figure.published().is_empty());
        figure.redraw();
        assert_eq!(figure.published().axes.len(), 4);
        assert_eq!(figure.redraw_count(), 1);
    }

    #[test]
    fn repartition_bumps_navigation_epoch() {
        let mut figure = Figure::new();
        figure.repartition(1, 1);
        let first = figure.nav_epoch();
        figure.wipe();
        assert_eq!(figure.nav_epoch(), first);
        figure.repartition(1, 2);
        assert_eq!(figure.nav_epoch(), first + 1);
    }

    #[test]
    fn single_axes_requires_exactly_one() {
        let mut figure = Figure::new();
        assert!(figure.single_axes_mut().is_err());
        figure.repartition(1, 2);
        assert!(figure.single_axes_mut().is_err());
        figure.show_splash("hello");
        let axes = figure.single_axes_mut().unwrap();
        assert!(!axes.visible);
        assert_eq!(axes.text.as_deref(), Some("hello"));
    }
}

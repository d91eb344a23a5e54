use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rtm_core::plot::{Axes, FigureSnapshot};
use std::ops::Range;
use std::path::Path;

/// Pixel size of exported figures.
pub const EXPORT_SIZE: (u32, u32) = (1600, 1000);

const SERIES_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("the figure is empty")]
    EmptyFigure,
    #[error("unsupported export format '{0}', expected png or svg")]
    UnsupportedFormat(String),
    #[error("failed to draw figure: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Draw(err.to_string())
}

pub fn series_color(index: usize) -> (u8, u8, u8) {
    let RGBColor(r, g, b) = SERIES_COLORS[index % SERIES_COLORS.len()];
    (r, g, b)
}

/// Renders the published figure to a PNG or SVG file, picked by extension.
pub fn export_figure(
    snapshot: &FigureSnapshot,
    path: &Path,
    size: (u32, u32),
) -> Result<(), ExportError> {
    if snapshot.is_empty() {
        return Err(ExportError::EmptyFigure);
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => draw_snapshot(BitMapBackend::new(path, size).into_drawing_area(), snapshot),
        "svg" => draw_snapshot(SVGBackend::new(path, size).into_drawing_area(), snapshot),
        other => Err(ExportError::UnsupportedFormat(other.to_string())),
    }?;
    log::info!("exported figure to {}", path.display());
    Ok(())
}

fn draw_snapshot<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    snapshot: &FigureSnapshot,
) -> Result<(), ExportError> {
    root.fill(&WHITE).map_err(draw_err)?;
    let cells = root.split_evenly((snapshot.rows.max(1), snapshot.cols.max(1)));
    for (area, axes) in cells.iter().zip(&snapshot.axes) {
        draw_axes(area, axes)?;
    }
    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_splash<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
) -> Result<(), ExportError> {
    let (width, height) = area.dim_in_pixel();
    let lines: Vec<&str> = text.lines().collect();
    let line_height = 26;
    let top = height as i32 / 2 - (lines.len() as i32 * line_height) / 2;
    let style = ("sans-serif", 20)
        .into_font()
        .style(FontStyle::Italic)
        .color(&RGBColor(128, 128, 128))
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, line) in lines.iter().enumerate() {
        let at = (width as i32 / 2, top + i as i32 * line_height);
        area.draw(&Text::new(*line, at, style.clone()))
            .map_err(draw_err)?;
    }
    Ok(())
}

fn draw_axes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    axes: &Axes,
) -> Result<(), ExportError> {
    if !axes.visible {
        if let Some(text) = &axes.text {
            draw_splash(area, text)?;
        }
        return Ok(());
    }
    let (x_range, y_range) = data_bounds(axes).unwrap_or((0.0..1.0, 0.0..1.0));

    if let Some(legend_title) = &axes.legend_title {
        let (width, _) = area.dim_in_pixel();
        let style = ("sans-serif", 14)
            .into_font()
            .color(&RGBColor(96, 96, 96))
            .pos(Pos::new(HPos::Right, VPos::Top));
        let at = (width as i32 - 14, 4);
        area.draw(&Text::new(format!("Legend: {legend_title}"), at, style))
            .map_err(draw_err)?;
    }

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60);
    if let Some(title) = &axes.title {
        builder.caption(title, ("sans-serif", 18));
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(RGBColor(230, 230, 230));
    if let Some(label) = &axes.x_label {
        mesh.x_desc(label.as_str());
    }
    if let Some(label) = &axes.y_label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw().map_err(draw_err)?;

    for (i, series) in axes.series.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let points = series
            .points
            .iter()
            .filter(|[x, y]| x.is_finite() && y.is_finite())
            .map(|[x, y]| (*x, *y));
        let drawn = chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(draw_err)?;
        if let Some(name) = &series.name {
            drawn
                .label(name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
    }

    if axes.has_legend() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(draw_err)?;
    }
    Ok(())
}

/// Ranges covering every finite point of the axes, padded when flat.
pub(crate) fn data_bounds(axes: &Axes) -> Option<(Range<f64>, Range<f64>)> {
    let mut points = axes
        .series
        .iter()
        .flat_map(|s| s.points.iter())
        .filter(|[x, y]| x.is_finite() && y.is_finite())
        .peekable();
    points.peek()?;

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for [x, y] in points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    Some((padded(x_min, x_max), padded(y_min, y_max)))
}

fn padded(min: f64, max: f64) -> Range<f64> {
    if max > min {
        let pad = (max - min) * 0.02;
        return (min - pad)..(max + pad);
    }
    let pad = if min == 0.0 { 0.5 } else { min.abs() * 0.05 };
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_skip_nan_and_pad_flat_ranges() {
        let mut axes = Axes::default();
        axes.plot(None, &[1.0, 2.0, 3.0], &[5.0, f64::NAN, 5.0]);
        let (x, y) = data_bounds(&axes).unwrap();
        assert!(x.start < 1.0 && x.end > 3.0);
        assert!(y.start < 5.0 && y.end > 5.0);
    }

    #[test]
    fn no_finite_points_has_no_bounds() {
        let mut axes = Axes::default();
        axes.plot(None, &[f64::NAN], &[1.0]);
        assert!(data_bounds(&axes).is_none());
    }
}

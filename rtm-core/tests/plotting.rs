use rtm_core::plot::{
    Figure, PlotActionError, PlotControls, PlotPanel, PlotterRegistry, SingleSweepAllPlotter,
    DatasetPlotter,
};
use rtm_core::WatchedBox;
use rtm_dataset::{CoordValues, Coordinate, Dataset, Results, Variable, ATTR_TITLE};

/// Dataset with one index coordinate per `(name, size)` and `vars` variables
/// spanning every dimension.
fn dataset(dims: &[(&str, usize)], vars: usize) -> Dataset {
    let mut dataset = Dataset::new();
    for (name, size) in dims {
        dataset.add_dim(name, *size).expect("dim");
        let values = (0..*size).map(|i| i as f64 * 0.1).collect();
        dataset
            .add_coord(
                Coordinate::index(name, CoordValues::Float64(values))
                    .with_attr(ATTR_TITLE, &format!("{name} title")),
            )
            .expect("coord");
    }
    let count: usize = dims.iter().map(|(_, s)| s).product();
    for v in 0..vars {
        let values = (0..count).map(|i| (i + v) as f64).collect();
        let var = Variable::new(&format!("var{v}"), dims, values).expect("variable");
        dataset.add_var(var).expect("var");
    }
    dataset
}

fn enabled_names(controls: &PlotControls) -> Vec<String> {
    controls
        .entries()
        .iter()
        .filter(|entry| entry.enabled)
        .map(|entry| entry.config.display_name().to_string())
        .collect()
}

#[test]
fn applicability_follows_sweep_dimensionality() {
    let mut controls = PlotControls::new(&PlotterRegistry::builtin());
    assert!(enabled_names(&controls).is_empty());

    controls.on_results_changed(Some(&dataset(&[("a", 4)], 2)));
    assert_eq!(
        enabled_names(&controls),
        vec!["Single Sweep", "Single Sweep - all"]
    );

    controls.on_results_changed(Some(&dataset(&[("a", 4), ("b", 2)], 1)));
    assert_eq!(enabled_names(&controls), vec!["Legend Sweep"]);

    controls.on_results_changed(Some(&dataset(&[("a", 4), ("b", 2), ("c", 3)], 1)));
    assert_eq!(enabled_names(&controls), vec!["2D Grid Comparison"]);

    controls.on_results_changed(Some(&dataset(&[("a", 1), ("b", 1), ("c", 1), ("d", 1)], 1)));
    assert!(enabled_names(&controls).is_empty());
    assert_eq!(controls.entries().len(), 4);
}

#[test]
fn dimensions_without_index_coordinate_are_not_sweeps() {
    let mut data = dataset(&[("a", 3)], 1);
    data.add_dim("band", 2).expect("dim");
    let mut controls = PlotControls::new(&PlotterRegistry::builtin());
    controls.on_results_changed(Some(&data));
    assert_eq!(
        enabled_names(&controls),
        vec!["Single Sweep", "Single Sweep - all"]
    );
}

#[test]
fn selection_respects_enabled_state() {
    let mut controls = PlotControls::new(&PlotterRegistry::builtin());
    assert!(!controls.select(0));

    controls.on_results_changed(Some(&dataset(&[("a", 4), ("b", 2)], 1)));
    assert!(!controls.select(0));
    assert!(controls.select(2));
    assert!(!controls.select(9));
    assert_eq!(controls.selected(), Some(2));

    // Still applicable: selection survives.
    controls.on_results_changed(Some(&dataset(&[("x", 3), ("y", 3)], 2)));
    assert_eq!(controls.selected(), Some(2));

    controls.on_results_changed(Some(&dataset(&[("a", 4)], 1)));
    assert_eq!(controls.selected(), None);

    assert!(controls.select(1));
    controls.on_results_changed(None);
    assert_eq!(controls.selected(), None);
    assert!(enabled_names(&controls).is_empty());
}

#[test]
fn all_variables_grid_blanks_trailing_cells() {
    for k in 1..=10usize {
        let data = dataset(&[("a", 5)], k);
        let mut figure = Figure::new();
        SingleSweepAllPlotter.plot(&mut figure, &data).expect("plot");
        let cols = (k as f64).sqrt().ceil() as usize;
        let rows = k.div_ceil(cols);
        assert_eq!(figure.axes_count(), rows * cols, "k={k}");
        let hidden = figure.axes().iter().filter(|a| !a.visible).count();
        assert_eq!(hidden, rows * cols - k, "k={k}");
        assert!(figure.axes()[..k].iter().all(|a| a.series.len() == 1));
    }
}

#[test]
fn all_variables_rejects_empty_dataset() {
    let data = dataset(&[("a", 5)], 0);
    let mut figure = Figure::new();
    assert!(SingleSweepAllPlotter.plot(&mut figure, &data).is_err());
}

#[test]
fn build_plotter_names_first_unset_field() {
    let mut controls = PlotControls::new(&PlotterRegistry::builtin());
    controls.on_results_changed(Some(&dataset(&[("a", 4), ("b", 2)], 1)));
    assert!(controls.select(2));
    let config = controls.selected_config_mut().expect("config");
    config.choices_mut()[0].select_value("var0").expect("variable");

    let err = config.build_plotter().err().expect("missing field");
    assert_eq!(err.to_string(), "missing selection for xaxis_dim");
}

#[test]
fn choices_use_titles_with_raw_values() {
    let mut controls = PlotControls::new(&PlotterRegistry::builtin());
    controls.on_results_changed(Some(&dataset(&[("a", 4), ("b", 2)], 1)));
    let config = &controls.entries()[2].config;
    let dims = config.choices()[1].options();
    assert_eq!(dims[0], ("a title".to_string(), "a".to_string()));
    assert_eq!(dims.len(), 2);
}

fn panel_with(results: Dataset) -> PlotPanel {
    let mut panel = PlotPanel::new(&PlotterRegistry::builtin());
    panel.set_results(Some(Results::unsaved(results)));
    panel
}

#[test]
fn plot_without_results_leaves_figure_untouched() {
    let mut panel = PlotPanel::new(&PlotterRegistry::builtin());
    let err = panel.plot_clicked().unwrap_err();
    assert!(matches!(err, PlotActionError::NoResults));
    assert_eq!(err.title(), "Misconfigured plotter");
    assert_eq!(panel.figure.axes_count(), 0);
    assert_eq!(panel.figure.redraw_count(), 0);
}

#[test]
fn plot_without_selection_is_refused() {
    let mut panel = panel_with(dataset(&[("a", 4)], 1));
    assert!(matches!(
        panel.plot_clicked(),
        Err(PlotActionError::NoPlotterSelected)
    ));
    assert_eq!(panel.figure.redraw_count(), 0);
}

#[test]
fn legend_sweep_draws_one_curve_per_legend_value() {
    let mut panel = panel_with(dataset(&[("a", 4), ("b", 3)], 1));
    assert!(panel.controls.select(2));
    let config = panel.controls.selected_config_mut().expect("config");
    let fields = config.choices_mut();
    fields[0].select_value("var0").expect("variable");
    fields[1].select_value("a").expect("x");
    fields[2].select_value("b").expect("legend");

    panel.plot_clicked().expect("plot");
    assert_eq!(panel.figure.redraw_count(), 1);
    let published = panel.figure.published();
    assert_eq!(published.axes.len(), 1);
    let axes = &published.axes[0];
    assert_eq!(axes.series.len(), 3);
    assert_eq!(axes.series[0].points.len(), 4);
    assert_eq!(axes.legend_title.as_deref(), Some("b title"));
    assert_eq!(axes.x_label.as_deref(), Some("a title"));
    assert_eq!(axes.series[1].name.as_deref(), Some("0.1"));
    // var0[a=1, b=2] = 1 * 3 + 2
    assert_eq!(axes.series[2].points[1], [0.1, 5.0]);
}

#[test]
fn grid_sweep_lays_out_grid_dimensions() {
    let mut panel = panel_with(dataset(&[("x", 5), ("r", 2), ("c", 3)], 1));
    assert!(panel.controls.select(3));
    let config = panel.controls.selected_config_mut().expect("config");
    for (field, value) in config.choices_mut().iter_mut().zip(["var0", "x", "r", "c"]) {
        field.select_value(value).expect("choice");
    }
    panel.plot_clicked().expect("plot");
    let published = panel.figure.published();
    assert_eq!((published.rows, published.cols), (2, 3));
    assert!(published.axes.iter().all(|a| a.series.len() == 1));
    assert_eq!(
        published.cell(1, 2).and_then(|a| a.title.as_deref()),
        Some("r title=0.1, c title=0.2")
    );
}

#[test]
fn render_failure_publishes_wiped_figure() {
    let mut panel = panel_with(dataset(&[("a", 4), ("b", 3)], 1));
    assert!(panel.controls.select(2));
    let config = panel.controls.selected_config_mut().expect("config");
    let fields = config.choices_mut();
    fields[0].select_value("var0").expect("variable");
    fields[1].select_value("a").expect("x");
    fields[2].select_value("a").expect("legend");

    let err = panel.plot_clicked().unwrap_err();
    assert!(matches!(err, PlotActionError::Render(_)));
    assert_eq!(err.title(), "Error plotting");
    assert_eq!(panel.figure.axes_count(), 0);
    assert!(panel.figure.published().is_empty());
    assert_eq!(panel.figure.redraw_count(), 1);
}

#[test]
fn panel_follows_watched_results() {
    let mut active: WatchedBox<Option<Results>> = WatchedBox::new(None);
    let mut panel = PlotPanel::new(&PlotterRegistry::builtin()).with_results_feed(active.subscribe());

    active.set(Some(Results::unsaved(dataset(&[("a", 4)], 1))));
    panel.poll_results();
    assert!(panel.active_results().is_some());
    assert!(panel.controls.select(0));

    active.set(None);
    panel.poll_results();
    assert!(panel.active_results().is_none());
    assert_eq!(panel.controls.selected(), None);
}

#[test]
fn panel_coalesces_changes_between_polls() {
    let mut active: WatchedBox<Option<Results>> = WatchedBox::new(None);
    let mut panel = PlotPanel::new(&PlotterRegistry::builtin()).with_results_feed(active.subscribe());

    active.set(Some(Results::unsaved(dataset(&[("a", 4)], 1))));
    active.set(Some(Results::unsaved(dataset(&[("a", 2), ("b", 3)], 1))));
    panel.poll_results();
    let active_dims = panel
        .active_results()
        .map(|results| results.dataset.sweep_dims().len());
    assert_eq!(active_dims, Some(2));
    assert_eq!(enabled_names(&panel.controls), vec!["Legend Sweep"]);
}

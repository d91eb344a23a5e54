use rtm_core::plot::{Figure, FigureSnapshot};
use rtm_gui::plot_export::{export_figure, ExportError, EXPORT_SIZE};

fn plotted_snapshot() -> FigureSnapshot {
    let mut figure = Figure::new();
    figure.repartition(1, 1)[0].plot(Some("radiance".into()), &[0.0, 1.0], &[2.0, 3.0]);
    figure.redraw();
    figure.published().clone()
}

#[test]
fn gui_config_defaults() {
    let config = rtm_gui::GuiConfig::default();
    assert_eq!(config.title, "RTM Wrapper GUI");
    assert_eq!(config.width, 1280.0);
    assert_eq!(config.height, 800.0);
    assert!(config.splash.starts_with("rtm-gui "));
}

#[test]
fn export_refuses_empty_figure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figure.png");
    let err = export_figure(&FigureSnapshot::default(), &path, EXPORT_SIZE).unwrap_err();
    assert!(matches!(err, ExportError::EmptyFigure));
    assert!(!path.exists());
}

#[test]
fn export_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figure.pdf");
    let err = export_figure(&plotted_snapshot(), &path, EXPORT_SIZE).unwrap_err();
    match err {
        ExportError::UnsupportedFormat(ext) => assert_eq!(ext, "pdf"),
        other => panic!("unexpected error: {other}"),
    }
}

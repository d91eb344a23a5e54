use super::styled_button;
use crate::file_dialogs::export_figure_dialog;
use crate::plot_export::series_color;
use crate::GuiApp;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use rtm_core::plot::{Axes, FigureSnapshot};

/// Label of a plotter config field.
fn field_label(key: &str) -> &str {
    match key {
        "variable" => "Variable",
        "xaxis_dim" => "X axis",
        "legend_dim" => "Legend",
        "grid_y_dim" => "Grid rows",
        "grid_x_dim" => "Grid columns",
        other => other,
    }
}

fn render_axes(ui: &mut egui::Ui, axes: &Axes, plot_id: egui::Id, size: egui::Vec2) {
    if !axes.visible {
        match &axes.text {
            Some(text) => {
                ui.allocate_ui_with_layout(
                    size,
                    egui::Layout::centered_and_justified(egui::Direction::TopDown),
                    |ui| {
                        ui.label(
                            egui::RichText::new(text)
                                .italics()
                                .color(egui::Color32::GRAY),
                        );
                    },
                );
            }
            None => {
                ui.allocate_space(size);
            }
        }
        return;
    }

    ui.allocate_ui(size, |ui| {
        ui.vertical(|ui| {
            if let Some(title) = &axes.title {
                ui.vertical_centered(|ui| ui.strong(title));
            }
            if let Some(legend_title) = &axes.legend_title {
                ui.weak(format!("Legend: {legend_title}"));
            }
            let mut plot = Plot::new(plot_id)
                .width(size.x)
                .height(ui.available_height().max(60.0));
            if axes.has_legend() {
                plot = plot.legend(Legend::default());
            }
            if let Some(label) = &axes.x_label {
                plot = plot.x_axis_label(label.clone());
            }
            if let Some(label) = &axes.y_label {
                plot = plot.y_axis_label(label.clone());
            }
            plot.show(ui, |plot_ui| {
                for (i, series) in axes.series.iter().enumerate() {
                    let points: Vec<[f64; 2]> = series
                        .points
                        .iter()
                        .filter(|[x, y]| x.is_finite() && y.is_finite())
                        .copied()
                        .collect();
                    let (r, g, b) = series_color(i);
                    let mut line =
                        Line::new(PlotPoints::from(points)).color(egui::Color32::from_rgb(r, g, b));
                    if let Some(name) = &series.name {
                        line = line.name(name);
                    }
                    plot_ui.line(line);
                }
            });
        });
    });
}

/// Lays the published axes out as a grid filling the available space.
/// Plot ids include the navigation epoch, so zoom and pan restart whenever
/// the figure is repartitioned.
fn render_figure(ui: &mut egui::Ui, snapshot: &FigureSnapshot) {
    if snapshot.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.weak("Nothing plotted");
        });
        return;
    }
    let rows = snapshot.rows.max(1);
    let cols = snapshot.cols.max(1);
    let spacing = ui.spacing().item_spacing;
    let available = ui.available_size();
    let cell = egui::vec2(
        ((available.x - spacing.x * (cols - 1) as f32) / cols as f32).max(120.0),
        ((available.y - spacing.y * (rows - 1) as f32) / rows as f32).max(100.0),
    );
    let figure_id = egui::Id::new("figure").with(snapshot.nav_epoch);

    egui::ScrollArea::both()
        .id_source("figure_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for row in 0..rows {
                ui.horizontal(|ui| {
                    for col in 0..cols {
                        match snapshot.cell(row, col) {
                            Some(axes) => {
                                render_axes(ui, axes, figure_id.with((row, col)), cell)
                            }
                            None => {
                                ui.allocate_space(cell);
                            }
                        }
                    }
                });
            }
        });
}

impl GuiApp {
    pub(crate) fn render_plot_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_plot_controls(ui);
            ui.separator();
            render_figure(ui, self.plot_panel.figure.published());
        });
    }

    fn render_plot_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label("Plotter");
            let controls = &mut self.plot_panel.controls;
            let selected_name = controls
                .selected_config()
                .map(|config| config.display_name().to_string())
                .unwrap_or_else(|| "<none>".to_string());
            let mut choice = None;
            egui::ComboBox::from_id_source("plotter_select")
                .selected_text(selected_name)
                .width(200.0)
                .show_ui(ui, |ui| {
                    for (i, entry) in controls.entries().iter().enumerate() {
                        let selected = controls.selected() == Some(i);
                        let label =
                            egui::SelectableLabel::new(selected, entry.config.display_name());
                        if ui.add_enabled(entry.enabled, label).clicked() {
                            choice = Some(i);
                        }
                    }
                });
            if let Some(index) = choice {
                if controls.select(index) {
                    log::debug!("selected plotter {index}");
                }
            }

            if let Some(config) = controls.selected_config_mut() {
                let config_name = config.display_name().to_string();
                for field in config.choices_mut() {
                    ui.separator();
                    ui.label(field_label(field.key()));
                    let current = field.selected_label().unwrap_or("<select>").to_string();
                    let mut pick = None;
                    egui::ComboBox::from_id_source((config_name.as_str(), field.key()))
                        .selected_text(current)
                        .show_ui(ui, |ui| {
                            for (j, (label, value)) in field.options().iter().enumerate() {
                                let selected = field.selected_index() == Some(j);
                                if ui
                                    .selectable_label(selected, label)
                                    .on_hover_text(value)
                                    .clicked()
                                {
                                    pick = Some(j);
                                }
                            }
                        });
                    if pick.is_some() {
                        field.select(pick);
                    }
                }
            }
        });

        ui.horizontal(|ui| {
            if styled_button(ui, "Plot").clicked() {
                if let Err(err) = self.plot_panel.plot_clicked() {
                    self.show_warning(err.title(), &err.to_string());
                }
            }
            if styled_button(ui, "Reset").clicked() {
                self.plot_panel.reset_figure();
            }
            if styled_button(ui, "Export").clicked() {
                self.export_figure_clicked();
            }
        });
    }

    fn export_figure_clicked(&mut self) {
        if self.plot_panel.figure.published().is_empty() {
            self.show_info("Export figure", "Nothing to export.");
            return;
        }
        if self.file_dialogs.export_figure_rx.is_none() {
            self.file_dialogs.export_figure_rx = Some(export_figure_dialog());
        }
    }
}

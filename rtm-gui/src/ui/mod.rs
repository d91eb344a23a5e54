use crate::notifications::Severity;
use crate::GuiApp;
use eframe::egui;
use rtm_dataset::Results;

mod highlight;
mod plot_panel;
mod results;
mod simulation;

pub(crate) const BUTTON_SIZE: egui::Vec2 = egui::vec2(84.0, 24.0);

pub(crate) fn styled_button(ui: &mut egui::Ui, label: impl Into<egui::WidgetText>) -> egui::Response {
    ui.add_sized(BUTTON_SIZE, egui::Button::new(label).min_size(BUTTON_SIZE))
}

/// One-line description of the active results for the status bar.
pub(crate) fn describe_results(results: Option<&Results>) -> String {
    let Some(results) = results else {
        return "No results selected".to_string();
    };
    let file = results
        .file
        .as_deref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<not saved>".to_string());
    let dataset = &results.dataset;
    format!(
        "{file}  |  {} outputs  |  {} sweep dimensions",
        dataset.data_vars.len(),
        dataset.sweep_dims().len()
    )
}

impl GuiApp {
    pub(crate) fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let save = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
        if ctx.input_mut(|i| i.consume_shortcut(&save)) {
            if let Some(index) = self.results_tabs.current() {
                self.prompt_save(index);
            }
        }
    }

    pub(crate) fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                if let Some(progress) = self.sim_progress {
                    ui.separator();
                    ui.add(
                        egui::ProgressBar::new(progress.fraction())
                            .desired_width(220.0)
                            .text(format!(
                                "Running simulation {}/{}",
                                progress.completed, progress.total
                            )),
                    );
                } else if self.script_worker.as_ref().is_some_and(|w| w.is_busy()) {
                    ui.separator();
                    ui.spinner();
                    ui.label("Interpreting script");
                }
            });
        });
    }

    fn modal_blocker(ctx: &egui::Context) {
        let screen_rect = ctx.screen_rect();
        egui::Area::new(egui::Id::new("modal_blocker"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                ui.allocate_rect(screen_rect, egui::Sense::click());
                ui.painter()
                    .rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(160));
            });
    }

    pub(crate) fn render_confirm_dialog(&mut self, ctx: &egui::Context) {
        if !self.confirm_dialog.open {
            return;
        }
        Self::modal_blocker(ctx);

        let mut confirmed = false;
        let mut cancelled = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        egui::Area::new(egui::Id::new("confirm_dialog"))
            .order(egui::Order::Foreground)
            .pivot(egui::Align2::CENTER_CENTER)
            .fixed_pos(ctx.screen_rect().center())
            .show(ctx, |ui| {
                egui::Frame::window(ui.style())
                    .rounding(egui::Rounding::same(6.0))
                    .show(ui, |ui| {
                        ui.set_max_width(420.0);
                        ui.heading(&self.confirm_dialog.title);
                        ui.add_space(6.0);
                        ui.label(&self.confirm_dialog.message);
                        ui.add_space(6.0);
                        ui.horizontal(|ui| {
                            if styled_button(ui, "Cancel").clicked() {
                                cancelled = true;
                            }
                            if styled_button(ui, &self.confirm_dialog.action_label).clicked() {
                                confirmed = true;
                            }
                        });
                    });
            });

        if confirmed {
            let action = self.confirm_dialog.action.take();
            self.confirm_dialog.dismiss();
            if let Some(action) = action {
                self.perform_confirm_action(action);
            }
        } else if cancelled {
            log::debug!("user cancelled '{}'", self.confirm_dialog.title);
            self.confirm_dialog.dismiss();
        }
    }

    /// Shows the oldest pending message box while no confirmation is open.
    pub(crate) fn render_notification_dialog(&mut self, ctx: &egui::Context) {
        if self.confirm_dialog.open {
            return;
        }
        let Some(notification) = self.notifications.current() else {
            return;
        };
        Self::modal_blocker(ctx);

        let mut acknowledged = false;
        let remaining = self.notifications.len().saturating_sub(1);
        egui::Area::new(egui::Id::new("notification_dialog"))
            .order(egui::Order::Foreground)
            .pivot(egui::Align2::CENTER_CENTER)
            .fixed_pos(ctx.screen_rect().center())
            .show(ctx, |ui| {
                egui::Frame::window(ui.style())
                    .rounding(egui::Rounding::same(6.0))
                    .show(ui, |ui| {
                        ui.set_max_width(480.0);
                        let title = egui::RichText::new(&notification.title).heading();
                        let title = match notification.severity {
                            Severity::Warning => title.color(ui.visuals().warn_fg_color),
                            Severity::Info => title,
                        };
                        ui.label(title);
                        ui.add_space(6.0);
                        ui.label(egui::RichText::new(&notification.message).monospace());
                        ui.add_space(6.0);
                        ui.horizontal(|ui| {
                            if styled_button(ui, "OK").clicked() {
                                acknowledged = true;
                            }
                            if remaining > 0 {
                                ui.weak(format!("{remaining} more"));
                            }
                        });
                    });
            });

        if acknowledged {
            self.notifications.acknowledge();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtm_dataset::Dataset;

    #[test]
    fn status_describes_unsaved_results() {
        assert_eq!(describe_results(None), "No results selected");
        let results = Results::unsaved(Dataset::new());
        assert_eq!(
            describe_results(Some(&results)),
            "<not saved>  |  0 outputs  |  0 sweep dimensions"
        );
    }
}

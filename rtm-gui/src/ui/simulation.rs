use super::highlight::script_layout_job;
use super::styled_button;
use crate::state::SimulationTab;
use crate::GuiApp;
use eframe::egui;
use rtm_core::script::EXAMPLE_SCRIPTS;
use rtm_core::simulation::{
    AerosolProfile, AtmosphereProfile, ParameterKind, ENGINE_NAMES,
};

impl GuiApp {
    pub(crate) fn render_simulation_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("simulation_panel")
            .resizable(true)
            .default_width(440.0)
            .min_width(320.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tab in SimulationTab::ALL {
                        ui.selectable_value(&mut self.sim_tab, tab, tab.label());
                    }
                });
                ui.separator();

                let producer_height = (ui.available_height() * 0.55).max(200.0);
                ui.allocate_ui(egui::vec2(ui.available_width(), producer_height), |ui| {
                    match self.sim_tab {
                        SimulationTab::File => self.render_file_tab(ui),
                        SimulationTab::Run => self.render_run_tab(ui),
                        SimulationTab::Script => self.render_script_tab(ui),
                    }
                });

                ui.separator();
                self.render_results_tabs(ui);
            });
    }

    fn render_file_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if styled_button(ui, "Browse").clicked() {
                self.open_results_browser();
            }
            if styled_button(ui, "Folder...").clicked() {
                self.open_dir_browser();
            }
            if styled_button(ui, "Refresh").clicked() {
                self.refresh_file_browser();
            }
        });
        ui.horizontal(|ui| {
            let parent = self.file_browser.dir.parent().map(|p| p.to_path_buf());
            if ui
                .add_enabled(parent.is_some(), egui::Button::new("Up"))
                .clicked()
            {
                if let Some(parent) = parent {
                    self.enter_dir(parent);
                }
            }
            ui.monospace(self.file_browser.dir.display().to_string());
        });
        if let Some(error) = &self.file_browser.error {
            ui.colored_label(ui.visuals().warn_fg_color, error);
        }

        let mut load = None;
        let mut enter = None;
        egui::ScrollArea::vertical()
            .id_source("file_browser")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in &self.file_browser.entries {
                    let text = if entry.is_dir {
                        egui::RichText::new(format!("{}/", entry.name))
                    } else if entry.is_results {
                        egui::RichText::new(&entry.name).strong()
                    } else {
                        egui::RichText::new(&entry.name).weak()
                    };
                    let response = ui.selectable_label(false, text);
                    if response.double_clicked() {
                        if entry.is_dir {
                            enter = Some(entry.path.clone());
                        } else {
                            load = Some(entry.path.clone());
                        }
                    }
                }
            });
        if let Some(dir) = enter {
            self.enter_dir(dir);
        }
        if let Some(path) = load {
            self.load_results_file(&path);
        }
    }

    fn render_run_tab(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_source("run_form")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::CollapsingHeader::new("Base inputs")
                    .default_open(true)
                    .show(ui, |ui| self.render_base_inputs(ui));

                egui::CollapsingHeader::new("Sweep")
                    .default_open(true)
                    .show(ui, |ui| self.render_sweep_axes(ui));

                ui.horizontal(|ui| {
                    ui.label("Engine");
                    egui::ComboBox::from_id_source("run_engine")
                        .selected_text(&self.run_form.engine)
                        .show_ui(ui, |ui| {
                            for name in ENGINE_NAMES {
                                ui.selectable_value(
                                    &mut self.run_form.engine,
                                    name.to_string(),
                                    *name,
                                );
                            }
                        });
                    ui.label("Workers");
                    ui.add(egui::DragValue::new(&mut self.run_form.max_workers).clamp_range(0..=256))
                        .on_hover_text("0 uses one worker per core");
                });
            });
        ui.horizontal(|ui| {
            let busy = self.sim_progress.is_some();
            if ui
                .add_enabled(!busy, egui::Button::new("Run").min_size(super::BUTTON_SIZE))
                .clicked()
            {
                self.run_form_clicked();
            }
        });
    }

    fn render_base_inputs(&mut self, ui: &mut egui::Ui) {
        let base = &mut self.run_form.base;
        egui::Grid::new("base_inputs")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.label("Wavelength (µm)");
                ui.add(egui::DragValue::new(&mut base.wavelength.value).speed(0.005));
                ui.end_row();

                ui.label("Atmosphere profile");
                egui::ComboBox::from_id_source("base_atmosphere")
                    .selected_text(base.atmosphere.name.name())
                    .show_ui(ui, |ui| {
                        for profile in AtmosphereProfile::ALL {
                            ui.selectable_value(&mut base.atmosphere.name, profile, profile.name());
                        }
                    });
                ui.end_row();

                ui.label("Aerosol profile");
                egui::ComboBox::from_id_source("base_aerosol")
                    .selected_text(base.aerosol_profile.name.name())
                    .show_ui(ui, |ui| {
                        for profile in AerosolProfile::ALL {
                            ui.selectable_value(
                                &mut base.aerosol_profile.name,
                                profile,
                                profile.name(),
                            );
                        }
                    });
                ui.end_row();

                ui.label("Aerosol optical thickness");
                ui.add(
                    egui::DragValue::new(&mut base.aerosol_profile.aot)
                        .speed(0.01)
                        .clamp_range(0.0..=5.0),
                );
                ui.end_row();

                ui.label("Solar zenith (deg)");
                ui.add(
                    egui::DragValue::new(&mut base.geometry.solar_zenith).clamp_range(0.0..=89.9),
                );
                ui.end_row();

                ui.label("View zenith (deg)");
                ui.add(
                    egui::DragValue::new(&mut base.geometry.view_zenith).clamp_range(0.0..=89.9),
                );
                ui.end_row();

                ui.label("Ground reflectance");
                ui.add(
                    egui::DragValue::new(&mut base.ground.reflectance)
                        .speed(0.01)
                        .clamp_range(0.0..=1.0),
                );
                ui.end_row();
            });
    }

    fn render_sweep_axes(&mut self, ui: &mut egui::Ui) {
        let mut remove = None;
        for (i, axis) in self.run_form.axes.iter_mut().enumerate() {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.strong(axis.parameter.coordinate_title());
                    if ui.small_button("Remove").clicked() {
                        remove = Some(i);
                    }
                });
                match axis.parameter.kind {
                    ParameterKind::Number => {
                        ui.horizontal(|ui| {
                            ui.label("from");
                            ui.add(egui::DragValue::new(&mut axis.start).speed(0.01));
                            ui.label("to");
                            ui.add(egui::DragValue::new(&mut axis.stop).speed(0.01));
                            ui.label("points");
                            ui.add(egui::DragValue::new(&mut axis.num).clamp_range(1..=10_000));
                        });
                    }
                    ParameterKind::Choice(names) => {
                        ui.horizontal_wrapped(|ui| {
                            for (name, picked) in names.iter().zip(axis.picked.iter_mut()) {
                                ui.checkbox(picked, *name);
                            }
                        });
                    }
                }
            });
        }
        if let Some(index) = remove {
            self.run_form.remove_axis(index);
        }

        let free: Vec<_> = self.run_form.free_parameters().collect();
        if !free.is_empty() {
            ui.menu_button("Add axis", |ui| {
                for parameter in free {
                    if ui.button(parameter.coordinate_title()).clicked() {
                        self.run_form.add_axis(parameter);
                        ui.close_menu();
                    }
                }
            });
        }
    }

    fn render_script_tab(&mut self, ui: &mut egui::Ui) {
        let button_row = 32.0;
        let editor_height = (ui.available_height() - button_row).max(120.0);
        egui::ScrollArea::vertical()
            .id_source("script_editor")
            .max_height(editor_height)
            .show(ui, |ui| {
                let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
                    let job = script_layout_job(ui, text, wrap_width);
                    ui.fonts(|fonts| fonts.layout_job(job))
                };
                ui.add_sized(
                    [ui.available_width(), editor_height],
                    egui::TextEdit::multiline(&mut self.script_text)
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .layouter(&mut layouter),
                );
            });

        ui.horizontal(|ui| {
            let busy = self.sim_progress.is_some()
                || self.script_worker.as_ref().is_some_and(|w| w.is_busy());
            if ui
                .add_enabled(!busy, egui::Button::new("Run").min_size(super::BUTTON_SIZE))
                .clicked()
            {
                self.run_current_script();
            }
            if styled_button(ui, "Check").clicked() && self.check_current_script() {
                self.show_info("Script OK", "No issues found!");
            }
            if styled_button(ui, "Format").clicked() {
                self.format_current_script();
            }
            ui.menu_button("Example", |ui| {
                for (name, _) in EXAMPLE_SCRIPTS {
                    if ui.button(*name).clicked() {
                        self.load_example(name);
                        ui.close_menu();
                    }
                }
            });
        });
    }
}

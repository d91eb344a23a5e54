use crate::GuiApp;
use eframe::egui;
use rtm_core::SummaryNode;

enum TabRequest {
    Select(usize),
    Save(usize),
    Close(usize),
}

fn render_summary_node(ui: &mut egui::Ui, node: &SummaryNode, id: egui::Id, depth: usize) {
    if node.children.is_empty() {
        ui.horizontal_wrapped(|ui| {
            ui.label(egui::RichText::new(&node.label).strong());
            ui.label(&node.value);
        });
        return;
    }
    let header = if node.value.is_empty() {
        node.label.clone()
    } else {
        format!("{}  {}", node.label, node.value)
    };
    egui::CollapsingHeader::new(header)
        .id_source(id)
        .default_open(depth == 0)
        .show(ui, |ui| {
            for (i, child) in node.children.iter().enumerate() {
                render_summary_node(ui, child, id.with(i), depth + 1);
            }
        });
}

impl GuiApp {
    pub(crate) fn render_results_tabs(&mut self, ui: &mut egui::Ui) {
        if self.results_tabs.tabs().is_empty() {
            ui.weak("No results loaded. Open a results file or run a simulation.");
            return;
        }

        let mut request = None;
        egui::ScrollArea::horizontal()
            .id_source("results_tab_bar")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for (i, tab) in self.results_tabs.tabs().iter().enumerate() {
                        let selected = self.results_tabs.current() == Some(i);
                        let response = ui
                            .selectable_label(selected, &tab.name)
                            .on_hover_text("Double-click or Ctrl+S to save");
                        if response.double_clicked() {
                            request = Some(TabRequest::Save(i));
                        } else if response.clicked() {
                            request = Some(TabRequest::Select(i));
                        }
                        if ui.small_button("x").on_hover_text("Close").clicked() {
                            request = Some(TabRequest::Close(i));
                        }
                        ui.separator();
                    }
                });
            });

        match request {
            Some(TabRequest::Select(i)) => self.select_results(i),
            Some(TabRequest::Save(i)) => {
                self.select_results(i);
                self.prompt_save(i);
            }
            Some(TabRequest::Close(i)) => self.request_close_results(i),
            None => {}
        }

        let Some(index) = self.results_tabs.current() else {
            return;
        };
        let Some(tab) = self.results_tabs.get(index) else {
            return;
        };
        ui.separator();
        egui::ScrollArea::vertical()
            .id_source("results_summary")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let root = egui::Id::new("summary").with(&tab.name);
                for (i, node) in tab.summary.iter().enumerate() {
                    render_summary_node(ui, node, root.with(i), 0);
                }
            });
    }
}

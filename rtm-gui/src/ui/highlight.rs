use eframe::egui;
use egui::text::{LayoutJob, TextFormat};
use rtm_core::script::{highlight, TokenKind};

fn token_color(kind: TokenKind, dark: bool) -> egui::Color32 {
    use egui::Color32;
    match (kind, dark) {
        (TokenKind::Keyword, true) => Color32::from_rgb(86, 156, 214),
        (TokenKind::Keyword, false) => Color32::from_rgb(0, 0, 192),
        (TokenKind::Known, true) => Color32::from_rgb(78, 201, 176),
        (TokenKind::Known, false) => Color32::from_rgb(0, 128, 128),
        (TokenKind::Header, true) => Color32::from_rgb(197, 134, 192),
        (TokenKind::Header, false) => Color32::from_rgb(128, 0, 128),
        (TokenKind::String, true) => Color32::from_rgb(206, 145, 120),
        (TokenKind::String, false) => Color32::from_rgb(163, 21, 21),
        (TokenKind::Number, true) => Color32::from_rgb(181, 206, 168),
        (TokenKind::Number, false) => Color32::from_rgb(9, 134, 88),
        (TokenKind::Comment, _) => Color32::from_rgb(106, 153, 85),
        (TokenKind::Special, true) => Color32::from_rgb(255, 198, 109),
        (TokenKind::Special, false) => Color32::from_rgb(175, 95, 0),
    }
}

/// Colored layout of a script for the editor.
pub(crate) fn script_layout_job(ui: &egui::Ui, text: &str, wrap_width: f32) -> LayoutJob {
    let font_id = egui::TextStyle::Monospace.resolve(ui.style());
    let dark = ui.visuals().dark_mode;
    let plain = TextFormat {
        font_id: font_id.clone(),
        color: ui.visuals().text_color(),
        ..Default::default()
    };

    let mut job = LayoutJob::default();
    let mut cursor = 0;
    for span in highlight(text) {
        if span.range.start > cursor {
            job.append(&text[cursor..span.range.start], 0.0, plain.clone());
        }
        let mut format = TextFormat {
            font_id: font_id.clone(),
            color: token_color(span.kind, dark),
            ..Default::default()
        };
        if span.kind == TokenKind::Comment {
            format.italics = true;
        }
        job.append(&text[span.range.clone()], 0.0, format);
        cursor = span.range.end;
    }
    if cursor < text.len() {
        job.append(&text[cursor..], 0.0, plain);
    }
    job.wrap.max_width = wrap_width;
    job
}

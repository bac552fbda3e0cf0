use eframe::egui;

use crate::level::MinMax;

pub fn format_min_max_line(axis: char, max: f64, min: f64) -> String {
    format!("Max {axis}: {:.2}°, Min {axis}: {:.2}°", max, min)
}

pub fn render_min_max(ui: &mut egui::Ui, extremes: &MinMax) {
    ui.add_space(16.0);
    ui.label(egui::RichText::new(format_min_max_line('X', extremes.max_x, extremes.min_x)).size(16.0));
    ui.label(egui::RichText::new(format_min_max_line('Y', extremes.max_y, extremes.min_y)).size(16.0));
}

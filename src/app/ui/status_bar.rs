use eframe::egui;

use crate::app::app_core::BubbleLevelApp;
use crate::utils::format_timestamp;

pub fn render_status_bar(app: &mut BubbleLevelApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status_bar")
        .min_height(32.0)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(format!("Source: {}", app.sensor.kind().label()));
                ui.separator();

                let status_text = app.state.get_status_summary();
                let status_color = match status_text {
                    "Measuring" => egui::Color32::from_rgb(0, 150, 0), // 绿色
                    "Flat" => egui::Color32::from_rgb(0, 100, 200),    // 蓝色
                    _ => egui::Color32::from_rgb(255, 165, 0),         // 橙色
                };
                ui.colored_label(status_color, status_text);

                let pause_button_text = if app.state.view.user_paused {
                    "▶ Resume"
                } else {
                    "⏸ Pause"
                };
                if ui.button(pause_button_text).clicked() {
                    app.toggle_pause();
                }

                ui.separator();
                render_status_details(app, ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Reset Min/Max").clicked() {
                        app.reset_min_max();
                    }

                    let history_button_text = if app.state.view.show_history_plot {
                        "📈 Hide History"
                    } else {
                        "📈 Show History"
                    };
                    if ui.button(history_button_text).clicked() {
                        app.state.view.show_history_plot = !app.state.view.show_history_plot;
                    }
                });
            });

            if !app.state.view.status_message.is_empty() {
                ui.colored_label(egui::Color32::from_rgb(150, 0, 0), &app.state.view.status_message);
            }
            ui.add_space(4.0);
        });
}

fn render_status_details(app: &BubbleLevelApp, ui: &mut egui::Ui) {
    let level = &app.state.level;
    ui.label(format!("Samples: {}", level.sample_count));
    ui.label(format!(
        "History: {}/{}",
        level.history.x.len(),
        level.history.x.capacity()
    ));

    match level.last_timestamp {
        Some(timestamp) => ui.label(format!("Last: {}", format_timestamp(timestamp))),
        None if level.sample_count == 0 => ui.label("waiting for data..."),
        None => ui.label("Last: -"),
    };
}

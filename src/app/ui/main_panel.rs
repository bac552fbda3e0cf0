use eframe::egui;

use crate::app::app_core::BubbleLevelApp;

/// 屏幕方向，由窗口宽高比决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_size(size: egui::Vec2) -> Self {
        if size.x > size.y {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn flat_message(&self) -> &'static str {
        match self {
            Orientation::Landscape => "Flat in Landscape Mode",
            Orientation::Portrait => "Flat in Portrait Mode",
        }
    }
}

pub fn render_main_panel(app: &mut BubbleLevelApp, ctx: &egui::Context) {
    let orientation = Orientation::from_size(ctx.screen_rect().size());
    let display = &app.config.get_config().display;
    let level = &app.state.level;

    egui::CentralPanel::default().show(ctx, |ui| {
        if level.reading.is_flat {
            // 水平放置时只显示提示文字
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new(orientation.flat_message()).size(22.0));
            });
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                super::level_view::render_level(ui, &level.reading, level.angle_limit(), display);
                super::min_max::render_min_max(ui, &level.min_max());

                if app.state.view.show_history_plot {
                    ui.add_space(12.0);
                    ui.separator();
                    crate::plotter::HistoryPlot::new(level.angle_limit(), display).ui(ui, &level.history);
                }
            });
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_from_window_shape() {
        assert_eq!(Orientation::from_size(egui::vec2(800.0, 600.0)), Orientation::Landscape);
        assert_eq!(Orientation::from_size(egui::vec2(480.0, 640.0)), Orientation::Portrait);
        // 正方形按竖屏处理
        assert_eq!(Orientation::from_size(egui::vec2(500.0, 500.0)), Orientation::Portrait);
        assert_eq!(Orientation::Landscape.flat_message(), "Flat in Landscape Mode");
        assert_eq!(Orientation::Portrait.flat_message(), "Flat in Portrait Mode");
    }
}

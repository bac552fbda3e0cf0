use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::app::ui::level_view::rgb;
use crate::config::DisplayConfig;
use crate::level::{AxisHistory, HistoryBuffer};

/// 最近 N 个角度值的折线图，最旧的在左侧
pub struct HistoryPlot {
    limit: f64,
    height: f32,
    x_color: Color32,
    y_color: Color32,
}

impl HistoryPlot {
    pub fn new(limit: f64, config: &DisplayConfig) -> Self {
        Self {
            limit,
            height: config.history_plot_height,
            x_color: rgb(config.colors.x_axis),
            y_color: rgb(config.colors.y_axis),
        }
    }

    pub fn ui(&self, ui: &mut egui::Ui, history: &AxisHistory) {
        if history.x.is_empty() {
            ui.label("No history yet");
            return;
        }

        let span = history.x.capacity().max(1) as f64;
        let limit = self.limit;

        Plot::new("angle_history")
            .height(self.height)
            .legend(Legend::default())
            .x_axis_formatter(|v, _| format!("{:.0}", v.value))
            .y_axis_formatter(|v, _| format!("{:.1}°", v.value))
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([0.0, -limit], [span, limit]));
                plot_ui.line(
                    Line::new(series_name('X', &history.x), PlotPoints::from(series_points(&history.x)))
                        .color(self.x_color)
                        .width(1.0),
                );
                plot_ui.line(
                    Line::new(series_name('Y', &history.y), PlotPoints::from(series_points(&history.y)))
                        .color(self.y_color)
                        .width(1.0),
                );
            });
    }
}

/// 图例中显示最新值
pub fn series_name(axis: char, buffer: &HistoryBuffer) -> String {
    match buffer.latest() {
        Some(value) => format!("{} ({:.2}°)", axis, value),
        None => axis.to_string(),
    }
}

/// 索引0是最旧的数据
pub fn series_points(buffer: &HistoryBuffer) -> Vec<[f64; 2]> {
    buffer
        .iter()
        .enumerate()
        .map(|(i, y)| [i as f64, y])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_indexed_oldest_first() {
        let mut buffer = HistoryBuffer::new(2);
        buffer.push(1.0);
        buffer.push(-2.0);
        buffer.push(3.5);
        assert_eq!(series_points(&buffer), vec![[0.0, -2.0], [1.0, 3.5]]);
    }

    #[test]
    fn legend_shows_latest_value() {
        let mut buffer = HistoryBuffer::new(4);
        assert_eq!(series_name('X', &buffer), "X");
        buffer.push(-1.0);
        buffer.push(2.5);
        assert_eq!(series_name('X', &buffer), "X (2.50°)");
    }
}

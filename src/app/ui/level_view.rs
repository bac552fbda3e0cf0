use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Mesh, Pos2, Rect, Stroke, Vec2};

use crate::config::DisplayConfig;
use crate::level::{AngleSample, LevelReading};

/// 标签预留空间
const LABEL_MARGIN_RIGHT: f32 = 96.0;
const LABEL_MARGIN_BOTTOM: f32 = 32.0;
const NORTH_ARROW_INSET: f32 = 20.0;

pub fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

/// Pixel offset of the bubble centre from the container centre.
///
/// Full deflection (`|angle| == limit`) puts the bubble edge on the
/// container edge. Screen Y grows downward, so the Y angle is inverted.
pub fn bubble_offset(angle: AngleSample, limit: f64, container_size: f32, bubble_size: f32) -> Vec2 {
    let max_offset = (container_size - bubble_size) / 2.0;
    let normalized_x = (angle.x / limit) as f32;
    let normalized_y = (angle.y / limit) as f32;
    vec2(
        (normalized_x * max_offset).round(),
        (-normalized_y * max_offset).round(),
    )
}

pub fn format_axis_label(axis: char, value: f64) -> String {
    format!("{}: {:.2}°", axis, value)
}

fn mix(a: Color32, b: Color32) -> Color32 {
    let avg = |x: u8, y: u8| ((u16::from(x) + u16::from(y)) / 2) as u8;
    Color32::from_rgb(avg(a.r(), b.r()), avg(a.g(), b.g()), avg(a.b(), b.b()))
}

/// 左上到右下的线性渐变背景
fn gradient_background(rect: Rect, from: Color32, to: Color32) -> Mesh {
    let middle = mix(from, to);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), from);
    mesh.colored_vertex(rect.right_top(), middle);
    mesh.colored_vertex(rect.right_bottom(), to);
    mesh.colored_vertex(rect.left_bottom(), middle);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    mesh
}

pub fn render_level(ui: &mut egui::Ui, reading: &LevelReading, limit: f64, display: &DisplayConfig) {
    let size = display.container_size;
    let (response, painter) = ui.allocate_painter(
        vec2(size + LABEL_MARGIN_RIGHT, size + LABEL_MARGIN_BOTTOM),
        egui::Sense::hover(),
    );
    let rect = Rect::from_min_size(response.rect.min, vec2(size, size));
    let center = rect.center();

    let visuals = ui.visuals();
    let primary = rgb(display.colors.primary);
    painter.add(gradient_background(rect, visuals.panel_fill, visuals.extreme_bg_color));
    painter.rect_stroke(rect, 0.0, Stroke::new(2.0, primary), egui::StrokeKind::Inside);

    // 中心十字线
    let grid = Stroke::new(2.0, rgb(display.colors.grid));
    painter.line_segment([pos2(center.x, rect.top()), pos2(center.x, rect.bottom())], grid);
    painter.line_segment([pos2(rect.left(), center.y), pos2(rect.right(), center.y)], grid);

    // 北向虚线
    let north_end = pos2(center.x, rect.top() + NORTH_ARROW_INSET);
    painter.extend(egui::Shape::dashed_line(
        &[center, north_end],
        Stroke::new(3.0, rgb(display.colors.north)),
        5.0,
        5.0,
    ));

    let offset = bubble_offset(reading.angle, limit, size, display.bubble_size);
    let bubble_center: Pos2 = center + offset;
    painter.circle(
        bubble_center,
        display.bubble_size / 2.0,
        rgb(display.colors.bubble),
        Stroke::new(2.0, rgb(display.colors.bubble_outline)),
    );

    let font = FontId::proportional(18.0);
    painter.text(
        pos2(center.x, rect.bottom() + 6.0),
        Align2::CENTER_TOP,
        format_axis_label('X', reading.angle.x),
        font.clone(),
        primary,
    );
    painter.text(
        pos2(rect.right() + 6.0, center.y - 10.0),
        Align2::LEFT_CENTER,
        format_axis_label('Y', reading.angle.y),
        font,
        primary,
    );
}

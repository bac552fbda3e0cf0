use std::time::Duration;

use eframe::{egui, Frame};
use log::info;

use super::state::AppState;
use crate::config::ConfigManager;
use crate::sensor::SensorHandle;
use crate::types::AccelSample;

pub struct BubbleLevelApp {
    // 统一的状态管理
    pub state: AppState,

    // 配置管理
    pub config: ConfigManager,

    pub sensor: SensorHandle,
}

impl BubbleLevelApp {
    pub fn new(
        sample_receiver: crossbeam_channel::Receiver<AccelSample>,
        sensor: SensorHandle,
        config: ConfigManager,
    ) -> Self {
        let state = AppState::new(sample_receiver, config.get_config());

        info!("{} sensor ready, waiting for samples...", sensor.kind().label());

        BubbleLevelApp { state, config, sensor }
    }
}

impl eframe::App for BubbleLevelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if self.config.get_config().display.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        // 根据窗口可见性注册/注销传感器
        self.handle_visibility(ctx);

        // 处理数据
        crate::app::handlers::SampleHandler::handle_samples(self);

        // 渲染UI组件
        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_main_panel(self, ctx);

        // 处理键盘输入
        self.handle_keyboard_input(ctx);

        let repaint_ms = self.config.get_config().window.repaint_interval_ms;
        ctx.request_repaint_after(Duration::from_millis(repaint_ms));
    }
}

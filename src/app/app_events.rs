use eframe::egui;
use log::{info, warn};

use super::app_core::BubbleLevelApp;

impl BubbleLevelApp {
    /// 窗口最小化时停止传感器投递，恢复时重新注册
    pub fn handle_visibility(&mut self, ctx: &egui::Context) {
        let minimized = ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        if self.state.view.visible == !minimized {
            return;
        }

        self.state.view.visible = !minimized;
        info!("Window {}", if minimized { "hidden" } else { "visible" });
        self.sync_sensor_registration();
    }

    /// Bring the sensor subscription in line with the current view state.
    pub fn sync_sensor_registration(&mut self) {
        let result = if self.state.wants_samples() {
            self.sensor.register()
        } else {
            self.sensor.unregister()
        };

        if let Err(e) = result {
            warn!("Failed to update sensor registration: {}", e);
            self.state.view.status_message = format!("Sensor error: {}", e);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state.view.user_paused = !self.state.view.user_paused;
        self.sync_sensor_registration();
    }

    /// R 键与状态栏按钮共用
    pub fn reset_min_max(&mut self) {
        self.state.reset_min_max();
    }

    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        let (space, reset) = ctx.input(|i| (i.key_pressed(egui::Key::Space), i.key_pressed(egui::Key::R)));

        if space {
            self.toggle_pause();
        }
        if reset {
            self.reset_min_max();
        }
    }
}

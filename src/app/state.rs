use crossbeam_channel::Receiver;
use log::{debug, info, warn};

use crate::config::{AppConfig, LevelConfig};
use crate::level::{AxisHistory, LevelReading, MinMax, TransformLimits};
use crate::types::AccelSample;

pub const SENSOR_STOPPED_MESSAGE: &str = "Sensor stream ended";
pub const MIN_MAX_RESET_MESSAGE: &str = "Min/Max reset";

/// 应用状态管理模块

/// Live level values, rebuilt from the sensor stream.
#[derive(Debug, Clone)]
pub struct LevelState {
    pub reading: LevelReading,
    pub history: AxisHistory,
    pub sample_count: u64,
    pub last_timestamp: Option<i64>,
    limits: TransformLimits,
}

impl LevelState {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            reading: LevelReading::default(),
            history: AxisHistory::new(config.history_capacity),
            sample_count: 0,
            last_timestamp: None,
            limits: TransformLimits::from(config),
        }
    }

    /// 处理一个原始样本：变换、记录历史
    pub fn apply(&mut self, sample: &AccelSample) -> LevelReading {
        let reading = sample.to_reading(self.limits);
        self.reading = reading;
        self.history.push(reading.angle.x, reading.angle.y);
        self.sample_count += 1;
        if sample.timestamp > 0 {
            self.last_timestamp = Some(sample.timestamp);
        }

        debug!(
            "AngleX: {:.2}, AngleY: {:.2}, Flat: {}",
            reading.angle.x, reading.angle.y, reading.is_flat
        );
        reading
    }

    pub fn min_max(&self) -> MinMax {
        self.history.min_max()
    }

    pub fn angle_limit(&self) -> f64 {
        self.limits.angle_limit
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
    }
}

/// 数据通道状态
#[derive(Debug)]
pub struct DataChannels {
    pub sample_receiver: Receiver<AccelSample>,
}

/// 界面状态
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// 窗口最小化时为 false
    pub visible: bool,
    /// 用户手动暂停
    pub user_paused: bool,
    pub show_history_plot: bool,
    pub status_message: String,
}

/// 统一的应用状态管理
#[derive(Debug)]
pub struct AppState {
    pub level: LevelState,
    pub channels: DataChannels,
    pub view: ViewState,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(sample_receiver: Receiver<AccelSample>, config: &AppConfig) -> Self {
        Self {
            level: LevelState::new(&config.level),
            channels: DataChannels { sample_receiver },
            view: ViewState {
                visible: true,
                user_paused: false,
                show_history_plot: config.display.show_history_plot,
                status_message: String::new(),
            },
        }
    }

    /// Whether the sensor should currently be delivering samples.
    pub fn wants_samples(&self) -> bool {
        self.view.visible && !self.view.user_paused
    }

    /// 取出通道中所有样本；`accept` 为 false 时直接丢弃
    pub fn drain_samples(&mut self, accept: bool) -> usize {
        let mut applied = 0;
        while let Ok(sample) = self.channels.sample_receiver.try_recv() {
            if accept {
                self.level.apply(&sample);
                applied += 1;
            }
        }
        applied
    }

    /// 清空最值历史
    pub fn reset_min_max(&mut self) {
        self.level.reset_history();
        self.view.status_message = MIN_MAX_RESET_MESSAGE.to_string();
        info!("Angle history cleared");
    }

    /// 传感器线程已退出，覆盖之前的提示
    pub fn mark_sensor_stopped(&mut self) {
        if self.view.status_message != SENSOR_STOPPED_MESSAGE {
            warn!("Sensor thread is no longer running");
            self.view.status_message = SENSOR_STOPPED_MESSAGE.to_string();
        }
    }

    /// 获取当前状态摘要
    pub fn get_status_summary(&self) -> &'static str {
        if !self.view.visible {
            "Hidden"
        } else if self.view.user_paused {
            "Paused"
        } else if self.level.reading.is_flat {
            "Flat"
        } else {
            "Measuring"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_channel() -> (AppState, crossbeam_channel::Sender<AccelSample>) {
        let (sender, receiver) = crossbeam_channel::bounded(16);
        (AppState::new(receiver, &AppConfig::default()), sender)
    }

    #[test]
    fn apply_updates_reading_and_history() {
        let mut level = LevelState::new(&LevelConfig::default());
        let reading = level.apply(&AccelSample::new(15.0, -3.0, 9.5, 42));
        assert_eq!(reading.angle.x, -10.0);
        assert_eq!(reading.angle.y, -3.0);
        assert!(reading.is_flat);
        assert_eq!(level.sample_count, 1);
        assert_eq!(level.last_timestamp, Some(42));

        level.apply(&AccelSample::new(-4.0, 2.0, 1.0, 0));
        let extremes = level.min_max();
        assert_eq!(extremes.max_x, 4.0);
        assert_eq!(extremes.min_x, -10.0);
        assert_eq!(extremes.max_y, 2.0);
        assert_eq!(extremes.min_y, -3.0);
        assert!(!level.reading.is_flat);
        assert_eq!(level.last_timestamp, Some(42));
    }

    #[test]
    fn history_is_bounded_by_config() {
        let config = LevelConfig {
            history_capacity: 5,
            ..LevelConfig::default()
        };
        let mut level = LevelState::new(&config);
        for i in 0..20 {
            level.apply(&AccelSample::new(-(i as f64) * 0.1, 0.0, 0.0, 0));
        }
        assert_eq!(level.history.x.len(), 5);
        assert_eq!(level.sample_count, 20);
    }

    #[test]
    fn drain_applies_or_discards() {
        let (mut state, sender) = state_with_channel();
        sender.send(AccelSample::new(1.0, 1.0, 1.0, 0)).unwrap();
        sender.send(AccelSample::new(2.0, 2.0, 2.0, 0)).unwrap();
        assert_eq!(state.drain_samples(true), 2);
        assert_eq!(state.level.sample_count, 2);

        sender.send(AccelSample::new(3.0, 3.0, 3.0, 0)).unwrap();
        assert_eq!(state.drain_samples(false), 0);
        assert_eq!(state.level.sample_count, 2);
        assert!(state.channels.sample_receiver.is_empty());
    }

    #[test]
    fn reset_clears_extremes_and_reports() {
        let (mut state, _sender) = state_with_channel();
        state.level.apply(&AccelSample::new(-6.0, 4.0, 0.0, 0));
        state.reset_min_max();
        assert_eq!(state.level.min_max(), MinMax::default());
        assert!(state.level.history.x.is_empty());
        assert_eq!(state.view.status_message, MIN_MAX_RESET_MESSAGE);
    }

    #[test]
    fn stopped_sensor_overrides_earlier_message() {
        let (mut state, _sender) = state_with_channel();
        state.reset_min_max();
        state.mark_sensor_stopped();
        assert_eq!(state.view.status_message, SENSOR_STOPPED_MESSAGE);

        state.mark_sensor_stopped();
        assert_eq!(state.view.status_message, SENSOR_STOPPED_MESSAGE);
    }

    #[test]
    fn status_follows_view_and_flatness() {
        let (mut state, _sender) = state_with_channel();
        assert_eq!(state.get_status_summary(), "Measuring");
        assert!(state.wants_samples());

        state.level.apply(&AccelSample::new(0.0, 0.0, -9.8, 0));
        assert_eq!(state.get_status_summary(), "Flat");

        state.view.user_paused = true;
        assert_eq!(state.get_status_summary(), "Paused");
        assert!(!state.wants_samples());

        state.view.visible = false;
        assert_eq!(state.get_status_summary(), "Hidden");
    }
}

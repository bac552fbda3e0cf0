use crate::config::ConfigError;
use crate::sensor::SensorError;

/// 启动阶段的致命错误
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Sensor(#[from] SensorError),
    #[error("GUI failed: {0}")]
    Gui(#[from] eframe::Error),
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::level::{ANGLE_LIMIT, DEFAULT_HISTORY_CAPACITY, FLAT_THRESHOLD};

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 默认配置文件名，可通过 BUBBLE_LEVEL_CONFIG 覆盖
pub const DEFAULT_CONFIG_FILE: &str = "bubble_level.toml";
pub const CONFIG_PATH_ENV: &str = "BUBBLE_LEVEL_CONFIG";

/// 主配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub sensor: SensorConfig,
    pub level: LevelConfig,
    pub display: DisplayConfig,
    pub channels: ChannelConfig,
}

/// 窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
    /// 重绘间隔 (ms)
    pub repaint_interval_ms: u64,
}

/// 传感器来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Mqtt,
    Simulated,
}

impl SensorKind {
    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Mqtt => "MQTT",
            SensorKind::Simulated => "Simulated",
        }
    }
}

/// 传感器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub source: SensorKind,
    pub mqtt: MqttConfig,
    pub simulated: SimulatedConfig,
}

/// MQTT配置，用户名密码从环境变量 MQTT_USER / MQTT_PASS 读取
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub topic: String,
    pub qos: u8,
    pub keep_alive: u16,
    pub connect_timeout_ms: u64,
}

/// 模拟加速度计配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedConfig {
    pub sample_interval_ms: u64,
    /// 每个样本的随机游走步长 (m/s²)
    pub step: f64,
    pub gravity: f64,
}

/// Transform limits and history size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub angle_limit: f64,
    pub flat_threshold: f64,
    pub history_capacity: usize,
}

/// 绘制配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub container_size: f32,
    pub bubble_size: f32,
    pub show_history_plot: bool,
    pub history_plot_height: f32,
    pub dark_mode: bool,
    pub colors: DisplayColors,
}

/// 绘制颜色配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayColors {
    pub primary: [u8; 3],
    pub bubble: [u8; 3],
    pub bubble_outline: [u8; 3],
    pub grid: [u8; 3],
    pub north: [u8; 3],
    pub x_axis: [u8; 3],
    pub y_axis: [u8; 3],
}

/// 通道配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub sample_channel_capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 640.0,
            title: "Bubble Level".to_string(),
            resizable: true,
            vsync: true,
            repaint_interval_ms: 60,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            source: SensorKind::Mqtt,
            mqtt: MqttConfig::default(),
            simulated: SimulatedConfig::default(),
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "bubble_level_client".to_string(),
            topic: "sensor/accelerometer".to_string(),
            qos: 1,
            keep_alive: 5,
            connect_timeout_ms: 3000,
        }
    }
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            // 与界面重绘间隔一致
            sample_interval_ms: 60,
            step: 0.35,
            gravity: 9.81,
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            angle_limit: ANGLE_LIMIT,
            flat_threshold: FLAT_THRESHOLD,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            container_size: 300.0,
            bubble_size: 30.0,
            show_history_plot: false,
            history_plot_height: 120.0,
            dark_mode: false,
            colors: DisplayColors::default(),
        }
    }
}

impl Default for DisplayColors {
    fn default() -> Self {
        Self {
            primary: [103, 80, 164],       // 紫色
            bubble: [98, 91, 113],
            bubble_outline: [255, 255, 255],
            grid: [28, 27, 31],
            north: [179, 38, 30],          // 红色
            x_axis: [255, 0, 0],
            y_axis: [0, 150, 0],
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            sample_channel_capacity: 1000,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        std::fs::write(path, content).map_err(ConfigError::IoError)?;
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN 与任何数比较都为 false，必须先检查有限性
        if !is_positive(f64::from(self.window.width)) || !is_positive(f64::from(self.window.height)) {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if !is_positive(self.level.angle_limit) {
            return Err(ConfigError::ValidationError("Angle limit must be positive".to_string()));
        }

        if !is_non_negative(self.level.flat_threshold) {
            return Err(ConfigError::ValidationError("Flat threshold must not be negative".to_string()));
        }

        if self.level.history_capacity == 0 {
            return Err(ConfigError::ValidationError("History capacity must be positive".to_string()));
        }

        let bubble_size = f64::from(self.display.bubble_size);
        let container_size = f64::from(self.display.container_size);
        if !is_positive(bubble_size) || !is_positive(container_size) || container_size <= bubble_size {
            return Err(ConfigError::ValidationError(
                "Container must be larger than the bubble".to_string(),
            ));
        }

        if self.sensor.mqtt.qos > 2 {
            return Err(ConfigError::ValidationError("MQTT QoS must be 0, 1 or 2".to_string()));
        }

        if self.sensor.mqtt.topic.is_empty() {
            return Err(ConfigError::ValidationError("MQTT topic must not be empty".to_string()));
        }

        if !is_positive(f64::from(self.display.history_plot_height)) {
            return Err(ConfigError::ValidationError("History plot height must be positive".to_string()));
        }

        if !is_non_negative(self.sensor.simulated.step) {
            return Err(ConfigError::ValidationError("Simulated step must be finite and not negative".to_string()));
        }

        if !is_positive(self.sensor.simulated.gravity) {
            return Err(ConfigError::ValidationError("Simulated gravity must be finite and positive".to_string()));
        }

        if self.sensor.simulated.sample_interval_ms == 0 {
            return Err(ConfigError::ValidationError("Sample interval must be positive".to_string()));
        }

        if self.channels.sample_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Sample channel capacity must be positive".to_string()));
        }

        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 按环境变量或默认文件名加载；文件不存在时使用默认配置
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        if path.exists() {
            log::info!("Loading config from {}", path.display());
            Self::load_from_file(&path)
        } else {
            log::info!("No config file at {}, writing defaults", path.display());
            let manager = Self {
                config: AppConfig::default(),
                config_path: Some(path),
            };
            // 写入失败不影响启动
            if let Err(e) = manager.save() {
                log::warn!("Failed to write default config: {}", e);
            }
            Ok(manager)
        }
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 保存配置
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.config_path {
            self.config.validate()?;
            self.config.save_to_file(path)?;
        }
        Ok(())
    }
}

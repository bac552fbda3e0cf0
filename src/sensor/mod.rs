pub mod mqtt;
pub mod simulated;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use log::{info, warn};

use crate::config::{SensorConfig, SensorKind};
use crate::types::AccelSample;

/// 传感器错误类型
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Sensor unavailable: {0}")]
    Unavailable(String),
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),
    #[error("Failed to spawn sensor thread: {0}")]
    Spawn(std::io::Error),
}

/// How sample delivery is switched on and off for a given source.
enum SensorControl {
    Mqtt {
        client: rumqttc::Client,
        topic: String,
        qos: rumqttc::QoS,
    },
    Simulated {
        active: Arc<AtomicBool>,
    },
}

/// Owning handle to a running sensor thread.
///
/// Delivery starts unregistered; the view calls [`SensorHandle::register`]
/// when it becomes visible and [`SensorHandle::unregister`] when hidden.
pub struct SensorHandle {
    kind: SensorKind,
    control: SensorControl,
    shutdown_signal: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    registered: bool,
}

/// 启动配置中指定的传感器来源。传感器不可用时返回错误（启动阶段致命）
pub fn start(config: &SensorConfig, sender: Sender<AccelSample>) -> Result<SensorHandle, SensorError> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    let (control, thread) = match config.source {
        SensorKind::Mqtt => {
            let (client, connection) = mqtt::connect(&config.mqtt)?;
            let thread = mqtt::spawn_reader(connection, sender, Arc::clone(&shutdown_signal))?;
            let control = SensorControl::Mqtt {
                client,
                topic: config.mqtt.topic.clone(),
                qos: mqtt::qos_from_level(config.mqtt.qos),
            };
            (control, thread)
        }
        SensorKind::Simulated => {
            let active = Arc::new(AtomicBool::new(false));
            let thread = simulated::spawn(
                config.simulated.clone(),
                sender,
                Arc::clone(&active),
                Arc::clone(&shutdown_signal),
            )?;
            (SensorControl::Simulated { active }, thread)
        }
    };

    info!("{} sensor started", config.source.label());

    Ok(SensorHandle {
        kind: config.source,
        control,
        shutdown_signal,
        thread: Some(thread),
        registered: false,
    })
}

impl SensorHandle {
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// 传感器线程是否仍在运行
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start sample delivery. No-op when already registered.
    pub fn register(&mut self) -> Result<(), SensorError> {
        if self.registered {
            return Ok(());
        }
        match &self.control {
            SensorControl::Mqtt { client, topic, qos } => {
                client.try_subscribe(topic.as_str(), *qos)?;
            }
            SensorControl::Simulated { active } => {
                active.store(true, Ordering::Relaxed);
            }
        }
        self.registered = true;
        info!("Sensor listener registered");
        Ok(())
    }

    /// Stop sample delivery. No-op when not registered.
    pub fn unregister(&mut self) -> Result<(), SensorError> {
        if !self.registered {
            return Ok(());
        }
        match &self.control {
            SensorControl::Mqtt { client, topic, .. } => {
                client.try_unsubscribe(topic.as_str())?;
            }
            SensorControl::Simulated { active } => {
                active.store(false, Ordering::Relaxed);
            }
        }
        self.registered = false;
        info!("Sensor listener unregistered");
        Ok(())
    }

    /// 通知传感器线程退出并等待其结束
    pub fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };

        info!("Signaling sensor thread to shutdown");
        self.shutdown_signal.store(true, Ordering::Relaxed);
        if let SensorControl::Mqtt { client, .. } = &self.control {
            // 断开连接以唤醒阻塞在 connection.iter() 上的线程
            if let Err(e) = client.try_disconnect() {
                warn!("MQTT disconnect request failed: {}", e);
            }
        }

        match thread.join() {
            Ok(()) => info!("Sensor thread shut down gracefully"),
            Err(e) => warn!("Sensor thread panicked: {:?}", e),
        }
    }
}

impl Drop for SensorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorConfig;
    use std::time::Duration;

    fn simulated_config() -> SensorConfig {
        let mut config = SensorConfig::default();
        config.source = SensorKind::Simulated;
        config.simulated.sample_interval_ms = 1;
        config
    }

    #[test]
    fn simulated_source_delivers_only_while_registered() {
        let (sender, receiver) = crossbeam_channel::bounded(64);
        let mut handle = start(&simulated_config(), sender).unwrap();
        assert_eq!(handle.kind(), SensorKind::Simulated);
        assert!(!handle.is_registered());

        std::thread::sleep(Duration::from_millis(20));
        assert!(receiver.try_recv().is_err());

        handle.register().unwrap();
        assert!(handle.is_registered());
        let sample = receiver.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(sample.z.is_finite());

        handle.unregister().unwrap();
        handle.unregister().unwrap();
        assert!(!handle.is_registered());

        handle.shutdown();
        assert!(!handle.is_running());
    }

    #[test]
    fn unreachable_broker_is_unavailable() {
        let mut config = SensorConfig::default();
        config.mqtt.broker = "127.0.0.1".to_string();
        // 端口 1 上不会有 MQTT broker
        config.mqtt.port = 1;
        config.mqtt.connect_timeout_ms = 500;
        let (sender, _receiver) = crossbeam_channel::bounded(1);
        let result = start(&config, sender);
        assert!(matches!(result, Err(SensorError::Unavailable(_))));
    }
}

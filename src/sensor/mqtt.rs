use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, TrySendError};
use dotenv::dotenv;
use log::{error, info, trace, warn};
use rumqttc::{Client, ConnectReturnCode, Connection, Event, MqttOptions, Packet, QoS};

use super::SensorError;
use crate::config::MqttConfig;
use crate::types::AccelSample;

pub fn qos_from_level(level: u8) -> QoS {
    match level {
        0 => QoS::AtMostOnce,
        2 => QoS::ExactlyOnce,
        _ => QoS::AtLeastOnce,
    }
}

/// 连接 broker 并等待 CONNACK，超时或被拒绝即视为传感器不可用
pub fn connect(config: &MqttConfig) -> Result<(Client, Connection), SensorError> {
    dotenv().ok(); // 加载 .env 文件

    let mut mqtt_options = MqttOptions::new(config.client_id.clone(), config.broker.clone(), config.port);

    if let Ok(mqtt_user) = env::var("MQTT_USER") {
        let mqtt_pass = env::var("MQTT_PASS").unwrap_or_default();
        mqtt_options.set_credentials(mqtt_user, mqtt_pass);
    }

    mqtt_options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive.max(1))));

    let (client, mut connection) = Client::new(mqtt_options, 10);
    let endpoint = format!("{}:{}", config.broker, config.port);
    let deadline = Instant::now() + Duration::from_millis(config.connect_timeout_ms);

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(SensorError::Unavailable(format!(
                "no CONNACK from {} within {}ms",
                endpoint, config.connect_timeout_ms
            )));
        }

        match connection.recv_timeout(remaining) {
            Ok(Ok(Event::Incoming(Packet::ConnAck(ack)))) => {
                if ack.code == ConnectReturnCode::Success {
                    info!("Connected to MQTT broker {}", endpoint);
                    return Ok((client, connection));
                }
                return Err(SensorError::Unavailable(format!(
                    "broker {} refused connection: {:?}",
                    endpoint, ack.code
                )));
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(SensorError::Unavailable(format!("{} unreachable: {}", endpoint, e)));
            }
            Err(_) => {
                return Err(SensorError::Unavailable(format!(
                    "no CONNACK from {} within {}ms",
                    endpoint, config.connect_timeout_ms
                )));
            }
        }
    }
}

pub fn spawn_reader(
    connection: Connection,
    sender: Sender<AccelSample>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, SensorError> {
    thread::Builder::new()
        .name("sensor-mqtt".to_string())
        .spawn(move || run_reader(connection, sender, shutdown_signal))
        .map_err(SensorError::Spawn)
}

fn run_reader(mut connection: Connection, sender: Sender<AccelSample>, shutdown_signal: Arc<AtomicBool>) {
    for event in connection.iter() {
        // 检查关闭信号
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("MQTT thread received shutdown signal, exiting gracefully");
            break;
        }

        match event {
            Ok(Event::Incoming(Packet::Publish(publish))) => match parse_sensor_data(&publish.payload) {
                Ok(sample) => match sender.try_send(sample) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => trace!("Sample channel full, dropping sample"),
                    Err(TrySendError::Disconnected(_)) => {
                        // 通道断开表示GUI已关闭，优雅退出
                        info!("Sample channel disconnected, MQTT thread exiting");
                        break;
                    }
                },
                Err(e) => warn!("Invalid sensor data on {}: {}", publish.topic, e),
            },
            Ok(Event::Incoming(Packet::SubAck(_))) => info!("Accelerometer subscription acknowledged"),
            Ok(_) => {}
            Err(e) => {
                if shutdown_signal.load(Ordering::Relaxed) {
                    break;
                }
                error!("MQTT connection error: {}", e);
                break;
            }
        }
    }
}

pub fn parse_sensor_data(payload: &[u8]) -> Result<AccelSample, String> {
    let payload_str = std::str::from_utf8(payload).map_err(|e| format!("Invalid UTF-8: {}", e))?;

    serde_json::from_str::<AccelSample>(payload_str).map_err(|e| format!("JSON parsing error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_payload() {
        let sample = parse_sensor_data(br#"{"x": 1.5, "y": -0.25, "z": 9.7, "timestamp": 1700000000123}"#).unwrap();
        assert_eq!(sample, AccelSample::new(1.5, -0.25, 9.7, 1_700_000_000_123));
    }

    #[test]
    fn timestamp_is_optional() {
        let sample = parse_sensor_data(br#"{"x": 0, "y": 0, "z": -9.81}"#).unwrap();
        assert_eq!(sample.timestamp, 0);
        assert_eq!(sample.z, -9.81);
    }

    #[test]
    fn rejects_missing_axis_and_garbage() {
        assert!(parse_sensor_data(br#"{"x": 1.0, "y": 2.0}"#).is_err());
        assert!(parse_sensor_data(b"offline").is_err());
        assert!(parse_sensor_data(&[0xff, 0xfe]).unwrap_err().starts_with("Invalid UTF-8"));
    }

    #[test]
    fn qos_levels_map() {
        assert_eq!(qos_from_level(0), QoS::AtMostOnce);
        assert_eq!(qos_from_level(1), QoS::AtLeastOnce);
        assert_eq!(qos_from_level(2), QoS::ExactlyOnce);
    }
}

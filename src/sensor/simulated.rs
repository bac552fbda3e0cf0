use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Sender, TrySendError};
use log::{info, trace};
use rand::Rng;

use super::SensorError;
use crate::config::SimulatedConfig;
use crate::types::AccelSample;

/// 随机游走的模拟加速度计，用于没有硬件时的桌面调试
pub struct SimulatedAccelerometer<R: Rng> {
    rng: R,
    config: SimulatedConfig,
    x: f64,
    y: f64,
    /// Remaining samples of a "lay it down" phase that pulls x/y to zero.
    settle_remaining: u32,
}

const SETTLE_PROBABILITY: f64 = 0.01;
const SETTLE_SAMPLES: u32 = 80;
const SETTLE_DECAY: f64 = 0.85;
const CENTER_PULL: f64 = 0.02;

impl<R: Rng> SimulatedAccelerometer<R> {
    pub fn new(rng: R, config: SimulatedConfig) -> Self {
        Self {
            rng,
            config,
            x: 0.0,
            y: 0.0,
            settle_remaining: 0,
        }
    }

    pub fn next_sample(&mut self, timestamp: i64) -> AccelSample {
        let gravity = self.config.gravity.abs();
        let step = self.config.step.abs();

        if self.settle_remaining > 0 {
            self.settle_remaining -= 1;
            self.x *= SETTLE_DECAY;
            self.y *= SETTLE_DECAY;
        } else {
            if self.rng.random_bool(SETTLE_PROBABILITY) {
                self.settle_remaining = SETTLE_SAMPLES;
            }
            self.x += self.rng.random_range(-step..=step) - self.x * CENTER_PULL;
            self.y += self.rng.random_range(-step..=step) - self.y * CENTER_PULL;
            self.x = self.x.clamp(-gravity, gravity);
            self.y = self.y.clamp(-gravity, gravity);
        }

        // 剩余分量落在 z 轴上，保证 |a| ≈ g
        let z = (gravity * gravity - self.x * self.x - self.y * self.y).max(0.0).sqrt();
        AccelSample::new(self.x, self.y, z, timestamp)
    }
}

pub fn spawn(
    config: SimulatedConfig,
    sender: Sender<AccelSample>,
    active: Arc<AtomicBool>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, SensorError> {
    thread::Builder::new()
        .name("sensor-simulated".to_string())
        .spawn(move || {
            let interval = Duration::from_millis(config.sample_interval_ms);
            let mut accelerometer = SimulatedAccelerometer::new(rand::rng(), config);

            while !shutdown_signal.load(Ordering::Relaxed) {
                if active.load(Ordering::Relaxed) {
                    let sample = accelerometer.next_sample(chrono::Utc::now().timestamp_millis());
                    match sender.try_send(sample) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => trace!("Sample channel full, dropping sample"),
                        Err(TrySendError::Disconnected(_)) => {
                            info!("Sample channel disconnected, simulated sensor exiting");
                            return;
                        }
                    }
                }
                thread::sleep(interval);
            }
            info!("Simulated sensor received shutdown signal, exiting gracefully");
        })
        .map_err(SensorError::Spawn)
}

/// Raw accelerometer reading as delivered by the sensor source (m/s²).
#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, PartialEq)]
pub struct AccelSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub timestamp: i64, // 毫秒时间戳，缺省为 0
}

impl AccelSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp: i64) -> Self {
        Self { x, y, z, timestamp }
    }
}

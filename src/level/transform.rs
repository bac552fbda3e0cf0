use crate::config::LevelConfig;
use crate::types::AccelSample;

/// 显示用的倾斜值上限（与加速度计原始单位一致）
pub const ANGLE_LIMIT: f64 = 10.0;

/// |z| 超过该值视为水平放置 (m/s²)
pub const FLAT_THRESHOLD: f64 = 9.0;

/// Clamped, sign-adjusted tilt pair. Not a trigonometric angle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngleSample {
    pub x: f64,
    pub y: f64,
}

/// Output of a single transform step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelReading {
    pub angle: AngleSample,
    pub is_flat: bool,
}

/// Limits used by [`transform_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformLimits {
    pub angle_limit: f64,
    pub flat_threshold: f64,
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self {
            angle_limit: ANGLE_LIMIT,
            flat_threshold: FLAT_THRESHOLD,
        }
    }
}

impl From<&LevelConfig> for TransformLimits {
    fn from(config: &LevelConfig) -> Self {
        Self {
            angle_limit: config.angle_limit,
            flat_threshold: config.flat_threshold,
        }
    }
}

/// 将任意浮点数限制到 [-limit, limit]，NaN 视为 0
pub fn clamp_angle(value: f64, limit: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-limit, limit)
}

pub fn is_flat(z: f64, threshold: f64) -> bool {
    z.abs() > threshold
}

/// X is inverted so the bubble drifts toward the raised edge.
pub fn transform_with(x: f64, y: f64, z: f64, limits: TransformLimits) -> LevelReading {
    LevelReading {
        angle: AngleSample {
            x: clamp_angle(-x, limits.angle_limit),
            y: clamp_angle(y, limits.angle_limit),
        },
        is_flat: is_flat(z, limits.flat_threshold),
    }
}

/// Transform with the built-in ±10 / 9.0 limits.
#[cfg(test)]
pub fn transform(x: f64, y: f64, z: f64) -> LevelReading {
    transform_with(x, y, z, TransformLimits::default())
}

impl AccelSample {
    pub fn to_reading(&self, limits: TransformLimits) -> LevelReading {
        transform_with(self.x, self.y, self.z, limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_inverts_x() {
        let reading = transform(15.0, -3.0, 9.5);
        assert_eq!(reading.angle.x, -10.0);
        assert_eq!(reading.angle.y, -3.0);
        assert!(reading.is_flat);
    }

    #[test]
    fn zero_input_is_centered_and_not_flat() {
        let reading = transform(0.0, 0.0, 0.0);
        assert_eq!(reading.angle.x, 0.0);
        assert_eq!(reading.angle.y, 0.0);
        assert!(!reading.is_flat);
    }

    #[test]
    fn clamp_output_stays_in_range() {
        let inputs = [
            f64::NEG_INFINITY,
            f64::MIN,
            -1e9,
            -10.000001,
            -10.0,
            -3.25,
            -0.0,
            0.0,
            4.5,
            10.0,
            10.5,
            1e12,
            f64::MAX,
            f64::INFINITY,
            f64::NAN,
        ];
        for value in inputs {
            let clamped = clamp_angle(value, ANGLE_LIMIT);
            assert!(
                (-ANGLE_LIMIT..=ANGLE_LIMIT).contains(&clamped),
                "{} clamped to {}",
                value,
                clamped
            );

            let reading = transform(value, value, 0.0);
            assert!((-ANGLE_LIMIT..=ANGLE_LIMIT).contains(&reading.angle.x));
            assert!((-ANGLE_LIMIT..=ANGLE_LIMIT).contains(&reading.angle.y));
        }
    }

    #[test]
    fn flatness_uses_strict_threshold_on_both_signs() {
        assert!(!is_flat(9.0, FLAT_THRESHOLD));
        assert!(!is_flat(-9.0, FLAT_THRESHOLD));
        assert!(is_flat(9.0001, FLAT_THRESHOLD));
        assert!(is_flat(-9.81, FLAT_THRESHOLD));
        assert!(!is_flat(4.0, FLAT_THRESHOLD));
        assert!(!is_flat(f64::NAN, FLAT_THRESHOLD));
    }

    #[test]
    fn custom_limits_are_respected() {
        let limits = TransformLimits {
            angle_limit: 5.0,
            flat_threshold: 9.5,
        };
        let reading = transform_with(-7.0, 6.0, 9.4, limits);
        assert_eq!(reading.angle, AngleSample { x: 5.0, y: 5.0 });
        assert!(!reading.is_flat);
    }

    #[test]
    fn sample_conversion_matches_transform() {
        let sample = AccelSample::new(2.5, 1.0, -9.8, 1_700_000_000_000);
        let reading = sample.to_reading(TransformLimits::default());
        assert_eq!(reading, transform(2.5, 1.0, -9.8));
        assert_eq!(reading.angle.x, -2.5);
    }
}

pub mod history;
pub mod transform;

pub use history::{AxisHistory, HistoryBuffer, MinMax, DEFAULT_HISTORY_CAPACITY};
pub use transform::{AngleSample, LevelReading, TransformLimits, ANGLE_LIMIT, FLAT_THRESHOLD};

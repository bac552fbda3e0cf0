use std::collections::VecDeque;

/// 每个轴默认保留最近 500 个值
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

/// Bounded FIFO of angle values. Length never exceeds `capacity`.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    values: VecDeque<f64>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        // 先移除最旧的数据，再追加 - O(1)
        while self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Smallest retained value, 0 when empty.
    pub fn min(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Largest retained value, 0 when empty.
    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// X/Y history pair, always appended together.
#[derive(Debug, Clone, Default)]
pub struct AxisHistory {
    pub x: HistoryBuffer,
    pub y: HistoryBuffer,
}

/// Running extremes shown under the level.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MinMax {
    pub max_x: f64,
    pub min_x: f64,
    pub max_y: f64,
    pub min_y: f64,
}

impl AxisHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            x: HistoryBuffer::new(capacity),
            y: HistoryBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn min_max(&self) -> MinMax {
        MinMax {
            max_x: self.x.max(),
            min_x: self.x.min(),
            max_y: self.y.max(),
            min_y: self.y.min(),
        }
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_reports_zero() {
        let buffer = HistoryBuffer::default();
        assert!(buffer.is_empty());
        assert_eq!(buffer.min(), 0.0);
        assert_eq!(buffer.max(), 0.0);
        assert_eq!(buffer.latest(), None);
        assert_eq!(buffer.capacity(), 500);
    }

    #[test]
    fn evicts_oldest_after_capacity() {
        let mut buffer = HistoryBuffer::default();
        // 第一个值是唯一的最小值，被淘汰后最小值应改变
        buffer.push(-9.5);
        for i in 0..500 {
            buffer.push((i % 7) as f64);
            assert!(buffer.len() <= 500);
        }
        assert_eq!(buffer.len(), 500);
        assert!(buffer.iter().all(|v| v != -9.5));
        assert_eq!(buffer.min(), 0.0);
        assert_eq!(buffer.max(), 6.0);
    }

    #[test]
    fn keeps_insertion_order() {
        let mut buffer = HistoryBuffer::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            buffer.push(v);
        }
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest(), Some(4.0));
    }

    #[test]
    fn min_max_track_negative_values() {
        let mut buffer = HistoryBuffer::new(10);
        for v in [-3.0, -7.5, -1.25] {
            buffer.push(v);
        }
        assert_eq!(buffer.min(), -7.5);
        assert_eq!(buffer.max(), -1.25);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut buffer = HistoryBuffer::new(0);
        buffer.push(1.0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn axis_history_reports_both_axes() {
        let mut history = AxisHistory::new(500);
        history.push(-10.0, 3.0);
        history.push(4.0, -2.0);
        let extremes = history.min_max();
        assert_eq!(
            extremes,
            MinMax {
                max_x: 4.0,
                min_x: -10.0,
                max_y: 3.0,
                min_y: -2.0,
            }
        );

        history.clear();
        assert_eq!(history.min_max(), MinMax::default());
    }
}

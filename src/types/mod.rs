pub mod accel_sample;

pub use accel_sample::AccelSample;

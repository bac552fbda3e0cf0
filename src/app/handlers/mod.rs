pub mod samples;

pub use samples::SampleHandler;

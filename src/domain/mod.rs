// Domain layer - Weather samples and the resampling core
pub mod axis;
pub mod chart;
pub mod dashboard;
pub mod metric;
pub mod resampler;
pub mod sample;

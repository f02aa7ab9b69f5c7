// Application layer - Dashboard use cases over the resampling core
pub mod dashboard_service;
pub mod streaming_service;

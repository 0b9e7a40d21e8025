// Application layer - Generation use cases and the ports they depend on
pub mod alarm_generator;
pub mod dashboard_generator;
pub mod monitoring_service;
pub mod monitoring_sink;
pub mod quota_source;

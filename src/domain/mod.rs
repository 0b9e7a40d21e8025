// Domain layer - Plain types, no I/O
pub mod alarm;
pub mod dashboard;
pub mod error;
pub mod metric;
pub mod plan;
pub mod quota;

// Generation errors - every one aborts the whole pass
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MonitorError {
    #[error("quota code {code} has no registry entry")]
    UnregisteredQuota { code: String },

    #[error("quota code {code} is registered more than once")]
    DuplicateQuota { code: String },

    #[error("quota code {code} has no metrics")]
    EmptyMetrics { code: String },

    #[error("quota code {code} has no model id")]
    EmptyModel { code: String },

    #[error("quota code {code} did not resolve to exactly one fetched value")]
    UnresolvedQuota { code: String },

    #[error("lookup for {code} returned no {field}")]
    MissingQuotaField { code: String, field: &'static str },

    #[error("row for model {model_id} has {columns} widgets, dashboard grid has {limit} columns")]
    LayoutOverflow {
        model_id: String,
        columns: u32,
        limit: u32,
    },

    #[error("dashboard layout is invalid: {reason}")]
    InvalidLayout { reason: String },

    #[error("threshold tier {severity} is invalid: {reason}")]
    InvalidTier { severity: String, reason: String },
}

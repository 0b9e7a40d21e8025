// Quota domain model
use super::error::MonitorError;
use serde::Serialize;
use std::collections::HashMap;

/// A tracked service quota: which model it limits and which metrics count against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaDefinition {
    pub code: String,
    pub model_id: String,
    pub metrics: Vec<String>,
}

impl QuotaDefinition {
    pub fn new(code: impl Into<String>, model_id: impl Into<String>, metrics: Vec<String>) -> Self {
        Self {
            code: code.into(),
            model_id: model_id.into(),
            metrics,
        }
    }

    pub fn is_combined(&self) -> bool {
        self.metrics.len() > 1
    }

    /// Query ids `m0..mN`, one per metric.
    pub fn metric_ids(&self) -> Vec<String> {
        (0..self.metrics.len()).map(|idx| format!("m{}", idx)).collect()
    }

    /// Arithmetic sum over all metric ids, e.g. `m0+m1`.
    pub fn sum_expression(&self) -> String {
        self.metric_ids().join("+")
    }
}

/// Current value of a quota as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaValue {
    pub code: String,
    pub name: String,
    pub value: f64,
}

impl QuotaValue {
    pub fn new(code: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            value,
        }
    }
}

/// A fetched quota value joined with its registry entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedQuota {
    pub quota_code: String,
    pub quota_name: String,
    pub value: f64,
    pub model_info: QuotaDefinition,
}

impl ResolvedQuota {
    pub fn model_id(&self) -> &str {
        &self.model_info.model_id
    }
}

/// All resolved quotas of one model, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGroup {
    pub model_id: String,
    pub quotas: Vec<ResolvedQuota>,
}

impl ModelGroup {
    /// Distinct metrics across the group, first appearance wins.
    pub fn distinct_metrics(&self) -> Vec<String> {
        let mut metrics: Vec<String> = Vec::new();
        for quota in &self.quotas {
            for metric in &quota.model_info.metrics {
                if !metrics.contains(metric) {
                    metrics.push(metric.clone());
                }
            }
        }
        metrics
    }
}

/// Immutable, ordered table of quota definitions keyed by quota code.
#[derive(Debug, Clone)]
pub struct QuotaRegistry {
    definitions: Vec<QuotaDefinition>,
    index: HashMap<String, usize>,
}

impl QuotaRegistry {
    pub fn new(definitions: Vec<QuotaDefinition>) -> Result<Self, MonitorError> {
        let mut index = HashMap::with_capacity(definitions.len());

        for (position, definition) in definitions.iter().enumerate() {
            if definition.metrics.is_empty() {
                return Err(MonitorError::EmptyMetrics {
                    code: definition.code.clone(),
                });
            }
            if definition.model_id.trim().is_empty() {
                return Err(MonitorError::EmptyModel {
                    code: definition.code.clone(),
                });
            }
            if index.insert(definition.code.clone(), position).is_some() {
                return Err(MonitorError::DuplicateQuota {
                    code: definition.code.clone(),
                });
            }
        }

        Ok(Self { definitions, index })
    }

    pub fn lookup(&self, code: &str) -> Result<&QuotaDefinition, MonitorError> {
        self.index
            .get(code)
            .map(|&position| &self.definitions[position])
            .ok_or_else(|| MonitorError::UnregisteredQuota {
                code: code.to_string(),
            })
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Join a fetched value with its definition. Unknown codes are fatal.
    pub fn resolve(&self, value: QuotaValue) -> Result<ResolvedQuota, MonitorError> {
        let definition = self.lookup(&value.code)?;
        Ok(ResolvedQuota {
            quota_code: value.code,
            quota_name: value.name,
            value: value.value,
            model_info: definition.clone(),
        })
    }
}

/// Group resolved quotas by model, models in discovery order.
pub fn group_by_model(quotas: &[ResolvedQuota]) -> Vec<ModelGroup> {
    let mut groups: Vec<ModelGroup> = Vec::new();

    for quota in quotas {
        match groups.iter_mut().find(|g| g.model_id == quota.model_id()) {
            Some(group) => group.quotas.push(quota.clone()),
            None => groups.push(ModelGroup {
                model_id: quota.model_id().to_string(),
                quotas: vec![quota.clone()],
            }),
        }
    }

    groups
}

// Dashboard generator - Lays out one row of widgets per model
use crate::domain::dashboard::{
    Annotations, DashboardBody, HorizontalAnnotation, MetricLine, Position, Widget, WidgetProperties,
    WidgetView, GRID_COLUMNS, MAX_WIDGET_HEIGHT,
};
use crate::domain::error::MonitorError;
use crate::domain::metric::MetricSource;
use crate::domain::quota::{ModelGroup, ResolvedQuota};

const TOTAL_LABEL: &str = "Total";
const TOTAL_COLOR: &str = "#1f77b4";
const QUOTA_LINE_COLOR: &str = "#ff9900";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardLayout {
    pub widget_width: u32,
    pub widget_height: u32,
    pub time_series_period: u32,
    pub peak_stat: String,
    pub peak_period: u32,
    pub daily_period: u32,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            widget_width: 6,
            widget_height: 6,
            time_series_period: 60,
            peak_stat: "p99".to_string(),
            peak_period: 60,
            daily_period: 86_400,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardGenerator {
    layout: DashboardLayout,
    source: MetricSource,
    region: String,
}

impl DashboardLayout {
    pub fn validate(&self) -> Result<(), MonitorError> {
        if !(1..=GRID_COLUMNS).contains(&self.widget_width) {
            return Err(MonitorError::InvalidLayout {
                reason: format!(
                    "widget width {} must be between 1 and {}",
                    self.widget_width, GRID_COLUMNS
                ),
            });
        }
        if !(1..=MAX_WIDGET_HEIGHT).contains(&self.widget_height) {
            return Err(MonitorError::InvalidLayout {
                reason: format!(
                    "widget height {} must be between 1 and {}",
                    self.widget_height, MAX_WIDGET_HEIGHT
                ),
            });
        }
        Ok(())
    }
}

impl DashboardGenerator {
    pub fn new(
        layout: DashboardLayout,
        source: MetricSource,
        region: String,
    ) -> Result<Self, MonitorError> {
        layout.validate()?;
        Ok(Self {
            layout,
            source,
            region,
        })
    }

    /// Build the full widget grid. Rows follow model discovery order,
    /// columns follow registry order within a model.
    pub fn generate(&self, groups: &[ModelGroup]) -> Result<DashboardBody, MonitorError> {
        let mut widgets = Vec::new();

        for (row, group) in groups.iter().enumerate() {
            let y = self.row_offset(row, group)?;
            let width = self.column_width(group)?;

            for (column, quota) in group.quotas.iter().enumerate() {
                widgets.push(Widget::metric(
                    self.position(y, column, width),
                    self.quota_properties(quota),
                ));
            }

            let column = group.quotas.len();
            widgets.push(Widget::metric(
                self.position(y, column, width),
                self.peak_properties(group),
            ));
            widgets.push(Widget::metric(
                self.position(y, column + 1, width),
                self.daily_total_properties(group),
            ));

            tracing::debug!(
                "Laid out {} widgets of width {} for model {} in row {}",
                column + 2,
                width,
                group.model_id,
                row
            );
        }

        Ok(DashboardBody::new(widgets))
    }

    /// Configured width when the whole row fits, otherwise the widest
    /// width that keeps every widget of the model on one row.
    fn column_width(&self, group: &ModelGroup) -> Result<u32, MonitorError> {
        let columns = u32::try_from(group.quotas.len().saturating_add(2)).unwrap_or(u32::MAX);
        if columns > GRID_COLUMNS {
            return Err(MonitorError::LayoutOverflow {
                model_id: group.model_id.clone(),
                columns,
                limit: GRID_COLUMNS,
            });
        }

        match columns.checked_mul(self.layout.widget_width) {
            Some(needed) if needed <= GRID_COLUMNS => Ok(self.layout.widget_width),
            _ => Ok(GRID_COLUMNS / columns),
        }
    }

    fn row_offset(&self, row: usize, group: &ModelGroup) -> Result<u32, MonitorError> {
        u32::try_from(row)
            .ok()
            .and_then(|row| row.checked_mul(self.layout.widget_height))
            .ok_or_else(|| MonitorError::InvalidLayout {
                reason: format!(
                    "row {} for model {} is beyond the dashboard height",
                    row, group.model_id
                ),
            })
    }

    fn position(&self, y: u32, column: usize, width: u32) -> Position {
        // column < GRID_COLUMNS and width <= GRID_COLUMNS after column_width
        Position {
            x: column as u32 * width,
            y,
            width,
            height: self.layout.widget_height,
        }
    }

    fn quota_properties(&self, quota: &ResolvedQuota) -> WidgetProperties {
        let definition = &quota.model_info;
        let mut metrics: Vec<MetricLine> = definition
            .metrics
            .iter()
            .zip(definition.metric_ids())
            .map(|(metric, id)| self.source.line(metric, &definition.model_id, id))
            .collect();

        if definition.is_combined() {
            metrics.push(MetricLine::Expression {
                expression: definition.sum_expression(),
                label: TOTAL_LABEL.to_string(),
                color: TOTAL_COLOR.to_string(),
            });
        }

        WidgetProperties {
            metrics,
            view: WidgetView::TimeSeries,
            stat: "Sum".to_string(),
            period: self.layout.time_series_period,
            region: self.region.clone(),
            title: format!(
                "{} ({}) - {}",
                quota.quota_name, quota.quota_code, definition.model_id
            ),
            annotations: Some(Annotations {
                horizontal: vec![HorizontalAnnotation {
                    label: format!("Quota: {}", quota.value),
                    value: quota.value,
                    color: QUOTA_LINE_COLOR.to_string(),
                }],
            }),
        }
    }

    fn model_lines(&self, group: &ModelGroup) -> Vec<MetricLine> {
        group
            .distinct_metrics()
            .iter()
            .enumerate()
            .map(|(idx, metric)| self.source.line(metric, &group.model_id, format!("m{}", idx)))
            .collect()
    }

    fn peak_properties(&self, group: &ModelGroup) -> WidgetProperties {
        WidgetProperties {
            metrics: self.model_lines(group),
            view: WidgetView::SingleValue,
            stat: self.layout.peak_stat.clone(),
            period: self.layout.peak_period,
            region: self.region.clone(),
            title: format!("Peak usage ({}) - {}", self.layout.peak_stat, group.model_id),
            annotations: None,
        }
    }

    fn daily_total_properties(&self, group: &ModelGroup) -> WidgetProperties {
        WidgetProperties {
            metrics: self.model_lines(group),
            view: WidgetView::SingleValue,
            stat: "Sum".to_string(),
            period: self.layout.daily_period,
            region: self.region.clone(),
            title: format!("Daily total - {}", group.model_id),
            annotations: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quota::{group_by_model, QuotaDefinition, QuotaRegistry, QuotaValue};

    fn groups() -> Vec<ModelGroup> {
        let registry = QuotaRegistry::new(vec![
            QuotaDefinition::new(
                "L-FF8B4E28",
                "sonnet",
                vec!["InputTokenCount".to_string(), "OutputTokenCount".to_string()],
            ),
            QuotaDefinition::new("L-1D3E59A3", "sonnet", vec!["Invocations".to_string()]),
            QuotaDefinition::new(
                "L-DCADBC78",
                "haiku",
                vec!["InputTokenCount".to_string(), "OutputTokenCount".to_string()],
            ),
            QuotaDefinition::new("L-616A3F5B", "haiku", vec!["Invocations".to_string()]),
        ])
        .unwrap();

        let resolved: Vec<_> = registry
            .codes()
            .map(|code| {
                registry
                    .resolve(QuotaValue::new(code, format!("quota {}", code), 1000.0))
                    .unwrap()
            })
            .collect();
        group_by_model(&resolved)
    }

    fn generator() -> DashboardGenerator {
        DashboardGenerator::new(
            DashboardLayout::default(),
            MetricSource::default(),
            "us-east-1".to_string(),
        )
        .unwrap()
    }

    fn single_model(quota_count: usize) -> Vec<ModelGroup> {
        let registry = QuotaRegistry::new(
            (0..quota_count)
                .map(|i| QuotaDefinition::new(format!("L-{}", i), "m", vec!["Invocations".to_string()]))
                .collect(),
        )
        .unwrap();

        let resolved: Vec<_> = registry
            .codes()
            .map(|code| registry.resolve(QuotaValue::new(code, "quota", 50.0)).unwrap())
            .collect();
        group_by_model(&resolved)
    }

    fn layout(widget_width: u32, widget_height: u32) -> DashboardLayout {
        DashboardLayout {
            widget_width,
            widget_height,
            ..DashboardLayout::default()
        }
    }

    #[test]
    fn test_widget_count_is_items_plus_two_per_model() {
        let body = generator().generate(&groups()).unwrap();
        assert_eq!(body.widgets.len(), (2 + 2) * 2);
    }

    #[test]
    fn test_rows_are_distinct_bands_without_overlap() {
        let body = generator().generate(&groups()).unwrap();

        for (i, a) in body.widgets.iter().enumerate() {
            for b in body.widgets.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }

        let first_row: Vec<_> = body.widgets[..4].iter().collect();
        let second_row: Vec<_> = body.widgets[4..].iter().collect();
        assert!(first_row.iter().all(|w| w.y == 0));
        assert!(second_row.iter().all(|w| w.y == 6));
        assert!(first_row.windows(2).all(|pair| pair[0].x < pair[1].x));
        assert_eq!(first_row.last().unwrap().right(), GRID_COLUMNS);
    }

    #[test]
    fn test_quota_widget_sums_multiple_metrics() {
        let body = generator().generate(&groups()).unwrap();

        let tokens = &body.widgets[0].properties;
        assert_eq!(tokens.title, "quota L-FF8B4E28 (L-FF8B4E28) - sonnet");
        assert_eq!(tokens.metrics.len(), 3);
        assert_eq!(
            tokens.metrics[2],
            MetricLine::Expression {
                expression: "m0+m1".to_string(),
                label: "Total".to_string(),
                color: "#1f77b4".to_string(),
            }
        );

        let invocations = &body.widgets[1].properties;
        assert_eq!(invocations.metrics.len(), 1);
        let annotation = &invocations.annotations.as_ref().unwrap().horizontal[0];
        assert_eq!(annotation.label, "Quota: 1000");
        assert_eq!(annotation.value, 1000.0);
    }

    #[test]
    fn test_peak_and_daily_widgets() {
        let body = generator().generate(&groups()).unwrap();

        let peak = &body.widgets[2].properties;
        assert_eq!(peak.view, WidgetView::SingleValue);
        assert_eq!(peak.stat, "p99");
        assert_eq!(peak.metrics.len(), 3);

        let daily = &body.widgets[3].properties;
        assert_eq!(daily.stat, "Sum");
        assert_eq!(daily.period, 86_400);
        assert_eq!(daily.title, "Daily total - sonnet");
    }

    #[test]
    fn test_three_quota_model_stays_on_one_row() {
        let body = generator().generate(&single_model(3)).unwrap();

        assert_eq!(body.widgets.len(), 5);
        assert!(body.widgets.iter().all(|w| w.y == 0 && w.width == 4));
        assert!(body.widgets.windows(2).all(|pair| pair[0].right() <= pair[1].x));
        assert_eq!(body.widgets.last().unwrap().right(), 20);
    }

    #[test]
    fn test_wide_widgets_shrink_to_fit_row() {
        let wide = DashboardGenerator::new(layout(8, 6), MetricSource::default(), "us-east-1".to_string())
            .unwrap();
        let body = wide.generate(&groups()).unwrap();

        assert!(body.widgets.iter().all(|w| w.width == 6));
        assert!(body.widgets.iter().all(|w| w.right() <= GRID_COLUMNS));
    }

    #[test]
    fn test_row_that_cannot_fit_at_width_one_is_rejected() {
        assert!(generator().generate(&single_model(22)).is_ok());
        assert_eq!(
            generator().generate(&single_model(23)).unwrap_err(),
            MonitorError::LayoutOverflow {
                model_id: "m".to_string(),
                columns: 25,
                limit: GRID_COLUMNS,
            }
        );
    }

    #[test]
    fn test_layout_is_validated_up_front() {
        for (width, height) in [(0, 6), (2_000_000_000, 6), (25, 6), (6, 0), (6, MAX_WIDGET_HEIGHT + 1)] {
            let result = DashboardGenerator::new(
                layout(width, height),
                MetricSource::default(),
                "us-east-1".to_string(),
            );
            assert!(
                matches!(result, Err(MonitorError::InvalidLayout { .. })),
                "{}x{} should be rejected",
                width,
                height
            );
        }
        assert!(layout(GRID_COLUMNS, MAX_WIDGET_HEIGHT).validate().is_ok());
    }

    #[test]
    fn test_body_json_shape() {
        let body = generator().generate(&groups()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body.to_json().unwrap()).unwrap();

        let first = &json["widgets"][0];
        assert_eq!(first["type"], "metric");
        assert_eq!(first["properties"]["view"], "timeSeries");
        assert_eq!(first["properties"]["metrics"][0][0], "AWS/Bedrock");
        assert_eq!(first["properties"]["metrics"][0][4]["id"], "m0");
        assert!(json["widgets"][2]["properties"].get("annotations").is_none());
    }
}

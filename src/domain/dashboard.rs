// Dashboard domain model, serialized in the CloudWatch dashboard body format
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

/// Columns available in a CloudWatch dashboard row.
pub const GRID_COLUMNS: u32 = 24;

/// Tallest widget CloudWatch accepts, in grid units.
pub const MAX_WIDGET_HEIGHT: u32 = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardBody {
    pub widgets: Vec<Widget>,
}

impl DashboardBody {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self { widgets }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Widget {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub properties: WidgetProperties,
}

impl Widget {
    pub fn metric(position: Position, properties: WidgetProperties) -> Self {
        Self {
            kind: "metric",
            x: position.x,
            y: position.y,
            width: position.width,
            height: position.height,
            properties,
        }
    }
}

#[cfg(test)]
impl Widget {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn overlaps(&self, other: &Widget) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetView {
    TimeSeries,
    SingleValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct WidgetProperties {
    pub metrics: Vec<MetricLine>,
    pub view: WidgetView,
    pub stat: String,
    pub period: u32,
    pub region: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotations {
    pub horizontal: Vec<HorizontalAnnotation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HorizontalAnnotation {
    pub label: String,
    pub value: f64,
    pub color: String,
}

/// One entry of a widget's `metrics` array.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricLine {
    Metric {
        namespace: String,
        metric_name: String,
        dimension_name: String,
        dimension_value: String,
        id: String,
    },
    Expression {
        expression: String,
        label: String,
        color: String,
    },
}

#[derive(Serialize)]
struct MetricOptions<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct ExpressionOptions<'a> {
    expression: &'a str,
    label: &'a str,
    color: &'a str,
}

impl Serialize for MetricLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricLine::Metric {
                namespace,
                metric_name,
                dimension_name,
                dimension_value,
                id,
            } => {
                let mut seq = serializer.serialize_seq(Some(5))?;
                seq.serialize_element(namespace)?;
                seq.serialize_element(metric_name)?;
                seq.serialize_element(dimension_name)?;
                seq.serialize_element(dimension_value)?;
                seq.serialize_element(&MetricOptions { id })?;
                seq.end()
            }
            MetricLine::Expression {
                expression,
                label,
                color,
            } => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&ExpressionOptions {
                    expression,
                    label,
                    color,
                })?;
                seq.end()
            }
        }
    }
}

//! Chart descriptions
//!
//! Pure mapping from a [`DashboardSnapshot`] to three declarative chart
//! specs. Drawing is left to a [`super::ChartSurface`]; specs can also be
//! serialized to Chart.js configuration objects.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::snapshot::DashboardSnapshot;

/// Canvas id of the requests/response-time chart
pub const REQUESTS_CHART: &str = "requests-chart";
/// Canvas id of the tier breakdown
pub const TIER_CHART: &str = "tier-chart";
/// Canvas id of the severity breakdown
pub const SEVERITY_CHART: &str = "severity-chart";

const TIER_COLORS: [&str; 3] = ["#198754", "#ffc107", "#0dcaf0"];
const SEVERITY_COLORS: [&str; 3] = ["#28a745", "#ffc107", "#dc3545"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Doughnut,
    Bar,
}

/// Axis the categories are laid out along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexAxis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
}

/// Background colour of a dataset: one for all points, or one per point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fill {
    Solid(String),
    PerPoint(Vec<String>),
}

impl Fill {
    fn per_point(colors: &[&str]) -> Self {
        Fill::PerPoint(colors.iter().map(|c| c.to_string()).collect())
    }

    /// Colour of the point at `idx`, cycling through per-point colours
    pub fn at(&self, idx: usize) -> &str {
        match self {
            Fill::Solid(color) => color,
            Fill::PerPoint(colors) if colors.is_empty() => "#6b7280",
            Fill::PerPoint(colors) => &colors[idx % colors.len()],
        }
    }
}

/// Value axis of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub id: String,
    pub position: AxisPosition,
    pub title: String,
    /// Whether this axis draws grid lines across the plot area
    pub grid_on_chart_area: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub background_color: Fill,
    #[serde(rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

/// One chart, described declaratively
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Element id of the drawing target
    pub target: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub axes: Vec<AxisSpec>,
    pub index_axis: IndexAxis,
}

impl ChartSpec {
    /// Chart.js configuration (`{type, data, options}`)
    pub fn to_chartjs(&self) -> Value {
        let mut options = Map::new();

        if !self.axes.is_empty() {
            let scales: Map<String, Value> = self
                .axes
                .iter()
                .map(|axis| {
                    let mut scale = json!({
                        "type": "linear",
                        "display": true,
                        "position": axis.position,
                        "title": { "display": true, "text": axis.title },
                    });
                    if !axis.grid_on_chart_area {
                        scale["grid"] = json!({ "drawOnChartArea": false });
                    }
                    (axis.id.clone(), scale)
                })
                .collect();
            options.insert("scales".to_string(), Value::Object(scales));
        }

        if self.index_axis == IndexAxis::Y {
            options.insert("indexAxis".to_string(), json!("y"));
        }

        let mut config = json!({
            "type": self.kind,
            "data": {
                "labels": self.labels,
                "datasets": self.datasets,
            },
        });
        if !options.is_empty() {
            config["options"] = Value::Object(options);
        }
        config
    }
}

/// Build the three dashboard charts. Input order is preserved everywhere.
pub fn render(snapshot: &DashboardSnapshot) -> [ChartSpec; 3] {
    [
        requests_chart(snapshot),
        tier_chart(snapshot),
        severity_chart(snapshot),
    ]
}

/// Total requests and average response time on two value axes
pub fn requests_chart(snapshot: &DashboardSnapshot) -> ChartSpec {
    let series = &snapshot.time_series;

    ChartSpec {
        target: REQUESTS_CHART.to_string(),
        kind: ChartKind::Line,
        labels: series.labels.clone(),
        datasets: vec![
            Dataset {
                label: "Total Requests".to_string(),
                data: series.total_requests.clone(),
                border_color: Some("rgba(54, 162, 235, 1)".to_string()),
                background_color: Fill::Solid("rgba(54, 162, 235, 0.2)".to_string()),
                y_axis_id: Some("y".to_string()),
                tension: Some(0.3),
            },
            Dataset {
                label: "Avg Response Time (s)".to_string(),
                data: series.avg_response_time.clone(),
                border_color: Some("rgba(255, 206, 86, 1)".to_string()),
                background_color: Fill::Solid("rgba(255, 206, 86, 0.2)".to_string()),
                y_axis_id: Some("y1".to_string()),
                tension: Some(0.3),
            },
        ],
        axes: vec![
            AxisSpec {
                id: "y".to_string(),
                position: AxisPosition::Left,
                title: "Requests".to_string(),
                grid_on_chart_area: true,
            },
            AxisSpec {
                id: "y1".to_string(),
                position: AxisPosition::Right,
                title: "Seconds".to_string(),
                grid_on_chart_area: false,
            },
        ],
        index_axis: IndexAxis::X,
    }
}

/// Share of requests per user tier
pub fn tier_chart(snapshot: &DashboardSnapshot) -> ChartSpec {
    let dist = &snapshot.tier_distribution;

    ChartSpec {
        target: TIER_CHART.to_string(),
        kind: ChartKind::Doughnut,
        labels: dist.keys().cloned().collect(),
        datasets: vec![Dataset {
            label: "User Tiers".to_string(),
            data: dist.values().copied().collect(),
            border_color: None,
            background_color: Fill::per_point(&TIER_COLORS),
            y_axis_id: None,
            tension: None,
        }],
        axes: Vec::new(),
        index_axis: IndexAxis::X,
    }
}

/// Request count per severity, as horizontal bars
pub fn severity_chart(snapshot: &DashboardSnapshot) -> ChartSpec {
    let dist = &snapshot.severity_distribution;

    ChartSpec {
        target: SEVERITY_CHART.to_string(),
        kind: ChartKind::Bar,
        labels: dist.keys().cloned().collect(),
        datasets: vec![Dataset {
            label: "Request Count by Severity".to_string(),
            data: dist.values().copied().collect(),
            border_color: None,
            background_color: Fill::per_point(&SEVERITY_COLORS),
            y_axis_id: None,
            tension: None,
        }],
        axes: Vec::new(),
        index_axis: IndexAxis::Y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::snapshot::TimeSeries;
    use indexmap::IndexMap;

    fn snapshot() -> DashboardSnapshot {
        let mut tiers = IndexMap::new();
        tiers.insert("free".to_string(), 5.0);
        tiers.insert("premium".to_string(), 3.0);

        let mut severities = IndexMap::new();
        severities.insert("low".to_string(), 4.0);
        severities.insert("high".to_string(), 4.0);

        DashboardSnapshot {
            time_series: TimeSeries {
                labels: vec!["Mon".to_string(), "Tue".to_string()],
                total_requests: vec![10.0, 20.0],
                avg_response_time: vec![0.5, 0.7],
                success_rate: None,
            },
            tier_distribution: tiers,
            severity_distribution: severities,
        }
    }

    #[test]
    fn test_render_echoes_snapshot() {
        let snapshot = snapshot();
        let [requests, tiers, severities] = render(&snapshot);

        assert_eq!(requests.target, REQUESTS_CHART);
        assert_eq!(requests.kind, ChartKind::Line);
        assert_eq!(requests.labels, vec!["Mon", "Tue"]);
        assert_eq!(requests.datasets.len(), 2);
        assert_eq!(requests.datasets[0].data, vec![10.0, 20.0]);
        assert_eq!(requests.datasets[0].y_axis_id.as_deref(), Some("y"));
        assert_eq!(requests.datasets[1].data, vec![0.5, 0.7]);
        assert_eq!(requests.datasets[1].y_axis_id.as_deref(), Some("y1"));

        assert_eq!(tiers.target, TIER_CHART);
        assert_eq!(tiers.kind, ChartKind::Doughnut);
        assert_eq!(tiers.labels, vec!["free", "premium"]);
        assert_eq!(tiers.datasets[0].data, vec![5.0, 3.0]);

        assert_eq!(severities.target, SEVERITY_CHART);
        assert_eq!(severities.kind, ChartKind::Bar);
        assert_eq!(severities.index_axis, IndexAxis::Y);
        assert_eq!(severities.labels, vec!["low", "high"]);
        assert_eq!(severities.datasets[0].data, vec![4.0, 4.0]);

        // Input untouched
        assert_eq!(snapshot, self::snapshot());
    }

    #[test]
    fn test_chartjs_config() {
        let [requests, _, severities] = render(&snapshot());

        let config = requests.to_chartjs();
        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["labels"], json!(["Mon", "Tue"]));
        assert_eq!(config["data"]["datasets"][1]["yAxisID"], "y1");
        assert_eq!(config["data"]["datasets"][0]["borderColor"], "rgba(54, 162, 235, 1)");
        assert_eq!(config["options"]["scales"]["y"]["position"], "left");
        assert_eq!(config["options"]["scales"]["y1"]["title"]["text"], "Seconds");
        assert_eq!(config["options"]["scales"]["y1"]["grid"]["drawOnChartArea"], false);
        assert!(config["options"]["scales"]["y"].get("grid").is_none());

        let config = severities.to_chartjs();
        assert_eq!(config["type"], "bar");
        assert_eq!(config["options"]["indexAxis"], "y");
        assert_eq!(
            config["data"]["datasets"][0]["backgroundColor"],
            json!(["#28a745", "#ffc107", "#dc3545"])
        );
    }

    #[test]
    fn test_doughnut_has_no_options() {
        let config = tier_chart(&snapshot()).to_chartjs();
        assert!(config.get("options").is_none());
    }

    #[test]
    fn test_fill_cycles() {
        let fill = Fill::per_point(&TIER_COLORS);
        assert_eq!(fill.at(0), "#198754");
        assert_eq!(fill.at(3), "#198754");
        assert_eq!(Fill::Solid("red".to_string()).at(7), "red");
    }
}

//! Dashboard snapshot payload

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-day series, aligned by index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub total_requests: Vec<f64>,
    pub avg_response_time: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<Vec<f64>>,
}

/// Body of `GET /api/dashboard_data`.
///
/// Distribution maps keep the key order they had on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub time_series: TimeSeries,
    pub tier_distribution: IndexMap<String, f64>,
    pub severity_distribution: IndexMap<String, f64>,
}

impl DashboardSnapshot {
    /// Sum of `total_requests` over the series
    pub fn total_requests(&self) -> f64 {
        self.time_series.total_requests.iter().sum()
    }

    /// Mean of `avg_response_time`, if there is any data
    pub fn mean_response_time(&self) -> Option<f64> {
        let series = &self.time_series.avg_response_time;
        if series.is_empty() {
            return None;
        }
        Some(series.iter().sum::<f64>() / series.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "time_series": {
            "labels": ["Mon", "Tue"],
            "total_requests": [10, 20],
            "avg_response_time": [0.5, 0.7],
            "success_rate": [99.1, 98.4]
        },
        "tier_distribution": {"Premium": 3, "Free": 5, "Enterprise": 1},
        "severity_distribution": {"low": 4, "high": 4}
    }"#;

    #[test]
    fn test_parse_keeps_key_order() {
        let snapshot: DashboardSnapshot = serde_json::from_str(BODY).unwrap();

        let tiers: Vec<_> = snapshot.tier_distribution.keys().cloned().collect();
        assert_eq!(tiers, vec!["Premium", "Free", "Enterprise"]);
        assert_eq!(snapshot.time_series.total_requests, vec![10.0, 20.0]);
        assert_eq!(snapshot.time_series.success_rate, Some(vec![99.1, 98.4]));
    }

    #[test]
    fn test_success_rate_optional() {
        let body = r#"{
            "time_series": {"labels": [], "total_requests": [], "avg_response_time": []},
            "tier_distribution": {},
            "severity_distribution": {}
        }"#;
        let snapshot: DashboardSnapshot = serde_json::from_str(body).unwrap();
        assert!(snapshot.time_series.success_rate.is_none());
        assert_eq!(snapshot.mean_response_time(), None);
    }

    #[test]
    fn test_aggregates() {
        let snapshot: DashboardSnapshot = serde_json::from_str(BODY).unwrap();
        assert_eq!(snapshot.total_requests(), 30.0);
        let mean = snapshot.mean_response_time().unwrap();
        assert!((mean - 0.6).abs() < 1e-9);
    }
}

//! Dashboard loading
//!
//! One fetch per page load, then render. On failure the whole chart region
//! is replaced by a fixed notice; there is no retry.

use async_trait::async_trait;

use super::charts::{self, ChartSpec};
use super::snapshot::DashboardSnapshot;
use crate::error::RequestResult;

/// Notice shown in place of the charts when the snapshot cannot be fetched
pub const DEFAULT_ERROR_NOTICE: &str = "Could not load dashboard data. Please try again later.";

/// Provider of metrics snapshots (`GET /api/dashboard_data`)
#[async_trait(?Send)]
pub trait DashboardSource {
    async fn fetch_snapshot(&self) -> RequestResult<DashboardSnapshot>;
}

/// Something that can draw chart specs
pub trait ChartSurface {
    /// Create a new chart for `spec`. Charts are never updated in place.
    fn draw(&mut self, spec: &ChartSpec);

    /// Replace the whole chart region with `notice`
    fn show_error(&mut self, notice: &str);
}

/// Draw the three dashboard charts for `snapshot`
pub fn render<S: ChartSurface + ?Sized>(snapshot: &DashboardSnapshot, surface: &mut S) {
    for spec in charts::render(snapshot) {
        surface.draw(&spec);
    }
}

/// Single-use dashboard loader
#[derive(Debug, Clone)]
pub struct DashboardLoader {
    error_notice: String,
}

impl Default for DashboardLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardLoader {
    pub fn new() -> Self {
        Self::with_notice(DEFAULT_ERROR_NOTICE)
    }

    pub fn with_notice(notice: impl Into<String>) -> Self {
        Self {
            error_notice: notice.into(),
        }
    }

    /// Fetch the snapshot once and render it, or show the error notice.
    ///
    /// Consumes the loader: a page loads its dashboard exactly once.
    pub async fn load<D, S>(self, source: &D, surface: &mut S) -> RequestResult<DashboardSnapshot>
    where
        D: DashboardSource + ?Sized,
        S: ChartSurface + ?Sized,
    {
        match source.fetch_snapshot().await {
            Ok(snapshot) => {
                tracing::info!(
                    days = snapshot.time_series.labels.len(),
                    tiers = snapshot.tier_distribution.len(),
                    severities = snapshot.severity_distribution.len(),
                    "Dashboard snapshot loaded"
                );
                render(&snapshot, surface);
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching dashboard data");
                surface.show_error(&self.error_notice);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::charts::{REQUESTS_CHART, SEVERITY_CHART, TIER_CHART};
    use crate::error::RequestError;
    use std::cell::Cell;

    #[derive(Default)]
    struct RecordingSurface {
        drawn: Vec<ChartSpec>,
        errors: Vec<String>,
    }

    impl ChartSurface for RecordingSurface {
        fn draw(&mut self, spec: &ChartSpec) {
            self.drawn.push(spec.clone());
        }

        fn show_error(&mut self, notice: &str) {
            self.drawn.clear();
            self.errors.push(notice.to_string());
        }
    }

    struct FixedSource {
        result: RequestResult<DashboardSnapshot>,
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl DashboardSource for FixedSource {
        async fn fetch_snapshot(&self) -> RequestResult<DashboardSnapshot> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    fn snapshot() -> DashboardSnapshot {
        serde_json::from_str(
            r#"{
                "time_series": {
                    "labels": ["Mon", "Tue"],
                    "total_requests": [10, 20],
                    "avg_response_time": [0.5, 0.7]
                },
                "tier_distribution": {"free": 5, "premium": 3},
                "severity_distribution": {"low": 4, "high": 4}
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_draws_three_charts() {
        let source = FixedSource {
            result: Ok(snapshot()),
            calls: Cell::new(0),
        };
        let mut surface = RecordingSurface::default();

        let loaded = DashboardLoader::new().load(&source, &mut surface).await.unwrap();

        assert_eq!(loaded, snapshot());
        assert_eq!(source.calls.get(), 1);
        let targets: Vec<_> = surface.drawn.iter().map(|s| s.target.as_str()).collect();
        assert_eq!(targets, vec![REQUESTS_CHART, TIER_CHART, SEVERITY_CHART]);
        assert!(surface.errors.is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_shows_notice() {
        let source = FixedSource {
            result: Err(RequestError::Status {
                status: 502,
                body: String::new(),
            }),
            calls: Cell::new(0),
        };
        let mut surface = RecordingSurface::default();

        let result = DashboardLoader::new().load(&source, &mut surface).await;

        assert!(result.is_err());
        assert_eq!(source.calls.get(), 1);
        assert!(surface.drawn.is_empty());
        assert_eq!(surface.errors, vec![DEFAULT_ERROR_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_custom_notice() {
        let source = FixedSource {
            result: Err(RequestError::Timeout),
            calls: Cell::new(0),
        };
        let mut surface = RecordingSurface::default();

        let _ = DashboardLoader::with_notice("Metrics offline")
            .load(&source, &mut surface)
            .await;

        assert_eq!(surface.errors, vec!["Metrics offline".to_string()]);
    }
}

//! Dashboard
//!
//! Fetches the aggregate metrics snapshot and turns it into three charts:
//! requests vs. response time, tier breakdown, severity breakdown.

mod charts;
mod loader;
mod snapshot;
mod terminal;

pub use charts::{
    render as chart_specs, requests_chart, severity_chart, tier_chart, AxisPosition, AxisSpec,
    ChartKind, ChartSpec, Dataset, Fill, IndexAxis, REQUESTS_CHART, SEVERITY_CHART, TIER_CHART,
};
pub use loader::{render, ChartSurface, DashboardLoader, DashboardSource, DEFAULT_ERROR_NOTICE};
pub use snapshot::{DashboardSnapshot, TimeSeries};
pub use terminal::TerminalSurface;

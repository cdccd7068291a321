//! Chart Component
//!
//! Draws dashboard [`ChartSpec`]s on HTML5 canvas: a dual-axis line chart,
//! a doughnut and bar charts.

use leptos::*;
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use concierge::dashboard::{
    AxisPosition, ChartKind, ChartSpec, ChartSurface, Dataset, IndexAxis, REQUESTS_CHART,
    SEVERITY_CHART, TIER_CHART,
};

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const TEXT: &str = "#9ca3af"; // gray-400
const FONT: &str = "12px sans-serif";
const TICKS: usize = 5;

/// [`ChartSurface`] backed by signals; the dashboard page turns each
/// collected spec into a [`ChartCanvas`]
#[derive(Clone, Copy)]
pub struct CanvasSurface {
    pub charts: RwSignal<Vec<ChartSpec>>,
    pub notice: RwSignal<Option<String>>,
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self {
            charts: create_rw_signal(Vec::new()),
            notice: create_rw_signal(None),
        }
    }
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSurface for CanvasSurface {
    fn draw(&mut self, spec: &ChartSpec) {
        self.charts.update(|charts| charts.push(spec.clone()));
    }

    fn show_error(&mut self, notice: &str) {
        self.charts.update(Vec::clear);
        self.notice.set(Some(notice.to_string()));
    }
}

/// One chart card with its canvas
#[component]
pub fn ChartCanvas(spec: ChartSpec) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let id = spec.target.clone();
    let title = heading(&spec.target);
    let class = if spec.kind == ChartKind::Line {
        "bg-gray-800 rounded-xl p-6 md:col-span-2"
    } else {
        "bg-gray-800 rounded-xl p-6"
    };

    // Drawn once when the canvas mounts
    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &spec);
        }
    });

    view! {
        <section class=class>
            <h2 class="text-xl font-semibold mb-4">{title}</h2>
            <canvas
                id=id
                node_ref=canvas_ref
                width="800"
                height="360"
                class="w-full h-64 md:h-80 rounded-lg"
            />
        </section>
    }
}

fn heading(target: &str) -> &'static str {
    match target {
        REQUESTS_CHART => "Requests & Response Time",
        TIER_CHART => "Requests by Tier",
        SEVERITY_CHART => "Requests by Severity",
        _ => "Metrics",
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, spec: &ChartSpec) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.set_font(FONT);

    if spec.labels.is_empty() || spec.datasets.iter().all(|d| d.data.is_empty()) {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No data", width / 2.0 - 28.0, height / 2.0);
        return;
    }

    match spec.kind {
        ChartKind::Line => draw_line(&ctx, spec, width, height),
        ChartKind::Doughnut => draw_doughnut(&ctx, spec, width, height),
        ChartKind::Bar => draw_bars(&ctx, spec, width, height),
    }
}

fn draw_line(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64) {
    let margin_left = 60.0;
    let margin_right = 60.0;
    let margin_top = 50.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;
    let n = spec.labels.len();

    // Tick labels and titles per value axis; only some axes grid the plot
    for axis in &spec.axes {
        let max = scale_max(spec, Some(axis.id.as_str()));
        let x = match axis.position {
            AxisPosition::Left => 5.0,
            AxisPosition::Right => width - margin_right + 8.0,
        };

        for i in 0..=TICKS {
            let y = margin_top + (i as f64 / TICKS as f64) * chart_height;

            if axis.grid_on_chart_area {
                ctx.set_stroke_style(&GRID.into());
                ctx.set_line_width(1.0);
                ctx.begin_path();
                ctx.move_to(margin_left, y);
                ctx.line_to(width - margin_right, y);
                ctx.stroke();
            }

            let value = max * (1.0 - i as f64 / TICKS as f64);
            ctx.set_fill_style(&TEXT.into());
            let _ = ctx.fill_text(&format_value(value), x, y + 4.0);
        }

        let _ = ctx.fill_text(&axis.title, x, margin_top - 12.0);
    }

    for dataset in &spec.datasets {
        let max = scale_max(spec, dataset.y_axis_id.as_deref());
        let color = line_color(dataset);
        let points: Vec<(f64, f64)> = dataset
            .data
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, value)| {
                let x = point_x(i, n, margin_left, chart_width);
                // Inverted because canvas y grows downward
                let y = margin_top + (1.0 - value / max) * chart_height;
                (x, y)
            })
            .collect();

        ctx.set_stroke_style(&color.into());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        for (i, (x, y)) in points.iter().enumerate() {
            if i == 0 {
                ctx.move_to(*x, *y);
            } else {
                ctx.line_to(*x, *y);
            }
        }
        ctx.stroke();

        ctx.set_fill_style(&color.into());
        for (x, y) in &points {
            ctx.begin_path();
            let _ = ctx.arc(*x, *y, 3.0, 0.0, PI * 2.0);
            ctx.fill();
        }
    }

    ctx.set_fill_style(&TEXT.into());
    for (i, label) in spec.labels.iter().enumerate() {
        let x = point_x(i, n, margin_left, chart_width);
        let _ = ctx.fill_text(label, x - label.len() as f64 * 3.0, height - 12.0);
    }

    let legend: Vec<(&str, &str)> = spec
        .datasets
        .iter()
        .map(|d| (d.label.as_str(), line_color(d)))
        .collect();
    draw_legend(ctx, &legend, margin_left, 10.0, false);
}

fn draw_doughnut(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64) {
    let Some(dataset) = spec.datasets.first() else {
        return;
    };

    let cx = width * 0.35;
    let cy = height / 2.0;
    let radius = (height / 2.0 - 20.0).min(width * 0.3);
    let inner = radius * 0.5;

    for (i, (start, end)) in slice_angles(&dataset.data).into_iter().enumerate() {
        ctx.set_fill_style(&dataset.background_color.at(i).into());
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, radius, start, end);
        let _ = ctx.arc_with_anticlockwise(cx, cy, inner, end, start, true);
        ctx.close_path();
        ctx.fill();
    }

    let total: f64 = dataset.data.iter().sum();
    let entries: Vec<(String, &str)> = spec
        .labels
        .iter()
        .zip(&dataset.data)
        .enumerate()
        .map(|(i, (label, value))| {
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            (format!("{} ({:.0}%)", label, share), dataset.background_color.at(i))
        })
        .collect();
    let legend: Vec<(&str, &str)> = entries.iter().map(|(l, c)| (l.as_str(), *c)).collect();
    draw_legend(ctx, &legend, width * 0.7, cy - entries.len() as f64 * 12.0, true);
}

fn draw_bars(ctx: &CanvasRenderingContext2d, spec: &ChartSpec, width: f64, height: f64) {
    let Some(dataset) = spec.datasets.first() else {
        return;
    };

    let horizontal = spec.index_axis == IndexAxis::Y;
    let margin_left = if horizontal { 90.0 } else { 60.0 };
    let margin_right = 60.0;
    let margin_top = 40.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;
    let n = spec.labels.len();
    let max = axis_max(&dataset.data);

    // Value grid runs across the bars
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    for i in 0..=TICKS {
        let t = i as f64 / TICKS as f64;
        let value = max * t;
        ctx.begin_path();
        if horizontal {
            let x = margin_left + t * chart_width;
            ctx.move_to(x, margin_top);
            ctx.line_to(x, height - margin_bottom);
            ctx.stroke();
            ctx.set_fill_style(&TEXT.into());
            let _ = ctx.fill_text(&format_value(value), x - 10.0, height - 15.0);
        } else {
            let y = margin_top + (1.0 - t) * chart_height;
            ctx.move_to(margin_left, y);
            ctx.line_to(width - margin_right, y);
            ctx.stroke();
            ctx.set_fill_style(&TEXT.into());
            let _ = ctx.fill_text(&format_value(value), 5.0, y + 4.0);
        }
    }

    let extent = if horizontal { chart_height } else { chart_width };
    let band = extent / n as f64;
    let thickness = band * 0.6;

    for (i, label) in spec.labels.iter().enumerate() {
        let value = dataset.data.get(i).copied().unwrap_or(0.0);
        let offset = band * i as f64 + (band - thickness) / 2.0;

        ctx.set_fill_style(&dataset.background_color.at(i).into());
        if horizontal {
            let length = value / max * chart_width;
            let y = margin_top + offset;
            ctx.fill_rect(margin_left, y, length, thickness);

            ctx.set_fill_style(&TEXT.into());
            let _ = ctx.fill_text(label, 5.0, y + thickness / 2.0 + 4.0);
            let _ = ctx.fill_text(&format_value(value), margin_left + length + 6.0, y + thickness / 2.0 + 4.0);
        } else {
            let length = value / max * chart_height;
            let x = margin_left + offset;
            ctx.fill_rect(x, height - margin_bottom - length, thickness, length);

            ctx.set_fill_style(&TEXT.into());
            let _ = ctx.fill_text(label, x, height - 15.0);
        }
    }

    draw_legend(
        ctx,
        &[(dataset.label.as_str(), dataset.background_color.at(0))],
        margin_left,
        10.0,
        false,
    );
}

/// Colour swatches with labels, in a row or a column
fn draw_legend(ctx: &CanvasRenderingContext2d, entries: &[(&str, &str)], x: f64, y: f64, column: bool) {
    let mut x = x;
    let mut y = y;

    for (label, color) in entries {
        ctx.set_fill_style(&(*color).into());
        ctx.fill_rect(x, y, 12.0, 12.0);
        ctx.set_fill_style(&TEXT.into());
        let _ = ctx.fill_text(label, x + 18.0, y + 11.0);

        if column {
            y += 24.0;
        } else {
            x += label.len() as f64 * 7.0 + 40.0;
        }
    }
}

fn line_color(dataset: &Dataset) -> &str {
    dataset
        .border_color
        .as_deref()
        .unwrap_or_else(|| dataset.background_color.at(0))
}

/// Top of the scale shared by every dataset on `axis_id`
fn scale_max(spec: &ChartSpec, axis_id: Option<&str>) -> f64 {
    let values: Vec<f64> = spec
        .datasets
        .iter()
        .filter(|d| d.y_axis_id.as_deref() == axis_id)
        .flat_map(|d| d.data.iter().copied())
        .collect();
    axis_max(&values)
}

/// Scale top with 10% headroom; scales always start at zero
fn axis_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// X position of point `i` of `n`, spread edge to edge
fn point_x(i: usize, n: usize, start: f64, extent: f64) -> f64 {
    if n <= 1 {
        start + extent / 2.0
    } else {
        start + extent * i as f64 / (n - 1) as f64
    }
}

/// Start and end angle of each slice, clockwise from twelve o'clock
fn slice_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = -PI / 2.0;
    values
        .iter()
        .map(|value| {
            let start = angle;
            angle += value.max(0.0) / total * PI * 2.0;
            (start, angle)
        })
        .collect()
}

fn format_value(value: f64) -> String {
    if value >= 100.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_max_has_headroom() {
        assert!((axis_max(&[10.0, 50.0]) - 55.0).abs() < 1e-9);
        assert_eq!(axis_max(&[]), 1.0);
        assert_eq!(axis_max(&[0.0, 0.0]), 1.0);
    }

    #[test]
    fn test_point_x() {
        assert_eq!(point_x(0, 1, 60.0, 100.0), 110.0);
        assert_eq!(point_x(0, 3, 60.0, 100.0), 60.0);
        assert_eq!(point_x(2, 3, 60.0, 100.0), 160.0);
    }

    #[test]
    fn test_slices_cover_full_circle() {
        let slices = slice_angles(&[6000.0, 2500.0, 1500.0]);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].0, -PI / 2.0);
        assert!((slices[0].1 - (-PI / 2.0 + PI * 1.2)).abs() < 1e-9);
        assert!((slices[2].1 - PI * 1.5).abs() < 1e-9);
        assert!(slice_angles(&[0.0, 0.0]).is_empty());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1490.0), "1490");
        assert_eq!(format_value(2.3), "2.30");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn test_headings() {
        assert_eq!(heading(REQUESTS_CHART), "Requests & Response Time");
        assert_eq!(heading(SEVERITY_CHART), "Requests by Severity");
    }
}

//! Terminal chart surface
//!
//! Draws chart specs as plain-text tables and bars.

use std::fmt::Write as _;
use std::io::Write;

use super::charts::{ChartKind, ChartSpec};
use crate::markdown::strip_control;
use super::loader::ChartSurface;

const BAR: char = '█';

/// Chart surface writing to any `io::Write`
pub struct TerminalSurface<W: Write> {
    out: W,
    /// Width of the longest bar, in characters
    bar_width: usize,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, bar_width: 40 }
    }

    pub fn bar_width(mut self, width: usize) -> Self {
        self.bar_width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write chart to terminal");
        }
    }

    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || value <= 0.0 {
            return String::new();
        }
        let len = ((value / max) * self.bar_width as f64).round() as usize;
        std::iter::repeat(BAR).take(len.max(1)).collect()
    }

    fn format_series(&self, spec: &ChartSpec) -> String {
        let mut text = String::new();
        let labels = printable_labels(spec);
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let header: Vec<_> = spec.datasets.iter().map(|d| strip_control(&d.label)).collect();
        let _ = writeln!(text, "{}", header.join(" / "));

        // Bars follow the first dataset; every dataset is printed as a column
        let primary = spec.datasets.first().map(|d| d.data.as_slice()).unwrap_or(&[]);
        let max = primary.iter().cloned().fold(0.0, f64::max);

        for (idx, label) in labels.iter().enumerate() {
            let value = primary.get(idx).copied().unwrap_or(0.0);
            let _ = write!(
                text,
                "  {:<lw$}  {:<bw$}",
                label,
                self.bar(value, max),
                lw = label_width,
                bw = self.bar_width
            );
            for dataset in &spec.datasets {
                match dataset.data.get(idx) {
                    Some(v) => {
                        let _ = write!(text, "  {:>10}", format_value(*v));
                    }
                    None => {
                        let _ = write!(text, "  {:>10}", "-");
                    }
                }
            }
            text.push('\n');
        }
        text
    }

    fn format_breakdown(&self, spec: &ChartSpec) -> String {
        let mut text = String::new();
        let dataset = match spec.datasets.first() {
            Some(d) => d,
            None => return text,
        };

        let _ = writeln!(text, "{}", strip_control(&dataset.label));

        let labels = printable_labels(spec);
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = dataset.data.iter().cloned().fold(0.0, f64::max);
        let total: f64 = dataset.data.iter().sum();

        for (label, value) in labels.iter().zip(&dataset.data) {
            let _ = write!(
                text,
                "  {:<lw$}  {:<bw$}  {:>10}",
                label,
                self.bar(*value, max),
                format_value(*value),
                lw = label_width,
                bw = self.bar_width
            );
            if spec.kind == ChartKind::Doughnut && total > 0.0 {
                let _ = write!(text, "  {:>5.1}%", value / total * 100.0);
            }
            text.push('\n');
        }
        text
    }
}

impl<W: Write> ChartSurface for TerminalSurface<W> {
    fn draw(&mut self, spec: &ChartSpec) {
        let body = match spec.kind {
            ChartKind::Line => self.format_series(spec),
            ChartKind::Doughnut | ChartKind::Bar => self.format_breakdown(spec),
        };
        self.emit(&format!("{}\n", body));
    }

    fn show_error(&mut self, notice: &str) {
        self.emit(&format!("{}\n", notice));
    }
}

/// Category labels come from the server; keep escapes off the terminal
fn printable_labels(spec: &ChartSpec) -> Vec<String> {
    spec.labels.iter().map(|l| strip_control(l)).collect()
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

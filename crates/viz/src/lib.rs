//! # gestao-viz
//!
//! Bar chart specifications for the gestao dashboard.
//!
//! A [`ChartSpec`] is plain data: category labels on the x-axis and one
//! [`Dataset`] per series. It can be serialized to JSON for a frontend or
//! rendered as a standalone HTML page driven by Chart.js.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default series colours, in assignment order.
pub const PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Errors raised while exporting a chart.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type VizResult<T> = Result<T, VizError>;

/// Chart specification for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// Chart data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One series of bars. `data` lines up with [`ChartData::labels`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(
        rename = "backgroundColor",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub background_color: Option<String>,
}

/// Chart rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_label: Option<String>,
    /// Prefix of the value printed above each bar; `None` hides the labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_prefix: Option<String>,
    pub show_legend: bool,
    pub stacked: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            x_axis_label: None,
            y_axis_label: None,
            value_prefix: None,
            show_legend: true,
            stacked: false,
            width: 1000,
            height: 600,
        }
    }
}

/// Export formats for charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Escape HTML special characters to prevent XSS.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

impl ChartSpec {
    /// Create an empty bar chart.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            data: ChartData::default(),
            options: ChartOptions::default(),
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.data.labels = labels;
        self
    }

    #[must_use]
    pub fn with_axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.options.x_axis_label = Some(x.into());
        self.options.y_axis_label = Some(y.into());
        self
    }

    #[must_use]
    pub fn with_value_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.value_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.options.width = width;
        self.options.height = height;
        self
    }

    /// Append a series, colouring it from [`PALETTE`] by position.
    pub fn push_dataset(&mut self, label: impl Into<String>, data: Vec<f64>) {
        let color = PALETTE[self.data.datasets.len() % PALETTE.len()];
        self.data.datasets.push(Dataset {
            label: label.into(),
            data,
            background_color: Some(color.to_string()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.data.labels.is_empty() || self.data.datasets.is_empty()
    }

    /// Convert to a JSON string for frontend rendering.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> VizResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Generate a standalone HTML page with embedded Chart.js.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_html(&self) -> VizResult<String> {
        let title = escape_html(&self.title);
        // Prevent script tag breakout
        let json = serde_json::to_string(self)?.replace("</", "<\\/");

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body style="background: white">
    <div style="width: {width}px; height: {height}px">
        <canvas id="chart"></canvas>
    </div>
    <script>
        const spec = {json};
        const money = (v) => v.toLocaleString('pt-BR', {{ minimumFractionDigits: 2, maximumFractionDigits: 2 }});
        const valueLabels = {{
            id: 'valueLabels',
            afterDatasetsDraw(chart) {{
                if (!spec.options.value_prefix) return;
                const ctx = chart.ctx;
                ctx.save();
                ctx.font = 'bold 13px Arial';
                ctx.fillStyle = 'black';
                ctx.textAlign = 'center';
                chart.data.datasets.forEach((dataset, i) => {{
                    chart.getDatasetMeta(i).data.forEach((bar, j) => {{
                        const value = dataset.data[j];
                        if (!value) return;
                        ctx.fillText(spec.options.value_prefix + ' ' + money(value), bar.x, bar.y - 6);
                    }});
                }});
                ctx.restore();
            }}
        }};
        const ctx = document.getElementById('chart').getContext('2d');
        new Chart(ctx, {{
            type: 'bar',
            data: spec.data,
            plugins: [valueLabels],
            options: {{
                responsive: true,
                maintainAspectRatio: false,
                plugins: {{
                    title: {{
                        display: true,
                        text: spec.title
                    }},
                    legend: {{
                        display: spec.options.show_legend
                    }}
                }},
                scales: {{
                    x: {{
                        stacked: spec.options.stacked,
                        title: {{ display: !!spec.options.x_axis_label, text: spec.options.x_axis_label }},
                        ticks: {{ font: {{ weight: 'bold' }} }}
                    }},
                    y: {{
                        stacked: spec.options.stacked,
                        title: {{ display: !!spec.options.y_axis_label, text: spec.options.y_axis_label }},
                        ticks: {{ callback: (v) => v.toLocaleString('pt-BR', {{ maximumFractionDigits: 0 }}) }}
                    }}
                }}
            }}
        }});
    </script>
</body>
</html>"#,
            title = title,
            json = json,
            width = self.options.width,
            height = self.options.height,
        ))
    }

    /// Render in `format`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn render(&self, format: ExportFormat) -> VizResult<String> {
        match format {
            ExportFormat::Html => self.to_html(),
            ExportFormat::Json => self.to_json(),
        }
    }

    /// Render in `format` and write the result to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn write_to<P: AsRef<Path>>(&self, path: P, format: ExportFormat) -> VizResult<()> {
        std::fs::write(path, self.render(format)?)?;
        Ok(())
    }
}

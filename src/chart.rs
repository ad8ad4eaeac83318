//! Line-chart rendering of normalized series.
//!
//! The renderer does not draw anything itself; it produces a [`Figure`], a
//! serializable description of the chart (points, axes, size and line style)
//! that a plotting front end can draw as-is.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{CURRENCY_GRIDLINE_DAYS, CURRENCY_TICK_STEP, FIGURE_SIZE, MAX_Y_TICKS};
use crate::error::{Result, SeriesError};
use crate::types::{NormalizedSeries, RenderHint, SeriesPoint, TimeSeriesKey};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for FigureSize {
    fn default() -> Self {
        Self::new(FIGURE_SIZE.0, FIGURE_SIZE.1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub marker: String,
    pub marker_face_color: String,
    pub marker_size: f64,
    pub color: String,
    pub line_width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            marker: "o".to_string(),
            marker_face_color: "blue".to_string(),
            marker_size: 4.0,
            color: "skyblue".to_string(),
            line_width: 4.0,
        }
    }
}

/// Rendered chart for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub key: TimeSeriesKey,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<SeriesPoint>,
    /// Explicit y ticks; empty leaves tick placement to the front end
    pub y_ticks: Vec<f64>,
    pub x_gridline_interval_days: Option<u32>,
    pub x_gridlines: Vec<NaiveDate>,
    pub size: FigureSize,
    pub style: LineStyle,
}

impl Figure {
    /// Copy of this figure at another size
    pub fn resized(&self, size: FigureSize) -> Figure {
        Figure {
            size,
            ..self.clone()
        }
    }
}

pub trait ChartRenderer: Send + Sync {
    fn render(&self, series: &NormalizedSeries, hint: RenderHint) -> Result<Figure>;
}

/// Renders a marker line chart; currency-like series get half-unit y ticks
/// and weekly x gridlines.
#[derive(Debug, Clone, Default)]
pub struct LineChartRenderer {
    size: FigureSize,
    style: LineStyle,
}

impl LineChartRenderer {
    pub fn new(size: FigureSize, style: LineStyle) -> Self {
        Self { size, style }
    }
}

impl ChartRenderer for LineChartRenderer {
    fn render(&self, series: &NormalizedSeries, hint: RenderHint) -> Result<Figure> {
        let (min, max) = series
            .value_range()
            .ok_or(SeriesError::EmptySeries { key: series.key })?;

        let (y_ticks, x_gridline_interval_days, x_gridlines) = if hint.is_currency_like {
            let gridlines = match (series.first_date(), series.last_date()) {
                (Some(first), Some(last)) => gridline_dates(first, last, CURRENCY_GRIDLINE_DAYS),
                _ => Vec::new(),
            };
            (
                tick_values(min, max, CURRENCY_TICK_STEP),
                Some(CURRENCY_GRIDLINE_DAYS),
                gridlines,
            )
        } else {
            (Vec::new(), None, Vec::new())
        };

        Ok(Figure {
            key: series.key,
            title: format!("{} {}", series.key.country.display_name(), series.column),
            x_label: "Date".to_string(),
            y_label: series.column.clone(),
            points: series.points.clone(),
            y_ticks,
            x_gridline_interval_days,
            x_gridlines,
            size: self.size,
            style: self.style.clone(),
        })
    }
}

/// Ticks from `floor(min)` up to, not including, `floor(max) + 1`.
///
/// Empty when the range would need more than [`MAX_Y_TICKS`] ticks; the front
/// end then places its own.
pub fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let start = min.floor();
    let end = max.floor() + 1.0;
    let count = ((end - start) / step).ceil();
    if !count.is_finite() || count > MAX_Y_TICKS as f64 {
        debug!("{} .. {} needs {} ticks, leaving placement to the front end", min, max, count);
        return Vec::new();
    }
    (0..count as usize).map(|i| start + i as f64 * step).collect()
}

/// Every `interval_days` from `first` through `last`
pub fn gridline_dates(first: NaiveDate, last: NaiveDate, interval_days: u32) -> Vec<NaiveDate> {
    if interval_days == 0 {
        return Vec::new();
    }
    let step = Duration::days(i64::from(interval_days));
    let mut out = Vec::new();
    let mut day = first;
    while day <= last {
        out.push(day);
        day = match day.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

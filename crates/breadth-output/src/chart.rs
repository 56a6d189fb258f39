//! Industry breadth charts.
//!
//! Each industry gets one line chart: dates along the x-axis, the share of
//! bullish tickers (0 to 100) along the y-axis. The chart is drawn into an
//! in-memory RGB buffer and encoded as PNG.

use breadth_data::DateRange;
use breadth_signals::{CrossoverConfig, IndustryAggregate};
use chrono::{Duration, NaiveDate};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

/// Errors that can occur during chart rendering.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Drawing failed.
    #[error("Chart drawing error: {0}")]
    Render(String),

    /// PNG encoding failed.
    #[error("PNG encoding error: {0}")]
    Encode(#[from] image::ImageError),

    /// The pixel buffer does not match the chart size.
    #[error("Pixel buffer does not fit a {width}x{height} image")]
    Buffer {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
}

fn render_error(err: impl std::fmt::Display) -> ChartError {
    ChartError::Render(err.to_string())
}

/// Chart size and the window description used in titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Width in pixels (default: 1200)
    pub width: u32,
    /// Height in pixels (default: 600)
    pub height: u32,
    /// Years of history covered (default: 5)
    pub lookback_years: u32,
    /// Fast SMA window (default: 50)
    pub fast_window: usize,
    /// Slow SMA window (default: 200)
    pub slow_window: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::new(5, &CrossoverConfig::default())
    }
}

impl ChartConfig {
    /// Default-sized chart describing `crossover` over `lookback_years`.
    pub const fn new(lookback_years: u32, crossover: &CrossoverConfig) -> Self {
        Self {
            width: 1200,
            height: 600,
            lookback_years,
            fast_window: crossover.fast_window,
            slow_window: crossover.slow_window,
        }
    }

    /// Chart title for `industry`.
    pub fn title(&self, industry: &str) -> String {
        format!(
            "Daily Percentage of {industry} Stocks where SMA {} > SMA {} (Past {} Years)",
            self.fast_window, self.slow_window, self.lookback_years
        )
    }

    /// Legend label of the breadth line.
    pub fn series_label(&self) -> String {
        format!("SMA{} > SMA{}", self.fast_window, self.slow_window)
    }
}

/// Date span of the x-axis.
///
/// Uses the aggregate's own dates, or the whole analysis period when the
/// aggregate is empty. A single-day span is widened by one day.
fn x_bounds(aggregate: &IndustryAggregate, period: &DateRange) -> (NaiveDate, NaiveDate) {
    let (start, end) = aggregate
        .date_span()
        .unwrap_or((period.start(), period.end()));
    if start < end {
        (start, end)
    } else {
        (start, start + Duration::days(1))
    }
}

/// Render the breadth chart of one industry as PNG bytes.
pub fn render_industry_chart(
    industry: &str,
    aggregate: &IndustryAggregate,
    period: &DateRange,
    config: &ChartConfig,
) -> Result<Vec<u8>, ChartError> {
    let (width, height) = (config.width, config.height);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let (start, end) = x_bounds(aggregate, period);
        let mut chart = ChartBuilder::on(&root)
            .caption(config.title(industry), ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(start..end, 0f64..100f64)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Percentage of Stocks")
            .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m").to_string())
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(
                aggregate.points().iter().map(|p| (p.date, p.percentage)),
                &BLUE,
            ))
            .map_err(render_error)?
            .label(config.series_label())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    let image =
        RgbImage::from_raw(width, height, pixels).ok_or(ChartError::Buffer { width, height })?;
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;

    Ok(png.into_inner())
}

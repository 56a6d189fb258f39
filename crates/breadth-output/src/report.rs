//! Report attachments.

use crate::chart::{ChartConfig, ChartError, render_industry_chart};
use breadth_data::DateRange;
use breadth_signals::IndustryAggregate;
use std::collections::BTreeMap;
use tracing::info;

/// Attachment file name to PNG bytes.
pub type Attachments = BTreeMap<String, Vec<u8>>;

/// File name of an industry's chart attachment.
pub fn attachment_filename(industry: &str) -> String {
    format!("{industry}_SMA_analysis.png")
}

/// Render one chart per industry.
pub fn render_attachments(
    aggregates: &BTreeMap<String, IndustryAggregate>,
    period: &DateRange,
    config: &ChartConfig,
) -> Result<Attachments, ChartError> {
    let mut attachments = Attachments::new();

    for (industry, aggregate) in aggregates {
        let png = render_industry_chart(industry, aggregate, period, config)?;
        info!(
            industry = %industry,
            bytes = png.len(),
            "Chart rendered and attached"
        );
        attachments.insert(attachment_filename(industry), png);
    }

    Ok(attachments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use breadth_data::PriceSeries;
    use breadth_signals::{CrossoverConfig, SignalSeries};
    use chrono::{Duration, NaiveDate};

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn period() -> DateRange {
        DateRange::trailing_years(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5)
    }

    #[test]
    fn test_attachment_filename() {
        assert_eq!(attachment_filename("Tech"), "Tech_SMA_analysis.png");
        assert_eq!(
            attachment_filename("Health Care"),
            "Health Care_SMA_analysis.png"
        );
    }

    #[test]
    fn test_no_industries_no_attachments() {
        let attachments =
            render_attachments(&BTreeMap::new(), &period(), &ChartConfig::default()).unwrap();
        assert!(attachments.is_empty());
    }

    #[test]
    fn test_one_png_per_industry() {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let series = PriceSeries::from_pairs(
            "AAPL",
            (0..60).map(|i| (start + Duration::days(i), 100.0 + i as f64)),
        );
        let crossover = CrossoverConfig::new(5, 20).unwrap();
        let signals = SignalSeries::compute(&series, &crossover).unwrap();

        let mut aggregates = BTreeMap::new();
        aggregates.insert(
            "Tech".to_string(),
            IndustryAggregate::from_signals("Tech", &[signals], 2).unwrap(),
        );
        aggregates.insert("Energy".to_string(), IndustryAggregate::empty("Energy", 1));

        let config = ChartConfig {
            width: 400,
            height: 200,
            ..ChartConfig::default()
        };
        let attachments = render_attachments(&aggregates, &period(), &config).unwrap();

        assert_eq!(
            attachments.keys().collect::<Vec<_>>(),
            vec!["Energy_SMA_analysis.png", "Tech_SMA_analysis.png"]
        );
        assert!(attachments.values().all(|png| png.starts_with(PNG_SIGNATURE)));
    }
}

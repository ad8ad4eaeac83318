use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SeriesError};
use crate::types::{IndexKind, NormalizedSeries, ObservationPoint, SeriesPoint, TimeSeriesKey};

/// How CPI values are brought to display scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpiScale {
    /// The source reports a fraction (0.52 = 52%): multiply by 100 and truncate toward zero
    #[default]
    PercentFromFraction,
    /// The source already reports the display value
    AsIs,
}

impl CpiScale {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            CpiScale::PercentFromFraction => {
                // Snap away binary representation error first so 0.29 gives 29, not 28
                let scaled = ((value * 100.0) * 1e9).round() / 1e9;
                scaled.trunc()
            }
            CpiScale::AsIs => value,
        }
    }
}

/// What [`Normalizer::normalize`] accepts: adapted observations straight from a
/// schema adapter, or a series that went through the normalizer already.
#[derive(Debug, Clone, Copy)]
pub enum NormalizeInput<'a> {
    Observations(&'a [ObservationPoint]),
    Series(&'a NormalizedSeries),
}

impl<'a> From<&'a [ObservationPoint]> for NormalizeInput<'a> {
    fn from(points: &'a [ObservationPoint]) -> Self {
        NormalizeInput::Observations(points)
    }
}

impl<'a> From<&'a Vec<ObservationPoint>> for NormalizeInput<'a> {
    fn from(points: &'a Vec<ObservationPoint>) -> Self {
        NormalizeInput::Observations(points.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [ObservationPoint; N]> for NormalizeInput<'a> {
    fn from(points: &'a [ObservationPoint; N]) -> Self {
        NormalizeInput::Observations(points.as_slice())
    }
}

impl<'a> From<&'a NormalizedSeries> for NormalizeInput<'a> {
    fn from(series: &'a NormalizedSeries) -> Self {
        NormalizeInput::Series(series)
    }
}

/// Turns adapted observations into a [`NormalizedSeries`]: absent values and
/// points before `since` are dropped, CPI values are scaled, dates are sorted
/// and duplicate dates are dropped keeping the first occurrence.
///
/// A series that is already normalized passes through unchanged apart from the
/// `since` filter; its values are never scaled a second time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    cpi_scale: CpiScale,
}

impl Normalizer {
    pub fn new(cpi_scale: CpiScale) -> Self {
        Self { cpi_scale }
    }

    pub fn normalize<'a>(
        &self,
        key: TimeSeriesKey,
        input: impl Into<NormalizeInput<'a>>,
        since: NaiveDate,
    ) -> Result<NormalizedSeries> {
        match input.into() {
            NormalizeInput::Observations(points) => self.normalize_observations(key, points, since),
            NormalizeInput::Series(series) => self.normalize_series(key, series, since),
        }
    }

    fn normalize_observations(
        &self,
        key: TimeSeriesKey,
        points: &[ObservationPoint],
        since: NaiveDate,
    ) -> Result<NormalizedSeries> {
        let mut absent = 0usize;
        let mut early = 0usize;
        let mut kept = Vec::with_capacity(points.len());
        for point in points {
            let Some(value) = point.value else {
                absent += 1;
                continue;
            };
            if point.date < since {
                early += 1;
                continue;
            }
            kept.push(SeriesPoint { date: point.date, value });
        }

        debug!(
            "{}: {} points in, {} absent, {} before {}",
            key,
            points.len(),
            absent,
            early,
            since
        );
        self.finish(key, kept, false)
    }

    fn normalize_series(
        &self,
        key: TimeSeriesKey,
        series: &NormalizedSeries,
        since: NaiveDate,
    ) -> Result<NormalizedSeries> {
        if series.key != key {
            return Err(SeriesError::data_format(
                key,
                format!("cannot normalize {} as {}", series.key, key),
            ));
        }
        let kept = series.points.iter().copied().filter(|p| p.date >= since).collect();
        self.finish(key, kept, series.scaled)
    }

    fn finish(
        &self,
        key: TimeSeriesKey,
        points: Vec<SeriesPoint>,
        already_scaled: bool,
    ) -> Result<NormalizedSeries> {
        let scale = match key.index_kind {
            IndexKind::Cpi if !already_scaled => Some(self.cpi_scale),
            _ => None,
        };

        let mut scaled_points = Vec::with_capacity(points.len());
        for point in points {
            if !point.value.is_finite() {
                return Err(SeriesError::data_format(
                    key,
                    format!("non-finite value {} on {}", point.value, point.date),
                ));
            }
            let value = scale.map_or(point.value, |s| s.apply(point.value));
            scaled_points.push(SeriesPoint { date: point.date, value });
        }

        ensure_non_empty(NormalizedSeries {
            key,
            column: key.index_kind.column_name().to_string(),
            points: sort_unique(key, scaled_points),
            scaled: key.index_kind == IndexKind::Cpi,
        })
    }
}

fn sort_unique(key: TimeSeriesKey, mut points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    // Stable, so the first occurrence of a date stays first
    points.sort_by_key(|p| p.date);

    let mut out: Vec<SeriesPoint> = Vec::with_capacity(points.len());
    for point in points {
        match out.last() {
            Some(last) if last.date == point.date => {
                warn!(
                    "{}: dropping duplicate observation on {} (kept {}, dropped {})",
                    key, point.date, last.value, point.value
                );
            }
            _ => out.push(point),
        }
    }
    out
}

fn ensure_non_empty(series: NormalizedSeries) -> Result<NormalizedSeries> {
    if series.is_empty() {
        return Err(SeriesError::EmptySeries { key: series.key });
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Country;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn since() -> NaiveDate {
        date(2022, 1, 1)
    }

    fn currency() -> TimeSeriesKey {
        TimeSeriesKey::new(IndexKind::Currency, Country::Argentina)
    }

    fn cpi() -> TimeSeriesKey {
        TimeSeriesKey::new(IndexKind::Cpi, Country::Argentina)
    }

    #[test]
    fn test_cpi_scale_truncates() {
        assert_eq!(CpiScale::PercentFromFraction.apply(2.345), 234.0);
        assert_eq!(CpiScale::PercentFromFraction.apply(0.29), 29.0);
        assert_eq!(CpiScale::PercentFromFraction.apply(0.5249), 52.0);
        assert_eq!(CpiScale::PercentFromFraction.apply(-0.015), -1.0);
        assert_eq!(CpiScale::AsIs.apply(3.2), 3.2);
    }

    #[test]
    fn test_cpi_values_scaled() {
        let points = [ObservationPoint::new(date(2022, 1, 1), Some(2.345))];
        let series = Normalizer::default().normalize(cpi(), &points, since()).unwrap();
        assert_eq!(series.column, "CPI");
        assert_eq!(series.points, vec![SeriesPoint { date: date(2022, 1, 1), value: 234.0 }]);
        assert!(series.scaled);
    }

    #[test]
    fn test_currency_values_untouched() {
        let points = [ObservationPoint::new(date(2022, 1, 3), Some(102.7233))];
        let series = Normalizer::default().normalize(currency(), &points, since()).unwrap();
        assert_eq!(series.column, "Currency");
        assert_eq!(series.points[0].value, 102.7233);
        assert!(!series.scaled);
    }

    #[test]
    fn test_since_boundary() {
        let points = [
            ObservationPoint::new(date(2021, 12, 31), Some(1.0)),
            ObservationPoint::new(date(2022, 1, 1), Some(2.0)),
        ];
        let series = Normalizer::default().normalize(currency(), &points, since()).unwrap();
        assert_eq!(series.points, vec![SeriesPoint { date: date(2022, 1, 1), value: 2.0 }]);
    }

    #[test]
    fn test_absent_values_dropped_not_zeroed() {
        let points = [
            ObservationPoint::new(date(2022, 1, 3), None),
            ObservationPoint::new(date(2022, 1, 4), Some(10.7)),
        ];
        let series = Normalizer::default().normalize(currency(), &points, since()).unwrap();
        assert_eq!(series.len(), 1);
        assert!(series.points.iter().all(|p| p.value != 0.0));
    }

    #[test]
    fn test_sorted_and_duplicates_keep_first() {
        let points = [
            ObservationPoint::new(date(2022, 1, 5), Some(3.0)),
            ObservationPoint::new(date(2022, 1, 3), Some(1.0)),
            ObservationPoint::new(date(2022, 1, 5), Some(99.0)),
            ObservationPoint::new(date(2022, 1, 4), Some(2.0)),
        ];
        let series = Normalizer::default().normalize(currency(), &points, since()).unwrap();
        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_everything_filtered_is_empty_series() {
        let points = [
            ObservationPoint::new(date(2021, 6, 1), Some(1.0)),
            ObservationPoint::new(date(2022, 6, 1), None),
        ];
        let err = Normalizer::default().normalize(currency(), &points, since()).unwrap_err();
        assert!(matches!(err, SeriesError::EmptySeries { key } if key == currency()));
    }

    #[test]
    fn test_non_finite_rejected() {
        let points = [ObservationPoint::new(date(2022, 1, 3), Some(f64::NAN))];
        let err = Normalizer::default().normalize(currency(), &points, since()).unwrap_err();
        assert!(matches!(err, SeriesError::DataFormat { .. }));
    }

    #[test]
    fn test_cpi_normalize_twice_is_unchanged() {
        let points = [
            ObservationPoint::new(date(2022, 2, 1), Some(0.524)),
            ObservationPoint::new(date(2022, 1, 1), Some(0.505)),
        ];
        let normalizer = Normalizer::default();
        let once = normalizer.normalize(cpi(), &points, since()).unwrap();
        let twice = normalizer.normalize(cpi(), &once, since()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.points[0].value, 50.0);
    }

    #[test]
    fn test_currency_normalize_twice_is_unchanged() {
        let points = [
            ObservationPoint::new(date(2022, 1, 4), Some(10.7)),
            ObservationPoint::new(date(2022, 1, 3), Some(10.5)),
        ];
        let normalizer = Normalizer::default();
        let once = normalizer.normalize(currency(), &points, since()).unwrap();
        let twice = normalizer.normalize(currency(), &once, since()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalized_series_refiltered_by_later_since() {
        let points = [
            ObservationPoint::new(date(2022, 1, 1), Some(0.505)),
            ObservationPoint::new(date(2022, 2, 1), Some(0.524)),
        ];
        let normalizer = Normalizer::default();
        let once = normalizer.normalize(cpi(), &points, since()).unwrap();
        let later = normalizer.normalize(cpi(), &once, date(2022, 2, 1)).unwrap();
        assert_eq!(later.points, vec![SeriesPoint { date: date(2022, 2, 1), value: 52.0 }]);
    }

    #[test]
    fn test_unscaled_cpi_series_gets_scaled() {
        let raw = NormalizedSeries {
            key: cpi(),
            column: "CPI".to_string(),
            points: vec![SeriesPoint { date: date(2022, 1, 1), value: 0.505 }],
            scaled: false,
        };
        let series = Normalizer::default().normalize(cpi(), &raw, since()).unwrap();
        assert_eq!(series.points[0].value, 50.0);
        assert!(series.scaled);
    }

    #[test]
    fn test_series_under_another_key_rejected() {
        let points = [ObservationPoint::new(date(2022, 1, 3), Some(10.5))];
        let once = Normalizer::default().normalize(currency(), &points, since()).unwrap();
        let err = Normalizer::default().normalize(cpi(), &once, since()).unwrap_err();
        assert!(matches!(err, SeriesError::DataFormat { key, .. } if key == cpi()));
    }

    #[test]
    fn test_as_is_policy_keeps_cpi_value() {
        let points = [ObservationPoint::new(date(2022, 1, 1), Some(3.2))];
        let key = TimeSeriesKey::new(IndexKind::Cpi, Country::Norway);
        let series = Normalizer::new(CpiScale::AsIs).normalize(key, &points, since()).unwrap();
        assert_eq!(series.points[0].value, 3.2);
    }
}

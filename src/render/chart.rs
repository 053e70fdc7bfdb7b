use std::collections::BTreeSet;

use super::LongRecord;

pub const CHART_WIDTH: f64 = 780.0;
pub const CHART_HEIGHT: f64 = 360.0;

/// Series colors, assigned by sorted series name.
pub const PALETTE: [&str; 4] = ["#FF3B30", "#009DFF", "#FFC300", "#FF6F00"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub time: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub color: &'static str,
    pub points: Vec<ChartPoint>,
}

/// Line + point chart over an ordinal time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub times: Vec<i32>,
    pub series: Vec<ChartSeries>,
    /// Precision used for tooltip values.
    pub value_decimals: usize,
}

/// A display target for rendered charts.
pub trait ChartSurface {
    fn draw_series_chart(&mut self, chart: &SeriesChart);
}

/// Lays out `records` as one series per distinct series name and draws the
/// chart on `surface`.
pub fn render_series_chart<S: ChartSurface + ?Sized>(
    surface: &mut S,
    records: &[LongRecord],
    title: &str,
    unit_label: Option<&str>,
) {
    let chart = build_series_chart(records, title, unit_label);
    tracing::debug!(
        title,
        series = chart.series.len(),
        points = records.len(),
        "rendering series chart"
    );
    surface.draw_series_chart(&chart);
}

fn build_series_chart(records: &[LongRecord], title: &str, unit_label: Option<&str>) -> SeriesChart {
    let times: BTreeSet<i32> = records.iter().map(|record| record.time).collect();
    let names: BTreeSet<&str> = records.iter().map(|record| record.series.as_str()).collect();

    let series = names
        .iter()
        .enumerate()
        .map(|(index, name)| ChartSeries {
            name: (*name).to_string(),
            color: PALETTE[index % PALETTE.len()],
            points: records
                .iter()
                .filter(|record| record.series == *name)
                .map(|record| ChartPoint {
                    time: record.time,
                    value: record.value,
                })
                .collect(),
        })
        .collect();

    let all_integral = records
        .iter()
        .filter(|record| record.value.is_finite())
        .all(|record| record.value.fract() == 0.0);

    SeriesChart {
        title: title.to_string(),
        x_title: "Year".to_string(),
        y_title: match unit_label {
            Some(unit) if !unit.is_empty() => format!("Value ({unit})"),
            _ => "Value".to_string(),
        },
        times: times.into_iter().collect(),
        series,
        value_decimals: if all_integral { 0 } else { 2 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        charts: Vec<SeriesChart>,
    }

    impl ChartSurface for RecordingSurface {
        fn draw_series_chart(&mut self, chart: &SeriesChart) {
            self.charts.push(chart.clone());
        }
    }

    fn record(time: i32, series: &str, value: f64) -> LongRecord {
        LongRecord {
            time,
            series: series.to_string(),
            value,
        }
    }

    #[test]
    fn chart_has_one_series_per_name_and_one_tick_per_year() {
        let records = vec![
            record(2024, "Natural", 1.0),
            record(2024, "China model", 1.0),
            record(2025, "Natural", 2.0),
            record(2025, "China model", 1.5),
        ];
        let mut surface = RecordingSurface::default();
        render_series_chart(&mut surface, &records, "GDP", Some("10M USD"));

        assert_eq!(surface.charts.len(), 1);
        let chart = &surface.charts[0];
        assert_eq!(chart.title, "GDP");
        assert_eq!(chart.y_title, "Value (10M USD)");
        assert_eq!(chart.times, vec![2024, 2025]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[1].name, "Natural");
        assert_eq!(chart.series[1].points.len(), 2);
        assert_eq!(chart.value_decimals, 2);
    }

    #[test]
    fn colors_depend_only_on_the_series_name_set() {
        let forward = vec![record(2024, "Natural", 1.0), record(2024, "China model", 2.0)];
        let reversed = vec![record(2024, "China model", 2.0), record(2024, "Natural", 1.0)];

        let mut surface = RecordingSurface::default();
        render_series_chart(&mut surface, &forward, "a", None);
        render_series_chart(&mut surface, &reversed, "b", None);

        let colors = |chart: &SeriesChart| -> Vec<(String, &'static str)> {
            chart
                .series
                .iter()
                .map(|s| (s.name.clone(), s.color))
                .collect()
        };
        assert_eq!(colors(&surface.charts[0]), colors(&surface.charts[1]));
        assert_eq!(surface.charts[0].series[0].color, PALETTE[0]);
        assert_eq!(surface.charts[0].series[1].color, PALETTE[1]);
        assert_eq!(surface.charts[0].y_title, "Value");
    }

    #[test]
    fn integral_values_use_whole_number_tooltips() {
        let records = vec![record(2024, "a", 100.0), record(2025, "a", f64::NAN)];
        let mut surface = RecordingSurface::default();
        render_series_chart(&mut surface, &records, "t", Some(""));
        assert_eq!(surface.charts[0].value_decimals, 0);
        assert_eq!(surface.charts[0].y_title, "Value");
        assert!(surface.charts[0].series[0].points[1].value.is_nan());
    }
}

use anyhow::Result;
use chrono::Month;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tmy_calculator::models::monthly_means;
use tmy_calculator::{NormalizedRecord, TmySeries};

const CHART_TITLE: &str = "Monthly Solar Radiation: Original vs Typical Meteorological Year";

/// Points for the comparison chart: per-year monthly means and the TMY line
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    pub by_year: BTreeMap<i32, Vec<(f64, f64)>>,
    pub tmy: Vec<(f64, f64)>,
}

impl ComparisonSeries {
    pub fn build(records: &[NormalizedRecord], tmy: &TmySeries) -> Self {
        let mut by_year: BTreeMap<i32, Vec<(f64, f64)>> = BTreeMap::new();
        for (month, year, mean) in monthly_means(records) {
            by_year
                .entry(year)
                .or_insert_with(Vec::new)
                .push((month as f64, mean));
        }

        let tmy = tmy
            .monthly_means()
            .into_iter()
            .map(|(month, mean)| (month as f64, mean))
            .collect();

        Self { by_year, tmy }
    }

    fn max_value(&self) -> f64 {
        self.by_year
            .values()
            .flatten()
            .chain(self.tmy.iter())
            .map(|(_, v)| *v)
            .fold(0.0, f64::max)
    }
}

pub fn render_comparison_chart(series: &ComparisonSeries, output_path: &Path) -> Result<()> {
    let root = BitMapBackend::new(output_path, (1500, 1000)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = match series.max_value() {
        max if max > 0.0 => max * 1.1,
        _ => 1.0,
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.5f64..12.5f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&|m| month_label(*m))
        .x_desc("Month")
        .y_desc("Average Solar Radiation")
        .draw()?;

    // Scatter of each original year's monthly means
    for (idx, (year, points)) in series.by_year.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(month, mean)| Circle::new((month, mean), 5, color.filled())),
            )?
            .label(format!("Original {}", year))
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    chart
        .draw_series(LineSeries::new(
            series.tmy.iter().copied(),
            RED.stroke_width(3),
        ))?
        .label("TMY")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(3)));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn month_label(position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > f64::EPSILON || !(1.0..=12.0).contains(&rounded) {
        return String::new();
    }

    Month::try_from(rounded as u8)
        .map(|month| month.name()[..3].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, month: u32, value: f64) -> NormalizedRecord {
        NormalizedRecord {
            year,
            month,
            day: 1,
            hour: 12,
            value,
        }
    }

    #[test]
    fn test_comparison_series() {
        let records = vec![
            record(2019, 1, 2.0),
            record(2019, 1, 4.0),
            record(2020, 1, 5.0),
            record(2020, 2, 7.0),
        ];
        let tmy = TmySeries {
            records: vec![record(2020, 1, 5.0), record(2020, 2, 7.0)],
        };

        let series = ComparisonSeries::build(&records, &tmy);

        assert_eq!(series.by_year[&2019], vec![(1.0, 3.0)]);
        assert_eq!(series.by_year[&2020], vec![(1.0, 5.0), (2.0, 7.0)]);
        assert_eq!(series.tmy, vec![(1.0, 5.0), (2.0, 7.0)]);
        assert_eq!(series.max_value(), 7.0);
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(month_label(1.0), "Jan");
        assert_eq!(month_label(12.0), "Dec");
        assert_eq!(month_label(0.5), "");
        assert_eq!(month_label(13.0), "");
    }
}

//! Latitude scatter plots
//!
//! Renders one PNG per measurement with latitude on the x axis.

use crate::dataset::WeatherTable;
use crate::models::{Measurement, Units};
use crate::{Result, SurveyError};
use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Label of the shared x axis
pub const X_LABEL: &str = "Latitude (Degrees)";

/// Chart description for one measurement
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub measurement: Measurement,
    pub file_name: &'static str,
    pub title: String,
    pub y_label: String,
}

impl PlotSpec {
    #[must_use]
    pub fn new(measurement: Measurement, units: Units, date: NaiveDate) -> Self {
        let (file_name, subject, y_label) = match measurement {
            Measurement::Temperature => (
                "temp.png",
                "Temperature",
                format!("Temperature ({})", units.temperature_symbol()),
            ),
            Measurement::Humidity => ("humidity.png", "Humidity", "Humidity (%)".to_string()),
            Measurement::Cloudiness => ("clouds.png", "Cloud Cover", "Cloud Cover (%)".to_string()),
            Measurement::WindSpeed => (
                "wind.png",
                "Wind",
                format!("Wind speed ({})", units.wind_speed_symbol()),
            ),
        };

        Self {
            measurement,
            file_name,
            title: format!("Latitude vs {subject} on {}", format_run_date(date)),
            y_label,
        }
    }
}

/// Where and how large the charts are drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Run date as `year-month-day` without zero padding, e.g. `2026-10-9`
#[must_use]
pub fn format_run_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Specs for all four charts, in output order
#[must_use]
pub fn plot_specs(units: Units, date: NaiveDate) -> Vec<PlotSpec> {
    Measurement::ALL
        .iter()
        .map(|measurement| PlotSpec::new(*measurement, units, date))
        .collect()
}

/// Y axis range: the data range padded by 10%, or +/-1 around a flat series.
///
/// Percentages always cover 0-100.
#[must_use]
pub fn y_range(values: &[f64], measurement: Measurement) -> Range<f64> {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(*v), max.max(*v))
        });

    if measurement.is_percentage() {
        let low = if min.is_finite() { min.min(0.0) } else { 0.0 };
        let high = if max.is_finite() { max.max(100.0) } else { 100.0 };
        return low..high;
    }

    if !min.is_finite() {
        return 0.0..1.0;
    }

    let padding = if (max - min).abs() > 1e-6 {
        (max - min) * 0.1
    } else {
        1.0
    };
    (min - padding)..(max + padding)
}

fn plot_error<E: std::fmt::Display>(err: E) -> SurveyError {
    SurveyError::plot(err.to_string())
}

/// Draw a single latitude scatter plot into `path`, with `y` as the value axis
pub fn render_scatter(
    path: &Path,
    spec: &PlotSpec,
    points: &[(f64, f64)],
    y: Range<f64>,
    width: u32,
    height: u32,
) -> Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-90f64..90f64, y)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(spec.y_label.as_str())
        .light_line_style(BLACK.mix(0.1))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.mix(0.6).filled())),
        )
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    debug!("Rendered {} points into {}", points.len(), path.display());
    Ok(())
}

/// Render all four charts into the plot directory, returning the written paths
pub fn render_all(
    table: &WeatherTable,
    units: Units,
    date: NaiveDate,
    options: &PlotOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&options.dir)?;

    let mut written = Vec::new();
    for spec in plot_specs(units, date) {
        let path = options.dir.join(spec.file_name);
        let y = y_range(&table.column(spec.measurement), spec.measurement);
        render_scatter(
            &path,
            &spec,
            &table.points(spec.measurement),
            y,
            options.width,
            options.height,
        )?;
        written.push(path);
    }

    info!("Wrote {} plots to {}", written.len(), options.dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CityWeather;
    use rstest::rstest;
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn test_format_run_date_is_unpadded() {
        assert_eq!(format_run_date(date()), "2026-3-7");
        assert_eq!(
            format_run_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()),
            "2026-10-19"
        );
    }

    #[rstest]
    #[case(Measurement::Temperature, "temp.png", "Latitude vs Temperature on 2026-3-7", "Temperature (F)")]
    #[case(Measurement::Humidity, "humidity.png", "Latitude vs Humidity on 2026-3-7", "Humidity (%)")]
    #[case(Measurement::Cloudiness, "clouds.png", "Latitude vs Cloud Cover on 2026-3-7", "Cloud Cover (%)")]
    #[case(Measurement::WindSpeed, "wind.png", "Latitude vs Wind on 2026-3-7", "Wind speed (MPH)")]
    fn test_imperial_plot_specs(
        #[case] measurement: Measurement,
        #[case] file_name: &str,
        #[case] title: &str,
        #[case] y_label: &str,
    ) {
        let spec = PlotSpec::new(measurement, Units::Imperial, date());
        assert_eq!(spec.file_name, file_name);
        assert_eq!(spec.title, title);
        assert_eq!(spec.y_label, y_label);
    }

    #[test]
    fn test_metric_labels() {
        let specs = plot_specs(Units::Metric, date());
        assert_eq!(specs.len(), 4);
        assert_eq!(specs[0].y_label, "Temperature (C)");
        assert_eq!(specs[3].y_label, "Wind speed (m/s)");
    }

    #[test]
    fn test_y_range_pads_data() {
        let range = y_range(&[10.0, 30.0], Measurement::Temperature);
        assert!((range.start - 8.0).abs() < 1e-9);
        assert!((range.end - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_y_range_flat_and_empty() {
        assert_eq!(y_range(&[5.0, 5.0], Measurement::WindSpeed), 4.0..6.0);
        assert_eq!(y_range(&[], Measurement::Temperature), 0.0..1.0);
        assert_eq!(y_range(&[f64::NAN], Measurement::Temperature), 0.0..1.0);
    }

    #[test]
    fn test_y_range_percentages_cover_full_scale() {
        assert_eq!(y_range(&[20.0, 75.0], Measurement::Humidity), 0.0..100.0);
        assert_eq!(y_range(&[], Measurement::Cloudiness), 0.0..100.0);
    }

    fn assert_all_plots_written(dir: &Path, written: &[PathBuf]) {
        assert_eq!(written.len(), 4);
        for name in ["temp.png", "humidity.png", "clouds.png", "wind.png"] {
            let path = dir.join(name);
            assert!(written.contains(&path), "{name} not reported");
            let size = fs::metadata(&path).unwrap().len();
            assert!(size > 0, "{name} is empty");
        }
    }

    fn options(dir: PathBuf) -> PlotOptions {
        PlotOptions {
            dir,
            width: 400,
            height: 300,
        }
    }

    #[test]
    fn test_render_all_empty_table() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("analysis");

        let written = render_all(&WeatherTable::new(), Units::Imperial, date(), &options(dir.clone())).unwrap();

        assert_all_plots_written(&dir, &written);
    }

    #[test]
    fn test_render_all_creates_missing_dir() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("nested").join("plots");
        assert!(!dir.exists());
        let table = WeatherTable::from_rows(vec![
            CityWeather {
                city: "hilo".to_string(),
                lat: 19.73,
                temp: 78.8,
                humidity: 74.0,
                wind: 9.22,
                clouds: 40.0,
            },
            CityWeather {
                city: "ushuaia".to_string(),
                lat: -54.8,
                temp: 39.2,
                humidity: 81.0,
                wind: 12.75,
                clouds: 90.0,
            },
        ]);

        let written = render_all(&table, Units::Metric, date(), &options(dir.clone())).unwrap();

        assert_all_plots_written(&dir, &written);
    }
}

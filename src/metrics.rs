use std::{fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};
use plotters::prelude::*;
use serde::Serialize;

use crate::{
    relativity::special::{length_contraction, lorentz_factor},
    scene::ltf::{STAR_X, Trip},
};

/// Highest value drawn on the plot's y axis; the rest-frame interval diverges as v → 0.
const Y_CAP: f64 = 60.0;

/// One row of the trip table: the star-to-star trip measured from a frame moving at `velocity_fraction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub velocity_fraction: f64,
    pub gamma: f64,
    /// Launch to landing in the stars' frame (ly).
    pub interval: f64,
    /// Launch to landing in the moving frame (ly).
    pub boosted_interval: f64,
    /// Star separation in the stars' frame (ly).
    pub separation: f64,
    /// Star separation in the moving frame (ly).
    pub contracted_separation: f64,
}

/// The fixed `trip` seen from a frame moving at `v`.
pub fn observe(trip: &Trip, v: f64) -> DataPoint {
    let separation = 2.0 * STAR_X;
    DataPoint {
        velocity_fraction: v,
        gamma: lorentz_factor(v),
        interval: trip.interval(),
        boosted_interval: trip.boosted_interval(v),
        separation,
        contracted_separation: length_contraction(separation, v),
    }
}

/// Rockets at `v = i / steps` for `i` in `1..steps`, each seen from its own frame.
pub fn sweep(steps: u32) -> Vec<DataPoint> {
    (1..steps)
        .map(|i| {
            let v = i as f64 / steps as f64;
            observe(&Trip::new(v), v)
        })
        .collect()
}

pub fn export_csv<W: Write>(log: &[DataPoint], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for dp in log {
        writer.serialize(dp)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_csv_file(log: &[DataPoint], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    export_csv(log, file)?;
    info!("{} rows written to {}", log.len(), path.display());
    Ok(())
}

pub fn plot_results(log: &[DataPoint], path: &Path, caption: &str) -> Result<()> {
    if log.is_empty() {
        warn!("nothing to plot, skipping {}", path.display());
        return Ok(());
    }
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = log.iter().fold((f64::MAX, f64::MIN), |(lo, hi), d| {
        (lo.min(d.velocity_fraction), hi.max(d.velocity_fraction))
    });
    let (x_min, x_max) = if x_max > x_min { (x_min, x_max) } else { (x_min - 0.5, x_max + 0.5) };
    let y_max = log
        .iter()
        .flat_map(|d| [d.interval, d.boosted_interval, d.gamma])
        .filter(|y| y.is_finite())
        .fold(0.0, f64::max)
        .min(Y_CAP)
        .ceil()
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Velocity (fraction of c)")
        .y_desc("Light-years")
        .draw()?;

    let series = |value: fn(&DataPoint) -> f64| -> Vec<(f64, f64)> {
        log.iter()
            .map(|d| (d.velocity_fraction, value(d)))
            .filter(|(_, y)| y.is_finite() && *y <= y_max)
            .collect()
    };

    chart
        .draw_series(LineSeries::new(series(|d| d.interval), &BLUE))?
        .label("Δct (stars' frame)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(series(|d| d.boosted_interval), &RED))?
        .label("Δct′ (moving frame)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &RED));

    chart
        .draw_series(LineSeries::new(series(|d| d.gamma), &GREEN))?
        .label("Lorentz factor γ")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &GREEN));

    chart.configure_series_labels().border_style(&BLACK).draw()?;
    root.present()?;
    info!("plot saved to {}", path.display());
    Ok(())
}

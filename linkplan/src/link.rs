use crate::{
    features,
    options::{Link, LinkCommand},
};
use anyhow::{ensure, Result};
use geojson::{GeoJson, JsonObject};
use itertools::{Itertools, MinMaxResult};
use rfgeo::{geodesy::METERS_PER_DEGREE, FresnelEnvelope, FresnelZone, GeoPoint};
use serde_json::json;
use std::io::Write;
use textplots::{Chart, Plot, Shape};

impl Link {
    pub fn run(&self) -> Result<()> {
        ensure!(
            self.frequency.is_finite() && self.frequency > 0.0,
            "frequency must be positive, got {} GHz",
            self.frequency
        );

        let envelope = FresnelEnvelope::builder()
            .start(self.start.0)
            .end(self.dest.0)
            .freq(self.frequency)
            .points(self.points)
            .build()?;
        log::debug!(
            "{:.1} m link, {} envelope points",
            envelope.distance_m,
            envelope.polygon.len()
        );

        match self.cmd {
            LinkCommand::Csv => print_csv(&envelope.polygon)?,
            LinkCommand::Json => print_json(&envelope.polygon)?,
            LinkCommand::Geojson => self.print_geojson(&envelope),
            LinkCommand::Plot => plot_ascii(&envelope),
            LinkCommand::Info => self.print_info(&envelope),
            LinkCommand::Zone => self.print_zone(&envelope)?,
        };
        Ok(())
    }

    fn print_info(&self, envelope: &FresnelEnvelope) {
        println!(
            "Distance:     {:.2} m ({:.2} km)",
            envelope.distance_m,
            envelope.distance_m / 1000.0
        );
        println!("Frequency:    {} GHz", self.frequency);
        println!("Bearing:      {:.2}°", envelope.bearing_deg);
        println!("Wavelength:   {:.4} m", envelope.wavelength_m);
        println!("Max Fresnel:  {:.2} m", envelope.max_radius_m);
    }

    fn print_geojson(&self, envelope: &FresnelEnvelope) {
        let mut properties = JsonObject::new();
        properties.insert("distance_m".to_string(), json!(envelope.distance_m));
        properties.insert("frequency_ghz".to_string(), json!(self.frequency));
        properties.insert("max_radius_m".to_string(), json!(envelope.max_radius_m));
        let feature = features::envelope(&envelope.polygon, properties);
        println!("{}", GeoJson::from(feature));
    }

    /// Prints `points + 1` samples of the first fresnel zone radius
    /// from start to destination.
    fn print_zone(&self, envelope: &FresnelEnvelope) -> Result<()> {
        let samples = self.points + 1;
        let zone = FresnelZone::new(1, self.frequency, envelope.distance_m);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Distance,Radius")?;
        for (idx, radius) in zone.iter(samples).enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let distance = if samples > 1 {
                envelope.distance_m * idx as f64 / (samples - 1) as f64
            } else {
                0.0
            };
            writeln!(stdout, "{distance},{radius}")?;
        }
        Ok(())
    }
}

/// # Example with gnuplot
///
/// ```sh
/// cargo run -- link --start=46.95,7.44 --dest=46.93,7.42 csv | tail -n +2 | tr ',' ' ' > ~/.tmp/plot && gnuplot -p -e "plot '~/.tmp/plot' using 3:2 with lines"
/// ```
fn print_csv(polygon: &[GeoPoint]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Index,Latitude,Longitude")?;
    for (idx, point) in polygon.iter().enumerate() {
        let latitude = point.y();
        let longitude = point.x();
        writeln!(stdout, "{idx},{latitude},{longitude}")?;
    }
    Ok(())
}

fn print_json(polygon: &[GeoPoint]) -> Result<()> {
    let reshaped: Vec<[f64; 2]> = polygon.iter().map(|p| [p.y(), p.x()]).collect();
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

/// Plots the envelope in meters, along-track on the x axis and
/// cross-track on the y axis.
fn plot_ascii(envelope: &FresnelEnvelope) {
    let plot_data = link_frame(envelope);
    let (xmin, xmax) = match plot_data.iter().map(|(x, _)| *x).minmax_by(f32::total_cmp) {
        MinMaxResult::MinMax(min, max) if min < max => (min, max),
        MinMaxResult::MinMax(val, _) | MinMaxResult::OneElement(val) => (val - 1.0, val + 1.0),
        MinMaxResult::NoElements => (-1.0, 1.0),
    };
    Chart::new(180, 60, xmin, xmax)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}

/// Projects the envelope into a local frame centered on its first
/// point (the destination tower) and rotated so the link lies on the
/// x axis.
#[allow(clippy::cast_possible_truncation)]
fn link_frame(envelope: &FresnelEnvelope) -> Vec<(f32, f32)> {
    let Some(origin) = envelope.polygon.first() else {
        return Vec::new();
    };
    let (bearing_sin, bearing_cos) = envelope.bearing_deg.to_radians().sin_cos();
    let lon_scale = METERS_PER_DEGREE * origin.y().to_radians().cos();
    envelope
        .polygon
        .iter()
        .map(|p| {
            let east = (p.x() - origin.x()) * lon_scale;
            let north = (p.y() - origin.y()) * METERS_PER_DEGREE;
            let along = east * bearing_sin + north * bearing_cos;
            let cross = east * bearing_cos - north * bearing_sin;
            (along as f32, cross as f32)
        })
        .collect()
}

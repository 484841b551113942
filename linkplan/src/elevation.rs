use crate::options::Elevation;
use anyhow::Result;
use geo::Point;
use std::io::Write;
use towers::lookup::{elevation_profile, OpenElevation};

impl Elevation {
    pub fn run(&self) -> Result<()> {
        let source = OpenElevation::new()?;
        let profile = elevation_profile(
            &source,
            Point::from(self.start.0),
            Point::from(self.dest.0),
            self.samples,
        );
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Latitude,Longitude,Elevation")?;
        for sample in profile {
            let latitude = sample.position.y();
            let longitude = sample.position.x();
            let elevation = sample.elevation_m;
            writeln!(stdout, "{latitude},{longitude},{elevation}")?;
        }
        Ok(())
    }
}

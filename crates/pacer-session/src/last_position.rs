//! Restoring the last known position at startup.
//!
//! Another component writes `LastPos.ini` as `"<latitude>:<longitude>"`.
//! Here it is only read.  Anything unusable means "no prior position":
//! this module never returns an error.

use std::path::Path;

use tracing::debug;

use pacer_core::Coordinate;

pub const LAST_POSITION_FILE: &str = "LastPos.ini";

/// Parse `"<lat>:<lon>"`, giving the result `altitude`.  Fields after the
/// longitude are ignored.
pub fn parse_last_position(text: &str, altitude: f64) -> Option<Coordinate> {
    let mut fields = text.trim().split(':');
    let (lat, lon) = (fields.next()?.trim(), fields.next()?.trim());
    if lat.is_empty() || lon.is_empty() {
        return None;
    }
    let latitude: f64 = lat.parse().ok()?;
    let longitude: f64 = lon.parse().ok()?;
    if latitude.abs() <= 90.0 && longitude.abs() <= 180.0 {
        Some(Coordinate::new(latitude, longitude, altitude))
    } else {
        None
    }
}

/// Read `<dir>/LastPos.ini`.
pub fn load_last_position(dir: &Path, altitude: f64) -> Option<Coordinate> {
    let path = dir.join(LAST_POSITION_FILE);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no last position");
            return None;
        }
    };
    let position = parse_last_position(&text, altitude);
    if position.is_none() {
        debug!(path = %path.display(), content = text.trim(), "ignoring unusable last position");
    }
    position
}

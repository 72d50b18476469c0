//! Google Directions response parsing.
//!
//! Only the fields the walk engine uses are modelled: the top-level
//! `status`, the optional `error_message`, and per route the
//! `overview_polyline` plus leg distance/duration totals.  The first route
//! wins; alternatives are ignored.

use serde::Deserialize;

use crate::{Directions, DirectionsStatus, RoutingResult, decode_polyline};

#[derive(Debug, Deserialize)]
struct Response {
    status: DirectionsStatus,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    overview_polyline: Polyline,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Polyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: Option<Measure>,
    duration: Option<Measure>,
}

#[derive(Debug, Deserialize)]
struct Measure {
    value: f64,
}

impl Directions {
    /// Parse a Google Directions JSON body.
    ///
    /// A non-OK status is returned as data, not as an error, so the caller
    /// can recognize quota exhaustion.  Malformed JSON or an undecodable
    /// polyline is an error.
    pub fn from_google_json(body: &str) -> RoutingResult<Directions> {
        let response: Response = serde_json::from_str(body)?;

        let mut directions = Directions::with_status(response.status);
        directions.error_message = response.error_message;

        if let Some(route) = response.routes.into_iter().next() {
            directions.path = decode_polyline(&route.overview_polyline.points)?;
            if !route.legs.is_empty() {
                directions.distance_m = Some(
                    route.legs.iter().filter_map(|l| l.distance.as_ref()).map(|m| m.value).sum(),
                );
                directions.duration_secs = Some(
                    route.legs.iter().filter_map(|l| l.duration.as_ref()).map(|m| m.value).sum(),
                );
            }
        }
        Ok(directions)
    }
}

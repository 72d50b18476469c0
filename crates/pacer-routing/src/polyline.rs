//! Encoded-polyline decoding.
//!
//! Web directions services return route geometry as an "encoded polyline":
//! each coordinate is a pair of signed deltas from the previous point,
//! scaled by 1e5, zig-zag encoded, and written as 5-bit chunks offset into
//! printable ASCII (`chunk + 63`, with `0x20` marking "more chunks follow").

use pacer_core::Coordinate;

use crate::{RoutingError, RoutingResult};

const PRECISION: f64 = 1e5;

/// Decode an encoded polyline into coordinates (altitude 0).
///
/// # Errors
///
/// `RoutingError::Polyline` if a byte falls outside the encoding alphabet,
/// a value is truncated, or the string ends after a latitude without its
/// longitude.
pub fn decode_polyline(encoded: &str) -> RoutingResult<Vec<Coordinate>> {
    let bytes = encoded.as_bytes();
    let mut path = Vec::new();
    let mut offset = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while offset < bytes.len() {
        lat += next_value(bytes, &mut offset)?;
        if offset >= bytes.len() {
            return Err(RoutingError::Polyline { offset });
        }
        lon += next_value(bytes, &mut offset)?;
        path.push(Coordinate::new(lat as f64 / PRECISION, lon as f64 / PRECISION, 0.0));
    }
    Ok(path)
}

/// Read one zig-zag encoded delta starting at `*offset`.
fn next_value(bytes: &[u8], offset: &mut usize) -> RoutingResult<i64> {
    let mut result: i64 = 0;
    let mut shift = 0u32;
    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(RoutingError::Polyline { offset: *offset });
        };
        if !(63..=126).contains(&byte) || shift > 30 {
            return Err(RoutingError::Polyline { offset: *offset });
        }
        *offset += 1;
        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

use crate::types::day_score::{FlightAltitude, MigrationClass};
use crate::utils::clamp;

pub const CLASS_TOP_MIN: f64 = 0.75;
pub const CLASS_GOED_MIN: f64 = 0.50;
pub const CLASS_MATIG_MIN: f64 = 0.25;

/// Wind speed (km/h) from which migration is considered suppressed (7 Bft).
pub const ALTITUDE_SUPPRESSED_MIN: f64 = 50.0;
/// Wind speed (km/h) from which birds fly low (5 Bft).
pub const ALTITUDE_LOW_MIN: f64 = 29.0;
/// Wind speed (km/h) from which birds fly at mid altitude (3 Bft).
pub const ALTITUDE_MIDDLE_MIN: f64 = 12.0;

/// Maps a score to its favourability class.
///
/// # Examples
///
/// ```
/// use migration_raster::{score_to_class, MigrationClass};
///
/// assert_eq!(score_to_class(0.75), MigrationClass::Top);
/// assert_eq!(score_to_class(0.5), MigrationClass::Goed);
/// assert_eq!(score_to_class(0.249), MigrationClass::Laag);
/// ```
pub fn score_to_class(score: f64) -> MigrationClass {
    if score >= CLASS_TOP_MIN {
        MigrationClass::Top
    } else if score >= CLASS_GOED_MIN {
        MigrationClass::Goed
    } else if score >= CLASS_MATIG_MIN {
        MigrationClass::Matig
    } else {
        MigrationClass::Laag
    }
}

/// Display color for a score as `#rrggbb`.
///
/// The hue runs from blue (240°) at score 0 through green to red (0°) at
/// score 1, at full saturation and value.
///
/// # Examples
///
/// ```
/// use migration_raster::score_to_color;
///
/// assert_eq!(score_to_color(1.0), "#ff0000");
/// assert_eq!(score_to_color(0.5), "#00ff00");
/// assert_eq!(score_to_color(0.0), "#0000ff");
/// ```
pub fn score_to_color(score: f64) -> String {
    let hue = 240.0 * (1.0 - clamp(score, 0.0, 1.0));
    let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
    format!("#{:02x}{:02x}{:02x}", to_byte(r), to_byte(g), to_byte(b))
}

fn to_byte(channel: f64) -> u8 {
    (clamp(channel, 0.0, 1.0) * 255.0).round() as u8
}

/// `hue` in degrees, `saturation` and `value` in `[0, 1]`.
fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (f64, f64, f64) {
    let chroma = value * saturation;
    let sector = (hue / 60.0).rem_euclid(6.0);
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let m = value - chroma;
    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    (r + m, g + m, b + m)
}

/// Expected flight altitude for a 10 m wind speed in km/h.
pub fn flight_altitude(wind_speed_kmh: f64) -> FlightAltitude {
    if wind_speed_kmh >= ALTITUDE_SUPPRESSED_MIN {
        FlightAltitude::Suppressed
    } else if wind_speed_kmh >= ALTITUDE_LOW_MIN {
        FlightAltitude::Low
    } else if wind_speed_kmh >= ALTITUDE_MIDDLE_MIN {
        FlightAltitude::Middle
    } else {
        FlightAltitude::High
    }
}

//! Normalized sub-scores, each in `[0, 1]`.
//!
//! Every function maps one weather variable to a favourability value. The
//! regional functions model the BE/NL coast, where a south-easterly breeze of
//! 3–5 Bft pushes migrants from central France towards the North Sea.

use crate::utils::clamp;

/// Optimal wind direction inside the regional zone (south-east), degrees.
pub const REGIONAL_OPTIMAL_DIRECTION: f64 = 135.0;
/// Angular distance past the optimum (towards S/W) where the score reaches 0.
pub const REGIONAL_FALLOFF_SOUTH: f64 = 225.0;
/// Angular distance before the optimum (towards E/N) where the score reaches 0.
pub const REGIONAL_FALLOFF_EAST: f64 = 135.0;

/// Beaufort lower bounds used by the regional speed curve, km/h.
pub const REGIONAL_SPEED_1BF: f64 = 1.0;
pub const REGIONAL_SPEED_3BF: f64 = 12.0;
pub const REGIONAL_SPEED_5BF: f64 = 38.0;
pub const REGIONAL_SPEED_7BF: f64 = 50.0;

/// Tailwind score for a northward migration: 0 for a north wind, 1 for a south wind.
pub fn wind_direction_general(direction_deg: f64) -> f64 {
    clamp((1.0 - direction_deg.to_radians().cos()) / 2.0, 0.0, 1.0)
}

/// Signed angular distance from `target_deg`, normalized to `(-180, 180]`.
pub fn signed_angle_delta(direction_deg: f64, target_deg: f64) -> f64 {
    let delta = (direction_deg - target_deg + 180.0).rem_euclid(360.0) - 180.0;
    if delta == -180.0 {
        180.0
    } else {
        delta
    }
}

/// Asymmetric tailwind score peaked at south-east.
///
/// Rotating towards south/west decays slower than rotating towards east/north,
/// which yields SE > SSE > ESE > S > E > N, W ≈ 0.
pub fn wind_direction_regional(direction_deg: f64) -> f64 {
    let delta = signed_angle_delta(direction_deg, REGIONAL_OPTIMAL_DIRECTION);
    let falloff = if delta >= 0.0 {
        REGIONAL_FALLOFF_SOUTH
    } else {
        REGIONAL_FALLOFF_EAST
    };
    let score = (delta.abs() * 180.0 / falloff).to_radians().cos();
    clamp(score, 0.0, 1.0)
}

/// Light to moderate breeze is ideal: ramps up to 5 km/h, flat to 25 km/h,
/// gone by 60 km/h.
pub fn wind_speed_general(speed_kmh: f64) -> f64 {
    if speed_kmh <= 5.0 {
        clamp(speed_kmh / 5.0, 0.0, 1.0)
    } else if speed_kmh <= 25.0 {
        1.0
    } else {
        clamp(1.0 - (speed_kmh - 25.0) / 35.0, 0.0, 1.0)
    }
}

/// Regional speed curve: 3–5 Bft is optimal because it forces birds down to
/// observable altitudes, while calm air lets them fly out of sight.
pub fn wind_speed_regional(speed_kmh: f64) -> f64 {
    if speed_kmh < REGIONAL_SPEED_1BF {
        0.2
    } else if speed_kmh < REGIONAL_SPEED_3BF {
        0.2 + (speed_kmh - REGIONAL_SPEED_1BF) / (REGIONAL_SPEED_3BF - REGIONAL_SPEED_1BF) * 0.8
    } else if speed_kmh <= REGIONAL_SPEED_5BF {
        1.0
    } else if speed_kmh < REGIONAL_SPEED_7BF {
        let decay =
            (speed_kmh - REGIONAL_SPEED_5BF) / (REGIONAL_SPEED_7BF - REGIONAL_SPEED_5BF) * 0.7;
        (1.0 - decay).max(0.3)
    } else {
        (0.3 - (speed_kmh - REGIONAL_SPEED_7BF) / 30.0).max(0.0)
    }
}

/// Dry is best; 5 mm/h or more scores 0.
pub fn precipitation(precipitation_mm: f64) -> f64 {
    clamp(1.0 - precipitation_mm / 5.0, 0.0, 1.0)
}

/// Saturates at 10 km visibility.
pub fn visibility(visibility_m: f64) -> f64 {
    clamp(visibility_m / 10_000.0, 0.0, 1.0)
}

/// Flat optimum between 8 and 20 °C, zero at −5 °C and 35 °C.
pub fn temperature(temperature_c: f64) -> f64 {
    if (8.0..=20.0).contains(&temperature_c) {
        1.0
    } else if temperature_c < 8.0 {
        clamp((temperature_c + 5.0) / 13.0, 0.0, 1.0)
    } else {
        clamp(1.0 - (temperature_c - 20.0) / 15.0, 0.0, 1.0)
    }
}

/// High pressure means stable weather: 995 hPa scores 0, 1025 hPa scores 1.
pub fn pressure(pressure_hpa: f64) -> f64 {
    clamp((pressure_hpa - 995.0) / 30.0, 0.0, 1.0)
}

/// Deeper boundary layer means better thermals for soaring species.
pub fn boundary_layer_height(blh_m: f64) -> f64 {
    clamp(blh_m / 1500.0, 0.0, 1.0)
}

/// Moderate convection helps soaring; a lot of it means storms.
pub fn cape(cape_jkg: f64) -> f64 {
    if cape_jkg <= 0.0 {
        0.2
    } else if cape_jkg <= 500.0 {
        0.4 + (cape_jkg / 500.0) * 0.5
    } else if cape_jkg <= 1500.0 {
        0.9 - ((cape_jkg - 500.0) / 1000.0) * 0.5
    } else {
        clamp(0.4 - (cape_jkg - 1500.0) / 1500.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_general_direction_extremes() {
        assert!(close(wind_direction_general(0.0), 0.0));
        assert!(close(wind_direction_general(360.0), 0.0));
        assert!(close(wind_direction_general(180.0), 1.0));
        assert!(close(wind_direction_general(90.0), 0.5));
        assert!(close(wind_direction_general(270.0), 0.5));
    }

    #[test]
    fn test_general_direction_monotonic_towards_south() {
        let mut last = -1.0;
        for step in 0..=36 {
            let score = wind_direction_general(step as f64 * 5.0);
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_signed_angle_delta_range() {
        assert_eq!(signed_angle_delta(135.0, 135.0), 0.0);
        assert_eq!(signed_angle_delta(157.5, 135.0), 22.5);
        assert_eq!(signed_angle_delta(112.5, 135.0), -22.5);
        assert_eq!(signed_angle_delta(315.0, 135.0), 180.0);
        assert_eq!(signed_angle_delta(0.0, 135.0), -135.0);
        assert_eq!(signed_angle_delta(350.0, 10.0), -20.0);
    }

    #[test]
    fn test_regional_direction_compass_ranking() {
        let se = wind_direction_regional(135.0);
        let sse = wind_direction_regional(157.5);
        let ese = wind_direction_regional(112.5);
        let s = wind_direction_regional(180.0);
        let e = wind_direction_regional(90.0);
        let n = wind_direction_regional(0.0);
        let w = wind_direction_regional(270.0);
        assert!(close(se, 1.0));
        assert!(se > sse && sse > ese && ese > s && s > e);
        assert!(e > n && e > w);
        assert!(n < 0.01);
        assert!(w < 0.01);
    }

    #[test]
    fn test_regional_direction_asymmetry() {
        // Same angular distance, faster decay on the easterly side.
        assert!(wind_direction_regional(135.0 + 60.0) > wind_direction_regional(135.0 - 60.0));
    }

    #[test]
    fn test_general_speed_curve() {
        assert!(close(wind_speed_general(0.0), 0.0));
        assert!(close(wind_speed_general(2.5), 0.5));
        assert!(close(wind_speed_general(5.0), 1.0));
        assert!(close(wind_speed_general(25.0), 1.0));
        assert!(close(wind_speed_general(42.5), 0.5));
        assert!(close(wind_speed_general(60.0), 0.0));
        assert!(close(wind_speed_general(90.0), 0.0));
    }

    #[test]
    fn test_regional_speed_curve() {
        assert!(close(wind_speed_regional(0.5), 0.2));
        assert!(close(wind_speed_regional(1.0), 0.2));
        assert!(close(wind_speed_regional(6.5), 0.6));
        assert!(close(wind_speed_regional(12.0), 1.0));
        assert!(close(wind_speed_regional(38.0), 1.0));
        assert!(close(wind_speed_regional(44.0), 0.65));
        assert!(close(wind_speed_regional(50.0), 0.3));
        assert!(close(wind_speed_regional(59.0), 0.0));
        assert!(close(wind_speed_regional(80.0), 0.0));
    }

    #[test]
    fn test_precipitation_visibility_temperature() {
        assert!(close(precipitation(0.0), 1.0));
        assert!(close(precipitation(2.5), 0.5));
        assert!(close(precipitation(10.0), 0.0));
        assert!(close(visibility(5_000.0), 0.5));
        assert!(close(visibility(40_000.0), 1.0));
        assert!(close(temperature(8.0), 1.0));
        assert!(close(temperature(20.0), 1.0));
        assert!(close(temperature(1.5), 0.5));
        assert!(close(temperature(-10.0), 0.0));
        assert!(close(temperature(27.5), 0.5));
        assert!(close(temperature(40.0), 0.0));
    }

    #[test]
    fn test_extended_factors() {
        assert!(close(pressure(995.0), 0.0));
        assert!(close(pressure(1010.0), 0.5));
        assert!(close(pressure(1040.0), 1.0));
        assert!(close(boundary_layer_height(750.0), 0.5));
        assert!(close(boundary_layer_height(3000.0), 1.0));
        assert!(close(cape(0.0), 0.2));
        assert!(close(cape(250.0), 0.65));
        assert!(close(cape(500.0), 0.9));
        assert!(close(cape(1500.0), 0.4));
        assert!(close(cape(1800.0), 0.2));
        assert!(close(cape(2250.0), 0.0));
        assert!(close(cape(4000.0), 0.0));
    }
}

/// Comfort index (0..=100) for a set of current conditions.
///
/// Three distance-from-ideal sub-scores — 22°C, 45% relative humidity,
/// 3 m/s wind — each clamped to 0..100 before weighting so a single extreme
/// input cannot push the composite out of range. Temperature carries the
/// most weight, then humidity, then wind.
pub fn comfort_index(temp_c: f64, humidity: f64, wind_speed: f64) -> u8 {
    // Every 1°C away from 22 costs 3 points.
    let temp_score = (100.0 - (temp_c - 22.0).abs() * 3.0).clamp(0.0, 100.0);

    // Every 1% away from 45 costs 1.5 points.
    let humidity_score = (100.0 - (humidity - 45.0).abs() * 1.5).clamp(0.0, 100.0);

    // Every 1 m/s away from 3 costs 12 points; dead calm and gales both hurt.
    let wind_score = (100.0 - (wind_speed - 3.0).abs() * 12.0).clamp(0.0, 100.0);

    let weighted = temp_score * 0.5 + humidity_score * 0.3 + wind_score * 0.2;

    weighted.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_conditions_score_full_marks() {
        assert_eq!(comfort_index(22.0, 45.0, 3.0), 100);
    }

    #[test]
    fn comfortable_beats_uncomfortable() {
        let comfortable = comfort_index(22.0, 45.0, 3.0);
        let uncomfortable = comfort_index(40.0, 90.0, 0.0);

        assert!(comfortable > uncomfortable);
    }

    #[test]
    fn score_stays_in_range_for_extreme_inputs() {
        let temps = [-80.0, -10.0, 0.0, 22.0, 50.0, 1000.0];
        let humidities = [-20.0, 0.0, 45.0, 100.0, 500.0];
        let winds = [-5.0, 0.0, 3.0, 40.0, 300.0];

        for &t in &temps {
            for &h in &humidities {
                for &w in &winds {
                    let score = comfort_index(t, h, w);
                    assert!(score <= 100, "({t}, {h}, {w}) scored {score}");
                }
            }
        }
    }

    #[test]
    fn hostile_everything_bottoms_out_at_zero() {
        assert_eq!(comfort_index(-100.0, 200.0, 500.0), 0);
    }

    #[test]
    fn sub_scores_weight_as_documented() {
        // Only wind off-ideal: wind score 64, so 50 + 30 + 0.2 * 64 = 92.8.
        assert_eq!(comfort_index(22.0, 45.0, 0.0), 93);

        // Only temperature off-ideal: temp score 76, so 38 + 30 + 20 = 88.
        assert_eq!(comfort_index(30.0, 45.0, 3.0), 88);
    }
}

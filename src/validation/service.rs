//! Pure checks over the seven measurements.

use crate::inference::Measurements;

use super::domain::{plausible, Advisory, FIELD_RANGES};

/// Issues for physically implausible inputs. An empty list means the
/// measurements may be sent to the predictor.
pub fn check_plausibility(m: &Measurements) -> Vec<String> {
    let mut issues = Vec::new();

    if m.temperature < plausible::TEMPERATURE_MIN || m.temperature > plausible::TEMPERATURE_MAX {
        issues.push(format!(
            "Temperature {}°C is outside the plausible range {}–{}°C.",
            m.temperature,
            plausible::TEMPERATURE_MIN,
            plausible::TEMPERATURE_MAX
        ));
    }
    if m.ph < plausible::PH_MIN || m.ph > plausible::PH_MAX {
        issues.push(format!(
            "Soil pH {} is outside the plausible range {}–{}.",
            m.ph,
            plausible::PH_MIN,
            plausible::PH_MAX
        ));
    }
    if m.rainfall < plausible::RAINFALL_MIN || m.rainfall > plausible::RAINFALL_MAX {
        issues.push(format!(
            "Rainfall {} mm is outside the plausible range {}–{} mm.",
            m.rainfall,
            plausible::RAINFALL_MIN,
            plausible::RAINFALL_MAX
        ));
    }
    for (name, value) in [
        ("Nitrogen", m.nitrogen),
        ("Phosphorus", m.phosphorus),
        ("Potassium", m.potassium),
    ] {
        if value < plausible::NUTRIENT_MIN {
            issues.push(format!(
                "{name} {value} kg/ha is below the minimum of {} kg/ha.",
                plausible::NUTRIENT_MIN
            ));
        }
    }
    if m.area < plausible::AREA_MIN {
        issues.push(format!(
            "Area {} ha is below the minimum of {} ha.",
            m.area,
            plausible::AREA_MIN
        ));
    }

    issues
}

/// Recommended-range hints. Never blocks a prediction.
pub fn advisories(m: &Measurements) -> Vec<Advisory> {
    FIELD_RANGES
        .iter()
        .zip(m.as_array())
        .filter_map(|(range, value)| {
            let message = if value < range.recommended_low {
                range.below
            } else if value > range.recommended_high {
                range.above
            } else {
                return None;
            };
            Some(Advisory {
                field: range.field,
                severity: range.severity,
                message,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::domain::{Field, Severity};

    fn nominal() -> Measurements {
        Measurements {
            nitrogen: 70.0,
            phosphorus: 40.0,
            potassium: 40.0,
            ph: 6.5,
            rainfall: 700.0,
            temperature: 26.0,
            area: 1000.0,
        }
    }

    #[test]
    fn nominal_input_is_plausible() {
        assert!(check_plausibility(&nominal()).is_empty());
        assert!(advisories(&nominal()).is_empty());
    }

    #[test]
    fn cold_input_reports_only_temperature() {
        let issues = check_plausibility(&Measurements {
            temperature: 5.0,
            ..nominal()
        });
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Temperature"));
    }

    #[test]
    fn bounds_are_inclusive() {
        let edge = Measurements {
            temperature: 45.0,
            ph: 4.5,
            rainfall: 2500.0,
            nitrogen: 5.0,
            phosphorus: 5.0,
            potassium: 5.0,
            area: 0.1,
        };
        assert!(check_plausibility(&edge).is_empty());
    }

    #[test]
    fn every_violation_is_listed() {
        let bad = Measurements {
            nitrogen: 0.0,
            phosphorus: 1.0,
            potassium: 2.0,
            ph: 10.0,
            rainfall: 10.0,
            temperature: 50.0,
            area: 0.0,
        };
        assert_eq!(check_plausibility(&bad).len(), 7);
    }

    #[test]
    fn advisories_pick_the_side() {
        let hints = advisories(&Measurements {
            nitrogen: 10.0,
            ph: 8.0,
            area: 20_000.0,
            ..nominal()
        });
        assert_eq!(hints.len(), 3);
        assert_eq!(hints[0].field, Field::Nitrogen);
        assert!(hints[0].message.contains("too low"));
        assert_eq!(hints[1].field, Field::Ph);
        assert!(hints[1].message.contains("alkaline"));
        assert_eq!(hints[2].field, Field::Area);
        assert_eq!(hints[2].severity, Severity::Info);
    }
}

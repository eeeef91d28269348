//! IV drip rate in drops or microdrops per minute.

use crate::fields::is_positive;
use crate::rounding::round_half_up;
use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, FieldValue, Recordable};
use serde::{Deserialize, Serialize};

/// Unit the infusion time was entered in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[default]
    Hours,
    Minutes,
}

impl TimeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
        }
    }
}

/// IV administration set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    /// Macrodrop set, 20 gtt/mL
    #[default]
    Macro,
    /// Microdrop set, 60 µgtt/mL
    Micro,
}

impl Equipment {
    pub fn as_str(self) -> &'static str {
        match self {
            Equipment::Macro => "macro",
            Equipment::Micro => "micro",
        }
    }

    pub fn drops_per_ml(self) -> u32 {
        match self {
            Equipment::Macro => 20,
            Equipment::Micro => 60,
        }
    }

    pub fn rate_unit(self) -> &'static str {
        match self {
            Equipment::Macro => "gtt/min",
            Equipment::Micro => "µgtt/min",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DripInput {
    pub volume_ml: f64,
    pub time: f64,
    pub time_unit: TimeUnit,
    pub equipment: Equipment,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DripRate {
    pub input: DripInput,
    /// Drops (macro) or microdrops (micro) per minute, one decimal
    pub rate: f64,
}

impl DripRate {
    pub fn unit(&self) -> &'static str {
        self.input.equipment.rate_unit()
    }
}

/// Drip rate for a volume over a time
///
/// Macro: `volume / (3 × hours)`; micro: `volume / hours`.
pub fn calculate(input: &DripInput) -> Option<DripRate> {
    if !is_positive(input.volume_ml) || !is_positive(input.time) {
        return None;
    }

    let hours = match input.time_unit {
        TimeUnit::Hours => input.time,
        TimeUnit::Minutes => input.time / 60.0,
    };

    let rate = match input.equipment {
        Equipment::Macro => input.volume_ml / (3.0 * hours),
        Equipment::Micro => input.volume_ml / hours,
    };

    Some(DripRate {
        input: *input,
        rate: round_half_up(rate, 1),
    })
}

impl Recordable for DripRate {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::Drip
    }

    fn inputs(&self) -> CalculationInput {
        input_fields([
            ("volume", FieldValue::from(self.input.volume_ml)),
            ("time", self.input.time.into()),
            ("timeUnit", self.input.time_unit.as_str().into()),
            ("equipmentType", self.input.equipment.as_str().into()),
        ])
    }

    fn result(&self) -> CalculationResult {
        CalculationResult::Scalar(format!("{} {}", self.rate, self.unit()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(volume_ml: f64, time: f64, time_unit: TimeUnit, equipment: Equipment) -> DripInput {
        DripInput {
            volume_ml,
            time,
            time_unit,
            equipment,
        }
    }

    #[test]
    fn test_macro_drip_in_hours() {
        let rate = calculate(&input(500.0, 8.0, TimeUnit::Hours, Equipment::Macro)).unwrap();
        assert_eq!(rate.rate, 20.8);
        assert_eq!(rate.unit(), "gtt/min");
    }

    #[test]
    fn test_micro_drip_in_hours() {
        let rate = calculate(&input(500.0, 8.0, TimeUnit::Hours, Equipment::Micro)).unwrap();
        assert_eq!(rate.rate, 62.5);
        assert_eq!(rate.unit(), "µgtt/min");
    }

    #[test]
    fn test_minutes_are_converted_to_hours() {
        let rate = calculate(&input(100.0, 120.0, TimeUnit::Minutes, Equipment::Macro)).unwrap();
        assert_eq!(rate.rate, 16.7);

        let rate = calculate(&input(100.0, 30.0, TimeUnit::Minutes, Equipment::Micro)).unwrap();
        assert_eq!(rate.rate, 200.0);
    }

    #[test]
    fn test_matches_formula_for_many_inputs() {
        for volume in [50.0, 125.0, 250.0, 1000.0, 1500.0] {
            for hours in [0.5, 1.0, 6.0, 12.0, 24.0] {
                let macro_rate =
                    calculate(&input(volume, hours, TimeUnit::Hours, Equipment::Macro)).unwrap();
                assert_eq!(macro_rate.rate, round_half_up(volume / (3.0 * hours), 1));

                let micro_rate =
                    calculate(&input(volume, hours, TimeUnit::Hours, Equipment::Micro)).unwrap();
                assert_eq!(micro_rate.rate, round_half_up(volume / hours, 1));
            }
        }
    }

    #[test]
    fn test_rejects_non_positive_or_nan() {
        assert!(calculate(&input(0.0, 8.0, TimeUnit::Hours, Equipment::Macro)).is_none());
        assert!(calculate(&input(500.0, 0.0, TimeUnit::Hours, Equipment::Macro)).is_none());
        assert!(calculate(&input(-5.0, 8.0, TimeUnit::Hours, Equipment::Micro)).is_none());
        assert!(calculate(&input(f64::NAN, 8.0, TimeUnit::Minutes, Equipment::Micro)).is_none());
    }

    #[test]
    fn test_history_payload() {
        let rate = calculate(&input(1000.0, 12.0, TimeUnit::Hours, Equipment::Micro)).unwrap();
        let inputs = rate.inputs();
        assert_eq!(inputs["timeUnit"], FieldValue::from("hours"));
        assert_eq!(inputs["equipmentType"], FieldValue::from("micro"));
        assert_eq!(rate.result(), CalculationResult::Scalar("83.3 µgtt/min".into()));
    }
}

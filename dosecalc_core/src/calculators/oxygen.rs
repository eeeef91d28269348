//! Remaining autonomy of an oxygen cylinder.

use crate::catalog::CylinderType;
use crate::fields::is_positive;
use crate::rounding::round_to_whole;
use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, FieldValue, Recordable};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OxygenInput {
    pub cylinder: CylinderType,
    pub pressure_psi: f64,
    /// L/min
    pub flow_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OxygenDuration {
    pub input: OxygenInput,
    /// Whole minutes until empty
    pub total_minutes: u64,
    pub hours: u64,
    pub minutes: u64,
}

/// Unrounded minutes of supply, `pressure × factor / flow`
pub fn duration_minutes(input: &OxygenInput) -> Option<f64> {
    if !is_positive(input.pressure_psi) || !is_positive(input.flow_rate) {
        return None;
    }
    Some(input.pressure_psi * input.cylinder.factor / input.flow_rate)
}

pub fn calculate(input: &OxygenInput) -> Option<OxygenDuration> {
    let duration = duration_minutes(input)?;

    // The remainder is rounded on its own, so 119.6 minutes reads "1h 60min"
    Some(OxygenDuration {
        input: *input,
        total_minutes: round_to_whole(duration),
        hours: (duration / 60.0).floor() as u64,
        minutes: round_to_whole(duration % 60.0),
    })
}

impl Recordable for OxygenDuration {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::Oxygen
    }

    fn inputs(&self) -> CalculationInput {
        input_fields([
            ("cylinderType", FieldValue::from(self.input.cylinder.name)),
            ("currentPressure", self.input.pressure_psi.into()),
            ("flowRate", self.input.flow_rate.into()),
        ])
    }

    fn result(&self) -> CalculationResult {
        CalculationResult::Scalar(
            format!(
                "{}h {}min ({} minutes)",
                self.hours, self.minutes, self.total_minutes
            )
            .into(),
        )
    }
}

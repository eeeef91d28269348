//! U-100 insulin units to syringe volume.

use crate::catalog::SyringeType;
use crate::fields::is_positive;
use crate::rounding::round_half_up;
use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, FieldValue, Recordable};

/// Units per mL of U-100 insulin
pub const UNITS_PER_ML: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsulinInput {
    pub units: f64,
    pub syringe: SyringeType,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsulinDose {
    pub input: InsulinInput,
    /// mL to draw up, two decimals
    pub volume_ml: f64,
    /// The dose does not fit in the selected syringe
    pub over_capacity: bool,
    /// How full the barrel is, capped at 100
    pub fill_percentage: f64,
}

impl InsulinDose {
    /// Advisory shown next to an otherwise valid result
    pub fn warning(&self) -> Option<String> {
        self.over_capacity.then(|| {
            format!(
                "{} UI exceeds the {} UI capacity of the selected syringe",
                self.input.units,
                self.input.syringe.capacity_units().round()
            )
        })
    }
}

/// Volume of U-100 insulin for a number of units
pub fn volume_for_units(units: f64) -> Option<f64> {
    is_positive(units).then(|| units / UNITS_PER_ML)
}

/// Whether a dose is more than the syringe can hold
pub fn exceeds_capacity(units: f64, syringe: &SyringeType) -> bool {
    units > syringe.capacity_ml * UNITS_PER_ML
}

pub fn calculate(input: &InsulinInput) -> Option<InsulinDose> {
    let volume = volume_for_units(input.units)?;
    let over_capacity = exceeds_capacity(input.units, &input.syringe);
    if over_capacity {
        tracing::debug!(
            "Insulin dose of {} UI does not fit in {}",
            input.units,
            input.syringe.name
        );
    }

    Some(InsulinDose {
        input: *input,
        volume_ml: round_half_up(volume, 2),
        over_capacity,
        fill_percentage: input.syringe.fill_percentage(input.units),
    })
}

impl Recordable for InsulinDose {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::Insulin
    }

    fn inputs(&self) -> CalculationInput {
        input_fields([
            ("prescribedUnits", FieldValue::from(self.input.units)),
            ("syringeType", self.input.syringe.name.into()),
        ])
    }

    fn result(&self) -> CalculationResult {
        CalculationResult::Scalar(
            format!("{} UI = {:.2} mL", self.input.units, self.volume_ml).into(),
        )
    }
}

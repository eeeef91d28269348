//! Body mass index and Mosteller body surface area.
//!
//! Two variants share the BMI formula: the combined BMI/BSA tool and a
//! BMI-only tool. Both record under the `imc` calculator id.

use crate::fields::is_positive;
use crate::rounding::round_half_up;
use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, FieldValue, Recordable};

/// Which presentation of the calculator is in use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BmiVariant {
    BmiOnly,
    #[default]
    WithBodySurface,
}

impl BmiVariant {
    pub fn calculator_name(self) -> &'static str {
        match self {
            BmiVariant::BmiOnly => "Body Mass Index",
            BmiVariant::WithBodySurface => "BMI and Body Surface Area",
        }
    }
}

/// WHO weight bands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    ObesityI,
    ObesityII,
    ObesityIII,
}

impl BmiClass {
    /// Band for a BMI; each upper bound is exclusive
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiClass::Underweight
        } else if bmi < 25.0 {
            BmiClass::Normal
        } else if bmi < 30.0 {
            BmiClass::Overweight
        } else if bmi < 35.0 {
            BmiClass::ObesityI
        } else if bmi < 40.0 {
            BmiClass::ObesityII
        } else {
            BmiClass::ObesityIII
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiClass::Underweight => "Underweight",
            BmiClass::Normal => "Normal weight",
            BmiClass::Overweight => "Overweight",
            BmiClass::ObesityI => "Obesity class I",
            BmiClass::ObesityII => "Obesity class II",
            BmiClass::ObesityIII => "Obesity class III",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiInput {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub variant: BmiVariant,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bmi {
    pub input: BmiInput,
    /// kg/m², two decimals
    pub bmi: f64,
    pub class: BmiClass,
    /// m², two decimals; only for the BMI/BSA variant
    pub body_surface_area: Option<f64>,
}

/// Unrounded BMI, `weight / (height_m)²`
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !is_positive(weight_kg) || !is_positive(height_cm) {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// Unrounded Mosteller BSA, `sqrt(weight × height_cm / 3600)`
pub fn body_surface_area(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !is_positive(weight_kg) || !is_positive(height_cm) {
        return None;
    }
    Some((weight_kg * height_cm / 3600.0).sqrt())
}

pub fn calculate(input: &BmiInput) -> Option<Bmi> {
    let bmi = body_mass_index(input.weight_kg, input.height_cm)?;
    let bsa = match input.variant {
        BmiVariant::BmiOnly => None,
        BmiVariant::WithBodySurface => {
            body_surface_area(input.weight_kg, input.height_cm).map(|v| round_half_up(v, 2))
        }
    };

    Some(Bmi {
        input: *input,
        bmi: round_half_up(bmi, 2),
        class: BmiClass::classify(bmi),
        body_surface_area: bsa,
    })
}

impl Recordable for Bmi {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::Bmi
    }

    fn calculator_name(&self) -> String {
        self.input.variant.calculator_name().to_string()
    }

    fn inputs(&self) -> CalculationInput {
        input_fields([
            ("weight", self.input.weight_kg),
            ("height", self.input.height_cm),
        ])
    }

    fn result(&self) -> CalculationResult {
        let bmi = format!("{} kg/m² ({})", self.bmi, self.class.label());
        match self.body_surface_area {
            Some(bsa) => CalculationResult::labeled([
                ("BMI", FieldValue::from(bmi)),
                ("Body surface area", format!("{} m²", bsa).into()),
            ]),
            None => CalculationResult::labeled([("BMI", bmi)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(weight_kg: f64, height_cm: f64, variant: BmiVariant) -> BmiInput {
        BmiInput {
            weight_kg,
            height_cm,
            variant,
        }
    }

    #[test]
    fn test_reference_adult() {
        let result = calculate(&input(70.0, 175.0, BmiVariant::WithBodySurface)).unwrap();
        assert_eq!(result.bmi, 22.86);
        assert_eq!(result.class, BmiClass::Normal);
        assert_eq!(result.body_surface_area, Some(1.84));
    }

    #[test]
    fn test_bmi_only_variant_skips_bsa() {
        let result = calculate(&input(70.0, 175.0, BmiVariant::BmiOnly)).unwrap();
        assert_eq!(result.bmi, 22.86);
        assert_eq!(result.body_surface_area, None);
        assert_eq!(result.calculator_name(), "Body Mass Index");
        assert_eq!(result.result().to_string(), "BMI: 22.86 kg/m² (Normal weight)");
    }

    #[test]
    fn test_classification_bounds_are_exclusive() {
        assert_eq!(BmiClass::classify(18.49), BmiClass::Underweight);
        assert_eq!(BmiClass::classify(18.5), BmiClass::Normal);
        assert_eq!(BmiClass::classify(24.99), BmiClass::Normal);
        assert_eq!(BmiClass::classify(25.0), BmiClass::Overweight);
        assert_eq!(BmiClass::classify(30.0), BmiClass::ObesityI);
        assert_eq!(BmiClass::classify(35.0), BmiClass::ObesityII);
        assert_eq!(BmiClass::classify(39.99), BmiClass::ObesityII);
        assert_eq!(BmiClass::classify(40.0), BmiClass::ObesityIII);
    }

    #[test]
    fn test_heavy_patient() {
        let result = calculate(&input(130.0, 170.0, BmiVariant::WithBodySurface)).unwrap();
        assert_eq!(result.bmi, 44.98);
        assert_eq!(result.class, BmiClass::ObesityIII);
        assert_eq!(result.body_surface_area, Some(2.48));
    }

    #[test]
    fn test_rejects_invalid_measurements() {
        assert!(calculate(&input(0.0, 175.0, BmiVariant::BmiOnly)).is_none());
        assert!(calculate(&input(70.0, -175.0, BmiVariant::WithBodySurface)).is_none());
        assert!(body_surface_area(f64::NAN, 175.0).is_none());
    }

    #[test]
    fn test_combined_history_payload() {
        let result = calculate(&input(70.0, 175.0, BmiVariant::WithBodySurface)).unwrap();
        assert_eq!(result.calculator_name(), "BMI and Body Surface Area");
        assert_eq!(result.inputs()["height"], FieldValue::Number(175.0));
        assert_eq!(
            result.result().get("Body surface area"),
            Some(&FieldValue::from("1.84 m²"))
        );
    }
}

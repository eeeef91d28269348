//! Reconstitution of powdered medications.

use crate::catalog::{ContentUnit, MedicationPreset};
use crate::fields::is_positive;
use crate::rounding::round_half_up;
use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, FieldValue, Recordable};

#[derive(Clone, Debug, PartialEq)]
pub struct DilutionInput {
    /// Preset name, `None` when entered by hand
    pub medication: Option<String>,
    /// Drug content of the vial
    pub total_content: f64,
    pub unit: ContentUnit,
    /// Diluent added to the vial, mL
    pub dilution_volume_ml: f64,
    pub prescribed_dose: f64,
}

impl DilutionInput {
    /// Manual entry in milligrams
    pub fn manual(total_content: f64, dilution_volume_ml: f64, prescribed_dose: f64) -> Self {
        Self {
            medication: None,
            total_content,
            unit: ContentUnit::Milligrams,
            dilution_volume_ml,
            prescribed_dose,
        }
    }

    /// Content and diluent pre-filled from a preset
    pub fn from_preset(preset: &MedicationPreset, prescribed_dose: f64) -> Self {
        Self {
            medication: Some(preset.name.to_string()),
            total_content: preset.content,
            unit: preset.unit,
            dilution_volume_ml: preset.standard_dilution_ml,
            prescribed_dose,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dilution {
    pub input: DilutionInput,
    /// Content per mL after reconstitution, two decimals
    pub concentration: f64,
    /// mL to draw up for the prescribed dose, two decimals
    pub volume_to_administer_ml: f64,
}

pub fn calculate(input: &DilutionInput) -> Option<Dilution> {
    if !is_positive(input.total_content)
        || !is_positive(input.dilution_volume_ml)
        || !is_positive(input.prescribed_dose)
    {
        return None;
    }

    let concentration = input.total_content / input.dilution_volume_ml;
    let volume = input.prescribed_dose / concentration;

    Some(Dilution {
        input: input.clone(),
        concentration: round_half_up(concentration, 2),
        volume_to_administer_ml: round_half_up(volume, 2),
    })
}

impl Recordable for Dilution {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::Dilution
    }

    fn inputs(&self) -> CalculationInput {
        let medication = self.input.medication.as_deref().unwrap_or("Manual");
        input_fields([
            ("medication", FieldValue::from(medication)),
            ("totalContent", self.input.total_content.into()),
            ("dilutionVolume", self.input.dilution_volume_ml.into()),
            ("prescribedDose", self.input.prescribed_dose.into()),
        ])
    }

    fn result(&self) -> CalculationResult {
        CalculationResult::Scalar(
            format!(
                "{} mL ({} {}/mL)",
                self.volume_to_administer_ml,
                self.concentration,
                self.input.unit.symbol()
            )
            .into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_medication;

    #[test]
    fn test_manual_dilution() {
        let result = calculate(&DilutionInput::manual(1000.0, 10.0, 750.0)).unwrap();
        assert_eq!(result.concentration, 100.0);
        assert_eq!(result.volume_to_administer_ml, 7.5);
    }

    #[test]
    fn test_rounding_applies_to_final_values_only() {
        // 1000 mg in 3 mL: 333.33 mg/mL displayed, but the volume uses the exact value
        let result = calculate(&DilutionInput::manual(1000.0, 3.0, 100.0)).unwrap();
        assert_eq!(result.concentration, 333.33);
        assert_eq!(result.volume_to_administer_ml, 0.3);
    }

    #[test]
    fn test_matches_formula() {
        for (content, dilution, dose) in [(500.0, 7.0, 130.0), (2000.0, 9.0, 45.0), (80.0, 2.0, 33.0)] {
            let result = calculate(&DilutionInput::manual(content, dilution, dose)).unwrap();
            assert_eq!(result.concentration, round_half_up(content / dilution, 2));
            assert_eq!(
                result.volume_to_administer_ml,
                round_half_up(dose / (content / dilution), 2)
            );
        }
    }

    #[test]
    fn test_preset_prefills_content_and_diluent() {
        let preset = find_medication("vancomycin-500").unwrap();
        let result = calculate(&DilutionInput::from_preset(preset, 125.0)).unwrap();
        assert_eq!(result.concentration, 50.0);
        assert_eq!(result.volume_to_administer_ml, 2.5);
        assert_eq!(result.inputs()["medication"], FieldValue::from("Vancomycin 500mg"));
    }

    #[test]
    fn test_unit_preset_reports_ui() {
        let preset = find_medication("penicillin-5m").unwrap();
        let result = calculate(&DilutionInput::from_preset(preset, 2_000_000.0)).unwrap();
        assert_eq!(result.concentration, 500_000.0);
        assert_eq!(result.volume_to_administer_ml, 4.0);
        assert_eq!(
            result.result(),
            CalculationResult::Scalar("4 mL (500000 UI/mL)".into())
        );
    }

    #[test]
    fn test_rejects_missing_values() {
        assert!(calculate(&DilutionInput::manual(0.0, 10.0, 100.0)).is_none());
        assert!(calculate(&DilutionInput::manual(500.0, -1.0, 100.0)).is_none());
        assert!(calculate(&DilutionInput::manual(500.0, 10.0, f64::NAN)).is_none());
    }

    #[test]
    fn test_manual_entries_recorded_as_manual() {
        let result = calculate(&DilutionInput::manual(1000.0, 10.0, 750.0)).unwrap();
        assert_eq!(result.inputs()["medication"], FieldValue::from("Manual"));
        assert_eq!(result.result(), CalculationResult::Scalar("7.5 mL (100 mg/mL)".into()));
    }
}

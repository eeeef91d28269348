//! Weight-based unfractionated heparin bolus and infusion.

use crate::catalog::HeparinProtocol;
use crate::fields::is_positive;
use crate::rounding::{round_half_up, round_to_whole};
use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, FieldValue, Recordable};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeparinInput {
    pub weight_kg: f64,
    pub protocol: HeparinProtocol,
    /// UI/mL of the prepared solution, overriding the protocol's
    pub custom_concentration: Option<f64>,
}

impl HeparinInput {
    /// Concentration in use; `None` if a custom value was given but is not positive
    pub fn concentration(&self) -> Option<f64> {
        match self.custom_concentration {
            Some(custom) => is_positive(custom).then_some(custom),
            None => Some(self.protocol.concentration),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeparinDose {
    pub input: HeparinInput,
    pub concentration: f64,
    /// UI, whole number
    pub bolus_units: u64,
    /// mL, two decimals
    pub bolus_volume_ml: f64,
    /// UI/h, whole number
    pub infusion_units_per_hour: u64,
    /// mL/h, two decimals
    pub infusion_ml_per_hour: f64,
}

pub fn calculate(input: &HeparinInput) -> Option<HeparinDose> {
    if !is_positive(input.weight_kg) {
        return None;
    }
    let concentration = input.concentration()?;

    let bolus = input.weight_kg * input.protocol.bolus_dose;
    let infusion = input.weight_kg * input.protocol.infusion_dose;

    Some(HeparinDose {
        input: *input,
        concentration,
        bolus_units: round_to_whole(bolus),
        bolus_volume_ml: round_half_up(bolus / concentration, 2),
        infusion_units_per_hour: round_to_whole(infusion),
        infusion_ml_per_hour: round_half_up(infusion / concentration, 2),
    })
}

impl Recordable for HeparinDose {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::Heparin
    }

    fn inputs(&self) -> CalculationInput {
        input_fields([
            ("weight", FieldValue::from(self.input.weight_kg)),
            ("protocol", self.input.protocol.name.into()),
            ("concentration", self.concentration.into()),
        ])
    }

    fn result(&self) -> CalculationResult {
        CalculationResult::labeled([
            (
                "Bolus",
                format!("{} UI ({} mL)", self.bolus_units, self.bolus_volume_ml),
            ),
            (
                "Infusion",
                format!(
                    "{} UI/h ({} mL/h)",
                    self.infusion_units_per_hour, self.infusion_ml_per_hour
                ),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_heparin_protocol;

    fn input(weight_kg: f64, protocol: &str, custom_concentration: Option<f64>) -> HeparinInput {
        HeparinInput {
            weight_kg,
            protocol: *find_heparin_protocol(protocol).unwrap(),
            custom_concentration,
        }
    }

    #[test]
    fn test_standard_protocol_70kg() {
        let dose = calculate(&input(70.0, "standard", None)).unwrap();
        assert_eq!(dose.bolus_units, 5600);
        assert_eq!(dose.bolus_volume_ml, 56.0);
        assert_eq!(dose.infusion_units_per_hour, 1260);
        assert_eq!(dose.infusion_ml_per_hour, 12.6);
    }

    #[test]
    fn test_custom_concentration_overrides_protocol() {
        let dose = calculate(&input(70.0, "standard", Some(250.0))).unwrap();
        assert_eq!(dose.concentration, 250.0);
        assert_eq!(dose.bolus_units, 5600);
        assert_eq!(dose.bolus_volume_ml, 22.4);
        assert_eq!(dose.infusion_ml_per_hour, 5.04);
    }

    #[test]
    fn test_volumes_use_unrounded_units() {
        // 70.13 kg × 80 = 5610.4 UI; 5610.4 / 7 = 801.49 (5610 / 7 would give 801.43)
        let dose = calculate(&input(70.13, "standard", Some(7.0))).unwrap();
        assert_eq!(dose.bolus_units, 5610);
        assert_eq!(dose.bolus_volume_ml, 801.49);
        assert_eq!(dose.infusion_units_per_hour, 1262);
        assert_eq!(dose.infusion_ml_per_hour, 180.33);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(calculate(&input(0.0, "standard", None)).is_none());
        assert!(calculate(&input(70.0, "low", Some(0.0))).is_none());
        assert!(calculate(&input(70.0, "low", Some(-100.0))).is_none());
        assert!(calculate(&input(70.0, "low", Some(f64::NAN))).is_none());
    }

    #[test]
    fn test_history_payload() {
        let dose = calculate(&input(70.0, "low", None)).unwrap();
        assert_eq!(
            dose.result().to_string(),
            "Bolus: 4200 UI (42 mL), Infusion: 840 UI/h (8.4 mL/h)"
        );
        assert_eq!(dose.inputs()["concentration"], FieldValue::Number(100.0));
    }
}

//! Built-in calculator registry and clinical reference tables.
//!
//! The tables here are the embedded constants the calculators work from:
//! medication presets, insulin syringes, heparin protocols, oxygen cylinders
//! and the common fluid balance descriptions.

use crate::types::*;

// ============================================================================
// Calculator Registry
// ============================================================================

/// Ordered like `CalculatorKind`, so a kind's discriminant is its index.
static CALCULATORS: [CalculatorInfo; 9] = [
    CalculatorInfo {
        kind: CalculatorKind::Drip,
        name: "Drip Rate Calculator",
        short_name: "Drip Rate",
        description: "Drops or microdrops per minute for IV fluids and medications",
        category: CalculatorCategory::Essential,
    },
    CalculatorInfo {
        kind: CalculatorKind::Dilution,
        name: "Dilution Converter",
        short_name: "Dilution",
        description: "Reconstitution assistant for powdered medications",
        category: CalculatorCategory::Essential,
    },
    CalculatorInfo {
        kind: CalculatorKind::FluidBalance,
        name: "Fluid Balance",
        short_name: "Fluid Balance",
        description: "Analysis of patient fluid intake and output",
        category: CalculatorCategory::Essential,
    },
    CalculatorInfo {
        kind: CalculatorKind::Bmi,
        name: "BMI and Body Surface Area",
        short_name: "BMI/BSA",
        description: "Body mass index and body surface area for dose adjustment",
        category: CalculatorCategory::Assessment,
    },
    CalculatorInfo {
        kind: CalculatorKind::Oxygen,
        name: "O2 Cylinder Estimate",
        short_name: "O2 Cylinder",
        description: "Remaining autonomy of oxygen cylinders",
        category: CalculatorCategory::Specialized,
    },
    CalculatorInfo {
        kind: CalculatorKind::Insulin,
        name: "Insulin Converter",
        short_name: "Insulin",
        description: "Unit conversion for different syringe graduations",
        category: CalculatorCategory::Specialized,
    },
    CalculatorInfo {
        kind: CalculatorKind::Heparin,
        name: "Heparin Calculator",
        short_name: "Heparin",
        description: "Weight-based protocol bolus and infusion rates",
        category: CalculatorCategory::Specialized,
    },
    CalculatorInfo {
        kind: CalculatorKind::DueDate,
        name: "Estimated Due Date",
        short_name: "Due Date",
        description: "Due date and gestational age from the last menstrual period",
        category: CalculatorCategory::Specialized,
    },
    CalculatorInfo {
        kind: CalculatorKind::Glasgow,
        name: "Glasgow Coma Scale",
        short_name: "Glasgow",
        description: "Interactive checklist to score level of consciousness",
        category: CalculatorCategory::Assessment,
    },
];

/// All calculators in display order
pub fn calculators() -> &'static [CalculatorInfo] {
    &CALCULATORS
}

/// Registry metadata for a calculator
pub fn calculator_info(kind: CalculatorKind) -> &'static CalculatorInfo {
    &CALCULATORS[kind as usize]
}

/// Calculators belonging to a category, in display order
pub fn calculators_by_category(category: CalculatorCategory) -> Vec<&'static CalculatorInfo> {
    CALCULATORS
        .iter()
        .filter(|info| info.category == category)
        .collect()
}

// ============================================================================
// Dilution: Medication Presets
// ============================================================================

/// Unit a vial's drug content is labelled in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ContentUnit {
    #[default]
    Milligrams,
    InternationalUnits,
}

impl ContentUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            ContentUnit::Milligrams => "mg",
            ContentUnit::InternationalUnits => "UI",
        }
    }
}

/// A common powdered medication with its standard reconstitution
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MedicationPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub presentation: &'static str,
    pub content: f64,
    pub unit: ContentUnit,
    pub standard_dilution_ml: f64,
    pub final_concentration: &'static str,
}

pub static MEDICATION_PRESETS: [MedicationPreset; 6] = [
    MedicationPreset {
        id: "ampicillin-500",
        name: "Ampicillin 500mg",
        presentation: "500mg/vial",
        content: 500.0,
        unit: ContentUnit::Milligrams,
        standard_dilution_ml: 5.0,
        final_concentration: "100mg/mL",
    },
    MedicationPreset {
        id: "ampicillin-1g",
        name: "Ampicillin 1g",
        presentation: "1g/vial",
        content: 1000.0,
        unit: ContentUnit::Milligrams,
        standard_dilution_ml: 10.0,
        final_concentration: "100mg/mL",
    },
    MedicationPreset {
        id: "ceftriaxone-1g",
        name: "Ceftriaxone 1g",
        presentation: "1g/vial",
        content: 1000.0,
        unit: ContentUnit::Milligrams,
        standard_dilution_ml: 10.0,
        final_concentration: "100mg/mL",
    },
    MedicationPreset {
        id: "vancomycin-500",
        name: "Vancomycin 500mg",
        presentation: "500mg/vial",
        content: 500.0,
        unit: ContentUnit::Milligrams,
        standard_dilution_ml: 10.0,
        final_concentration: "50mg/mL",
    },
    MedicationPreset {
        id: "oxacillin-500",
        name: "Oxacillin 500mg",
        presentation: "500mg/vial",
        content: 500.0,
        unit: ContentUnit::Milligrams,
        standard_dilution_ml: 5.0,
        final_concentration: "100mg/mL",
    },
    MedicationPreset {
        id: "penicillin-5m",
        name: "Crystalline Penicillin 5,000,000UI",
        presentation: "5,000,000UI/vial",
        content: 5_000_000.0,
        unit: ContentUnit::InternationalUnits,
        standard_dilution_ml: 10.0,
        final_concentration: "500,000UI/mL",
    },
];

/// Find a medication preset by id or display name
pub fn find_medication(key: &str) -> Option<&'static MedicationPreset> {
    MEDICATION_PRESETS
        .iter()
        .find(|m| m.id.eq_ignore_ascii_case(key) || m.name.eq_ignore_ascii_case(key))
}

// ============================================================================
// Insulin: Syringe Types
// ============================================================================

/// An insulin syringe (all U-100)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyringeType {
    pub id: &'static str,
    pub name: &'static str,
    pub capacity_ml: f64,
    pub units_per_ml: f64,
    pub description: &'static str,
}

impl SyringeType {
    /// Largest dose the syringe holds, in units
    pub fn capacity_units(&self) -> f64 {
        self.capacity_ml * self.units_per_ml
    }

    /// Graduation marks printed on the barrel, in units
    ///
    /// Small syringes (30 U or less) are marked every 5 units, larger ones every 10.
    pub fn graduation_marks(&self) -> Vec<u32> {
        let capacity = self.capacity_units().round() as u32;
        let step = if capacity <= 30 { 5 } else { 10 };
        (0..=capacity).step_by(step).collect()
    }

    /// How full the barrel is for a dose, capped at 100%
    pub fn fill_percentage(&self, units: f64) -> f64 {
        ((units / self.capacity_units()) * 100.0).min(100.0)
    }
}

pub static SYRINGE_TYPES: [SyringeType; 3] = [
    SyringeType {
        id: "100",
        name: "Insulin syringe 100U (1mL)",
        capacity_ml: 1.0,
        units_per_ml: 100.0,
        description: "Standard for U-100 insulin",
    },
    SyringeType {
        id: "50",
        name: "Insulin syringe 50U (0.5mL)",
        capacity_ml: 0.5,
        units_per_ml: 100.0,
        description: "Half dose, more precise",
    },
    SyringeType {
        id: "30",
        name: "Insulin syringe 30U (0.3mL)",
        capacity_ml: 0.3,
        units_per_ml: 100.0,
        description: "Low doses, highest precision",
    },
];

/// Find a syringe by id (its capacity in units) or display name
pub fn find_syringe(key: &str) -> Option<&'static SyringeType> {
    SYRINGE_TYPES
        .iter()
        .find(|s| s.id == key.trim() || s.name.eq_ignore_ascii_case(key))
}

// ============================================================================
// Heparin: Protocols
// ============================================================================

/// A weight-based unfractionated heparin protocol
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeparinProtocol {
    pub id: &'static str,
    pub name: &'static str,
    /// UI/kg
    pub bolus_dose: f64,
    /// UI/kg/h
    pub infusion_dose: f64,
    /// UI/mL
    pub concentration: f64,
}

pub static HEPARIN_PROTOCOLS: [HeparinProtocol; 3] = [
    HeparinProtocol {
        id: "standard",
        name: "Standard protocol (VTE)",
        bolus_dose: 80.0,
        infusion_dose: 18.0,
        concentration: 100.0,
    },
    HeparinProtocol {
        id: "low",
        name: "Low intensity protocol",
        bolus_dose: 60.0,
        infusion_dose: 12.0,
        concentration: 100.0,
    },
    HeparinProtocol {
        id: "high",
        name: "High intensity protocol (ACS)",
        bolus_dose: 60.0,
        infusion_dose: 15.0,
        concentration: 100.0,
    },
];

/// Find a heparin protocol by id or display name
pub fn find_heparin_protocol(key: &str) -> Option<&'static HeparinProtocol> {
    HEPARIN_PROTOCOLS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(key) || p.name.eq_ignore_ascii_case(key))
}

// ============================================================================
// Oxygen: Cylinder Types
// ============================================================================

/// An oxygen cylinder size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderType {
    pub id: &'static str,
    pub name: &'static str,
    /// Litres of O2 when full
    pub capacity_liters: f64,
    /// Litres delivered per PSI
    pub factor: f64,
}

pub static CYLINDER_TYPES: [CylinderType; 4] = [
    CylinderType {
        id: "e",
        name: "Small portable (E)",
        capacity_liters: 660.0,
        factor: 0.28,
    },
    CylinderType {
        id: "d",
        name: "Medium portable (D)",
        capacity_liters: 350.0,
        factor: 0.16,
    },
    CylinderType {
        id: "hk",
        name: "Large (H/K)",
        capacity_liters: 6900.0,
        factor: 3.14,
    },
    CylinderType {
        id: "m",
        name: "Jumbo (M)",
        capacity_liters: 3450.0,
        factor: 1.56,
    },
];

/// Find a cylinder type by id or display name
pub fn find_cylinder(key: &str) -> Option<&'static CylinderType> {
    CYLINDER_TYPES
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(key) || c.name.eq_ignore_ascii_case(key))
}

// ============================================================================
// Fluid Balance: Common Descriptions
// ============================================================================

pub static INTAKE_PRESETS: [&str; 12] = [
    "Normal saline 0.9%",
    "Dextrose 5%",
    "Lactated Ringer's",
    "IV medication",
    "Enteral feeding",
    "Parenteral nutrition (TPN)",
    "Oral water",
    "Oral juice/tea",
    "Blood products",
    "Plasma",
    "Albumin",
    "Gastric lavage",
];

pub static OUTPUT_PRESETS: [&str; 14] = [
    "Urine",
    "Urine (indwelling catheter)",
    "Vomit",
    "Chest drain",
    "Abdominal drain",
    "Penrose drain",
    "Nasogastric tube",
    "Tracheal suction",
    "Stool",
    "Diarrhea",
    "Ostomy",
    "Bleeding",
    "Heavy sweating",
    "Surgical wound",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_kind() {
        assert_eq!(calculators().len(), CalculatorKind::ALL.len());
        for kind in CalculatorKind::ALL {
            assert_eq!(calculator_info(kind).kind, kind);
        }
    }

    #[test]
    fn test_calculators_by_category() {
        let essential: Vec<_> = calculators_by_category(CalculatorCategory::Essential)
            .iter()
            .map(|info| info.kind)
            .collect();
        assert_eq!(
            essential,
            vec![
                CalculatorKind::Drip,
                CalculatorKind::Dilution,
                CalculatorKind::FluidBalance
            ]
        );
        assert_eq!(calculators_by_category(CalculatorCategory::Assessment).len(), 2);
        assert_eq!(calculators_by_category(CalculatorCategory::Specialized).len(), 4);
    }

    #[test]
    fn test_lookups_accept_id_or_name() {
        assert_eq!(find_medication("vancomycin-500").unwrap().standard_dilution_ml, 10.0);
        assert_eq!(find_medication("Ceftriaxone 1g").unwrap().content, 1000.0);
        assert_eq!(find_syringe("50").unwrap().capacity_ml, 0.5);
        assert_eq!(find_heparin_protocol("STANDARD").unwrap().bolus_dose, 80.0);
        assert_eq!(find_cylinder("hk").unwrap().factor, 3.14);
        assert!(find_cylinder("z").is_none());
    }

    #[test]
    fn test_syringe_graduation_marks() {
        let small = find_syringe("30").unwrap();
        assert_eq!(small.graduation_marks(), vec![0, 5, 10, 15, 20, 25, 30]);

        let standard = find_syringe("100").unwrap();
        let marks = standard.graduation_marks();
        assert_eq!(marks.len(), 11);
        assert_eq!(marks.last(), Some(&100));
    }

    #[test]
    fn test_syringe_fill_percentage_caps_at_full() {
        let syringe = find_syringe("50").unwrap();
        assert_eq!(syringe.fill_percentage(25.0), 50.0);
        assert_eq!(syringe.fill_percentage(80.0), 100.0);
    }
}

//! Fluid balance: intake versus output over a shift.
//!
//! The sheet is the form state: two growable lists the user adds to and
//! removes from. A balance is available once either list has an entry.

use crate::fields::is_positive;
use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, FieldValue, Recordable};

/// One recorded intake or output
#[derive(Clone, Debug, PartialEq)]
pub struct FluidEntry {
    pub id: u32,
    pub description: String,
    pub volume_ml: f64,
}

/// Direction of the balance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalanceStatus {
    Balanced,
    Positive,
    Negative,
}

impl BalanceStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.0 {
            BalanceStatus::Positive
        } else if balance < 0.0 {
            BalanceStatus::Negative
        } else {
            BalanceStatus::Balanced
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BalanceStatus::Balanced => "Balanced",
            BalanceStatus::Positive => "Positive",
            BalanceStatus::Negative => "Negative",
        }
    }
}

/// Intake and output lists being built up
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FluidBalanceSheet {
    intakes: Vec<FluidEntry>,
    outputs: Vec<FluidEntry>,
    next_id: u32,
}

impl FluidBalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intakes(&self) -> &[FluidEntry] {
        &self.intakes
    }

    pub fn outputs(&self) -> &[FluidEntry] {
        &self.outputs
    }

    /// Add an intake; `None` if the description is blank or the volume not positive
    pub fn add_intake(&mut self, description: &str, volume_ml: f64) -> Option<u32> {
        let entry = self.new_entry(description, volume_ml)?;
        let id = entry.id;
        self.intakes.push(entry);
        Some(id)
    }

    /// Add an output; `None` if the description is blank or the volume not positive
    pub fn add_output(&mut self, description: &str, volume_ml: f64) -> Option<u32> {
        let entry = self.new_entry(description, volume_ml)?;
        let id = entry.id;
        self.outputs.push(entry);
        Some(id)
    }

    /// Remove an intake by id, returning whether it was present
    pub fn remove_intake(&mut self, id: u32) -> bool {
        remove_by_id(&mut self.intakes, id)
    }

    /// Remove an output by id, returning whether it was present
    pub fn remove_output(&mut self, id: u32) -> bool {
        remove_by_id(&mut self.outputs, id)
    }

    pub fn total_in(&self) -> f64 {
        self.intakes.iter().map(|e| e.volume_ml).sum()
    }

    pub fn total_out(&self) -> f64 {
        self.outputs.iter().map(|e| e.volume_ml).sum()
    }

    pub fn balance(&self) -> f64 {
        self.total_in() - self.total_out()
    }

    /// Whether there is anything to compute a balance from
    pub fn is_complete(&self) -> bool {
        !self.intakes.is_empty() || !self.outputs.is_empty()
    }

    pub fn clear(&mut self) {
        self.intakes.clear();
        self.outputs.clear();
    }

    fn new_entry(&mut self, description: &str, volume_ml: f64) -> Option<FluidEntry> {
        let description = description.trim();
        if description.is_empty() || !is_positive(volume_ml) {
            return None;
        }
        self.next_id += 1;
        Some(FluidEntry {
            id: self.next_id,
            description: description.to_string(),
            volume_ml,
        })
    }
}

fn remove_by_id(entries: &mut Vec<FluidEntry>, id: u32) -> bool {
    let before = entries.len();
    entries.retain(|e| e.id != id);
    entries.len() != before
}

/// Totals for a sheet at one moment
#[derive(Clone, Debug, PartialEq)]
pub struct FluidBalance {
    pub intakes: Vec<FluidEntry>,
    pub outputs: Vec<FluidEntry>,
    pub total_in: f64,
    pub total_out: f64,
    pub balance: f64,
    pub status: BalanceStatus,
}

pub fn calculate(sheet: &FluidBalanceSheet) -> Option<FluidBalance> {
    if !sheet.is_complete() {
        return None;
    }

    let balance = sheet.balance();
    Some(FluidBalance {
        intakes: sheet.intakes.clone(),
        outputs: sheet.outputs.clone(),
        total_in: sheet.total_in(),
        total_out: sheet.total_out(),
        balance,
        status: BalanceStatus::from_balance(balance),
    })
}

fn summarize(entries: &[FluidEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {}mL", e.description, e.volume_ml))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Recordable for FluidBalance {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::FluidBalance
    }

    fn inputs(&self) -> CalculationInput {
        input_fields([
            ("inputs", summarize(&self.intakes)),
            ("outputs", summarize(&self.outputs)),
        ])
    }

    fn result(&self) -> CalculationResult {
        let sign = if self.balance > 0.0 { "+" } else { "" };
        CalculationResult::labeled([
            ("Total intake", FieldValue::from(format!("{}mL", self.total_in))),
            ("Total output", format!("{}mL", self.total_out).into()),
            ("Balance", format!("{}{}mL", sign, self.balance).into()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_balance() {
        let mut sheet = FluidBalanceSheet::new();
        sheet.add_intake("Normal saline 0.9%", 1000.0).unwrap();
        sheet.add_intake("Oral water", 500.0).unwrap();
        sheet.add_output("Urine", 800.0).unwrap();

        let balance = calculate(&sheet).unwrap();
        assert_eq!(balance.total_in, 1500.0);
        assert_eq!(balance.total_out, 800.0);
        assert_eq!(balance.balance, 700.0);
        assert_eq!(balance.status, BalanceStatus::Positive);
    }

    #[test]
    fn test_negative_and_balanced_status() {
        let mut sheet = FluidBalanceSheet::new();
        sheet.add_output("Vomit", 250.0).unwrap();
        assert_eq!(calculate(&sheet).unwrap().status, BalanceStatus::Negative);

        sheet.add_intake("Dextrose 5%", 250.0).unwrap();
        let balance = calculate(&sheet).unwrap();
        assert_eq!(balance.balance, 0.0);
        assert_eq!(balance.status, BalanceStatus::Balanced);
    }

    #[test]
    fn test_add_then_remove_restores_totals() {
        let mut sheet = FluidBalanceSheet::new();
        sheet.add_intake("Plasma", 300.0).unwrap();
        sheet.add_output("Chest drain", 120.0).unwrap();
        let before = (sheet.total_in(), sheet.total_out(), sheet.balance());

        let intake = sheet.add_intake("Albumin", 100.0).unwrap();
        let output = sheet.add_output("Stool", 50.0).unwrap();
        assert!(sheet.remove_intake(intake));
        assert!(sheet.remove_output(output));

        assert_eq!((sheet.total_in(), sheet.total_out(), sheet.balance()), before);
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let mut sheet = FluidBalanceSheet::new();
        assert!(sheet.add_intake("", 100.0).is_none());
        assert!(sheet.add_intake("   ", 100.0).is_none());
        assert!(sheet.add_output("Urine", 0.0).is_none());
        assert!(sheet.add_output("Urine", -20.0).is_none());
        assert!(!sheet.is_complete());
        assert!(calculate(&sheet).is_none());
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut sheet = FluidBalanceSheet::new();
        let id = sheet.add_intake("Plasma", 300.0).unwrap();
        assert!(!sheet.remove_output(id));
        assert!(!sheet.remove_intake(id + 100));
        assert_eq!(sheet.intakes().len(), 1);
    }

    #[test]
    fn test_entry_ids_are_unique_across_lists() {
        let mut sheet = FluidBalanceSheet::new();
        let a = sheet.add_intake("Plasma", 1.0).unwrap();
        let b = sheet.add_output("Urine", 1.0).unwrap();
        let c = sheet.add_intake("Plasma", 1.0).unwrap();
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_clear_empties_both_lists() {
        let mut sheet = FluidBalanceSheet::new();
        sheet.add_intake("Plasma", 300.0).unwrap();
        sheet.add_output("Urine", 100.0).unwrap();
        sheet.clear();
        assert!(sheet.intakes().is_empty());
        assert!(sheet.outputs().is_empty());
        assert!(calculate(&sheet).is_none());
    }

    #[test]
    fn test_history_payload() {
        let mut sheet = FluidBalanceSheet::new();
        sheet.add_intake("Normal saline 0.9%", 1000.0).unwrap();
        sheet.add_output("Urine", 400.0).unwrap();
        sheet.add_output("Vomit", 100.0).unwrap();

        let balance = calculate(&sheet).unwrap();
        let inputs = balance.inputs();
        assert_eq!(inputs["inputs"], FieldValue::from("Normal saline 0.9%: 1000mL"));
        assert_eq!(inputs["outputs"], FieldValue::from("Urine: 400mL, Vomit: 100mL"));

        let result = balance.result();
        assert_eq!(result.get("Balance"), Some(&FieldValue::from("+500mL")));
        assert_eq!(result.get("Total output"), Some(&FieldValue::from("500mL")));
    }
}

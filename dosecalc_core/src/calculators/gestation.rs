//! Estimated due date and gestational age from the last menstrual period.
//!
//! Naegele's rule: the due date is 280 days after the LMP. "Today" comes
//! from a [`Clock`] so results are reproducible.

use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, Clock, FieldValue, Recordable};
use chrono::{Days, NaiveDate};

/// Length of a full-term pregnancy counted from the LMP
pub const GESTATION_DAYS: u64 = 280;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// 1st below week 14, 2nd below week 28, then 3rd
    pub fn from_weeks(weeks: i64) -> Self {
        if weeks < 14 {
            Trimester::First
        } else if weeks < 28 {
            Trimester::Second
        } else {
            Trimester::Third
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }

    pub fn ordinal(self) -> &'static str {
        match self {
            Trimester::First => "1st",
            Trimester::Second => "2nd",
            Trimester::Third => "3rd",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gestation {
    pub last_period: NaiveDate,
    pub today: NaiveDate,
    pub due_date: NaiveDate,
    pub elapsed_days: i64,
    /// Completed weeks of gestational age
    pub weeks: i64,
    /// Days past the completed weeks
    pub days: i64,
    pub trimester: Trimester,
    /// Zero or negative once the due date is reached
    pub days_remaining: i64,
    /// Fraction of the 280 days elapsed, capped at 1
    pub progress: f64,
}

impl Gestation {
    pub fn due_date_reached(&self) -> bool {
        self.days_remaining <= 0
    }
}

/// Due date by Naegele's rule
pub fn due_date(last_period: NaiveDate) -> Option<NaiveDate> {
    last_period.checked_add_days(Days::new(GESTATION_DAYS))
}

/// Gestation as of the clock's current date
pub fn calculate(last_period: NaiveDate, clock: &impl Clock) -> Option<Gestation> {
    calculate_on(last_period, clock.today())
}

/// Gestation as of a given date; `None` if the LMP is after `today`
pub fn calculate_on(last_period: NaiveDate, today: NaiveDate) -> Option<Gestation> {
    if last_period > today {
        return None;
    }

    let due_date = due_date(last_period)?;
    let elapsed_days = (today - last_period).num_days();
    let weeks = elapsed_days / 7;

    Some(Gestation {
        last_period,
        today,
        due_date,
        elapsed_days,
        weeks,
        days: elapsed_days % 7,
        trimester: Trimester::from_weeks(weeks),
        days_remaining: (due_date - today).num_days(),
        progress: (elapsed_days as f64 / GESTATION_DAYS as f64).min(1.0),
    })
}

impl Recordable for Gestation {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::DueDate
    }

    fn inputs(&self) -> CalculationInput {
        input_fields([(
            "lastPeriodDate",
            self.last_period.format("%Y-%m-%d").to_string(),
        )])
    }

    fn result(&self) -> CalculationResult {
        CalculationResult::labeled([
            (
                "Due date",
                FieldValue::from(self.due_date.format("%d/%m/%Y").to_string()),
            ),
            (
                "Gestational age",
                format!("{} weeks and {} days", self.weeks, self.days).into(),
            ),
            ("Trimester", self.trimester.ordinal().into()),
        ])
    }
}

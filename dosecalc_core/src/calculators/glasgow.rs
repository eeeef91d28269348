//! Glasgow Coma Scale.
//!
//! The assessment is filled in one category at a time. Until all three are
//! chosen there is no total, which is a normal intermediate state.

use crate::{input_fields, CalculationInput, CalculationResult, CalculatorKind, Recordable};

/// Eye opening (E), 1–4
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyeOpening {
    Spontaneous,
    ToVoice,
    ToPain,
    NoResponse,
}

impl EyeOpening {
    pub const ALL: [EyeOpening; 4] = [
        EyeOpening::Spontaneous,
        EyeOpening::ToVoice,
        EyeOpening::ToPain,
        EyeOpening::NoResponse,
    ];

    pub fn score(self) -> u8 {
        match self {
            EyeOpening::Spontaneous => 4,
            EyeOpening::ToVoice => 3,
            EyeOpening::ToPain => 2,
            EyeOpening::NoResponse => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EyeOpening::Spontaneous => "Spontaneous",
            EyeOpening::ToVoice => "To voice",
            EyeOpening::ToPain => "To pain",
            EyeOpening::NoResponse => "None",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EyeOpening::Spontaneous => "Opens eyes spontaneously",
            EyeOpening::ToVoice => "Opens eyes to verbal command",
            EyeOpening::ToPain => "Opens eyes only to painful stimulus",
            EyeOpening::NoResponse => "Does not open eyes",
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.score() == score)
    }
}

/// Verbal response (V), 1–5
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerbalResponse {
    Oriented,
    Confused,
    InappropriateWords,
    IncomprehensibleSounds,
    NoResponse,
}

impl VerbalResponse {
    pub const ALL: [VerbalResponse; 5] = [
        VerbalResponse::Oriented,
        VerbalResponse::Confused,
        VerbalResponse::InappropriateWords,
        VerbalResponse::IncomprehensibleSounds,
        VerbalResponse::NoResponse,
    ];

    pub fn score(self) -> u8 {
        match self {
            VerbalResponse::Oriented => 5,
            VerbalResponse::Confused => 4,
            VerbalResponse::InappropriateWords => 3,
            VerbalResponse::IncomprehensibleSounds => 2,
            VerbalResponse::NoResponse => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VerbalResponse::Oriented => "Oriented",
            VerbalResponse::Confused => "Confused",
            VerbalResponse::InappropriateWords => "Inappropriate words",
            VerbalResponse::IncomprehensibleSounds => "Incomprehensible sounds",
            VerbalResponse::NoResponse => "None",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VerbalResponse::Oriented => "Answers coherently",
            VerbalResponse::Confused => "Speaks, but disoriented",
            VerbalResponse::InappropriateWords => "Disconnected words",
            VerbalResponse::IncomprehensibleSounds => "Moans, sounds without words",
            VerbalResponse::NoResponse => "No verbal response",
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.score() == score)
    }
}

/// Motor response (M), 1–6
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorResponse {
    ObeysCommands,
    LocalizesPain,
    NormalFlexion,
    AbnormalFlexion,
    Extension,
    NoResponse,
}

impl MotorResponse {
    pub const ALL: [MotorResponse; 6] = [
        MotorResponse::ObeysCommands,
        MotorResponse::LocalizesPain,
        MotorResponse::NormalFlexion,
        MotorResponse::AbnormalFlexion,
        MotorResponse::Extension,
        MotorResponse::NoResponse,
    ];

    pub fn score(self) -> u8 {
        match self {
            MotorResponse::ObeysCommands => 6,
            MotorResponse::LocalizesPain => 5,
            MotorResponse::NormalFlexion => 4,
            MotorResponse::AbnormalFlexion => 3,
            MotorResponse::Extension => 2,
            MotorResponse::NoResponse => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MotorResponse::ObeysCommands => "Obeys commands",
            MotorResponse::LocalizesPain => "Localizes pain",
            MotorResponse::NormalFlexion => "Normal flexion",
            MotorResponse::AbnormalFlexion => "Abnormal flexion",
            MotorResponse::Extension => "Extension",
            MotorResponse::NoResponse => "None",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MotorResponse::ObeysCommands => "Performs requested movements",
            MotorResponse::LocalizesPain => "Moves toward the stimulus",
            MotorResponse::NormalFlexion => "Withdraws limb from the stimulus",
            MotorResponse::AbnormalFlexion => "Decorticate posture",
            MotorResponse::Extension => "Decerebrate posture",
            MotorResponse::NoResponse => "No motor response",
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.score() == score)
    }
}

/// Traumatic brain injury severity from the total
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// 13–15 mild, 9–12 moderate, 8 or less severe
    pub fn from_total(total: u8) -> Self {
        if total >= 13 {
            Severity::Mild
        } else if total >= 9 {
            Severity::Moderate
        } else {
            Severity::Severe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Mild => "Mild TBI",
            Severity::Moderate => "Moderate TBI",
            Severity::Severe => "Severe TBI",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Severity::Mild => "Mild traumatic brain injury. Patient usually alert and oriented.",
            Severity::Moderate => "Moderate traumatic brain injury. Requires intensive monitoring.",
            Severity::Severe => {
                "Severe traumatic brain injury. Coma. Intubation frequently required."
            }
        }
    }
}

/// Selections made so far
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlasgowAssessment {
    pub eye: Option<EyeOpening>,
    pub verbal: Option<VerbalResponse>,
    pub motor: Option<MotorResponse>,
}

impl GlasgowAssessment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_eye(&mut self, option: EyeOpening) {
        self.eye = Some(option);
    }

    pub fn select_verbal(&mut self, option: VerbalResponse) {
        self.verbal = Some(option);
    }

    pub fn select_motor(&mut self, option: MotorResponse) {
        self.motor = Some(option);
    }

    /// All three categories have a selection
    pub fn is_complete(&self) -> bool {
        self.eye.is_some() && self.verbal.is_some() && self.motor.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlasgowScore {
    pub eye: EyeOpening,
    pub verbal: VerbalResponse,
    pub motor: MotorResponse,
    /// 3–15
    pub total: u8,
    pub severity: Severity,
}

pub fn calculate(assessment: &GlasgowAssessment) -> Option<GlasgowScore> {
    let (eye, verbal, motor) = match (assessment.eye, assessment.verbal, assessment.motor) {
        (Some(e), Some(v), Some(m)) => (e, v, m),
        _ => return None,
    };

    let total = eye.score() + verbal.score() + motor.score();
    Some(GlasgowScore {
        eye,
        verbal,
        motor,
        total,
        severity: Severity::from_total(total),
    })
}

impl Recordable for GlasgowScore {
    fn calculator(&self) -> CalculatorKind {
        CalculatorKind::Glasgow
    }

    fn inputs(&self) -> CalculationInput {
        input_fields([
            ("Eye opening", self.eye.score()),
            ("Verbal response", self.verbal.score()),
            ("Motor response", self.motor.score()),
        ])
    }

    fn result(&self) -> CalculationResult {
        CalculationResult::Scalar(
            format!("Glasgow {} - {}", self.total, self.severity.label()).into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldValue;

    fn complete(eye: EyeOpening, verbal: VerbalResponse, motor: MotorResponse) -> GlasgowAssessment {
        GlasgowAssessment {
            eye: Some(eye),
            verbal: Some(verbal),
            motor: Some(motor),
        }
    }

    #[test]
    fn test_total_is_sum_for_every_combination() {
        for eye in EyeOpening::ALL {
            for verbal in VerbalResponse::ALL {
                for motor in MotorResponse::ALL {
                    let score = calculate(&complete(eye, verbal, motor)).unwrap();
                    let total = eye.score() + verbal.score() + motor.score();
                    assert_eq!(score.total, total);
                    assert!((3..=15).contains(&score.total));
                    assert_eq!(score.severity, Severity::from_total(total));
                }
            }
        }
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::from_total(15), Severity::Mild);
        assert_eq!(Severity::from_total(13), Severity::Mild);
        assert_eq!(Severity::from_total(12), Severity::Moderate);
        assert_eq!(Severity::from_total(9), Severity::Moderate);
        assert_eq!(Severity::from_total(8), Severity::Severe);
        assert_eq!(Severity::from_total(3), Severity::Severe);
    }

    #[test]
    fn test_incomplete_assessment_has_no_total() {
        let mut assessment = GlasgowAssessment::new();
        assert!(calculate(&assessment).is_none());

        assessment.select_eye(EyeOpening::ToPain);
        assessment.select_motor(MotorResponse::Extension);
        assert!(!assessment.is_complete());
        assert!(calculate(&assessment).is_none());

        assessment.select_verbal(VerbalResponse::IncomprehensibleSounds);
        assert!(assessment.is_complete());
        let score = calculate(&assessment).unwrap();
        assert_eq!(score.total, 6);
        assert_eq!(score.severity, Severity::Severe);

        assessment.clear();
        assert!(calculate(&assessment).is_none());
    }

    #[test]
    fn test_reselecting_replaces_choice() {
        let mut assessment = complete(
            EyeOpening::Spontaneous,
            VerbalResponse::Oriented,
            MotorResponse::ObeysCommands,
        );
        assessment.select_verbal(VerbalResponse::Confused);
        assert_eq!(calculate(&assessment).unwrap().total, 14);
    }

    #[test]
    fn test_from_score_covers_option_lists() {
        assert_eq!(EyeOpening::from_score(3), Some(EyeOpening::ToVoice));
        assert_eq!(EyeOpening::from_score(5), None);
        assert_eq!(VerbalResponse::from_score(5), Some(VerbalResponse::Oriented));
        assert_eq!(VerbalResponse::from_score(0), None);
        assert_eq!(MotorResponse::from_score(4), Some(MotorResponse::NormalFlexion));
        assert_eq!(MotorResponse::from_score(7), None);
    }

    #[test]
    fn test_history_payload() {
        let score = calculate(&complete(
            EyeOpening::ToVoice,
            VerbalResponse::Confused,
            MotorResponse::LocalizesPain,
        ))
        .unwrap();
        assert_eq!(score.result(), CalculationResult::Scalar("Glasgow 12 - Moderate TBI".into()));
        assert_eq!(score.inputs()["Motor response"], FieldValue::Number(5.0));
    }
}

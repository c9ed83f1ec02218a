//! Maps a classifier's top confidence onto the risk verdict shown in the UI.
//!
//! The underlying model is a generic image classifier, so this is a
//! prototype simulation: the score is a deterministic remapping of the first
//! prediction's probability and carries no medical meaning.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::Prediction;

pub const CLAMP_HIGH_ABOVE: i64 = 90;
pub const CLAMP_HIGH_TO: u8 = 88;
pub const CLAMP_LOW_BELOW: i64 = 5;
pub const CLAMP_LOW_TO: u8 = 12;
pub const HIGH_RISK_ABOVE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskStatus {
    High,
    Low,
}

/// Presentational class tokens for the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub bg: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub badge: &'static str,
}

const AMBER: Theme = Theme {
    bg: "bg-amber-50",
    border: "border-amber-200",
    text: "text-amber-800",
    badge: "bg-amber-100 text-amber-700 bubble-amber",
};

const EMERALD: Theme = Theme {
    bg: "bg-emerald-50",
    border: "border-emerald-200",
    text: "text-emerald-800",
    badge: "bg-emerald-100 text-emerald-700",
};

impl RiskStatus {
    pub fn from_score(score: u8) -> Self {
        if score > HIGH_RISK_ABOVE {
            RiskStatus::High
        } else {
            RiskStatus::Low
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RiskStatus::High => "Potential abnormality detected. Consult a healthcare professional.",
            RiskStatus::Low => "No immediate typical risk patterns found in this capture.",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            RiskStatus::High => "Consult a Dermatologist",
            RiskStatus::Low => "Low Risk / Benign Appearance",
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            RiskStatus::High => AMBER,
            RiskStatus::Low => EMERALD,
        }
    }

    /// Fill colour of the score bar.
    pub fn bar_class(self) -> &'static str {
        match self {
            RiskStatus::High => "bg-amber-500",
            RiskStatus::Low => "bg-emerald-500",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub score: u8,
    pub status: RiskStatus,
    pub message: &'static str,
    pub badge: &'static str,
    pub theme: Theme,
}

impl Verdict {
    fn from_score(score: u8) -> Self {
        let status = RiskStatus::from_score(score);
        Self {
            score,
            status,
            message: status.message(),
            badge: status.badge(),
            theme: status.theme(),
        }
    }

    /// CSS width of the score bar, e.g. `60%`.
    pub fn bar_width(&self) -> String {
        format!("{}%", self.score)
    }
}

/// Converts a probability into the displayed score.
///
/// The raw value is `floor(p * 100)`, taken without validating `p`. Raw
/// values above 90 become 88 and values below 5 become 12, so the result
/// always lies in `5..=90`. NaN is treated as a raw value of 0.
pub fn risk_score(probability: f64) -> u8 {
    // `as` saturates on overflow and maps NaN to 0.
    let raw = (probability * 100.0).floor() as i64;

    if raw > CLAMP_HIGH_ABOVE {
        CLAMP_HIGH_TO
    } else if raw < CLAMP_LOW_BELOW {
        CLAMP_LOW_TO
    } else {
        raw as u8
    }
}

/// Builds the verdict from the first prediction only.
///
/// Absent or empty input yields `None`, meaning no result panel is shown.
pub fn interpret(predictions: Option<&[Prediction]>) -> Option<Verdict> {
    let top = predictions?.first()?;
    Some(Verdict::from_score(risk_score(top.probability)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn single(p: f64) -> Vec<Prediction> {
        vec![Prediction::new("label", p)]
    }

    #[test]
    fn absent_or_empty_yields_nothing() {
        assert_eq!(interpret(None), None);
        assert_eq!(interpret(Some(&[][..])), None);
    }

    #[test]
    fn unclamped_scores_pass_through() {
        for p in [0.05, 0.1, 0.33, 0.5, 0.51, 0.77, 0.9] {
            let expected = (p * 100.0_f64).floor() as u8;
            let verdict = interpret(Some(single(p).as_slice())).unwrap();
            assert_eq!(verdict.score, expected, "p = {}", p);
        }
    }

    #[test]
    fn clamps_extremes() {
        assert_eq!(interpret(Some(single(0.95).as_slice())).unwrap().score, 88);
        assert_eq!(interpret(Some(single(0.02).as_slice())).unwrap().score, 12);
        assert_eq!(risk_score(1.0), 88);
        assert_eq!(risk_score(0.0), 12);
        assert_eq!(risk_score(0.91), 88);
        assert_eq!(risk_score(0.049), 12);
    }

    #[test]
    fn out_of_range_probabilities_still_clamp() {
        assert_eq!(risk_score(3.7), 88);
        assert_eq!(risk_score(-0.4), 12);
        assert_eq!(risk_score(f64::NAN), 12);
        assert_eq!(risk_score(f64::INFINITY), 88);
        assert_eq!(risk_score(f64::NEG_INFINITY), 12);
    }

    #[test]
    fn status_boundary_is_fifty() {
        assert_eq!(interpret(Some(single(0.5).as_slice())).unwrap().status, RiskStatus::Low);
        assert_eq!(interpret(Some(single(0.51).as_slice())).unwrap().status, RiskStatus::High);
        assert_eq!(RiskStatus::from_score(50), RiskStatus::Low);
        assert_eq!(RiskStatus::from_score(51), RiskStatus::High);
    }

    #[test]
    fn status_alone_decides_text_and_theme() {
        let a = interpret(Some(single(0.55).as_slice())).unwrap();
        let b = interpret(Some(single(0.89).as_slice())).unwrap();
        assert_ne!(a.score, b.score);
        assert_ne!(a.bar_width(), b.bar_width());
        assert_eq!((a.message, a.badge, a.theme), (b.message, b.badge, b.theme));

        let c = interpret(Some(single(0.2).as_slice())).unwrap();
        let d = interpret(Some(single(0.01).as_slice())).unwrap();
        assert_eq!((c.message, c.badge, c.theme), (d.message, d.badge, d.theme));
        assert_ne!(a.theme, c.theme);
    }

    #[test]
    fn only_first_prediction_counts() {
        let many = vec![
            Prediction::new("a", 0.9),
            Prediction::new("b", 0.1),
        ];
        assert_eq!(interpret(Some(many.as_slice())), interpret(Some(single(0.9).as_slice())));

        // Order is the provider's contract; a larger later value is ignored.
        let unsorted = vec![
            Prediction::new("a", 0.2),
            Prediction::new("b", 0.7),
        ];
        assert_eq!(interpret(Some(unsorted.as_slice())).unwrap().score, 20);
    }

    #[test]
    fn high_risk_scenario() {
        let verdict = interpret(Some(single(0.6).as_slice())).unwrap();
        assert_eq!(verdict.score, 60);
        assert_eq!(verdict.status, RiskStatus::High);
        assert_eq!(verdict.badge, "Consult a Dermatologist");
        assert_eq!(
            verdict.message,
            "Potential abnormality detected. Consult a healthcare professional."
        );
        assert_eq!(verdict.theme.bg, "bg-amber-50");
        assert_eq!(verdict.bar_width(), "60%");
    }

    #[test]
    fn low_risk_scenario() {
        let verdict = interpret(Some(single(0.3).as_slice())).unwrap();
        assert_eq!(verdict.score, 30);
        assert_eq!(verdict.status, RiskStatus::Low);
        assert_eq!(verdict.badge, "Low Risk / Benign Appearance");
        assert_eq!(verdict.theme.border, "border-emerald-200");
        assert_eq!(verdict.status.bar_class(), "bg-emerald-500");
    }

    #[test]
    fn status_names() {
        assert_eq!(RiskStatus::High.to_string(), "high");
        assert_eq!(RiskStatus::Low.as_ref(), "low");
        assert_eq!(RiskStatus::from_str("high").unwrap(), RiskStatus::High);
    }
}

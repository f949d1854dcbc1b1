use chrono::NaiveDate;
use serde::Serialize;

use crate::models::HealthProfile;

/// Full-term gestation in weeks
const TERM_WEEKS: i64 = 40;
const MAX_WEEK: i64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    pub fn from_week(week: u8) -> Self {
        match week {
            0..=13 => Trimester::First,
            14..=27 => Trimester::Second,
            _ => Trimester::Third,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trimester::First => "first trimester",
            Trimester::Second => "second trimester",
            Trimester::Third => "third trimester",
        }
    }
}

/// Gestational week implied by a due date, clamped to 1..=42
pub fn week_from_due_date(due_date: NaiveDate, today: NaiveDate) -> u8 {
    let days_remaining = (due_date - today).num_days();
    // Round remaining weeks up so the due week itself reads as week 40
    let weeks_remaining = days_remaining.div_euclid(7) + i64::from(days_remaining.rem_euclid(7) != 0);
    (TERM_WEEKS - weeks_remaining).clamp(1, MAX_WEEK) as u8
}

/// Current pregnancy week for a profile; the due date wins over a stored week
pub fn current_week(profile: &HealthProfile, today: NaiveDate) -> Option<u8> {
    match profile.due_date {
        Some(due) => Some(week_from_due_date(due, today)),
        None => profile.pregnancy_week,
    }
}

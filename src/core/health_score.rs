use serde::Serialize;

use crate::models::ClinicalMeasurements;

/// The eight metrics recognized by the score engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Hemoglobin,
    BloodSugar,
    Bmi,
    VitaminD,
    Calcium,
    Ferritin,
    WaterIntake,
    SleepHours,
}

/// Piecewise scoring bands for one metric.
///
/// `[low_min, normal_min)` is slightly low, `[normal_min, normal_max]` is
/// normal, `(normal_max, high_max]` is slightly high, anything else is out
/// of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBands {
    pub low_min: f64,
    pub normal_min: f64,
    pub normal_max: f64,
    pub high_max: f64,
    pub low_score: f64,
    pub high_score: f64,
    pub else_score: f64,
}

/// Where a value sits relative to its metric's bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricStatus {
    Normal,
    SlightlyLow,
    SlightlyHigh,
    OutOfRange,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Hemoglobin,
        Metric::BloodSugar,
        Metric::Bmi,
        Metric::VitaminD,
        Metric::Calcium,
        Metric::Ferritin,
        Metric::WaterIntake,
        Metric::SleepHours,
    ];

    /// JSON key used for this metric
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Hemoglobin => "hemoglobin",
            Metric::BloodSugar => "bloodSugar",
            Metric::Bmi => "bmi",
            Metric::VitaminD => "vitaminD",
            Metric::Calcium => "calcium",
            Metric::Ferritin => "ferritin",
            Metric::WaterIntake => "waterIntake",
            Metric::SleepHours => "sleepHours",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Hemoglobin => "hemoglobin (g/dL)",
            Metric::BloodSugar => "blood sugar (mg/dL)",
            Metric::Bmi => "BMI",
            Metric::VitaminD => "vitamin D (ng/mL)",
            Metric::Calcium => "calcium (mg/dL)",
            Metric::Ferritin => "serum ferritin (ng/mL)",
            Metric::WaterIntake => "water intake (L/day)",
            Metric::SleepHours => "sleep (hours/night)",
        }
    }

    /// Clinical band table. These are literal per-metric thresholds; they do
    /// not follow a common rule and must not be derived from one another.
    pub fn bands(&self) -> MetricBands {
        let (low_min, normal_min, normal_max, high_max, low_score, high_score, else_score) =
            match self {
                Metric::Hemoglobin => (10.0, 11.0, 15.0, 16.0, 0.7, 0.8, 0.3),
                Metric::BloodSugar => (60.0, 70.0, 100.0, 120.0, 0.7, 0.8, 0.3),
                Metric::Bmi => (17.0, 18.5, 24.9, 29.9, 0.6, 0.7, 0.4),
                Metric::VitaminD => (20.0, 30.0, 100.0, 150.0, 0.6, 0.8, 0.3),
                Metric::Calcium => (8.0, 8.5, 10.5, 11.0, 0.6, 0.8, 0.3),
                Metric::Ferritin => (10.0, 15.0, 150.0, 200.0, 0.6, 0.8, 0.3),
                Metric::WaterIntake => (2.0, 2.5, 3.5, 4.0, 0.7, 0.9, 0.4),
                Metric::SleepHours => (6.0, 7.0, 9.0, 10.0, 0.7, 0.8, 0.4),
            };

        MetricBands {
            low_min,
            normal_min,
            normal_max,
            high_max,
            low_score,
            high_score,
            else_score,
        }
    }

    /// Read this metric from a measurement set
    pub fn value_in(&self, m: &ClinicalMeasurements) -> Option<f64> {
        match self {
            Metric::Hemoglobin => m.hemoglobin,
            Metric::BloodSugar => m.blood_sugar,
            Metric::Bmi => m.bmi,
            Metric::VitaminD => m.vitamin_d,
            Metric::Calcium => m.calcium,
            Metric::Ferritin => m.ferritin,
            Metric::WaterIntake => m.water_intake,
            Metric::SleepHours => m.sleep_hours,
        }
    }
}

impl MetricBands {
    /// Classify a value. NaN and infinities fall through to `OutOfRange`.
    #[inline]
    pub fn classify(&self, value: f64) -> MetricStatus {
        if value >= self.normal_min && value <= self.normal_max {
            MetricStatus::Normal
        } else if value >= self.low_min && value < self.normal_min {
            MetricStatus::SlightlyLow
        } else if value > self.normal_max && value <= self.high_max {
            MetricStatus::SlightlyHigh
        } else {
            MetricStatus::OutOfRange
        }
    }

    /// Sub-score in [0, 1] for a value
    #[inline]
    pub fn sub_score(&self, value: f64) -> f64 {
        match self.classify(value) {
            MetricStatus::Normal => 1.0,
            MetricStatus::SlightlyLow => self.low_score,
            MetricStatus::SlightlyHigh => self.high_score,
            MetricStatus::OutOfRange => self.else_score,
        }
    }
}

/// Per-metric scoring detail
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScore {
    pub metric: Metric,
    pub value: f64,
    pub status: MetricStatus,
    pub sub_score: f64,
}

/// Overall score with the per-metric detail behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreBreakdown {
    pub score: u8,
    pub metrics: Vec<MetricScore>,
}

impl HealthScoreBreakdown {
    /// Metrics that are not in their normal band
    pub fn flagged(&self) -> impl Iterator<Item = &MetricScore> {
        self.metrics
            .iter()
            .filter(|m| m.status != MetricStatus::Normal)
    }
}

/// Score every present metric of a measurement set.
///
/// The overall score is `round(100 * mean(sub_scores))` using `f64::round`
/// (half away from zero). An empty set scores 0.
pub fn score_breakdown(measurements: &ClinicalMeasurements) -> HealthScoreBreakdown {
    let metrics: Vec<MetricScore> = Metric::ALL
        .iter()
        .filter_map(|metric| {
            let value = metric.value_in(measurements)?;
            let bands = metric.bands();
            Some(MetricScore {
                metric: *metric,
                value,
                status: bands.classify(value),
                sub_score: bands.sub_score(value),
            })
        })
        .collect();

    if metrics.is_empty() {
        return HealthScoreBreakdown { score: 0, metrics };
    }

    let total: f64 = metrics.iter().map(|m| m.sub_score).sum();
    let mean = total / metrics.len() as f64;
    let score = (mean * 100.0).round().clamp(0.0, 100.0) as u8;

    HealthScoreBreakdown { score, metrics }
}

/// Compute the 0-100 wellness score for a measurement set
pub fn compute_health_score(measurements: &ClinicalMeasurements) -> u8 {
    score_breakdown(measurements).score
}

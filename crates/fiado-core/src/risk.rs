//! # Collections Risk Classifier
//!
//! Reads a sale's ledger state plus wall-clock time and assigns the
//! collections urgency bucket driving reminders and collector dashboards.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  classify(sale, payments, today)                                    │
//! │                                                                     │
//! │  not credit, or balance 0 ──────────────► None (excluded)           │
//! │                                                                     │
//! │  anchor = last payment date, else sale date                         │
//! │  project anchor + 7/15/30 days repeatedly                           │
//! │       │                                                             │
//! │       ├── a due date has passed:                                    │
//! │       │     days_late = today - most recent passed due              │
//! │       │     days_late > threshold ────► ALTO                        │
//! │       │     days_late in 1..=threshold ► BAJO                       │
//! │       │     days_late == 0 (due today) ► POR_VENCER                 │
//! │       │                                                             │
//! │       └── next due still ahead:                                     │
//! │             due within warning window ► POR_VENCER                  │
//! │             otherwise ────────────────► None (not worth a call yet) │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timezone Discipline
//! All date arithmetic runs on calendar days normalized to midnight in
//! one fixed business timezone. Comparing raw UTC timestamps shifts
//! sales across day boundaries (a 23:30 sale in Mexico City is "tomorrow"
//! in UTC) and produces off-by-one days-late values, so every instant is
//! converted before any day math happens.
//!
//! The classifier is a pure function of `(sale, payments, today, config)`;
//! it never mutates the sale and is safe to call repeatedly and
//! concurrently.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::types::{Payment, Sale, Severity};

// =============================================================================
// Configuration
// =============================================================================

/// Classifier thresholds and the business timezone.
///
/// Per-deployment settings; the payment interval itself lives on each
/// sale (weekly/biweekly/monthly schedules coexist in one ledger).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Business timezone all instants are normalized into.
    pub timezone: Tz,

    /// Upper bound of the BAJO bucket: `days_late` beyond this is ALTO.
    pub low_threshold_days: i64,

    /// Look-ahead window for POR_VENCER: a sale due within this many
    /// days (and not yet late) is flagged as upcoming.
    pub warning_window_days: i64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            timezone: chrono_tz::America::Mexico_City,
            low_threshold_days: 7,
            warning_window_days: 3,
        }
    }
}

// =============================================================================
// Assessment
// =============================================================================

/// The classifier's verdict for one sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub severity: Severity,
    /// Calendar days since the most recent missed due date; 0 when the
    /// sale is merely approaching its next due date.
    pub days_late: i64,
    /// The due date the assessment is anchored on: the most recent
    /// missed one when late, the first upcoming one otherwise.
    pub next_due_date: NaiveDate,
}

// =============================================================================
// Classification
// =============================================================================

/// Classifies one sale, or returns `None` when it needs no collections
/// attention (cash sale, settled, or not due soon).
///
/// ## Due-Date Projection
/// The projection anchors on the most recent payment when one exists,
/// otherwise on the sale date - a payment resets the collection clock.
/// Due dates then land every `sale.interval.days()` calendar days after
/// the anchor. Deterministic: identical `(sale, payments, today)` inputs
/// always produce identical output.
pub fn classify(
    sale: &Sale,
    payments: &[Payment],
    today: DateTime<Utc>,
    config: &RiskConfig,
) -> Option<RiskAssessment> {
    if !sale.is_open_credit() {
        return None;
    }

    let anchor = business_date(anchor_instant(sale, payments), config.timezone);
    let today = business_date(today, config.timezone);
    let interval = sale.interval.days();

    let first_due = add_days(anchor, interval);

    if first_due > today {
        // Nothing due yet. Flag only when the first due date is close.
        let days_until = (first_due - today).num_days();
        if days_until <= config.warning_window_days {
            return Some(RiskAssessment {
                severity: Severity::PorVencer,
                days_late: 0,
                next_due_date: first_due,
            });
        }
        return None;
    }

    // At least one due date has passed. The most recent one is
    // anchor + k * interval with k = elapsed / interval (>= 1 here).
    let elapsed = (today - anchor).num_days();
    let last_due = add_days(anchor, (elapsed / interval) * interval);
    let days_late = (today - last_due).num_days();

    let severity = if days_late > config.low_threshold_days {
        Severity::Alto
    } else if days_late > 0 {
        Severity::Bajo
    } else {
        // Due exactly today: not yet late, squarely inside the window.
        Severity::PorVencer
    };

    Some(RiskAssessment {
        severity,
        days_late,
        next_due_date: last_due,
    })
}

/// The instant due-date projection anchors on: the latest payment when
/// the ledger has any, otherwise the sale's creation.
fn anchor_instant(sale: &Sale, payments: &[Payment]) -> DateTime<Utc> {
    payments
        .iter()
        .map(|p| p.paid_at)
        .max()
        .unwrap_or(sale.sale_date)
}

/// Normalizes an instant to its calendar date in the business timezone.
fn business_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    // Interval math stays far below NaiveDate's range; checked_add only
    // fails at the year-262143 boundary.
    date.checked_add_days(Days::new(days as u64))
        .expect("date arithmetic within calendar range")
}

// =============================================================================
// Unit Tests
// =============================================================================

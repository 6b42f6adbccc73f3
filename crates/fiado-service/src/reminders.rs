//! # Overdue Reminders
//!
//! The collections worklist: every open credit sale that needs
//! attention today, ordered so collectors work the most urgent
//! accounts first.
//!
//! ## Ordering
//! ```text
//! ALTO        days_late 23     ← most urgent first
//! ALTO        days_late 9
//! BAJO        days_late 5
//! BAJO        days_late 1
//! POR_VENCER  due in 2 days   ← heads-up, not yet late
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ServiceResult;
use crate::CreditService;
use fiado_core::{risk, Severity};

/// One row of the collections worklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueReminder {
    pub sale_id: String,
    pub client_id: String,
    pub client_name: String,
    pub phone: String,
    pub balance_due_cents: i64,
    pub installment_cents: i64,
    pub severity: Severity,
    pub days_late: i64,
    pub next_due_date: NaiveDate,
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Alto => 0,
        Severity::Bajo => 1,
        Severity::PorVencer => 2,
    }
}

impl CreditService {
    /// Builds the collections worklist as of now.
    pub async fn overdue_reminders(&self) -> ServiceResult<Vec<OverdueReminder>> {
        self.overdue_reminders_at(Utc::now()).await
    }

    /// Builds the collections worklist as of a given instant.
    ///
    /// Scans all open credit sales, classifies each against its payment
    /// history, and drops the ones needing no attention. Deterministic
    /// for a fixed `today`.
    pub async fn overdue_reminders_at(
        &self,
        today: DateTime<Utc>,
    ) -> ServiceResult<Vec<OverdueReminder>> {
        let sales = self.db().sales().list_open_credit().await?;
        debug!(open_sales = sales.len(), "overdue_reminders scan");

        let mut reminders = Vec::new();

        for sale in sales {
            let payments = self.db().sales().get_payments(&sale.id).await?;

            let Some(assessment) = risk::classify(&sale, &payments, today, self.risk_config())
            else {
                continue;
            };

            // The sale row carries a valid client_id by FK; a missing
            // client here would be referential corruption.
            let client = self
                .db()
                .clients()
                .get_by_id(&sale.client_id)
                .await?
                .ok_or_else(|| {
                    crate::ServiceError::not_found("Client", &sale.client_id)
                })?;

            reminders.push(OverdueReminder {
                sale_id: sale.id,
                client_id: client.id.clone(),
                client_name: client.full_name(),
                phone: client.phone.clone(),
                balance_due_cents: sale.balance_due_cents,
                installment_cents: sale.installment_cents,
                severity: assessment.severity,
                days_late: assessment.days_late,
                next_due_date: assessment.next_due_date,
            });
        }

        // Most urgent first: severity bucket, then how late within it.
        reminders.sort_by(|a, b| {
            severity_rank(a.severity)
                .cmp(&severity_rank(b.severity))
                .then(b.days_late.cmp(&a.days_late))
        });

        Ok(reminders)
    }
}

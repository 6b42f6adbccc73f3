//! # Reports
//!
//! Aggregate views over the ledger: the open-credit portfolio and the
//! whole-ledger summary. All sums are computed in SQL from the source
//! tables, not from cached counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ServiceResult;
use crate::CreditService;
use fiado_core::{risk, PaymentInterval, Severity};

/// One open credit sale in the portfolio view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCredit {
    pub sale_id: String,
    pub client_id: String,
    pub client_name: String,
    pub sale_date: DateTime<Utc>,
    pub total_cents: i64,
    pub balance_due_cents: i64,
    pub installment_cents: i64,
    pub interval: PaymentInterval,
    /// None when current and not due soon.
    pub severity: Option<Severity>,
    pub days_late: i64,
}

/// Whole-ledger summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub sale_count: i64,
    pub credit_sale_count: i64,
    pub paid_off_count: i64,
    /// Gross value of everything sold, cash and credit.
    pub sales_total_cents: i64,
    /// Down payments plus all registered payments.
    pub collected_cents: i64,
    /// Sum of open balances, the money still on the street.
    pub outstanding_cents: i64,
}

impl CreditService {
    /// Lists all open credit sales with the client and current risk
    /// classification, as of now.
    pub async fn pending_credits(&self) -> ServiceResult<Vec<PendingCredit>> {
        self.pending_credits_at(Utc::now()).await
    }

    /// Lists all open credit sales as of a given instant.
    pub async fn pending_credits_at(
        &self,
        today: DateTime<Utc>,
    ) -> ServiceResult<Vec<PendingCredit>> {
        let sales = self.db().sales().list_open_credit().await?;
        debug!(open_sales = sales.len(), "pending_credits");

        let mut credits = Vec::with_capacity(sales.len());
        for sale in sales {
            let payments = self.db().sales().get_payments(&sale.id).await?;
            let assessment = risk::classify(&sale, &payments, today, self.risk_config());

            let client = self
                .db()
                .clients()
                .get_by_id(&sale.client_id)
                .await?
                .ok_or_else(|| crate::ServiceError::not_found("Client", &sale.client_id))?;

            credits.push(PendingCredit {
                sale_id: sale.id,
                client_id: client.id.clone(),
                client_name: client.full_name(),
                sale_date: sale.sale_date,
                total_cents: sale.total_cents,
                balance_due_cents: sale.balance_due_cents,
                installment_cents: sale.installment_cents,
                interval: sale.interval,
                severity: assessment.map(|a| a.severity),
                days_late: assessment.map(|a| a.days_late).unwrap_or(0),
            });
        }

        Ok(credits)
    }

    /// Computes the whole-ledger summary.
    pub async fn summary(&self) -> ServiceResult<LedgerSummary> {
        let (sale_count, credit_sale_count, paid_off_count) = self.db().sales().counts().await?;
        let sales_total_cents = self.db().sales().sales_total().await?;
        let outstanding_cents = self.db().sales().outstanding_total().await?;
        let collected_cents =
            self.db().sales().collected_total().await? + self.db().sales().down_payment_total().await?;

        Ok(LedgerSummary {
            sale_count,
            credit_sale_count,
            paid_off_count,
            sales_total_cents,
            collected_cents,
            outstanding_cents,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{mx_noon, seed_client, seed_credit_sale, seed_product, service};
    use crate::{NewSale, NewSaleItem};
    use fiado_core::PaymentMethod;

    #[tokio::test]
    async fn test_pending_credits_lists_open_sales_with_severity() {
        let svc = service().await;
        let client = seed_client(&svc, "Paty", "5554000001").await;

        let late = seed_credit_sale(
            &svc,
            &client.id,
            90_000,
            9_000,
            PaymentInterval::Weekly,
            mx_noon(2024, 1, 1),
        )
        .await;
        let settled = seed_credit_sale(
            &svc,
            &client.id,
            20_000,
            2_000,
            PaymentInterval::Weekly,
            mx_noon(2024, 1, 1),
        )
        .await;
        svc.register_payment(&settled.id, 20_000, PaymentMethod::Cash, None)
            .await
            .unwrap();

        let credits = svc.pending_credits_at(mx_noon(2024, 1, 20)).await.unwrap();

        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].sale_id, late.id);
        assert_eq!(credits[0].severity, Some(Severity::Bajo));
        assert_eq!(credits[0].days_late, 5);
        assert_eq!(credits[0].client_name, client.full_name());
    }

    #[tokio::test]
    async fn test_summary_aggregates_ledger() {
        let svc = service().await;
        let client = seed_client(&svc, "Memo", "5554000002").await;
        let tv = seed_product(&svc, "Television", 1_000_000, 2).await;
        let soap = seed_product(&svc, "Soap", 2_500, 10).await;

        // One credit sale: down 100_000, balance 900_000.
        let credit = svc
            .create_sale(NewSale {
                client_id: client.id.clone(),
                items: vec![NewSaleItem {
                    product_id: tv.id,
                    quantity: 1,
                }],
                is_credit: true,
                down_payment_cents: None,
                down_payment_bps: Some(1000),
                number_of_payments: Some(17),
                interval: None,
                notes: None,
            })
            .await
            .unwrap();
        // One cash sale.
        svc.create_sale(NewSale {
            client_id: client.id.clone(),
            items: vec![NewSaleItem {
                product_id: soap.id,
                quantity: 2,
            }],
            is_credit: false,
            down_payment_cents: None,
            down_payment_bps: None,
            number_of_payments: None,
            interval: None,
            notes: None,
        })
        .await
        .unwrap();
        // One installment collected.
        svc.register_payment(&credit.sale_id, 52_941, PaymentMethod::Cash, None)
            .await
            .unwrap();

        let summary = svc.summary().await.unwrap();

        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.credit_sale_count, 1);
        assert_eq!(summary.paid_off_count, 1);
        assert_eq!(summary.sales_total_cents, 1_005_000);
        assert_eq!(summary.collected_cents, 100_000 + 52_941);
        assert_eq!(summary.outstanding_cents, 900_000 - 52_941);
    }
}

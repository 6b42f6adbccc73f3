//! # Client Statements
//!
//! A statement is the full account view for one client: every sale
//! with its items, its chronological payment ledger, and - for open
//! credit sales - the current risk assessment.
//!
//! Balances in a statement are not trusted from the sale row alone;
//! each sale is cross-checked against its ledger with
//! [`fiado_core::ledger::balance_matches_ledger`] so a drifted
//! aggregate shows up as an explicit flag instead of a silently wrong
//! number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use crate::CreditService;
use fiado_core::{ledger, risk, Client, Payment, RiskAssessment, Sale, SaleItem};

/// One sale inside a statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementSale {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    pub payments: Vec<Payment>,
    pub total_paid_cents: i64,
    /// None for cash and settled sales.
    pub assessment: Option<RiskAssessment>,
    /// False indicates the stored balance disagrees with the ledger.
    pub ledger_consistent: bool,
}

/// Full account view for one client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStatement {
    pub client: Client,
    pub sales: Vec<StatementSale>,
    /// Sum of open balances across all of the client's credit sales.
    pub total_balance_cents: i64,
}

impl CreditService {
    /// Builds a client's statement as of now.
    pub async fn client_statement(&self, client_id: &str) -> ServiceResult<ClientStatement> {
        self.client_statement_at(client_id, Utc::now()).await
    }

    /// Builds a client's statement as of a given instant.
    ///
    /// Risk assessments are computed against `today`, which makes the
    /// output reproducible for a fixed input date.
    pub async fn client_statement_at(
        &self,
        client_id: &str,
        today: DateTime<Utc>,
    ) -> ServiceResult<ClientStatement> {
        debug!(client_id = %client_id, "client_statement");

        let client = self
            .db()
            .clients()
            .get_by_id(client_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Client", client_id))?;

        let sales = self.db().sales().list_by_client(client_id).await?;

        let mut statement_sales = Vec::with_capacity(sales.len());
        let mut total_balance = 0i64;

        for sale in sales {
            let items = self.db().sales().get_items(&sale.id).await?;
            let payments = self.db().sales().get_payments(&sale.id).await?;

            let assessment = risk::classify(&sale, &payments, today, self.risk_config());
            let ledger_consistent = ledger::balance_matches_ledger(&sale, &payments);
            let total_paid_cents = ledger::total_paid(&payments).cents();

            total_balance += sale.balance_due_cents;

            statement_sales.push(StatementSale {
                sale,
                items,
                payments,
                total_paid_cents,
                assessment,
                ledger_consistent,
            });
        }

        Ok(ClientStatement {
            client,
            sales: statement_sales,
            total_balance_cents: total_balance,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{mx_noon, seed_client, seed_credit_sale, service};
    use crate::ErrorCode;
    use fiado_core::{PaymentInterval, PaymentMethod, Severity};

    #[tokio::test]
    async fn test_statement_reflects_ledger() {
        let svc = service().await;
        let client = seed_client(&svc, "Elena", "5552000001").await;
        let sale = seed_credit_sale(
            &svc,
            &client.id,
            90_000,
            9_000,
            PaymentInterval::Weekly,
            Utc::now(),
        )
        .await;

        svc.register_payment(&sale.id, 9_000, PaymentMethod::Cash, None)
            .await
            .unwrap();
        svc.register_payment(&sale.id, 9_000, PaymentMethod::Transfer, None)
            .await
            .unwrap();

        let statement = svc.client_statement(&client.id).await.unwrap();

        assert_eq!(statement.sales.len(), 1);
        let entry = &statement.sales[0];
        assert_eq!(entry.payments.len(), 2);
        assert_eq!(entry.total_paid_cents, 18_000);
        assert_eq!(entry.sale.balance_due_cents, 72_000);
        assert!(entry.ledger_consistent);
        assert_eq!(statement.total_balance_cents, 72_000);
    }

    #[tokio::test]
    async fn test_statement_payments_in_chronological_order() {
        let svc = service().await;
        let client = seed_client(&svc, "Oscar", "5552000002").await;
        let sale = seed_credit_sale(
            &svc,
            &client.id,
            30_000,
            3_000,
            PaymentInterval::Weekly,
            Utc::now(),
        )
        .await;

        for _ in 0..3 {
            svc.register_payment(&sale.id, 3_000, PaymentMethod::Cash, None)
                .await
                .unwrap();
        }

        let statement = svc.client_statement(&client.id).await.unwrap();
        let payments = &statement.sales[0].payments;
        assert!(payments.windows(2).all(|w| w[0].paid_at <= w[1].paid_at));
    }

    #[tokio::test]
    async fn test_statement_includes_risk_assessment_for_late_sale() {
        let svc = service().await;
        let client = seed_client(&svc, "Irma", "5552000003").await;
        seed_credit_sale(
            &svc,
            &client.id,
            90_000,
            9_000,
            PaymentInterval::Weekly,
            mx_noon(2024, 1, 1),
        )
        .await;

        let statement = svc
            .client_statement_at(&client.id, mx_noon(2024, 1, 20))
            .await
            .unwrap();

        let assessment = statement.sales[0].assessment.expect("late sale is assessed");
        assert_eq!(assessment.severity, Severity::Bajo);
        assert_eq!(assessment.days_late, 5);
    }

    #[tokio::test]
    async fn test_statement_for_unknown_client() {
        let svc = service().await;
        let err = svc.client_statement("ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

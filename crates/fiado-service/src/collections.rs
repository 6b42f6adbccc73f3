//! # Collection Logging
//!
//! Collectors record the outcome of every contact attempt. The log is
//! append-only history; it never mutates the sale or the ledger.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::CreditService;
use fiado_core::{CollectionLog, CollectionResult};
use fiado_db::repository::collection::generate_collection_log_id;

/// A new contact-attempt record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollectionLog {
    pub sale_id: String,
    pub collector_id: String,
    pub result: CollectionResult,
    #[serde(default)]
    pub notes: Option<String>,
    /// When the collector plans to follow up.
    #[serde(default)]
    pub next_action_date: Option<NaiveDate>,
}

impl CreditService {
    /// Appends a contact attempt to a sale's collection history.
    pub async fn log_collection(&self, request: NewCollectionLog) -> ServiceResult<CollectionLog> {
        // Reject logs against nonexistent sales up front; the FK would
        // catch it anyway but with a worse message.
        self.db()
            .sales()
            .get_by_id(&request.sale_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", &request.sale_id))?;

        let log = CollectionLog {
            id: generate_collection_log_id(),
            sale_id: request.sale_id,
            collector_id: request.collector_id,
            result: request.result,
            notes: request.notes,
            next_action_date: request.next_action_date,
            created_at: Utc::now(),
        };

        self.db().collection_logs().insert(&log).await?;

        info!(sale_id = %log.sale_id, result = ?log.result, "Collection attempt logged");

        Ok(log)
    }

    /// A sale's collection history, newest first.
    pub async fn collection_history(&self, sale_id: &str) -> ServiceResult<Vec<CollectionLog>> {
        self.db()
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

        Ok(self.db().collection_logs().list_by_sale(sale_id).await?)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_client, seed_credit_sale, service};
    use crate::ErrorCode;
    use fiado_core::PaymentInterval;

    #[tokio::test]
    async fn test_log_and_list_history() {
        let svc = service().await;
        let client = seed_client(&svc, "Vero", "5555000001").await;
        let sale = seed_credit_sale(
            &svc,
            &client.id,
            50_000,
            5_000,
            PaymentInterval::Weekly,
            Utc::now(),
        )
        .await;

        svc.log_collection(NewCollectionLog {
            sale_id: sale.id.clone(),
            collector_id: "collector-1".to_string(),
            result: CollectionResult::NoAnswer,
            notes: None,
            next_action_date: None,
        })
        .await
        .unwrap();
        svc.log_collection(NewCollectionLog {
            sale_id: sale.id.clone(),
            collector_id: "collector-1".to_string(),
            result: CollectionResult::Promise,
            notes: Some("Pays Friday".to_string()),
            next_action_date: NaiveDate::from_ymd_opt(2024, 6, 7),
        })
        .await
        .unwrap();

        let history = svc.collection_history(&sale.id).await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest first.
        assert_eq!(history[0].result, CollectionResult::Promise);
        assert_eq!(history[1].result, CollectionResult::NoAnswer);

        // The ledger is untouched by collection activity.
        let sale = svc.db().sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(sale.balance_due_cents, 50_000);
    }

    #[tokio::test]
    async fn test_log_against_unknown_sale_rejected() {
        let svc = service().await;
        let err = svc
            .log_collection(NewCollectionLog {
                sale_id: "ghost".to_string(),
                collector_id: "collector-1".to_string(),
                result: CollectionResult::Located,
                notes: None,
                next_action_date: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

//! Shared fixtures for service tests: an in-memory database plus
//! seeding helpers for clients, products and backdated credit sales.

use chrono::{DateTime, TimeZone, Utc};

use crate::CreditService;
use fiado_core::{Client, PaymentInterval, Sale, SaleStatus};
use fiado_db::repository::{client::generate_client_id, sale::generate_sale_id};
use fiado_db::{Database, DbConfig};

pub(crate) async fn service() -> CreditService {
    init_test_logging();
    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database");
    CreditService::new(db)
}

/// Honors RUST_LOG when tests run with --nocapture. try_init because
/// every test calls through here and only the first install wins.
fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) async fn seed_client(svc: &CreditService, name: &str, phone: &str) -> Client {
    let now = Utc::now();
    let client = Client {
        id: generate_client_id(),
        first_name: name.to_string(),
        last_name: "Tester".to_string(),
        phone: phone.to_string(),
        email: None,
        address: None,
        city: None,
        id_document: None,
        portal_password_hash: None,
        created_at: now,
        updated_at: now,
    };
    svc.db().clients().insert(&client).await.expect("seed client");
    client
}

pub(crate) async fn seed_product(
    svc: &CreditService,
    name: &str,
    price_cents: i64,
    stock: i64,
) -> fiado_core::Product {
    let now = Utc::now();
    let product = fiado_core::Product {
        id: fiado_db::repository::product::generate_product_id(),
        name: name.to_string(),
        description: None,
        price_cents,
        stock,
        category: None,
        brand: None,
        image_url: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    svc.db()
        .products()
        .insert(&product)
        .await
        .expect("seed product");
    product
}

/// Inserts a credit sale directly, bypassing stock, so tests can
/// control the sale date and schedule exactly.
pub(crate) async fn seed_credit_sale(
    svc: &CreditService,
    client_id: &str,
    balance_cents: i64,
    installment_cents: i64,
    interval: PaymentInterval,
    sale_date: DateTime<Utc>,
) -> Sale {
    let sale = Sale {
        id: generate_sale_id(),
        client_id: client_id.to_string(),
        status: SaleStatus::Active,
        total_cents: balance_cents,
        is_credit: true,
        down_payment_cents: 0,
        balance_due_cents: balance_cents,
        number_of_payments: 17,
        installment_cents,
        interest_rate_bps: 1000,
        interval,
        notes: None,
        sale_date,
        updated_at: sale_date,
        version: 0,
    };
    svc.db()
        .sales()
        .create_sale(&sale, &[])
        .await
        .expect("seed sale");
    sale
}

/// Noon in Mexico City on the given date, as a UTC instant. Keeps
/// date-sensitive tests away from the midnight timezone boundary.
pub(crate) fn mx_noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 18, 0, 0)
        .single()
        .expect("valid timestamp")
}

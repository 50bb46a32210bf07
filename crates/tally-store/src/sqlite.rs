//! # SQLite Backend
//!
//! The durable `BillStore` backend: connection pool, embedded
//! migrations, and transactional bill creation.
//!
//! ## Bill Creation Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 create_bill (one transaction)                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. SELECT each line's product           (ProductNotFound → abort)    │
//! │    2. price_bill(lines, tender)            (stock/payment → abort)      │
//! │    3. UPDATE products                                                   │
//! │         SET available_stock = available_stock - qty                     │
//! │         WHERE code = ? AND available_stock >= qty                       │
//! │       └── guarded decrement: a concurrent writer can never push        │
//! │           stock below zero, even outside this transaction's reads      │
//! │    4. INSERT bill                                                       │
//! │    5. INSERT bill_items (request order preserved via position)          │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure before COMMIT rolls the whole bill back - no partial      │
//! │  stock decrements, ever.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers, writers don't block readers
//! - Better crash recovery

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use tally_core::{
    price_bill, Bill, BillItem, CoreError, LineItem, NewProduct, Product, TenderBreakdown,
};

use crate::error::{StoreError, StoreResult};
use crate::store::BillStore;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/tally/tally.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a small billing backend)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let store = SqliteStore::new(DbConfig::in_memory()).await?;
    /// // Store is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Migrations
// =============================================================================

/// Embedded migrations from the `migrations/sqlite` directory.
///
/// The `sqlx::migrate!()` macro embeds all SQL files from the
/// specified directory into the binary at compile time. No runtime
/// file access needed.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

// =============================================================================
// Row Types
// =============================================================================
// Private row structs keep sqlx out of tally-core: the domain types
// stay I/O-free and rows convert at the boundary.

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    code: String,
    name: String,
    price_cents: i64,
    available_stock: i64,
    tax_rate_bps: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            code: row.code,
            name: row.name,
            price_cents: row.price_cents,
            available_stock: row.available_stock,
            tax_rate_bps: row.tax_rate_bps,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: i64,
    customer_email: String,
    total_cents: i64,
    tax_cents: i64,
    final_cents: i64,
    tender_json: Option<String>,
    tendered_cents: Option<i64>,
    change_cents: Option<i64>,
    created_at: DateTime<Utc>,
}

impl BillRow {
    fn into_bill(self, items: Vec<BillItem>) -> StoreResult<Bill> {
        let tender = match self.tender_json {
            Some(json) => Some(
                serde_json::from_str::<TenderBreakdown>(&json)
                    .map_err(|e| StoreError::Internal(format!("bad tender JSON: {e}")))?,
            ),
            None => None,
        };

        Ok(Bill {
            id: self.id,
            customer_email: self.customer_email,
            items,
            total_cents: self.total_cents,
            tax_cents: self.tax_cents,
            final_cents: self.final_cents,
            tender,
            tendered_cents: self.tendered_cents,
            change_cents: self.change_cents,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BillItemRow {
    product_code: String,
    product_name: String,
    unit_price_cents: i64,
    quantity: i64,
    line_total_cents: i64,
    tax_cents: i64,
}

impl From<BillItemRow> for BillItem {
    fn from(row: BillItemRow) -> Self {
        BillItem {
            product_code: row.product_code,
            product_name: row.product_name,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
            line_total_cents: row.line_total_cents,
            tax_cents: row.tax_cents,
        }
    }
}

// =============================================================================
// SqliteStore
// =============================================================================

/// Durable `BillStore` backend over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new store.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // sqlite://path?mode=rwc creates the file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            // WAL mode: readers don't block writers and vice versa
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose the
            // last transaction on power loss
            .synchronous(SqliteSynchronous::Normal)
            // SQLite ships with foreign keys off for backwards compat
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let store = SqliteStore { pool };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Runs database migrations.
    ///
    /// Idempotent: applied migrations are tracked in `_sqlx_migrations`.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running database migrations");
        MIGRATOR.run(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by the trait. Prefer the
    /// `BillStore` methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Fetches items for one bill, in request order.
    async fn items_for_bill(&self, bill_id: i64) -> StoreResult<Vec<BillItem>> {
        let rows: Vec<BillItemRow> = sqlx::query_as(
            r#"
            SELECT product_code, product_name, unit_price_cents,
                   quantity, line_total_cents, tax_cents
            FROM bill_items
            WHERE bill_id = ?1
            ORDER BY position
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BillItem::from).collect())
    }

    /// Assembles full bills from bill rows.
    async fn assemble_bills(&self, rows: Vec<BillRow>) -> StoreResult<Vec<Bill>> {
        let mut bills = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for_bill(row.id).await?;
            bills.push(row.into_bill(items)?);
        }
        Ok(bills)
    }
}

#[async_trait]
impl BillStore for SqliteStore {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        debug!(code = %product.code, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                code, name, price_cents, available_stock, tax_rate_bps,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.available_stock)
        .bind(product.tax_rate_bps)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            // The only UNIQUE column on products is code
            StoreError::UniqueViolation { .. } => StoreError::duplicate("code", &product.code),
            other => other,
        })?;

        Ok(Product {
            id: result.last_insert_rowid(),
            code: product.code,
            name: product.name,
            price_cents: product.price_cents,
            available_stock: product.available_stock,
            tax_rate_bps: product.tax_rate_bps,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_product(&self, code: &str) -> StoreResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, code, name, price_cents, available_stock, tax_rate_bps,
                   created_at, updated_at
            FROM products
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn list_products(&self, skip: u32, limit: u32) -> StoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, code, name, price_cents, available_stock, tax_rate_bps,
                   created_at, updated_at
            FROM products
            ORDER BY id
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create_bill(
        &self,
        customer_email: &str,
        lines: &[LineItem],
        tender: Option<TenderBreakdown>,
    ) -> StoreResult<Bill> {
        debug!(customer = %customer_email, lines = lines.len(), "Creating bill");

        let mut tx = self.pool.begin().await?;

        // Resolve each line's product inside the transaction so the
        // stock we validate against is the stock we decrement.
        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            let row: Option<ProductRow> = sqlx::query_as(
                r#"
                SELECT id, code, name, price_cents, available_stock, tax_rate_bps,
                       created_at, updated_at
                FROM products
                WHERE code = ?1
                "#,
            )
            .bind(&line.code)
            .fetch_optional(&mut *tx)
            .await?;

            let product = row
                .map(Product::from)
                .ok_or_else(|| CoreError::ProductNotFound(line.code.clone()))?;
            resolved.push((product, line.quantity));
        }

        let priced = price_bill(&resolved, tender.as_ref())?;

        // Guarded decrements: the WHERE clause re-checks stock so a
        // concurrent writer can never drive it negative. Rolling back
        // on a miss discards every earlier decrement of this bill.
        let now = Utc::now();
        for (code, quantity) in priced.stock_decrements() {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET available_stock = available_stock - ?2, updated_at = ?3
                WHERE code = ?1 AND available_stock >= ?2
                "#,
            )
            .bind(code)
            .bind(quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT available_stock FROM products WHERE code = ?1")
                        .bind(code)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(CoreError::InsufficientStock {
                    code: code.to_string(),
                    available,
                    requested: quantity,
                }
                .into());
            }
        }

        let tender_json = match &tender {
            Some(breakdown) => Some(
                serde_json::to_string(breakdown)
                    .map_err(|e| StoreError::Internal(e.to_string()))?,
            ),
            None => None,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO bills (
                customer_email, total_cents, tax_cents, final_cents,
                tender_json, tendered_cents, change_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(customer_email)
        .bind(priced.total_cents)
        .bind(priced.tax_cents)
        .bind(priced.final_cents)
        .bind(&tender_json)
        .bind(priced.tendered_cents)
        .bind(priced.change_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let bill_id = result.last_insert_rowid();

        for (position, item) in priced.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO bill_items (
                    bill_id, product_code, product_name, unit_price_cents,
                    quantity, line_total_cents, tax_cents, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(bill_id)
            .bind(&item.product_code)
            .bind(&item.product_name)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .bind(item.tax_cents)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            bill_id,
            customer = %customer_email,
            final_cents = priced.final_cents,
            "Bill created"
        );

        Ok(Bill {
            id: bill_id,
            customer_email: customer_email.to_string(),
            items: priced.items,
            total_cents: priced.total_cents,
            tax_cents: priced.tax_cents,
            final_cents: priced.final_cents,
            tender,
            tendered_cents: priced.tendered_cents,
            change_cents: priced.change_cents,
            created_at: now,
        })
    }

    async fn list_bills(&self, skip: u32, limit: u32) -> StoreResult<Vec<Bill>> {
        let rows: Vec<BillRow> = sqlx::query_as(
            r#"
            SELECT id, customer_email, total_cents, tax_cents, final_cents,
                   tender_json, tendered_cents, change_cents, created_at
            FROM bills
            ORDER BY id
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        self.assemble_bills(rows).await
    }

    async fn bills_for_customer(&self, customer_email: &str) -> StoreResult<Vec<Bill>> {
        let rows: Vec<BillRow> = sqlx::query_as(
            r#"
            SELECT id, customer_email, total_cents, tax_cents, final_cents,
                   tender_json, tendered_cents, change_cents, created_at
            FROM bills
            WHERE customer_email = ?1
            ORDER BY id
            "#,
        )
        .bind(customer_email)
        .fetch_all(&self.pool)
        .await?;

        self.assemble_bills(rows).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
// End-to-end contract tests live in tests/store_contract.rs and run
// against both backends; these cover SQLite-specific plumbing.

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = SqliteStore::new(DbConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let store = SqliteStore::new(DbConfig::in_memory()).await.unwrap();
        store.run_migrations().await.unwrap();
        store.run_migrations().await.unwrap();
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }

    #[tokio::test]
    async fn test_duplicate_code_maps_to_unique_violation() {
        let store = SqliteStore::new(DbConfig::in_memory()).await.unwrap();

        let product = NewProduct {
            code: "LP001".to_string(),
            name: "Laptop".to_string(),
            price_cents: 45000,
            available_stock: 10,
            tax_rate_bps: 1800,
        };

        store.insert_product(product.clone()).await.unwrap();
        let err = store.insert_product(product).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }
}

//! Postgres-backed document storage.
//!
//! Quoters and sales are stored whole, as JSONB documents, one table per
//! collection. A partial update merges the patch into the stored document
//! (`document || patch`), so only the keys present in the patch change.
//!
//! ## Error Mapping
//!
//! | SQLx Error | Read path | Write path |
//! |------------|-----------|------------|
//! | Database, code `2201B` (invalid regex) | `InvalidQuery` | `Insertion` |
//! | Database (other) | `Connection` | `Insertion` |
//! | Io / Tls / PoolTimedOut / PoolClosed | `Connection` | `Insertion` |
//! | Decode / other | `Connection` | `Insertion` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use quotedesk_core::QuoterId;
use quotedesk_quoting::{Quoter, QuoterPatch, Sale};

use super::{QuoterFilter, QuoterStore, StorageError};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS quoters (
        id UUID PRIMARY KEY,
        document JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sales (
        id UUID PRIMARY KEY,
        quoter_id UUID NOT NULL,
        document JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS sales_quoter_id_idx ON sales (quoter_id)",
];

#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write,
}

/// Postgres-backed [`QuoterStore`].
///
/// Uses the SQLx connection pool, which is `Send + Sync` and handles
/// connection management; the store itself is cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresQuoterStore {
    pool: Arc<PgPool>,
}

impl PostgresQuoterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Create the collections if they do not exist yet (idempotent).
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", Access::Write, e))?;
        }
        Ok(())
    }
}

fn filter_clause(filter: &QuoterFilter) -> &'static str {
    match filter {
        QuoterFilter::All => "TRUE",
        QuoterFilter::NameMatches(_) => "document->>'name' ~* ('(?w)' || $1)",
        QuoterFilter::DescriptionMatches(_) => "document->>'description' ~* ('(?w)' || $1)",
        QuoterFilter::ServiceNameMatches(_) => {
            "EXISTS (SELECT 1 FROM jsonb_array_elements(document->'services') AS s WHERE s->>'name' ~* ('(?w)' || $1))"
        }
        QuoterFilter::ProductTitleMatches(_) => {
            "EXISTS (SELECT 1 FROM jsonb_array_elements(document->'products') AS p WHERE p->>'title' ~* ('(?w)' || $1))"
        }
    }
}

fn map_sqlx_error(operation: &str, access: Access, err: sqlx::Error) -> StorageError {
    let msg = format!("{operation}: {err}");
    match (access, &err) {
        (Access::Write, _) => StorageError::Insertion(msg),
        (Access::Read, sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("2201B") => {
            StorageError::InvalidQuery(msg)
        }
        (Access::Read, _) => StorageError::Connection(msg),
    }
}

#[async_trait]
impl QuoterStore for PostgresQuoterStore {
    #[instrument(skip(self), fields(quoter_id = %id), err)]
    async fn find_quoter(&self, id: QuoterId) -> Result<Quoter, StorageError> {
        let row = sqlx::query("SELECT document FROM quoters WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_quoter", Access::Read, e))?
            .ok_or(StorageError::NotFound)?;

        let Json(quoter): Json<Quoter> = row
            .try_get("document")
            .map_err(|e| map_sqlx_error("find_quoter", Access::Read, e))?;
        Ok(quoter)
    }

    #[instrument(skip(self), err)]
    async fn find_quoters(&self, filter: QuoterFilter, limit: usize) -> Result<Vec<Quoter>, StorageError> {
        let sql = format!(
            "SELECT document FROM quoters WHERE {} ORDER BY created_at, id LIMIT {}",
            filter_clause(&filter),
            limit
        );

        let mut query = sqlx::query(&sql);
        if let Some(pattern) = filter.pattern() {
            query = query.bind(pattern);
        }

        let rows = query
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_quoters", Access::Read, e))?;

        rows.into_iter()
            .map(|row| {
                row.try_get::<Json<Quoter>, _>("document")
                    .map(|Json(q)| q)
                    .map_err(|e| map_sqlx_error("find_quoters", Access::Read, e))
            })
            .collect()
    }

    #[instrument(skip(self, quoter), fields(quoter_id = %quoter.id), err)]
    async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, StorageError> {
        sqlx::query("INSERT INTO quoters (id, document) VALUES ($1, $2)")
            .bind(quoter.id.as_uuid())
            .bind(Json(&quoter))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_quoter", Access::Write, e))?;
        Ok(quoter)
    }

    #[instrument(skip(self, patch), fields(quoter_id = %id), err)]
    async fn update_quoter(&self, id: QuoterId, patch: &QuoterPatch) -> Result<(), StorageError> {
        sqlx::query("UPDATE quoters SET document = document || $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(Json(patch))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_quoter", Access::Write, e))?;
        Ok(())
    }

    #[instrument(skip(self, sale), fields(sale_id = %sale.id, quoter_id = %sale.quoter_id), err)]
    async fn insert_sale(&self, sale: Sale) -> Result<Sale, StorageError> {
        sqlx::query("INSERT INTO sales (id, quoter_id, document) VALUES ($1, $2, $3)")
            .bind(sale.id.as_uuid())
            .bind(sale.quoter_id.as_uuid())
            .bind(Json(&sale))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_sale", Access::Write, e))?;
        Ok(sale)
    }

    #[instrument(skip(self), fields(quoter_id = %quoter_id), err)]
    async fn find_sale_by_quoter(&self, quoter_id: QuoterId) -> Result<Option<Sale>, StorageError> {
        let row = sqlx::query("SELECT document FROM sales WHERE quoter_id = $1 LIMIT 1")
            .bind(quoter_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_sale_by_quoter", Access::Read, e))?;

        row.map(|row| {
            row.try_get::<Json<Sale>, _>("document")
                .map(|Json(s)| s)
                .map_err(|e| map_sqlx_error("find_sale_by_quoter", Access::Read, e))
        })
        .transpose()
    }
}

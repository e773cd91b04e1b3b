// ABOUTME: Proposal storage layer using SQLite
// ABOUTME: Upsert-style saves keyed by id, pipeline listing, and status updates

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::{StorageError, StorageResult};
use offerkit_core::{
    generate_proposal_id, total_value, ProposalStatus, SaveProposalInput, StoredProposal,
};

pub struct ProposalStorage {
    pool: SqlitePool,
}

impl ProposalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a proposal: an absent id inserts a new record with status Draft,
    /// a present id updates the existing record in place.
    ///
    /// `total_value` is recomputed from the line items on every save; items
    /// deserialized without a total contribute zero. The operation is atomic
    /// at record granularity; concurrent saves are last-write-wins.
    pub async fn save_proposal(&self, input: &SaveProposalInput) -> StorageResult<StoredProposal> {
        let line_items_json = serde_json::to_string(&input.line_items)?;
        let total = total_value(&input.line_items);
        let now = Utc::now().to_rfc3339();

        match &input.id {
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE proposals
                    SET customer_name = ?, proposal_text = ?, line_items = ?,
                        total_value = ?, updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&input.customer_name)
                .bind(&input.proposal_text)
                .bind(&line_items_json)
                .bind(total)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(StorageError::NotFound(id.clone()));
                }

                debug!("Updated proposal {}", id);
                self.get_proposal(id).await
            }
            None => {
                let id = generate_proposal_id();
                sqlx::query(
                    r#"
                    INSERT INTO proposals (
                        id, customer_name, proposal_text, line_items,
                        total_value, status, created_at, updated_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&id)
                .bind(&input.customer_name)
                .bind(&input.proposal_text)
                .bind(&line_items_json)
                .bind(total)
                .bind(ProposalStatus::Draft.as_str())
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await?;

                info!("Inserted proposal {} for {}", id, input.customer_name);
                self.get_proposal(&id).await
            }
        }
    }

    /// Fetch one proposal by id.
    pub async fn get_proposal(&self, id: &str) -> StorageResult<StoredProposal> {
        let row = sqlx::query("SELECT * FROM proposals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        row_to_proposal(&row)
    }

    /// List all proposals, newest first, for the pipeline board.
    pub async fn list_proposals(&self) -> StorageResult<Vec<StoredProposal>> {
        let rows = sqlx::query("SELECT * FROM proposals ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_proposal).collect()
    }

    /// Move a proposal to a new pipeline status.
    pub async fn update_status(&self, id: &str, status: ProposalStatus) -> StorageResult<()> {
        let result = sqlx::query("UPDATE proposals SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        info!("Moved proposal {} to status {}", id, status);
        Ok(())
    }
}

/// Convert a database row to a StoredProposal
fn row_to_proposal(row: &SqliteRow) -> StorageResult<StoredProposal> {
    let line_items_json: String = row.try_get("line_items")?;
    let status_str: String = row.try_get("status")?;
    let created_at_str: String = row.try_get("created_at")?;
    let updated_at_str: String = row.try_get("updated_at")?;

    let status = ProposalStatus::parse(&status_str)
        .ok_or_else(|| StorageError::InvalidData(format!("unknown status '{}'", status_str)))?;

    Ok(StoredProposal {
        id: row.try_get("id")?,
        customer_name: row.try_get("customer_name")?,
        proposal_text: row.try_get("proposal_text")?,
        line_items: serde_json::from_str(&line_items_json)?,
        total_value: row.try_get("total_value")?,
        status,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidData(format!("bad timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use offerkit_core::LineItem;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let migration_sql = include_str!("../migrations/001_initial_schema.sql");
        sqlx::raw_sql(migration_sql)
            .execute(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn line_items() -> Vec<LineItem> {
        vec![
            LineItem {
                description: "Install network socket".to_string(),
                quantity: 10.0,
                unit: "piece".to_string(),
                unit_price: 85.0,
                total_price: 850.0,
            },
            LineItem {
                description: "Run Cat-7 cable".to_string(),
                quantity: 150.0,
                unit: "m".to_string(),
                unit_price: 3.5,
                total_price: 525.0,
            },
        ]
    }

    fn save_input(id: Option<String>) -> SaveProposalInput {
        SaveProposalInput {
            id,
            customer_name: "Meier GmbH".to_string(),
            proposal_text: "Dear customer...".to_string(),
            line_items: line_items(),
        }
    }

    async fn count_proposals(pool: &SqlitePool) -> i64 {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM proposals")
            .fetch_one(pool)
            .await
            .unwrap();
        count.0
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_draft_status() {
        let pool = setup_test_db().await;
        let storage = ProposalStorage::new(pool);

        let stored = storage.save_proposal(&save_input(None)).await.unwrap();

        assert!(!stored.id.is_empty());
        assert_eq!(stored.status, ProposalStatus::Draft);
        assert_eq!(stored.total_value, 1375.0);
        assert_eq!(stored.line_items.len(), 2);
    }

    #[tokio::test]
    async fn test_save_without_id_always_inserts_new_record() {
        let pool = setup_test_db().await;
        let storage = ProposalStorage::new(pool.clone());

        let first = storage.save_proposal(&save_input(None)).await.unwrap();
        let second = storage.save_proposal(&save_input(None)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(count_proposals(&pool).await, 2);
    }

    #[tokio::test]
    async fn test_save_with_id_updates_in_place() {
        let pool = setup_test_db().await;
        let storage = ProposalStorage::new(pool.clone());

        let stored = storage.save_proposal(&save_input(None)).await.unwrap();

        let mut edited = save_input(Some(stored.id.clone()));
        edited.proposal_text = "Revised text".to_string();
        edited.line_items[0].quantity = 12.0;
        edited.line_items[0].recompute_total();

        let updated = storage.save_proposal(&edited).await.unwrap();
        // Saving again with the same id and values must not create a duplicate.
        let updated_again = storage.save_proposal(&edited).await.unwrap();

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.proposal_text, "Revised text");
        assert_eq!(updated.total_value, 12.0 * 85.0 + 525.0);
        assert_eq!(updated_again.total_value, updated.total_value);
        assert_eq!(count_proposals(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_is_not_found() {
        let pool = setup_test_db().await;
        let storage = ProposalStorage::new(pool);

        let err = storage
            .save_proposal(&save_input(Some("missing".to_string())))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_total_value_treats_missing_totals_as_zero() {
        let pool = setup_test_db().await;
        let storage = ProposalStorage::new(pool);

        let items: Vec<LineItem> = serde_json::from_value(serde_json::json!([
            { "description": "a", "quantity": 1.0, "unit": "piece", "unitPrice": 100.0, "totalPrice": 100.0 },
            { "description": "b", "quantity": 1.0, "unit": "piece", "unitPrice": 50.0 }
        ]))
        .unwrap();

        let input = SaveProposalInput {
            id: None,
            customer_name: "Schmidt".to_string(),
            proposal_text: "text".to_string(),
            line_items: items,
        };

        let stored = storage.save_proposal(&input).await.unwrap();
        assert_eq!(stored.total_value, 100.0);
    }

    #[tokio::test]
    async fn test_list_proposals_newest_first() {
        let pool = setup_test_db().await;
        let storage = ProposalStorage::new(pool.clone());

        let first = storage.save_proposal(&save_input(None)).await.unwrap();
        let second = storage.save_proposal(&save_input(None)).await.unwrap();

        // created_at has second precision via RFC 3339; pin both timestamps
        // so ordering does not depend on the wall clock
        sqlx::query("UPDATE proposals SET created_at = '2026-01-01T00:00:00+00:00' WHERE id = ?")
            .bind(&first.id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE proposals SET created_at = '2026-01-02T00:00:00+00:00' WHERE id = ?")
            .bind(&second.id)
            .execute(&pool)
            .await
            .unwrap();

        let listed = storage.list_proposals().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_status_moves_proposal_through_pipeline() {
        let pool = setup_test_db().await;
        let storage = ProposalStorage::new(pool);

        let stored = storage.save_proposal(&save_input(None)).await.unwrap();

        storage
            .update_status(&stored.id, ProposalStatus::Sent)
            .await
            .unwrap();
        storage
            .update_status(&stored.id, ProposalStatus::FollowUp)
            .await
            .unwrap();

        let fetched = storage.get_proposal(&stored.id).await.unwrap();
        assert_eq!(fetched.status, ProposalStatus::FollowUp);

        let err = storage
            .update_status("missing", ProposalStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}

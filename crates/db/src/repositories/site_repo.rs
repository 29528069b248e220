//! Repository for the `sites` table.

use sqlx::PgPool;
use upkeep_core::types::DbId;

use crate::models::site::{Site, SiteInput, SiteWithMachineCount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, location, created_at, updated_at";

/// Provides CRUD operations for sites.
pub struct SiteRepo;

impl SiteRepo {
    /// Insert a new site, returning the created row.
    pub async fn create(pool: &PgPool, input: &SiteInput) -> Result<Site, sqlx::Error> {
        let query = format!(
            "INSERT INTO sites (name, location)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    /// Find a site by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sites WHERE id = $1");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all sites with their machine counts, ordered by name.
    pub async fn list_with_machine_counts(
        pool: &PgPool,
    ) -> Result<Vec<SiteWithMachineCount>, sqlx::Error> {
        sqlx::query_as::<_, SiteWithMachineCount>(
            "SELECT s.id, s.name, s.location, COUNT(m.id) AS machine_count \
             FROM sites s \
             LEFT JOIN machines m ON m.site_id = s.id \
             GROUP BY s.id, s.name, s.location \
             ORDER BY s.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Replace a site's name and location.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SiteInput,
    ) -> Result<Option<Site>, sqlx::Error> {
        let query = format!(
            "UPDATE sites SET name = $2, location = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.location)
            .fetch_optional(pool)
            .await
    }

    /// Delete a site. Returns `true` if a row was deleted.
    ///
    /// The caller must check [`Self::machine_count`] first; the FK is
    /// RESTRICT so a delete with machines attached fails at the database.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sites WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of machines attached to a site.
    pub async fn machine_count(pool: &PgPool, site_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM machines WHERE site_id = $1")
            .bind(site_id)
            .fetch_one(pool)
            .await
    }
}

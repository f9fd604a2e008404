use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{FundingOpportunity, NewUserProfile, StoredProfile};

/// Errors that can occur when interacting with the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL-backed record store for profiles and funding opportunities.
///
/// Two tables: `user_profiles`, written once per submission with no update
/// or delete path and no uniqueness constraint (duplicates are permitted),
/// and `funding_opportunities`, read-only from the API and populated
/// out-of-band.
pub struct RecordStore {
    pool: PgPool,
}

impl RecordStore {
    /// Connect to PostgreSQL and run pending migrations.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from configuration values.
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        Self::connect(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Persist a submitted profile and return it with its generated id.
    pub async fn create_profile(
        &self,
        profile: NewUserProfile,
    ) -> Result<StoredProfile, StoreError> {
        let id = Uuid::new_v4();

        let query = r#"
            INSERT INTO user_profiles (id, name, company, sector, funding_needs, growth_stage)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(&profile.name)
            .bind(&profile.company)
            .bind(&profile.sector)
            .bind(&profile.funding_needs)
            .bind(&profile.growth_stage)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Created profile {} for company {}", id, profile.company);

        Ok(StoredProfile { id, profile })
    }

    /// Find opportunities in `sector` asking for at most `max_amount`.
    ///
    /// Result ordering is store-determined; a query with no matches returns
    /// an empty vector, not an error.
    pub async fn find_opportunities(
        &self,
        sector: &str,
        max_amount: i64,
    ) -> Result<Vec<FundingOpportunity>, StoreError> {
        let query = r#"
            SELECT name, amount, sector, eligibility_criteria, deadline
            FROM funding_opportunities
            WHERE sector = $1 AND amount <= $2
        "#;

        let rows = sqlx::query(query)
            .bind(sector)
            .bind(max_amount)
            .fetch_all(&self.pool)
            .await?;

        let opportunities: Vec<FundingOpportunity> = rows
            .iter()
            .map(|row| FundingOpportunity {
                name: row.get("name"),
                amount: row.get("amount"),
                sector: row.get("sector"),
                eligibility_criteria: row.get("eligibility_criteria"),
                deadline: row.get("deadline"),
            })
            .collect();

        tracing::debug!(
            "Found {} opportunities for sector {} up to {}",
            opportunities.len(),
            sector,
            max_amount
        );

        Ok(opportunities)
    }

    /// Insert a funding opportunity.
    ///
    /// Not reachable through the HTTP API; this is the out-of-band
    /// population path used by seed tooling and tests.
    pub async fn insert_opportunity(
        &self,
        opportunity: &FundingOpportunity,
    ) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO funding_opportunities (id, name, amount, sector, eligibility_criteria, deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#;

        sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(&opportunity.name)
            .bind(opportunity.amount)
            .bind(&opportunity.sector)
            .bind(&opportunity.eligibility_criteria)
            .bind(opportunity.deadline)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Connection to an external PostgreSQL server, taken from DATABASE_URL
pub struct PgTestInstance {
    pub base_url: String,
}

/// An isolated, freshly created database
pub struct TestDatabase {
    pool: PgPool,
    db_name: String,
    base_url: String,
}

impl TestDatabase {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Execute arbitrary SQL for test setup
    pub async fn execute(&self, sql: &str) {
        use sqlx::Executor;
        self.pool
            .execute(sql)
            .await
            .unwrap_or_else(|e| panic!("Failed to execute SQL: {}\nError: {}", sql, e));
    }

    /// Cleanup the test database - best effort async cleanup
    pub async fn cleanup(self) {
        self.pool.close().await;

        let db_name = self.db_name.clone();
        let base_url = self.base_url.clone();

        let cleanup_future = async move {
            if let Ok(pool) = PgPool::connect(&base_url).await {
                let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", db_name);
                let _ = sqlx::query(&drop_sql).execute(&pool).await;
                pool.close().await;
            }
        };

        // Timeout after 5 seconds to prevent hanging
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), cleanup_future).await;
    }
}

impl PgTestInstance {
    /// Requires DATABASE_URL to point at a server where databases can be created
    pub fn new() -> Self {
        dotenv::dotenv().ok();
        let base_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run PostgreSQL tests");
        Self { base_url }
    }

    pub async fn create_test_database(&self) -> TestDatabase {
        let db_name = format!("test_{}", Uuid::new_v4().simple());

        let base_pool = PgPool::connect(&self.base_url)
            .await
            .expect("Failed to connect to PostgreSQL for database creation");

        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name))
            .execute(&base_pool)
            .await
            .expect("Failed to create test database");

        base_pool.close().await;

        let db_url = if let Some(last_slash) = self.base_url.rfind('/') {
            format!("{}/{}", &self.base_url[..last_slash], db_name)
        } else {
            format!("{}/{}", self.base_url, db_name)
        };

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to newly created test database");

        TestDatabase {
            pool,
            db_name,
            base_url: self.base_url.clone(),
        }
    }
}

/// Run a test against a throwaway database, dropping it afterwards.
///
/// Tests using this are `#[ignore]`d; run them with `cargo test -- --ignored`.
pub async fn with_test_db<F>(test_fn: F) -> Result<()>
where
    F: std::ops::AsyncFnOnce(&TestDatabase) -> Result<()>,
{
    let pg = PgTestInstance::new();
    let db = pg.create_test_database().await;

    let result = test_fn(&db).await;

    db.cleanup().await;

    result
}

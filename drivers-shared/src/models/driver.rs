/// Driver model and database operations
///
/// This module provides the `Driver` entity and its CRUD operations. Every
/// operation takes the pool explicitly; mutating operations run inside their
/// own transaction so a failed write never leaves partial state behind.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE drivers (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password VARCHAR(255) NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use drivers_shared::models::driver::{CreateDriver, Driver};
/// use drivers_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let driver = Driver::create(
///     &pool,
///     CreateDriver {
///         name: "Aragorn".to_string(),
///         email: "ranger123@gmail.com".to_string(),
///         password: "Password2".to_string(),
///     },
/// )
/// .await?;
/// println!("Created driver: {}", driver.id);
///
/// let found = Driver::find_by_email(&pool, "ranger123@gmail.com").await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, warn};

const DRIVER_COLUMNS: &str = "id, name, email, password";

/// Errors raised by driver write operations
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Another driver already uses this email address
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Any other storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DriverError {
    /// Maps a write failure, turning unique-constraint violations into `DuplicateEmail`
    fn from_write(err: sqlx::Error, email: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DriverError::DuplicateEmail(email.to_string());
            }
        }
        DriverError::Database(err)
    }
}

/// Rolls back a failed unit of work and hands back the error that caused it
///
/// A failing rollback is only logged; the caller always gets `err` back.
async fn abort(tx: Transaction<'_, Sqlite>, err: DriverError) -> DriverError {
    if let Err(rollback_err) = tx.rollback().await {
        warn!(error = %rollback_err, "Transaction rollback failed");
    }
    err
}

/// A persisted driver record
///
/// The password is stored exactly as supplied; it is not hashed.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Driver {
    /// Surrogate key assigned by the database
    pub id: i64,

    /// Display name, at least two characters
    pub name: String,

    /// Email address, unique across all drivers
    pub email: String,

    /// Password as supplied at creation or last update
    pub password: String,
}

/// Serialized form of a driver returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Input for creating a new driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDriver {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Input for updating an existing driver
///
/// Empty or missing values mean "no change". `email` is only applied together
/// with a non-empty `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDriver {
    /// New display name
    pub name: Option<String>,

    /// New email, applied only alongside `name`
    pub email: Option<String>,

    /// New password
    pub password: Option<String>,
}

impl UpdateDriver {
    fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Resolves the columns this update actually writes: `(name, email, password)`
    fn effective(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        let name = Self::non_empty(&self.name);
        let email = name.and(Self::non_empty(&self.email));
        let password = Self::non_empty(&self.password);
        (name, email, password)
    }
}

impl Driver {
    /// Returns the serializable view of this driver
    pub fn read(&self) -> DriverRecord {
        DriverRecord {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// Creates a new driver in the database
    ///
    /// The insert runs in its own transaction. On a unique-constraint
    /// violation the transaction is rolled back and
    /// [`DriverError::DuplicateEmail`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists
    /// - Database connection fails
    pub async fn create(pool: &SqlitePool, data: CreateDriver) -> Result<Self, DriverError> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query_as::<_, Driver>(&format!(
            "INSERT INTO drivers (name, email, password) VALUES (?, ?, ?) RETURNING {}",
            DRIVER_COLUMNS
        ))
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password)
        .fetch_one(&mut *tx)
        .await;

        let driver = match inserted {
            Ok(driver) => driver,
            Err(err) => {
                let err = abort(tx, DriverError::from_write(err, &data.email)).await;
                warn!(email = %data.email, error = %err, "Driver insert rolled back");
                return Err(err);
            }
        };

        tx.commit().await?;

        debug!(driver_id = driver.id, "Driver created");
        Ok(driver)
    }

    /// Finds a driver by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE id = ?",
            DRIVER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a driver by email address (exact match)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE email = ?",
            DRIVER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Updates an existing driver
    ///
    /// A non-empty `name` replaces the name and, when also non-empty, the
    /// email. A non-empty `password` is replaced on its own. Everything else
    /// keeps its current value.
    ///
    /// # Returns
    ///
    /// The updated driver, or None if no driver has this ID
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The new email belongs to another driver
    /// - Database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use drivers_shared::models::driver::{Driver, UpdateDriver};
    /// # use sqlx::SqlitePool;
    /// # async fn example(pool: SqlitePool, driver_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    /// let update = UpdateDriver {
    ///     password: Some("newpass".to_string()),
    ///     ..Default::default()
    /// };
    ///
    /// if let Some(driver) = Driver::update(&pool, driver_id, update).await? {
    ///     println!("Updated driver: {}", driver.email);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateDriver,
    ) -> Result<Option<Self>, DriverError> {
        let (name, email, password) = data.effective();

        let mut tx = pool.begin().await?;

        let updated = sqlx::query_as::<_, Driver>(&format!(
            "UPDATE drivers
             SET name = COALESCE(?, name),
                 email = COALESCE(?, email),
                 password = COALESCE(?, password)
             WHERE id = ?
             RETURNING {}",
            DRIVER_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .bind(password)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await;

        let driver = match updated {
            Ok(driver) => driver,
            Err(err) => {
                let err = abort(tx, DriverError::from_write(err, email.unwrap_or_default())).await;
                warn!(driver_id = id, error = %err, "Driver update rolled back");
                return Err(err);
            }
        };

        tx.commit().await?;

        debug!(driver_id = id, found = driver.is_some(), "Driver update finished");
        Ok(driver)
    }

    /// Permanently deletes a driver by ID
    ///
    /// # Returns
    ///
    /// True if a driver was deleted, false if it didn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every driver in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers ORDER BY id ASC",
            DRIVER_COLUMNS
        ))
        .fetch_all(pool)
        .await
    }

    /// Counts total number of drivers
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM drivers")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

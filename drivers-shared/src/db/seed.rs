/// Sample data for development databases
///
/// `seed_drivers` inserts a fixed set of drivers. Drivers whose email already
/// exists are skipped, so seeding an already-seeded database is harmless.

use crate::models::driver::{CreateDriver, Driver, DriverError};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// (name, email, password) of every seeded driver
pub const SAMPLE_DRIVERS: [(&str, &str, &str); 6] = [
    ("Ryan McWeeny", "ryanrob327@gmail.com", "Password"),
    ("Aragorn", "ranger123@gmail.com", "Password2"),
    ("Gandolf", "wizard456@gmail.com", "Password3"),
    ("Sauron", "evilEye789@gmail.com", "Password4"),
    ("Frodo Baggins", "hobbit1011@TheShire.com", "Password5"),
    ("Gimbli", "Dwarf@gmail.com", "Password6"),
];

/// Inserts the sample drivers, returning how many were newly created
///
/// # Errors
///
/// Returns an error for any storage failure other than a duplicate email.
pub async fn seed_drivers(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    let mut created = 0;

    for (name, email, password) in SAMPLE_DRIVERS {
        let data = CreateDriver {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        match Driver::create(pool, data).await {
            Ok(_) => created += 1,
            Err(DriverError::DuplicateEmail(email)) => {
                warn!(%email, "Seed driver already exists, skipping");
            }
            Err(DriverError::Database(err)) => return Err(err),
        }
    }

    info!(created, total = SAMPLE_DRIVERS.len(), "Seeded sample drivers");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig},
    };

    #[tokio::test]
    async fn test_seed_twice_creates_each_driver_once() {
        let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        assert_eq!(seed_drivers(&pool).await.unwrap(), SAMPLE_DRIVERS.len());
        assert_eq!(seed_drivers(&pool).await.unwrap(), 0);
        assert_eq!(
            Driver::count(&pool).await.unwrap(),
            SAMPLE_DRIVERS.len() as i64
        );
    }
}

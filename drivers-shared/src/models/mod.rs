/// Database models for the drivers service
///
/// # Models
///
/// - `driver`: Driver records with name, email and password
///
/// # Example
///
/// ```no_run
/// use drivers_shared::models::driver::Driver;
/// use drivers_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
/// let drivers = Driver::list(&pool).await?;
/// println!("{} drivers", drivers.len());
/// # Ok(())
/// # }
/// ```

pub mod driver;

/// API route handlers
///
/// - `health`: Health check endpoint
/// - `drivers`: Driver creation and listing

pub mod drivers;
pub mod health;

/// Driver endpoints
///
/// - `POST /api/drivers/create` - Validate and store a new driver
/// - `GET /api/drivers/` - List every driver
///
/// Both return drivers in their serialized form: `{"name", "email", "password"}`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use drivers_shared::models::driver::{CreateDriver, Driver, DriverError, DriverRecord};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

/// Create driver request
///
/// Fields are optional so a missing field reaches validation instead of
/// failing JSON extraction.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    /// Display name, at least 2 characters
    #[validate(
        required(message = "Name is missing, or is less than 2 characters"),
        length(min = 2, message = "Name is missing, or is less than 2 characters")
    )]
    pub name: Option<String>,

    /// Email address
    #[validate(required(message = "email is missing"))]
    pub email: Option<String>,

    /// Password
    #[validate(required(message = "password is missing"))]
    pub password: Option<String>,
}

impl CreateDriverRequest {
    /// Validates the request, reporting only the first failing field
    ///
    /// Fields are checked in the order name, email, password.
    pub fn check(self) -> Result<CreateDriver, ApiError> {
        if let Err(errors) = self.validate() {
            return Err(ApiError::Validation(first_failure(&errors)));
        }

        // `required` has already rejected every `None`
        let (Some(name), Some(email), Some(password)) = (self.name, self.email, self.password)
        else {
            return Err(ApiError::Validation("Validation failed".to_string()));
        };

        Ok(CreateDriver {
            name,
            email,
            password,
        })
    }
}

fn first_failure(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    ["name", "email", "password"]
        .into_iter()
        .filter_map(|field| field_errors.get(field))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation failed".to_string())
}

/// Create a new driver
///
/// # Endpoint
///
/// ```text
/// POST /api/drivers/create
/// Content-Type: application/json
///
/// {
///   "name": "Al",
///   "email": "a@x.com",
///   "password": "p"
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "name": "Al", "email": "a@x.com", "password": "p" }
/// ```
///
/// # Errors
///
/// - `210`: Validation failed, or the email is already registered
/// - `400 Bad Request`: Body is not valid JSON
/// - `500 Internal Server Error`: Server error
pub async fn create_driver(
    State(state): State<AppState>,
    payload: Result<Json<CreateDriverRequest>, JsonRejection>,
) -> ApiResult<Json<DriverRecord>> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let data = req.check()?;
    let (name, email) = (data.name.clone(), data.email.clone());

    match Driver::create(&state.db, data).await {
        Ok(driver) => {
            tracing::info!(driver_id = driver.id, "Driver created");
            Ok(Json(driver.read()))
        }
        Err(DriverError::DuplicateEmail(_)) => {
            tracing::info!(%email, "Driver create rejected");
            Err(ApiError::CreateFailed(format!(
                "Processed {}, either a format error or email {} is duplicate",
                name, email
            )))
        }
        Err(err) => Err(err.into()),
    }
}

/// List all drivers
///
/// # Endpoint
///
/// ```text
/// GET /api/drivers/
/// ```
///
/// # Response
///
/// ```json
/// [
///   { "name": "Al", "email": "a@x.com", "password": "p" }
/// ]
/// ```
pub async fn list_drivers(State(state): State<AppState>) -> ApiResult<Json<Vec<DriverRecord>>> {
    let drivers = Driver::list(&state.db).await?;

    Ok(Json(drivers.iter().map(Driver::read).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: Option<&str>, email: Option<&str>, password: Option<&str>) -> CreateDriverRequest {
        CreateDriverRequest {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    fn message(result: Result<CreateDriver, ApiError>) -> String {
        match result {
            Err(ApiError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let data = request(Some("Al"), Some("a@x.com"), Some("p")).check().unwrap();
        assert_eq!(data.name, "Al");
        assert_eq!(data.email, "a@x.com");
        assert_eq!(data.password, "p");
    }

    #[test]
    fn test_short_name_rejected_first() {
        let msg = message(request(Some("A"), None, None).check());
        assert_eq!(msg, "Name is missing, or is less than 2 characters");

        let msg = message(request(Some("A"), Some("a@x.com"), Some("p")).check());
        assert_eq!(msg, "Name is missing, or is less than 2 characters");
    }

    #[test]
    fn test_missing_name_rejected() {
        let msg = message(request(None, Some("a@x.com"), Some("p")).check());
        assert_eq!(msg, "Name is missing, or is less than 2 characters");
    }

    #[test]
    fn test_missing_email_before_password() {
        let msg = message(request(Some("Al"), None, None).check());
        assert_eq!(msg, "email is missing");
    }

    #[test]
    fn test_missing_password_rejected() {
        let msg = message(request(Some("Al"), Some("a@x.com"), None).check());
        assert_eq!(msg, "password is missing");
    }

    #[test]
    fn test_empty_email_is_present() {
        assert!(request(Some("Al"), Some(""), Some("p")).check().is_ok());
    }
}

//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::{AppError, FieldError};

/// Validated JSON extractor that automatically validates requests.
///
/// A body that fails to parse is a plain validation error; a body that
/// parses but breaks a rule yields one `FieldError` per broken rule, with
/// nested fields addressed by dotted paths such as `address.pincode`.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_room(
///     ValidatedJson(input): ValidatedJson<NewRoom>,
/// ) -> AppResult<Created<RoomView>> {
///     // input is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::InvalidInput(field_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validator output into field-level errors, sorted by field.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected = Vec::new();
    collect("", errors, &mut collected);
    collected.sort_by(|a, b| a.field.cmp(&b.field));
    collected
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldError {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path)),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Address {
        #[validate(length(equal = 6, message = "Pincode must be 6 digits"))]
        pincode: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Listing {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(nested)]
        address: Address,
    }

    #[test]
    fn test_nested_errors_use_dotted_paths() {
        let listing = Listing {
            name: String::new(),
            address: Address {
                pincode: "12".to_string(),
            },
        };
        let errors = field_errors(&listing.validate().unwrap_err());
        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "address.pincode".to_string(),
                    message: "Pincode must be 6 digits".to_string(),
                },
                FieldError {
                    field: "name".to_string(),
                    message: "Name is required".to_string(),
                },
            ]
        );
    }
}

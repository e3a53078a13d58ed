//! Axum extractor for submitted item forms
//!
//! Accepts either an `application/x-www-form-urlencoded` body or a JSON
//! object and normalizes both into raw [`FormValues`], so binding always
//! starts from text exactly as a browser form would submit it.

use crate::core::binding::FormValues;
use crate::core::error::{ItemServiceError, RequestError};
use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::{Map, Value};

/// Raw values of one form submission
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn add_item(SubmittedForm(form): SubmittedForm) -> Response {
///     let bound = Item::from_form(&form);
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedForm(pub FormValues);

fn invalid_body(message: impl Into<String>) -> ItemServiceError {
    RequestError::InvalidBody {
        message: message.into(),
    }
    .into()
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Convert a JSON object into form values
///
/// Scalars become their text form and `null` counts as absent.
pub fn form_values_from_json(payload: Map<String, Value>) -> Result<FormValues, ItemServiceError> {
    let mut values = FormValues::new();
    for (field, value) in payload {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(invalid_body(format!("field '{}' must be a scalar", field)));
            }
        };
        values.insert(field, text);
    }
    Ok(values)
}

impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = ItemServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(payload): Json<Map<String, Value>> = Json::from_request(req, state)
                .await
                .map_err(|e| invalid_body(e.body_text()))?;
            return form_values_from_json(payload).map(SubmittedForm);
        }

        let Form(values): Form<FormValues> = Form::from_request(req, state)
            .await
            .map_err(|e| invalid_body(e.body_text()))?;
        Ok(SubmittedForm(values))
    }
}

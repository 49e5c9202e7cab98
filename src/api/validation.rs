use actix_web::{error::InternalError, web, HttpResponse};
use serde::{Deserialize, Serialize};

/// Error body shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

fn bad_request(error: &str, fields: serde_json::Map<String, serde_json::Value>) -> actix_web::Error {
    let error_response = ErrorResponse {
        error: error.to_string(),
        fields: serde_json::Value::Object(fields),
    };
    InternalError::from_response("", HttpResponse::BadRequest().json(error_response)).into()
}

fn message_fields(message: &str) -> serde_json::Map<String, serde_json::Value> {
    let mut fields = serde_json::Map::new();
    fields.insert("message".to_string(), serde_json::json!(message));
    fields
}

/// Short explanation of a body that failed to deserialize
fn describe_deserialize_error(err_string: &str) -> &'static str {
    if err_string.contains("EOF while parsing") {
        "Request body is empty. Expected JSON payload"
    } else if err_string.contains("unknown variant") {
        "Invalid enum value. job_type must be one of: Full-Time, Part-Time, Contract, Internship"
    } else if err_string.contains("input contains invalid characters")
        || err_string.contains("premature end of input")
        || err_string.contains("input is out of range")
    {
        "Invalid date format. Use YYYY-MM-DD."
    } else {
        "Invalid JSON format"
    }
}

/// JsonConfig for validated bodies with standardized error handling
pub fn json_config(limit: usize) -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                let mut fields = serde_json::Map::new();
                for (field, errors) in validation_errors.field_errors() {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Validation error in field: {}", field))
                        })
                        .collect();
                    fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
                }
                bad_request("Validation failed", fields)
            }
            actix_web_validator::Error::Deserialize(de_err) => bad_request(
                "Request validation failed",
                message_fields(describe_deserialize_error(&de_err.to_string())),
            ),
            _ => bad_request("Validation failed", message_fields("Validation error")),
        })
}

/// JsonConfig for bodies that are checked in the service layer (PATCH)
pub fn plain_json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default().limit(limit).error_handler(|err, _req| {
        bad_request(
            "Request validation failed",
            message_fields(describe_deserialize_error(&err.to_string())),
        )
    })
}

/// QueryConfig so malformed query strings answer with the same error body
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        bad_request("Invalid query parameters", message_fields(&err.to_string()))
    })
}

use serde_json::Value;
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("CLINIC_API_URL no está configurada")]
    NotConfigured,

    /// The request never produced a response.
    #[error("{fallback}")]
    Transport {
        fallback: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success response; `message` is the backend's own text when it
    /// sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{fallback}")]
    Decode {
        fallback: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotConfigured => AppError::Internal(err.to_string()),
            ApiError::Status { status, message } => AppError::Backend { status, message },
            other => AppError::Backend { status: 502, message: other.to_string() },
        }
    }
}

/// Maps a service error onto the HTTP boundary, keeping backend statuses.
pub fn to_app_error(err: anyhow::Error) -> AppError {
    match err.downcast::<ApiError>() {
        Ok(api_error) => api_error.into(),
        Err(other) => AppError::Internal(other.to_string()),
    }
}

/// Picks the user-facing message out of a backend error body.
///
/// Priority: `mensaje`; `message` joined with an `errors` array; `message`;
/// `errors` (array, or map of arrays); `detail`; `title`; `error`.
pub fn extract_error_message(body: &Value) -> Option<String> {
    let text = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    if let Some(mensaje) = text("mensaje") {
        return Some(mensaje);
    }

    let errors = body.get("errors");
    let error_list = collect_errors(errors);

    if let Some(message) = text("message") {
        if matches!(errors, Some(Value::Array(_))) && !error_list.is_empty() {
            return Some(format!("{} {}", message, error_list.join(" | ")));
        }
        return Some(message);
    }

    if !error_list.is_empty() {
        return Some(error_list.join(" | "));
    }

    text("detail").or_else(|| text("title")).or_else(|| text("error"))
}

fn collect_errors(errors: Option<&Value>) -> Vec<String> {
    fn strings(value: &Value) -> Vec<String> {
        match value {
            Value::String(s) if !s.is_empty() => vec![s.clone()],
            Value::Array(items) => items.iter().flat_map(strings).collect(),
            _ => Vec::new(),
        }
    }

    match errors {
        Some(Value::Array(items)) => items.iter().flat_map(strings).collect(),
        Some(Value::Object(map)) => map.values().flat_map(strings).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_app_error_keeps_backend_status() {
        let err = to_app_error(ApiError::Status { status: 409, message: "Cita duplicada".into() }.into());
        assert_eq!(err.status().as_u16(), 409);
        assert_eq!(err.message(), "Cita duplicada");

        let err = to_app_error(ApiError::NotConfigured.into());
        assert_eq!(err.status().as_u16(), 500);
    }

    #[test]
    fn test_mensaje_wins() {
        let body = json!({"mensaje": "Horario duplicado", "message": "Bad request", "error": "x"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("Horario duplicado"));
    }

    #[test]
    fn test_message_joined_with_error_array() {
        let body = json!({"message": "Datos inválidos.", "errors": ["Fecha requerida", "Motivo muy largo"]});
        assert_eq!(
            extract_error_message(&body).as_deref(),
            Some("Datos inválidos. Fecha requerida | Motivo muy largo")
        );
    }

    #[test]
    fn test_message_ignores_error_map() {
        let body = json!({"message": "Validation failed", "errors": {"Fecha": ["Requerida"]}});
        assert_eq!(extract_error_message(&body).as_deref(), Some("Validation failed"));
    }

    #[test]
    fn test_validation_problem_map_is_flattened() {
        let body = json!({
            "title": "One or more validation errors occurred.",
            "errors": {"HoraInicio": ["Formato inválido"], "HoraFin": ["Requerida"]}
        });
        let message = extract_error_message(&body).unwrap();
        assert!(message.contains("Formato inválido"));
        assert!(message.contains(" | "));
        assert!(message.contains("Requerida"));
    }

    #[test]
    fn test_detail_title_error_order() {
        assert_eq!(
            extract_error_message(&json!({"detail": "d", "title": "t"})).as_deref(),
            Some("d")
        );
        assert_eq!(extract_error_message(&json!({"title": "t", "error": "e"})).as_deref(), Some("t"));
        assert_eq!(extract_error_message(&json!({"error": "e"})).as_deref(), Some("e"));
    }

    #[test]
    fn test_empty_body_has_no_message() {
        assert_eq!(extract_error_message(&json!({})), None);
        assert_eq!(extract_error_message(&json!({"mensaje": ""})), None);
        assert_eq!(extract_error_message(&json!("plain")), None);
    }
}

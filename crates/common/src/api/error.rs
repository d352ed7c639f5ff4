use reqwest::StatusCode;
use serde_json::Value;

/// Longest slice of a raw, non-JSON error body kept as the message
const MAX_RAW_MESSAGE_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An application error reported by the server on a non-2xx response.
///
/// Built leniently: `code` and `message` come from the response header when
/// present, otherwise from the HTTP status and the raw body text. The JSON
/// `body` of the error, if any, is kept as `details` (validation errors live
/// there).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("server returned {status} (code {code}): {message}")]
pub struct ServerError {
    pub status: u16,
    pub code: u16,
    pub message: String,
    pub details: Option<Value>,
}

impl ServerError {
    pub fn from_body(status: StatusCode, text: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(text).ok();
        let header = parsed.as_ref().and_then(|v| v.get("header"));

        let code = header
            .and_then(|h| h.get("code"))
            .and_then(|c| c.as_u64().or_else(|| c.as_str()?.trim().parse().ok()))
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(status.as_u16());

        let message = header
            .and_then(|h| h.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| raw_message(status, text, parsed.is_some()));

        let details = parsed
            .and_then(|mut v| v.get_mut("body").map(Value::take))
            .filter(|b| !b.is_null());

        Self {
            status: status.as_u16(),
            code,
            message,
            details,
        }
    }

    /// Flatten `details` into `(path, message)` pairs, e.g.
    /// `{"name": {"_required": "A name is required."}}` becomes
    /// `("name._required", "A name is required.")`.
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(details) = &self.details {
            flatten(details, String::new(), &mut out);
        }
        out
    }
}

fn raw_message(status: StatusCode, text: &str, was_json: bool) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || was_json {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    trimmed.chars().take(MAX_RAW_MESSAGE_CHARS).collect()
}

fn flatten(value: &Value, path: String, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                flatten(child, child_path, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten(child, format!("{}[{}]", path, i), out);
            }
        }
        Value::String(s) => out.push((path, s.clone())),
        Value::Null => {}
        other => out.push((path, other.to_string())),
    }
}

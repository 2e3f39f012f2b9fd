use serde::Serialize;
use serde_json::Value;

/// One reply line. `id` is absent only when the request line could not be
/// parsed far enough to read it.
#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody<'a>>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

fn render(envelope: Envelope<'_>) -> Value {
    // Only string keys and JSON values inside, so this cannot fail.
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}

pub fn ok(id: &str, result: Value) -> Value {
    render(Envelope {
        id: Some(id),
        ok: true,
        result: Some(result),
        error: None,
    })
}

pub fn err(id: &str, code: &str, message: impl Into<String>, details: Option<Value>) -> Value {
    render(Envelope {
        id: Some(id),
        ok: false,
        result: None,
        error: Some(ErrorBody {
            code,
            message: message.into(),
            details,
        }),
    })
}

/// Reply to a line that is not a request.
pub fn bad_json(message: impl Into<String>) -> Value {
    render(Envelope {
        id: None,
        ok: false,
        result: None,
        error: Some(ErrorBody {
            code: "bad_json",
            message: message.into(),
            details: None,
        }),
    })
}

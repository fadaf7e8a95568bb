//! Request binder: raw inbound parts into a typed action request.
//!
//! The binder enforces structure only. Present-but-empty fields pass
//! through untouched; the backend owns semantic validation. The one
//! non-structural check is identity for attributable actions.

use crate::domain::error::BindingError;
use crate::domain::identity::CallerIdentity;
use crate::domain::requests::{ActionCall, ActionRequest};
use bytes::Bytes;
use serde_json::{Map, Value};

/// Unbound request parts as the router received them.
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    pub body: Bytes,
    pub query: Map<String, Value>,
    pub path: Map<String, Value>,
    pub caller: Option<CallerIdentity>,
}

impl RawInput {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), Value::String(value.into()));
        self
    }

    pub fn with_path(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(key.into(), Value::String(value.into()));
        self
    }

    pub fn with_caller(mut self, caller: Option<CallerIdentity>) -> Self {
        self.caller = caller;
        self
    }
}

/// A bound request, ready for invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<R> {
    pub request: R,
    /// Set only for attributable actions
    pub actor: Option<CallerIdentity>,
}

impl<R: ActionRequest> Bound<R> {
    /// JSON-RPC params for the remote method.
    pub fn wire_params(&self) -> Result<Value, BindingError> {
        let call = ActionCall {
            request: &self.request,
            actor_id: self.actor.as_ref().map(CallerIdentity::as_str),
        };
        Ok(serde_json::to_value(call)?)
    }
}

/// Bind `input` to `R`.
///
/// Field precedence: path segment, then body, then query string.
pub fn bind<R: ActionRequest>(input: RawInput) -> Result<Bound<R>, BindingError> {
    let descriptor = R::ACTION.descriptor();
    let RawInput {
        body,
        query,
        path,
        caller,
    } = input;

    let mut fields = query;
    if !body.trim_ascii().is_empty() {
        match serde_json::from_slice::<Value>(&body)? {
            Value::Object(object) => fields.extend(object),
            other => {
                return Err(BindingError::Malformed(format!(
                    "request body must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        }
    }
    fields.extend(path);

    let request: R = serde_json::from_value(Value::Object(fields))?;

    let actor = if descriptor.requires_identity {
        match caller {
            Some(caller) => Some(caller),
            None => {
                return Err(BindingError::MissingIdentity {
                    action: descriptor.name,
                })
            }
        }
    } else {
        None
    };

    Ok(Bound { request, actor })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

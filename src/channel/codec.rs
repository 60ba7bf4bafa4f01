//! JSON method codec.
//!
//! Envelopes follow the shape of Flutter's `JSONMethodCodec` so the Dart
//! side can talk to this crate with a stock `MethodChannel`:
//!
//! | Message            | Encoding                          |
//! |--------------------|-----------------------------------|
//! | method call        | `{"method": name, "args": value}` |
//! | success reply      | `[value]`                         |
//! | error reply        | `[code, message, details]`        |
//! | not implemented    | empty payload                     |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

use super::{MethodCall, MethodResponse};

#[derive(Serialize, Deserialize)]
struct CallEnvelope {
    method: String,
    #[serde(default)]
    args: Value,
}

pub fn encode_method_call(call: &MethodCall) -> Result<Vec<u8>, BridgeError> {
    let envelope = CallEnvelope {
        method: call.method.clone(),
        args: call.arguments.clone(),
    };
    serde_json::to_vec(&envelope).map_err(|e| BridgeError::Encoding {
        reason: e.to_string(),
    })
}

pub fn decode_method_call(message: &[u8]) -> Result<MethodCall, BridgeError> {
    let envelope: CallEnvelope =
        serde_json::from_slice(message).map_err(|e| BridgeError::MalformedCall {
            reason: e.to_string(),
        })?;
    Ok(MethodCall::new(envelope.method, envelope.args))
}

pub fn encode_response(response: &MethodResponse) -> Result<Vec<u8>, BridgeError> {
    let envelope = match response {
        MethodResponse::NotImplemented => return Ok(Vec::new()),
        MethodResponse::Success(value) => Value::Array(vec![value.clone()]),
        MethodResponse::Error {
            code,
            message,
            details,
        } => Value::Array(vec![
            Value::String(code.clone()),
            message.clone().map(Value::String).unwrap_or(Value::Null),
            details.clone(),
        ]),
    };
    serde_json::to_vec(&envelope).map_err(|e| BridgeError::Encoding {
        reason: e.to_string(),
    })
}

pub fn decode_response(reply: &[u8]) -> Result<MethodResponse, BridgeError> {
    if reply.is_empty() {
        return Ok(MethodResponse::NotImplemented);
    }

    let value: Value =
        serde_json::from_slice(reply).map_err(|e| BridgeError::MalformedResponse {
            reason: e.to_string(),
        })?;

    let mut items = match value {
        Value::Array(items) => items,
        other => {
            return Err(BridgeError::MalformedResponse {
                reason: format!("expected array envelope, got {}", other),
            })
        }
    };

    match items.len() {
        1 => Ok(MethodResponse::Success(items.remove(0))),
        3 => {
            let details = items.remove(2);
            let message = match items.remove(1) {
                Value::Null => None,
                Value::String(message) => Some(message),
                other => {
                    return Err(BridgeError::MalformedResponse {
                        reason: format!("error message must be a string, got {}", other),
                    })
                }
            };
            let code = match items.remove(0) {
                Value::String(code) => code,
                other => {
                    return Err(BridgeError::MalformedResponse {
                        reason: format!("error code must be a string, got {}", other),
                    })
                }
            };
            Ok(MethodResponse::Error {
                code,
                message,
                details,
            })
        }
        n => Err(BridgeError::MalformedResponse {
            reason: format!("envelope must have 1 or 3 elements, got {}", n),
        }),
    }
}

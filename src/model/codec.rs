//! Payload encoding chains
//!
//! Message data travels with an `encoding` field listing the transforms
//! applied to it, slash-separated, in application order:
//! `json/utf-8/cipher+aes-128-cbc/base64`. Decoding walks the chain in
//! reverse. Decryption happens inside the walk, so a decoded payload is
//! never observable in ciphertext form.

use super::cipher::ChannelCipher;
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

/// Intermediate payload state while walking an encoding chain
enum Payload {
    Json(Value),
    Bytes(Vec<u8>),
}

impl Payload {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Json(Value::String(s)) => Ok(s.into_bytes()),
            Self::Json(_) => Err(Error::decode("expected string payload, got JSON value")),
        }
    }

    fn into_string(self) -> Result<String> {
        match self {
            Self::Bytes(bytes) => String::from_utf8(bytes)
                .map_err(|_| Error::decode("payload is not valid UTF-8")),
            Self::Json(Value::String(s)) => Ok(s),
            Self::Json(_) => Err(Error::decode("expected string payload, got JSON value")),
        }
    }
}

/// Decode a raw `data` value according to its encoding chain.
///
/// `encoding` of `None` or an empty string returns the value untouched.
/// A `cipher+*` step requires a channel cipher whose algorithm matches the
/// step; receiving ciphertext without one is an error rather than a
/// partially-decoded payload.
pub fn decode_payload(
    data: &Value,
    encoding: Option<&str>,
    cipher: Option<&ChannelCipher>,
) -> Result<Value> {
    let Some(encoding) = encoding.filter(|e| !e.is_empty()) else {
        return Ok(data.clone());
    };

    let mut payload = Payload::Json(data.clone());

    for step in encoding.split('/').rev() {
        payload = match step {
            "base64" => {
                let text = payload.into_string()?;
                let bytes = BASE64
                    .decode(text.as_bytes())
                    .map_err(|e| Error::decode(format!("invalid base64 payload: {e}")))?;
                Payload::Bytes(bytes)
            }
            "utf-8" => Payload::Json(Value::String(payload.into_string()?)),
            "json" => {
                let text = payload.into_string()?;
                let value: Value = serde_json::from_str(&text)
                    .map_err(|e| Error::decode(format!("invalid JSON payload: {e}")))?;
                Payload::Json(value)
            }
            step if step.starts_with("cipher+") => {
                let algorithm = &step["cipher+".len()..];
                let Some(cipher) = cipher else {
                    return Err(Error::cipher(format!(
                        "received '{algorithm}' encrypted payload but no cipher is configured"
                    )));
                };
                if cipher.algorithm() != algorithm {
                    return Err(Error::cipher(format!(
                        "payload encrypted with '{algorithm}' but channel cipher is '{}'",
                        cipher.algorithm()
                    )));
                }
                Payload::Bytes(cipher.decrypt(&payload.into_bytes()?)?)
            }
            other => {
                return Err(Error::decode(format!("unknown payload encoding '{other}'")));
            }
        };
    }

    match payload {
        Payload::Json(value) => Ok(value),
        // A chain ending in raw bytes is only representable as text
        Payload::Bytes(bytes) => String::from_utf8(bytes)
            .map(Value::String)
            .map_err(|_| Error::decode("decoded payload is not valid UTF-8")),
    }
}

/// Encode an outgoing `data` value, encrypting when a cipher is supplied.
///
/// Returns the wire value plus the encoding chain, `None` when the value
/// travels as-is. Strings and JSON scalars go out raw on unencrypted
/// channels; objects and arrays are serialized with a `json` step.
pub fn encode_payload(
    data: &Value,
    cipher: Option<&ChannelCipher>,
) -> Result<(Value, Option<String>)> {
    let Some(cipher) = cipher else {
        // Unencrypted: strings and scalars travel raw, containers as JSON text
        return match data {
            Value::Object(_) | Value::Array(_) => Ok((
                Value::String(serde_json::to_string(data)?),
                Some("json".to_string()),
            )),
            other => Ok((other.clone(), None)),
        };
    };

    let (plaintext, mut steps): (Vec<u8>, Vec<String>) = match data {
        Value::String(s) => (s.clone().into_bytes(), vec!["utf-8".to_string()]),
        other => (
            serde_json::to_string(other)?.into_bytes(),
            vec!["json".to_string(), "utf-8".to_string()],
        ),
    };

    let ciphertext = cipher.encrypt(&plaintext)?;
    steps.push(format!("cipher+{}", cipher.algorithm()));
    steps.push("base64".to_string());

    Ok((
        Value::String(BASE64.encode(&ciphertext)),
        Some(steps.join("/")),
    ))
}

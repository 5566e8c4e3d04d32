/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Decoding of the `payload` extra.
//!
//! The payload arrives in one of three shapes: an already structured JSON object, a JSON
//! document in a string, or a base64 string of gzip compressed JSON (used when the data would
//! not otherwise fit in a push). String payloads are tried against each decoder in turn and
//! the first success wins.

use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::read::GzDecoder;
use serde_json::Value;

use crate::error::{handle_error, Error, Result};
use crate::types::{JsonObject, JsonValue};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

type Decoder = fn(&str) -> Result<JsonObject>;

const STRING_DECODERS: [(&str, Decoder); 2] =
    [("gzip", decode_gzip_json), ("json", decode_plain_json)];

/// Decode a payload into a JSON object, or `None` if there's no usable data.
pub fn decode_payload(payload: Option<&JsonValue>) -> Option<JsonObject> {
    match payload {
        None => {
            log::debug!("Notification has no payload");
            None
        }
        Some(Value::Object(obj)) => Some(obj.clone()),
        Some(Value::String(text)) => decode_string(text),
        Some(other) => {
            log::debug!("Ignoring payload of unexpected shape: {}", other);
            None
        }
    }
}

fn decode_string(text: &str) -> Option<JsonObject> {
    let decoded = STRING_DECODERS
        .iter()
        .find_map(|(name, decode)| match decode(text) {
            Ok(obj) => Some(obj),
            Err(e) => {
                log::debug!("{} decoding of payload failed: {}", name, e);
                None
            }
        });
    if decoded.is_none() {
        handle_error(Error::MalformedPayload);
    }
    decoded
}

fn decode_gzip_json(text: &str) -> Result<JsonObject> {
    let compact: String = text.split_whitespace().collect();
    let bytes = STANDARD.decode(compact)?;
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Err(Error::NotGzip);
    }
    let mut json = String::new();
    GzDecoder::new(bytes.as_slice()).read_to_string(&mut json)?;
    decode_plain_json(&json)
}

fn decode_plain_json(text: &str) -> Result<JsonObject> {
    match serde_json::from_str(text)? {
        Value::Object(obj) => Ok(obj),
        _ => Err(Error::NotAnObject),
    }
}

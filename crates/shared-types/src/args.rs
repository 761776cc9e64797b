//! # Byte Argument Lists
//!
//! Byte arguments cross the chaincode boundary as JSON arrays of base64
//! strings, the encoding a Go `[][]byte` gets from `encoding/json`.

use crate::errors::ProtocolError;
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

#[serde_as]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct ByteArgs(#[serde_as(as = "Vec<Base64>")] Vec<Vec<u8>>);

#[serde_as]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct ByteArgLists(#[serde_as(as = "Vec<Vec<Base64>>")] Vec<Vec<Vec<u8>>>);

/// `[b"a", b"b"]` to `["YQ==","Yg=="]`.
pub fn encode_byte_args(args: &[Vec<u8>]) -> String {
    // Base64 strings only; serialization cannot fail.
    serde_json::to_string(&ByteArgs(args.to_vec())).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a JSON array of base64 strings. `null` reads as empty.
pub fn decode_byte_args(raw: &str) -> Result<Vec<Vec<u8>>, ProtocolError> {
    if raw.trim() == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str::<ByteArgs>(raw)?.0)
}

/// One argument list per batch element.
pub fn encode_byte_arg_lists(lists: &[Vec<Vec<u8>>]) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(&ByteArgLists(lists.to_vec()))?)
}

/// Inverse of `encode_byte_arg_lists`.
pub fn decode_byte_arg_lists(raw: &str) -> Result<Vec<Vec<Vec<u8>>>, ProtocolError> {
    Ok(serde_json::from_str::<ByteArgLists>(raw)?.0)
}

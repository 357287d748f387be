//! Table serialization.
//!
//! Each table is persisted as a JSON envelope
//! `{ "schemaVersion": 1, "records": [...] }`. Decoding is deliberately
//! forgiving: a missing payload, unparseable text, or an unknown schema
//! version all decode to an empty table. Losing a session's local state is
//! preferable to refusing to start.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Current on-disk schema version. Bump whenever a table's record layout
/// changes in a way old readers cannot absorb.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a, T> {
    schema_version: u32,
    records: &'a [T],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    schema_version: u32,
    records: Vec<T>,
}

/// Serialize a table into its persisted envelope form.
pub fn encode<T: Serialize>(records: &[T]) -> Result<String> {
    let envelope = EnvelopeRef {
        schema_version: SCHEMA_VERSION,
        records,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode a persisted table payload. Never fails.
///
/// Payloads written before the envelope existed are bare arrays; those are
/// still accepted. Anything else unreadable degrades to an empty table with
/// a warning.
pub fn decode<T: DeserializeOwned>(table: &str, payload: Option<&str>) -> Vec<T> {
    let Some(text) = payload else {
        return Vec::new();
    };

    match serde_json::from_str::<Envelope<T>>(text) {
        Ok(envelope) if envelope.schema_version <= SCHEMA_VERSION => envelope.records,
        Ok(envelope) => {
            tracing::warn!(
                table,
                version = envelope.schema_version,
                "table written by a newer schema, starting empty"
            );
            Vec::new()
        }
        // Legacy payload: a bare record array without the envelope.
        Err(_) => match serde_json::from_str::<Vec<T>>(text) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(table, error = %e, "unreadable table payload, starting empty");
                Vec::new()
            }
        },
    }
}

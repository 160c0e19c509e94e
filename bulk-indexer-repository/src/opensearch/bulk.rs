//! `_bulk` request bodies and response parsing.
//!
//! A bulk body is a sequence of action/source line pairs. The response holds
//! one item per action, in request order, each carrying its own status and
//! optional error object.

use opensearch::http::request::JsonBody;
use serde_json::{json, Value};

use bulk_indexer_shared::{BulkOutcome, Document};

/// Build the `_bulk` body for the given documents.
pub fn build_bulk_body(documents: &[Document]) -> Vec<JsonBody<Value>> {
    bulk_lines(documents).into_iter().map(JsonBody::from).collect()
}

/// Action and source lines of a `_bulk` body, in request order.
///
/// Every document becomes an `index` action (create or replace) routed to its
/// own index. The `_id` is omitted when the document has none so the engine
/// generates one.
fn bulk_lines(documents: &[Document]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(documents.len() * 2);

    for doc in documents {
        let action = match doc.id() {
            Some(id) => json!({"index": {"_index": doc.index(), "_id": id}}),
            None => json!({"index": {"_index": doc.index()}}),
        };
        lines.push(action);
        lines.push(Value::Object(doc.fields().clone()));
    }

    lines
}

/// Map a `_bulk` response onto one outcome per submitted document.
///
/// Items are matched to documents by position. A document without a
/// matching item is reported as failed, so the result always has exactly
/// `documents.len()` entries.
pub fn parse_bulk_response(documents: &[Document], response: &Value) -> Vec<BulkOutcome> {
    let items = response.get("items").and_then(Value::as_array);

    documents
        .iter()
        .enumerate()
        .map(|(position, doc)| match items.and_then(|items| items.get(position)) {
            Some(item) => outcome_from_item(doc, item),
            None => BulkOutcome::failure(doc, None, "no acknowledgment returned for document"),
        })
        .collect()
}

fn outcome_from_item(doc: &Document, item: &Value) -> BulkOutcome {
    // Each item is keyed by its action name: {"index": {...}}
    let Some(result) = item.as_object().and_then(|o| o.values().next()) else {
        return BulkOutcome::failure(doc, None, format!("malformed bulk item: {}", item));
    };

    let status = result
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok());

    if let Some(error) = result.get("error") {
        return BulkOutcome::failure(doc, status, describe_error(error));
    }

    match status {
        Some(code) if code >= 300 => {
            BulkOutcome::failure(doc, status, format!("item failed with status {}", code))
        }
        _ => BulkOutcome::success(doc, status, result.get("_id").and_then(Value::as_str)),
    }
}

/// Render an item error as `<type>: <reason>`, falling back to raw JSON.
fn describe_error(error: &Value) -> String {
    let kind = error.get("type").and_then(Value::as_str);
    let reason = error.get("reason").and_then(Value::as_str);

    match (kind, reason) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (Some(kind), None) => kind.to_string(),
        (None, Some(reason)) => reason.to_string(),
        (None, None) => match error.as_str() {
            Some(s) => s.to_string(),
            None => error.to_string(),
        },
    }
}

//! Batch assembly
//!
//! One call answers with a bare object, several calls with an array of the
//! entries that were not suppressed, zero calls with nothing at all.

use serde::Serialize;

use crate::jsonrpc::response::ResponseEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchOutput {
    Single(ResponseEntry),
    Batch(Vec<ResponseEntry>),
}

impl BatchOutput {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// `entries` holds one slot per input call, in input order.
pub fn assemble(entries: Vec<Option<ResponseEntry>>) -> Option<BatchOutput> {
    match entries.len() {
        0 => None,
        1 => entries.into_iter().flatten().next().map(BatchOutput::Single),
        _ => Some(BatchOutput::Batch(entries.into_iter().flatten().collect())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn entry(id: i64) -> ResponseEntry {
        ResponseEntry::success(None, Some(json!(id)), json!(id * 10))
    }

    #[test]
    fn zero_calls_emit_nothing() {
        assert_eq!(assemble(vec![]), None);
    }

    #[test]
    fn one_call_emits_bare_object() {
        let output = assemble(vec![Some(entry(1))]).expect("output");

        let text = output.to_json().expect("serialize");
        assert_eq!(text, r#"{"id":1,"result":10}"#);
    }

    #[test]
    fn suppressed_single_call_emits_nothing() {
        assert_eq!(assemble(vec![None]), None);
    }

    #[test]
    fn many_calls_keep_order_and_drop_suppressed() {
        let output =
            assemble(vec![Some(entry(3)), None, Some(entry(1)), Some(entry(2))]).expect("output");

        let value: Value = serde_json::from_str(&output.to_json().expect("serialize"))
            .expect("valid json");
        let ids: Vec<Value> = value
            .as_array()
            .expect("array")
            .iter()
            .map(|item| item["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(3), json!(1), json!(2)]);
    }

    #[test]
    fn fully_suppressed_batch_is_empty_array() {
        let output = assemble(vec![None, None]).expect("output");

        assert_eq!(output.to_json().expect("serialize"), "[]");
        assert_eq!(output, BatchOutput::Batch(vec![]));
    }
}

//! JSON serialisation of output trees and render results.

use crate::error::{Error, Result};
use serde::Serialize;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an output tree (or a whole [`RenderResult`](super::RenderResult))
/// to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Element, Output, RenderResult, RenderStats};

    #[test]
    fn test_to_json_pretty() {
        let out = Output::container(true, vec![Element::new("p").into()]);
        let json = to_json(&out, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"kind\": \"container\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let result = RenderResult::new(Output::text("hi"), RenderStats::default());
        let json = to_json(&result, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"node_count\":0"));
    }

    #[test]
    fn test_output_deserializes_back() {
        let out = Output::Link {
            href: "/about".into(),
            children: vec![Output::Break],
        };
        let json = to_json(&out, JsonFormat::Compact).unwrap();
        assert_eq!(serde_json::from_str::<Output>(&json).unwrap(), out);
    }
}

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use super::types::GradingResult;

/// Parse the model's raw reply into a `GradingResult`.
///
/// Two-tier strategy: first try to locate a JSON object embedded anywhere
/// in the text (models wrap it in prose or fences more often than not);
/// if no object parses, fall back to a `score: <number>` pattern search.
/// Malformed output is never an error — the model is not guaranteed to
/// comply with the requested schema.
pub fn parse_grading_response(
    raw: &str,
    max_points: u32,
    question_number: Option<String>,
) -> GradingResult {
    if let Some(value) = find_embedded_json(raw) {
        let score = number_field(&value, "score").unwrap_or(0.0);
        let feedback = value
            .get("feedback")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| raw.trim().to_string());
        let rubric_alignment = alignment_map(&value);
        return GradingResult::new(score, max_points, feedback, rubric_alignment, question_number);
    }

    // Fallback: no parseable JSON anywhere in the reply.
    let score = fallback_score(raw).clamp(0.0, f64::from(max_points));
    let overall = if max_points == 0 {
        0.0
    } else {
        score / f64::from(max_points)
    };
    let mut rubric_alignment = BTreeMap::new();
    rubric_alignment.insert("overall".to_string(), overall);

    GradingResult::new(
        score,
        max_points,
        raw.trim().to_string(),
        rubric_alignment,
        question_number,
    )
}

/// Locate the first parseable JSON object embedded in the text.
///
/// Scans each `{` and matches its closing brace (string- and escape-aware),
/// so fenced blocks, leading prose, and trailing commentary are all
/// tolerated.
fn find_embedded_json(text: &str) -> Option<Value> {
    let mut from = 0;
    while let Some(open) = text[from..].find('{').map(|i| i + from) {
        if let Some(close) = matching_brace(text, open) {
            if let Ok(value) = serde_json::from_str::<Value>(&text[open..=close]) {
                if value.is_object() {
                    return Some(value);
                }
            }
        }
        from = open + 1;
    }
    None
}

/// Byte offset of the brace closing the object opened at `open`.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Read a numeric field, accepting quoted numbers as well.
fn number_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extract the per-criterion alignment map, clamping values to [0, 1].
/// Non-numeric entries are skipped rather than failing the parse.
fn alignment_map(value: &Value) -> BTreeMap<String, f64> {
    let mut map = BTreeMap::new();
    if let Some(obj) = value.get("rubric_alignment").and_then(Value::as_object) {
        for (criterion, v) in obj {
            let score = match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            if let Some(s) = score {
                map.insert(criterion.clone(), s.clamp(0.0, 1.0));
            }
        }
    }
    map
}

/// Case-insensitive `score: <number>` search over the raw text.
fn fallback_score(raw: &str) -> f64 {
    let pattern = Regex::new(r"(?i)score\s*[:=]?\s*(\d+(?:\.\d+)?)").unwrap();
    pattern
        .captures(raw)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

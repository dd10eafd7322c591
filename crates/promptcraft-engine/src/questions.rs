use promptcraft_core::{Category, QuestionDefinition, QuestionKind, QuestionList};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum QuestionParseError {
    #[error("No JSON array found in model output")]
    NoArrayFound,

    #[error("Failed to parse questions JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Extract and validate the question array in a model reply.
///
/// The array is the span from the first `[` to the last `]`. Entries are
/// repaired rather than rejected: a missing id becomes `q_<index>`, an
/// unknown type becomes single-choice, missing text and options get
/// placeholders. At most [`promptcraft_core::MAX_QUESTIONS`] are kept.
pub fn parse_generated_questions(
    output: &str,
    category: Category,
) -> Result<QuestionList, QuestionParseError> {
    let (Some(start), Some(end)) = (output.find('['), output.rfind(']')) else {
        return Err(QuestionParseError::NoArrayFound);
    };
    if end < start {
        return Err(QuestionParseError::NoArrayFound);
    }

    let json_str = &output[start..=end];
    debug!(json_len = json_str.len(), "Found question array");

    let value: Value = serde_json::from_str(json_str)?;
    let entries = value.as_array().ok_or(QuestionParseError::NoArrayFound)?;

    let questions = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_entry(index, entry))
        .collect();

    Ok(QuestionList::new(category, questions))
}

fn validate_entry(index: usize, entry: &Value) -> QuestionDefinition {
    let id = entry
        .get("id")
        .and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| format!("q_{}", index));

    let kind = match entry.get("type").and_then(Value::as_str) {
        Some("yesno") => QuestionKind::BooleanChoice,
        Some("chips") => QuestionKind::MultiChoice,
        _ => QuestionKind::SingleChoice,
    };

    let prompt = entry
        .get("question")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("Please provide more details")
        .to_string();

    let options = match entry.get("options").and_then(Value::as_array) {
        Some(values) => values
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        None => vec![
            "Option 1".to_string(),
            "Option 2".to_string(),
            "Option 3".to_string(),
        ],
    };

    let allow_multiple = entry
        .get("multiSelect")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    QuestionDefinition {
        id,
        kind,
        prompt,
        options,
        allow_multiple,
    }
}

/// Generic questions used when generation fails
pub fn fallback_questions(category: Category) -> QuestionList {
    QuestionList::new(
        category,
        vec![
            QuestionDefinition::single_choice(
                "detail_level",
                "How detailed should the result be?",
                &[
                    "Brief overview",
                    "Moderate detail",
                    "Very comprehensive",
                    "Step-by-step guide",
                ],
            ),
            QuestionDefinition::single_choice(
                "purpose",
                "What is the main purpose?",
                &[
                    "Learning/Education",
                    "Professional work",
                    "Personal project",
                    "Quick reference",
                ],
            ),
            QuestionDefinition::boolean_choice("include_examples", "Should it include examples?"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_array() {
        let output = r#"Here are your questions:
[
  {"id": "subject", "type": "mcq", "question": "Which cat?", "options": ["Tabby", "Siamese"]},
  {"id": "night", "type": "yesno", "question": "Night scene?"},
  {"id": "props", "type": "chips", "question": "Props?", "options": ["Moon", "Chimney"], "multiSelect": true}
]
Hope this helps!"#;

        let list = parse_generated_questions(output, Category::Image).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.category, Category::Image);

        let props = list.get(2).unwrap();
        assert_eq!(props.kind, QuestionKind::MultiChoice);
        assert!(props.allow_multiple);
        assert_eq!(props.options, vec!["Moon", "Chimney"]);
        assert_eq!(list.get(1).unwrap().kind, QuestionKind::BooleanChoice);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let output = r#"[{"type": "dropdown"}, {"id": "", "type": "chips", "options": ["a"]}]"#;
        let list = parse_generated_questions(output, Category::Chat).unwrap();

        let first = list.get(0).unwrap();
        assert_eq!(first.id, "q_0");
        assert_eq!(first.kind, QuestionKind::SingleChoice);
        assert_eq!(first.prompt, "Please provide more details");
        assert_eq!(first.options, vec!["Option 1", "Option 2", "Option 3"]);
        assert!(!first.allow_multiple);

        let second = list.get(1).unwrap();
        assert_eq!(second.id, "q_1");
        assert!(!second.allow_multiple);
    }

    #[test]
    fn test_truncates_to_six() {
        let entries: Vec<String> = (0..9)
            .map(|i| format!(r#"{{"id": "q{}", "type": "yesno", "question": "?"}}"#, i))
            .collect();
        let output = format!("[{}]", entries.join(","));

        let list = parse_generated_questions(&output, Category::Research).unwrap();
        assert_eq!(list.len(), 6);
        assert_eq!(list.get(5).unwrap().id, "q5");
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(
            parse_generated_questions("I can't help with that.", Category::Chat),
            Err(QuestionParseError::NoArrayFound)
        ));
        assert!(matches!(
            parse_generated_questions("] backwards [", Category::Chat),
            Err(QuestionParseError::NoArrayFound)
        ));
        assert!(matches!(
            parse_generated_questions("[not json]", Category::Chat),
            Err(QuestionParseError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_fallback_questions() {
        let list = fallback_questions(Category::Video);
        let ids: Vec<_> = list.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["detail_level", "purpose", "include_examples"]);
        assert_eq!(list.category, Category::Video);
    }
}

//! Requirements artifact parsed from the extraction model's reply

use serde::Serialize;
use serde_json::Value;

/// Functional and non-functional requirements
///
/// The model is asked for JSON but the schema is loose: the object may be
/// wrapped in prose or a code fence, and list items may be strings or
/// objects. `raw` always keeps the reply as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequirementsArtifact {
    pub raw: String,
    pub functional: Vec<String>,
    pub non_functional: Vec<String>,
}

impl RequirementsArtifact {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let Some(object) = embedded_json_object(&raw) else {
            return Self {
                raw,
                ..Self::default()
            };
        };

        Self {
            functional: string_list(object.get("functional_requirements")),
            non_functional: string_list(object.get("non_functional_requirements")),
            raw,
        }
    }

    /// True when the JSON carried at least one requirement
    pub fn is_structured(&self) -> bool {
        !self.functional.is_empty() || !self.non_functional.is_empty()
    }
}

/// The outermost `{ ... }` span of `text`, if it parses as a JSON object
fn embedded_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_json() {
        let reply = r#"Here you go:
```json
{
  "functional_requirements": ["Create todo item", "Delete todo item"],
  "non_functional_requirements": ["Scalability"]
}
```"#;
        let artifact = RequirementsArtifact::parse(reply);

        assert_eq!(artifact.functional, vec!["Create todo item", "Delete todo item"]);
        assert_eq!(artifact.non_functional, vec!["Scalability"]);
        assert_eq!(artifact.raw, reply);
        assert!(artifact.is_structured());
    }

    #[test]
    fn test_object_items_are_stringified() {
        let artifact = RequirementsArtifact::parse(
            r#"{"functional_requirements": [{"id": 1, "text": "Login"}], "non_functional_requirements": "Fast"}"#,
        );
        assert_eq!(artifact.functional, vec![r#"{"id":1,"text":"Login"}"#]);
        assert_eq!(artifact.non_functional, vec!["Fast"]);
    }

    #[test]
    fn test_prose_is_kept_raw() {
        let artifact = RequirementsArtifact::parse("  Users can add tasks.  ");
        assert_eq!(artifact.raw, "Users can add tasks.");
        assert!(!artifact.is_structured());
    }
}

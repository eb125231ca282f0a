//! Validation of evaluation service payloads.
//!
//! The service's schema is not ours. We accept a positional payload whose
//! element (or field) `1` is a sequence of entity records, and the
//! `{"score", "feedback"}` object the reference backend answers with.
//! Anything else is [`EvaluationError::MalformedResponse`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EvaluationError;

/// One extraction returned by the service, passed through untouched. The
/// record can be any JSON value; `text` and `label` are read from object
/// records, and only for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Value);

impl Entity {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Field `key` of an object record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object()?.get(key)
    }

    pub fn text(&self) -> Option<&str> {
        self.get("text").and_then(Value::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.get("label").and_then(Value::as_str)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Entity {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A validated evaluation result.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResponse {
    /// Positional payload. `head` is element `0`, kept but not interpreted.
    Entities { head: Value, entities: Vec<Entity> },
    /// Score out of 100 plus improvement hints.
    Scored { score: u32, feedback: Vec<String> },
}

impl AnalysisResponse {
    /// Parse and validate a raw response body.
    pub fn parse(body: &str) -> Result<Self, EvaluationError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| EvaluationError::malformed(format!("body is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, EvaluationError> {
        match value {
            Value::Array(mut items) => {
                if items.len() < 2 {
                    return Err(EvaluationError::malformed(format!(
                        "expected an entity sequence at position 1, array has {} element(s)",
                        items.len()
                    )));
                }
                let entities = entities_from(items.swap_remove(1))?;
                let head = items.swap_remove(0);
                Ok(Self::Entities { head, entities })
            }
            Value::Object(mut map) => {
                if let Some(seq) = map.remove("1") {
                    let entities = entities_from(seq)?;
                    let head = map.remove("0").unwrap_or(Value::Null);
                    return Ok(Self::Entities { head, entities });
                }
                match serde_json::from_value::<ScoredBody>(Value::Object(map)) {
                    Ok(scored) => Ok(Self::Scored {
                        score: scored.score,
                        feedback: scored.feedback,
                    }),
                    Err(_) => Err(EvaluationError::malformed(
                        "object has no field \"1\" and is not a score/feedback report",
                    )),
                }
            }
            other => Err(EvaluationError::malformed(format!(
                "expected a JSON array or object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Entities carried by the response (empty for a score report).
    pub fn entities(&self) -> &[Entity] {
        match self {
            Self::Entities { entities, .. } => entities,
            Self::Scored { .. } => &[],
        }
    }
}

#[derive(Deserialize)]
struct ScoredBody {
    score: u32,
    feedback: Vec<String>,
}

fn entities_from(seq: Value) -> Result<Vec<Entity>, EvaluationError> {
    match seq {
        Value::Array(items) => Ok(items.into_iter().map(Entity::new).collect()),
        other => Err(EvaluationError::malformed(format!(
            "element 1 is {}, not a sequence",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reason(result: Result<AnalysisResponse, EvaluationError>) -> String {
        match result {
            Err(EvaluationError::MalformedResponse { reason }) => reason,
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn positional_array() {
        let resp = AnalysisResponse::parse(r#"["ok", [{"text":"user","label":"ROLE"}]]"#).unwrap();
        match &resp {
            AnalysisResponse::Entities { head, entities } => {
                assert_eq!(head, &json!("ok"));
                assert_eq!(entities.len(), 1);
                assert_eq!(entities[0].text(), Some("user"));
                assert_eq!(entities[0].label(), Some("ROLE"));
            }
            _ => panic!("expected Entities"),
        }
    }

    #[test]
    fn order_is_preserved() {
        let resp = AnalysisResponse::from_value(json!([
            null,
            [{"text": "a"}, {"text": "b"}, {"text": "c"}]
        ]))
        .unwrap();
        let texts: Vec<_> = resp.entities().iter().filter_map(Entity::text).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn extra_elements_are_ignored() {
        let resp = AnalysisResponse::from_value(json!(["x", [], "trailing"])).unwrap();
        assert!(resp.entities().is_empty());
    }

    #[test]
    fn object_with_field_one() {
        let resp =
            AnalysisResponse::from_value(json!({"0": "meta", "1": [{"text": "t"}]})).unwrap();
        assert_eq!(
            resp,
            AnalysisResponse::Entities {
                head: json!("meta"),
                entities: vec![Entity::new(json!({"text": "t"}))],
            }
        );
    }

    #[test]
    fn opaque_fields_pass_through() {
        let resp = AnalysisResponse::from_value(json!([
            0,
            [{"start": 3, "end": 7, "score": 0.9, "nested": {"k": [1, 2]}}]
        ]))
        .unwrap();
        let entity = &resp.entities()[0];
        assert_eq!(entity.text(), None);
        assert_eq!(entity.get("nested"), Some(&json!({"k": [1, 2]})));
        assert_eq!(
            entity.clone().into_value(),
            json!({"start": 3, "end": 7, "score": 0.9, "nested": {"k": [1, 2]}})
        );
    }

    #[test]
    fn scored_report() {
        let resp = AnalysisResponse::from_value(json!({
            "score": 45,
            "feedback": ["Define a 'Definition of Done' for the story"]
        }))
        .unwrap();
        assert_eq!(
            resp,
            AnalysisResponse::Scored {
                score: 45,
                feedback: vec!["Define a 'Definition of Done' for the story".into()],
            }
        );
        assert!(resp.entities().is_empty());
    }

    #[test]
    fn missing_position_one() {
        assert!(reason(AnalysisResponse::parse(r#"["ok"]"#)).contains("position 1"));
        assert!(reason(AnalysisResponse::parse("[]")).contains("0 element"));
    }

    #[test]
    fn position_one_not_a_sequence() {
        let r = reason(AnalysisResponse::parse(r#"["ok", {"text": "user"}]"#));
        assert!(r.contains("not a sequence"), "{r}");
        let r = reason(AnalysisResponse::parse(r#"["ok", null]"#));
        assert!(r.contains("null"), "{r}");
    }

    #[test]
    fn non_object_records_pass_through() {
        let resp = AnalysisResponse::from_value(json!([
            "As a user",
            [["user", "ROLE"], ["log in", "ACTION"], "plain", 7, null]
        ]))
        .unwrap();
        let values: Vec<Value> = resp.entities().iter().map(|e| e.value().clone()).collect();
        assert_eq!(
            Value::Array(values),
            json!([["user", "ROLE"], ["log in", "ACTION"], "plain", 7, null])
        );
        assert_eq!(resp.entities()[0].text(), None);
        assert_eq!(resp.entities()[2].get("text"), None);
    }

    #[test]
    fn field_order_survives_serialization() {
        let resp =
            AnalysisResponse::parse(r#"["ok",[{"text":"user","label":"ROLE","start":0}]]"#)
                .unwrap();
        let entity = resp.entities()[0].clone();
        assert_eq!(
            serde_json::to_string(&entity).unwrap(),
            r#"{"text":"user","label":"ROLE","start":0}"#
        );
        assert_eq!(
            entity.into_value().to_string(),
            r#"{"text":"user","label":"ROLE","start":0}"#
        );
    }

    #[test]
    fn unrelated_object() {
        let r = reason(AnalysisResponse::parse(r#"{"status": "ok"}"#));
        assert!(r.contains("no field \"1\""));
        // A score with the wrong type is not a report either.
        assert!(AnalysisResponse::parse(r#"{"score": "high", "feedback": []}"#).is_err());
    }

    #[test]
    fn scalar_body() {
        assert!(reason(AnalysisResponse::parse("42")).contains("a number"));
    }

    #[test]
    fn invalid_json() {
        assert!(reason(AnalysisResponse::parse("<html>")).contains("not valid JSON"));
        assert!(reason(AnalysisResponse::parse("")).contains("not valid JSON"));
    }
}

use crate::core::classifier::infer_type;
use crate::core::normalizer::normalize_domain;
use crate::domain::model::Question;
use crate::utils::error::ValidationErrorKind;
use serde_json::Value;

fn non_empty_str<'a>(value: Option<&'a Value>) -> Option<&'a str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Structural check of a raw question record; the first failing rule wins.
pub fn validate(question: &Value) -> Option<ValidationErrorKind> {
    let Some(fields) = question.as_object() else {
        return Some(ValidationErrorKind::NotAnObject);
    };
    if fields.get("id").and_then(Value::as_i64).is_none() {
        return Some(ValidationErrorKind::MissingOrInvalidId);
    }
    if non_empty_str(fields.get("domain")).is_none() {
        return Some(ValidationErrorKind::MissingDomain);
    }
    if non_empty_str(fields.get("questionText")).is_none() {
        return Some(ValidationErrorKind::MissingText);
    }
    None
}

/// Validates a raw record and resolves its domain and type.
pub fn into_question(
    record: Value,
    group: &str,
) -> std::result::Result<Question, ValidationErrorKind> {
    if let Some(kind) = validate(&record) {
        return Err(kind);
    }
    let Value::Object(fields) = record else {
        return Err(ValidationErrorKind::NotAnObject);
    };

    let id = fields
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(ValidationErrorKind::MissingOrInvalidId)?;
    let raw_domain = fields
        .get("domain")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let domain = normalize_domain(raw_domain)
        .ok_or_else(|| ValidationErrorKind::UnrecognizedDomain(raw_domain.to_string()))?;
    let kind = infer_type(&fields);

    Ok(Question::new(fields, id, domain, kind, group.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Domain, QuestionType};
    use serde_json::json;

    #[test]
    fn test_valid_question() {
        let q = json!({"id": 1, "domain": "People", "questionText": "What is RBAC?"});
        assert_eq!(validate(&q), None);
    }

    #[test]
    fn test_rules_in_order() {
        assert_eq!(validate(&json!([1, 2])), Some(ValidationErrorKind::NotAnObject));
        assert_eq!(
            validate(&json!({"domain": "", "questionText": ""})),
            Some(ValidationErrorKind::MissingOrInvalidId)
        );
        assert_eq!(
            validate(&json!({"id": 1, "questionText": ""})),
            Some(ValidationErrorKind::MissingDomain)
        );
        assert_eq!(
            validate(&json!({"id": 1, "domain": "People", "questionText": ""})),
            Some(ValidationErrorKind::MissingText)
        );
    }

    #[test]
    fn test_id_must_be_integer() {
        for id in [json!("1"), json!(1.5), json!(2.0), json!(true), json!(null)] {
            let q = json!({"id": id, "domain": "People", "questionText": "Q"});
            assert_eq!(validate(&q), Some(ValidationErrorKind::MissingOrInvalidId));
        }
        let negative = json!({"id": -3, "domain": "People", "questionText": "Q"});
        assert_eq!(validate(&negative), None);
    }

    #[test]
    fn test_domain_and_text_must_be_strings() {
        assert_eq!(
            validate(&json!({"id": 1, "domain": 5, "questionText": "Q"})),
            Some(ValidationErrorKind::MissingDomain)
        );
        assert_eq!(
            validate(&json!({"id": 1, "domain": "People", "questionText": ["Q"]})),
            Some(ValidationErrorKind::MissingText)
        );
    }

    #[test]
    fn test_into_question_resolves_domain_and_type() {
        let record = json!({
            "id": 7,
            "domain": " business ",
            "questionText": "Pick two",
            "multiselect": true
        });
        let question = into_question(record, "G1").unwrap();
        assert_eq!(question.id, 7);
        assert_eq!(question.domain, Domain::Business);
        assert_eq!(question.kind, QuestionType::Multiselect);
        assert_eq!(question.group, "G1");
        assert_eq!(question.question_text(), "Pick two");
    }

    #[test]
    fn test_into_question_unrecognized_domain() {
        let record = json!({"id": 1, "domain": "Finance", "questionText": "Q"});
        assert_eq!(
            into_question(record, "G1").unwrap_err(),
            ValidationErrorKind::UnrecognizedDomain("Finance".to_string())
        );
    }
}

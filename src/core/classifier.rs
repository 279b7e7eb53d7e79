use crate::domain::model::QuestionType;
use serde_json::{Map, Value};

/// Marker fields that imply a type when no usable `type` is given, in
/// priority order. The first key present wins.
const TYPE_MARKERS: [(&str, QuestionType); 4] = [
    ("hotspot", QuestionType::Hotspot),
    ("dragdrop", QuestionType::Dragdrop),
    ("multiselect", QuestionType::Multiselect),
    ("fillin", QuestionType::Fillin),
];

/// Where a question's type comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignal {
    /// A `type` string with at least one letter, lowercased, letters only.
    Explicit(String),
    Marker(QuestionType),
    Absent,
}

impl TypeSignal {
    pub fn detect(fields: &Map<String, Value>) -> Self {
        if let Some(raw) = fields.get("type").and_then(Value::as_str) {
            let letters: String = raw
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect();
            if !letters.is_empty() {
                return TypeSignal::Explicit(letters);
            }
        }

        TYPE_MARKERS
            .iter()
            .find(|(key, _)| fields.contains_key(*key))
            .map(|(_, kind)| TypeSignal::Marker(*kind))
            .unwrap_or(TypeSignal::Absent)
    }

    pub fn resolve(&self) -> QuestionType {
        match self {
            TypeSignal::Explicit(name) => match name.as_str() {
                "hot" | "hotspot" => QuestionType::Hotspot,
                "dragdrop" => QuestionType::Dragdrop,
                "multiselect" => QuestionType::Multiselect,
                "fillin" => QuestionType::Fillin,
                _ => QuestionType::Single,
            },
            TypeSignal::Marker(kind) => *kind,
            TypeSignal::Absent => QuestionType::Single,
        }
    }
}

pub fn infer_type(fields: &Map<String, Value>) -> QuestionType {
    TypeSignal::detect(fields).resolve()
}

/// Same as [`infer_type`] for any JSON value; non-objects count as `single`.
pub fn infer_value_type(value: &Value) -> QuestionType {
    value
        .as_object()
        .map(infer_type)
        .unwrap_or(QuestionType::Single)
}

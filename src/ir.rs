use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::InputError;

pub type PersonId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "M" | "m" | "male" | "Male" => Self::Male,
            "F" | "f" | "female" | "Female" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl From<Option<String>> for Gender {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Gender::from_token).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum RelationshipKind {
    Spouse,
    ParentChild,
    Adopted,
    /// Missing, null or unrecognized `type`. Dropped by the graph builder.
    #[default]
    Unknown,
}

impl RelationshipKind {
    pub fn from_token(token: &str) -> Self {
        match token {
            "spouse" => Self::Spouse,
            "parent_child" => Self::ParentChild,
            "adopted" => Self::Adopted,
            _ => Self::Unknown,
        }
    }

    pub fn is_parental(self) -> bool {
        matches!(self, Self::ParentChild | Self::Adopted)
    }
}

impl From<Option<String>> for RelationshipKind {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::from_token).unwrap_or_default()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub death_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gender: Gender::Unknown,
            birth_date: None,
            death_date: None,
            notes: None,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_date(mut self, date: impl Into<String>) -> Self {
        self.birth_date = Some(date.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Relationship {
    pub source: PersonId,
    pub target: PersonId,
    #[serde(rename = "type", default)]
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(source: PersonId, target: PersonId, kind: RelationshipKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    pub fn spouse(a: PersonId, b: PersonId) -> Self {
        Self::new(a, b, RelationshipKind::Spouse)
    }

    pub fn parent_child(parent: PersonId, child: PersonId) -> Self {
        Self::new(parent, child, RelationshipKind::ParentChild)
    }
}

/// How fields outside the documented record shape are treated when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    #[default]
    Ignore,
    Reject,
}

const PERSON_FIELDS: [&str; 6] = ["id", "name", "gender", "birth_date", "death_date", "notes"];
const RELATIONSHIP_FIELDS: [&str; 3] = ["source", "target", "type"];
const DOCUMENT_FIELDS: [&str; 2] = ["persons", "relationships"];

/// The merged family document handed over by the upstream extraction stage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FamilyTree {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(input: &str, unknown: UnknownFields) -> Result<Self, InputError> {
        let value: Value = serde_json::from_str(input)?;
        if unknown == UnknownFields::Reject {
            check_known_fields(&value)?;
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn add_person(&mut self, person: Person) {
        self.persons.push(person);
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }
}

fn check_known_fields(value: &Value) -> Result<(), InputError> {
    check_object("document", value, &DOCUMENT_FIELDS)?;
    let records = [
        ("persons", "person", &PERSON_FIELDS[..]),
        ("relationships", "relationship", &RELATIONSHIP_FIELDS[..]),
    ];
    for (key, record, allowed) in records {
        let Some(items) = value.get(key).and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            check_object(record, item, allowed)?;
        }
    }
    Ok(())
}

fn check_object(record: &str, value: &Value, allowed: &[&str]) -> Result<(), InputError> {
    let Some(map) = value.as_object() else {
        return Ok(());
    };
    if let Some(field) = map.keys().find(|key| !allowed.contains(&key.as_str())) {
        return Err(InputError::UnknownField {
            record: record.to_string(),
            field: field.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "persons": [
            {"id": 1, "name": "Gunichi", "gender": "M", "birth_date": "Meiji 30", "death_date": null, "notes": null},
            {"id": 2, "name": "Hanako", "gender": "F"},
            {"id": 3, "name": "Teruo", "gender": null, "age_hint": 4}
        ],
        "relationships": [
            {"source": 1, "target": 2, "type": "spouse"},
            {"source": 1, "target": 3, "type": "parent_child"},
            {"source": 2, "target": 3, "type": "guardian"}
        ]
    }"#;

    #[test]
    fn parses_document_and_ignores_extra_fields() {
        let tree = FamilyTree::from_json(SAMPLE, UnknownFields::Ignore).unwrap();
        assert_eq!(tree.persons.len(), 3);
        assert_eq!(tree.persons[0].gender, Gender::Male);
        assert_eq!(tree.persons[1].gender, Gender::Female);
        assert_eq!(tree.persons[2].gender, Gender::Unknown);
        assert_eq!(tree.persons[0].birth_date.as_deref(), Some("Meiji 30"));
        assert_eq!(tree.persons[1].notes, None);
        assert_eq!(tree.relationships[0].kind, RelationshipKind::Spouse);
        assert_eq!(tree.relationships[2].kind, RelationshipKind::Unknown);
    }

    #[test]
    fn strict_mode_names_the_offending_field() {
        let err = FamilyTree::from_json(SAMPLE, UnknownFields::Reject).unwrap_err();
        match err {
            InputError::UnknownField { record, field } => {
                assert_eq!(record, "person");
                assert_eq!(field, "age_hint");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_arrays_are_empty() {
        let tree = FamilyTree::from_json("{}", UnknownFields::Reject).unwrap();
        assert!(tree.persons.is_empty());
        assert!(tree.relationships.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            FamilyTree::from_json("{\"persons\": [", UnknownFields::Ignore),
            Err(InputError::Json(_))
        ));
    }

    #[test]
    fn null_name_and_type_degrade_instead_of_failing() {
        let tree = FamilyTree::from_json(
            r#"{
                "persons": [{"id": 1, "name": null}, {"id": 2}],
                "relationships": [
                    {"source": 1, "target": 2, "type": null},
                    {"source": 1, "target": 2}
                ]
            }"#,
            UnknownFields::Reject,
        )
        .unwrap();
        assert_eq!(tree.persons[0].name, "");
        assert_eq!(tree.persons[1].name, "");
        assert_eq!(tree.relationships[0].kind, RelationshipKind::Unknown);
        assert_eq!(tree.relationships[1].kind, RelationshipKind::Unknown);
    }
}

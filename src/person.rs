//! Person records and their conversion from untrusted JSON input.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::Deserialize;

use crate::error::{NameplateError, Result};

/// Role a person fills on the vehicle; printed under the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Field crew.
    Mannschaft,
    /// Driver.
    Kraftfahrer,
    /// Command.
    Fuehrung,
}

impl Function {
    pub const ALL: [Function; 3] = [Function::Mannschaft, Function::Kraftfahrer, Function::Fuehrung];

    pub fn label(&self) -> &'static str {
        match self {
            Function::Mannschaft => "Mannschaft",
            Function::Kraftfahrer => "Kraftfahrer",
            Function::Fuehrung => "Führung",
        }
    }
}

impl FromStr for Function {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Function::ALL
            .into_iter()
            .find(|function| function.label() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every qualification key a person can carry. Technical keys come first,
/// leading roles follow in ascending rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Qualification {
    Th,
    Agt,
    Maschinist,
    Kettensaege,
    KlasseC,
    Truppmann,
    Truppfuehrer,
    Gruppenfuehrer,
    Zugfuehrer,
    Verbandsfuehrer,
}

impl Qualification {
    pub const TECHNICAL: [Qualification; 5] = [
        Qualification::Th,
        Qualification::Agt,
        Qualification::Maschinist,
        Qualification::Kettensaege,
        Qualification::KlasseC,
    ];

    /// Leading roles in ascending rank.
    pub const LEADING: [Qualification; 5] = [
        Qualification::Truppmann,
        Qualification::Truppfuehrer,
        Qualification::Gruppenfuehrer,
        Qualification::Zugfuehrer,
        Qualification::Verbandsfuehrer,
    ];

    pub fn all() -> impl Iterator<Item = Qualification> {
        Self::TECHNICAL.into_iter().chain(Self::LEADING)
    }

    /// Key used in input data.
    pub fn key(&self) -> &'static str {
        match self {
            Qualification::Th => "TH",
            Qualification::Agt => "AGT",
            Qualification::Maschinist => "Maschinist",
            Qualification::Kettensaege => "Kettensäge",
            Qualification::KlasseC => "Klasse C",
            Qualification::Truppmann => "Truppmann",
            Qualification::Truppfuehrer => "Truppführer",
            Qualification::Gruppenfuehrer => "Gruppenführer",
            Qualification::Zugfuehrer => "Zugführer",
            Qualification::Verbandsfuehrer => "Verbandsführer",
        }
    }

    pub fn from_key(key: &str) -> Option<Qualification> {
        Self::all().find(|q| q.key() == key)
    }

    pub fn is_leading(&self) -> bool {
        Self::LEADING.contains(self)
    }
}

/// Vehicle briefing and whether the person has completed it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instruction {
    pub vehicle: String,
    pub value: bool,
}

impl Instruction {
    pub fn new(vehicle: impl Into<String>, value: bool) -> Self {
        Self { vehicle: vehicle.into(), value }
    }
}

/// A validated person. Every qualification key has an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub personnel_id: Option<String>,
    pub image_url: Option<String>,
    pub function: Function,
    pub qualifications: BTreeMap<Qualification, bool>,
    pub instructions: Vec<Instruction>,
}

impl Person {
    /// A person holding no qualifications and no instructions.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, function: Function) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            personnel_id: None,
            image_url: None,
            function,
            qualifications: Qualification::all().map(|q| (q, false)).collect(),
            instructions: Vec::new(),
        }
    }

    pub fn with_qualification(mut self, qualification: Qualification) -> Self {
        self.qualifications.insert(qualification, true);
        self
    }

    pub fn with_instruction(mut self, vehicle: impl Into<String>, value: bool) -> Self {
        self.instructions.push(Instruction::new(vehicle, value));
        self
    }

    pub fn with_personnel_id(mut self, id: impl Into<String>) -> Self {
        self.personnel_id = Some(id.into());
        self
    }

    pub fn has(&self, qualification: Qualification) -> bool {
        self.qualifications.get(&qualification).copied().unwrap_or(false)
    }

    /// "Last, First", used in logs and errors.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Qualifications as they arrive: a list of held keys or a key to flag map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QualificationsInput {
    Held(Vec<String>),
    Flags(BTreeMap<String, bool>),
}

impl Default for QualificationsInput {
    fn default() -> Self {
        QualificationsInput::Held(Vec::new())
    }
}

/// Raw person as read from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonInput {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub personnel_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub qualifications: QualificationsInput,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

impl TryFrom<PersonInput> for Person {
    type Error = NameplateError;

    fn try_from(input: PersonInput) -> Result<Self> {
        let name = format!("{}, {}", input.last_name, input.first_name);

        let function = input.function.as_deref().unwrap_or_default();
        let function = function
            .parse::<Function>()
            .map_err(|value| NameplateError::UnknownFunction { person: name.clone(), value })?;

        let held: Vec<(String, bool)> = match input.qualifications {
            QualificationsInput::Held(keys) => keys.into_iter().map(|key| (key, true)).collect(),
            QualificationsInput::Flags(flags) => flags.into_iter().collect(),
        };

        let mut qualifications: BTreeMap<Qualification, bool> =
            Qualification::all().map(|q| (q, false)).collect();
        for (key, value) in held {
            match Qualification::from_key(&key) {
                Some(q) => {
                    qualifications.insert(q, value);
                }
                None => warn!("Ignoring unknown qualification '{}' for {}", key, name),
            }
        }

        Ok(Person {
            first_name: input.first_name,
            last_name: input.last_name,
            personnel_id: input.personnel_id.filter(|id| !id.is_empty()),
            image_url: input.image_url.filter(|url| !url.is_empty()),
            function,
            qualifications,
            instructions: input.instructions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Person> {
        let input: PersonInput = serde_json::from_str(json).unwrap();
        Person::try_from(input)
    }

    #[test]
    fn held_list_fills_every_key() {
        let person = parse(
            r#"{
                "first_name": "Anna",
                "last_name": "Müller",
                "personnel_id": null,
                "image_url": null,
                "function": "Mannschaft",
                "qualifications": ["AGT", "Truppführer"],
                "instructions": [{"vehicle": "LF 20", "value": true}]
            }"#,
        )
        .unwrap();

        assert_eq!(person.function, Function::Mannschaft);
        assert_eq!(person.qualifications.len(), 10);
        assert!(person.has(Qualification::Agt));
        assert!(person.has(Qualification::Truppfuehrer));
        assert!(!person.has(Qualification::Th));
        assert_eq!(person.instructions, vec![Instruction::new("LF 20", true)]);
    }

    #[test]
    fn flag_map_defaults_missing_keys_and_ignores_unknown() {
        let person = parse(
            r#"{
                "first_name": "Ben",
                "last_name": "Schulz",
                "function": "Führung",
                "qualifications": {"TH": true, "Kettensäge": false, "Sprechfunk": true}
            }"#,
        )
        .unwrap();

        assert_eq!(person.function, Function::Fuehrung);
        assert!(person.has(Qualification::Th));
        assert!(!person.has(Qualification::Kettensaege));
        assert!(Qualification::all().all(|q| person.qualifications.contains_key(&q)));
    }

    #[test]
    fn unknown_function_names_person_and_value() {
        let err = parse(r#"{"first_name": "Carl", "last_name": "Weber", "function": "Koch"}"#).unwrap_err();
        match err {
            NameplateError::UnknownFunction { person, value } => {
                assert_eq!(person, "Weber, Carl");
                assert_eq!(value, "Koch");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_function_is_rejected() {
        assert!(parse(r#"{"first_name": "Dora", "last_name": "Klein"}"#).is_err());
    }

    #[test]
    fn qualification_keys_round_trip() {
        for q in Qualification::all() {
            assert_eq!(Qualification::from_key(q.key()), Some(q));
        }
        assert!(Qualification::Zugfuehrer.is_leading());
        assert!(!Qualification::KlasseC.is_leading());
    }
}

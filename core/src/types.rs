//! Domain DTOs for the PetFriends API.
//!
//! # Design
//! The client never stores pets. `Pet` and `PetList` only exist so callers
//! can turn a `ResponseBody::Json` into typed values with
//! `ApiResponse::deserialize`. They are defined independently of the mock
//! server's types; integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// Credential returned by `GET api/key`, sent as the `auth_key` header on
/// every other call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Which pets `get_list_of_pets` asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PetFilter {
    /// Every pet on the server (`filter=`).
    #[default]
    All,
    /// Only pets owned by the caller (`filter=my_pets`).
    MyPets,
    /// Any other value, sent verbatim. The server decides whether it is valid.
    Other(String),
}

impl PetFilter {
    pub fn as_str(&self) -> &str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
            PetFilter::Other(raw) => raw,
        }
    }
}

impl From<&str> for PetFilter {
    fn from(raw: &str) -> Self {
        match raw {
            "" => PetFilter::All,
            "my_pets" => PetFilter::MyPets,
            other => PetFilter::Other(other.to_string()),
        }
    }
}

/// Text fields sent by add, update and create-simple.
///
/// `age` is a string for every operation so it goes over the wire exactly
/// as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetDetails {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

impl PetDetails {
    pub fn new(
        name: impl Into<String>,
        animal_type: impl Into<String>,
        age: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.into(),
        }
    }

    pub(crate) fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("name", &self.name),
            ("animal_type", &self.animal_type),
            ("age", &self.age),
        ]
    }
}

/// A pet record as the server returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: String,
}

/// Body of a successful `GET api/pets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

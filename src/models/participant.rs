//! Meeting participant model

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A meeting attendee with a resolved position
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Participant {
    /// Caller-supplied identifier
    pub id: String,
    /// Display name, if known
    #[serde(default)]
    pub name: Option<String>,
    /// Resolved position of the participant
    pub coordinate: Coordinate,
}

impl Participant {
    #[must_use]
    pub fn new<S: Into<String>>(id: S, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: None,
            coordinate,
        }
    }

    #[must_use]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }
}

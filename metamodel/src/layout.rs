//! Layout grouping: field set ids and names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::naming::{decapitalize, natural_name};

/// Id and display name of a layout group (field set).
///
/// Either half may be inferred from the other; see [`GroupIdAndName::infer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupIdAndName {
    id: String,
    name: String,
}

impl GroupIdAndName {
    /// Creates a group from an explicit id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Infers whichever half is missing.
    ///
    /// Blank values count as absent. Given only a name, the id is the name
    /// with whitespace removed and its first character lower-cased. Given
    /// only an id, the name is its natural form. Given neither, there is
    /// nothing to infer from and `None` is returned.
    #[must_use]
    pub fn infer(id: Option<&str>, name: Option<&str>) -> Option<Self> {
        let id = id.map(str::trim).filter(|s| !s.is_empty());
        let name = name.map(str::trim).filter(|s| !s.is_empty());
        match (id, name) {
            (Some(id), Some(name)) => Some(Self::new(id, name)),
            (Some(id), None) => Some(Self::new(id, natural_name(id))),
            (None, Some(name)) => Some(Self::new(id_from_name(name), name)),
            (None, None) => None,
        }
    }

    /// Infers the name from an id.
    #[must_use]
    pub fn for_id(id: &str) -> Option<Self> {
        Self::infer(Some(id), None)
    }

    /// Infers the id from a name.
    #[must_use]
    pub fn for_name(name: &str) -> Option<Self> {
        Self::infer(None, Some(name))
    }

    /// The group id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The group display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for GroupIdAndName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

fn id_from_name(name: &str) -> String {
    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    decapitalize(&compact)
}

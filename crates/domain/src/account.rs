use serde::{Deserialize, Serialize};

use volsweep_core::{AppResult, NonEmptyString};

/// One target account enrolled in the sweep, as listed by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    name: NonEmptyString,
    id: NonEmptyString,
}

impl Account {
    /// Creates a validated account entry.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            id: NonEmptyString::new(id)?,
        })
    }

    /// Returns the account alias.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A customer record. Identity is fixed at construction; the name changes
/// only by replacing the whole record through a repository update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

impl Customer {
    /// Constructs a customer with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(CustomerId::random(), name)
    }

    /// Constructs a customer with the given id, preserved verbatim.
    pub fn with_id(id: CustomerId, name: impl Into<String>) -> Self {
        let name = name.into();
        tracing::debug!(customer_id = %id, name = %name, "customer constructed");
        Self { id, name }
    }
}

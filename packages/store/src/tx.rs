//! Entity-keyed transaction builder.
//!
//! Mutations are described as a list of [`TxStep`]s and handed to
//! [`NotesDb::transact`](crate::live::NotesDb::transact) in one call:
//!
//! ```
//! use store::tx::{new_id, Tx};
//!
//! let step = Tx::notes(new_id()).update(serde_json::json!({ "body": "hi" }));
//! assert_eq!(step.namespace(), "notes");
//! ```

use serde_json::{Map, Value};

use crate::models::NOTES_NAMESPACE;

/// Generate a fresh client-side entity id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Entry point of the builder.
pub struct Tx;

impl Tx {
    /// Address an entity in any namespace.
    pub fn entity(namespace: impl Into<String>, id: impl Into<String>) -> EntityRef {
        EntityRef {
            namespace: namespace.into(),
            id: id.into(),
        }
    }

    /// Address a note by id.
    pub fn notes(id: impl Into<String>) -> EntityRef {
        Self::entity(NOTES_NAMESPACE, id)
    }
}

/// A namespace + id pair waiting for an operation.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityRef {
    namespace: String,
    id: String,
}

impl EntityRef {
    /// Create the entity or merge `attrs` into it. Non-object values are
    /// treated as an empty attribute set.
    pub fn update(self, attrs: Value) -> TxStep {
        let attrs = match attrs {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        TxStep::Update {
            namespace: self.namespace,
            id: self.id,
            attrs,
        }
    }

    pub fn delete(self) -> TxStep {
        TxStep::Delete {
            namespace: self.namespace,
            id: self.id,
        }
    }
}

/// One operation inside a transaction.
#[derive(Clone, Debug, PartialEq)]
pub enum TxStep {
    Update {
        namespace: String,
        id: String,
        attrs: Map<String, Value>,
    },
    Delete {
        namespace: String,
        id: String,
    },
}

impl TxStep {
    pub fn namespace(&self) -> &str {
        match self {
            TxStep::Update { namespace, .. } | TxStep::Delete { namespace, .. } => namespace,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TxStep::Update { id, .. } | TxStep::Delete { id, .. } => id,
        }
    }

    /// Encode as the hosted database's step tuple: `["update", ns, id, attrs]`.
    pub fn to_wire(&self) -> Value {
        match self {
            TxStep::Update {
                namespace,
                id,
                attrs,
            } => Value::Array(vec![
                Value::from("update"),
                Value::from(namespace.as_str()),
                Value::from(id.as_str()),
                Value::Object(attrs.clone()),
            ]),
            TxStep::Delete { namespace, id } => Value::Array(vec![
                Value::from("delete"),
                Value::from(namespace.as_str()),
                Value::from(id.as_str()),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_step_wire_form() {
        let step = Tx::notes("abc").update(json!({ "body": "x", "createdAt": 5 }));
        assert_eq!(
            step.to_wire(),
            json!(["update", "notes", "abc", { "body": "x", "createdAt": 5 }])
        );
    }

    #[test]
    fn test_delete_step_wire_form() {
        let step = Tx::entity("todos", "t1").delete();
        assert_eq!(step.to_wire(), json!(["delete", "todos", "t1"]));
        assert_eq!(step.namespace(), "todos");
        assert_eq!(step.id(), "t1");
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}

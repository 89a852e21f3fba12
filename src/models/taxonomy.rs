use serde_json::Value;

use crate::normalize::{first_str, id_of};

/// A category or a location; both are `{ id, name }` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaxonomyEntry {
    pub id: String,
    pub name: String,
}

pub type Category = TaxonomyEntry;
pub type Location = TaxonomyEntry;

impl TaxonomyEntry {
    pub fn from_api(value: &Value) -> Self {
        Self {
            id: id_of(value).unwrap_or_default(),
            name: first_str(value, &["name"]).unwrap_or_default(),
        }
    }
}

//! Linked entities and the reference table that accompanies a document.

use super::RichText;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Type tag given to assets that do not carry one.
pub const ASSET_TYPE_TAG: &str = "Asset";

/// Which of the two tables a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    /// Structured content entries
    Entry,
    /// Media assets
    Asset,
}

/// An out-of-band entity referenced from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Stable identifier
    pub id: String,

    /// Entity type tag, used by the type dispatcher
    pub type_tag: String,

    /// Remaining fields of the entity
    pub payload: Map<String, Value>,
}

impl Entity {
    /// Create an entity with an empty payload.
    pub fn new(id: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_tag: type_tag.into(),
            payload: Map::new(),
        }
    }

    /// Add a payload field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(name.into(), value.into());
        self
    }

    /// Build an entity from its wire form (`sys.id`, `__typename`, fields).
    pub fn from_value(value: Value, default_type: &str) -> Result<Self> {
        let Value::Object(mut payload) = value else {
            return Err(Error::InvalidReferenceTable(
                "linked entity is not an object".into(),
            ));
        };

        let id = payload
            .remove("sys")
            .and_then(|sys| sys.get("id").and_then(Value::as_str).map(str::to_string))
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::InvalidReferenceTable("linked entity without sys.id".into()))?;

        let type_tag = match payload.remove("__typename") {
            Some(Value::String(tag)) if !tag.is_empty() => tag,
            _ => default_type.to_string(),
        };

        Ok(Self {
            id,
            type_tag,
            payload,
        })
    }

    /// Get a payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Get a string payload field.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Parse a nested rich-text field (`{json, links}`), if present.
    pub fn rich_text(&self, name: &str) -> Option<Result<RichText>> {
        match self.field(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(RichText::from_value(value.clone())),
        }
    }
}

/// Outcome of a reference-table lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// The referenced entity is in the table
    Found(&'a Entity),
    /// The id is absent; an expected condition, not an error
    NotFound,
}

impl<'a> Resolution<'a> {
    /// The resolved entity, if found.
    pub fn entity(self) -> Option<&'a Entity> {
        match self {
            Resolution::Found(entity) => Some(entity),
            Resolution::NotFound => None,
        }
    }
}

/// Id-keyed tables of pre-fetched entries and assets.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: HashMap<String, Entity>,
    assets: HashMap<String, Entity>,
}

impl ReferenceTable {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity; returns the entity it replaced, if any.
    pub fn insert(&mut self, class: EntityClass, entity: Entity) -> Option<Entity> {
        let table = match class {
            EntityClass::Entry => &mut self.entries,
            EntityClass::Asset => &mut self.assets,
        };
        table.insert(entity.id.clone(), entity)
    }

    /// Builder form of [`ReferenceTable::insert`] for entries.
    pub fn with_entry(mut self, entity: Entity) -> Self {
        self.insert(EntityClass::Entry, entity);
        self
    }

    /// Builder form of [`ReferenceTable::insert`] for assets.
    pub fn with_asset(mut self, entity: Entity) -> Self {
        self.insert(EntityClass::Asset, entity);
        self
    }

    /// Look up `id` in the table for `class`.
    pub fn resolve(&self, id: &str, class: EntityClass) -> Resolution<'_> {
        let table = match class {
            EntityClass::Entry => &self.entries,
            EntityClass::Asset => &self.assets,
        };
        match table.get(id) {
            Some(entity) => Resolution::Found(entity),
            None => Resolution::NotFound,
        }
    }

    /// Number of linked entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of linked assets.
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Check whether both tables are empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.assets.is_empty()
    }

    /// Build the tables from the wire `links` object.
    pub(crate) fn from_links(links: Links) -> Result<Self> {
        let mut table = Self::new();

        let entries = links.entries.unwrap_or_default();
        let entry_lists = [entries.block, entries.inline, entries.hyperlink];
        for value in entry_lists.into_iter().flatten().flatten().flatten() {
            let entity = Entity::from_value(value, "")?;
            if let Some(previous) = table.insert(EntityClass::Entry, entity) {
                log::debug!("Entry {} linked more than once", previous.id);
            }
        }

        let assets = links.assets.unwrap_or_default();
        for value in assets.block.into_iter().flatten().flatten() {
            let entity = Entity::from_value(value, ASSET_TYPE_TAG)?;
            table.insert(EntityClass::Asset, entity);
        }

        Ok(table)
    }
}

/// Wire shape of the `links` object.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    entries: Option<EntryLinks>,
    #[serde(default)]
    assets: Option<AssetLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct EntryLinks {
    #[serde(default)]
    block: Option<Vec<Option<Value>>>,
    #[serde(default)]
    inline: Option<Vec<Option<Value>>>,
    #[serde(default)]
    hyperlink: Option<Vec<Option<Value>>>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetLinks {
    #[serde(default)]
    block: Option<Vec<Option<Value>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_from_value() {
        let entity = Entity::from_value(
            json!({"sys": {"id": "q1"}, "__typename": "ComponentQuote", "quote": "Hi"}),
            "",
        )
        .unwrap();
        assert_eq!(entity.id, "q1");
        assert_eq!(entity.type_tag, "ComponentQuote");
        assert_eq!(entity.str_field("quote"), Some("Hi"));
        assert!(entity.field("sys").is_none());
    }

    #[test]
    fn test_entity_without_id_is_rejected() {
        let result = Entity::from_value(json!({"__typename": "Page"}), "");
        assert!(matches!(result, Err(Error::InvalidReferenceTable(_))));

        let result = Entity::from_value(json!("not an entity"), "");
        assert!(result.is_err());
    }

    #[test]
    fn test_table_from_links_skips_nulls() {
        let links: Links = serde_json::from_value(json!({
            "entries": {"block": [null, {"sys": {"id": "e1"}, "__typename": "Cta"}]},
            "assets": {"block": [{"sys": {"id": "a1"}, "url": "https://x/y.png"}, null]}
        }))
        .unwrap();
        let table = ReferenceTable::from_links(links).unwrap();

        assert_eq!(table.entry_count(), 1);
        assert_eq!(table.asset_count(), 1);

        let asset = table.resolve("a1", EntityClass::Asset).entity().unwrap();
        assert_eq!(asset.type_tag, ASSET_TYPE_TAG);
        assert_eq!(table.resolve("a1", EntityClass::Entry), Resolution::NotFound);
    }

    #[test]
    fn test_rich_text_field() {
        let entity = Entity::new("p1", "Person").with_field(
            "bio",
            json!({"json": {"nodeType": "document", "content": []}}),
        );
        let bio = entity.rich_text("bio").unwrap().unwrap();
        assert!(bio.document.children().unwrap().is_empty());
        assert!(entity.rich_text("missing").is_none());
    }
}

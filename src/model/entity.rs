use serde_json::Value;

use crate::validation::is_entity_page;

/// An opaque entity record as returned by the data service.
pub type Entity = Value;

/// One validated page of entities plus the service's continuation cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPage {
    pub entities: Vec<Entity>,
    pub cursor: Option<String>,
}

impl EntityPage {
    /// Validates a raw payload with [`is_entity_page`] and takes it apart.
    ///
    /// Returns `None` for anything that is not an object with an `entities` array.
    pub fn from_payload(payload: Value) -> Option<Self> {
        if !is_entity_page(&payload) {
            return None;
        }
        let Value::Object(mut fields) = payload else {
            return None;
        };
        let cursor = fields
            .get("cursor")
            .and_then(Value::as_str)
            .map(str::to_owned);
        match fields.remove("entities") {
            Some(Value::Array(entities)) => Some(Self { entities, cursor }),
            _ => None,
        }
    }
}

/// Entities accumulated across pages, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityList {
    entities: Vec<Entity>,
}

impl EntityList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a page's entities after the ones already held.
    pub fn append_page(&mut self, page: EntityPage) {
        self.entities.extend(page.entities);
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn into_vec(self) -> Vec<Entity> {
        self.entities
    }
}

impl From<EntityPage> for EntityList {
    fn from(page: EntityPage) -> Self {
        Self {
            entities: page.entities,
        }
    }
}

impl IntoIterator for EntityList {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}

impl<'a> IntoIterator for &'a EntityList {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_extracts_entities_and_cursor() {
        let page = EntityPage::from_payload(json!({
            "entities": [{ "name": "a" }, { "name": "b" }],
            "cursor": "2"
        }))
        .unwrap();
        assert_eq!(page.entities.len(), 2);
        assert_eq!(page.cursor.as_deref(), Some("2"));
    }

    #[test]
    fn test_from_payload_rejects_bad_shapes() {
        assert!(EntityPage::from_payload(Value::Null).is_none());
        assert!(EntityPage::from_payload(json!({ "entities": null })).is_none());
        assert!(EntityPage::from_payload(json!({ "entities": "a" })).is_none());
        assert!(EntityPage::from_payload(json!([{ "name": "a" }])).is_none());
    }

    #[test]
    fn test_entity_list_keeps_page_order() {
        let mut list = EntityList::from(EntityPage {
            entities: vec![json!(1), json!(2)],
            cursor: Some("2".to_owned()),
        });
        list.append_page(EntityPage { entities: vec![json!(3)], cursor: None });

        assert_eq!(list.as_slice(), &[json!(1), json!(2), json!(3)]);

        list.clear();
        assert!(list.is_empty());
    }
}

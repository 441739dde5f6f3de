/// An authenticated user, as returned by a [`Gate`](crate::auth::Gate).
#[derive(Clone, Debug, PartialEq)]
pub struct Principal {
    attributes: serde_json::Map<String, serde_json::Value>,
    id: serde_json::Value,
}
impl Principal {
    pub fn new(id: impl Into<serde_json::Value>) -> Self {
        let id = id.into();
        let mut attributes = serde_json::Map::new();
        attributes.insert("id".to_string(), id.clone());
        Self {
            attributes,
            id,
        }
    }

    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    pub fn id(&self) -> &serde_json::Value {
        &self.id
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(self.attributes.clone())
    }
}

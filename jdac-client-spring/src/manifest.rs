use jdac_client::ServiceRole;
use serde::{Deserialize, Serialize};

/// One declared service: a type name and the role it plays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMapping {
    #[serde(rename = "type", alias = "typename", alias = "type_name")]
    pub type_name: String,
    pub role: ServiceRole,
}

impl ServiceMapping {
    pub fn new(type_name: impl Into<String>, role: ServiceRole) -> Self {
        Self {
            type_name: type_name.into(),
            role,
        }
    }
}

/// Declarative list of services to register, in addition to the types that
/// carry role markers in the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceManifest {
    entries: Vec<ServiceMapping>,
}

impl ServiceManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, type_name: impl Into<String>, role: ServiceRole) -> Self {
        self.add(type_name, role);
        self
    }

    pub fn add(&mut self, type_name: impl Into<String>, role: ServiceRole) {
        self.entries.push(ServiceMapping::new(type_name, role));
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceMapping> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ServiceMapping>> for ServiceManifest {
    fn from(entries: Vec<ServiceMapping>) -> Self {
        Self { entries }
    }
}

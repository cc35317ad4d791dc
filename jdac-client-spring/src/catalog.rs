//! Compile-time type catalog.
//!
//! Service types and JWT providers are registered by name, either through the
//! [`data_access_service!`](crate::data_access_service) and
//! [`jwt_provider!`](crate::jwt_provider) macros (collected with `inventory`)
//! or programmatically. Configuration and scanning resolve type names against
//! this catalog.

use crate::{annotations::DeclarationKind, container::BeanInstance};
use jdac_client::{
    BasicJwtProvider, DataAccessClient, DataAccessService, JwtProvider, ServiceRole,
    SimpleJwtProvider,
};
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fully qualified name of the built-in static-token provider
pub const SIMPLE_JWT_PROVIDER: &str = "jdac_client::auth::SimpleJwtProvider";

/// Fully qualified name of the built-in key/secret provider
pub const BASIC_JWT_PROVIDER: &str = "jdac_client::auth::BasicJwtProvider";

/// No-argument constructor of a JWT provider
pub type ProviderConstructor = fn() -> Box<dyn JwtProvider>;

/// Produces a service proxy for a role from the shared client
pub type ServiceSupplier = fn(&DataAccessClient, ServiceRole) -> BeanInstance;

/// Build a provider through its `Default` implementation
pub fn construct<P>() -> Box<dyn JwtProvider>
where
    P: JwtProvider + Default + 'static,
{
    Box::new(P::default())
}

/// Ask the client for a proxy of `T` playing `role`
pub fn supply<T: DataAccessService>(client: &DataAccessClient, role: ServiceRole) -> BeanInstance {
    match role {
        ServiceRole::Query => Arc::new(client.get_query::<T>()),
        ServiceRole::Command => Arc::new(client.get_command::<T>()),
        ServiceRole::Repository => Arc::new(client.get_repository::<T>()),
        ServiceRole::Batch => Arc::new(client.get_batch::<T>()),
    }
}

/// Static service registration submitted by [`data_access_service!`](crate::data_access_service)
pub struct ServiceRegistration {
    pub type_name: &'static str,
    pub markers: &'static [ServiceRole],
    pub kind: DeclarationKind,
    pub nested: bool,
    pub type_id: fn() -> TypeId,
    pub supplier: ServiceSupplier,
}

impl ServiceRegistration {
    pub const fn new(
        type_name: &'static str,
        markers: &'static [ServiceRole],
        type_id: fn() -> TypeId,
        supplier: ServiceSupplier,
    ) -> Self {
        Self {
            type_name,
            markers,
            kind: DeclarationKind::Interface,
            nested: false,
            type_id,
            supplier,
        }
    }

    /// Declared inside another type
    pub const fn nested(self) -> Self {
        Self {
            nested: true,
            ..self
        }
    }

    /// A concrete implementation rather than an interface
    pub const fn concrete(self) -> Self {
        Self {
            kind: DeclarationKind::Concrete,
            ..self
        }
    }
}

/// Static provider registration submitted by [`jwt_provider!`](crate::jwt_provider)
pub struct ProviderRegistration {
    pub type_name: &'static str,
    pub constructor: ProviderConstructor,
}

impl ProviderRegistration {
    pub const fn new(type_name: &'static str, constructor: ProviderConstructor) -> Self {
        Self {
            type_name,
            constructor,
        }
    }
}

inventory::collect!(ServiceRegistration);
inventory::collect!(ProviderRegistration);

/// A service type known to the catalog
#[derive(Clone)]
pub struct ServiceType {
    pub type_name: String,
    pub markers: Vec<ServiceRole>,
    pub kind: DeclarationKind,
    pub nested: bool,
    pub type_id: TypeId,
    pub supplier: ServiceSupplier,
}

impl ServiceType {
    /// Describe the service type `T` carrying the given role markers
    pub fn of<T: DataAccessService>(type_name: impl Into<String>, markers: &[ServiceRole]) -> Self {
        Self {
            type_name: canonical_type_name(&type_name.into()),
            markers: markers.to_vec(),
            kind: DeclarationKind::Interface,
            nested: false,
            type_id: TypeId::of::<T>(),
            supplier: supply::<T>,
        }
    }

    pub fn kind(mut self, kind: DeclarationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the type as declared inside another type
    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    pub fn has_marker(&self, role: ServiceRole) -> bool {
        self.markers.contains(&role)
    }
}

impl From<&ServiceRegistration> for ServiceType {
    fn from(registration: &ServiceRegistration) -> Self {
        Self {
            type_name: canonical_type_name(registration.type_name),
            markers: registration.markers.to_vec(),
            kind: registration.kind,
            nested: registration.nested,
            type_id: (registration.type_id)(),
            supplier: registration.supplier,
        }
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceType")
            .field("type_name", &self.type_name)
            .field("markers", &self.markers)
            .field("kind", &self.kind)
            .field("nested", &self.nested)
            .finish()
    }
}

/// A JWT provider type known to the catalog
#[derive(Clone)]
pub struct ProviderType {
    pub type_name: String,
    pub constructor: ProviderConstructor,
}

impl fmt::Debug for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderType")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Catalog entry
#[derive(Debug, Clone)]
pub enum CatalogEntry {
    Provider(ProviderType),
    Service(ServiceType),
}

/// Name → type registry
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl TypeCatalog {
    /// Catalog holding only the built-in JWT providers
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.register_provider(SIMPLE_JWT_PROVIDER, construct::<SimpleJwtProvider>);
        catalog.register_provider(BASIC_JWT_PROVIDER, construct::<BasicJwtProvider>);
        catalog
    }

    /// Catalog without any entry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in providers plus every macro registration linked into the binary
    pub fn discover() -> Self {
        let mut catalog = Self::new();

        for registration in inventory::iter::<ProviderRegistration> {
            catalog.register_provider(registration.type_name, registration.constructor);
        }
        for registration in inventory::iter::<ServiceRegistration> {
            catalog.register_service(ServiceType::from(registration));
        }

        debug!("Type catalog discovered {} entries", catalog.len());
        catalog
    }

    pub fn register_provider(&mut self, type_name: &str, constructor: ProviderConstructor) {
        let type_name = canonical_type_name(type_name);
        let entry = CatalogEntry::Provider(ProviderType {
            type_name: type_name.clone(),
            constructor,
        });
        self.insert(type_name, entry);
    }

    pub fn register_service(&mut self, service: ServiceType) {
        self.insert(service.type_name.clone(), CatalogEntry::Service(service));
    }

    /// Look up a type by name; `.` and `::` separators are interchangeable
    pub fn lookup(&self, type_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(&canonical_type_name(type_name))
    }

    pub fn service(&self, type_name: &str) -> Option<&ServiceType> {
        match self.lookup(type_name) {
            Some(CatalogEntry::Service(service)) => Some(service),
            _ => None,
        }
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceType> {
        self.entries.values().filter_map(|entry| match entry {
            CatalogEntry::Service(service) => Some(service),
            CatalogEntry::Provider(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, type_name: String, entry: CatalogEntry) {
        if self.entries.insert(type_name.clone(), entry).is_some() {
            warn!("Type {} registered more than once, keeping the last", type_name);
        }
    }
}

/// Normalize a type or package name to `::` separators
pub fn canonical_type_name(name: &str) -> String {
    name.trim().replace('.', "::").trim_matches(':').to_string()
}

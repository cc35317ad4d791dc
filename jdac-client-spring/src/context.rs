use crate::{
    catalog::TypeCatalog,
    config::DataAccessProperties,
    container::{BeanInstance, Container, ContainerConfig},
    manifest::ServiceManifest,
    registrar::{DataAccessBeanRegistrar, RegistrationReport},
    SpringResult,
};
use jdac_client::DataAccessClient;
use std::{any::Any, fmt, sync::Arc};
use tracing::info;

/// Application context wiring the JDAC client and its data access beans
pub struct ApplicationContext {
    /// Dependency injection container
    container: Container,

    /// Shared data access client
    client: Arc<DataAccessClient>,

    /// Bound data access properties
    properties: DataAccessProperties,

    /// Outcome of the registration sweep
    report: RegistrationReport,
}

impl ApplicationContext {
    /// Bootstrap with every type registered through the macros
    pub fn bootstrap(properties: DataAccessProperties) -> SpringResult<Self> {
        Self::bootstrap_with(properties, TypeCatalog::discover())
    }

    /// Bootstrap against an explicit catalog
    pub fn bootstrap_with(properties: DataAccessProperties, catalog: TypeCatalog) -> SpringResult<Self> {
        ContextBuilder::new(properties).catalog(catalog).build()
    }

    /// Bootstrap from configuration files and `JDAC__*` environment variables
    pub fn from_env() -> SpringResult<Self> {
        Self::bootstrap(DataAccessProperties::load()?)
    }

    pub fn builder(properties: DataAccessProperties) -> ContextBuilder {
        ContextBuilder::new(properties)
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn client(&self) -> &Arc<DataAccessClient> {
        &self.client
    }

    pub fn properties(&self) -> &DataAccessProperties {
        &self.properties
    }

    pub fn report(&self) -> &RegistrationReport {
        &self.report
    }

    /// Get a bean by name
    pub fn get_bean(&self, name: &str) -> SpringResult<BeanInstance> {
        self.container.get_bean(name)
    }

    /// Get a bean by name as a concrete type
    pub fn get_bean_as<T: Any + Send + Sync>(&self, name: &str) -> SpringResult<Arc<T>> {
        self.container.get_bean_as::<T>(name)
    }

    /// Get the single service bean of type `T`
    pub fn get_service<T: Any + Send + Sync>(&self) -> SpringResult<Arc<T>> {
        self.container.get_bean_by_type::<T>()
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("client", &self.client)
            .field("properties", &self.properties)
            .field("report", &self.report)
            .field("stats", &self.container.stats())
            .finish()
    }
}

/// Builder for an [`ApplicationContext`]
pub struct ContextBuilder {
    properties: DataAccessProperties,
    catalog: Option<TypeCatalog>,
    manifest: ServiceManifest,
    container_config: ContainerConfig,
}

impl ContextBuilder {
    pub fn new(properties: DataAccessProperties) -> Self {
        Self {
            properties,
            catalog: None,
            manifest: ServiceManifest::new(),
            container_config: ContainerConfig::default(),
        }
    }

    /// Resolve type names against `catalog` instead of the discovered one
    pub fn catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Services declared in code, on top of `jdac.services`
    pub fn manifest(mut self, manifest: ServiceManifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn container_config(mut self, config: ContainerConfig) -> Self {
        self.container_config = config;
        self
    }

    /// Build the client, register every bean and materialize the eager ones
    pub fn build(self) -> SpringResult<ApplicationContext> {
        let catalog = self.catalog.unwrap_or_else(TypeCatalog::discover);
        let registrar =
            DataAccessBeanRegistrar::new(self.properties, catalog)?.with_manifest(self.manifest);

        let container = Container::with_config(self.container_config);
        let report = registrar.register_bean_definitions(&container)?;
        container.preinstantiate_singletons()?;

        info!(
            "Application context started with {} beans ({} skipped)",
            report.registered.len(),
            report.skipped.len()
        );

        Ok(ApplicationContext {
            container,
            client: registrar.client().clone(),
            properties: registrar.properties().clone(),
            report,
        })
    }
}

//! Registration of the data access client and its service beans.
//!
//! The registrar builds one [`DataAccessClient`] from the bound properties,
//! registers it, then sweeps the base package once per role and registers a
//! lazily materialized proxy for every service type it finds. All proxies
//! share the one client.

use crate::{
    annotations::BeanDefinition,
    catalog::TypeCatalog,
    config::DataAccessProperties,
    container::{BeanDefinitionRegistry, BeanInstance, BeanSupplier},
    manifest::ServiceManifest,
    provider::JwtProviderFactory,
    scanner::InterfaceScanner,
    SpringError, SpringResult,
};
use jdac_client::{DataAccessClient, ServiceRole};
use std::{any::TypeId, collections::BTreeMap, sync::Arc};
use tracing::{debug, error, info};

/// Outcome of a registration sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Every registered bean name, client first, in registration order
    pub registered: Vec<String>,
    /// Service beans registered per role pass
    pub per_role: BTreeMap<ServiceRole, usize>,
    /// Discovered type names that could not be resolved
    pub skipped: Vec<String>,
}

impl RegistrationReport {
    pub fn service_count(&self) -> usize {
        self.per_role.values().sum()
    }
}

/// Registers the JDAC client and data access service beans
pub struct DataAccessBeanRegistrar {
    properties: DataAccessProperties,
    catalog: TypeCatalog,
    manifest: ServiceManifest,
    client: Arc<DataAccessClient>,
}

impl DataAccessBeanRegistrar {
    /// Resolve the JWT provider and build the shared client.
    ///
    /// Fails when the provider cannot be resolved or the client cannot be
    /// built.
    pub fn new(properties: DataAccessProperties, catalog: TypeCatalog) -> SpringResult<Self> {
        let jwt_provider = JwtProviderFactory::new(&catalog).resolve(&properties.jwt_provider)?;

        let mut builder = DataAccessClient::builder()
            .log_request(properties.log_request)
            .jwt_provider(jwt_provider);
        if let Some(base_url) = &properties.base_url {
            builder = builder.base_url(base_url.trim());
        }
        let client = Arc::new(builder.build()?);

        let manifest = ServiceManifest::from(properties.services.clone());

        Ok(Self {
            properties,
            catalog,
            manifest,
            client,
        })
    }

    /// Add services declared in code to those from the configuration
    pub fn with_manifest(mut self, manifest: ServiceManifest) -> Self {
        for mapping in manifest.iter() {
            self.manifest.add(mapping.type_name.clone(), mapping.role);
        }
        self
    }

    pub fn client(&self) -> &Arc<DataAccessClient> {
        &self.client
    }

    pub fn properties(&self) -> &DataAccessProperties {
        &self.properties
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Bean name of the client
    pub fn client_bean_name() -> &'static str {
        std::any::type_name::<DataAccessClient>()
    }

    /// Register the client, then one bean per discovered service type
    pub fn register_bean_definitions(
        &self,
        registry: &dyn BeanDefinitionRegistry,
    ) -> SpringResult<RegistrationReport> {
        let mut report = RegistrationReport::default();

        self.register_client(registry)?;
        report.registered.push(Self::client_bean_name().to_string());
        info!("JDAC client registered.");

        let base_package = self.properties.require_base_package()?;
        let scanner = InterfaceScanner::new(&self.catalog).with_manifest(&self.manifest);

        for role in ServiceRole::ALL {
            let mut count = 0;
            for descriptor in scanner.scan(base_package, role)? {
                let Some(service) = self.catalog.service(&descriptor.type_name) else {
                    let err = SpringError::bean_class_resolution(&descriptor.type_name);
                    error!("{}", err);
                    report.skipped.push(descriptor.type_name);
                    continue;
                };

                let client = self.client.clone();
                let supplier_fn = service.supplier;
                let supplier: BeanSupplier =
                    Arc::new(move || Ok(supplier_fn(client.as_ref(), role)));

                let definition = BeanDefinition::new(service.type_name.clone())
                    .bean_type(service.type_name.clone(), service.type_id)
                    .role(role);
                registry.register_bean_definition(definition, supplier)?;

                debug!("Registered {} bean: {}", role, service.type_name);
                report.registered.push(service.type_name.clone());
                count += 1;
            }
            report.per_role.insert(role, count);
        }

        info!("JDAC data access beans registered.");
        Ok(report)
    }

    fn register_client(&self, registry: &dyn BeanDefinitionRegistry) -> SpringResult<()> {
        let client: BeanInstance = self.client.clone();
        let definition = BeanDefinition::new(Self::client_bean_name())
            .bean_type(Self::client_bean_name(), TypeId::of::<DataAccessClient>())
            .eager()
            .primary()
            .description("JDAC data access client");
        registry.register_bean_definition(definition, Arc::new(move || Ok(client.clone())))
    }
}

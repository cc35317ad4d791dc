use crate::{
    annotations::DeclarationKind,
    catalog::{canonical_type_name, ServiceType, TypeCatalog},
    manifest::ServiceManifest,
    SpringError, SpringResult,
};
use jdac_client::ServiceRole;
use std::collections::BTreeSet;
use tracing::debug;

/// A service type found by a scan pass
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceDescriptor {
    pub type_name: String,
    pub role: ServiceRole,
}

/// Finds the service types of a package that carry a given role marker
pub struct InterfaceScanner<'a> {
    catalog: &'a TypeCatalog,
    manifest: Option<&'a ServiceManifest>,
}

impl<'a> InterfaceScanner<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog,
            manifest: None,
        }
    }

    /// Also consider the declared manifest entries as candidates
    pub fn with_manifest(mut self, manifest: &'a ServiceManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Top-level interface declarations under `base_package` marked with `role`
    pub fn scan(&self, base_package: &str, role: ServiceRole) -> SpringResult<BTreeSet<ServiceDescriptor>> {
        let package = canonical_type_name(base_package);
        if package.is_empty() {
            return Err(SpringError::configuration("base package must not be empty"));
        }

        let mut found: BTreeSet<ServiceDescriptor> = self
            .catalog
            .services()
            .filter(|service| is_top_level_interface(service))
            .filter(|service| service.has_marker(role))
            .filter(|service| in_package(&service.type_name, &package))
            .map(|service| ServiceDescriptor {
                type_name: service.type_name.clone(),
                role,
            })
            .collect();

        if let Some(manifest) = self.manifest {
            found.extend(
                manifest
                    .iter()
                    .filter(|mapping| mapping.role == role)
                    .map(|mapping| canonical_type_name(&mapping.type_name))
                    .filter(|type_name| in_package(type_name, &package))
                    // unknown names pass through; the registrar reports them
                    .filter(|type_name| {
                        self.catalog
                            .service(type_name)
                            .map_or(true, is_top_level_interface)
                    })
                    .map(|type_name| ServiceDescriptor { type_name, role }),
            );
        }

        debug!("Found {} {} interfaces in {}", found.len(), role, package);
        Ok(found)
    }
}

fn is_top_level_interface(service: &ServiceType) -> bool {
    service.kind == DeclarationKind::Interface && !service.nested
}

fn in_package(type_name: &str, package: &str) -> bool {
    type_name
        .strip_prefix(package)
        .map_or(false, |rest| rest.starts_with("::"))
}

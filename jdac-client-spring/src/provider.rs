use crate::{
    catalog::{CatalogEntry, TypeCatalog, BASIC_JWT_PROVIDER, SIMPLE_JWT_PROVIDER},
    SpringError, SpringResult,
};
use jdac_client::{JwtProvider, Properties};
use std::sync::Arc;
use tracing::{debug, info};

/// Property naming the provider type or its alias
pub const CLASS_PROPERTY: &str = "class";

/// Expand a short provider alias to its fully qualified type name
pub fn resolve_class_name(class_name: &str) -> &str {
    match class_name {
        "simple" => SIMPLE_JWT_PROVIDER,
        "basic" => BASIC_JWT_PROVIDER,
        other => other,
    }
}

/// Builds the JWT provider described by the `jwt-provider` property bag
pub struct JwtProviderFactory<'a> {
    catalog: &'a TypeCatalog,
}

impl<'a> JwtProviderFactory<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve, construct and initialize the configured provider.
    ///
    /// Returns `None` when the bag is empty or has no `class` entry.
    pub fn resolve(&self, properties: &Properties) -> SpringResult<Option<Arc<dyn JwtProvider>>> {
        if properties.is_empty() {
            debug!("No JWT provider configured");
            return Ok(None);
        }

        let Some(class_name) = properties.get(CLASS_PROPERTY).map(str::trim) else {
            debug!("JWT provider properties carry no '{}' entry", CLASS_PROPERTY);
            return Ok(None);
        };
        let class_name = resolve_class_name(class_name);

        let provider_type = match self.catalog.lookup(class_name) {
            Some(CatalogEntry::Provider(provider_type)) => provider_type,
            Some(CatalogEntry::Service(_)) => {
                return Err(SpringError::provider_type(
                    class_name,
                    "type does not implement JwtProvider",
                ))
            }
            None => return Err(SpringError::provider_not_found(class_name)),
        };

        let mut provider = (provider_type.constructor)();
        provider
            .set(properties)
            .map_err(|e| SpringError::provider_type(class_name, e.to_string()))?;

        info!("JWT provider resolved: {}", provider_type.type_name);
        Ok(Some(Arc::from(provider)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ServiceType;
    use jdac_client::{DataAccessService, ServiceHandle, ServiceRole};

    struct AuditCommand;

    impl DataAccessService for AuditCommand {
        fn from_handle(_handle: ServiceHandle) -> Self {
            Self
        }
    }

    fn bag(pairs: &[(&str, &str)]) -> Properties {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_aliases_expand_to_builtin_types() {
        assert_eq!(resolve_class_name("simple"), SIMPLE_JWT_PROVIDER);
        assert_eq!(resolve_class_name("basic"), BASIC_JWT_PROVIDER);
        assert_eq!(resolve_class_name("acme::auth::Vault"), "acme::auth::Vault");
    }

    #[test]
    fn test_no_provider_without_class() {
        let catalog = TypeCatalog::new();
        let factory = JwtProviderFactory::new(&catalog);

        assert!(factory.resolve(&Properties::new()).unwrap().is_none());
        assert!(factory
            .resolve(&bag(&[("jwt", "abc"), ("authEndpoint", "http://localhost")]))
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_simple_alias_resolves_and_initializes() {
        let catalog = TypeCatalog::new();
        let provider = JwtProviderFactory::new(&catalog)
            .resolve(&bag(&[("class", "simple"), ("jwt", "token-1")]))
            .unwrap()
            .expect("provider");

        assert_eq!(provider.get_jwt().await.unwrap(), "token-1");
        assert!(format!("{:?}", provider).contains("SimpleJwtProvider"));
    }

    #[test]
    fn test_fully_qualified_name_resolves() {
        let catalog = TypeCatalog::new();
        let provider = JwtProviderFactory::new(&catalog)
            .resolve(&bag(&[
                ("class", "jdac_client.auth.BasicJwtProvider"),
                ("authEndpoint", "http://localhost/auth"),
                ("serviceKey", "key"),
                ("serviceSecret", "secret"),
            ]))
            .unwrap()
            .expect("provider");

        assert!(format!("{:?}", provider).contains("BasicJwtProvider"));
    }

    #[test]
    fn test_unknown_class_is_not_found() {
        let catalog = TypeCatalog::new();
        let err = JwtProviderFactory::new(&catalog)
            .resolve(&bag(&[("class", "acme::auth::Missing")]))
            .err()
            .expect("resolution should fail");

        match err {
            SpringError::ProviderNotFound { class_name } => {
                assert_eq!(class_name, "acme::auth::Missing")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_provider_type_is_rejected() {
        let mut catalog = TypeCatalog::new();
        catalog.register_service(ServiceType::of::<AuditCommand>(
            "acme::AuditCommand",
            &[ServiceRole::Command],
        ));

        let err = JwtProviderFactory::new(&catalog)
            .resolve(&bag(&[("class", "acme::AuditCommand")]))
            .err()
            .expect("resolution should fail");
        assert!(matches!(err, SpringError::ProviderType { .. }));
    }

    #[test]
    fn test_initialization_failure_is_a_type_error() {
        let catalog = TypeCatalog::new();
        let err = JwtProviderFactory::new(&catalog)
            .resolve(&bag(&[("class", "simple")]))
            .err()
            .expect("resolution should fail");

        match err {
            SpringError::ProviderType { class_name, reason } => {
                assert_eq!(class_name, SIMPLE_JWT_PROVIDER);
                assert!(reason.contains("jwt"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

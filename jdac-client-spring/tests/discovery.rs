use jdac_client_spring::{
    ApplicationContext, CatalogEntry, DataAccessProperties, DeclarationKind, InterfaceScanner,
    ServiceRole, TypeCatalog,
};
use serde_json::json;
use std::io::Write;

mod acme {
    pub mod services {
        use jdac_client_spring::{data_access_service, DataAccessService, ServiceHandle};
        use serde::Deserialize;

        #[derive(Debug, PartialEq, Deserialize)]
        pub struct Order {
            pub id: u64,
            pub total: f64,
        }

        pub struct OrderQuery {
            handle: ServiceHandle,
        }

        impl OrderQuery {
            pub async fn by_id(&self, id: u64) -> jdac_client::ClientResult<Option<Order>> {
                self.handle
                    .invoke("byId", &serde_json::json!({ "id": id }))
                    .await
            }
        }

        impl DataAccessService for OrderQuery {
            fn service_path() -> &'static str {
                "orders"
            }

            fn from_handle(handle: ServiceHandle) -> Self {
                Self { handle }
            }
        }

        data_access_service!(OrderQuery => [Query]);

        pub struct OrderCommand {
            pub handle: ServiceHandle,
        }

        impl DataAccessService for OrderCommand {
            fn service_path() -> &'static str {
                "orders"
            }

            fn from_handle(handle: ServiceHandle) -> Self {
                Self { handle }
            }
        }

        data_access_service!(OrderCommand => [Command]);

        pub struct OrderQueryImpl {
            _handle: ServiceHandle,
        }

        impl DataAccessService for OrderQueryImpl {
            fn from_handle(handle: ServiceHandle) -> Self {
                Self { _handle: handle }
            }
        }

        data_access_service!(OrderQueryImpl => [Query]; concrete);

        pub struct LineQuery {
            _handle: ServiceHandle,
        }

        impl DataAccessService for LineQuery {
            fn from_handle(handle: ServiceHandle) -> Self {
                Self { _handle: handle }
            }
        }

        data_access_service!(LineQuery => [Query, Batch]; nested);
    }

    pub mod auth {
        use async_trait::async_trait;
        use jdac_client::{ClientResult, JwtProvider, Properties};
        use jdac_client_spring::jwt_provider;

        #[derive(Debug, Default)]
        pub struct HeaderProvider {
            token: String,
        }

        #[async_trait]
        impl JwtProvider for HeaderProvider {
            fn set(&mut self, properties: &Properties) -> ClientResult<()> {
                self.token = format!("tenant-{}", properties.get("tenant").unwrap_or("default"));
                Ok(())
            }

            async fn get_jwt(&self) -> ClientResult<String> {
                Ok(self.token.clone())
            }
        }

        jwt_provider!(HeaderProvider);
    }
}

#[test]
fn macro_registrations_are_discovered() {
    let catalog = TypeCatalog::discover();

    let query = catalog
        .service("discovery::acme::services::OrderQuery")
        .expect("query registered");
    assert!(query.has_marker(ServiceRole::Query));
    assert!(catalog.service("discovery.acme.services.OrderCommand").is_some());
    assert!(matches!(
        catalog.lookup("discovery::acme::auth::HeaderProvider"),
        Some(CatalogEntry::Provider(_))
    ));

    let concrete = catalog
        .service("discovery::acme::services::OrderQueryImpl")
        .expect("implementation registered");
    assert_eq!(concrete.kind, DeclarationKind::Concrete);
    assert!(!concrete.nested);

    let nested = catalog
        .service("discovery::acme::services::LineQuery")
        .expect("nested type registered");
    assert_eq!(nested.kind, DeclarationKind::Interface);
    assert!(nested.nested);
    assert!(nested.has_marker(ServiceRole::Batch));

    let found = InterfaceScanner::new(&catalog)
        .scan("discovery::acme::services", ServiceRole::Query)
        .unwrap();
    assert_eq!(
        found.into_iter().map(|d| d.type_name).collect::<Vec<_>>(),
        vec!["discovery::acme::services::OrderQuery".to_string()]
    );
}

#[tokio::test]
async fn context_from_config_file_calls_the_service() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/orders/byId")
        .match_header("authorization", "Bearer tenant-north")
        .match_body(mockito::Matcher::Json(json!({ "id": 7 })))
        .with_status(200)
        .with_body(r#"{"id":7,"total":12.5}"#)
        .create_async()
        .await;

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    write!(
        file,
        r#"
        [jdac]
        base-url = "{}"
        base-package = "discovery.acme.services"

        [jdac.jwt-provider]
        class = "discovery.acme.auth.HeaderProvider"
        tenant = "north"
        "#,
        server.url()
    )
    .unwrap();

    let properties = DataAccessProperties::from_file(file.path()).unwrap();
    let context = ApplicationContext::bootstrap(properties).unwrap();

    // flagged registrations never become beans
    assert_eq!(context.report().per_role[&ServiceRole::Query], 1);
    assert_eq!(context.report().per_role[&ServiceRole::Command], 1);
    assert_eq!(context.report().per_role[&ServiceRole::Batch], 0);

    let order = context
        .get_service::<acme::services::OrderQuery>()
        .unwrap()
        .by_id(7)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(order, Some(acme::services::Order { id: 7, total: 12.5 }));

    let command = context.get_service::<acme::services::OrderCommand>().unwrap();
    assert_eq!(command.handle.role(), ServiceRole::Command);
}

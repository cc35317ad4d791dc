use jdac_client::ServiceRole;
use std::any::TypeId;

/// Kind of declaration a service type was registered as.
///
/// Only interface declarations are bean candidates; concrete declarations are
/// implementation details living next to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarationKind {
    #[default]
    Interface,
    Concrete,
}

/// Bean definition metadata
#[derive(Debug, Clone)]
pub struct BeanDefinition {
    pub name: String,
    pub bean_type: String,
    pub type_id: Option<TypeId>,
    pub role: Option<ServiceRole>,
    pub lazy_init: bool,
    pub primary: bool,
    pub description: Option<String>,
}

impl BeanDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            bean_type: name.clone(),
            name,
            type_id: None,
            role: None,
            lazy_init: true,
            primary: false,
            description: None,
        }
    }

    pub fn bean_type(mut self, bean_type: impl Into<String>, type_id: TypeId) -> Self {
        self.bean_type = bean_type.into();
        self.type_id = Some(type_id);
        self
    }

    pub fn role(mut self, role: ServiceRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn eager(mut self) -> Self {
        self.lazy_init = false;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Marks a data access service type with one or more roles and registers it
/// in the type catalog under `module_path!()::Type`.
///
/// Registrations are top-level interfaces unless flagged after a `;`:
/// `nested` for a type declared inside another type, `concrete` for an
/// implementation. Flagged types are never registered as beans.
///
/// ```rust,ignore
/// pub struct OrderQuery { handle: ServiceHandle }
/// impl DataAccessService for OrderQuery { /* ... */ }
///
/// jdac_client_spring::data_access_service!(OrderQuery => [Query]);
/// jdac_client_spring::data_access_service!(OrderQueryImpl => [Query]; concrete);
/// ```
#[macro_export]
macro_rules! data_access_service {
    ($ty:ident => [$($role:ident),+ $(,)?] $(; $($flag:ident),+ $(,)?)?) => {
        $crate::inventory::submit! {
            $crate::ServiceRegistration::new(
                concat!(module_path!(), "::", stringify!($ty)),
                &[$($crate::ServiceRole::$role),+],
                ::std::any::TypeId::of::<$ty>,
                $crate::supply::<$ty>,
            )
            $($(.$flag())+)?
        }
    };
}

/// Registers a [`jdac_client::JwtProvider`] implementation under
/// `module_path!()::Type` so configuration can name it in `jwt-provider.class`.
/// The type is built through `Default`.
#[macro_export]
macro_rules! jwt_provider {
    ($ty:ident) => {
        $crate::inventory::submit! {
            $crate::ProviderRegistration::new(
                concat!(module_path!(), "::", stringify!($ty)),
                $crate::construct::<$ty>,
            )
        }
    };
}

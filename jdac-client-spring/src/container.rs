use crate::{annotations::BeanDefinition, SpringError, SpringResult};
use dashmap::DashMap;
use std::{
    any::{Any, TypeId},
    sync::Arc,
};
use tracing::{debug, warn};

/// Type-erased bean instance
pub type BeanInstance = Arc<dyn Any + Send + Sync>;

/// Deferred bean supplier, invoked on first access
pub type BeanSupplier = Arc<dyn Fn() -> SpringResult<BeanInstance> + Send + Sync>;

/// Registry accepting named bean definitions
pub trait BeanDefinitionRegistry {
    /// Register a definition together with the supplier of its instance
    fn register_bean_definition(
        &self,
        definition: BeanDefinition,
        supplier: BeanSupplier,
    ) -> SpringResult<()>;

    fn contains_bean_definition(&self, name: &str) -> bool;

    fn bean_definition_count(&self) -> usize;
}

/// Dependency injection container
pub struct Container {
    /// Materialized bean instances
    beans: DashMap<String, BeanInstance>,

    /// Bean definitions
    definitions: DashMap<String, BeanDefinition>,

    /// Deferred suppliers
    suppliers: DashMap<String, BeanSupplier>,

    /// Type to bean name mapping
    type_registry: DashMap<TypeId, Vec<String>>,

    /// Container configuration
    config: ContainerConfig,
}

/// Container configuration
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// A second definition under an existing name replaces the first
    pub allow_bean_definition_overriding: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            allow_bean_definition_overriding: true,
        }
    }
}

impl Container {
    /// Create a new container
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Create a new container with configuration
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            beans: DashMap::new(),
            definitions: DashMap::new(),
            suppliers: DashMap::new(),
            type_registry: DashMap::new(),
            config,
        }
    }

    /// Register a ready-made instance
    pub fn register_singleton<T: Any + Send + Sync>(
        &self,
        name: impl Into<String>,
        instance: Arc<T>,
    ) -> SpringResult<()> {
        let definition = BeanDefinition::new(name)
            .bean_type(std::any::type_name::<T>(), TypeId::of::<T>())
            .eager();
        let instance: BeanInstance = instance;
        self.register_bean_definition(definition, Arc::new(move || Ok(instance.clone())))
    }

    /// Get bean by name, materializing it on first access
    pub fn get_bean(&self, name: &str) -> SpringResult<BeanInstance> {
        if let Some(bean) = self.beans.get(name) {
            return Ok(bean.clone());
        }

        let supplier = self
            .suppliers
            .get(name)
            .map(|supplier| supplier.clone())
            .ok_or_else(|| SpringError::bean_not_found(name))?;

        // the entry lock makes the supplier run at most once per bean
        let bean = self
            .beans
            .entry(name.to_string())
            .or_try_insert_with(|| {
                debug!("Instantiating bean: {}", name);
                supplier()
            })?;

        Ok(bean.clone())
    }

    /// Get bean by name as a concrete type
    pub fn get_bean_as<T: Any + Send + Sync>(&self, name: &str) -> SpringResult<Arc<T>> {
        self.get_bean(name)?
            .downcast::<T>()
            .map_err(|_| SpringError::bean_type(name, std::any::type_name::<T>()))
    }

    /// Get bean by type
    pub fn get_bean_by_type<T: Any + Send + Sync>(&self) -> SpringResult<Arc<T>> {
        let type_name = std::any::type_name::<T>();
        let bean_names = self
            .type_registry
            .get(&TypeId::of::<T>())
            .map(|names| names.clone())
            .unwrap_or_default();

        match bean_names.as_slice() {
            [] => Err(SpringError::bean_not_found(format!("type: {}", type_name))),
            [bean_name] => self.get_bean_as::<T>(bean_name),
            _ => {
                // If multiple beans of same type, look for primary
                let primary = bean_names.iter().find(|name| {
                    self.definitions
                        .get(name.as_str())
                        .map(|definition| definition.primary)
                        .unwrap_or(false)
                });

                match primary {
                    Some(bean_name) => self.get_bean_as::<T>(bean_name),
                    None => Err(SpringError::dependency_injection(format!(
                        "Multiple beans of type {} found, no primary bean specified",
                        type_name
                    ))),
                }
            }
        }
    }

    /// Check if bean exists
    pub fn contains_bean(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Check if bean has already been materialized
    pub fn is_instantiated(&self, name: &str) -> bool {
        self.beans.contains_key(name)
    }

    /// Get all bean names
    pub fn get_bean_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .definitions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Get bean definition
    pub fn get_bean_definition(&self, name: &str) -> SpringResult<BeanDefinition> {
        self.definitions
            .get(name)
            .map(|def| def.clone())
            .ok_or_else(|| SpringError::bean_not_found(name))
    }

    /// Materialize every definition not marked lazy
    pub fn preinstantiate_singletons(&self) -> SpringResult<usize> {
        let eager: Vec<String> = self
            .definitions
            .iter()
            .filter(|entry| !entry.value().lazy_init)
            .map(|entry| entry.key().clone())
            .collect();

        for name in &eager {
            self.get_bean(name)?;
        }

        debug!("Pre-instantiated {} singleton beans", eager.len());
        Ok(eager.len())
    }

    /// Get container statistics
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            definition_count: self.definitions.len(),
            instantiated_count: self.beans.len(),
            type_registrations: self.type_registry.len(),
        }
    }

    fn unlink_type(&self, name: &str, type_id: TypeId) {
        if let Some(mut names) = self.type_registry.get_mut(&type_id) {
            names.retain(|existing| existing != name);
        }
        self.type_registry.remove_if(&type_id, |_, names| names.is_empty());
    }
}

impl BeanDefinitionRegistry for Container {
    fn register_bean_definition(
        &self,
        definition: BeanDefinition,
        supplier: BeanSupplier,
    ) -> SpringResult<()> {
        let name = definition.name.clone();
        if name.trim().is_empty() {
            return Err(SpringError::bean_registration(name, "bean name is empty"));
        }

        if let Some(previous) = self.definitions.get(&name).map(|def| def.clone()) {
            if !self.config.allow_bean_definition_overriding {
                return Err(SpringError::bean_registration(
                    name,
                    "a bean with that name is already defined and overriding is disabled",
                ));
            }

            warn!(
                "Overriding bean definition for {}: {:?} replaced by {:?}",
                name, previous.role, definition.role
            );
            self.beans.remove(&name);
            if let Some(type_id) = previous.type_id {
                self.unlink_type(&name, type_id);
            }
        }

        if let Some(type_id) = definition.type_id {
            self.type_registry
                .entry(type_id)
                .or_insert_with(Vec::new)
                .push(name.clone());
        }

        self.suppliers.insert(name.clone(), supplier);
        self.definitions.insert(name.clone(), definition);

        debug!("Registered bean definition: {}", name);
        Ok(())
    }

    fn contains_bean_definition(&self, name: &str) -> bool {
        self.contains_bean(name)
    }

    fn bean_definition_count(&self) -> usize {
        self.definitions.len()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Container statistics
#[derive(Debug, Clone)]
pub struct ContainerStats {
    pub definition_count: usize,
    pub instantiated_count: usize,
    pub type_registrations: usize,
}

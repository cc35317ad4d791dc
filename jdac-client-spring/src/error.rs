use jdac_client::ClientError;
use thiserror::Error;

/// Errors that can occur while wiring data access beans
#[derive(Error, Debug)]
pub enum SpringError {
    /// The configured JWT provider type is unknown
    #[error("JwtProvider class name not found: {class_name}")]
    ProviderNotFound { class_name: String },

    /// The configured JWT provider type exists but cannot act as a provider
    #[error("class name is not conformed JwtProvider: {class_name} Cause: {reason}")]
    ProviderType { class_name: String, reason: String },

    /// A discovered service type cannot be resolved
    #[error("Error in getting bean class: {class_name}")]
    BeanClassResolution { class_name: String },

    /// Bean not found error
    #[error("Bean not found: {bean_name}")]
    BeanNotFound { bean_name: String },

    /// Bean exists but holds a different type
    #[error("Bean {bean_name} is not of type {expected}")]
    BeanType { bean_name: String, expected: String },

    /// Bean registration error
    #[error("Bean registration failed: {bean_name} - {reason}")]
    BeanRegistration { bean_name: String, reason: String },

    /// Dependency injection errors
    #[error("Dependency injection error: {message}")]
    DependencyInjection { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration source could not be read or bound
    #[error("Configuration binding error: {0}")]
    Config(#[from] config::ConfigError),

    /// Data access client error
    #[error("Data access client error: {0}")]
    Client(#[from] ClientError),
}

impl SpringError {
    /// Create a new provider-not-found error
    pub fn provider_not_found(class_name: impl Into<String>) -> Self {
        Self::ProviderNotFound {
            class_name: class_name.into(),
        }
    }

    /// Create a new provider type error
    pub fn provider_type(class_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProviderType {
            class_name: class_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new bean class resolution error
    pub fn bean_class_resolution(class_name: impl Into<String>) -> Self {
        Self::BeanClassResolution {
            class_name: class_name.into(),
        }
    }

    /// Create a new bean not found error
    pub fn bean_not_found(bean_name: impl Into<String>) -> Self {
        Self::BeanNotFound {
            bean_name: bean_name.into(),
        }
    }

    /// Create a new bean type error
    pub fn bean_type(bean_name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::BeanType {
            bean_name: bean_name.into(),
            expected: expected.into(),
        }
    }

    /// Create a new bean registration error
    pub fn bean_registration(bean_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BeanRegistration {
            bean_name: bean_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new dependency injection error
    pub fn dependency_injection(message: impl Into<String>) -> Self {
        Self::DependencyInjection {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Result type for Spring operations
pub type SpringResult<T> = Result<T, SpringError>;

//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::{build_item_routes, health_routes};
use crate::config::{AppConfig, ValidationStrategy};
use crate::core::error::{ItemServiceError, ItemServiceResult};
use crate::core::messages::MessageCatalog;
use crate::core::service::ItemRepository;
use crate::core::validation::{
    BindingFailurePolicy, ItemValidator, RuleGroup, ValidationPipeline, Validator,
};
use crate::entities::Item;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for the item form server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_repository(InMemoryItemRepository::new())
///     .with_strategy(ValidationStrategy::Declarative)
///     .build()?;
/// ```
pub struct ServerBuilder {
    repository: Option<Arc<dyn ItemRepository>>,
    catalog: MessageCatalog,
    strategy: ValidationStrategy,
    policy: BindingFailurePolicy,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a builder with the built-in message catalog
    pub fn new() -> Self {
        Self {
            repository: None,
            catalog: MessageCatalog::default_catalog(),
            strategy: ValidationStrategy::default(),
            policy: BindingFailurePolicy::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Apply the validation and message settings of `config`
    ///
    /// A configured message file is merged over the built-in catalog.
    pub fn from_config(config: &AppConfig) -> ItemServiceResult<Self> {
        let mut builder = Self::new()
            .with_strategy(config.validation.strategy)
            .with_binding_failure_policy(config.validation.binding_failure);

        if let Some(path) = &config.messages.path {
            let overrides = MessageCatalog::from_yaml_file(path)?;
            tracing::info!(path = %path.display(), entries = overrides.len(), "loaded messages");
            builder.catalog = builder.catalog.merge(overrides);
        }

        Ok(builder)
    }

    /// Set the item repository (required)
    pub fn with_repository(mut self, repository: impl ItemRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Replace the message catalog
    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_strategy(mut self, strategy: ValidationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_binding_failure_policy(mut self, policy: BindingFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Add routes next to the item routes
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    fn validator(&self) -> Arc<dyn Validator<Item>> {
        match self.strategy {
            ValidationStrategy::Declarative => Arc::new(Item::rule_set()),
            ValidationStrategy::Imperative => Arc::new(ItemValidator::new()),
        }
    }

    /// Build the shared handler state
    pub fn build_state(mut self) -> ItemServiceResult<AppState> {
        let validator = self.validator();
        let repository = self.repository.take().ok_or_else(|| {
            ItemServiceError::Internal(
                "ItemRepository is required. Call .with_repository()".to_string(),
            )
        })?;

        let policy = self.policy;
        let pipeline = |group| {
            ValidationPipeline::from_arc(validator.clone())
                .with_group(group)
                .with_binding_failure_policy(policy)
        };

        Ok(AppState {
            repository,
            catalog: Arc::new(self.catalog),
            save_pipeline: pipeline(RuleGroup::Save),
            update_pipeline: pipeline(RuleGroup::Update),
        })
    }

    /// Build the final router
    pub fn build(mut self) -> ItemServiceResult<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        tracing::debug!(strategy = ?self.strategy, policy = ?self.policy, "building router");
        let state = self.build_state()?;

        let mut app = health_routes().merge(build_item_routes(state));
        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryItemRepository;
    use std::io::Write;

    #[test]
    fn test_build_requires_repository() {
        let Err(err) = ServerBuilder::new().build() else {
            panic!("expected a missing repository error");
        };
        assert!(err.to_string().contains("with_repository"));
    }

    #[test]
    fn test_build_with_repository() {
        let app = ServerBuilder::new()
            .with_repository(InMemoryItemRepository::new())
            .build();
        assert!(app.is_ok());
    }

    #[test]
    fn test_state_pipelines_use_groups() {
        let state = ServerBuilder::new()
            .with_repository(InMemoryItemRepository::new())
            .with_binding_failure_policy(BindingFailurePolicy::ShortCircuit)
            .build_state()
            .unwrap();

        assert_eq!(state.save_pipeline.group(), Some(RuleGroup::Save));
        assert_eq!(state.update_pipeline.group(), Some(RuleGroup::Update));
        assert_eq!(state.save_pipeline.policy(), BindingFailurePolicy::ShortCircuit);
    }

    #[test]
    fn test_from_config_merges_messages() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "required: \"Mandatory\"").unwrap();

        let mut config = AppConfig::default();
        config.messages.path = Some(file.path().to_path_buf());
        let state = ServerBuilder::from_config(&config)
            .unwrap()
            .with_repository(InMemoryItemRepository::new())
            .build_state()
            .unwrap();

        assert_eq!(state.catalog.get("required"), Some("Mandatory"));
        assert!(state.catalog.get("totalPriceMin").is_some());
    }

    #[test]
    fn test_from_config_missing_messages_file() {
        let mut config = AppConfig::default();
        config.messages.path = Some("/nonexistent/errors.yaml".into());

        assert!(ServerBuilder::from_config(&config).is_err());
    }
}

//! Host lifecycle events and what the manager does on each.

use crate::error::{ArchitectureError, ConfigError};
use crate::host::ReconcilerResult;
use crate::manager::ArchitectureManager;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Per request/process initialization.
    Init,
    /// The host switched its active storage context (e.g. another tenant/site).
    ContextSwitch,
    /// Plugin activation / installation.
    Activation,
}

impl FromStr for LifecycleEvent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "init" => Ok(LifecycleEvent::Init),
            "context-switch" | "switch_blog" => Ok(LifecycleEvent::ContextSwitch),
            "activation" | "install" => Ok(LifecycleEvent::Activation),
            _ => Err(ConfigError::Settings(format!(
                "unknown lifecycle event: {} (expected init, context-switch or activation)",
                s
            ))),
        }
    }
}

impl ArchitectureManager {
    /// Run the work bound to `event`. Only activation yields reconciler results.
    pub async fn dispatch(&self, event: LifecycleEvent) -> Result<Vec<ReconcilerResult>, ArchitectureError> {
        tracing::debug!(?event, namespace = %self.settings().namespace, "lifecycle event");
        match event {
            LifecycleEvent::Init => {
                self.initialize_types_and_taxonomies()?;
                self.bind_meta_tables_on_init();
                Ok(Vec::new())
            }
            LifecycleEvent::ContextSwitch => {
                self.bind_meta_tables_on_init();
                Ok(Vec::new())
            }
            LifecycleEvent::Activation => self.install().await,
        }
    }
}

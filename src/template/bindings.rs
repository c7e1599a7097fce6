//! Placeholder bindings for the host document.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::workbench::escape_for_script;
use crate::config::{TemplateConfig, WorkbenchConfiguration};
use crate::template::RenderError;

pub const BASE: &str = "BASE";
pub const WORKBENCH_WEB_CONFIGURATION: &str = "WORKBENCH_WEB_CONFIGURATION";
pub const WORKBENCH_AUTH_SESSION: &str = "WORKBENCH_AUTH_SESSION";
pub const NLS_CONFIGURATION: &str = "NLS_CONFIGURATION";
pub const VS_BASE: &str = "VS_BASE";
pub const WORKBENCH_WEB_BASE_URL: &str = "WORKBENCH_WEB_BASE_URL";

/// Zero-argument producer of a placeholder value, invoked during rendering.
pub type Producer = Box<dyn Fn() -> Result<String, RenderError> + Send + Sync>;

/// Mapping from placeholder name to its producer.
#[derive(Default)]
pub struct Bindings {
    producers: HashMap<String, Producer>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a producer, replacing any previous binding.
    pub fn bind<F>(mut self, name: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Result<String, RenderError> + Send + Sync + 'static,
    {
        self.producers.insert(name.into(), Box::new(producer));
        self
    }

    /// Bind `name` to a fixed string.
    pub fn bind_value(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        self.bind(name, move || Ok(value.clone()))
    }

    pub fn get(&self, name: &str) -> Option<&Producer> {
        self.producers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.producers.contains_key(name)
    }

    /// The six bindings the workbench host page expects.
    pub fn workbench(template: &TemplateConfig, workbench: Arc<WorkbenchConfiguration>) -> Self {
        Self::new()
            .bind_value(BASE, template.base.clone())
            .bind(WORKBENCH_WEB_CONFIGURATION, move || {
                workbench
                    .to_embeddable_json()
                    .map_err(|source| RenderError::Produce {
                        name: WORKBENCH_WEB_CONFIGURATION.to_string(),
                        source,
                    })
            })
            .bind_value(WORKBENCH_AUTH_SESSION, template.auth_session.clone())
            .bind_value(NLS_CONFIGURATION, escape_for_script(&template.nls_configuration))
            .bind_value(VS_BASE, template.vs_base.clone())
            .bind_value(WORKBENCH_WEB_BASE_URL, template.web_base_url.clone())
    }
}

impl std::fmt::Debug for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.producers.keys().collect();
        names.sort();
        f.debug_struct("Bindings").field("names", &names).finish()
    }
}

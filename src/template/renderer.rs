//! Template rendering against a set of bindings.

use std::path::{Path, PathBuf};

use crate::template::{Bindings, RenderError, Segment, Template};

impl Template {
    /// Substitute every placeholder.
    ///
    /// Names are resolved up front; producers only run once all of them are
    /// known to be bound.
    pub fn render(&self, bindings: &Bindings) -> Result<String, RenderError> {
        for segment in self.segments() {
            if let Segment::Placeholder { name, line } = segment {
                if !bindings.contains(name) {
                    return Err(RenderError::Unbound {
                        line: *line,
                        name: name.clone(),
                    });
                }
            }
        }

        let mut out = String::new();
        for segment in self.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, line } => {
                    let producer = bindings.get(name).ok_or_else(|| RenderError::Unbound {
                        line: *line,
                        name: name.clone(),
                    })?;
                    out.push_str(&producer()?);
                }
            }
        }
        Ok(out)
    }
}

/// Renders the host document from a template file.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    path: PathBuf,
}

impl TemplateRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse and render the template.
    pub async fn render(&self, bindings: &Bindings) -> Result<String, RenderError> {
        let source = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RenderError::Read {
                path: self.path.clone(),
                source,
            })?;

        let template = Template::parse(&source)?;
        let document = template.render(bindings)?;

        tracing::trace!(
            path = %self.path.display(),
            placeholders = template.placeholders().count(),
            bytes = document.len(),
            "Template rendered"
        );
        Ok(document)
    }
}

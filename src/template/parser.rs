//! Placeholder parsing.
//!
//! Recognizes `{{NAME}}` (inner whitespace allowed) where NAME is an
//! identifier. Anything else between braces is rejected.

use crate::template::RenderError;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder { name: String, line: usize },
}

/// Parsed template: literal text interleaved with placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut line = 1;

        while let Some(open) = rest.find("{{") {
            let (literal, after_open) = rest.split_at(open);
            if !literal.is_empty() {
                segments.push(Segment::Literal(literal.to_string()));
            }
            line += literal.matches('\n').count();

            let body_start = &after_open[2..];
            let close = body_start
                .find("}}")
                .ok_or(RenderError::Unclosed { line })?;
            let text = &body_start[..close];
            let name = text.trim();
            if !is_identifier(name) {
                return Err(RenderError::InvalidPlaceholder {
                    line,
                    text: text.to_string(),
                });
            }
            segments.push(Segment::Placeholder {
                name: name.to_string(),
                line,
            });
            line += text.matches('\n').count();
            rest = &body_start[close + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_literals_and_placeholders() {
        let template = Template::parse("<base href=\"{{BASE}}\">{{ VS_BASE }}!").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("<base href=\"".into()),
                Segment::Placeholder { name: "BASE".into(), line: 1 },
                Segment::Literal("\">".into()),
                Segment::Placeholder { name: "VS_BASE".into(), line: 1 },
                Segment::Literal("!".into()),
            ]
        );
    }

    #[test]
    fn tracks_line_numbers() {
        let template = Template::parse("a\nb\n{{ONE}}\n\n{{TWO}}").unwrap();
        let lines: Vec<usize> = template
            .segments()
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder { line, .. } => Some(*line),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[test]
    fn no_placeholders_is_one_literal() {
        let template = Template::parse("<html></html>").unwrap();
        assert_eq!(template.placeholders().count(), 0);
        assert_eq!(template.segments().len(), 1);
    }

    #[test]
    fn unclosed_placeholder_fails() {
        let err = Template::parse("ok\n{{BASE").unwrap_err();
        assert!(matches!(err, RenderError::Unclosed { line: 2 }));
    }

    #[test]
    fn non_identifier_actions_fail() {
        for source in ["{{}}", "{{ .Field }}", "{{if X}}", "{{9LIVES}}"] {
            let err = Template::parse(source).unwrap_err();
            assert!(
                matches!(err, RenderError::InvalidPlaceholder { .. }),
                "{source}: {err:?}"
            );
        }
    }
}

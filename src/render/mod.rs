//! Literal `$name` substitution into configuration templates.
//!
//! There are no conditionals or loops here on purpose: every structural
//! decision (TLS or not, frontend or not) is made by the composer that picks
//! which template to render. Values are inserted verbatim, without escaping;
//! callers own the safety of what they pass in.

pub mod templates;

use crate::domain::DeployError;
use std::collections::BTreeMap;

pub type Substitutions = BTreeMap<&'static str, String>;

/// A named configuration template
#[derive(Debug, Clone, Copy)]
pub struct Template {
    id: &'static str,
    text: &'static str,
}

impl Template {
    pub const fn new(id: &'static str, text: &'static str) -> Self {
        Self { id, text }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Replace every `$name` / `${name}` with the mapped value.
    ///
    /// `$$` emits a literal `$`. A placeholder with no supplied value fails
    /// with [`DeployError::MissingKey`] and produces no partial output.
    pub fn render(&self, vars: &Substitutions) -> Result<String, DeployError> {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
                continue;
            }

            let (name, tail) = if let Some(braced) = after.strip_prefix('{') {
                match braced.split_once('}') {
                    Some((name, tail)) => (name, tail),
                    // Unterminated brace, keep it literal
                    None => ("", after),
                }
            } else {
                let end = after
                    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .unwrap_or(after.len());
                (&after[..end], &after[end..])
            };

            if name.is_empty() {
                out.push('$');
                rest = tail;
                continue;
            }

            match vars.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(DeployError::MissingKey {
                        template: self.id,
                        placeholder: name.to_string(),
                    });
                }
            }
            rest = tail;
        }

        out.push_str(rest);
        Ok(out)
    }
}

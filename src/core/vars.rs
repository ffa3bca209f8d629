//! Variable store and textual expansion.
//!
//! Bindings map a name to a raw value. Expansion scans left to right: `$$`
//! yields one literal `$`, `$(NAME)` and `${NAME}` read up to the first
//! closing delimiter, `$X` takes a single character as the name. The
//! extracted name is itself expanded before lookup, so names may be
//! computed; the looked-up value is spliced in verbatim, never re-expanded
//! by the same call. Unknown names fall back to the process environment and
//! otherwise expand to nothing.

use crate::core::error::MakeError;
use indexmap::IndexMap;
use serde::Serialize;

/// Name → raw value bindings, in definition order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct VarStore {
    vars: IndexMap<String, String>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`. The name is expanded first, so a reference
    /// like `$(V)` on the left-hand side defines a computed name. The value
    /// is stored raw. Re-binding a name overwrites its value in place.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), MakeError> {
        let name = self.expand(name)?;
        self.vars.insert(name, value.to_string());
        Ok(())
    }

    /// Look up a binding, falling back to the process environment.
    pub fn get(&self, name: &str) -> Option<String> {
        self.vars
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    }

    /// Iterate explicit bindings in definition order (environment fallback
    /// excluded).
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Expand every variable reference in `text`.
    pub fn expand(&self, text: &str) -> Result<String, MakeError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            match after.chars().next() {
                // A trailing `$` has nothing to name; keep it literal.
                None => {
                    out.push('$');
                    rest = "";
                }
                Some('$') => {
                    out.push('$');
                    rest = &after[1..];
                }
                Some('(') => {
                    let close = after.find(')').ok_or_else(|| {
                        MakeError::UnterminatedReference {
                            text: text.to_string(),
                        }
                    })?;
                    self.splice(&after[1..close], &mut out)?;
                    rest = &after[close + 1..];
                }
                Some('{') => {
                    let close = after.find('}').ok_or_else(|| {
                        MakeError::UnterminatedReference {
                            text: text.to_string(),
                        }
                    })?;
                    self.splice(&after[1..close], &mut out)?;
                    rest = &after[close + 1..];
                }
                Some(c) => {
                    let len = c.len_utf8();
                    self.splice(&after[..len], &mut out)?;
                    rest = &after[len..];
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Expand a reference's name, look it up once, and splice the raw value.
    fn splice(&self, raw_name: &str, out: &mut String) -> Result<(), MakeError> {
        let name = self.expand(raw_name)?;
        if let Some(value) = self.get(&name) {
            out.push_str(&value);
        }
        Ok(())
    }
}

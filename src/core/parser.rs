//! Makefile line parser.
//!
//! Line classification: `#` starts a comment running to end of line; a line
//! whose first `:` precedes any `=` opens a rule; a remaining line with `=`
//! binds a variable; everything else is ignored. A rule's recipe is the
//! run of TAB-prefixed lines immediately following it.

use crate::core::error::MakeError;
use crate::core::types::Rule;
use crate::core::Makefile;
use std::io::ErrorKind;
use std::path::Path;

/// Parse a makefile from disk.
pub fn parse_makefile(path: &Path) -> Result<Makefile, MakeError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            MakeError::MakefileNotFound {
                path: path.display().to_string(),
            }
        } else {
            MakeError::MakefileRead {
                path: path.display().to_string(),
                source: e,
            }
        }
    })?;
    parse_str(&text)
}

/// Parse makefile text into a rule/variable database.
pub fn parse_str(text: &str) -> Result<Makefile, MakeError> {
    let mut makefile = Makefile::default();
    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let cleaned = strip_comment(lines[i]);
        let trimmed = cleaned.trim();
        i += 1;
        if trimmed.is_empty() {
            continue;
        }

        if let Some(colon) = rule_colon(trimmed) {
            i = parse_rule(trimmed, colon, &lines, i, &mut makefile)?;
        } else if let Some(eq) = trimmed.find('=') {
            let name = trimmed[..eq].trim();
            let value = trimmed[eq + 1..].trim();
            makefile.vars.set(name, value)?;
        }
    }

    Ok(makefile)
}

/// Parse one rule line plus its recipe. Returns the index of the first line
/// after the recipe.
fn parse_rule(
    line: &str,
    colon: usize,
    lines: &[&str],
    mut i: usize,
    makefile: &mut Makefile,
) -> Result<usize, MakeError> {
    let target = makefile.vars.expand(line[..colon].trim())?;

    let deps_text = makefile.vars.expand(line[colon + 1..].trim())?;
    let mut rule = Rule::new(target);
    rule.deps = deps_text.split_whitespace().map(str::to_string).collect();

    // Recipe: the run of tab lines that follows, comments stripped. A line
    // whose comment started at column zero of the command text still counts
    // as part of the run but contributes nothing.
    while i < lines.len() && lines[i].starts_with('\t') {
        let cleaned = strip_comment(lines[i]);
        if cleaned.starts_with('\t') && !cleaned.trim().is_empty() {
            rule.recipe.push(cleaned.to_string());
        }
        i += 1;
    }

    // An empty expanded target drops the rule, recipe and all.
    if !rule.target.is_empty() {
        makefile.rules.add(rule);
    }
    Ok(i)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// A rule line has a `:` and, if a `=` is present, the `:` comes first.
/// Returns the position of the separating colon.
fn rule_colon(line: &str) -> Option<usize> {
    let colon = line.find(':')?;
    match line.find('=') {
        Some(equals) if equals < colon => None,
        _ => Some(colon),
    }
}

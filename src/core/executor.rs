//! Recipe execution.
//!
//! Each recipe line is substituted (`$@`, `$<`, `$^` first, then general
//! variable expansion), echoed unless silenced with a leading `@`, and run
//! as one `sh -c` subprocess sharing the parent's streams. The engine
//! blocks on each line; the first failure aborts the rest of the recipe.

use crate::core::error::MakeError;
use crate::core::types::Rule;
use crate::core::vars::VarStore;
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// Run every recipe line of `rule`, in order.
pub fn run(rule: &Rule, vars: &VarStore) -> Result<(), MakeError> {
    for line in &rule.recipe {
        let line = substitute_special(line, rule, vars)?;
        let line = vars.expand(&line)?;
        let line = line.trim_start_matches([' ', '\t']);

        // Echo policy: a leading `@` silences the line; otherwise the
        // command text is printed before the subprocess spawns.
        if !line.starts_with('@') {
            println!("{line}");
            let _ = std::io::stdout().flush();
        }

        let command = line
            .strip_prefix('@')
            .unwrap_or(line)
            .trim_start_matches([' ', '\t']);
        run_command(command, &rule.target)?;
    }
    Ok(())
}

/// Substitute the special tokens textually, before general expansion:
/// `$@` → target, `$<` → first dependency (expanded), `$^` → all
/// dependencies (expanded, space-joined).
fn substitute_special(line: &str, rule: &Rule, vars: &VarStore) -> Result<String, MakeError> {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(pos) = rest.find('$') {
        let after = &rest[pos + 1..];
        match after.chars().next() {
            Some('@') => {
                out.push_str(&rest[..pos]);
                out.push_str(&rule.target);
                rest = &after[1..];
            }
            Some('<') => {
                out.push_str(&rest[..pos]);
                if let Some(first) = rule.deps.first() {
                    out.push_str(&vars.expand(first)?);
                }
                rest = &after[1..];
            }
            Some('^') => {
                out.push_str(&rest[..pos]);
                for (i, dep) in rule.deps.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&vars.expand(dep)?);
                }
                rest = &after[1..];
            }
            _ => {
                out.push_str(&rest[..pos + 1]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Spawn `sh -c <command>`, inheriting the parent's streams, and wait.
fn run_command(command: &str, target: &str) -> Result<(), MakeError> {
    debug!(%target, %command, "spawning shell");
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .map_err(|source| MakeError::SpawnFailed {
            target: target.to_string(),
            source,
        })?;

    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(MakeError::RecipeFailed {
            target: target.to_string(),
            code,
        }),
        None => Err(MakeError::RecipeSignaled {
            target: target.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_with(target: &str, deps: &[&str], recipe: &[&str]) -> Rule {
        let mut rule = Rule::new(target);
        rule.deps = deps.iter().map(|d| d.to_string()).collect();
        rule.recipe = recipe.iter().map(|r| r.to_string()).collect();
        rule
    }

    #[test]
    fn test_substitute_special_tokens() {
        let vars = VarStore::new();
        let rule = rule_with("prog", &["a.o", "b.o"], &[]);
        let out = substitute_special("cc -o $@ $< $^", &rule, &vars).unwrap();
        assert_eq!(out, "cc -o prog a.o a.o b.o");
    }

    #[test]
    fn test_substitute_special_expands_deps() {
        let mut vars = VarStore::new();
        vars.set("OBJ", "main.o").unwrap();
        let rule = rule_with("prog", &["$(OBJ)", "util.o"], &[]);
        assert_eq!(
            substitute_special("$<", &rule, &vars).unwrap(),
            "main.o"
        );
        assert_eq!(
            substitute_special("$^", &rule, &vars).unwrap(),
            "main.o util.o"
        );
    }

    #[test]
    fn test_substitute_without_deps() {
        let vars = VarStore::new();
        let rule = rule_with("prog", &[], &[]);
        assert_eq!(substitute_special("$< $^", &rule, &vars).unwrap(), " ");
    }

    #[test]
    fn test_general_references_pass_through_special_pass() {
        let vars = VarStore::new();
        let rule = rule_with("prog", &[], &[]);
        assert_eq!(
            substitute_special("echo $(CC) $$HOME", &rule, &vars).unwrap(),
            "echo $(CC) $$HOME"
        );
    }

    #[test]
    fn test_run_executes_each_line() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let rule = rule_with(
            "all",
            &[],
            &[
                &format!("\t@touch {}", a.display()),
                &format!("\t@touch {}", b.display()),
            ],
        );
        run(&rule, &VarStore::new()).unwrap();
        assert!(a.exists());
        assert!(b.exists());
    }

    #[test]
    fn test_failure_aborts_remaining_lines() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let rule = rule_with(
            "all",
            &[],
            &["\t@false", &format!("\t@touch {}", marker.display())],
        );
        let err = run(&rule, &VarStore::new()).unwrap_err();
        assert!(matches!(err, MakeError::RecipeFailed { code: 1, .. }));
        assert!(!marker.exists());
    }

    #[test]
    fn test_variables_expanded_in_recipe() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("made-by-var");
        let mut vars = VarStore::new();
        vars.set("OUT", &out.display().to_string()).unwrap();
        let rule = rule_with("all", &[], &["\t@touch $(OUT)"]);
        run(&rule, &vars).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_special_tokens_usable_in_recipe() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("the-target");
        let rule = rule_with(&target.display().to_string(), &[], &["\t@touch $@"]);
        run(&rule, &VarStore::new()).unwrap();
        assert!(target.exists());
    }

    #[test]
    fn test_signal_death_is_a_failure() {
        let rule = rule_with("all", &[], &["\t@kill -9 $$$$"]);
        let err = run(&rule, &VarStore::new()).unwrap_err();
        assert!(matches!(err, MakeError::RecipeSignaled { .. }));
    }

    #[test]
    fn test_exit_code_reported() {
        let rule = rule_with("all", &[], &["\t@exit 7"]);
        let err = run(&rule, &VarStore::new()).unwrap_err();
        assert!(matches!(err, MakeError::RecipeFailed { code: 7, .. }));
    }
}

//! Build orchestration — recursive dependency resolution, tri-state
//! classification, per-run deduplication.
//!
//! Resolution is depth-first and strictly single-threaded: dependencies are
//! satisfied in file order, and the first failure aborts the run. Once a
//! target name enters the dedup set it is never re-resolved or re-executed
//! within the same run.

use crate::core::error::MakeError;
use crate::core::executor;
use crate::core::types::{Disposition, Rule};
use crate::core::Makefile;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Per-run mutable state. Dropped with the builder when the run ends.
#[derive(Debug, Default)]
struct BuildState {
    /// Targets already processed this run.
    built: FxHashSet<String>,
    /// Targets whose dependencies are still resolving. A revisit here is a
    /// dependency cycle.
    in_progress: FxHashSet<String>,
}

/// One build run over a parsed makefile.
pub struct Builder<'a> {
    makefile: &'a Makefile,
    state: BuildState,
}

impl<'a> Builder<'a> {
    pub fn new(makefile: &'a Makefile) -> Self {
        Builder {
            makefile,
            state: BuildState::default(),
        }
    }

    /// Build one target, recursively satisfying its dependencies first.
    pub fn build(&mut self, target: &str) -> Result<(), MakeError> {
        self.build_inner(target, None)
    }

    fn build_inner(&mut self, target: &str, required_by: Option<&str>) -> Result<(), MakeError> {
        let makefile = self.makefile;
        let target = makefile.vars.expand(target)?;

        // Dedup: a processed target only reports its status.
        if self.state.built.contains(&target) {
            debug!(%target, "already processed this run");
            if makefile.rules.is_phony(&target) {
                println!("yunque: Nothing to be done for '{target}'.");
            } else {
                println!("yunque: '{target}' is up to date.");
            }
            return Ok(());
        }

        let rule = match makefile.rules.find(&target) {
            Some(rule) => rule,
            None => {
                return Err(match required_by {
                    Some(parent) => MakeError::MissingDependency {
                        target,
                        required_by: parent.to_string(),
                    },
                    None => MakeError::MissingRule { target },
                })
            }
        };

        if !self.state.in_progress.insert(target.clone()) {
            return Err(MakeError::CircularDependency { target });
        }

        // Dependencies first, in file order; the first failure aborts.
        for dep in &rule.deps {
            let dep = makefile.vars.expand(dep)?;
            let dep_rule = makefile.rules.find(&dep);
            if dep_rule.is_none() && !file_exists(&dep) {
                return Err(MakeError::MissingDependency {
                    target: dep,
                    required_by: target.clone(),
                });
            }
            if dep_rule.is_some() {
                self.build_inner(&dep, Some(&target))?;
            }
        }

        self.state.in_progress.remove(&target);
        self.state.built.insert(target.clone());

        let disposition = self.classify(rule)?;
        debug!(%target, %disposition, "classified");
        match disposition {
            Disposition::NothingToDo => {
                println!("yunque: Nothing to be done for '{target}'.");
                Ok(())
            }
            Disposition::UpToDate => {
                println!("yunque: '{target}' is up to date.");
                Ok(())
            }
            Disposition::NeedsBuild => executor::run(rule, &makefile.vars),
        }
    }

    /// Classify a rule once its dependencies have been satisfied.
    ///
    /// The memo lives for a single pass. No recipe runs while a pass is in
    /// flight, so file timestamps are stable and the memoized result is
    /// identical to the plain recursion.
    pub fn classify(&self, rule: &Rule) -> Result<Disposition, MakeError> {
        let mut memo = FxHashMap::default();
        self.classify_memo(rule, &mut memo)
    }

    fn classify_memo(
        &self,
        rule: &Rule,
        memo: &mut FxHashMap<String, Disposition>,
    ) -> Result<Disposition, MakeError> {
        if let Some(disposition) = memo.get(&rule.target) {
            return Ok(*disposition);
        }
        let disposition = if rule.recipe.is_empty() {
            if self.deps_satisfied(rule, memo)? {
                Disposition::NothingToDo
            } else {
                Disposition::NeedsBuild
            }
        } else {
            self.classify_with_recipe(rule, memo)?
        };
        memo.insert(rule.target.clone(), disposition);
        Ok(disposition)
    }

    /// A rule with a recipe is up to date iff its target file exists, every
    /// dependency is satisfied, and the target is not older than any
    /// dependency file. Dependencies without a file are skipped in the
    /// timestamp comparison.
    fn classify_with_recipe(
        &self,
        rule: &Rule,
        memo: &mut FxHashMap<String, Disposition>,
    ) -> Result<Disposition, MakeError> {
        let target_mtime = match mtime(&rule.target) {
            Some(t) => t,
            None => return Ok(Disposition::NeedsBuild),
        };
        if !self.deps_satisfied(rule, memo)? {
            return Ok(Disposition::NeedsBuild);
        }
        for dep in &rule.deps {
            let dep = self.makefile.vars.expand(dep)?;
            if let Some(dep_mtime) = mtime(&dep) {
                if target_mtime < dep_mtime {
                    return Ok(Disposition::NeedsBuild);
                }
            }
        }
        Ok(Disposition::UpToDate)
    }

    /// Every dependency is itself settled: with a rule, it classifies as
    /// nothing-to-do or up-to-date; without one, its file must exist.
    fn deps_satisfied(
        &self,
        rule: &Rule,
        memo: &mut FxHashMap<String, Disposition>,
    ) -> Result<bool, MakeError> {
        for dep in &rule.deps {
            let dep = self.makefile.vars.expand(dep)?;
            let settled = match self.makefile.rules.find(&dep) {
                Some(dep_rule) => {
                    self.classify_memo(dep_rule, memo)? != Disposition::NeedsBuild
                }
                None => file_exists(&dep),
            };
            if !settled {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn file_exists(path: &str) -> bool {
    Path::new(path).exists()
}

fn mtime(path: &str) -> Option<SystemTime> {
    std::fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

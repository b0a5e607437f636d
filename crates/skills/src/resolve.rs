use std::{collections::HashSet, path::Path};

use crate::{
    discover::discover,
    error::{Error, Result},
    types::{SkillPath, WILDCARD},
};

/// Turn caller tokens into the ordered, de-duplicated list of skills to act on.
///
/// Empty tokens are dropped. No remaining tokens, or any `all` token, means
/// every discovered skill; other names alongside `all` are ignored. Otherwise
/// the tokens are used verbatim as skill paths without checking the
/// filesystem, so a missing directory surfaces when it is packaged or
/// installed.
pub fn resolve<S: AsRef<str>>(repo_root: &Path, tokens: &[S]) -> Result<Vec<SkillPath>> {
    let requested: Vec<&str> = tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !t.is_empty())
        .collect();

    let candidates = if requested.is_empty() || requested.contains(&WILDCARD) {
        discover(repo_root)?
    } else {
        requested.into_iter().map(SkillPath::from).collect()
    };

    Ok(dedup(candidates))
}

/// Drop repeated entries, keeping the first occurrence of each.
fn dedup(paths: Vec<SkillPath>) -> Vec<SkillPath> {
    let mut seen = HashSet::with_capacity(paths.len());
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Fail with [`Error::NoSkillsResolved`] when there is nothing to `action`.
pub fn require_any(paths: Vec<SkillPath>, action: &'static str) -> Result<Vec<SkillPath>> {
    if paths.is_empty() {
        return Err(Error::NoSkillsResolved { action });
    }
    Ok(paths)
}

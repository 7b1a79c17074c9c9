//! Configuration loading for Tenor

mod schema;

pub use schema::{Config, ConfigOverride, LexiconConfig, RuleSeverity, DEFAULT_TEST_PATTERNS};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".tenorrc.json";

/// Load the effective config for `work_dir`.
///
/// An explicit `custom_path` must exist; otherwise the nearest `.tenorrc.json`
/// in `work_dir` or an ancestor is used, and no file at all means defaults.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = match custom_path {
        Some(p) => {
            let path = work_dir.join(p);
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path)
        }
        None => find_config_in_parents(work_dir),
    };

    let Some(path) = path else {
        return Ok(Config::default());
    };
    tracing::debug!(config = %path.display(), "loading config");

    let config = extends_chain(&path)?
        .into_iter()
        .rev()
        .reduce(|base, mut layer| {
            layer.merge_from(base);
            layer
        })
        .unwrap_or_default();

    for rule in config.unknown_rules() {
        tracing::warn!(rule, "unknown rule id in config");
    }
    Ok(config)
}

/// Read `path` and every config it extends, leaf first.
fn extends_chain(path: &Path) -> Result<Vec<Config>> {
    let mut seen = HashSet::new();
    let mut layers = Vec::new();
    let mut next = Some(path.to_path_buf());

    while let Some(current) = next.take() {
        let key = current.canonicalize().unwrap_or_else(|_| current.clone());
        if !seen.insert(key) {
            anyhow::bail!("Circular extends in config: {}", current.display());
        }

        let mut layer = read_config(&current)?;
        if let Some(parent) = layer.extends.take() {
            next = Some(extends_target(&current, &parent)?);
        }
        layers.push(layer);
    }
    Ok(layers)
}

fn read_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in config: {}", path.display()))
}

/// `extends` is relative to the extending file; a missing extension means `.json`
fn extends_target(from: &Path, extends: &str) -> Result<PathBuf> {
    let mut target = from.parent().unwrap_or(Path::new(".")).join(extends);
    if target.extension().is_none() {
        target.set_extension("json");
    }
    if !target.is_file() {
        anyhow::bail!(
            "Config {} extends {}, which does not exist",
            from.display(),
            target.display()
        );
    }
    Ok(target)
}

/// Nearest `.tenorrc.json` in `start` or one of its ancestors
pub fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

/// Compile `ignore` globs into one matcher
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    patterns
        .iter()
        .try_fold(GlobSetBuilder::new(), |mut builder, pattern| {
            builder.add(Glob::new(pattern).with_context(|| format!("Bad ignore glob `{}`", pattern))?);
            Ok::<_, anyhow::Error>(builder)
        })?
        .build()
        .context("Failed to compile ignore globs")
}

pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

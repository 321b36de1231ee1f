//! Multi-file configuration loading.
//!
//! A root document may import further YAML/JSON files through
//! `config.imports`. Loading walks the import graph depth-first, merges
//! every file with later-wins precedence (imports first, importer last),
//! overlays `CHAINWATCH_*` environment variables, validates the merged
//! document and resolves cross-references. All failures inside a phase are
//! aggregated; nothing stops at the first finding.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use figment::providers::{Env, Format, Json, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::meta::ConfigMeta;
use crate::parsed::{ParsedConfig, ResourceCounts};
use crate::report::{CircularReference, ConfigValidationError, ErrorCode, ResourceKind};
use crate::resolver;
use crate::ChainwatchConfig;

/// Prefix for environment-variable overrides, split on `__`.
pub const ENV_PREFIX: &str = "CHAINWATCH_";

/// Externally observable result of loading a configuration tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigLoadResult {
    pub config: ParsedConfig,
    pub metadata: LoadMetadata,
}

/// Bookkeeping produced alongside a successful load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadMetadata {
    /// Merged files in merge order (imports before their importer).
    pub files_loaded: Vec<PathBuf>,

    pub total_resources: usize,

    pub resource_counts: ResourceCounts,

    /// Issues demoted to warnings (lenient mode, disabled-channel refs).
    pub validation_warnings: Vec<String>,

    pub load_time_ms: u64,
}

/// Load a configuration tree; strictness comes from the root document.
pub fn load_tree<P: AsRef<Path>>(path: P) -> Result<ConfigLoadResult, ConfigError> {
    load_tree_inner(path.as_ref(), None)
}

/// Load a configuration tree with duplicate names, dangling references and
/// missing env vars demoted to warnings regardless of `config.strict`.
pub fn load_tree_lenient<P: AsRef<Path>>(path: P) -> Result<ConfigLoadResult, ConfigError> {
    load_tree_inner(path.as_ref(), Some(false))
}

/// Merge one file into the figment, choosing the provider by extension.
pub(crate) fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Yaml::file(path)),
    }
}

fn load_tree_inner(root: &Path, strict_override: Option<bool>) -> Result<ConfigLoadResult, ConfigError> {
    let started = Instant::now();
    if !root.exists() {
        return Err(ConfigError::FileNotFound(root.to_path_buf()));
    }

    let mut walker = TreeWalker::new();
    walker.visit(root);
    let TreeWalker {
        visited,
        merged,
        fatal,
        duplicates,
        cycles,
        ..
    } = walker;

    // Unreadable or unparseable files make the merged document unreliable;
    // report everything discovered so far and stop.
    if !fatal.is_empty() {
        let mut errors = fatal;
        errors.extend(duplicates);
        errors.extend(cycles.iter().map(ConfigValidationError::from));
        return Err(ConfigError::Invalid(errors));
    }

    let figment = merged.merge(Env::prefixed(ENV_PREFIX).split("__"));
    let document: ChainwatchConfig = figment.extract()?;
    let strict = strict_override.unwrap_or(document.config.strict);

    let schema_errors = document.validate_all();
    if !schema_errors.is_empty() {
        let mut errors = schema_errors;
        if strict {
            errors.extend(duplicates);
            errors.extend(cycles.iter().map(ConfigValidationError::from));
        }
        return Err(ConfigError::Invalid(errors));
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for duplicate in duplicates {
        route(strict, duplicate, &mut errors, &mut warnings);
    }
    for cycle in &cycles {
        route(strict, cycle.into(), &mut errors, &mut warnings);
    }
    for var in &document.global.required_env_vars {
        if std::env::var(var).is_err() {
            let err = ConfigValidationError::new(
                ErrorCode::MissingEnvVar,
                format!("required environment variable '{var}' is not set"),
            )
            .with_suggestion(format!("export {var} before starting"));
            route(strict, err, &mut errors, &mut warnings);
        }
    }

    let check_references = document.config.validate_references;
    let parsed = document.into_parsed();

    if check_references {
        let mut report = resolver::validate_references(&parsed);
        report.circular_references = cycles.clone();
        report.valid = report.missing_references.is_empty() && report.circular_references.is_empty();
        for missing in &report.missing_references {
            route(strict, missing.into(), &mut errors, &mut warnings);
        }
        warnings.extend(resolver::disabled_channel_warnings(&parsed));
    }

    if !errors.is_empty() {
        return Err(ConfigError::Invalid(errors));
    }

    let resource_counts = parsed.resource_counts();
    let metadata = LoadMetadata {
        total_resources: resource_counts.total(),
        resource_counts,
        files_loaded: visited,
        validation_warnings: warnings,
        load_time_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        files = metadata.files_loaded.len(),
        resources = metadata.total_resources,
        "configuration loaded"
    );
    Ok(ConfigLoadResult {
        config: parsed,
        metadata,
    })
}

fn route(
    strict: bool,
    err: ConfigValidationError,
    errors: &mut Vec<ConfigValidationError>,
    warnings: &mut Vec<String>,
) {
    if strict {
        errors.push(err);
    } else {
        warn!("{err}");
        warnings.push(err.to_string());
    }
}

/// Depth-first walk over the import graph.
struct TreeWalker {
    /// Canonical paths in merge order.
    visited: Vec<PathBuf>,
    /// Canonical paths on the current DFS path.
    stack: Vec<PathBuf>,
    /// First definition site per (collection, resource id).
    seen_resources: BTreeMap<(&'static str, String), PathBuf>,
    merged: Figment,
    fatal: Vec<ConfigValidationError>,
    duplicates: Vec<ConfigValidationError>,
    cycles: Vec<CircularReference>,
}

impl TreeWalker {
    fn new() -> Self {
        Self {
            visited: Vec::new(),
            stack: Vec::new(),
            seen_resources: BTreeMap::new(),
            merged: Figment::from(Serialized::defaults(ChainwatchConfig::default())),
            fatal: Vec::new(),
            duplicates: Vec::new(),
            cycles: Vec::new(),
        }
    }

    fn visit(&mut self, path: &Path) {
        let canon = match fs::canonicalize(path) {
            Ok(canon) => canon,
            Err(e) => {
                self.fatal.push(ConfigValidationError::new(
                    ErrorCode::MissingImport,
                    format!("cannot resolve '{}': {e}", path.display()),
                ));
                return;
            }
        };

        if let Some(position) = self.stack.iter().position(|p| p == &canon) {
            let files: Vec<PathBuf> = self.stack[position..].to_vec();
            let mut cycle: Vec<String> = files.iter().map(|p| document_name(p)).collect();
            cycle.push(document_name(&canon));
            self.cycles.push(CircularReference { cycle, files });
            return;
        }
        if self.visited.contains(&canon) {
            debug!(file = %canon.display(), "skipping already merged file");
            return;
        }

        self.stack.push(canon.clone());
        match parse_header(&canon) {
            Ok((meta, doc)) => {
                let base = canon
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                for import in &meta.imports {
                    let target = base.join(import);
                    if target.exists() {
                        self.visit(&target);
                    } else {
                        self.fatal.push(
                            ConfigValidationError::new(
                                ErrorCode::MissingImport,
                                format!("imported file '{}' does not exist", import.display()),
                            )
                            .at_file(&canon)
                            .with_suggestion(
                                "paths in config.imports are relative to the importing file",
                            ),
                        );
                    }
                }

                // Post-order merge: imports land first, the importer last.
                let merged = std::mem::replace(&mut self.merged, Figment::new());
                self.merged = merge_file(merged, &canon);
                self.record_duplicates(&doc, &canon);
                debug!(file = %canon.display(), "merged configuration file");
                self.visited.push(canon);
            }
            Err(err) => self.fatal.push(err),
        }
        self.stack.pop();
    }

    fn record_duplicates(&mut self, doc: &serde_yaml::Value, file: &Path) {
        let kinds = [
            ResourceKind::NotificationChannel,
            ResourceKind::Watchlist,
            ResourceKind::CustomAgent,
        ];
        for kind in kinds {
            let Some(mapping) = doc
                .get("resources")
                .and_then(|resources| resources.get(kind.collection()))
                .and_then(serde_yaml::Value::as_mapping)
            else {
                continue;
            };
            for key in mapping.keys().filter_map(serde_yaml::Value::as_str) {
                let slot = (kind.collection(), key.to_string());
                if let Some(previous) = self.seen_resources.get(&slot) {
                    self.duplicates.push(
                        ConfigValidationError::new(
                            ErrorCode::DuplicateResource,
                            format!(
                                "{kind} '{key}' is defined in both '{}' and '{}'; the latter wins",
                                previous.display(),
                                file.display()
                            ),
                        )
                        .at_file(file)
                        .for_resource(kind, key),
                    );
                } else {
                    self.seen_resources.insert(slot, file.to_path_buf());
                }
            }
        }
    }
}

/// Parse one file for its `config` header and raw structure.
///
/// Loose on purpose: override files may carry partial resources that only
/// become complete after the merge, so typed extraction happens once, over
/// the merged figment.
fn parse_header(path: &Path) -> Result<(ConfigMeta, serde_yaml::Value), ConfigValidationError> {
    let text = fs::read_to_string(path).map_err(|e| {
        ConfigValidationError::new(ErrorCode::ParseError, format!("failed to read file: {e}"))
            .at_file(path)
    })?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&text).map_err(|e| {
        let mut err =
            ConfigValidationError::new(ErrorCode::ParseError, e.to_string()).at_file(path);
        if let Some(location) = e.location() {
            err = err.at_location(location.line(), location.column());
        }
        err
    })?;
    let meta = match doc.get("config") {
        Some(value) => serde_yaml::from_value(value.clone()).map_err(|e| {
            ConfigValidationError::new(
                ErrorCode::ParseError,
                format!("invalid config block: {e}"),
            )
            .at_file(path)
        })?,
        None => ConfigMeta::default(),
    };
    Ok((meta, doc))
}

fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_file() {
        let err = load_tree("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn document_names_use_file_stem() {
        assert_eq!(document_name(Path::new("/etc/cw/base.yaml")), "base");
        assert_eq!(document_name(Path::new("channels.json")), "channels");
    }
}

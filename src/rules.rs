/// Rule store: persistence and caching for the scoring rubric.
///
/// The rubric lives in a single JSON artifact. The store seeds it with
/// the default rubric on first use, loads with validation, saves with
/// validation (atomic replace, never a partial write), and caches the
/// parsed result keyed by the artifact's modification timestamp so a
/// burst of scoring calls avoids re-parsing.
///
/// The store is an explicit object injected through application state;
/// there is no hidden static. Tests point one at a temp directory.
use crate::errors::AppError;
use crate::models::{RulesConfig, SizeBand};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

/// Default rubric used to seed an empty store.
pub fn default_rules() -> RulesConfig {
    let title_includes: HashMap<String, i64> = [
        ("marketing", 10),
        ("growth", 10),
        ("demand", 10),
        ("vp", 15),
        ("chief", 20),
        ("head", 12),
        ("director", 12),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    RulesConfig {
        title_includes,
        company_size_points: vec![
            SizeBand { min: 1, max: 49, points: 5 },
            SizeBand { min: 50, max: 199, points: 10 },
            SizeBand { min: 200, max: 999, points: 20 },
            SizeBand { min: 1000, max: 1_000_000, points: 25 },
        ],
        country_boost: [("United States".to_string(), 5)].into_iter().collect(),
        source_boost: [
            ("Product Signup".to_string(), 15),
            ("Website".to_string(), 10),
            ("LinkedIn".to_string(), 8),
        ]
        .into_iter()
        .collect(),
        penalties: [("missing_company".to_string(), -5)].into_iter().collect(),
    }
}

fn push_integer_map_violations(value: &Value, field: &str, violations: &mut Vec<String>) {
    match value.get(field) {
        Some(Value::Object(map)) => {
            for (k, v) in map {
                if !v.is_i64() {
                    violations.push(format!("{}.{} must be an integer", field, k));
                }
            }
        }
        Some(_) => violations.push(format!("{} must be an object of integers", field)),
        None => violations.push(format!("{} is required", field)),
    }
}

/// Validate a candidate rubric, collecting every violation rather than
/// stopping at the first one. Returns the typed config on success.
pub fn validate_rules(candidate: &Value) -> Result<RulesConfig, AppError> {
    let mut violations = Vec::new();

    push_integer_map_violations(candidate, "title_includes", &mut violations);
    push_integer_map_violations(candidate, "country_boost", &mut violations);
    push_integer_map_violations(candidate, "source_boost", &mut violations);
    push_integer_map_violations(candidate, "penalties", &mut violations);

    match candidate.get("company_size_points") {
        Some(Value::Array(bands)) => {
            for (i, band) in bands.iter().enumerate() {
                for key in ["min", "max", "points"] {
                    if band.get(key).map(|v| v.is_i64()) != Some(true) {
                        violations.push(format!(
                            "company_size_points[{}].{} must be an integer",
                            i, key
                        ));
                    }
                }
                if let (Some(min), Some(max)) = (
                    band.get("min").and_then(Value::as_i64),
                    band.get("max").and_then(Value::as_i64),
                ) {
                    if min > max {
                        violations
                            .push(format!("company_size_points[{}]: min exceeds max", i));
                    }
                }
            }
        }
        Some(_) => violations.push("company_size_points must be a list of bands".to_string()),
        None => violations.push("company_size_points is required".to_string()),
    }

    if !violations.is_empty() {
        return Err(AppError::Config(violations.join("; ")));
    }

    serde_json::from_value(candidate.clone()).map_err(|e| AppError::Config(e.to_string()))
}

struct CacheEntry {
    mtime: SystemTime,
    rules: Arc<RulesConfig>,
}

/// Change-aware store for the persisted rubric artifact.
pub struct RuleStore {
    path: PathBuf,
    cache: RwLock<Option<CacheEntry>>,
}

impl RuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed the artifact with the default rubric if it does not exist.
    pub fn ensure_seeded(&self) -> Result<(), AppError> {
        if !self.path.exists() {
            let body = serde_json::to_string_pretty(&default_rules())?;
            std::fs::write(&self.path, body)?;
            tracing::info!("Seeded default scoring rules at {}", self.path.display());
        }
        Ok(())
    }

    fn mtime(&self) -> Result<SystemTime, AppError> {
        Ok(std::fs::metadata(&self.path)?.modified()?)
    }

    /// Load the current rubric, re-reading the artifact only when its
    /// modification timestamp changed since the last load.
    pub fn load(&self) -> Result<Arc<RulesConfig>, AppError> {
        self.ensure_seeded()?;
        let mtime = self.mtime()?;

        if let Some(entry) = self
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            if entry.mtime == mtime {
                tracing::debug!("Rules cache hit ({})", self.path.display());
                return Ok(Arc::clone(&entry.rules));
            }
        }

        let body = std::fs::read_to_string(&self.path)?;
        let candidate: Value = serde_json::from_str(&body)?;
        let rules = Arc::new(validate_rules(&candidate)?);

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(CacheEntry {
            mtime,
            rules: Arc::clone(&rules),
        });
        tracing::debug!("Rules reloaded from {}", self.path.display());
        Ok(rules)
    }

    /// Validate a candidate rubric and atomically replace the artifact
    /// and the cache entry. On validation failure nothing is written
    /// and the previously persisted rubric stays in force.
    pub fn save(&self, candidate: &Value) -> Result<RulesConfig, AppError> {
        let rules = validate_rules(candidate)?;

        // Write-then-rename so a crash mid-save never leaves a torn file.
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(&rules)?;
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;

        let mtime = self.mtime()?;
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(CacheEntry {
            mtime,
            rules: Arc::new(rules.clone()),
        });
        tracing::info!("Scoring rules replaced ({})", self.path.display());
        Ok(rules)
    }
}

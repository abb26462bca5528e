//! json5 scenario file model.

use anyhow::Context;
use memory_grid::MemoryGridConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub grid: GridSection,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSection {
    #[serde(default = "GridSection::default_name")]
    pub name: String,
    #[serde(default)]
    pub latency_ms: u64,
    #[serde(default)]
    pub default_ttl_ms: Option<u64>,
}

impl GridSection {
    fn default_name() -> String {
        "grid-console".to_string()
    }

    /// Grid settings, with `latency_ms` taking precedence over the file.
    pub fn to_grid_config(&self, latency_ms: Option<u64>) -> MemoryGridConfig {
        MemoryGridConfig::default()
            .with_name(self.name.clone())
            .with_latency(Duration::from_millis(latency_ms.unwrap_or(self.latency_ms)))
            .with_default_ttl(self.default_ttl_ms.map(Duration::from_millis))
    }
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            latency_ms: 0,
            default_ttl_ms: None,
        }
    }
}

/// One scenario operation, selected by its `op` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Get { counter: String },
    Set { counter: String, value: i64 },
    IncrementAndGet { counter: String },
    GetAndIncrement { counter: String },
    DecrementAndGet { counter: String },
    AddAndGet { counter: String, delta: i64 },
    GetAndAdd { counter: String, delta: i64 },
    GetAndSet { counter: String, value: i64 },
    CompareAndSet { counter: String, expect: i64, update: i64 },
    AlterAdd { counter: String, delta: i64 },
    AlterAndGetAdd { counter: String, delta: i64 },
    GetAndAlterAdd { counter: String, delta: i64 },
    ApplyMultiply { counter: String, factor: i64 },
    MapGet { map: String, key: String },
    MapPut {
        map: String,
        key: String,
        value: String,
        #[serde(default)]
        ttl_ms: Option<u64>,
    },
    MapSet {
        map: String,
        key: String,
        value: String,
        #[serde(default)]
        ttl_ms: Option<u64>,
    },
    MapRemove { map: String, key: String },
    MapAppend { map: String, key: String, suffix: String },
    Sleep { ms: u64 },
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Step::Get { .. } => "get",
            Step::Set { .. } => "set",
            Step::IncrementAndGet { .. } => "increment_and_get",
            Step::GetAndIncrement { .. } => "get_and_increment",
            Step::DecrementAndGet { .. } => "decrement_and_get",
            Step::AddAndGet { .. } => "add_and_get",
            Step::GetAndAdd { .. } => "get_and_add",
            Step::GetAndSet { .. } => "get_and_set",
            Step::CompareAndSet { .. } => "compare_and_set",
            Step::AlterAdd { .. } => "alter_add",
            Step::AlterAndGetAdd { .. } => "alter_and_get_add",
            Step::GetAndAlterAdd { .. } => "get_and_alter_add",
            Step::ApplyMultiply { .. } => "apply_multiply",
            Step::MapGet { .. } => "map_get",
            Step::MapPut { .. } => "map_put",
            Step::MapSet { .. } => "map_set",
            Step::MapRemove { .. } => "map_remove",
            Step::MapAppend { .. } => "map_append",
            Step::Sleep { .. } => "sleep",
        }
    }
}

pub fn parse(source: &str) -> anyhow::Result<ScenarioConfig> {
    json5::from_str(source).context("Unable to parse scenario")
}

pub fn load(path: &Path) -> anyhow::Result<ScenarioConfig> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Unable to read scenario file {}", path.display()))?;
    parse(&source).with_context(|| format!("Invalid scenario file {}", path.display()))
}

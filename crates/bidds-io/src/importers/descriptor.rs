//! System descriptor loader (JSON or YAML).
//!
//! A descriptor lists components as tagged objects. Components whose
//! `category` is not one of [`Component::CATEGORIES`] are kept as
//! [`Component::Unsupported`] so the exporters can report and skip them.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use bidds_core::{Component, MegavoltAmperes, System, TimeSeriesEntry, UnsupportedComponent};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Descriptor {
    name: String,
    base_power: MegavoltAmperes,
    #[serde(default)]
    components: Vec<Value>,
    #[serde(default)]
    time_series: Vec<TimeSeriesEntry>,
}

/// Load a system descriptor, picking the parser from the file extension.
pub fn load_system(path: &Path) -> Result<System> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading system descriptor '{}'", path.display()))?;
    let descriptor: Descriptor = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing system descriptor yaml")?
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing system descriptor json")?
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing system descriptor")?,
    };
    build_system(descriptor)
}

/// Parse a JSON descriptor held in memory
pub fn parse_system_json(data: &str) -> Result<System> {
    let descriptor: Descriptor =
        serde_json::from_str(data).context("parsing system descriptor json")?;
    build_system(descriptor)
}

fn build_system(descriptor: Descriptor) -> Result<System> {
    let mut system = System::new(descriptor.name, descriptor.base_power);
    for (index, raw) in descriptor.components.into_iter().enumerate() {
        let component = parse_component(index, raw)?;
        system.add_component(component)?;
    }
    for entry in descriptor.time_series {
        system.add_time_series(&entry.owner, &entry.name, entry.series)?;
    }
    Ok(system)
}

fn parse_component(index: usize, raw: Value) -> Result<Component> {
    let category = raw
        .get("category")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("component #{index} has no 'category'"))?
        .to_string();

    if !Component::CATEGORIES.contains(&category.as_str()) {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{category}#{index}"));
        return Ok(Component::Unsupported(UnsupportedComponent {
            name,
            kind: category,
        }));
    }

    serde_json::from_value(raw)
        .with_context(|| format!("parsing component #{index} (category '{category}')"))
}

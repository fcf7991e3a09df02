use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "op-decks")]
    op_decks: HashMap<String, String>,
    monolithic: HashMap<String, String>,
    #[serde(rename = "point-clouds")]
    point_clouds: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Operation-deck fixtures: JSON arrays of blend operation configs.
pub mod op_decks {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.op_decks.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.op_decks, "op-deck", name)?;
        read_to_string(rel)
    }
}

/// Monolithic blending settings fixtures.
pub mod monolithic {
    use super::*;

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.monolithic, "monolithic", name)?;
        read_to_string(rel)
    }
}

/// Point-cloud fixtures: attribute columns keyed by name, kind spelled the
/// way attribute kinds serialize.
pub mod point_clouds {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PointCloud {
        pub len: usize,
        pub attributes: HashMap<String, AttributeFixture>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AttributeFixture {
        pub kind: String,
        pub values: Vec<serde_json::Value>,
    }

    pub fn keys() -> Vec<String> {
        MANIFEST.point_clouds.keys().cloned().collect()
    }

    pub fn load(name: &str) -> Result<PointCloud> {
        let rel = lookup(&MANIFEST.point_clouds, "point-cloud", name)?;
        load_json(rel)
    }
}

//! Reading and writing fixture stores as JSON.

use super::FixtureStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Load and validate a fixture store from a JSON file.
pub fn load_from_file(path: &Path) -> Result<FixtureStore> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;

    let store: FixtureStore = serde_json::from_str(&content)
        .with_context(|| format!("Invalid fixture file: {}", path.display()))?;

    info!(
        "Loaded fixtures from {} ({} regions)",
        path.display(),
        store.list_region_records().len()
    );

    Ok(store)
}

/// Write a fixture store as pretty-printed JSON.
pub fn save_to_file(store: &FixtureStore, path: &Path) -> Result<()> {
    let content =
        serde_json::to_string_pretty(store).context("Failed to serialize fixture store")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write fixture file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{generate, GeneratorOptions};
    use crate::models::Region;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixtures.json");
        let store = generate(&GeneratorOptions::default()).unwrap();

        save_to_file(&store, &path).unwrap();
        let loaded = load_from_file(&path).unwrap();

        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_rejects_invalid_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixtures.json");
        let store = generate(&GeneratorOptions::default()).unwrap();

        let mut json: serde_json::Value = serde_json::to_value(&store).unwrap();
        json["regions"][0]["willingness"] = serde_json::json!(140);
        fs::write(&path, json.to_string()).unwrap();

        let err = load_from_file(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid fixture file"));
        assert!(message.contains("willingness"));
    }

    #[test]
    fn test_load_rejects_unknown_region() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixtures.json");
        let store = generate(&GeneratorOptions::default()).unwrap();

        let mut json: serde_json::Value = serde_json::to_value(&store).unwrap();
        json["regions"][0]["region"] = serde_json::json!("Wales");
        fs::write(&path, json.to_string()).unwrap();

        assert!(load_from_file(&path).is_err());
    }

    #[test]
    fn test_social_and_audio_are_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixtures.json");
        let store = generate(&GeneratorOptions::default()).unwrap();

        let mut json: serde_json::Value = serde_json::to_value(&store).unwrap();
        let object = json.as_object_mut().unwrap();
        object.remove("social");
        object.remove("audio");
        fs::write(&path, json.to_string()).unwrap();

        let loaded = load_from_file(&path).unwrap();
        assert!(loaded.audio().emotion_data.is_empty());
        assert_eq!(loaded.list_region_records()[0].region, Region::GreaterLondon);
    }

    #[test]
    fn test_missing_file() {
        let err = load_from_file(Path::new("/nonexistent/fixtures.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read fixture file"));
    }
}

//! Wire format of remote package indices.
//!
//! A root index at `<root>/products` is a JSON array of product descriptors.
//! Each product publishes a sub-index at `<product_url>/index.json`
//! (platform-independent) or `<product_url>/index-<platform>.json`
//! (platform-specific). Unknown fields are ignored on all shapes.

use std::collections::BTreeMap;

use serde::Deserialize;

/// One element of the root index.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDescriptor {
    /// Product sub-path under `<root>/products/`.
    pub product: String,
}

/// A per-product sub-index.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductIndex {
    /// Platform the index was built for. Absent means platform-independent.
    #[serde(default)]
    pub platform: Option<String>,

    /// Relative egg repository paths under the product URL.
    /// Default is the product URL itself.
    #[serde(default)]
    pub egg_repos: Vec<String>,

    /// Egg tables keyed by canonical name.
    #[serde(default)]
    pub eggs: BTreeMap<String, EggTable>,
}

/// The distributions of one canonical name within a product.
#[derive(Debug, Clone, Deserialize)]
pub struct EggTable {
    /// Display name, when it differs from the canonical name.
    #[serde(default)]
    pub name: Option<String>,

    /// Human-readable description, searched by the search command.
    #[serde(default)]
    pub description: Option<String>,

    /// Distribution files keyed by egg filename.
    #[serde(default)]
    pub files: BTreeMap<String, FileEntry>,
}

/// Metadata for one distribution file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    /// Target runtime version, default `2.7`.
    #[serde(default = "default_python")]
    pub python: String,

    /// Declared dependency requirement strings.
    #[serde(default)]
    pub depends: Vec<String>,

    /// Index into `egg_repos`, default `0`.
    #[serde(default)]
    pub repo: usize,

    /// SHA-256 checksum of the egg file, when published.
    #[serde(default)]
    pub sha256: Option<String>,
}

fn default_python() -> String {
    "2.7".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_index_ignores_extra_metadata() {
        let json = r#"[{"product": "epd", "pretty_name": "EPD"}, {"product": "extras"}]"#;
        let descriptors: Vec<ProductDescriptor> = serde_json::from_str(json).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].product, "epd");
    }

    #[test]
    fn test_file_entry_defaults() {
        let entry: FileEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(entry.python, "2.7");
        assert!(entry.depends.is_empty());
        assert_eq!(entry.repo, 0);
        assert_eq!(entry.sha256, None);
    }

    #[test]
    fn test_product_index_full_shape() {
        let json = r#"{
            "platform": "linux-64",
            "egg_repos": ["eggs/free", "eggs/commercial"],
            "eggs": {
                "acme": {
                    "description": "roadrunner suppression toolkit",
                    "files": {
                        "acme-1.2.0-1.egg": {
                            "python": "2.7",
                            "depends": ["widgets 0.9"],
                            "repo": 1
                        }
                    }
                }
            }
        }"#;
        let index: ProductIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.platform.as_deref(), Some("linux-64"));
        assert_eq!(index.egg_repos.len(), 2);
        let table = &index.eggs["acme"];
        assert_eq!(
            table.description.as_deref(),
            Some("roadrunner suppression toolkit")
        );
        let entry = &table.files["acme-1.2.0-1.egg"];
        assert_eq!(entry.depends, vec!["widgets 0.9".to_string()]);
        assert_eq!(entry.repo, 1);
    }

    #[test]
    fn test_product_index_minimal() {
        let index: ProductIndex = serde_json::from_str("{}").unwrap();
        assert_eq!(index.platform, None);
        assert!(index.egg_repos.is_empty());
        assert!(index.eggs.is_empty());
    }
}

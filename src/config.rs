//! Resolver configuration
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (typemodel.toml)
//! - Environment variables (TYPEMODEL_*)
//!
//! ## Example config file (typemodel.toml):
//! ```toml
//! [compatibility]
//! disable_flatten_additional_properties = false
//! old_enum_conflicts = false
//! always_prefix_enum_values = true
//!
//! [output]
//! nullable_type = true
//! disable_type_aliases_for_type = ["array"]
//!
//! [import_mapping]
//! "common.yaml" = "common"
//! "shared.yaml" = "-"
//! ```
//!
//! The configuration is read-only during resolution; one value can back any
//! number of independent resolution calls.

use config_crate::{Config, Environment, File};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TypeModelError};
use crate::names::CURRENT_PACKAGE;

/// Main configuration for schema resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Switches that restore older resolution behaviour
    #[serde(default)]
    pub compatibility: CompatibilityOptions,

    /// Shape of the produced type model
    #[serde(default)]
    pub output: OutputOptions,

    /// External document -> package name. `-` means the current package.
    #[serde(default)]
    pub import_mapping: BTreeMap<String, String>,
}

/// Compatibility switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityOptions {
    /// Keep objects that only have additionalProperties as named structs
    /// instead of collapsing them into plain maps
    pub disable_flatten_additional_properties: bool,

    /// Required read-only fields are not wrapped as optional
    pub disable_required_read_only_as_pointer: bool,

    /// Prefix every enum identifier with its path-derived type name
    pub old_enum_conflicts: bool,

    /// Never emit type aliases, always distinct definitions
    pub old_aliasing: bool,

    /// Always prefix enum identifiers with the enum's type name
    pub always_prefix_enum_values: bool,

    /// Allow `x-only-honour-field-name` to keep field names verbatim
    pub allow_unexported_struct_field_names: bool,
}

/// Output options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Represent nullable fields with an explicit nullable wrapper type
    pub nullable_type: bool,

    /// Structural kinds that become distinct definitions instead of aliases
    pub disable_type_aliases_for_type: Vec<StructuralKind>,
}

/// Structural kinds that can opt out of alias definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralKind {
    Array,
}

impl ResolverConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default
    /// locations and environment variables over both
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        let mut files: Vec<PathBuf> = Vec::new();

        let config_locations = ["typemodel.toml", ".typemodel.toml", "config/typemodel.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
            files.push(PathBuf::from(location));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "typemodel") {
            let xdg_config = config_dir.config_dir().join("typemodel.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config.clone()).required(false));
                files.push(xdg_config);
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
            let explicit = PathBuf::from(path);
            files.push(if explicit.exists() {
                explicit
            } else {
                explicit.with_extension("toml")
            });
        }

        // TYPEMODEL_COMPATIBILITY__OLD_ALIASING=true
        builder = builder.add_source(
            Environment::with_prefix("TYPEMODEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;

        // The layered builder lowercases table keys; document names are case-sensitive
        for file in files.iter().filter(|f| is_toml_file(f)) {
            for (document, package) in read_import_mapping(file)? {
                let package = config
                    .import_mapping
                    .remove(&document.to_lowercase())
                    .unwrap_or(package);
                config.import_mapping.insert(document, package);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TypeModelError::InvalidConfig(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the settings resolution cannot sanity-check on its own
    pub fn validate(&self) -> Result<()> {
        let package_name = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .map_err(|e| TypeModelError::InvalidConfig(e.to_string()))?;

        let mut problems = Vec::new();
        for (document, package) in &self.import_mapping {
            if document.is_empty() {
                problems.push("`import_mapping` contains an empty document key".to_string());
            }
            if package != CURRENT_PACKAGE && !package_name.is_match(package) {
                problems.push(format!(
                    "`import_mapping` for {} was incorrect: {:?} is not a package name",
                    document, package
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(TypeModelError::InvalidConfig(problems.join("; ")))
        }
    }

    /// Whether values of this kind must be distinct definitions
    pub fn disables_alias_for(&self, kind: StructuralKind) -> bool {
        self.output.disable_type_aliases_for_type.contains(&kind)
    }
}

fn is_toml_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("toml")
}

/// `import_mapping` table of one TOML file, keys as written
fn read_import_mapping(path: &Path) -> Result<BTreeMap<String, String>> {
    #[derive(Deserialize)]
    struct MappingOnly {
        #[serde(default)]
        import_mapping: BTreeMap<String, String>,
    }

    let content = std::fs::read_to_string(path)?;
    let parsed: MappingOnly = toml::from_str(&content)
        .map_err(|e| TypeModelError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
    Ok(parsed.import_mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert!(!config.compatibility.disable_flatten_additional_properties);
        assert!(!config.output.nullable_type);
        assert!(config.import_mapping.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_config() {
        let config = ResolverConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[compatibility]"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[compatibility]\nalways_prefix_enum_values = true\n\n[output]\ndisable_type_aliases_for_type = [\"array\"]\n\n[import_mapping]\n\"common.yaml\" = \"common\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = ResolverConfig::load_from(Some(&path)).unwrap();

        assert!(config.compatibility.always_prefix_enum_values);
        assert!(config.disables_alias_for(StructuralKind::Array));
        assert_eq!(
            config.import_mapping.get("common.yaml").map(String::as_str),
            Some("common")
        );
    }

    #[test]
    fn test_import_mapping_keeps_document_case() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[import_mapping]\n\"Common.yaml\" = \"common\"\n\"shared.yaml\" = \"-\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = ResolverConfig::load_from(Some(&path)).unwrap();

        let keys: Vec<&str> = config.import_mapping.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Common.yaml", "shared.yaml"]);
        assert_eq!(
            crate::names::ref_path_to_type_name(
                "Common.yaml#/components/schemas/Error",
                &config.import_mapping
            )
            .unwrap(),
            "common.Error"
        );
    }

    #[test]
    fn test_validate_rejects_bad_package_name() {
        let mut config = ResolverConfig::default();
        config
            .import_mapping
            .insert("common.yaml".to_string(), "not a package".to_string());
        config
            .import_mapping
            .insert("local.yaml".to_string(), CURRENT_PACKAGE.to_string());

        let err = config.validate().unwrap_err();
        assert!(matches!(err, TypeModelError::InvalidConfig(msg) if msg.contains("common.yaml")));
    }
}

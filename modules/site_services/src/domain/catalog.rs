//! Registry of known third-party service types
//!
//! The catalog is loaded once at startup from YAML and is read-only afterwards.
//! Each service carries its field rules as data, so adding a service type is a
//! configuration change.

use crate::contract::{FieldConstraint, FieldRule, FieldType, ServiceDefinition, SiteServicesError};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const BUILTIN_CATALOG: &str = include_str!("../../config/catalog.yaml");

/// Errors raised while loading a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Catalog entry has an empty name")]
    EmptyName,

    #[error("Duplicate service in catalog: {0}")]
    DuplicateService(String),

    #[error("Duplicate field '{field}' in service '{service}'")]
    DuplicateField { service: String, field: String },

    #[error("Invalid pattern for {service}.{field}: {source}")]
    InvalidPattern {
        service: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid bounds for {service}.{field}: minimum exceeds maximum")]
    InvalidBounds { service: String, field: String },

    #[error("Constraint on {service}.{field} does not apply to {field_type} fields")]
    IncompatibleConstraint {
        service: String,
        field: String,
        field_type: &'static str,
    },
}

// ===== Catalog file format =====

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    services: Vec<ServiceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceEntry {
    name: String,
    label: String,
    #[serde(default)]
    content_label: Option<String>,
    #[serde(default)]
    single_instance: bool,
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "type")]
    field_type: FieldTypeEntry,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    min_length: Option<usize>,
    #[serde(default)]
    max_length: Option<usize>,
    #[serde(default)]
    min: Option<i64>,
    #[serde(default)]
    max: Option<i64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FieldTypeEntry {
    Text,
    Checkbox,
    Number,
}

impl From<FieldTypeEntry> for FieldType {
    fn from(entry: FieldTypeEntry) -> Self {
        match entry {
            FieldTypeEntry::Text => FieldType::Text,
            FieldTypeEntry::Checkbox => FieldType::Checkbox,
            FieldTypeEntry::Number => FieldType::Number,
        }
    }
}

/// Read-only registry of service definitions
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    definitions: Vec<ServiceDefinition>,
    index: HashMap<String, usize>,
}

impl ServiceCatalog {
    /// Catalog shipped with the module
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Load a catalog from a YAML file
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parse a catalog from a YAML document with a top-level `services` list
    pub fn from_yaml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(raw)?;
        let definitions = file
            .services
            .into_iter()
            .map(build_definition)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_definitions(definitions)
    }

    /// Build a catalog from already constructed definitions
    pub fn from_definitions(definitions: Vec<ServiceDefinition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter().enumerate() {
            if definition.name.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if index.insert(definition.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateService(definition.name.clone()));
            }
            let mut seen = HashSet::new();
            for field in &definition.fields {
                if field.name.is_empty() {
                    return Err(CatalogError::EmptyName);
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(CatalogError::DuplicateField {
                        service: definition.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }
        Ok(Self { definitions, index })
    }

    /// Get the definition for a service name
    pub fn get_definition(&self, service_name: &str) -> Result<&ServiceDefinition, SiteServicesError> {
        self.index
            .get(service_name)
            .map(|&position| &self.definitions[position])
            .ok_or_else(|| SiteServicesError::unknown_service(service_name))
    }

    /// All definitions in declaration order
    pub fn list_definitions(&self) -> &[ServiceDefinition] {
        &self.definitions
    }

    pub fn contains(&self, service_name: &str) -> bool {
        self.index.contains_key(service_name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn build_definition(entry: ServiceEntry) -> Result<ServiceDefinition, CatalogError> {
    let service = entry.name;
    let fields = entry
        .fields
        .into_iter()
        .map(|field| build_field(&service, field))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ServiceDefinition {
        name: service,
        label: entry.label,
        content_label: entry.content_label,
        single_instance: entry.single_instance,
        fields,
    })
}

fn build_field(service: &str, entry: FieldEntry) -> Result<FieldRule, CatalogError> {
    let field_type: FieldType = entry.field_type.into();
    let incompatible = || CatalogError::IncompatibleConstraint {
        service: service.to_string(),
        field: entry.name.clone(),
        field_type: field_type.as_str(),
    };
    let invalid_bounds = || CatalogError::InvalidBounds {
        service: service.to_string(),
        field: entry.name.clone(),
    };

    let has_length = entry.min_length.is_some() || entry.max_length.is_some();
    let has_range = entry.min.is_some() || entry.max.is_some();

    let constraint = match field_type {
        FieldType::Text => {
            if has_range {
                return Err(incompatible());
            }
            if let (Some(min), Some(max)) = (entry.min_length, entry.max_length) {
                if min > max {
                    return Err(invalid_bounds());
                }
            }
            match &entry.pattern {
                Some(pattern) => FieldConstraint::Pattern {
                    regex: Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
                        CatalogError::InvalidPattern {
                            service: service.to_string(),
                            field: entry.name.clone(),
                            source,
                        }
                    })?,
                    min_length: entry.min_length,
                    max_length: entry.max_length,
                },
                None if has_length => FieldConstraint::Length {
                    min_length: entry.min_length,
                    max_length: entry.max_length,
                },
                None => FieldConstraint::None,
            }
        }
        FieldType::Number => {
            if has_length || entry.pattern.is_some() {
                return Err(incompatible());
            }
            let min = entry.min.unwrap_or(0);
            let max = entry.max.unwrap_or(i64::MAX);
            if min > max {
                return Err(invalid_bounds());
            }
            FieldConstraint::Range { min, max }
        }
        FieldType::Checkbox => {
            if has_length || has_range || entry.pattern.is_some() {
                return Err(incompatible());
            }
            FieldConstraint::None
        }
    };

    Ok(FieldRule {
        label: entry.label.unwrap_or_else(|| entry.name.clone()),
        name: entry.name,
        field_type,
        required: entry.required,
        constraint,
    })
}

//! Contract models for site services
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::Regex;

/// Identifier of a content item (page, article) on the host site
pub type ContentId = i64;

/// Normalized settings of one include, keyed by field name in declaration order
pub type ServiceSettings = IndexMap<String, serde_json::Value>;

/// A known third-party service type and the settings it takes
#[derive(Debug, Clone)]
pub struct ServiceDefinition {
    /// Unique service name (e.g. "livechat")
    pub name: String,
    /// Human-readable name
    pub label: String,
    /// Label shown on the content editing form
    pub content_label: Option<String>,
    /// Front-end loader uses only one include of this service per page
    pub single_instance: bool,
    /// Declared settings fields, in declaration order
    pub fields: Vec<FieldRule>,
}

impl ServiceDefinition {
    /// Look up a declared field by name
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Rule for a single settings field
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub constraint: FieldConstraint,
}

/// Input kind of a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Checkbox,
    Number,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Number => "number",
        }
    }
}

/// Value constraint attached to a field
#[derive(Debug, Clone)]
pub enum FieldConstraint {
    None,
    /// Whole-value regex match, optionally bounded in length (chars)
    Pattern {
        regex: Regex,
        min_length: Option<usize>,
        max_length: Option<usize>,
    },
    /// Length bounds without a character class
    Length {
        min_length: Option<usize>,
        max_length: Option<usize>,
    },
    /// Inclusive integer range
    Range { min: i64, max: i64 },
}

/// An admin-configured association of a service, its settings, and a content scope
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInclude {
    /// Machine name
    pub id: String,
    pub label: String,
    /// Service type; fixed once created
    pub service_name: String,
    pub service_settings: ServiceSettings,
    /// true: every page except `content_ids`; false: only `content_ids`
    pub sitewide: bool,
    /// Ordered set of content items, exclusions or inclusions depending on `sitewide`
    pub content_ids: Vec<ContentId>,
    /// Non-admin authors may toggle this include on content they edit
    pub content_editing_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceInclude {
    /// Whether `content_id` is listed in `content_ids`
    pub fn lists_content(&self, content_id: ContentId) -> bool {
        self.content_ids.contains(&content_id)
    }

    /// Short description of where this include applies
    pub fn summary(&self) -> IncludeSummary {
        if self.sitewide {
            IncludeSummary::AllPages
        } else {
            IncludeSummary::Pages(self.content_ids.len())
        }
    }
}

/// Where an include applies, for list views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeSummary {
    AllPages,
    Pages(usize),
}

impl std::fmt::Display for IncludeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllPages => write!(f, "All pages"),
            Self::Pages(1) => write!(f, "1 page"),
            Self::Pages(n) => write!(f, "{} pages", n),
        }
    }
}

/// Input for creating or updating an include
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeDraft {
    pub id: String,
    pub label: String,
    pub service_name: String,
    /// Raw settings as submitted; validated and normalized on save
    pub service_settings: serde_json::Map<String, serde_json::Value>,
    pub sitewide: bool,
    pub content_ids: Vec<ContentId>,
    pub content_editing_enabled: bool,
}

/// Render-ready projection of an include for one page context
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInclude {
    pub service_name: String,
    pub service_settings: ServiceSettings,
    pub source_include_id: String,
    pub label: String,
}

impl From<&ServiceInclude> for ResolvedInclude {
    fn from(include: &ServiceInclude) -> Self {
        Self {
            service_name: include.service_name.clone(),
            service_settings: include.service_settings.clone(),
            source_include_id: include.id.clone(),
            label: include.label.clone(),
        }
    }
}

/// Resolved includes grouped by service name, as handed to front-end loaders
pub type PageSettings = std::collections::BTreeMap<String, Vec<ResolvedInclude>>;

/// An include a content author may attach, and whether it is attached
#[derive(Debug, Clone, PartialEq)]
pub struct ContentInclusion {
    pub include: ServiceInclude,
    pub included: bool,
}

/// Single field violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating proposed settings
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Settings normalized to the definition's fields
    Valid(ServiceSettings),
    /// Every violation, in field-declaration order; never empty
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }

    pub fn into_result(self) -> Result<ServiceSettings, Vec<FieldError>> {
        match self {
            Self::Valid(settings) => Ok(settings),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

/// Caller capabilities, supplied by the host's authorization layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthContext {
    /// Holds the "administer site services" permission
    pub is_administrator: bool,
    /// Optional user identifier for audit logging
    pub user_id: Option<String>,
}

impl AuthContext {
    /// Create a content author context
    pub fn author(user_id: Option<String>) -> Self {
        Self {
            is_administrator: false,
            user_id,
        }
    }

    /// Create an administrator context
    pub fn administrator(user_id: Option<String>) -> Self {
        Self {
            is_administrator: true,
            user_id,
        }
    }
}

//! Structured error and cross-reference report shapes.
//!
//! These are the externally observable outputs of loading: callers (and the
//! CLI `--json` mode) consume them as data, not as formatted strings.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Which resource collection an error refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    NotificationChannel,
    Watchlist,
    CustomAgent,
}

impl ResourceKind {
    /// Name of the collection under `resources`.
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::NotificationChannel => "notification_channels",
            ResourceKind::Watchlist => "watchlists",
            ResourceKind::CustomAgent => "custom_agents",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::NotificationChannel => "notification channel",
            ResourceKind::Watchlist => "watchlist",
            ResourceKind::CustomAgent => "custom agent",
        };
        f.write_str(name)
    }
}

/// Machine-readable failure class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    ParseError,
    MissingImport,
    SchemaViolation,
    DuplicateResource,
    MissingReference,
    CircularImport,
    MissingEnvVar,
    ConflictingFields,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::ParseError => "parse-error",
            ErrorCode::MissingImport => "missing-import",
            ErrorCode::SchemaViolation => "schema-violation",
            ErrorCode::DuplicateResource => "duplicate-resource",
            ErrorCode::MissingReference => "missing-reference",
            ErrorCode::CircularImport => "circular-import",
            ErrorCode::MissingEnvVar => "missing-env-var",
            ErrorCode::ConflictingFields => "conflicting-fields",
        };
        f.write_str(name)
    }
}

/// A single structural or semantic validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigValidationError {
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub line: Option<usize>,

    #[serde(default)]
    pub column: Option<usize>,

    #[serde(default)]
    pub resource_type: Option<ResourceKind>,

    #[serde(default)]
    pub resource_name: Option<String>,

    pub error_code: ErrorCode,

    pub message: String,

    #[serde(default)]
    pub details: Option<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ConfigValidationError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            column: None,
            resource_type: None,
            resource_name: None,
            error_code,
            message: message.into(),
            details: None,
            suggestions: Vec::new(),
        }
    }

    pub fn at_file(mut self, file: &Path) -> Self {
        self.file = Some(file.to_path_buf());
        self
    }

    pub fn at_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn for_resource(mut self, kind: ResourceKind, name: &str) -> Self {
        self.resource_type = Some(kind);
        self.resource_name = Some(name.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details = Some(detail.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}", file.display())?;
            if let (Some(line), Some(column)) = (self.line, self.column) {
                write!(f, ":{line}:{column}")?;
            }
            write!(f, ": ")?;
        }
        write!(f, "[{}] {}", self.error_code, self.message)?;
        if let (Some(kind), Some(name)) = (&self.resource_type, &self.resource_name) {
            write!(f, " ({kind} '{name}')")?;
        }
        Ok(())
    }
}

/// Aggregate cross-file consistency report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrossReferenceValidation {
    pub valid: bool,
    pub missing_references: Vec<MissingReference>,
    pub circular_references: Vec<CircularReference>,
}

impl Default for CrossReferenceValidation {
    fn default() -> Self {
        Self {
            valid: true,
            missing_references: Vec::new(),
            circular_references: Vec::new(),
        }
    }
}

/// A dangling name reference from one resource to another collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissingReference {
    pub source_type: ResourceKind,
    pub source_name: String,
    /// Field on the source resource holding the reference.
    pub field: String,
    /// The name that failed to resolve.
    pub target: String,
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' references non-existent notification channel '{}' via {}",
            self.source_type, self.source_name, self.target, self.field
        )
    }
}

/// An import cycle, expressed as a name chain plus the contributing files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircularReference {
    /// Document names along the cycle; the first entry is repeated at the end.
    pub cycle: Vec<String>,
    /// Files contributing each link.
    pub files: Vec<PathBuf>,
}

impl fmt::Display for CircularReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular import: {}", self.cycle.join(" -> "))
    }
}

impl From<&CircularReference> for ConfigValidationError {
    fn from(cycle: &CircularReference) -> Self {
        let mut err = ConfigValidationError::new(ErrorCode::CircularImport, cycle.to_string())
            .with_suggestion("break the cycle by removing one of the imports");
        err.file = cycle.files.first().cloned();
        err
    }
}

impl From<&MissingReference> for ConfigValidationError {
    fn from(missing: &MissingReference) -> Self {
        ConfigValidationError::new(ErrorCode::MissingReference, missing.to_string())
            .for_resource(missing.source_type, &missing.source_name)
            .with_suggestion(format!(
                "define '{}' under resources.notification_channels or fix the reference",
                missing.target
            ))
    }
}

/// Flatten nested validator output into located schema violations.
pub(crate) fn schema_violations(
    scope: &str,
    errors: &ValidationErrors,
) -> Vec<ConfigValidationError> {
    let mut out = Vec::new();
    collect(scope, errors, &mut out);
    out
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<ConfigValidationError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(msg) => msg.to_string(),
                        None => error.code.to_string(),
                    };
                    out.push(ConfigValidationError::new(
                        ErrorCode::SchemaViolation,
                        format!("field '{path}': {message}"),
                    ));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

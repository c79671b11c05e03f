//! tyck_options: checker options and the JSON project file.
//!
//! The project file follows the `tsconfig.json` layout: a `compilerOptions`
//! object plus `files`, `include` and `exclude` lists. Only the options the
//! checker understands are read; unknown keys are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default limit on nested relation checks before giving up.
pub const DEFAULT_MAX_RELATION_DEPTH: u32 = 100;

/// Options controlling the checker. Every field is optional so a project
/// file and command line flags can be layered with [`CheckerOptions::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerOptions {
    // -- Strict Type-Checking Options --
    pub strict: Option<bool>,
    pub strict_null_checks: Option<bool>,
    pub strict_function_types: Option<bool>,
    pub no_implicit_any: Option<bool>,

    // -- Additional Checks --
    pub no_implicit_returns: Option<bool>,
    pub allow_unreachable_code: Option<bool>,
    pub exact_optional_property_types: Option<bool>,
    pub no_error_truncation: Option<bool>,

    // -- Limits --
    pub max_relation_depth: Option<u32>,
}

impl CheckerOptions {
    /// Options with `strict` turned on.
    pub fn strict() -> Self {
        Self {
            strict: Some(true),
            ..Self::default()
        }
    }

    #[inline]
    fn strict_flag(&self, explicit: Option<bool>) -> bool {
        explicit.unwrap_or(self.strict.unwrap_or(false))
    }

    pub fn strict_null_checks(&self) -> bool {
        self.strict_flag(self.strict_null_checks)
    }

    pub fn strict_function_types(&self) -> bool {
        self.strict_flag(self.strict_function_types)
    }

    pub fn no_implicit_any(&self) -> bool {
        self.strict_flag(self.no_implicit_any)
    }

    pub fn no_implicit_returns(&self) -> bool {
        self.no_implicit_returns.unwrap_or(false)
    }

    pub fn allow_unreachable_code(&self) -> bool {
        self.allow_unreachable_code.unwrap_or(false)
    }

    pub fn exact_optional_property_types(&self) -> bool {
        self.exact_optional_property_types.unwrap_or(false)
    }

    pub fn no_error_truncation(&self) -> bool {
        self.no_error_truncation.unwrap_or(false)
    }

    pub fn max_relation_depth(&self) -> u32 {
        self.max_relation_depth.unwrap_or(DEFAULT_MAX_RELATION_DEPTH)
    }

    /// Overlay `other` on top of `self`: any value set in `other` wins.
    pub fn merge(&self, other: &CheckerOptions) -> CheckerOptions {
        CheckerOptions {
            strict: other.strict.or(self.strict),
            strict_null_checks: other.strict_null_checks.or(self.strict_null_checks),
            strict_function_types: other.strict_function_types.or(self.strict_function_types),
            no_implicit_any: other.no_implicit_any.or(self.no_implicit_any),
            no_implicit_returns: other.no_implicit_returns.or(self.no_implicit_returns),
            allow_unreachable_code: other.allow_unreachable_code.or(self.allow_unreachable_code),
            exact_optional_property_types: other
                .exact_optional_property_types
                .or(self.exact_optional_property_types),
            no_error_truncation: other.no_error_truncation.or(self.no_error_truncation),
            max_relation_depth: other.max_relation_depth.or(self.max_relation_depth),
        }
    }
}

/// The project file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub compiler_options: Option<CheckerOptions>,
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

impl ProjectConfig {
    /// The configured options, or the defaults when the file has none.
    pub fn options(&self) -> CheckerOptions {
        self.compiler_options.clone().unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read project file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a project file from a string.
pub fn parse_project_config(content: &str) -> Result<ProjectConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Parse a project file from a path.
pub fn parse_project_config_file(path: impl AsRef<Path>) -> Result<ProjectConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_project_config(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_enables_family() {
        let options = CheckerOptions::strict();
        assert!(options.strict_null_checks());
        assert!(options.strict_function_types());
        assert!(options.no_implicit_any());
        assert!(!options.no_implicit_returns());
    }

    #[test]
    fn test_explicit_flag_beats_strict() {
        let options = CheckerOptions {
            strict: Some(true),
            strict_null_checks: Some(false),
            ..CheckerOptions::default()
        };
        assert!(!options.strict_null_checks());
        assert!(options.no_implicit_any());
    }

    #[test]
    fn test_defaults() {
        let options = CheckerOptions::default();
        assert!(!options.strict_null_checks());
        assert!(!options.allow_unreachable_code());
        assert_eq!(options.max_relation_depth(), DEFAULT_MAX_RELATION_DEPTH);
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = CheckerOptions {
            strict: Some(true),
            max_relation_depth: Some(50),
            ..CheckerOptions::default()
        };
        let overlay = CheckerOptions {
            strict: Some(false),
            no_implicit_any: Some(true),
            ..CheckerOptions::default()
        };
        let merged = base.merge(&overlay);
        assert_eq!(merged.strict, Some(false));
        assert_eq!(merged.no_implicit_any, Some(true));
        assert_eq!(merged.max_relation_depth, Some(50));
    }

    #[test]
    fn test_parse_project_config() {
        let config = parse_project_config(
            r#"{
                "compilerOptions": { "strict": true, "noImplicitAny": false, "maxRelationDepth": 20 },
                "include": ["src/**/*.ts"],
                "exclude": ["src/gen"]
            }"#,
        )
        .unwrap();
        let options = config.options();
        assert!(options.strict_null_checks());
        assert!(!options.no_implicit_any());
        assert_eq!(options.max_relation_depth(), 20);
        assert_eq!(config.include.as_deref(), Some(&["src/**/*.ts".to_string()][..]));
        assert!(config.files.is_none());
    }

    #[test]
    fn test_unknown_options_are_ignored() {
        let config = parse_project_config(r#"{ "compilerOptions": { "target": "es2020", "strict": true } }"#).unwrap();
        assert_eq!(config.options().strict, Some(true));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_project_config("{ \"files\": 3 }").is_err());
        assert!(matches!(
            parse_project_config_file("/definitely/not/here/tyck.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}

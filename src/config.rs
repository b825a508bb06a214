//! Compiler configuration for tree construction, diagnostics and code generation
//!
//! This module collects the knobs the compiler core consults while building nodes,
//! rendering diagnostics and generating source text. Values are plain data; a
//! [`Config`] is handed to [`crate::ast::Ast`] once and consulted read-only afterwards.

/// Configuration for the compiler core
///
/// The defaults mirror what the surrounding pipeline uses in production:
/// - 4-space indentation in generated code
/// - `pv__` reserved identifier prefix and `_pv` reserved suffix
/// - return bindings named after the active function classification
/// - `msg.sender` as the platform caller-identity builtin in backend output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Indentation unit inserted for every nesting level in generated code
    pub indentation: String,

    /// Identifiers may not start with this prefix (optionally preceded by `_`)
    pub reserved_name_prefix: String,

    /// Identifiers may not end with this suffix; it is used for conflict resolution
    pub reserved_name_suffix: String,

    /// Stem for return bindings of functions classified as zero-knowledge verified
    pub return_zk_var_name: String,

    /// Stem for return bindings of all other functions
    pub return_tee_var_name: String,

    /// Expression the backend dialect renders for the caller-private label
    pub caller_builtin: String,

    /// Version expression the backend dialect renders in `pragma solidity`
    pub backend_version_pragma: String,

    /// Omit positional excerpts from node errors and silence compiler warnings
    pub suppress_diagnostics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indentation: "    ".to_string(),
            reserved_name_prefix: "pv__".to_string(),
            reserved_name_suffix: "_pv".to_string(),
            return_zk_var_name: "pv__ret_zk".to_string(),
            return_tee_var_name: "pv__ret_tee".to_string(),
            caller_builtin: "msg.sender".to_string(),
            backend_version_pragma: "^0.8.0".to_string(),
            suppress_diagnostics: false,
        }
    }
}

impl Config {
    /// Creates a configuration suitable for unit tests
    ///
    /// Identical to the default except that diagnostics are suppressed, so errors
    /// carry only their message and warnings are not emitted.
    #[must_use]
    pub fn testing() -> Self {
        Self {
            suppress_diagnostics: true,
            ..Self::default()
        }
    }

    /// Returns the reason `name` is reserved, if it is
    ///
    /// ## Arguments
    /// * `name` - The identifier to check
    #[must_use]
    pub fn reserved_reason(&self, name: &str) -> Option<String> {
        let prefix = &self.reserved_name_prefix;
        if name.starts_with(prefix.as_str()) || name.starts_with(&format!("_{prefix}")) {
            Some(format!("must not start with reserved prefix _?{prefix}"))
        } else if name.ends_with(self.reserved_name_suffix.as_str()) {
            Some(format!(
                "must not end with reserved suffix {}",
                self.reserved_name_suffix
            ))
        } else {
            None
        }
    }

    /// Name of the synthesized binding for return parameter `index`
    ///
    /// ## Arguments
    /// * `zkp` - Whether the function is classified as zero-knowledge verified
    /// * `index` - Position of the return parameter
    #[must_use]
    pub fn return_var_name(&self, zkp: bool, index: usize) -> String {
        let stem = if zkp {
            &self.return_zk_var_name
        } else {
            &self.return_tee_var_name
        };
        format!("{stem}_{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_presets() {
        let default = Config::default();
        assert_eq!(default.indentation, "    ");
        assert!(!default.suppress_diagnostics);

        let testing = Config::testing();
        assert!(testing.suppress_diagnostics);
        assert_eq!(testing.caller_builtin, default.caller_builtin);
    }

    #[test]
    fn test_reserved_names() {
        let config = Config::default();
        assert!(config.reserved_reason("pv__tmp").is_some());
        assert!(config.reserved_reason("_pv__tmp").is_some());
        assert!(config.reserved_reason("value_pv").is_some());
        assert!(config.reserved_reason("balance").is_none());
        assert!(config.reserved_reason("pvx").is_none());
    }

    #[test]
    fn test_return_var_names() {
        let config = Config::default();
        assert_eq!(config.return_var_name(true, 0), "pv__ret_zk_0");
        assert_eq!(config.return_var_name(false, 2), "pv__ret_tee_2");
    }
}

// src/recipe/options.rs

//! Recipe options and their platform-conditional resolution
//!
//! `fPIC` is only meaningful for static libraries on non-Windows targets.
//! Instead of deleting the option when it does not apply, it is modelled as a
//! three-valued toggle whose third state is [`OptionValue::NotApplicable`].

use crate::recipe::settings::{Os, Settings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A boolean option that may not apply to the current configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionValue {
    Enabled,
    Disabled,
    NotApplicable,
}

impl OptionValue {
    /// The boolean value, or `None` when the option does not apply
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Enabled => Some(true),
            OptionValue::Disabled => Some(false),
            OptionValue::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, OptionValue::NotApplicable)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        if value {
            OptionValue::Enabled
        } else {
            OptionValue::Disabled
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Enabled => write!(f, "True"),
            OptionValue::Disabled => write!(f, "False"),
            OptionValue::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Options as requested by the caller (profile `[options]` section)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsRequest {
    /// Build shared libraries instead of static ones
    #[serde(default)]
    pub shared: bool,

    /// Build position independent code
    #[serde(default = "default_fpic", rename = "fPIC")]
    pub fpic: bool,
}

fn default_fpic() -> bool {
    true
}

impl Default for OptionsRequest {
    fn default() -> Self {
        Self {
            shared: false,
            fpic: default_fpic(),
        }
    }
}

/// Options after platform-conditional resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub shared: bool,
    #[serde(rename = "fPIC")]
    pub fpic: OptionValue,
}

impl Options {
    /// Resolve requested options against the target settings
    pub fn resolve(settings: &Settings, request: &OptionsRequest) -> Self {
        Self {
            shared: request.shared,
            fpic: resolve_fpic(&settings.os, request.shared, request.fpic),
        }
    }
}

/// Decide the `fPIC` value
///
/// The OS check takes precedence over the shared-library check.
pub fn resolve_fpic(os: &Os, shared: bool, requested: bool) -> OptionValue {
    if *os == Os::Windows {
        return OptionValue::NotApplicable;
    }
    if shared {
        return OptionValue::NotApplicable;
    }
    OptionValue::from(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::settings::{BuildType, CompilerKind};

    fn settings(os: Os) -> Settings {
        Settings::new(os, CompilerKind::Gcc, "9", BuildType::Release)
    }

    #[test]
    fn test_windows_drops_fpic_regardless_of_shared() {
        for shared in [false, true] {
            let request = OptionsRequest { shared, fpic: true };
            let options = Options::resolve(&settings(Os::Windows), &request);
            assert_eq!(options.fpic, OptionValue::NotApplicable);
            assert_eq!(options.shared, shared);
        }
    }

    #[test]
    fn test_shared_drops_fpic() {
        let request = OptionsRequest { shared: true, fpic: true };
        let options = Options::resolve(&settings(Os::Linux), &request);
        assert_eq!(options.fpic, OptionValue::NotApplicable);
        assert_eq!(options.fpic.as_bool(), None);
    }

    #[test]
    fn test_static_keeps_default_fpic() {
        let options = Options::resolve(&settings(Os::Linux), &OptionsRequest::default());
        assert!(!options.shared);
        assert_eq!(options.fpic, OptionValue::Enabled);
        assert_eq!(options.fpic.as_bool(), Some(true));
    }

    #[test]
    fn test_static_honors_explicit_fpic_off() {
        let request = OptionsRequest { shared: false, fpic: false };
        let options = Options::resolve(&settings(Os::Macos), &request);
        assert_eq!(options.fpic, OptionValue::Disabled);
    }

    #[test]
    fn test_parse_options_request() {
        let request: OptionsRequest = toml::from_str("shared = true").unwrap();
        assert!(request.shared);
        assert!(request.fpic);

        let request: OptionsRequest = toml::from_str("fPIC = false").unwrap();
        assert!(!request.shared);
        assert!(!request.fpic);
    }
}

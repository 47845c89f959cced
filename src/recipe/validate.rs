// src/recipe/validate.rs

//! Configuration validation
//!
//! Runs before anything touches the filesystem. A rejected configuration
//! never reaches source acquisition.

use crate::error::{Error, Result};
use crate::recipe::settings::{BuildType, CompilerKind, CppStd, Settings};
use crate::version::{CompilerVersion, SnapshotVersion};
use tracing::{debug, warn};

/// Minimum C++ standard ruy builds with
pub const MIN_CPPSTD: u16 = 14;

/// Minimum compiler version supporting C++14, per compiler family
///
/// Returns `None` for compilers the recipe does not recognize.
pub fn minimum_compiler_version(kind: &CompilerKind) -> Option<&'static str> {
    match kind {
        CompilerKind::VisualStudio => Some("15"),
        CompilerKind::Gcc => Some("5"),
        CompilerKind::Clang => Some("3.4"),
        CompilerKind::AppleClang => Some("5.1"),
        CompilerKind::Unknown(_) => None,
    }
}

/// Validate settings and the recipe version
///
/// Returns the warnings produced along the way. Errors are always
/// [`Error::ConfigurationError`].
pub fn validate(settings: &Settings, recipe_version: &str) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    SnapshotVersion::parse(recipe_version)?;

    if let Some(cppstd) = &settings.compiler.cppstd {
        check_min_cppstd(cppstd)?;
    }

    let compiler = &settings.compiler.name;

    // Unknown compilers never have their version parsed
    let Some(minimum) = minimum_compiler_version(compiler) else {
        let msg = format!(
            "Compiler '{}' is unknown. Assuming it supports C++14.",
            compiler
        );
        warn!("{}", msg);
        warnings.push(msg);
        return Ok(warnings);
    };

    let version = CompilerVersion::parse(&settings.compiler.version)?;
    // Table entries are static and always parse
    let minimum = CompilerVersion::parse(minimum)?;
    if version < minimum {
        return Err(Error::ConfigurationError(format!(
            "Build requires support for C++14. Minimum version for {} is {}",
            compiler, minimum
        )));
    }
    debug!("Compiler {} {} >= {}", compiler, version, minimum);

    if *compiler == CompilerKind::Clang
        && version <= CompilerVersion::parse("5")?
        && settings.build_type == BuildType::Debug
    {
        return Err(Error::ConfigurationError(
            "Debug builds are not supported on older versions of Clang (<=5)".to_string(),
        ));
    }

    Ok(warnings)
}

/// Reject C++ standards older than [`MIN_CPPSTD`]
fn check_min_cppstd(cppstd: &str) -> Result<()> {
    let std = CppStd::parse(cppstd)?;
    if !std.at_least(MIN_CPPSTD) {
        return Err(Error::ConfigurationError(format!(
            "Current cppstd ({}) is lower than the required C++ standard ({})",
            cppstd, MIN_CPPSTD
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::settings::Os;

    const VERSION: &str = "cci.20201217";

    fn settings(kind: CompilerKind, version: &str, build_type: BuildType) -> Settings {
        Settings::new(Os::Linux, kind, version, build_type)
    }

    #[test]
    fn test_below_minimum_fails() {
        for (kind, version) in [
            (CompilerKind::VisualStudio, "14"),
            (CompilerKind::Gcc, "4.9"),
            (CompilerKind::Clang, "3.3"),
            (CompilerKind::AppleClang, "5.0"),
        ] {
            let result = validate(&settings(kind.clone(), version, BuildType::Release), VERSION);
            assert!(
                matches!(result, Err(Error::ConfigurationError(_))),
                "{} {} should be rejected",
                kind,
                version
            );
        }
    }

    #[test]
    fn test_at_or_above_minimum_passes() {
        for (kind, version) in [
            (CompilerKind::VisualStudio, "15"),
            (CompilerKind::VisualStudio, "17"),
            (CompilerKind::Gcc, "5"),
            (CompilerKind::Gcc, "11.2"),
            (CompilerKind::Clang, "3.4"),
            (CompilerKind::Clang, "14"),
            (CompilerKind::AppleClang, "5.1"),
            (CompilerKind::AppleClang, "13.0"),
        ] {
            let warnings =
                validate(&settings(kind.clone(), version, BuildType::Release), VERSION).unwrap();
            assert!(warnings.is_empty(), "{} {} produced warnings", kind, version);
        }
    }

    #[test]
    fn test_old_clang_debug_rejected() {
        for version in ["3.4", "4", "5", "5.0"] {
            let result = validate(&settings(CompilerKind::Clang, version, BuildType::Debug), VERSION);
            let err = result.unwrap_err();
            assert!(err.to_string().contains("Debug builds"), "clang {}", version);
        }
    }

    #[test]
    fn test_old_clang_release_and_newer_clang_debug_pass() {
        assert!(validate(&settings(CompilerKind::Clang, "5", BuildType::Release), VERSION).is_ok());
        assert!(validate(&settings(CompilerKind::Clang, "5.1", BuildType::Debug), VERSION).is_ok());
        assert!(validate(&settings(CompilerKind::Clang, "6", BuildType::Debug), VERSION).is_ok());
        // Only clang is affected
        assert!(validate(&settings(CompilerKind::Gcc, "5", BuildType::Debug), VERSION).is_ok());
    }

    #[test]
    fn test_unknown_compiler_warns() {
        let settings = settings(
            CompilerKind::Unknown("intel-cc".to_string()),
            "1",
            BuildType::Release,
        );
        let warnings = validate(&settings, VERSION).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("intel-cc"));
    }

    #[test]
    fn test_cppstd_minimum() {
        let base = settings(CompilerKind::Gcc, "9", BuildType::Release);
        assert!(validate(&base.clone().with_cppstd("11"), VERSION).is_err());
        assert!(validate(&base.clone().with_cppstd("gnu98"), VERSION).is_err());
        assert!(validate(&base.clone().with_cppstd("14"), VERSION).is_ok());
        assert!(validate(&base.clone().with_cppstd("gnu17"), VERSION).is_ok());
        assert!(validate(&base.with_cppstd("c++17"), VERSION).is_err());
    }

    #[test]
    fn test_cppstd_checked_for_unknown_compiler() {
        let settings = settings(
            CompilerKind::Unknown("intel-cc".to_string()),
            "1",
            BuildType::Release,
        )
        .with_cppstd("11");
        assert!(validate(&settings, VERSION).is_err());
    }

    #[test]
    fn test_invalid_recipe_version_fails_fast() {
        let base = settings(CompilerKind::Gcc, "9", BuildType::Release);
        assert!(matches!(
            validate(&base, "1.0.0"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_invalid_compiler_version() {
        let base = settings(CompilerKind::Gcc, "nine", BuildType::Release);
        assert!(matches!(
            validate(&base, VERSION),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_unknown_compiler_with_free_form_version_warns() {
        let settings = settings(
            CompilerKind::Unknown("intel-cc".to_string()),
            "2021.1-beta",
            BuildType::Debug,
        );
        let warnings = validate(&settings, VERSION).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Assuming it supports C++14"));
    }
}

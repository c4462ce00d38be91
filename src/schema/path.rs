//! Resolution of shorthand field references to `module.field` paths.

use super::Schema;
use crate::error::SettingsError;
use std::fmt;

/// A module-qualified field path such as `costs.min_charm`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Module part, if the path is qualified.
    pub fn module(&self) -> Option<&str> {
        self.0.split_once('.').map(|(module, _)| module)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve a raw field reference against the schema.
///
/// A reference containing `.` is taken as already qualified and returned
/// untouched; it is validated when the field is accessed. A bare name must be
/// declared by exactly one module.
pub fn resolve(schema: &Schema, raw: &str) -> Result<FieldPath, SettingsError> {
    if raw.contains('.') {
        return Ok(FieldPath(raw.to_string()));
    }

    match schema.modules_with_field(raw).as_slice() {
        [module] => Ok(FieldPath(format!("{module}.{raw}"))),
        matches => Err(SettingsError::UnknownOrAmbiguousField {
            path: raw.to_string(),
            matches: matches.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::schema;

    #[test]
    fn test_bare_name_in_one_module() {
        let path = resolve(schema(), "min_charm").unwrap();
        assert_eq!(path.as_str(), "costs.min_charm");
        assert_eq!(path.module(), Some("costs"));
    }

    #[test]
    fn test_bare_name_in_two_modules_is_ambiguous() {
        // `charms` exists in both `pools` and `start_items`.
        let err = resolve(schema(), "charms").unwrap_err();
        assert_eq!(
            err,
            SettingsError::UnknownOrAmbiguousField {
                path: "charms".to_string(),
                matches: 2,
            }
        );
    }

    #[test]
    fn test_unknown_bare_name() {
        let err = resolve(schema(), "no_such_field").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::UnknownOrAmbiguousField { matches: 0, .. }
        ));
    }

    #[test]
    fn test_qualified_path_is_not_validated() {
        let path = resolve(schema(), "bogus.field").unwrap();
        assert_eq!(path.to_string(), "bogus.field");
    }
}

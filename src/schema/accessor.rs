//! Path-addressed get/set/copy over [`GenerationSettings`].

use super::{Value, schema};
use crate::error::SettingsError;
use crate::models::GenerationSettings;

impl GenerationSettings {
    /// Read the field at a qualified path.
    pub fn get(&self, path: &str) -> Result<Value, SettingsError> {
        Ok(schema().field(path)?.get(self))
    }

    /// Write the field at a qualified path. The value kind must match the field.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), SettingsError> {
        schema().field(path)?.set(self, value)
    }

    /// Copy one field from `source` into `self`, returning the copied value.
    pub fn copy_field_from(
        &mut self,
        source: &GenerationSettings,
        path: &str,
    ) -> Result<Value, SettingsError> {
        let field = schema().field(path)?;
        let value = field.get(source);
        field.set(self, value)?;
        Ok(value)
    }

    /// Overwrite every module field of `target` with the values in `self`.
    ///
    /// The seed is not a module field and is left alone.
    pub fn copy_all_to(&self, target: &mut GenerationSettings) -> Result<(), SettingsError> {
        for field in schema().fields() {
            field.set(target, field.get(self))?;
        }
        Ok(())
    }

    /// Module fields whose values differ between two trees, as qualified paths.
    pub fn diff(&self, other: &GenerationSettings) -> Vec<String> {
        schema()
            .fields()
            .iter()
            .filter(|f| f.get(self) != f.get(other))
            .map(|f| f.path())
            .collect()
    }
}

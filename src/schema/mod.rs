//! Table-driven access to [`GenerationSettings`] by dotted field path.
//!
//! The [`Schema`] is built once from the descriptors emitted alongside the
//! typed settings structs. It owns the generic per-field randomizer and the
//! clamp pass that the engine treats as host collaborators.

pub mod accessor;
pub mod path;
mod value;

pub use path::{FieldPath, resolve};
pub use value::{EnumValue, FieldKind, SettingEnum, SettingValue, Value};

use crate::error::SettingsError;
use crate::models::GenerationSettings;
use crate::models::settings::RANGE_PAIRS;
use crate::services::sampler;
use indexmap::IndexMap;
use rand::Rng;
use std::fmt;
use std::sync::LazyLock;

pub type Getter = fn(&GenerationSettings) -> Value;
pub type Setter = fn(&mut GenerationSettings, Value) -> Result<(), SettingsError>;

/// One addressable field: where it lives, what it holds, how to reach it.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    pub module: &'static str,
    pub name: &'static str,
    pub kind: FieldKind,
    pub(crate) getter: Getter,
    pub(crate) setter: Setter,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("module", &self.module)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl FieldDescriptor {
    pub fn path(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    pub fn get(&self, settings: &GenerationSettings) -> Value {
        (self.getter)(settings)
    }

    pub fn set(&self, settings: &mut GenerationSettings, value: Value) -> Result<(), SettingsError> {
        if !self.kind.accepts(&value) {
            return Err(SettingsError::TypeMismatch {
                path: self.path(),
                expected: self.kind.describe(),
                found: value.kind_name(),
            });
        }
        (self.setter)(settings, value)
    }
}

/// Path-indexed field table over [`GenerationSettings`].
#[derive(Debug)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    by_path: IndexMap<String, usize>,
    modules: IndexMap<&'static str, Vec<usize>>,
    range_pairs: Vec<(usize, usize)>,
}

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(GenerationSettings::descriptors(), &RANGE_PAIRS)
});

/// The process-wide settings schema.
pub fn schema() -> &'static Schema {
    &SCHEMA
}

impl Schema {
    fn new(fields: Vec<FieldDescriptor>, pairs: &[(&str, &str)]) -> Self {
        let mut by_path = IndexMap::with_capacity(fields.len());
        let mut modules: IndexMap<&'static str, Vec<usize>> = IndexMap::new();

        for (i, field) in fields.iter().enumerate() {
            by_path.insert(field.path(), i);
            modules.entry(field.module).or_default().push(i);
        }

        let range_pairs = pairs
            .iter()
            .filter_map(|(min, max)| Some((*by_path.get(*min)?, *by_path.get(*max)?)))
            .collect();

        Self {
            fields,
            by_path,
            modules,
            range_pairs,
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a fully qualified `module.field` path.
    pub fn field(&self, path: &str) -> Result<&FieldDescriptor, SettingsError> {
        self.by_path
            .get(path)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| SettingsError::UnknownPath(path.to_string()))
    }

    pub fn module_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.keys().copied()
    }

    pub fn module_fields(&self, module: &str) -> impl Iterator<Item = &FieldDescriptor> {
        self.modules
            .get(module)
            .into_iter()
            .flatten()
            .map(|&i| &self.fields[i])
    }

    /// Modules declaring a field with this bare name.
    pub fn modules_with_field(&self, name: &str) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.name == name)
            .map(|f| f.module)
            .collect()
    }

    /// Draw every module field from the generic distribution of its kind.
    pub fn randomize<R: Rng + ?Sized>(
        &self,
        settings: &mut GenerationSettings,
        rng: &mut R,
    ) -> Result<(), SettingsError> {
        for field in &self.fields {
            field.set(settings, sampler::sample(&field.kind, rng))?;
        }
        Ok(())
    }

    /// Draw a single field from the generic distribution of its kind.
    pub fn randomize_field<R: Rng + ?Sized>(
        &self,
        settings: &mut GenerationSettings,
        path: &str,
        rng: &mut R,
    ) -> Result<Value, SettingsError> {
        let field = self.field(path)?;
        let value = sampler::sample(&field.kind, rng);
        field.set(settings, value)?;
        Ok(value)
    }

    /// Swap a min/max pair if it is out of order. Returns whether a swap happened.
    pub fn order_pair(
        &self,
        settings: &mut GenerationSettings,
        min_path: &str,
        max_path: &str,
    ) -> Result<bool, SettingsError> {
        let min = self.field(min_path)?;
        let max = self.field(max_path)?;
        swap_if_inverted(settings, min, max)
    }

    /// Force every numeric field into its legal range and every registered
    /// min/max pair into order.
    pub fn clamp(&self, settings: &mut GenerationSettings) -> Result<(), SettingsError> {
        for field in &self.fields {
            let value = field.get(settings);
            let clamped = field.kind.clamp(value);
            if clamped != value {
                tracing::debug!("Clamped {} from {} to {}", field.path(), value, clamped);
                field.set(settings, clamped)?;
            }
        }

        for &(min, max) in &self.range_pairs {
            swap_if_inverted(settings, &self.fields[min], &self.fields[max])?;
        }
        Ok(())
    }
}

fn swap_if_inverted(
    settings: &mut GenerationSettings,
    min: &FieldDescriptor,
    max: &FieldDescriptor,
) -> Result<bool, SettingsError> {
    let lo = min.get(settings);
    let hi = max.get(settings);
    match (lo.as_f64(), hi.as_f64()) {
        (Some(a), Some(b)) if a > b => {
            min.set(settings, hi)?;
            max.set(settings, lo)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_schema_indexes_every_module() {
        let schema = schema();
        let modules: Vec<_> = schema.module_names().collect();
        assert!(modules.contains(&"costs"));
        assert!(modules.contains(&"progression_depth"));
        assert_eq!(schema.module_fields("costs").count(), 12);
        assert_eq!(schema.module_fields("no_such_module").count(), 0);
    }

    #[test]
    fn test_field_lookup() {
        let schema = schema();
        let field = schema.field("costs.max_charm").unwrap();
        assert_eq!(field.kind, FieldKind::int(0, 40));
        assert!(matches!(
            schema.field("costs.nope"),
            Err(SettingsError::UnknownPath(_))
        ));
    }

    #[test]
    fn test_randomize_respects_ranges() {
        let schema = schema();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut settings = GenerationSettings::default();

        for _ in 0..50 {
            schema.randomize(&mut settings, &mut rng).unwrap();
            for field in schema.fields() {
                let value = field.get(&settings);
                assert_eq!(field.kind.clamp(value), value, "{} out of range", field.path());
            }
        }
    }

    #[test]
    fn test_clamp_orders_pairs_and_ranges() {
        let schema = schema();
        let mut settings = GenerationSettings::default();
        settings.costs.min_charm = 30;
        settings.costs.max_charm = 5;
        settings.costs.min_grub = 99;
        settings.progression_depth.item_depth_weight = -3.0;

        schema.clamp(&mut settings).unwrap();

        assert_eq!(settings.costs.min_charm, 5);
        assert_eq!(settings.costs.max_charm, 30);
        assert_eq!((settings.costs.min_grub, settings.costs.max_grub), (23, 46));
        assert_eq!(settings.progression_depth.item_depth_weight, 0.0);
    }

    #[test]
    fn test_order_pair_reports_swap() {
        let schema = schema();
        let mut settings = GenerationSettings::default();
        settings.costs.min_egg = 9;
        settings.costs.max_egg = 2;

        assert!(schema.order_pair(&mut settings, "costs.min_egg", "costs.max_egg").unwrap());
        assert!(!schema.order_pair(&mut settings, "costs.min_egg", "costs.max_egg").unwrap());
        assert_eq!((settings.costs.min_egg, settings.costs.max_egg), (2, 9));
    }
}

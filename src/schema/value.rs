use std::fmt;

/// A field value crossing the dynamic, path-addressed boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Bool(bool),
    Enum(EnumValue),
}

/// One variant of a settings enum, tagged with its enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    pub type_name: &'static str,
    pub variant: &'static str,
}

impl Value {
    /// Short name of the value's kind, used in type mismatch diagnostics.
    pub fn kind_name(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Enum(e) => format!("enum {}", e.type_name),
        }
    }

    /// Numeric view used for min/max ordering. `None` for bools and enums.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(i) => Some(f64::from(i)),
            Value::Float(f) => Some(f64::from(f)),
            Value::Bool(_) | Value::Enum(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Enum(e) => write!(f, "{}", e.variant),
        }
    }
}

/// Declared type and legal range of a settings field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Int { min: i32, max: i32 },
    Float { min: f32, max: f32 },
    Bool,
    Enum {
        type_name: &'static str,
        variants: &'static [&'static str],
    },
}

impl FieldKind {
    pub const fn int(min: i32, max: i32) -> Self {
        FieldKind::Int { min, max }
    }

    pub const fn float(min: f32, max: f32) -> Self {
        FieldKind::Float { min, max }
    }

    pub fn describe(&self) -> String {
        match self {
            FieldKind::Int { .. } => "int".to_string(),
            FieldKind::Float { .. } => "float".to_string(),
            FieldKind::Bool => "bool".to_string(),
            FieldKind::Enum { type_name, .. } => format!("enum {type_name}"),
        }
    }

    /// Whether a value of this shape may be written to a field of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::Int { .. }, Value::Int(_))
            | (FieldKind::Float { .. }, Value::Float(_))
            | (FieldKind::Bool, Value::Bool(_)) => true,
            (FieldKind::Enum { type_name, variants }, Value::Enum(e)) => {
                *type_name == e.type_name && variants.contains(&e.variant)
            }
            _ => false,
        }
    }

    /// Force a numeric value into the declared range. Other kinds pass through.
    pub fn clamp(&self, value: Value) -> Value {
        match (*self, value) {
            (FieldKind::Int { min, max }, Value::Int(i)) => Value::Int(i.clamp(min, max)),
            (FieldKind::Float { min, max }, Value::Float(x)) => Value::Float(x.clamp(min, max)),
            (_, other) => other,
        }
    }
}

/// Conversion between a typed field and a dynamic [`Value`].
pub trait SettingValue: Sized + Copy {
    fn into_value(self) -> Value;
    fn from_value(value: Value) -> Option<Self>;
}

impl SettingValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl SettingValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(x),
            _ => None,
        }
    }
}

impl SettingValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

/// A closed set of named variants usable as a settings field.
pub trait SettingEnum: Copy + 'static {
    const TYPE_NAME: &'static str;
    const VARIANTS: &'static [&'static str];

    fn variant_name(self) -> &'static str;
    fn from_variant(name: &str) -> Option<Self>;

    fn kind() -> FieldKind {
        FieldKind::Enum {
            type_name: Self::TYPE_NAME,
            variants: Self::VARIANTS,
        }
    }

    fn to_value(self) -> Value {
        Value::Enum(EnumValue {
            type_name: Self::TYPE_NAME,
            variant: self.variant_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_accepts_matching_values_only() {
        let kind = FieldKind::int(0, 10);
        assert!(kind.accepts(&Value::Int(3)));
        assert!(!kind.accepts(&Value::Float(3.0)));
        assert!(!FieldKind::Bool.accepts(&Value::Int(1)));
    }

    #[test]
    fn test_enum_kind_checks_type_and_variant() {
        let kind = FieldKind::Enum {
            type_name: "Mode",
            variants: &["None", "Some"],
        };
        let good = Value::Enum(EnumValue {
            type_name: "Mode",
            variant: "Some",
        });
        let wrong_type = Value::Enum(EnumValue {
            type_name: "Other",
            variant: "Some",
        });
        assert!(kind.accepts(&good));
        assert!(!kind.accepts(&wrong_type));
    }

    #[test]
    fn test_clamp_numeric() {
        assert_eq!(FieldKind::int(0, 46).clamp(Value::Int(99)), Value::Int(46));
        assert_eq!(FieldKind::int(0, 46).clamp(Value::Int(-1)), Value::Int(0));
        assert_eq!(
            FieldKind::float(0.0, 10.0).clamp(Value::Float(12.5)),
            Value::Float(10.0)
        );
        assert_eq!(FieldKind::Bool.clamp(Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_display_and_kind_name() {
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Bool(false).kind_name(), "bool");
        assert_eq!(Value::Int(1).as_f64(), Some(1.0));
        assert_eq!(Value::Bool(true).as_f64(), None);
    }
}

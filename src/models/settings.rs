//! The generation settings tree.
//!
//! Every module is a plain typed struct. The [`generation_settings!`] macro also
//! emits one [`FieldDescriptor`] per field so the tree can be addressed by
//! dotted path (`costs.min_charm`) without giving up static typing for the
//! individual reads and writes.

use crate::error::SettingsError;
use crate::schema::{FieldDescriptor, FieldKind, SettingEnum, SettingValue, Value};
use serde::{Deserialize, Serialize};

/// Declares a settings enum. The first variant is the default.
macro_rules! setting_enum {
    ($(#[$meta:meta])* $name:ident { $first:ident $(, $rest:ident)* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $first,
            $($rest,)*
        }

        impl SettingEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [&'static str] = &[stringify!($first) $(, stringify!($rest))*];

            fn variant_name(self) -> &'static str {
                match self {
                    Self::$first => stringify!($first),
                    $(Self::$rest => stringify!($rest),)*
                }
            }

            fn from_variant(name: &str) -> Option<Self> {
                if name == stringify!($first) {
                    return Some(Self::$first);
                }
                $(
                    if name == stringify!($rest) {
                        return Some(Self::$rest);
                    }
                )*
                None
            }
        }

        impl SettingValue for $name {
            fn into_value(self) -> Value {
                self.to_value()
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::Enum(e) if e.type_name == Self::TYPE_NAME => Self::from_variant(e.variant),
                    _ => None,
                }
            }
        }
    };
}

/// Declares the module structs, the root [`GenerationSettings`] and its field table.
macro_rules! generation_settings {
    (
        $(
            $(#[$mmeta:meta])*
            $module:ident : $mty:ident {
                $( $field:ident : $fty:ty = $default:expr => $kind:expr ),* $(,)?
            }
        )*
    ) => {
        $(
            $(#[$mmeta])*
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            #[serde(default)]
            pub struct $mty {
                $( pub $field: $fty, )*
            }

            impl Default for $mty {
                fn default() -> Self {
                    Self { $( $field: $default, )* }
                }
            }
        )*

        /// Complete generation configuration handed to the host pipeline.
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        #[serde(default)]
        pub struct GenerationSettings {
            /// Reproducibility seed. Not part of any module.
            pub seed: i32,
            $( pub $module: $mty, )*
        }

        impl GenerationSettings {
            pub(crate) fn descriptors() -> Vec<FieldDescriptor> {
                vec![
                    $( $(
                        FieldDescriptor {
                            module: stringify!($module),
                            name: stringify!($field),
                            kind: $kind,
                            getter: |s: &GenerationSettings| SettingValue::into_value(s.$module.$field),
                            setter: |s: &mut GenerationSettings, v: Value| {
                                match <$fty as SettingValue>::from_value(v) {
                                    Some(x) => {
                                        s.$module.$field = x;
                                        Ok(())
                                    }
                                    None => Err(SettingsError::TypeMismatch {
                                        path: concat!(stringify!($module), ".", stringify!($field)).to_string(),
                                        expected: ($kind).describe(),
                                        found: v.kind_name(),
                                    }),
                                }
                            },
                        },
                    )* )*
                ]
            }
        }
    };
}

setting_enum!(
    /// How area and room transitions are shuffled.
    TransitionMode { None, MapAreaRando, FullAreaRando, RoomRando }
);

setting_enum!(
    /// Movement ability granted at the start of a seed.
    StartMovement { None, ZeroOrMore, MantisClaw, MothwingCloak, MonarchWings, CrystalHeart, Random }
);

setting_enum!(
    StartCharms { None, ZeroOrMore, OneOrMore, Random }
);

setting_enum!(
    StartStags { None, DirtmouthStag, ZeroOrMore, OneOrMore, AllStags }
);

setting_enum!(
    /// Miscellaneous start items. Only meaningful when skills or keys are randomized.
    StartMisc { None, ZeroOrMore, OneOrMore, Random }
);

generation_settings! {
    transitions: TransitionSettings {
        mode: TransitionMode = TransitionMode::None => TransitionMode::kind(),
        connected_areas: bool = true => FieldKind::Bool,
        coupled: bool = true => FieldKind::Bool,
    }

    skips: SkipSettings {
        mild_skips: bool = false => FieldKind::Bool,
        shade_skips: bool = false => FieldKind::Bool,
        fireball_skips: bool = false => FieldKind::Bool,
        spike_tunnels: bool = false => FieldKind::Bool,
        dark_rooms: bool = false => FieldKind::Bool,
        spicy_skips: bool = false => FieldKind::Bool,
        precise_movement: bool = false => FieldKind::Bool,
        obscure_skips: bool = false => FieldKind::Bool,
        enemy_pogos: bool = false => FieldKind::Bool,
    }

    /// Which item pools take part in randomization.
    pools: PoolSettings {
        dreamers: bool = true => FieldKind::Bool,
        skills: bool = true => FieldKind::Bool,
        charms: bool = true => FieldKind::Bool,
        keys: bool = true => FieldKind::Bool,
        mask_shards: bool = true => FieldKind::Bool,
        vessel_fragments: bool = true => FieldKind::Bool,
        pale_ore: bool = true => FieldKind::Bool,
        charm_notches: bool = true => FieldKind::Bool,
        geo_chests: bool = true => FieldKind::Bool,
        relics: bool = true => FieldKind::Bool,
        rancid_eggs: bool = true => FieldKind::Bool,
        stags: bool = true => FieldKind::Bool,
        maps: bool = false => FieldKind::Bool,
        whispering_roots: bool = false => FieldKind::Bool,
        grubs: bool = false => FieldKind::Bool,
        lifeblood_cocoons: bool = false => FieldKind::Bool,
        soul_totems: bool = false => FieldKind::Bool,
        grimmkin_flames: bool = false => FieldKind::Bool,
        geo_rocks: bool = false => FieldKind::Bool,
        boss_essence: bool = false => FieldKind::Bool,
        boss_geo: bool = false => FieldKind::Bool,
        lore_tablets: bool = false => FieldKind::Bool,
        journal_entries: bool = false => FieldKind::Bool,
        mimics: bool = false => FieldKind::Bool,
    }

    novelty: NoveltySettings {
        split_claw: bool = false => FieldKind::Bool,
        split_cloak: bool = false => FieldKind::Bool,
        split_superdash: bool = false => FieldKind::Bool,
        randomize_swim: bool = false => FieldKind::Bool,
        randomize_elevator_pass: bool = false => FieldKind::Bool,
        randomize_nail: bool = false => FieldKind::Bool,
        egg_shop: bool = false => FieldKind::Bool,
    }

    /// Shop and check costs. Each min/max pair must stay ordered.
    costs: CostSettings {
        min_grub: i32 = 1 => FieldKind::int(0, 46),
        max_grub: i32 = 23 => FieldKind::int(0, 46),
        grub_tolerance: i32 = 2 => FieldKind::int(0, 46),
        min_essence: i32 = 1 => FieldKind::int(0, 2800),
        max_essence: i32 = 900 => FieldKind::int(0, 2800),
        essence_tolerance: i32 = 150 => FieldKind::int(0, 2800),
        min_egg: i32 = 1 => FieldKind::int(0, 21),
        max_egg: i32 = 10 => FieldKind::int(0, 21),
        egg_tolerance: i32 = 2 => FieldKind::int(0, 21),
        min_charm: i32 = 1 => FieldKind::int(0, 40),
        max_charm: i32 = 20 => FieldKind::int(0, 40),
        charm_tolerance: i32 = 2 => FieldKind::int(0, 40),
    }

    start_items: StartItemSettings {
        min_geo: i32 = 0 => FieldKind::int(0, 4096),
        max_geo: i32 = 0 => FieldKind::int(0, 4096),
        vertical_movement: StartMovement = StartMovement::None => StartMovement::kind(),
        horizontal_movement: StartMovement = StartMovement::None => StartMovement::kind(),
        charms: StartCharms = StartCharms::None => StartCharms::kind(),
        stags: StartStags = StartStags::None => StartStags::kind(),
        misc_items: StartMisc = StartMisc::None => StartMisc::kind(),
    }

    misc: MiscSettings {
        randomize_notch_costs: bool = false => FieldKind::Bool,
        min_notch_total: i32 = 70 => FieldKind::int(0, 240),
        max_notch_total: i32 = 110 => FieldKind::int(0, 240),
        extra_platforms: bool = true => FieldKind::Bool,
        mask_shards_per_mask: i32 = 4 => FieldKind::int(1, 4),
    }

    cursed: CursedSettings {
        replace_junk_with_one_geo: bool = false => FieldKind::Bool,
        remove_spell_upgrades: bool = false => FieldKind::Bool,
        longer_progression_chains: bool = false => FieldKind::Bool,
        cursed_masks: i32 = 0 => FieldKind::int(0, 4),
        cursed_notches: i32 = 0 => FieldKind::int(0, 3),
        mimic_replacements: i32 = 0 => FieldKind::int(0, 45),
    }

    /// Weights that bias how deep progression items are placed.
    progression_depth: ProgressionDepthSettings {
        multi_location_penalty: bool = true => FieldKind::Bool,
        location_depth_weight: f32 = 1.0 => FieldKind::float(0.0, 10.0),
        item_depth_weight: f32 = 1.0 => FieldKind::float(0.0, 10.0),
        transition_depth_weight: f32 = 1.0 => FieldKind::float(0.0, 10.0),
        duplicate_penalty: f32 = 3.0 => FieldKind::float(0.0, 10.0),
    }
}

/// The four cost pairs re-ordered right after custom randomization.
pub const COST_PAIRS: [(&str, &str); 4] = [
    ("costs.min_grub", "costs.max_grub"),
    ("costs.min_essence", "costs.max_essence"),
    ("costs.min_egg", "costs.max_egg"),
    ("costs.min_charm", "costs.max_charm"),
];

/// Every min/max pair the clamp pass keeps ordered.
pub const RANGE_PAIRS: [(&str, &str); 6] = [
    COST_PAIRS[0],
    COST_PAIRS[1],
    COST_PAIRS[2],
    COST_PAIRS[3],
    ("start_items.min_geo", "start_items.max_geo"),
    ("misc.min_notch_total", "misc.max_notch_total"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_ordered() {
        let settings = GenerationSettings::default();
        assert!(settings.costs.min_charm <= settings.costs.max_charm);
        assert_eq!(settings.start_items.misc_items, StartMisc::None);
        assert_eq!(settings.seed, 0);
    }

    #[test]
    fn test_enum_round_trip_through_value() {
        let value = StartMovement::MantisClaw.into_value();
        assert_eq!(StartMovement::from_value(value), Some(StartMovement::MantisClaw));
        assert_eq!(StartCharms::from_value(value), None);
        assert_eq!(StartStags::VARIANTS[0], "None");
    }

    #[test]
    fn test_descriptor_setter_rejects_wrong_kind() {
        let descriptors = GenerationSettings::descriptors();
        let min_charm = descriptors
            .iter()
            .find(|d| d.module == "costs" && d.name == "min_charm")
            .unwrap();

        let mut settings = GenerationSettings::default();
        let err = (min_charm.setter)(&mut settings, Value::Bool(true)).unwrap_err();
        assert!(matches!(err, SettingsError::TypeMismatch { ref path, .. } if path == "costs.min_charm"));

        (min_charm.setter)(&mut settings, Value::Int(12)).unwrap();
        assert_eq!(settings.costs.min_charm, 12);
    }

    #[test]
    fn test_yaml_accepts_partial_documents() {
        let settings: GenerationSettings =
            serde_yaml_ng::from_str("seed: 42\ncosts:\n  min_charm: 10\n").unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.costs.min_charm, 10);
        assert_eq!(settings.costs.max_charm, CostSettings::default().max_charm);
    }
}

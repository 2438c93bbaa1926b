//! Object templates and instances (§3).

use std::collections::HashMap;

use crate::ids::{CharacterId, MobileInstanceId, ObjectInstanceId};
use crate::world::vnum::{ObjectVnum, RoomVnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Light,
    Scroll,
    Wand,
    Staff,
    Weapon,
    Furniture,
    Trash,
    Container,
    Note,
    DrinkContainer,
    Key,
    Food,
    Money,
    Pen,
    Boat,
    Fountain,
    Armor,
    Potion,
    Worn,
    Other,
    Portal,
    Board,
    Corpse,
    Component,
    Instrument,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectExtraFlags: u32 {
        const GLOW     = 1 << 0;
        const HUM      = 1 << 1;
        const NO_RENT  = 1 << 2;
        const NO_DROP  = 1 << 3;
        const MAGIC    = 1 << 4;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WearFlags: u32 {
        const TAKE     = 1 << 0;
        const FINGER   = 1 << 1;
        const NECK     = 1 << 2;
        const BODY     = 1 << 3;
        const HEAD     = 1 << 4;
        const LEGS     = 1 << 5;
        const FEET     = 1 << 6;
        const HANDS    = 1 << 7;
        const ARMS     = 1 << 8;
        const SHIELD   = 1 << 9;
        const ABOUT    = 1 << 10;
        const WAIST    = 1 << 11;
        const WRIST    = 1 << 12;
        const WIELD    = 1 << 13;
        const HOLD     = 1 << 14;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyType {
    Strength,
    Dexterity,
    Intelligence,
    Wisdom,
    Constitution,
    Charisma,
    ArmorClass,
    HitPoints,
    Mana,
    Hitroll,
    Damroll,
}

/// The immutable template loaded from the `.obj` file at boot.
#[derive(Debug, Clone)]
pub struct ObjectTemplate {
    pub vnum: ObjectVnum,
    pub keywords: String,
    pub short_description: String,
    pub long_description: String,
    pub action_description: String,
    pub object_type: ObjectType,
    pub extra_flags: ObjectExtraFlags,
    pub wear_flags: WearFlags,
    /// Four type-specific integer values (§3); interpretation depends on
    /// `object_type` — for `Weapon`: `[dice_sides, dice_count, damage_bonus,
    /// weapon_kind]`.
    pub values: [i32; 4],
    pub weight: i32,
    pub cost: i32,
    pub rent_per_day: i32,
    pub applies: HashMap<ApplyType, i32>,
    pub extra_descriptions: HashMap<String, String>,
}

impl ObjectTemplate {
    pub fn weapon_dice(&self) -> core::dice::Dice {
        core::dice::Dice::new(
            self.values[1].max(0) as u32,
            self.values[0].max(0) as u32,
            self.values[2],
        )
    }
}

/// Where a live object instance currently resides (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectLocation {
    InRoom(RoomVnum),
    InMobileInventory(CharacterId),
    EquippedOnMobile(CharacterId),
    InContainer(ObjectInstanceId),
}

/// Sentinel template vnum used by instances synthesized at runtime (corpses)
/// rather than loaded from an `.obj` record.
pub const SYNTHETIC_TEMPLATE: ObjectVnum = ObjectVnum(-1);

#[derive(Debug, Clone)]
pub struct ObjectInstance {
    pub instance_id: ObjectInstanceId,
    pub template: ObjectVnum,
    pub location: ObjectLocation,
    pub condition: u8,
    pub contents: Vec<ObjectInstanceId>,
    pub active: bool,
    pub decay_at_secs: Option<u64>,
    /// The mobile instance that originally spawned this corpse, if any —
    /// used only for informational logging, never for gameplay logic.
    pub spawned_from_mobile: Option<MobileInstanceId>,
    /// Overrides the template's short/long description. Set for corpses
    /// (`corpse <name>` / `the corpse of <name>`), which have no backing
    /// `.obj` template.
    pub display_name: Option<(String, String)>,
}

impl ObjectInstance {
    pub fn new(instance_id: ObjectInstanceId, template: ObjectVnum, location: ObjectLocation) -> Self {
        ObjectInstance {
            instance_id,
            template,
            location,
            condition: 100,
            contents: Vec::new(),
            active: true,
            decay_at_secs: None,
            spawned_from_mobile: None,
            display_name: None,
        }
    }

    /// Builds a corpse instance per §4.J: a container named `corpse
    /// <name>` with short description `the corpse of <name>`.
    pub fn new_corpse(instance_id: ObjectInstanceId, location: ObjectLocation, victim_name: &str) -> Self {
        let mut instance = Self::new(instance_id, SYNTHETIC_TEMPLATE, location);
        instance.display_name = Some((format!("corpse {victim_name}"), format!("the corpse of {victim_name}")));
        instance
    }

    pub fn is_corpse(&self) -> bool {
        self.display_name.as_ref().is_some_and(|(name, _)| name.contains("corpse"))
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub is_wild_card: bool,

    pub attributes: Vec<Trait>,
    pub skills: Vec<Trait>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parry: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toughness: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armor_value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,

    pub weapons: Vec<Weapon>,
    pub armor: Vec<Armor>,
    pub edges: Vec<String>,
    pub hindrances: Vec<String>,
    pub gear: Vec<String>,
    pub languages: Vec<String>,
    pub special_abilities: Vec<String>,
    pub advances: Vec<String>,
    pub cybertech: Vec<String>,
    pub vehicles: Vec<Vehicle>,
    pub powers: Vec<Power>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcane_background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcane_skill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_points: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bennies: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wealth: Option<String>,
}

impl Character {
    pub fn attribute(&self, key: &str) -> Option<&Trait> {
        self.attributes.iter().find(|t| t.name == key)
    }

    pub fn skill(&self, key: &str) -> Option<&Trait> {
        self.skills.iter().find(|t| t.name == key)
    }

    pub fn attribute_die(&self, key: &str) -> Option<&str> {
        self.attribute(key).map(|t| t.die.as_str())
    }

    pub fn skill_die(&self, key: &str) -> Option<&str> {
        self.skill(key).map(|t| t.die.as_str())
    }
}

/// A named attribute or skill. `name` is the normalised lookup key
/// (see [`crate::extract::traits::trait_key`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    pub die: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl Trait {
    pub fn new(name: impl Into<String>, die: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            die: die.into(),
            info: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Weapon {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    pub range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reach: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rof: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thrown_attack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Power {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limitations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_bonus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damagemod: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Power {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_die: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Armor {
    pub name: String,
    pub value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

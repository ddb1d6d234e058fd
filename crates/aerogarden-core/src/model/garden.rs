// ── Garden record ──
//
// Open field map as returned by the service, with `plantedName` already
// decoded. Typed accessors cover the fields the rest of the crate reads.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::key::GardenKey;

/// Field names read from device objects.
pub mod fields {
    pub const AIR_GUID: &str = "airGuid";
    pub const CONFIG_ID: &str = "configID";
    pub const PLANTED_NAME: &str = "plantedName";
    pub const CHOOSE_GARDEN: &str = "chooseGarden";
    pub const LIGHT_TEMP: &str = "lightTemp";
    pub const LIGHT_STAT: &str = "lightStat";
    pub const PUMP_STAT: &str = "pumpStat";
    pub const NUTRI_STATUS: &str = "nutriStatus";
    pub const PUMP_HYDRO: &str = "pumpHydro";
    pub const PLANTED_DAY: &str = "plantedDay";
    pub const NUTRI_REMIND_DAY: &str = "nutriRemindDay";
    pub const PUMP_LEVEL: &str = "pumpLevel";
}

/// Cache of gardens in status-response order.
pub type GardenMap = IndexMap<GardenKey, Arc<Garden>>;

/// One garden slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Garden {
    pub key: GardenKey,
    pub fields: Map<String, Value>,
}

impl Garden {
    pub fn new(key: GardenKey, fields: Map<String, Value>) -> Self {
        Self { key, fields }
    }

    /// Raw field value. `None` for unknown fields; a present `null` is
    /// returned as `Some(Value::Null)`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Decoded plant name.
    pub fn plant_name(&self) -> Option<&str> {
        self.field(fields::PLANTED_NAME).and_then(Value::as_str)
    }

    /// Multi-garden discriminator, absent for single-garden devices.
    pub fn choose_garden(&self) -> Option<&Value> {
        self.field(fields::CHOOSE_GARDEN).filter(|v| !v.is_null())
    }

    /// Display name.
    ///
    /// Without a discriminator this is the plant name. With one, `0` is
    /// the left slot and every other value is the right slot. A device
    /// that reports `chooseGarden: 0` on a single-slot unit is therefore
    /// named `<plant>_left`.
    pub fn display_name(&self) -> Option<String> {
        let plant = self.plant_name()?;
        match self.choose_garden() {
            None => Some(plant.to_owned()),
            Some(side) if is_zero(side) => Some(format!("{plant}_left")),
            Some(_) => Some(format!("{plant}_right")),
        }
    }

    /// `true` iff `field` equals 1.
    pub fn flag(&self, field: &str) -> bool {
        self.field(field).is_some_and(is_one)
    }

    pub fn is_light_on(&self) -> bool {
        self.flag(fields::LIGHT_STAT)
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        _ => false,
    }
}

fn is_one(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::Bool(b) => *b,
        _ => false,
    }
}

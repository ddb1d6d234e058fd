// ── Sensor catalog ──
//
// Every exposed garden field is one `SensorKind` variant. Host adapters
// build `Sensor`/`GardenLight` views over a `Controller`; the views
// hold no state of their own and always read through the cache.

use serde::Serialize;
use serde_json::Value;
use strum::{EnumIter, IntoEnumIterator};

use crate::controller::Controller;
use crate::error::CoreError;
use crate::model::{GardenKey, fields};

/// Manufacturer string reported for every garden.
pub const MANUFACTURER: &str = "Aerogarden";

/// What a binary sensor's "on" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryClass {
    Running,
    Problem,
    Moisture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorClass {
    Binary(BinaryClass),
    Measurement,
}

/// One exposed garden field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize)]
pub enum SensorKind {
    Pump,
    NutrientWarning,
    WaterLevel,
    PlantedDays,
    NutrientDays,
    PumpLevel,
}

impl SensorKind {
    /// Device object field backing this sensor.
    pub fn field(self) -> &'static str {
        match self {
            Self::Pump => fields::PUMP_STAT,
            Self::NutrientWarning => fields::NUTRI_STATUS,
            Self::WaterLevel => fields::PUMP_HYDRO,
            Self::PlantedDays => fields::PLANTED_DAY,
            Self::NutrientDays => fields::NUTRI_REMIND_DAY,
            Self::PumpLevel => fields::PUMP_LEVEL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::NutrientWarning => "Needs nutrients",
            Self::WaterLevel => "Needs water",
            Self::PlantedDays => "Planted Days",
            Self::NutrientDays => "Nutrient Days",
            Self::PumpLevel => "pump_level",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Pump => "mdi:water-pump",
            Self::NutrientWarning => "mdi:cup-water",
            Self::WaterLevel => "mdi:water",
            Self::PlantedDays => "mdi:calendar",
            Self::NutrientDays => "mdi:calendar-clock",
            Self::PumpLevel => "mdi:water-percent",
        }
    }

    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::PlantedDays | Self::NutrientDays => Some("Days"),
            Self::PumpLevel => Some("Fill Level"),
            Self::Pump | Self::NutrientWarning | Self::WaterLevel => None,
        }
    }

    pub fn class(self) -> SensorClass {
        match self {
            Self::Pump => SensorClass::Binary(BinaryClass::Running),
            Self::NutrientWarning => SensorClass::Binary(BinaryClass::Problem),
            Self::WaterLevel => SensorClass::Binary(BinaryClass::Moisture),
            Self::PlantedDays | Self::NutrientDays | Self::PumpLevel => SensorClass::Measurement,
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self.class(), SensorClass::Binary(_))
    }
}

/// Current reading of a sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorState {
    Binary(bool),
    Measurement(Value),
}

// ── Sensor ───────────────────────────────────────────────────────

/// One sensor of one garden.
#[derive(Clone)]
pub struct Sensor {
    controller: Controller,
    key: GardenKey,
    kind: SensorKind,
}

impl Sensor {
    pub fn new(controller: Controller, key: GardenKey, kind: SensorKind) -> Self {
        Self {
            controller,
            key,
            kind,
        }
    }

    pub fn key(&self) -> &GardenKey {
        &self.key
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// `"<garden name> <label>"`. A garden without a plant name shows as
    /// `"None <label>"`.
    pub fn name(&self) -> String {
        entity_name(&self.controller, &self.key, self.kind.label())
    }

    /// `"<key>_<label>"`, stable across renames.
    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.key, self.kind.label())
    }

    /// Reading from the cache. Binary sensors are on iff the field is 1;
    /// measurements are the raw value. `None` if the garden or field is
    /// missing.
    pub fn state(&self) -> Option<SensorState> {
        if self.kind.is_binary() {
            let garden = self.controller.garden(self.key.as_str())?;
            Some(SensorState::Binary(garden.flag(self.kind.field())))
        } else {
            self.controller
                .garden_property(self.key.as_str(), self.kind.field())
                .map(SensorState::Measurement)
        }
    }

    /// Throttled refresh of the whole cache.
    pub async fn refresh(&self) -> Option<bool> {
        self.controller.throttled_update().await
    }
}

// ── GardenLight ──────────────────────────────────────────────────

/// The grow light of one garden.
#[derive(Clone)]
pub struct GardenLight {
    controller: Controller,
    key: GardenKey,
}

impl GardenLight {
    pub const LABEL: &'static str = "light";

    pub fn new(controller: Controller, key: GardenKey) -> Self {
        Self { controller, key }
    }

    pub fn key(&self) -> &GardenKey {
        &self.key
    }

    pub fn name(&self) -> String {
        entity_name(&self.controller, &self.key, Self::LABEL)
    }

    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.key, Self::LABEL)
    }

    /// `lightStat == 1` in the cache.
    pub fn is_on(&self) -> bool {
        self.controller
            .garden(self.key.as_str())
            .is_some_and(|g| g.is_light_on())
    }

    /// Advance the light one step. The new state is whatever the refetch
    /// reports; nothing is flipped locally.
    pub async fn toggle(&self) -> Result<(), CoreError> {
        self.controller.toggle_light(self.key.as_str()).await
    }
}

// ── Enumeration ──────────────────────────────────────────────────

/// One sensor per kind per cached garden, in garden order.
pub fn sensors_for(controller: &Controller) -> Vec<Sensor> {
    controller
        .gardens()
        .into_iter()
        .flat_map(|key| {
            SensorKind::iter().map(move |kind| (key.clone(), kind))
        })
        .map(|(key, kind)| Sensor::new(controller.clone(), key, kind))
        .collect()
}

/// One light per cached garden.
pub fn lights_for(controller: &Controller) -> Vec<GardenLight> {
    controller
        .gardens()
        .into_iter()
        .map(|key| GardenLight::new(controller.clone(), key))
        .collect()
}

fn entity_name(controller: &Controller, key: &GardenKey, label: &str) -> String {
    let garden = controller
        .garden_name(key.as_str())
        .unwrap_or_else(|| "None".to_owned());
    format!("{garden} {label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_field_once() {
        let fields: Vec<&str> = SensorKind::iter().map(SensorKind::field).collect();
        assert_eq!(
            fields,
            vec![
                "pumpStat",
                "nutriStatus",
                "pumpHydro",
                "plantedDay",
                "nutriRemindDay",
                "pumpLevel"
            ]
        );
    }

    #[test]
    fn binary_kinds_have_no_unit() {
        for kind in SensorKind::iter() {
            assert_eq!(kind.is_binary(), kind.unit().is_none(), "{kind:?}");
        }
        assert_eq!(
            SensorKind::WaterLevel.class(),
            SensorClass::Binary(BinaryClass::Moisture)
        );
        assert_eq!(SensorKind::PumpLevel.unit(), Some("Fill Level"));
    }
}

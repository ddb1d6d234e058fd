// ── Wire → domain conversion ──
//
// Turns raw device objects into keyed `Garden` records. Conversion is
// all-or-nothing: one bad device fails the whole batch so the cache is
// never replaced with a partial map.

use std::sync::Arc;

use aerogarden_api::RawGarden;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{Garden, GardenKey, GardenMap, fields};

/// Convert an ordered device list into a garden map.
///
/// Keys keep response order. A repeated key keeps its first position and
/// takes the later record.
pub fn gardens_from_devices(devices: Vec<RawGarden>) -> Result<GardenMap, CoreError> {
    let mut map = GardenMap::with_capacity(devices.len());
    for device in devices {
        let garden = garden_from_device(device)?;
        map.insert(garden.key.clone(), Arc::new(garden));
    }
    Ok(map)
}

/// Normalize a single device object.
pub fn garden_from_device(mut device: RawGarden) -> Result<Garden, CoreError> {
    let address = match device.get(fields::AIR_GUID) {
        Some(Value::String(address)) => address.clone(),
        Some(other) => {
            return Err(CoreError::Decode {
                message: format!("airGuid is not a string: {other}"),
            });
        }
        None => {
            return Err(CoreError::Decode {
                message: "device is missing airGuid".into(),
            });
        }
    };

    if let Some(encoded) = device.get_mut(fields::PLANTED_NAME) {
        let name = decode_plant_name(encoded).map_err(|message| CoreError::Decode {
            message: format!("{address}: {message}"),
        })?;
        *encoded = Value::String(name);
    }

    let key = GardenKey::compose(&address, device.get(fields::CONFIG_ID));
    Ok(Garden::new(key, device))
}

fn decode_plant_name(value: &Value) -> Result<String, String> {
    let Value::String(encoded) = value else {
        return Err(format!("plantedName is not a string: {value}"));
    };
    // The service line-wraps long names.
    let compact: String = encoded.split_ascii_whitespace().collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| format!("plantedName is not base64: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("plantedName is not UTF-8: {e}"))
}

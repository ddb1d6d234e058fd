// Garden cloud API wire types
//
// Reply shapes are loose: every numeric field may be missing, and the
// device query answers with either a bare array or an error object.
// Device objects are kept as open JSON maps; normalization happens in
// `aerogarden-core`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// One device object from `QueryUserDevice`, untouched.
pub type RawGarden = Map<String, Value>;

// ── Login ────────────────────────────────────────────────────────────

/// Reply from `/api/Admin/Login`. A positive `code` is the user id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Device query ─────────────────────────────────────────────────────

/// Reply from `/api/CustomData/QueryUserDevice`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceQuery {
    /// Ordered device objects, one per garden slot.
    Devices(Vec<RawGarden>),
    /// `{"Message": "..."}` -- the account/device lookup was refused.
    Rejected { message: String },
}

impl DeviceQuery {
    /// Classify a decoded reply body.
    ///
    /// Any object carrying a top-level `Message` is a rejection; an array
    /// must contain only objects. Everything else is a decode failure.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(unexpected("device entry", &other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Devices),
            Value::Object(mut map) => match map.remove("Message") {
                Some(Value::String(message)) => Ok(Self::Rejected { message }),
                Some(other) => Ok(Self::Rejected {
                    message: other.to_string(),
                }),
                None => Err(unexpected("device query reply", &Value::Object(map))),
            },
            other => Err(unexpected("device query reply", &other)),
        }
    }
}

// ── Device config update ─────────────────────────────────────────────

/// Caller-facing description of a config update.
///
/// The firmware has no "set light" call: posting the current `lightTemp`
/// advances the light one step through its bright / dimmed / off cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfigUpdate {
    /// Composite garden key (`<airGuid>[-<configID>]`).
    pub air_guid: String,
    /// Current `chooseGarden` value, `Null` when the device has none.
    pub choose_garden: Value,
    /// Current `lightTemp` value.
    pub light_temp: Value,
}

/// Body posted to `/api/Custom/UpdateDeviceConfig`.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateDeviceConfigBody<'a> {
    #[serde(rename = "airGuid")]
    pub air_guid: &'a str,
    #[serde(rename = "chooseGarden")]
    pub choose_garden: &'a Value,
    #[serde(rename = "userID")]
    pub user_id: &'a str,
    /// Nested JSON document, sent as a string.
    #[serde(rename = "plantConfig")]
    pub plant_config: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlantConfig<'a> {
    #[serde(rename = "lightTemp")]
    pub light_temp: &'a Value,
}

/// Reply from `/api/Custom/UpdateDeviceConfig`. `code == 1` is success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl UpdateResponse {
    pub fn is_success(&self) -> bool {
        self.code == Some(1)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn unexpected(what: &str, value: &Value) -> Error {
    let body = value.to_string();
    Error::Deserialization {
        message: format!("unexpected {what}: {}", preview(&body)),
        body,
    }
}

/// First 200 characters of a body, for error messages.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_reply_is_devices_in_order() {
        let query = DeviceQuery::from_value(json!([
            { "airGuid": "AA:BB:CC:DD:EE:01" },
            { "airGuid": "AA:BB:CC:DD:EE:02", "configID": 3 },
        ]))
        .unwrap();

        let DeviceQuery::Devices(devices) = query else {
            panic!("expected devices, got {query:?}");
        };
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1]["configID"], json!(3));
    }

    #[test]
    fn message_object_is_rejection() {
        let query = DeviceQuery::from_value(json!({ "Message": "No device bound" })).unwrap();
        assert_eq!(
            query,
            DeviceQuery::Rejected {
                message: "No device bound".into()
            }
        );
    }

    #[test]
    fn other_shapes_fail_to_decode() {
        assert!(DeviceQuery::from_value(json!({ "code": 1 })).is_err());
        assert!(DeviceQuery::from_value(json!("nope")).is_err());
        assert!(DeviceQuery::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn update_body_nests_plant_config_as_string() {
        let choose = json!(0);
        let light = json!(1);
        let body = UpdateDeviceConfigBody {
            air_guid: "AA:BB:CC:DD:EE:FF-1",
            choose_garden: &choose,
            user_id: "123",
            plant_config: serde_json::to_string(&PlantConfig { light_temp: &light }).unwrap(),
        };
        let encoded = serde_json::to_value(&body).unwrap();
        assert_eq!(
            encoded,
            json!({
                "airGuid": "AA:BB:CC:DD:EE:FF-1",
                "chooseGarden": 0,
                "userID": "123",
                "plantConfig": "{\"lightTemp\":1}",
            })
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "ü".repeat(300);
        assert_eq!(preview(&body).chars().count(), 200);
    }
}

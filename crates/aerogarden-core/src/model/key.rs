// ── Garden identity ──
//
// One physical device may host several garden slots. Each slot is keyed
// by the hardware address plus the slot's config index.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Composite cache key: `<airGuid>` or `<airGuid>-<configID>`.
///
/// The same string is sent back as `airGuid` on config updates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GardenKey(String);

impl GardenKey {
    /// Build a key from a hardware address and an optional slot index.
    ///
    /// A missing or `null` index yields the bare address. Any present
    /// index, including `0`, is appended after a hyphen.
    pub fn compose(address: &str, config_id: Option<&Value>) -> Self {
        match config_id {
            None | Some(Value::Null) => Self(address.to_owned()),
            Some(Value::String(id)) => Self(format!("{address}-{id}")),
            Some(other) => Self(format!("{address}-{other}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GardenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GardenKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<&str> for GardenKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for GardenKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for GardenKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GardenKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_id_is_appended() {
        let key = GardenKey::compose("AA:BB:CC:DD:EE:FF", Some(&json!(1)));
        assert_eq!(key.as_str(), "AA:BB:CC:DD:EE:FF-1");
    }

    #[test]
    fn zero_config_id_is_still_appended() {
        let key = GardenKey::compose("AA:BB:CC:DD:EE:FF", Some(&json!(0)));
        assert_eq!(key.as_str(), "AA:BB:CC:DD:EE:FF-0");
    }

    #[test]
    fn missing_or_null_config_id_is_bare_address() {
        assert_eq!(
            GardenKey::compose("AA:BB:CC:DD:EE:FF", None).as_str(),
            "AA:BB:CC:DD:EE:FF"
        );
        assert_eq!(
            GardenKey::compose("AA:BB:CC:DD:EE:FF", Some(&Value::Null)).as_str(),
            "AA:BB:CC:DD:EE:FF"
        );
    }

    #[test]
    fn string_config_id_is_not_quoted() {
        let key = GardenKey::compose("AA", Some(&json!("7")));
        assert_eq!(key.to_string(), "AA-7");
    }
}

// Device endpoints
//
// Status query and config update. Both need the user identifier from a
// prior login and fail with `NotLoggedIn` otherwise.

use tracing::debug;
use url::form_urlencoded;

use crate::client::{Endpoint, GardenClient};
use crate::error::Error;
use crate::models::{
    DeviceConfigUpdate, DeviceQuery, PlantConfig, UpdateDeviceConfigBody, UpdateResponse,
};

impl GardenClient {
    /// Fetch every garden bound to the logged-in account.
    ///
    /// `POST /api/CustomData/QueryUserDevice` with `userID=<id>`.
    pub async fn query_user_devices(&self) -> Result<DeviceQuery, Error> {
        let user_id = self.user_id().ok_or(Error::NotLoggedIn)?;
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("userID", &user_id)
            .finish();

        let query = DeviceQuery::from_value(self.post(Endpoint::QueryUserDevice, body).await?)?;
        if let DeviceQuery::Devices(devices) = &query {
            debug!(count = devices.len(), "device query returned");
        }
        Ok(query)
    }

    /// Post a config update for one garden.
    ///
    /// `POST /api/Custom/UpdateDeviceConfig` with a JSON body. The caller
    /// decides what a non-success code means.
    pub async fn update_device_config(
        &self,
        update: &DeviceConfigUpdate,
    ) -> Result<UpdateResponse, Error> {
        let user_id = self.user_id().ok_or(Error::NotLoggedIn)?;
        let plant_config = serde_json::to_string(&PlantConfig {
            light_temp: &update.light_temp,
        })?;
        let body = serde_json::to_string(&UpdateDeviceConfigBody {
            air_guid: &update.air_guid,
            choose_garden: &update.choose_garden,
            user_id: &user_id,
            plant_config,
        })?;

        debug!(garden = %update.air_guid, "updating device config");
        let reply = self.post(Endpoint::UpdateDeviceConfig, body).await?;
        serde_json::from_value(reply.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: reply.to_string(),
        })
    }
}

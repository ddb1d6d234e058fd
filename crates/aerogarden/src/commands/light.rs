//! Grow light command handlers.

use serde::Serialize;
use tabled::Tabled;

use aerogarden_core::{Controller, GardenLight, lights_for};

use crate::cli::{GlobalOpts, LightArgs, LightCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct LightView {
    key: String,
    name: String,
    on: bool,
}

impl From<&GardenLight> for LightView {
    fn from(l: &GardenLight) -> Self {
        Self {
            key: l.key().to_string(),
            name: l.name(),
            on: l.is_on(),
        }
    }
}

#[derive(Tabled)]
struct LightRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Light")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
}

pub async fn handle(
    controller: &Controller,
    args: LightArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    controller.fetch_data().await?;
    let color = output::should_color(&global.color);

    match args.command {
        LightCommand::List => {
            let views: Vec<LightView> = lights_for(controller).iter().map(LightView::from).collect();
            let out = output::render_list(
                &global.output,
                &views,
                |v| LightRow {
                    key: v.key.clone(),
                    name: v.name.clone(),
                    state: output::on_off(v.on, color),
                },
                |v| v.key.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LightCommand::Toggle { key } => {
            let garden = util::find_garden(controller, &key)?;
            let light = GardenLight::new(controller.clone(), garden.key.clone());
            light.toggle().await?;

            let view = LightView::from(&light);
            let out = output::render_single(
                &global.output,
                &view,
                |v| format!("{} is now {}", v.name, output::on_off(v.on, color)),
                |v| output::on_off(v.on, false),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

//! Sensor command handler.

use serde::Serialize;
use tabled::Tabled;

use aerogarden_core::{Controller, Sensor, SensorState, sensors_for};

use crate::cli::{GlobalOpts, SensorsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct SensorView {
    unique_id: String,
    name: String,
    garden: String,
    icon: &'static str,
    unit: Option<&'static str>,
    state: Option<SensorState>,
}

impl From<&Sensor> for SensorView {
    fn from(s: &Sensor) -> Self {
        Self {
            unique_id: s.unique_id(),
            name: s.name(),
            garden: s.key().to_string(),
            icon: s.kind().icon(),
            unit: s.kind().unit(),
            state: s.state(),
        }
    }
}

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Sensor")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "ID")]
    unique_id: String,
}

fn row(v: &SensorView, color: bool) -> SensorRow {
    let state = match &v.state {
        None => "-".into(),
        Some(SensorState::Binary(on)) => output::on_off(*on, color),
        Some(SensorState::Measurement(value)) => match v.unit {
            Some(unit) => format!("{} {unit}", util::show_value(value)),
            None => util::show_value(value),
        },
    };
    SensorRow {
        name: v.name.clone(),
        state,
        unique_id: v.unique_id.clone(),
    }
}

pub async fn handle(
    controller: &Controller,
    args: SensorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    controller.fetch_data().await?;
    if let Some(ref key) = args.garden {
        util::find_garden(controller, key)?;
    }

    let views: Vec<SensorView> = sensors_for(controller)
        .iter()
        .filter(|s| args.garden.as_deref().is_none_or(|k| s.key().as_str() == k))
        .map(SensorView::from)
        .collect();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &views,
        |v| row(v, color),
        |v| v.unique_id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

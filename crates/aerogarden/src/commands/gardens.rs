//! Garden command handlers.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use aerogarden_core::{Controller, Garden, fields};

use crate::cli::{GardensArgs, GardensCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Summary view ────────────────────────────────────────────────────

#[derive(Serialize)]
struct GardenSummary {
    key: String,
    name: Option<String>,
    light: bool,
    pump: bool,
    needs_water: bool,
    needs_nutrients: bool,
    pump_level: Option<Value>,
    planted_days: Option<Value>,
}

impl From<&Arc<Garden>> for GardenSummary {
    fn from(g: &Arc<Garden>) -> Self {
        Self {
            key: g.key.to_string(),
            name: g.display_name(),
            light: g.is_light_on(),
            pump: g.flag(fields::PUMP_STAT),
            needs_water: g.flag(fields::PUMP_HYDRO),
            needs_nutrients: g.flag(fields::NUTRI_STATUS),
            pump_level: g.field(fields::PUMP_LEVEL).cloned(),
            planted_days: g.field(fields::PLANTED_DAY).cloned(),
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GardenRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Light")]
    light: String,
    #[tabled(rename = "Pump")]
    pump: String,
    #[tabled(rename = "Water")]
    water: String,
    #[tabled(rename = "Nutrients")]
    nutrients: String,
    #[tabled(rename = "Planted")]
    planted: String,
}

fn row(s: &GardenSummary, color: bool) -> GardenRow {
    GardenRow {
        key: s.key.clone(),
        name: s.name.clone().unwrap_or_else(|| "-".into()),
        light: output::on_off(s.light, color),
        pump: output::on_off(s.pump, color),
        water: output::alert(if s.needs_water { "low" } else { "ok" }, s.needs_water, color),
        nutrients: output::alert(
            if s.needs_nutrients { "due" } else { "ok" },
            s.needs_nutrients,
            color,
        ),
        planted: s
            .planted_days
            .as_ref()
            .map_or_else(|| "-".into(), |d| format!("{} days", util::show_value(d))),
    }
}

fn detail(g: &Arc<Garden>) -> String {
    let mut lines = vec![
        format!("Key:   {}", g.key),
        format!("Name:  {}", g.display_name().as_deref().unwrap_or("-")),
        String::new(),
    ];
    let width = g.fields.keys().map(String::len).max().unwrap_or(0);
    for (name, value) in &g.fields {
        lines.push(format!("{name:<width$}  {}", util::show_value(value)));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: GardensArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let gardens = controller.fetch_data().await?;

    match args.command {
        GardensCommand::List => {
            let color = output::should_color(&global.color);
            let summaries: Vec<GardenSummary> = gardens.values().map(GardenSummary::from).collect();
            let out = output::render_list(
                &global.output,
                &summaries,
                |s| row(s, color),
                |s| s.key.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GardensCommand::Show { key } => {
            let garden = util::find_garden(controller, &key)?;
            let out = output::render_single(&global.output, &garden, detail, |g| {
                g.key.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GardensCommand::Get { key, field } => {
            util::find_garden(controller, &key)?;
            let value = controller
                .garden_property(&key, &field)
                .ok_or_else(|| CliError::FieldNotFound {
                    key: key.clone(),
                    field: field.clone(),
                })?;
            let out = output::render_single(
                &global.output,
                &value,
                util::show_value,
                util::show_value,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

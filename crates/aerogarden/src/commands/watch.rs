//! Watch command: keep pollers running and print every cache replacement.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use aerogarden_core::{DEFAULT_POLL_INTERVAL, Garden, GardenMap, GardenRegistry};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct WatchEvent {
    profile: String,
    refreshed_at: Option<DateTime<Utc>>,
    gardens: Vec<Arc<Garden>>,
}

fn event_lines(event: &WatchEvent, color: bool) -> String {
    let stamp = event
        .refreshed_at
        .map_or_else(|| "--:--:--".into(), |t| t.format("%H:%M:%S").to_string());
    event
        .gardens
        .iter()
        .map(|g| {
            format!(
                "[{stamp}] {}  {}  light {}",
                event.profile,
                g.display_name().unwrap_or_else(|| g.key.to_string()),
                output::on_off(g.is_light_on(), color),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_event(event: &WatchEvent, global: &GlobalOpts, color: bool) {
    // One JSON document per line so the stream stays parseable.
    let out = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json_compact(event),
        OutputFormat::Yaml => format!("---\n{}", output::render_yaml(event)),
        OutputFormat::Table | OutputFormat::Plain => event_lines(event, color),
    };
    output::print_output(&out, global.quiet);
}

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let configs = if args.all {
        config::all_controller_configs(global)?
    } else {
        let cfg = config::load_config_or_default();
        let name = config::active_profile_name(global, &cfg);
        vec![(name, config::controller_config(global)?)]
    };

    let color = output::should_color(&global.color);
    let registry = GardenRegistry::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<(String, Arc<GardenMap>)>();

    for (name, mut controller_config) in configs {
        if let Some(secs) = args.interval {
            controller_config.poll_interval = Duration::from_secs(secs.max(1));
        } else if controller_config.poll_interval.is_zero() {
            controller_config.poll_interval = DEFAULT_POLL_INTERVAL;
        }

        let controller = registry.setup(name.clone(), controller_config).await?;
        let mut stream = controller.subscribe();
        print_event(
            &WatchEvent {
                profile: name.clone(),
                refreshed_at: controller.last_refresh(),
                gardens: stream.current().values().cloned().collect(),
            },
            global,
            color,
        );

        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(snapshot) = stream.changed().await {
                if tx.send((name.clone(), snapshot)).is_err() {
                    break;
                }
            }
        });
    }
    drop(tx);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted, stopping pollers");
                break;
            }
            msg = rx.recv() => {
                let Some((profile, snapshot)) = msg else { break };
                let refreshed_at = match registry.get(&profile).await {
                    Some(controller) => controller.last_refresh(),
                    None => None,
                };
                print_event(
                    &WatchEvent {
                        profile,
                        refreshed_at,
                        gardens: snapshot.values().cloned().collect(),
                    },
                    global,
                    color,
                );
            }
        }
    }

    registry.shutdown().await;
    Ok(())
}

//! Recording and sensor-history command handlers.

use tabled::Tabled;

use moja_core::{DeviceApi, Recording, SensorReading, StaticToken};

use crate::cli::{GlobalOpts, HistoryArgs};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordingRow {
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&Recording> for RecordingRow {
    fn from(r: &Recording) -> Self {
        Self {
            created: util::format_time(&r.created_at),
            url: r.url.clone(),
        }
    }
}

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Humidity %")]
    humidity: String,
    #[tabled(rename = "CPU °C")]
    cpu: String,
}

impl From<&SensorReading> for ReadingRow {
    fn from(r: &SensorReading) -> Self {
        Self {
            time: util::format_time(&r.created_at),
            temperature: or_dash(r.temperature.map(|v| format!("{v:.1}"))),
            humidity: or_dash(r.humidity.map(|v| format!("{v:.1}"))),
            cpu: or_dash(r.cpu_temperature.map(|v| format!("{v:.1}"))),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn recordings(
    api: &DeviceApi,
    identity: &StaticToken,
    args: HistoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    check_range(&args)?;
    let recordings = api
        .recordings(identity, &args.name, args.from, args.to)
        .await?;
    let out = output::render_list(
        &global.output,
        &recordings,
        |r| RecordingRow::from(r),
        |r| r.url.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn sensors(
    api: &DeviceApi,
    identity: &StaticToken,
    args: HistoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    check_range(&args)?;
    let readings = api
        .sensor_history(identity, &args.name, args.from, args.to)
        .await?;
    let out = output::render_list(
        &global.output,
        &readings,
        |r| ReadingRow::from(r),
        |r| r.created_at.to_rfc3339(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn check_range(args: &HistoryArgs) -> Result<(), CliError> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            return Err(CliError::Validation {
                field: "--from".into(),
                reason: format!("{from} is after --to {to}"),
            });
        }
    }
    Ok(())
}

//! Command dispatch: bridges CLI args -> `DeviceApi` calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod history;
pub mod live;
pub mod relay;
pub mod users;
pub mod util;

use moja_core::{DeviceApi, StaticToken};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dispatch an upstream-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    api: &DeviceApi,
    identity: &StaticToken,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(api, identity, args, global).await,
        Command::Users(args) => users::handle(api, identity, args, global).await,
        Command::Status(args) => live::status(api, identity, &args.name, global).await,
        Command::Sensor(args) => live::sensor(api, identity, &args.name, global).await,
        Command::Stream(args) => live::stream(api, identity, &args.name, global).await,
        Command::Recordings(args) => history::recordings(api, identity, args, global).await,
        Command::Sensors(args) => history::sensors(api, identity, args, global).await,
        Command::Relay(args) => relay::handle(api, identity, args, global).await,
        Command::Health => health(api, identity, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

async fn health(
    api: &DeviceApi,
    identity: &StaticToken,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let health = api.health(identity).await?;
    let origin = api.recorder().origin();
    let out = output::render_single(
        &global.output,
        &serde_json::json!({
            "recorder": origin,
            "healthy": health.healthy,
            "status": health.status,
        }),
        |_| {
            if health.healthy {
                format!("{origin} is healthy (HTTP {})", health.status)
            } else {
                format!("{origin} is NOT healthy (HTTP {})", health.status)
            }
        },
        |_| health.healthy.to_string(),
    )?;
    output::print_output(&out, global.quiet);

    if health.healthy {
        Ok(())
    } else {
        Err(CliError::Unhealthy {
            url: origin.to_owned(),
            status: health.status,
        })
    }
}

//! Relay command handlers.

use tabled::Tabled;

use moja_core::{DeviceApi, StaticToken};

use crate::cli::{GlobalOpts, RelayArgs, RelayCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RelayDeviceRow {
    #[tabled(rename = "Name")]
    name: String,
}

pub async fn handle(
    api: &DeviceApi,
    identity: &StaticToken,
    args: RelayArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RelayCommand::List => {
            let names = api.relay_devices(identity).await?;
            let out = output::render_list(
                &global.output,
                &names,
                |n| RelayDeviceRow { name: n.clone() },
                String::clone,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

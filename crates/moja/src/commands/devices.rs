//! Device command handlers.

use tabled::Tabled;

use moja_core::{Device, DeviceApi, Role, StaticToken};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Allowed roles")]
    roles: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            name: d.name.clone(),
            active: if d.active { "yes".into() } else { "no".into() },
            roles: util::join_roles(&d.allowed_roles),
        }
    }
}

fn detail(d: &Device) -> String {
    [
        format!("Name:    {}", d.name),
        format!("Active:  {}", if d.active { "yes" } else { "no" }),
        format!("Roles:   {}", util::join_roles(&d.allowed_roles)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: &DeviceApi,
    identity: &StaticToken,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = api.list_devices(identity).await?;
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get(arg) => {
            let device = api
                .get_device(identity, &arg.name)
                .await?
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "device".into(),
                    identifier: arg.name.clone(),
                    list_command: "devices list".into(),
                })?;
            let out = output::render_single(&global.output, &device, detail, |d| d.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::SetRoles { name, roles } => {
            let mut roles: Vec<Role> = roles.into_iter().map(Role::from).collect();
            roles.sort();
            roles.dedup();
            api.set_device_roles(identity, &name, &roles).await?;
            if !global.quiet {
                eprintln!("Roles for '{name}' set to: {}", util::join_roles(&roles));
            }
            Ok(())
        }
    }
}

//! User and role command handlers.

use tabled::Tabled;

use moja_core::{DeviceApi, Identity, Role, StaticToken, User};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            email: or_dash(u.email.as_deref()),
            role: or_dash(u.role),
            created: or_dash(u.created_at.as_ref().map(util::format_time)),
        }
    }
}

fn detail(u: &User) -> String {
    [
        format!("ID:       {}", u.id),
        format!("UID:      {}", or_dash(u.uid.as_deref())),
        format!("Email:    {}", or_dash(u.email.as_deref())),
        format!("Role:     {}", or_dash(u.role)),
        format!("Admin:    {}", if u.is_admin() { "yes" } else { "no" }),
        format!(
            "Created:  {}",
            or_dash(u.created_at.as_ref().map(util::format_time))
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: &DeviceApi,
    identity: &StaticToken,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let users = api.list_users(identity).await?;
            let out = output::render_list(&global.output, &users, |u| UserRow::from(u), |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Me => {
            let me = api.me(identity).await?;
            let out = output::render_single(&global.output, &me, detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Role => {
            let role = api.get_user_role(identity).await?;
            let claimed = identity.role_claim();
            if claimed.is_some() && claimed != role {
                tracing::warn!(
                    claimed = ?claimed,
                    recorder = ?role,
                    "token role claim disagrees with the recorder; the recorder wins"
                );
            }
            let out = output::render_single(
                &global.output,
                &serde_json::json!({ "role": role }),
                |_| or_dash(role),
                |_| role.map(|r: Role| r.to_string()).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::SetRole { id, role } => {
            let role = role.map(Role::from);
            api.set_user_role(identity, &id, role).await?;
            if !global.quiet {
                match role {
                    Some(role) => eprintln!("User '{id}' is now {role}"),
                    None => eprintln!("Role revoked for user '{id}'"),
                }
            }
            Ok(())
        }
    }
}

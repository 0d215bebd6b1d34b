use anyhow::{anyhow, bail};
use dialoguer::Confirm;
use models::{
    access::{Permission, Role},
    user::User,
};
use services::services::{
    access::{AccessService, PermissionChange, resolve_roles},
    api_client::ApiClient,
    resources::{Permissions, ResourceService, Roles, Users},
    role_form::RoleForm,
};

use super::Context;
use crate::{
    cli::{PermissionCommands, RoleCommands, UserCommands},
    output::{print_one, print_table, text},
};

pub async fn handle_roles(ctx: &Context, command: RoleCommands) -> anyhow::Result<()> {
    let client = ctx.session()?;
    let roles = match command {
        RoleCommands::List => ResourceService::list::<Roles>(&client).await?,
        RoleCommands::Show { id } => {
            let role = ResourceService::get_role(&client, &id).await?;
            return print_one(ctx.json, role, |r| {
                let permissions: Vec<&str> = r.permissions.iter().map(|p| p.label()).collect();
                format!(
                    "id:          {}\nname:        {}\npermissions: {}",
                    r.id,
                    r.display_name(),
                    text(Some(permissions.join(", ").as_str()))
                )
            });
        }
        RoleCommands::Create { name, permissions } => {
            let catalogue = ResourceService::list::<Permissions>(&client).await?;
            let mut form = RoleForm::open_create();
            form.name = name;
            for wanted in &permissions {
                let permission = find_permission(&catalogue, wanted)?;
                if !form.is_selected(&permission.id) {
                    form.toggle(&permission.id);
                }
            }
            ResourceService::create::<Roles>(&client, &form.submit()?).await?
        }
        RoleCommands::Update { id, name, toggles } => {
            let role = ResourceService::get_role(&client, &id).await?;
            let mut form = RoleForm::open_edit(&role);
            if let Some(name) = name {
                form.name = name;
            }
            if !toggles.is_empty() {
                let catalogue = ResourceService::list::<Permissions>(&client).await?;
                for wanted in &toggles {
                    form.toggle(&find_permission(&catalogue, wanted)?.id);
                }
            }
            ResourceService::update::<Roles>(&client, &id, &form.submit()?).await?
        }
        RoleCommands::Delete { id, yes } => {
            if !yes && !confirm_delete(&client, &id).await? {
                eprintln!("Aborted");
                return Ok(());
            }
            ResourceService::delete::<Roles>(&client, &id).await?
        }
        RoleCommands::TogglePermission { role, permission } => {
            let role = ResourceService::get_role(&client, &role).await?;
            let catalogue = ResourceService::list::<Permissions>(&client).await?;
            let permission = find_permission(&catalogue, &permission)?;
            let outcome = AccessService::toggle_permission(&client, &role, permission).await?;
            return print_one(ctx.json, outcome, |o| match o.change {
                PermissionChange::Assigned => {
                    format!("Assigned {} to {}", permission.name, role.display_name())
                }
                PermissionChange::Revoked => {
                    format!("Revoked {} from {}", permission.name, role.display_name())
                }
            });
        }
    };

    print_table(ctx.json, &roles, &["ID", "NAME", "PERMISSIONS"], |r| {
        vec![
            r.id.clone(),
            r.display_name(),
            r.permissions.len().to_string(),
        ]
    })
}

async fn confirm_delete(client: &ApiClient, id: &str) -> anyhow::Result<bool> {
    let role = ResourceService::get_role(client, id).await?;
    Ok(Confirm::new()
        .with_prompt(format!("Delete role {}?", role.display_name()))
        .default(false)
        .interact()?)
}

fn find_permission<'a>(catalogue: &'a [Permission], wanted: &str) -> anyhow::Result<&'a Permission> {
    catalogue
        .iter()
        .find(|p| p.id == wanted || p.name == wanted)
        .ok_or_else(|| anyhow!("unknown permission {wanted:?}"))
}

pub async fn handle_permissions(ctx: &Context, command: PermissionCommands) -> anyhow::Result<()> {
    let client = ctx.session()?;
    let permissions = match command {
        PermissionCommands::List => ResourceService::list::<Permissions>(&client).await?,
    };
    print_table(ctx.json, &permissions, &["ID", "NAME"], |p| {
        vec![p.id.clone(), p.name.clone()]
    })
}

pub async fn handle_users(ctx: &Context, command: UserCommands) -> anyhow::Result<()> {
    let client = ctx.session()?;
    let roles = ResourceService::list::<Roles>(&client).await?;
    let users = match command {
        UserCommands::List => ResourceService::list::<Users>(&client).await?,
        UserCommands::AssignRoles { user, roles: wanted } => {
            let ids = resolve_roles(&roles, &wanted)
                .map_err(|unknown| anyhow!("unknown role {unknown:?}"))?;
            if ids.is_empty() {
                bail!("at least one --role is required");
            }
            AccessService::assign_roles(&client, &user, ids).await?
        }
    };

    print_table(ctx.json, &users, &["ID", "NAME", "EMAIL", "ROLES"], |u| {
        vec![
            u.id.clone(),
            u.name.clone(),
            text(u.email.as_deref()),
            role_names(u, &roles),
        ]
    })
}

fn role_names(user: &User, roles: &[Role]) -> String {
    let names: Vec<String> = user
        .roles
        .iter()
        .map(|r| match r.resolve(roles) {
            Some(role) => role.display_name(),
            None => r.label().to_string(),
        })
        .collect();
    text(Some(names.join(", ").as_str()))
}

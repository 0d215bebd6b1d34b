use dialoguer::Password;
use secrecy::SecretString;
use serde::Serialize;

use super::Context;
use crate::output::print_one;

fn password_or_prompt(password: Option<String>, confirm: bool) -> anyhow::Result<SecretString> {
    if let Some(password) = password {
        return Ok(SecretString::from(password));
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    Ok(SecretString::from(prompt.interact()?))
}

pub async fn login(ctx: &Context, email: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = password_or_prompt(password, false)?;
    ctx.auth()?.login(email, &password).await?;
    print_one(ctx.json, serde_json::json!({ "email": email }), |_| {
        format!("Logged in as {email}")
    })
}

pub async fn register(
    ctx: &Context,
    name: &str,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = password_or_prompt(password, true)?;
    let res = ctx.auth()?.register(name, email, &password).await?;
    print_one(ctx.json, res, |r| {
        r.message
            .clone()
            .unwrap_or_else(|| format!("Registered {email}, you can now log in"))
    })
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.auth()?.logout()?;
    print_one(ctx.json, serde_json::json!({ "logged_in": false }), |_| {
        "Logged out".to_string()
    })
}

#[derive(Serialize)]
struct Status {
    base_url: String,
    config_dir: String,
    logged_in: bool,
}

pub fn status(ctx: &Context) -> anyhow::Result<()> {
    let status = Status {
        base_url: ctx.config.base_url.clone(),
        config_dir: ctx.config_dir.display().to_string(),
        logged_in: ctx.auth()?.is_logged_in()?,
    };
    print_one(ctx.json, status, |s| {
        format!(
            "backend:    {}\nconfig dir: {}\nsession:    {}",
            s.base_url,
            s.config_dir,
            if s.logged_in { "logged in" } else { "not logged in" }
        )
    })
}

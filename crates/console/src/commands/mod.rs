//! Command handlers. Parsing lives in `cli.rs`, business logic in the
//! `services` crate; these modules wire the two together and render output.

use std::{path::PathBuf, sync::Arc};

use services::services::{
    api_client::ApiClient,
    auth::{AuthService, FileTokenStore, connect},
    config::ConsoleConfig,
};
use tracing::debug;

use crate::cli::{Cli, Commands};

mod access;
mod auth;
mod culture_cycle;
mod dashboard;
mod farm;
mod feed;
mod fish;
mod pond;

/// Settings shared by every handler.
pub struct Context {
    pub json: bool,
    pub config_dir: PathBuf,
    pub config: ConsoleConfig,
}

impl Context {
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config_dir = utils::assets::config_dir(cli.config_dir.as_deref());
        let mut config = ConsoleConfig::load(&utils::assets::config_file(&config_dir))?;
        if let Some(base_url) = &cli.base_url {
            config.base_url = base_url.clone();
        }
        debug!(config_dir = %config_dir.display(), base_url = %config.base_url, "Loaded settings");
        Ok(Self {
            json: cli.json,
            config_dir,
            config,
        })
    }

    pub fn auth(&self) -> anyhow::Result<AuthService> {
        let store = Arc::new(FileTokenStore::new(utils::assets::token_file(
            &self.config_dir,
        )));
        Ok(connect(
            &self.config.base_url,
            self.config.request_timeout(),
            store,
        )?)
    }

    /// Authenticated client; fails when no session is stored.
    pub fn session(&self) -> anyhow::Result<ApiClient> {
        Ok(self.auth()?.session()?)
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::load(&cli)?;
    match cli.command {
        Commands::Login { email, password } => auth::login(&ctx, &email, password).await,
        Commands::Register {
            name,
            email,
            password,
        } => auth::register(&ctx, &name, &email, password).await,
        Commands::Logout => auth::logout(&ctx),
        Commands::Status => auth::status(&ctx),
        Commands::Dashboard => dashboard::show(&ctx).await,
        Commands::Farm { command } => farm::handle(&ctx, command).await,
        Commands::Pond { command } => pond::handle(&ctx, command).await,
        Commands::Fish { command } => fish::handle(&ctx, command).await,
        Commands::Cycle { command } => culture_cycle::handle(&ctx, command).await,
        Commands::Feed { command } => feed::handle_feeds(&ctx, command).await,
        Commands::FeedStock { command } => feed::handle_stocks(&ctx, command).await,
        Commands::Role { command } => access::handle_roles(&ctx, command).await,
        Commands::Permission { command } => access::handle_permissions(&ctx, command).await,
        Commands::User { command } => access::handle_users(&ctx, command).await,
    }
}

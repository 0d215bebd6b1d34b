use clap::Parser;
use services::services::{api_client::ApiError, auth::AuthError};

mod cli;
mod commands;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(err) = commands::run(cli).await {
        eprintln!("error: {err:#}");
        if let Some(hint) = hint(&err) {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
}

fn hint(err: &anyhow::Error) -> Option<&'static str> {
    let api = err.downcast_ref::<ApiError>().or_else(|| match err.downcast_ref::<AuthError>() {
        Some(AuthError::Api(api)) => Some(api),
        _ => None,
    })?;
    match api {
        ApiError::Unauthorized(_) => Some("the session may have expired, run `aquaconsole login`"),
        ApiError::NotAuthenticated => Some("run `aquaconsole login` first"),
        ApiError::Transport(_) | ApiError::Timeout => {
            Some("check --base-url / AQUA_BASE_URL and that the backend is running")
        }
        _ => None,
    }
}

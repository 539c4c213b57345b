use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use hedgelayer_client::{ApiClient, Config, UserProfile};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output;
use crate::Ctx;

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Authenticate with a Hedge Layer API token
    Login,
    /// Show current authentication status
    Status,
    /// Remove stored API token
    Logout,
}

pub async fn run(command: AuthCommand, ctx: &Ctx) -> Result<()> {
    match command {
        AuthCommand::Login => login(ctx).await,
        AuthCommand::Status => status(ctx).await,
        AuthCommand::Logout => logout(),
    }
}

async fn login(ctx: &Ctx) -> Result<()> {
    output::heading("Hedge Layer CLI — Login");
    eprintln!(
        "Create an API token at {} → API Tokens\n",
        output::bold("https://hedgelayer.ai/settings")
    );
    eprint!("Paste your API token: ");
    std::io::stderr().flush()?;

    let mut token = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut token)
        .await
        .context("Failed to read token from stdin")?;
    let token = token.trim().to_string();

    if !token.starts_with("hl_") || token.len() != 43 {
        bail!("Invalid token format. Tokens start with \"hl_\" and are 43 characters.");
    }

    let client = ApiClient::new(&ctx.api_url, Some(&token))?;

    eprint!("\nValidating token...");
    std::io::stderr().flush()?;
    let profile: UserProfile = client
        .get("/api/profile", &[])
        .await
        .map_err(|_| anyhow::anyhow!("Token validation failed. Check your token and try again."))?;
    eprintln!(" done\n");

    let config = Config {
        api_url: ctx.api_url.clone(),
        token: Some(token),
    };
    config.save()?;

    let name = if profile.handle.is_empty() {
        &profile.user_id
    } else {
        &profile.handle
    };
    output::success(&format!("Logged in as {}", output::bold(name)));
    if let Ok(path) = Config::path() {
        eprintln!(
            "  Config saved to {}",
            output::dim(&path.display().to_string())
        );
    }
    Ok(())
}

async fn status(ctx: &Ctx) -> Result<()> {
    if ctx.token.is_none() {
        output::warn(&format!(
            "Not logged in. Run {} to authenticate.",
            output::bold("hl auth login")
        ));
        std::process::exit(1);
    }

    let client = ctx.client()?;
    let profile: UserProfile = match client.get("/api/profile", &[]).await {
        Ok(profile) => profile,
        Err(_) => {
            output::error(&format!(
                "Token is invalid or expired. Run {} to re-authenticate.",
                output::bold("hl auth login")
            ));
            std::process::exit(1);
        }
    };

    if ctx.json {
        output::json(&serde_json::json!({
            "authenticated": true,
            "handle": profile.handle,
            "user_id": profile.user_id,
            "api_url": client.api_url(),
        }));
        return Ok(());
    }

    let handle = if profile.handle.is_empty() {
        "(none)".to_string()
    } else {
        profile.handle
    };
    let config_path = Config::path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    output::heading("Auth Status");
    output::table(
        &[
            vec!["Handle".into(), output::bold(&handle)],
            vec!["User ID".into(), profile.user_id],
            vec!["API URL".into(), client.api_url().to_string()],
            vec!["Config".into(), config_path],
        ],
        None,
    );
    Ok(())
}

fn logout() -> Result<()> {
    Config::clear()?;
    let path = Config::path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    output::success(&format!("Logged out. Token removed from {}", output::dim(&path)));
    Ok(())
}

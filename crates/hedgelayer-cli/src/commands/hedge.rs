use anyhow::{bail, Context, Result};
use hedgelayer_client::{ChatMessage, ChatRequest, RiskProfile};
use hedgelayer_stream::{parse_response, NoopObserver, Protocol};
use tokio::io::AsyncReadExt;

use crate::commands::display_bundle_value;
use crate::output;
use crate::Ctx;

pub async fn run(file: Option<String>, ctx: &Ctx) -> Result<()> {
    let raw = match file.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            buf
        }
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Cannot read file: {path}"))?
        }
    };

    let profile: RiskProfile = serde_json::from_str(&raw)
        .map_err(|_| anyhow::anyhow!("Invalid JSON input. Expected a risk profile object."))?;

    if profile.location.is_empty() || profile.asset_value <= 0.0 || profile.risk_types.is_empty() {
        bail!("Risk profile must include location, assetValue, and at least one riskType.");
    }

    eprintln!("{}", output::dim("Searching markets and calculating hedge..."));

    let risks: Vec<&str> = profile.risk_types.iter().map(|r| r.as_str()).collect();
    let prompt = format!(
        "I need to hedge a {} property worth ${} in {} against {} risks. \
         Please search for relevant markets and build a hedge bundle.",
        profile.asset_type.as_str(),
        output::thousands(profile.asset_value),
        profile.location,
        risks.join(", "),
    );

    let request = ChatRequest {
        messages: vec![ChatMessage::user(prompt)],
        assessment_id: None,
    };

    let client = ctx.client()?;
    let response = client
        .stream("/api/chat", &request)
        .await
        .context("Hedge calculation failed")?;
    let result = parse_response(response, Protocol::Prefixed, &mut NoopObserver)
        .await
        .context("Hedge calculation failed")?;

    match result.hedge_bundle {
        Some(bundle) => display_bundle_value(&bundle, ctx.json),
        None => output::warn("No hedge bundle was produced. Try the interactive assessment: hl assess"),
    }

    Ok(())
}

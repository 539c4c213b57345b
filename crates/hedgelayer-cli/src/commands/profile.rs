use anyhow::Result;
use hedgelayer_client::UserProfile;

use crate::output;
use crate::Ctx;

pub async fn run(ctx: &Ctx) -> Result<()> {
    let client = ctx.authed_client()?;
    let profile: UserProfile = client.get("/api/profile", &[]).await?;

    if ctx.json {
        output::json(&profile);
        return Ok(());
    }

    let handle = if profile.handle.is_empty() {
        "(none)".to_string()
    } else {
        profile.handle
    };

    output::heading("Profile");
    output::table(
        &[
            vec!["Handle".into(), output::bold(&handle)],
            vec!["User ID".into(), profile.user_id],
            vec![
                "Created".into(),
                profile.created_at.format("%b %-d, %Y").to_string(),
            ],
        ],
        None,
    );
    Ok(())
}

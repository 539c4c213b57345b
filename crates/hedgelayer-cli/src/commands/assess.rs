use std::io::Write;

use anyhow::{Context, Result};
use clap::Subcommand;
use hedgelayer_client::{
    ApiClient, Assessment, AssessmentListResponse, ChatMessage, ChatRequest, CreatedAssessment,
};
use hedgelayer_stream::{parse_response, Protocol, StreamObserver, StreamResult};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::display_bundle;
use crate::output;
use crate::Ctx;

#[derive(Subcommand, Default)]
pub enum AssessCommand {
    /// Start an interactive risk assessment chat
    #[default]
    Start,
    /// List past assessments
    List {
        /// Filter by status
        #[arg(short = 's', long)]
        status: Option<String>,
    },
    /// Show assessment details
    Show { id: String },
    /// Delete an assessment
    Delete { id: String },
}

pub async fn run(command: AssessCommand, ctx: &Ctx) -> Result<()> {
    match command {
        AssessCommand::Start => start(ctx).await,
        AssessCommand::List { status } => list(status.as_deref(), ctx).await,
        AssessCommand::Show { id } => show(&id, ctx).await,
        AssessCommand::Delete { id } => delete(&id, ctx).await,
    }
}

/// Live renderer for one chat turn: text streams to stderr as it arrives,
/// tool activity is marked inline, argument/result dumps only when verbose.
struct ChatRenderer {
    verbose: bool,
}

impl StreamObserver for ChatRenderer {
    fn on_text(&mut self, text: &str) {
        eprint!("{text}");
        let _ = std::io::stderr().flush();
    }

    fn on_tool_call(&mut self, name: &str, arguments: &Value) {
        eprintln!("\n{}", output::dim(&format!("  [tool: {name}]")));
        if self.verbose {
            eprintln!("{}", output::dim(&format!("  {arguments}")));
        }
    }

    fn on_tool_result(&mut self, name: &str, result: &Value) {
        if self.verbose {
            let rendered = output::truncate(&result.to_string(), 200);
            eprintln!("{}", output::dim(&format!("  [result: {name}] {rendered}")));
        }
    }
}

async fn start(ctx: &Ctx) -> Result<()> {
    let client = ctx.authed_client()?;
    let created: CreatedAssessment = client
        .post("/api/assessments", None::<&Value>)
        .await
        .context("Failed to open an assessment")?;

    output::heading("Risk Assessment");
    eprintln!(
        "{}",
        output::dim("  Describe the risks you want to hedge. Type /quit to exit.\n")
    );

    let mut messages: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("{}", output::cyan("You: "));
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" {
            break;
        }

        messages.push(ChatMessage::user(input));
        eprint!("\n{}", output::dim("Assistant: "));
        std::io::stderr().flush()?;

        let request = ChatRequest {
            messages: messages.clone(),
            assessment_id: Some(created.id.clone()),
        };

        match chat_turn(&client, &request, ctx.verbose).await {
            Ok(result) => {
                eprintln!("\n");
                if !result.assistant_text.is_empty() {
                    messages.push(ChatMessage::assistant(result.assistant_text.clone()));
                }
                if let Some(bundle) = result.hedge_bundle {
                    super::display_bundle_value(&bundle, ctx.json);
                    break;
                }
            }
            Err(e) => {
                eprintln!();
                output::error(&format!("Chat error: {e:#}"));
            }
        }
    }

    Ok(())
}

async fn chat_turn(client: &ApiClient, request: &ChatRequest, verbose: bool) -> Result<StreamResult> {
    let response = client.stream("/api/chat", request).await?;
    let mut renderer = ChatRenderer { verbose };
    Ok(parse_response(response, Protocol::Sse, &mut renderer).await?)
}

async fn list(status: Option<&str>, ctx: &Ctx) -> Result<()> {
    let client = ctx.authed_client()?;
    let status = status.unwrap_or_default();
    let data: AssessmentListResponse = client
        .get("/api/assessments", &[("list", "true"), ("status", status)])
        .await?;

    if ctx.json {
        output::json(&data.assessments);
        return Ok(());
    }

    if data.assessments.is_empty() {
        output::warn("No assessments found.");
        return Ok(());
    }

    output::heading(&format!("Assessments ({})", data.assessments.len()));

    let rows: Vec<Vec<String>> = data
        .assessments
        .iter()
        .map(|a| {
            let location = a
                .risk_profile
                .as_ref()
                .map(|rp| rp.location.clone())
                .unwrap_or_else(|| "—".to_string());
            let cost = a
                .hedge_bundle
                .as_ref()
                .map(|b| output::currency(b.total_cost))
                .unwrap_or_else(|| "—".to_string());
            vec![
                a.id.chars().take(8).collect(),
                format_status(&a.status),
                location,
                cost,
                output::relative_time(a.created_at),
            ]
        })
        .collect();

    output::table(&rows, Some(&["ID", "Status", "Location", "Cost", "Created"]));
    Ok(())
}

async fn show(id: &str, ctx: &Ctx) -> Result<()> {
    let client = ctx.authed_client()?;
    let assessment: Assessment = client.get(&format!("/api/assessments/{id}"), &[]).await?;

    if ctx.json {
        output::json(&assessment);
        return Ok(());
    }

    let short_id: String = assessment.id.chars().take(8).collect();
    output::heading(&format!("Assessment {}", output::dim(&short_id)));

    output::table(
        &[
            vec!["Status".into(), format_status(&assessment.status)],
            vec![
                "Created".into(),
                assessment.created_at.format("%b %-d, %Y %H:%M").to_string(),
            ],
            vec![
                "Updated".into(),
                assessment.updated_at.format("%b %-d, %Y %H:%M").to_string(),
            ],
        ],
        None,
    );

    if let Some(rp) = &assessment.risk_profile {
        let risks: Vec<&str> = rp.risk_types.iter().map(|r| r.as_str()).collect();
        println!();
        output::table(
            &[
                vec!["Location".into(), rp.location.clone()],
                vec!["Asset Type".into(), rp.asset_type.as_str().to_string()],
                vec!["Asset Value".into(), output::currency(rp.asset_value)],
                vec!["Risk Types".into(), risks.join(", ")],
            ],
            None,
        );
    }

    if let Some(bundle) = &assessment.hedge_bundle {
        display_bundle(bundle);
    }

    Ok(())
}

async fn delete(id: &str, ctx: &Ctx) -> Result<()> {
    let client = ctx.authed_client()?;
    client.delete(&format!("/api/assessments/{id}")).await?;
    output::success("Assessment deleted.");
    Ok(())
}

fn format_status(status: &str) -> String {
    match status {
        "completed" => output::green(status),
        "in_progress" => output::yellow(status),
        "abandoned" => output::red(status),
        _ => status.to_string(),
    }
}

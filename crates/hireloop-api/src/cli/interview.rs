//! `hireloop interview` -- run a complete local interview.
//!
//! Starts both agents on the message bus, triggers the applicant with
//! `start` and prints every message until the hiring manager concludes.

use std::time::Duration;

use anyhow::{Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hireloop_core::agent::ApplicantStep;
use hireloop_core::message::Envelope;
use hireloop_types::config::{DeploymentMode, HIRING_MANAGER_AGENT_ID};

use crate::runner::{LocalEvent, spawn_local_agents};
use crate::state::AppState;

/// One printed transcript line.
#[derive(Debug, serde::Serialize)]
struct Line {
    speaker: String,
    text: String,
}

/// Turn a bus envelope into a transcript line, if it carries one.
fn line_for(envelope: &Envelope, applicant_name: &str) -> Option<Line> {
    if envelope.to == HIRING_MANAGER_AGENT_ID {
        let text = envelope.payload.get("applicantMessage")?.as_str()?;
        Some(Line {
            speaker: applicant_name.to_string(),
            text: text.to_string(),
        })
    } else {
        let text = envelope.payload.get("message")?.as_str()?;
        Some(Line {
            speaker: "Hiring Manager".to_string(),
            text: text.to_string(),
        })
    }
}

pub async fn run_interview(state: &AppState, timeout_secs: u64, json: bool) -> Result<()> {
    if state.config.mode != DeploymentMode::Local {
        bail!("`interview` runs the agents in-process; in deployed mode use `serve` instead");
    }

    let identity = state.config.applicant_identity();
    if !state.gate().verify_applicant(&identity).await {
        bail!(
            "Applicant '{}' ({}) is not registered. Run `hireloop admin register --name \"{}\" --key {}` first.",
            identity.name,
            identity.key,
            identity.name,
            identity.key
        );
    }

    let agents = state.agents()?;
    let cancel = CancellationToken::new();
    let (tx, mut events) = mpsc::unbounded_channel();
    let loops = spawn_local_agents(&agents, &state.bus, cancel.clone(), Some(tx));

    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    if json {
        spinner.finish_and_clear();
    } else {
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Interview in progress...");
    }

    agents.applicant.start("start").await?;

    let deadline = tokio::time::Instant::now() + Duration::from_secs(timeout_secs);
    let mut lines = Vec::new();
    let mut evaluation: Option<String> = None;
    let mut applicant_done = false;
    let mut failure: Option<String> = None;

    while evaluation.is_none() || !applicant_done {
        let event = match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(_) => {
                failure = Some(format!("interview did not conclude within {timeout_secs}s"));
                break;
            }
        };

        match event {
            LocalEvent::Received(envelope) => {
                if let Some(line) = line_for(&envelope, &identity.name) {
                    if !json {
                        spinner.suspend(|| {
                            let speaker = if line.speaker == identity.name {
                                style(line.speaker.as_str()).cyan()
                            } else {
                                style(line.speaker.as_str()).magenta()
                            };
                            println!("  {}: {}", speaker.bold(), line.text);
                            println!();
                        });
                    }
                    lines.push(line);
                }
            }
            LocalEvent::Handled(Ok(reply)) if reply.done => evaluation = Some(reply.text),
            LocalEvent::Handled(Ok(_)) => {}
            LocalEvent::Handled(Err(e)) => {
                failure = Some(format!("hiring manager failed: {e}"));
                break;
            }
            LocalEvent::Applicant(Ok(ApplicantStep::Concluded)) => applicant_done = true,
            LocalEvent::Applicant(Ok(_)) => {}
            LocalEvent::Applicant(Err(e)) => {
                failure = Some(format!("applicant failed: {e}"));
                break;
            }
        }
    }

    cancel.cancel();
    for handle in loops {
        let _ = handle.await;
    }
    spinner.finish_and_clear();

    if let Some(failure) = failure {
        bail!("{failure}");
    }
    let Some(evaluation) = evaluation else {
        bail!("agents stopped before the interview concluded");
    };

    let report_path = state.archive.report_path(&identity);
    if json {
        let result = serde_json::json!({
            "applicant_name": identity.name,
            "applicant_key": identity.key,
            "transcript": lines,
            "evaluation": evaluation,
            "report_path": report_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("  {}", style("Evaluation").bold().underlined());
        println!();
        println!("{evaluation}");
        println!();
        println!(
            "  {} Report saved to {}",
            style("ok").green(),
            style(report_path.display()).cyan()
        );
        println!();
    }

    Ok(())
}

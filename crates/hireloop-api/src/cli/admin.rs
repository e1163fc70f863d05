//! `hireloop admin register|unregister` -- registry changes through the gate.

use anyhow::Result;
use console::style;

use hireloop_types::inbound::AdminRequest;

use crate::cli::AdminCommand;
use crate::state::AppState;

/// Run one admin action exactly as an inbound admin message would be.
pub async fn run_admin(state: &AppState, command: AdminCommand, json: bool) -> Result<()> {
    let action = command.action();
    let args = command.args();
    let request = AdminRequest {
        applicant_name: Some(args.name.clone()),
        applicant_key: Some(args.key.clone()),
        admin_key: Some(args.admin_key.clone()),
        action: Some(action.to_string()),
    };

    let validated = state.gate().validate_admin_action(request).await?;

    if json {
        let result = serde_json::json!({
            "action": validated.command.to_string(),
            "applicant_name": validated.applicant.name,
            "applicant_key": validated.applicant.key,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} {} '{}' ({})",
            style("ok").green(),
            validated.command,
            style(&validated.applicant.name).cyan(),
            style(&validated.applicant.key).dim(),
        );
        println!();
    }

    Ok(())
}

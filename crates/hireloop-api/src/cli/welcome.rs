//! `hireloop welcome`

use anyhow::Result;
use console::style;

use hireloop_core::agent::Welcome;

use crate::state::AppState;

pub fn print_welcome(state: &AppState, json: bool) -> Result<()> {
    let welcome = Welcome::for_applicant(&state.config.applicant_identity());

    if json {
        println!("{}", serde_json::to_string_pretty(&welcome)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Hiring Manager").bold());
    println!();
    println!("  {}", welcome.welcome);
    println!();
    println!("{}", serde_json::to_string_pretty(&welcome.example)?);
    println!();
    Ok(())
}

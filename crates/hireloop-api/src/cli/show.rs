//! `hireloop show <key>` -- print one conversation record.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use hireloop_core::storage::kv_store::KvStore;
use hireloop_types::interview::{
    CONVERSATION_NAMESPACE, ConversationRecord, SessionState, TranscriptEntry,
};

use crate::http::handlers::conversation::ConversationView;
use crate::state::AppState;

pub async fn show_conversation(state: &AppState, key: &str, json: bool) -> Result<()> {
    let record: Option<ConversationRecord> = state
        .store
        .get(CONVERSATION_NAMESPACE, key)
        .await?
        .map(serde_json::from_value)
        .transpose()
        .context("stored conversation record is unreadable")?;

    if json {
        let view = ConversationView::new(key, record.as_ref());
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let Some(record) = record else {
        println!();
        println!(
            "  {} {}  {}",
            style("Conversation").bold(),
            style(key).cyan(),
            style(SessionState::New).yellow(),
        );
        println!("  {}", style("No turns yet.").dim());
        println!();
        return Ok(());
    };

    println!();
    println!(
        "  {} {}  {}  turns: {}",
        style("Conversation").bold(),
        style(key).cyan(),
        style(record.state()).yellow(),
        record.turn_count,
    );
    if let Some(updated_at) = record.updated_at {
        println!("  {}", style(format!("updated {}", updated_at.to_rfc3339())).dim());
    }
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Speaker").fg(Color::White),
        Cell::new("Category").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for (i, entry) in record.history.iter().enumerate() {
        let (speaker, category, text) = match entry {
            TranscriptEntry::Applicant { name, text } => {
                (Cell::new(name).fg(Color::Cyan), String::new(), text)
            }
            TranscriptEntry::HiringManager { category, text } => (
                Cell::new("Hiring Manager").fg(Color::Magenta),
                category.as_str().to_string(),
                text,
            ),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            speaker,
            Cell::new(category),
            Cell::new(text),
        ]);
    }

    println!("{table}");
    println!();
    Ok(())
}

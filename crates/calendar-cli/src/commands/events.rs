// Event commands

use crate::client::{
    Client, ClientError, CreateEventRequest, EventWriteResponse, ListResponse, UpdateEventRequest,
};
use crate::output::{format_time, print_field, print_table_header, print_table_row, OutputFormat};
use anyhow::Result;
use calendar_core::Event;
use clap::Subcommand;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum EventsCommand {
    /// List events, optionally only those overlapping a window
    List {
        /// Window start (e.g. 2024-01-01T09:00Z)
        #[arg(long)]
        start: Option<String>,

        /// Window end
        #[arg(long)]
        end: Option<String>,
    },

    /// Get event by ID
    Get {
        /// Event ID
        id: Uuid,
    },

    /// Create a new event
    Create {
        /// Event title
        #[arg(long, short)]
        title: String,

        /// Start time
        #[arg(long)]
        start: String,

        /// End time (exclusive)
        #[arg(long)]
        end: String,

        /// Event description
        #[arg(long, short)]
        description: Option<String>,

        /// Mark as an all-day event
        #[arg(long)]
        all_day: bool,
    },

    /// Update an event; omitted fields are kept
    Update {
        /// Event ID
        id: Uuid,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        all_day: Option<bool>,
    },

    /// Delete an event
    Delete {
        /// Event ID
        id: Uuid,
    },
}

pub async fn run(
    command: EventsCommand,
    client: &Client,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        EventsCommand::List { start, end } => {
            list(client, output, start.as_deref(), end.as_deref()).await
        }
        EventsCommand::Get { id } => get(client, output, id).await,
        EventsCommand::Create {
            title,
            start,
            end,
            description,
            all_day,
        } => {
            let request = CreateEventRequest {
                title,
                description,
                start_time: start,
                end_time: end,
                all_day,
            };
            let write = client.create_event(&request).await?;
            print_write(output, quiet, "Created", &write)
        }
        EventsCommand::Update {
            id,
            title,
            description,
            start,
            end,
            all_day,
        } => {
            let request = UpdateEventRequest {
                title,
                description,
                start_time: start,
                end_time: end,
                all_day,
            };
            let write = client
                .update_event(id, &request)
                .await
                .map_err(|e| not_found(e, id))?;
            print_write(output, quiet, "Updated", &write)
        }
        EventsCommand::Delete { id } => {
            client
                .delete_event(id)
                .await
                .map_err(|e| not_found(e, id))?;
            if output.is_text() {
                if !quiet {
                    println!("Deleted event: {}", id);
                }
            } else {
                output.print_value(&serde_json::json!({ "success": true }))?;
            }
            Ok(())
        }
    }
}

fn not_found(e: ClientError, id: Uuid) -> anyhow::Error {
    match e {
        ClientError::NotFound => anyhow::anyhow!("Event not found: {}", id),
        e => e.into(),
    }
}

async fn list(
    client: &Client,
    output: OutputFormat,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let events = client.list_events(start, end).await?;

    if output.is_text() {
        if events.is_empty() {
            println!("No events found");
            return Ok(());
        }

        print_table_header(&[("ID", 36), ("TITLE", 25), ("START", 16), ("END", 16)]);

        for event in &events {
            print_table_row(&[
                (&event.id.to_string(), 36),
                (&event.title, 25),
                (&format_time(&event.start_time), 16),
                (&format_time(&event.end_time), 16),
            ]);
        }
    } else {
        output.print_value(&ListResponse { data: events })?;
    }

    Ok(())
}

async fn get(client: &Client, output: OutputFormat, id: Uuid) -> Result<()> {
    let event = client.get_event(id).await.map_err(|e| not_found(e, id))?;

    if output.is_text() {
        print_event(&event);
    } else {
        output.print_value(&event)?;
    }

    Ok(())
}

fn print_write(
    output: OutputFormat,
    quiet: bool,
    verb: &str,
    write: &EventWriteResponse,
) -> Result<()> {
    if !output.is_text() {
        return output.print_value(write);
    }

    if quiet {
        println!("{}", write.event.id);
    } else {
        println!("{} event: {}", verb, write.event.id);
        print_event(&write.event);
    }

    // Overlap never blocks a write; surface it on stderr
    if let (Some(warning), Some(overlapping_id)) = (&write.warning, write.overlapping_id) {
        eprintln!("Warning: {} ({})", warning, overlapping_id);
    }

    Ok(())
}

fn print_event(event: &Event) {
    print_field("ID", &event.id.to_string());
    print_field("Title", &event.title);
    if !event.description.is_empty() {
        print_field("Description", &event.description);
    }
    print_field("Start", &format_time(&event.start_time));
    print_field("End", &format_time(&event.end_time));
    if event.all_day {
        print_field("All day", "yes");
    }
}

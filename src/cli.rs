use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::appointments::AppointmentList;
use crate::controller::FormController;
use crate::database::DatabaseError;
use crate::models::{Appointment, Field, IdGenerator, ValidationError};
use crate::store::{Completion, RecordStore};

#[derive(Parser)]
#[command(name = "vetappt")]
#[command(about = "Veterinary appointments - a small terminal appointment book")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Book a new appointment
    Add(AddArgs),
    /// Print every stored appointment
    List {
        /// Print a JSON array instead of text blocks
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing appointment
    Edit(EditArgs),
    /// Delete an appointment (no error if it does not exist)
    Delete {
        /// Appointment id
        id: i64,
    },
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub pet: String,
    #[arg(long)]
    pub owner: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// Appointment date, e.g. 2024-01-01
    #[arg(long)]
    pub date: String,
    /// Appointment time, e.g. 10:00
    #[arg(long)]
    pub time: String,
    #[arg(long)]
    pub symptoms: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Appointment id
    pub id: i64,
    #[arg(long)]
    pub pet: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub time: Option<String>,
    #[arg(long)]
    pub symptoms: Option<String>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("No appointment with id {0}")]
    NotFound(i64),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn controller_for(store: &RecordStore) -> Result<FormController, CliError> {
    Ok(FormController::new(IdGenerator::seeded(store.max_id()?)))
}

/// Run queued writes and hand the single completion back
fn finish(
    store: &mut RecordStore,
    controller: &mut FormController,
    list: &mut AppointmentList,
) -> Result<i64, CliError> {
    let mut outcome = None;
    for completion in store.drain() {
        controller.on_completion(&completion, list);
        let Completion { result, .. } = completion;
        outcome = Some(result);
    }
    match outcome {
        Some(result) => Ok(result?),
        None => Err(CliError::DatabaseError(DatabaseError::Write(
            "no request was queued".to_string(),
        ))),
    }
}

/// Handle the add command
pub fn handle_add(args: AddArgs, store: &mut RecordStore) -> Result<i64, CliError> {
    let mut controller = controller_for(store)?;
    for (field, value) in [
        (Field::Pet, args.pet),
        (Field::Owner, args.owner),
        (Field::Phone, args.phone),
        (Field::Date, args.date),
        (Field::Time, args.time),
        (Field::Symptoms, args.symptoms),
    ] {
        controller.set_field(field, value);
    }
    controller.submit(store)?;

    let mut list = AppointmentList::new();
    let id = finish(store, &mut controller, &mut list)?;
    println!("Appointment created successfully (ID: {})", id);
    Ok(id)
}

/// Handle the edit command; fields not given keep their stored value
pub fn handle_edit(args: EditArgs, store: &mut RecordStore) -> Result<i64, CliError> {
    let existing = store.get(args.id)?.ok_or(CliError::NotFound(args.id))?;
    let mut controller = controller_for(store)?;
    controller.begin_edit(&existing);
    for (field, value) in [
        (Field::Pet, args.pet),
        (Field::Owner, args.owner),
        (Field::Phone, args.phone),
        (Field::Date, args.date),
        (Field::Time, args.time),
        (Field::Symptoms, args.symptoms),
    ] {
        if let Some(value) = value {
            controller.set_field(field, value);
        }
    }
    controller.submit(store)?;

    let mut list = AppointmentList::from_records(vec![existing]);
    let id = finish(store, &mut controller, &mut list)?;
    println!("Appointment {} updated", id);
    Ok(id)
}

/// Handle the delete command
pub fn handle_delete(id: i64, store: &mut RecordStore) -> Result<(), CliError> {
    store.delete(id);
    for completion in store.drain() {
        completion.result?;
    }
    println!("Appointment {} deleted", id);
    Ok(())
}

/// Handle the list command
pub fn handle_list(json: bool, store: &RecordStore) -> Result<(), CliError> {
    let appointments = store.all()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&appointments)?);
        return Ok(());
    }

    if appointments.is_empty() {
        println!("No appointments");
        return Ok(());
    }
    for appointment in &appointments {
        println!("{}", format_block(appointment));
    }
    Ok(())
}

fn format_block(appointment: &Appointment) -> String {
    format!(
        "#{} {}\n  Owner: {}\n  Phone: {}\n  Date: {}\n  Time: {}\n  Symptoms: {}\n",
        appointment.id.unwrap_or_default(),
        appointment.pet,
        appointment.owner,
        appointment.phone,
        appointment.date,
        appointment.time,
        appointment.symptoms
    )
}

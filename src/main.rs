mod cli;
mod cmd;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction, IntakeAction, MedAction, ScheduleAction, TimeAction};
use std::process;

fn main() {
    dosewatch::logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { skip } => cmd::init::run(skip),
        Commands::Med { action } => match action {
            MedAction::Add { name, notes, url } => {
                cmd::med::run_add(&name, notes.as_deref(), url.as_deref(), cli.human)
            }
            MedAction::List => cmd::med::run_list(cli.human),
            MedAction::Show { medication } => cmd::med::run_show(&medication, cli.human),
            MedAction::Update {
                medication,
                name,
                notes,
                url,
            } => cmd::med::run_update(
                &medication,
                name.as_deref(),
                notes.as_deref(),
                url.as_deref(),
                cli.human,
            ),
            MedAction::Remove { medication, yes } => {
                cmd::med::run_remove(&medication, yes, cli.human)
            }
        },
        Commands::Schedule { action } => match action {
            ScheduleAction::Add {
                medication,
                label,
                freq,
                start,
                end,
                days,
                tz,
                no_reminders,
            } => cmd::schedule::run_add(cmd::schedule::AddArgs {
                medication: &medication,
                label: &label,
                freq,
                start,
                end,
                days: days.as_deref(),
                tz: tz.as_deref(),
                no_reminders,
                human: cli.human,
            }),
            ScheduleAction::List { medication } => {
                cmd::schedule::run_list(&medication, cli.human)
            }
            ScheduleAction::Update {
                id,
                label,
                freq,
                forever,
                start,
                end,
                days,
                tz,
                reminders,
            } => cmd::schedule::run_update(cmd::schedule::UpdateArgs {
                id: &id,
                label: label.as_deref(),
                freq,
                forever,
                start,
                end,
                days: days.as_deref(),
                tz: tz.as_deref(),
                reminders,
                human: cli.human,
            }),
            ScheduleAction::Remove { id } => cmd::schedule::run_remove(&id, cli.human),
        },
        Commands::Time { action } => match action {
            TimeAction::Add {
                schedule,
                at,
                dosage,
                instructions,
                prn,
                order,
            } => cmd::dose::run_add(
                &schedule,
                &at,
                dosage.as_deref(),
                instructions.as_deref(),
                prn,
                order,
                cli.human,
            ),
            TimeAction::List { schedule } => cmd::dose::run_list(&schedule, cli.human),
            TimeAction::Update {
                id,
                at,
                dosage,
                instructions,
                prn,
                order,
            } => cmd::dose::run_update(
                &id,
                at.as_deref(),
                dosage.as_deref(),
                instructions.as_deref(),
                prn,
                order,
                cli.human,
            ),
            TimeAction::Remove { id } => cmd::dose::run_remove(&id, cli.human),
        },
        Commands::Take {
            medication,
            time_id,
            status,
            date,
            dose,
            note,
        } => cmd::intake::run_take(
            &medication,
            time_id.as_deref(),
            &status,
            date,
            dose.as_deref(),
            note.as_deref(),
            cli.human,
        ),
        Commands::Intake { action } => match action {
            IntakeAction::List {
                medication,
                from,
                to,
                last,
            } => cmd::intake::run_list(&medication, from, to, last, cli.human),
        },
        Commands::Upcoming { limit } => cmd::upcoming::run(limit, cli.human),
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd::config::run_show(cli.human),
            ConfigAction::Set { key, value } => cmd::config::run_set(&key, &value),
        },
        Commands::Completions { shell } => cmd::completions::run(shell),
    };

    if let Err(e) = result {
        let code = error_code(&e);
        let err = output_error(code, &e.to_string());
        eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        process::exit(1);
    }
}

fn error_code(e: &anyhow::Error) -> &'static str {
    match e.downcast_ref::<dosewatch::Error>() {
        Some(dosewatch::Error::Validation { .. }) => "validation_error",
        Some(dosewatch::Error::NotFound { .. }) => "not_found",
        Some(dosewatch::Error::InvalidTimeFormat(_)) => "invalid_time_format",
        Some(dosewatch::Error::UnknownTimezone(_)) => "unknown_timezone",
        Some(dosewatch::Error::Dispatch { .. }) => "dispatch_error",
        Some(dosewatch::Error::Db(_)) => "database_error",
        _ => "general_error",
    }
}

fn output_error(code: &str, message: &str) -> serde_json::Value {
    dosewatch::output::error("", code, message)
}

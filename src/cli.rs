use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(
    name = "dosewatch",
    version,
    about = "Medication schedule and reminder tracking CLI"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable text instead of JSON
    #[arg(long = "human", short = 'H', global = true)]
    pub human: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize profile and data directory
    Init {
        /// Skip interactive setup, use defaults
        #[arg(long)]
        skip: bool,
    },

    /// Manage medications
    Med {
        #[command(subcommand)]
        action: MedAction,
    },

    /// Manage recurrence schedules on a medication
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// Manage dose times under a schedule
    Time {
        #[command(subcommand)]
        action: TimeAction,
    },

    /// Log an intake event
    Take {
        /// Medication name, alias, or id
        medication: String,

        /// Dose-time id (needed when the medication has several)
        #[arg(long)]
        time_id: Option<String>,

        /// taken, missed, skipped, or snoozed
        #[arg(long, default_value = "taken")]
        status: String,

        /// Event date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Actual dose taken, e.g. "200mg"
        #[arg(long)]
        dose: Option<String>,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Show the intake ledger
    Intake {
        #[command(subcommand)]
        action: IntakeAction,
    },

    /// Recompute and list upcoming reminders
    Upcoming {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Subcommand)]
pub enum MedAction {
    /// Add a medication
    Add {
        name: String,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,

        /// Reference URL (leaflet, pharmacy page)
        #[arg(long)]
        url: Option<String>,
    },

    /// List medications
    List,

    /// Show one medication with schedules and dose times
    Show {
        /// Medication name, alias, or id
        medication: String,
    },

    /// Update a medication
    Update {
        /// Medication name, alias, or id
        medication: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        url: Option<String>,
    },

    /// Remove a medication and everything under it
    Remove {
        /// Medication name, alias, or id
        medication: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Add a schedule to a medication
    Add {
        /// Medication name, alias, or id
        medication: String,

        /// Free-text label, e.g. "daily"
        #[arg(long, default_value = "daily")]
        label: String,

        /// Intended doses per day
        #[arg(long)]
        freq: Option<u32>,

        /// First active day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last active day (YYYY-MM-DD, inclusive); omit for an
        /// open-ended schedule
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Comma-separated weekday codes, e.g. MON,WED,FRI
        #[arg(long)]
        days: Option<String>,

        /// IANA zone id (defaults to the configured profile timezone)
        #[arg(long)]
        tz: Option<String>,

        /// Create with reminders switched off
        #[arg(long)]
        no_reminders: bool,
    },

    /// List schedules of a medication
    List {
        /// Medication name, alias, or id
        medication: String,
    },

    /// Update a schedule and recompute its dose times
    Update {
        /// Schedule id
        id: String,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        freq: Option<u32>,

        /// Make the schedule open-ended (clears the end date)
        #[arg(long)]
        forever: bool,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long)]
        days: Option<String>,

        #[arg(long)]
        tz: Option<String>,

        /// Switch reminders on or off
        #[arg(long)]
        reminders: Option<bool>,
    },

    /// Remove a schedule and its dose times
    Remove {
        /// Schedule id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TimeAction {
    /// Add a dose time to a schedule
    Add {
        /// Schedule id
        schedule: String,

        /// Time of day, HH:MM in the schedule's timezone
        #[arg(long)]
        at: String,

        /// Free-text dosage, e.g. "400mg" or "1/2 tablet"
        #[arg(long)]
        dosage: Option<String>,

        /// Free-text instructions, e.g. "with food"
        #[arg(long)]
        instructions: Option<String>,

        /// As-needed dose; never produces a reminder
        #[arg(long)]
        prn: bool,

        /// Position among the schedule's dose times
        #[arg(long)]
        order: Option<i64>,
    },

    /// List dose times of a schedule
    List {
        /// Schedule id
        schedule: String,
    },

    /// Update a dose time and recompute its trigger
    Update {
        /// Dose-time id
        id: String,

        #[arg(long)]
        at: Option<String>,

        #[arg(long)]
        dosage: Option<String>,

        #[arg(long)]
        instructions: Option<String>,

        #[arg(long)]
        prn: Option<bool>,

        #[arg(long)]
        order: Option<i64>,
    },

    /// Remove a dose time and its intake logs
    Remove {
        /// Dose-time id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum IntakeAction {
    /// List intake logs for a medication, newest first
    List {
        /// Medication name, alias, or id
        medication: String,

        /// Show entries from this date
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Show entries to this date (inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Number of recent entries to show
        #[arg(long)]
        last: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a config value
    Set {
        /// Config key (e.g. timezone, owner_id, alias.ibu)
        key: String,
        /// Config value
        value: String,
    },
}

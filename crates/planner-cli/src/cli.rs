use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Command-line client for the personal planner server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Local storage file (or set PLANNER_STORAGE env var)
    #[arg(long, value_name = "FILE", env = "PLANNER_STORAGE", global = true)]
    pub storage: Option<PathBuf>,

    /// Page origin used as the API host (or set PLANNER_ORIGIN env var)
    #[arg(long, value_name = "URL", env = "PLANNER_ORIGIN", global = true)]
    pub origin: Option<String>,

    /// Behave like the wrapped mobile shell, which has no page origin
    #[arg(long = "shell", global = true)]
    pub mobile_shell: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// API server configuration
    Config(ConfigCommand),
    /// Inspect and build routes
    Route(RouteCommand),
    /// Navigate the view; the route is kept between invocations
    Nav(NavCommand),
    /// Print everything the current view shows
    Show {
        /// Include completed tasks
        #[arg(long)]
        completed: bool,
        /// Include stored password secrets
        #[arg(long)]
        reveal: bool,
    },
    /// Read stdin lines as editor input and autosave them to the entity in view
    Edit,
    /// Show the server's LAN address
    ServerInfo,
    /// App version checks for the wrapped shell
    Version(VersionCommand),
    /// Pomodoro timer state
    Pomodoro(PomodoroCommand),
    /// Work statistics
    Statistics {
        /// Statistics section, e.g. dailyStats or weeklyStats
        #[arg(long, conflicts_with = "detailed")]
        kind: Option<String>,
        #[arg(long)]
        detailed: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Config commands
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration and API base URL
    Show,
    /// Save the API server address to local storage
    SetServer { url: String },
    /// Remove the saved API server address
    ClearServer,
}

// Route commands
#[derive(Args)]
pub struct RouteCommand {
    #[command(subcommand)]
    pub action: RouteAction,
}

#[derive(Subcommand)]
pub enum RouteAction {
    /// Show the current location
    Show,
    /// Build a location from parts
    Encode(RouteEncodeArgs),
    /// Decode a location and show the view it restores
    Parse { query: String },
    /// Open a location as if following a link
    Open { location: String },
}

#[derive(Args)]
pub struct RouteEncodeArgs {
    /// Project id; 0 is all tasks, -1 the journal
    #[arg(long, allow_negative_numbers = true)]
    pub project: Option<i64>,
    #[arg(long)]
    pub task: Option<i64>,
    #[arg(long)]
    pub calendar: bool,
    /// Calendar day (YYYY-MM-DD)
    #[arg(long, requires = "calendar")]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub password: bool,
    #[arg(long, requires = "password")]
    pub password_id: Option<i64>,
    #[arg(long)]
    pub daily_note: Option<i64>,
}

// Navigation commands
#[derive(Args)]
pub struct NavCommand {
    #[command(subcommand)]
    pub action: NavAction,
}

#[derive(Subcommand)]
pub enum NavAction {
    /// Select a project; 0 is all tasks, -1 the journal
    Project {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Select a task
    Task { id: i64 },
    /// Close the selected task
    CloseTask,
    /// Toggle password mode
    Passwords,
    /// Select a password
    Password { id: i64 },
    /// Open the journal calendar
    Calendar {
        /// Close the calendar instead
        #[arg(long)]
        close: bool,
    },
    /// Pick a calendar day; picking the selected day again clears it
    Date { date: NaiveDate },
    /// Select a daily note in the journal
    DailyNote { id: i64 },
    /// Search tasks; an empty query leaves search mode
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Go back in history
    Back,
    /// Go forward in history
    Forward,
    /// Collapse or expand the projects panel
    Panel,
}

// Version commands
#[derive(Args)]
pub struct VersionCommand {
    #[command(subcommand)]
    pub action: VersionAction,
}

#[derive(Subcommand)]
pub enum VersionAction {
    /// Compare the server's app version with the installed one
    Check,
    /// Record the server's app version as installed
    Accept,
}

// Pomodoro commands
#[derive(Args)]
pub struct PomodoroCommand {
    #[command(subcommand)]
    pub action: PomodoroAction,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Idle,
    Work,
    Break,
    Paused,
}

#[derive(Subcommand)]
pub enum PomodoroAction {
    /// Show the saved timer state
    Get,
    /// Save the timer state on the server and locally
    Set {
        #[arg(long, value_enum)]
        state: PhaseArg,
        /// Seconds left in the current phase
        #[arg(long)]
        time_left: Option<u32>,
        #[arg(long, default_value_t = 0)]
        work_count: u32,
    },
}

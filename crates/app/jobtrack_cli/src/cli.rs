use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "jobtrack", version, about = "Track job applications from the terminal")]
pub struct Cli {
    /// Base URL of the Jobtrack API.
    #[arg(
        long,
        global = true,
        env = "JOBTRACK_URL",
        default_value = "http://127.0.0.1:5000"
    )]
    pub url: String,

    /// Session file (defaults to the platform data directory).
    #[arg(long, global = true, env = "JOBTRACK_SESSION")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Create an account and log in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Replace your profile.
    UpdateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        location: String,
    },

    /// Manage job applications.
    #[command(subcommand)]
    Jobs(JobsCommand),

    /// Show application statistics.
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum JobsCommand {
    /// List jobs matching the filters.
    List {
        /// pending, interview, declined or all.
        #[arg(long)]
        status: Option<String>,
        /// full-time, part-time, remote, internship or all.
        #[arg(long)]
        job_type: Option<String>,
        /// latest, oldest, a-z or z-a.
        #[arg(long)]
        sort: Option<String>,
        /// Case-insensitive substring of the position.
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a job application.
    Create {
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        position: String,
        #[command(flatten)]
        details: JobDetails,
    },

    /// Change an existing job application.
    Edit {
        id: Uuid,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[command(flatten)]
        details: JobDetails,
    },

    /// Remove a job application.
    Delete { id: Uuid },
}

#[derive(Args, Debug, Default)]
pub struct JobDetails {
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub job_type: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
}

// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands, JobDetails, JobsCommand};
use jobtrack_client::{ApiClient, ClientState, Field, FileStorage, Store};
use jobtrack_core::models::api::{LoginRequest, RegisterRequest, UpdateUserRequest};

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    if let Commands::Version = args.command {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let storage = match &args.session_file {
        Some(path) => FileStorage::new(path),
        None => FileStorage::default(),
    };
    log::debug!("session file: {}", storage.path().display());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let store = Store::new(ApiClient::new(&args.url)?, Arc::new(storage));
        execute(&store, args.command).await
    })
}

async fn execute(store: &Store, command: Commands) -> Result<()> {
    match command {
        Commands::Version => {}
        Commands::Register {
            name,
            email,
            password,
        } => {
            store
                .register_user(RegisterRequest {
                    name,
                    email,
                    password,
                })
                .await?;
            print_alert(&store.state());
        }
        Commands::Login { email, password } => {
            store.login_user(LoginRequest { email, password }).await?;
            print_alert(&store.state());
        }
        Commands::Logout => {
            store.logout_user();
            println!("Logged out");
        }
        Commands::Whoami => {
            let state = store.state();
            let user = state
                .user
                .ok_or_else(|| Error::Custom("Not logged in".into()))?;
            println!(
                "{} {} <{}> ({})",
                user.name, user.last_name, user.email, user.location
            );
        }
        Commands::UpdateUser {
            email,
            name,
            last_name,
            location,
        } => {
            store
                .update_user(UpdateUserRequest {
                    email,
                    name,
                    last_name,
                    location,
                })
                .await?;
            print_alert(&store.state());
        }
        Commands::Jobs(jobs) => execute_jobs(store, jobs).await?,
        Commands::Stats => {
            store.show_stats().await?;
            let state = store.state();
            println!("pending: {}", state.stats.pending);
            println!("interview: {}", state.stats.interview);
            println!("declined: {}", state.stats.declined);
            for month in &state.monthly_applications {
                println!("{}: {}", month.date, month.count);
            }
        }
    }
    Ok(())
}

async fn execute_jobs(store: &Store, command: JobsCommand) -> Result<()> {
    match command {
        JobsCommand::List {
            status,
            job_type,
            sort,
            search,
        } => {
            let filters = [
                (Field::SearchStatus, status),
                (Field::SearchType, job_type),
                (Field::Sort, sort),
                (Field::Search, search),
            ];
            for (field, value) in filters {
                if let Some(value) = value {
                    store.handle_change(field, value);
                }
            }
            store.get_jobs().await?;
            print_jobs(&store.state());
        }
        JobsCommand::Create {
            company,
            position,
            details,
        } => {
            store.clear_values();
            store.handle_change(Field::Company, company);
            store.handle_change(Field::Position, position);
            apply_details(store, details);
            store.create_job().await?;
            print_alert(&store.state());
        }
        JobsCommand::Edit {
            id,
            company,
            position,
            details,
        } => {
            // The form is loaded from the listed job, so fetch it first.
            store.get_jobs().await?;
            store.set_edit_job(id);
            if !store.state().is_editing {
                return Err(Error::Custom(format!("No job with id : {id}")));
            }
            if let Some(company) = company {
                store.handle_change(Field::Company, company);
            }
            if let Some(position) = position {
                store.handle_change(Field::Position, position);
            }
            apply_details(store, details);
            store.edit_job().await?;
            print_alert(&store.state());
        }
        JobsCommand::Delete { id } => {
            store.delete_job(id).await?;
            println!("Job removed");
        }
    }
    Ok(())
}

fn apply_details(store: &Store, details: JobDetails) {
    let fields = [
        (Field::Status, details.status),
        (Field::JobType, details.job_type),
        (Field::JobLocation, details.location),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            store.handle_change(field, value);
        }
    }
}

fn print_alert(state: &ClientState) {
    if let Some(alert) = &state.alert {
        println!("{}", alert.text);
    }
}

fn print_jobs(state: &ClientState) {
    for job in &state.jobs {
        println!(
            "{}  {} @ {}  [{}, {}, {}]",
            job.id, job.position, job.company, job.status, job.job_type, job.job_location
        );
    }
    println!("{} job(s) found", state.total_jobs);
}

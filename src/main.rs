use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use actix_web::{web, App, HttpServer};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::info;

mod api;
mod client;
mod config;
mod controller;
mod db;
mod jobs;
mod logging;
mod shutdown;
mod view;

use crate::api::{health::health_config, job::handlers::job_config, job::JobService, validation};
use crate::client::{ClientConfig, HttpJobsClient, JobsApi};
use crate::config::Config;
use crate::controller::{AppController, Filters, JobTypeFilter, LocationFilter};
use crate::jobs::{JobForm, JobType, SortOrder};
use crate::shutdown::ShutdownCoordinator;
use crate::view::DeleteConfirmation;

#[derive(Parser)]
#[command(name = "job-board", version, about = "Browse and manage job postings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the job API server
    Serve,
    #[command(flatten)]
    Board(BoardCommand),
}

/// Commands that talk to a running job API
#[derive(Subcommand)]
enum BoardCommand {
    /// Show one page of the board
    List(ListArgs),
    /// Show every field of one posting
    Show { id: i32 },
    /// Post a new job
    Add(FieldArgs),
    /// Edit an existing posting; omitted fields keep their value
    Edit {
        id: i32,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a posting after confirmation
    Delete {
        id: i32,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Full-Time, Part-Time, Contract or Internship
    #[arg(long)]
    job_type: Option<JobTypeFilter>,
    /// "City, Country", a city or a country
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    tag: Option<String>,
    /// newest or oldest
    #[arg(long)]
    sort: Option<SortOrder>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    per_page: Option<u32>,
    /// Narrow the loaded page by title, company or tag
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    job_type: Option<JobType>,
    /// YYYY-MM-DD, defaults to today for new postings
    #[arg(long)]
    posting_date: Option<NaiveDate>,
    /// Comma-separated, e.g. "Life, Pricing"
    #[arg(long)]
    tags: Option<String>,
}

impl FieldArgs {
    fn apply(self, form: &mut JobForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(company) = self.company {
            form.company = company;
        }
        if let Some(city) = self.city {
            form.city = city;
        }
        if let Some(country) = self.country {
            form.country = country;
        }
        if let Some(job_type) = self.job_type {
            form.job_type = job_type;
        }
        if let Some(posting_date) = self.posting_date {
            form.posting_date = posting_date;
        }
        if let Some(tags) = self.tags {
            form.tags = tags;
        }
    }
}

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Serve => serve(config).await.map_err(|e| e.to_string()),
        Command::Board(command) => {
            logging::init_cli();
            run_board(command, &config).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Config) -> io::Result<()> {
    logging::init_server(&config.log_dir)?;

    let database_url = config.require_database_url().map_err(io::Error::other)?;
    let pool = db::connection::get_connection(database_url, config.max_db_connections)
        .await
        .map_err(io::Error::other)?;

    info!("Starting job-board API");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool)
        .await
        .map_err(io::Error::other)?;

    let server_pool = pool.clone();
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(web::Data::new(JobService::new(server_pool.clone())))
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config(max_payload_size))
            .app_data(validation::plain_json_config(max_payload_size))
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server.bind((config.host.as_str(), config.port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}

async fn run_board(command: BoardCommand, config: &Config) -> Result<(), String> {
    let api = HttpJobsClient::new(ClientConfig::new(&config.api_base_url)).map_err(|e| e.to_string())?;
    let today = Local::now().date_naive();

    match command {
        BoardCommand::List(args) => {
            let filters = Filters {
                job_type: args.job_type.unwrap_or_default(),
                location: LocationFilter::from(args.location.as_deref().unwrap_or_default()),
                sort: args.sort.unwrap_or_default(),
                tag: args.tag,
                search_term: String::new(),
            };
            let mut board = AppController::starting_at(
                api,
                filters,
                args.per_page.unwrap_or(config.per_page),
                args.page.unwrap_or(1),
            );
            board.fetch_jobs().await;

            if let Some(term) = args.search {
                board.set_search_term(term);
            }

            if let Some(error) = &board.state().error {
                return Err(error.clone());
            }
            print!("{}", view::render_board(board.state()));
            Ok(())
        }
        BoardCommand::Show { id } => {
            let job = api.get_job(id).await.map_err(|e| describe_lookup(id, e))?;
            print!("{}", view::render_job(&job));
            Ok(())
        }
        BoardCommand::Add(fields) => {
            let mut form = JobForm::new(today);
            fields.apply(&mut form);

            let mut board = AppController::new(api, Filters::default(), config.per_page);
            board.open_add_form();
            if !form.missing_fields().is_empty() {
                print!("{}", view::form::render(&form, false));
                return Err("Missing required fields".to_string());
            }

            if board.create_job(&form).await {
                println!("Job posted: {} at {}", form.title.trim(), form.company.trim());
                print!("{}", view::render_board(board.state()));
                Ok(())
            } else {
                Err(board_error(&board))
            }
        }
        BoardCommand::Edit { id, fields } => {
            let mut board = AppController::new(api, Filters::default(), config.per_page);
            let job = board.api().get_job(id).await.map_err(|e| describe_lookup(id, e))?;
            let mut form = JobForm::from_job(&job, today);
            fields.apply(&mut form);
            board.open_edit(job);
            if !form.missing_fields().is_empty() {
                print!("{}", view::form::render(&form, true));
                return Err("Missing required fields".to_string());
            }

            if board.submit_edit(&form).await {
                println!("Job {} updated", id);
                Ok(())
            } else {
                Err(board_error(&board))
            }
        }
        BoardCommand::Delete { id, yes } => {
            let mut board = AppController::new(api, Filters::default(), config.per_page);
            let job = board.api().get_job(id).await.map_err(|e| describe_lookup(id, e))?;
            board.open_delete(job);

            if !yes {
                let dialog = match &board.state().deleting {
                    Some(job) => DeleteConfirmation::new(job).render(),
                    None => return Ok(()),
                };
                print!("{}> ", dialog);
                io::stdout().flush().map_err(|e| e.to_string())?;

                let mut answer = String::new();
                io::stdin()
                    .lock()
                    .read_line(&mut answer)
                    .map_err(|e| e.to_string())?;
                if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                    board.close_delete();
                    println!("Cancelled");
                    return Ok(());
                }
            }

            if board.confirm_delete().await {
                println!("Job {} deleted", id);
                Ok(())
            } else {
                Err(board_error(&board))
            }
        }
    }
}

fn describe_lookup(id: i32, err: client::ClientError) -> String {
    if err.is_not_found() {
        format!("Job {} not found", id)
    } else {
        err.to_string()
    }
}

fn board_error<A: JobsApi>(board: &AppController<A>) -> String {
    board
        .state()
        .error
        .clone()
        .unwrap_or_else(|| "Request failed".to_string())
}

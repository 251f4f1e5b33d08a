//! Campus CLI - command-line consumer of the portal client.
//!
//! # Usage
//!
//! ```bash
//! # Authenticate against the users service
//! campus auth login -u ana
//!
//! # Who is the current user?
//! campus auth whoami
//!
//! # Course material
//! campus files upload -c 3 ./apunte.pdf
//! campus files list -c 3
//! campus files download -c 3 -f 5 -o ./apunte.pdf
//!
//! # Admin-only service health view
//! campus status
//! campus status --watch
//! ```
//!
//! Every protected command rehydrates the session first and consults the
//! authorization gates; a refused gate prints the redirect target and exits
//! non-zero, mirroring the portal's navigation behavior.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "campus")]
#[command(author, version, about = "Campus portal command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication and session management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Course file transfer
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },
    /// Service health view (administrators only)
    Status {
        /// Keep polling instead of fetching one snapshot
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and persist the issued credential
    Login {
        /// Username
        #[arg(short, long)]
        username: String,
    },
    /// Register a new user and log in
    Register {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Role (`alumno`, `administrador`)
        #[arg(short, long, default_value = "alumno")]
        role: String,
    },
    /// Drop the session and the persisted credential
    Logout,
    /// Show the current identity
    Whoami,
}

#[derive(Subcommand)]
enum FilesAction {
    /// Upload a local file to a course
    Upload {
        /// Course id
        #[arg(short, long)]
        course: i64,

        /// Local file to upload
        path: std::path::PathBuf,
    },
    /// List the files attached to a course
    List {
        /// Course id
        #[arg(short, long)]
        course: i64,
    },
    /// Download a course file
    Download {
        /// Course id
        #[arg(short, long)]
        course: i64,

        /// File id
        #[arg(short, long)]
        file: i64,

        /// Destination path
        #[arg(short, long)]
        output: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { username } => commands::auth::login(&ctx, &username).await?,
            AuthAction::Register {
                username,
                email,
                role,
            } => commands::auth::register(&ctx, &username, &email, &role).await?,
            AuthAction::Logout => commands::auth::logout(&ctx)?,
            AuthAction::Whoami => commands::auth::whoami(&ctx)?,
        },
        Commands::Files { action } => match action {
            FilesAction::Upload { course, path } => {
                commands::files::upload(&ctx, course, &path).await?;
            }
            FilesAction::List { course } => commands::files::list(&ctx, course).await?,
            FilesAction::Download {
                course,
                file,
                output,
            } => commands::files::download(&ctx, course, file, &output).await?,
        },
        Commands::Status { watch } => commands::status::show(&ctx, watch).await?,
    }
    Ok(())
}

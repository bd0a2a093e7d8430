//! quizrun CLI: take, review, and manage timed quizzes from a terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizrun", version, about = "Timed quiz session engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz interactively on stdin
    Take {
        /// Quiz id
        #[arg(long)]
        quiz: String,

        /// Email of the signed-in user
        #[arg(long)]
        user: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also write an HTML review page next to the JSON report
        #[arg(long)]
        html: bool,
    },

    /// Validate quiz files
    Validate {
        /// Path to a quiz file or directory
        #[arg(long)]
        quiz_set: PathBuf,
    },

    /// List the quizzes a user may take
    List {
        /// Email of the signed-in user
        #[arg(long)]
        user: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show a saved session report
    Review {
        /// Report JSON
        #[arg(long)]
        report: PathBuf,

        /// Output format: text, markdown, html, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create starter config and example quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizrun=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            quiz,
            user,
            config,
            html,
        } => commands::take::execute(quiz, user, config, html).await,
        Commands::Validate { quiz_set } => commands::validate::execute(quiz_set),
        Commands::List { user, config } => commands::list::execute(user, config).await,
        Commands::Review {
            report,
            format,
            output,
        } => commands::review::execute(report, format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

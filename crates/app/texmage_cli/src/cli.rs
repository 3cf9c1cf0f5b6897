use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "texmage", about = "Turn text prompts into images", version)]
pub struct Cli {
    /// Base URL of the Texmage API.
    #[arg(long, env = "TEXMAGE_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Where the session is kept between runs.
    #[arg(long, env = "TEXMAGE_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and log in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in to an existing account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the remaining credit balance.
    Credits,
    /// Generate an image from a prompt and save it as PNG.
    Generate {
        prompt: String,
        #[arg(long, short, default_value = "texmage.png")]
        out: PathBuf,
    },
    /// List the credit plans.
    Pricing,
    /// Print the version.
    Version,
}

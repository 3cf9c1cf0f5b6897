// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Parser;
use cli::{Cli, Commands};
use texmage_client::pricing::PLANS;
use texmage_client::{
    ApiClient, FileStorage, GenerateOutcome, NoticeLevel, Session, Timing,
};

mod cli;
mod logging;

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        if !matches!(e, Error::Reported) {
            log::error!("{}", e);
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Pricing => {
            print_plans();
            return Ok(());
        }
        _ => {}
    }

    let mut session = open_session(&args).await?;

    match &args.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let result = session.signup(name, email, password).await;
            finish(&mut session, result)?;
            print_balance(&session);
        }
        Commands::Login { email, password } => {
            let result = session.login(email, password).await;
            finish(&mut session, result)?;
            print_balance(&session);
        }
        Commands::Logout => {
            let result = session.logout().await;
            finish(&mut session, result)?;
        }
        Commands::Credits => {
            let Some(name) = session.user().map(|u| u.name.clone()) else {
                return Err(Error::Custom("Not logged in.".into()));
            };
            let credits = match session.credit() {
                Some(credits) => Some(credits),
                None => session.refresh_credits().await,
            };
            show_notices(&mut session);
            let Some(credits) = credits else {
                return Err(Error::Custom("Could not load credits. Login again".into()));
            };
            println!("Hi, {name}");
            println!("Credits left: {credits}");
        }
        Commands::Generate { prompt, out } => {
            let outcome = session.generate(prompt).await;
            show_notices(&mut session);
            match outcome {
                GenerateOutcome::Image {
                    data_uri,
                    credit_balance,
                } => {
                    save_image(&data_uri, out)?;
                    println!("Saved {} ({credit_balance} credits left)", out.display());
                }
                GenerateOutcome::LoginRequired => {
                    return Err(Error::Custom(
                        "Login required. Run `texmage login` first.".into(),
                    ));
                }
                GenerateOutcome::Failed { show_pricing, .. } => {
                    if show_pricing {
                        print_plans();
                    }
                    return Err(Error::Reported);
                }
            }
        }
        Commands::Version | Commands::Pricing => {}
    }

    Ok(())
}

async fn open_session(args: &Cli) -> Result<Session> {
    let backend_url = args
        .backend_url
        .as_deref()
        .ok_or_else(|| Error::Custom("TEXMAGE_BACKEND_URL is required".into()))?;
    let path = args
        .session_file
        .clone()
        .or_else(FileStorage::default_path)
        .ok_or_else(|| Error::Custom("No data directory; set TEXMAGE_SESSION_FILE".into()))?;

    log::debug!("session file: {}", path.display());
    let api = ApiClient::new(backend_url)?;
    Ok(Session::start(
        api,
        Box::new(FileStorage::new(path)),
        Timing::default(),
    )
    .await?)
}

/// Show queued notices and collapse a failed session call into
/// [`Error::Reported`].
fn finish<T>(
    session: &mut Session,
    result: core::result::Result<T, texmage_client::ClientError>,
) -> Result<T> {
    show_notices(session);
    result.map_err(|_| Error::Reported)
}

fn show_notices(session: &mut Session) {
    for notice in session.drain_notices() {
        match notice.level {
            NoticeLevel::Success => log::info!("{}", notice.message),
            NoticeLevel::Error => log::error!("{}", notice.message),
        }
    }
}

fn print_balance(session: &Session) {
    if let Some(credits) = session.credit() {
        println!("Credits left: {credits}");
    }
}

fn print_plans() {
    println!("Choose the plan that's right for you");
    for plan in PLANS {
        println!(
            "  {:<9} ${:<4} {:>5} credits  {}",
            plan.id, plan.price_usd, plan.credits, plan.description
        );
    }
}

fn save_image(data_uri: &str, out: &Path) -> Result<()> {
    let encoded = data_uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| Error::Custom("Server returned an unexpected image format".into()))?;
    let bytes = STANDARD.decode(encoded)?;
    std::fs::write(out, bytes)?;
    Ok(())
}

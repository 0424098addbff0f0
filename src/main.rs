use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;

use honeygain_autoclaim::cli::{Command, RootArgs};
use honeygain_autoclaim::config;
use honeygain_autoclaim::credentials::{CredentialProvider, EnvProvider, PromptProvider};
use honeygain_autoclaim::logging;
use honeygain_autoclaim::run::{is_credential_failure, is_login_lockout, run, RunOutcome};
use honeygain_autoclaim::update_check::check_upstream;
use honeygain_http_client::{HttpTransport, Session, TokenCache, TokenManager};

/// Exit status for refused credentials and login lockouts.
const CREDENTIAL_FAILURE_EXIT: i32 = -1;

fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    let args = RootArgs::parse();

    // Logging first: the local UTC offset can only be read while single-threaded.
    logging::init(&args.log_path).wrap_err("initialize logging")?;
    tracing::info!("Started HoneygainAutoClaim!");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build tokio runtime")?;

    match runtime.block_on(start(args)) {
        Ok(()) => {
            tracing::info!("Closing HoneygainAutoClaim!");
            Ok(())
        }
        Err(err) if is_credential_failure(&err) => {
            tracing::error!("{err:#}");
            if is_login_lockout(&err) {
                tracing::info!(
                    "Closing HoneygainAutoClaim! Too many login tries; wait a few hours and run again."
                );
            } else {
                tracing::info!("Closing HoneygainAutoClaim! Due to false login Credentials.");
            }
            std::process::exit(CREDENTIAL_FAILURE_EXIT);
        }
        Err(err) => {
            tracing::error!("{err:?}");
            std::process::exit(1);
        }
    }
}

async fn start(args: RootArgs) -> eyre::Result<()> {
    let mut provider: Box<dyn CredentialProvider> = if args.unattended {
        Box::new(EnvProvider::from_env())
    } else {
        Box::new(PromptProvider::stdio())
    };

    if args.command.unwrap_or(Command::Run) == Command::Setup {
        config::regenerate(&args.config_path, provider.as_mut()).wrap_err("regenerate config")?;
        tracing::info!("Config written to {}", args.config_path.display());
        return Ok(());
    }

    let app_config =
        config::load_or_create(&args.config_path, provider.as_mut()).wrap_err("load config")?;
    tracing::info!("Using {} authentication", app_config.user.mode());

    let transport = HttpTransport::new(Duration::from_secs(args.timeout_secs))
        .wrap_err("initialize http client")?;

    if args.unattended {
        if let Ok(repository) = std::env::var("GITHUB_REPOSITORY") {
            check_upstream(&transport, &repository).await;
        }
    }

    let tokens = TokenManager::new(
        app_config.user.clone(),
        TokenCache::new(args.token_path.clone()),
    );
    let mut session = Session::new(transport, app_config.urls.clone());

    if run(&mut session, &app_config.settings, &tokens).await? == RunOutcome::InsufficientTraffic {
        tracing::info!("Stopped early; the next scheduled run will retry the pot.");
    }
    Ok(())
}

use std::fmt;

use eyre::WrapErr;
use honeygain_http_client::{ClientError, Session, TokenManager, Transport};
use models::config::Settings;
use models::{BalanceCheck, PotClaim, PotWinning};

use crate::achievements::claim_achievements;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunError {
    /// The login endpoint refused the stored email and password.
    BadCredentials,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::BadCredentials => write!(f, "login credentials were rejected"),
        }
    }
}

impl std::error::Error for RunError {}

/// True for the failures that end the process with the credential exit code.
pub fn is_credential_failure(err: &eyre::Report) -> bool {
    is_login_lockout(err) || err.chain().any(|cause| cause.downcast_ref::<RunError>().is_some())
}

/// The login endpoint stopped answering with JSON; retrying now will not help.
pub fn is_login_lockout(err: &eyre::Report) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<ClientError>(),
            Some(ClientError::LoginLockedOut)
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// The pot claim was refused for lack of shared traffic; nothing after it ran.
    InsufficientTraffic,
}

/// One full pass: token, achievements, token probe, lucky pot, balance report.
pub async fn run<T: Transport>(
    session: &mut Session<T>,
    settings: &Settings,
    tokens: &TokenManager,
) -> eyre::Result<RunOutcome> {
    let token = tokens
        .get_token(session, false)
        .await
        .wrap_err("obtain token")?
        .ok_or(RunError::BadCredentials)?;
    session.set_token(token);

    if !claim_achievements(session, settings, tokens).await? {
        tracing::error!("Failed to claim achievements.");
    }

    let dashboard = session.balance().await.wrap_err("probe balance")?;
    if BalanceCheck::from_value(&dashboard) == BalanceCheck::Unauthorized {
        tracing::error!("Invalid token generating new one.");
        let token = tokens
            .get_token(session, true)
            .await
            .wrap_err("regenerate token")?
            .ok_or(RunError::BadCredentials)?;
        session.set_token(token);
    }

    let pot = PotWinning::from_value(&session.pot().await.wrap_err("fetch pot")?)?;
    if settings.lucky_pot && pot.is_unclaimed() {
        let claim = session.claim_pot().await.wrap_err("claim pot")?;
        match PotClaim::from_value(&claim)? {
            PotClaim::InsufficientTraffic => {
                tracing::error!(
                    "You don't have enough traffic shared yet to claim your reward. Please try again later."
                );
                return Ok(RunOutcome::InsufficientTraffic);
            }
            PotClaim::Claimed { credits } => tracing::info!("Claimed {credits} Credits."),
        }
    }

    let pot = PotWinning::from_value(&session.pot().await.wrap_err("refetch pot")?)?;
    match pot.winning_credits {
        Some(credits) => tracing::info!("Won today {credits} Credits."),
        None => tracing::info!("Lucky pot not claimed today."),
    }

    match BalanceCheck::from_value(&session.balance().await.wrap_err("fetch balance")?) {
        BalanceCheck::Balance { credits } => tracing::info!("You currently have {credits} Credits."),
        BalanceCheck::Unauthorized => tracing::error!("Balance request was not authorized."),
        BalanceCheck::Unrecognized(value) => {
            tracing::warn!("Unexpected balance response: {value}")
        }
    }

    Ok(RunOutcome::Completed)
}

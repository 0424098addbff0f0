use eyre::WrapErr;
use honeygain_http_client::{Session, TokenManager, Transport};
use models::config::Settings;
use models::AchievementsResponse;

use crate::run::RunError;

/// Claims every finished, unclaimed achievement.
///
/// Returns `Ok(true)` when the list was processed or the feature is switched
/// off. `Ok(false)` means the list could not be fetched; if the API rejected
/// the token, a fresh one is already installed on the session, but the claim
/// loop is not retried.
pub async fn claim_achievements<T: Transport>(
    session: &mut Session<T>,
    settings: &Settings,
    tokens: &TokenManager,
) -> eyre::Result<bool> {
    if !settings.achievements {
        tracing::debug!("Achievement claiming disabled");
        return Ok(true);
    }

    let value = session
        .achievements()
        .await
        .wrap_err("fetch achievements")?;

    let achievements = match AchievementsResponse::from_value(&value) {
        AchievementsResponse::List {
            achievements,
            skipped,
        } => {
            if skipped > 0 {
                tracing::warn!("Skipped {skipped} achievement(s) with an unexpected shape");
            }
            achievements
        }
        AchievementsResponse::Rejected { message } => {
            tracing::warn!("Achievements request rejected: {message}");
            let token = tokens
                .get_token(session, true)
                .await
                .wrap_err("regenerate token")?
                .ok_or(RunError::BadCredentials)?;
            session.set_token(token);
            return Ok(false);
        }
        AchievementsResponse::Malformed => {
            tracing::warn!("Unexpected achievements response: {value}");
            return Ok(false);
        }
    };

    for achievement in achievements.iter().filter(|a| a.is_claimable()) {
        let reply = session
            .claim_achievement(&achievement.id)
            .await
            .wrap_err_with(|| format!("claim achievement {}", achievement.id))?;
        if reply.is_success() {
            tracing::info!("Claimed {}.", achievement.title);
        } else {
            tracing::warn!(
                "Claiming {} returned HTTP {}: {}",
                achievement.title,
                reply.status,
                reply.body
            );
        }
    }

    Ok(true)
}

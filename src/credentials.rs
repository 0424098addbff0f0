use std::collections::HashMap;
use std::io::{BufRead, Write};

use eyre::WrapErr;
use models::config::UserAuth;

pub const ENV_IS_JWT: &str = "IsJWT";
pub const ENV_JWT_TOKEN: &str = "JWT_TOKEN";
pub const ENV_MAIL: &str = "MAIL";
pub const ENV_PASS: &str = "PASS";

/// Source of credentials when a fresh config has to be written.
pub trait CredentialProvider {
    fn credentials(&mut self) -> eyre::Result<UserAuth>;
}

/// Asks on a terminal (or any reader/writer pair).
#[derive(Debug)]
pub struct PromptProvider<R, W> {
    input: R,
    output: W,
}

impl PromptProvider<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> eyre::Result<String> {
        loop {
            write!(self.output, "{prompt}").wrap_err("write prompt")?;
            self.output.flush().wrap_err("flush prompt")?;

            let mut line = String::new();
            let read = self.input.read_line(&mut line).wrap_err("read input")?;
            if read == 0 {
                return Err(eyre::eyre!("input closed while waiting for: {}", prompt.trim()));
            }
            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
        }
    }
}

impl<R: BufRead, W: Write> CredentialProvider for PromptProvider<R, W> {
    fn credentials(&mut self) -> eyre::Result<UserAuth> {
        loop {
            tracing::info!("Please choose authentication method:");
            tracing::info!("1. Using Token");
            tracing::info!("2. Using Email and Password");

            match self.ask("Enter your choice (1 or 2): ")?.as_str() {
                "1" => {
                    let token = self.ask("Token: ")?;
                    return Ok(UserAuth::Token { token });
                }
                "2" => {
                    let email = self.ask("Email: ")?;
                    let password = self.ask("Password (input is visible): ")?;
                    return Ok(UserAuth::Password { email, password });
                }
                _ => tracing::error!("Wrong Input could not read it correctly. Try again!"),
            }
        }
    }
}

/// Unattended runs (CI, cron): `IsJWT=1` selects `JWT_TOKEN`, otherwise
/// `MAIL` and `PASS` are used.
#[derive(Debug, Clone, Default)]
pub struct EnvProvider {
    vars: HashMap<String, String>,
}

impl EnvProvider {
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn require(&self, key: &str) -> eyre::Result<String> {
        self.vars
            .get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .ok_or_else(|| eyre::eyre!("missing env var: {key}"))
    }
}

impl CredentialProvider for EnvProvider {
    fn credentials(&mut self) -> eyre::Result<UserAuth> {
        let token_mode = self.vars.get(ENV_IS_JWT).is_some_and(|v| v.trim() == "1");
        if token_mode {
            return Ok(UserAuth::Token {
                token: self.require(ENV_JWT_TOKEN)?,
            });
        }
        Ok(UserAuth::Password {
            email: self.require(ENV_MAIL)?,
            password: self.require(ENV_PASS)?,
        })
    }
}

use honeygain_autoclaim::config::{load_or_create, save};
use honeygain_autoclaim::credentials::{CredentialProvider, EnvProvider};
use models::config::{self, AppConfig, Settings, UserAuth};

struct Unreachable;

impl CredentialProvider for Unreachable {
    fn credentials(&mut self) -> eyre::Result<UserAuth> {
        panic!("a valid config must not trigger regeneration");
    }
}

fn env_password() -> EnvProvider {
    EnvProvider::from_vars([("MAIL", "me@example.com"), ("PASS", "pw")])
}

#[test]
fn missing_url_section_regenerates_all_endpoints() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("HoneygainConfig.toml");
    std::fs::write(
        &path,
        "[User]\nauth_mode = \"token\"\ntoken = \"abc\"\n\n[Settings]\nlucky_pot = false\nachievements = false\n",
    )?;

    let loaded = load_or_create(&path, &mut env_password())?;

    assert_eq!(loaded.urls.login, config::DEFAULT_LOGIN_URL);
    assert_eq!(loaded.urls.pot, config::DEFAULT_POT_URL);
    assert_eq!(loaded.urls.balance, config::DEFAULT_BALANCE_URL);
    assert_eq!(loaded.urls.achievements, config::DEFAULT_ACHIEVEMENTS_URL);
    assert_eq!(
        loaded.urls.achievement_claim,
        config::DEFAULT_ACHIEVEMENT_CLAIM_URL
    );
    assert_eq!(loaded.settings, Settings::default());
    assert_eq!(
        loaded.user,
        UserAuth::Password {
            email: "me@example.com".into(),
            password: "pw".into()
        }
    );

    let on_disk = AppConfig::from_toml_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(on_disk, loaded);
    Ok(())
}

#[test]
fn missing_file_and_folder_are_created() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Config").join("HoneygainConfig.toml");

    let mut env = EnvProvider::from_vars([("IsJWT", "1"), ("JWT_TOKEN", "jwt")]);
    let loaded = load_or_create(&path, &mut env)?;

    assert!(path.exists());
    assert_eq!(loaded.user, UserAuth::Token { token: "jwt".into() });
    Ok(())
}

#[test]
fn empty_or_garbage_file_is_regenerated() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("HoneygainConfig.toml");

    std::fs::write(&path, "")?;
    assert!(load_or_create(&path, &mut env_password()).is_ok());

    std::fs::write(&path, "[User\nthis is = not toml")?;
    let loaded = load_or_create(&path, &mut env_password())?;
    assert_eq!(loaded.urls.pot, config::DEFAULT_POT_URL);
    Ok(())
}

#[test]
fn valid_config_is_loaded_as_is() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("HoneygainConfig.toml");

    let mut expected = AppConfig::with_defaults(UserAuth::Token {
        token: "abc".into(),
    });
    expected.settings.lucky_pot = false;
    expected.urls.pot = "https://example.com/pot".into();
    save(&path, &expected)?;

    let loaded = load_or_create(&path, &mut Unreachable)?;
    assert_eq!(loaded, expected);
    Ok(())
}

#[test]
fn regeneration_fails_without_credentials() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("HoneygainConfig.toml");

    let mut empty_env = EnvProvider::from_vars(Vec::<(String, String)>::new());
    assert!(load_or_create(&path, &mut empty_env).is_err());
    assert!(!path.exists());
    Ok(())
}

pub mod achievements;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod run;
pub mod update_check;

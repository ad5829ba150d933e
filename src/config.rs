use std::path::PathBuf;

use clap::Parser;

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version = VERSION,
    about = "Task management REST service"
)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "TASKDECK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Path to the SQLite task store
    #[arg(long, env = "TASKDECK_DB", default_value = "taskdeck.db")]
    pub db: PathBuf,

    /// HS256 secret shared with the auth service that issues bearer tokens
    #[arg(long, env = "TASKDECK_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,
}

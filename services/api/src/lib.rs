mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use questlog_xp::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use fundability::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

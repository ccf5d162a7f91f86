mod advance;
mod cli;
mod infra;
mod routes;
mod server;

use rent_advance::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

mod cli;
mod infra;
mod routes;
mod server;

use kyc_aml::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

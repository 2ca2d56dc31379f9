use token_manager::app;
use token_manager::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    app::run().await
}

use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env when present.
    // A missing file is fine; an unreadable or malformed one is not.
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("loaded {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    ai_llm_service::telemetry::init("info")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "code-qa starting");

    api::start().await?;

    Ok(())
}

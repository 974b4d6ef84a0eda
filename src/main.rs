use canon_checker::config::AppConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    canon_checker::init_tracing();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e
    })?;

    canon_checker::run(config)
}

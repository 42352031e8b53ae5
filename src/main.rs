use daily_dashboard::config::{Settings, database};
use daily_dashboard::core::{card, report, today};
use daily_dashboard::errors::Result;
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load .env first so RUST_LOG and DATABASE_URL in it take effect
    let dotenv_loaded = dotenv().is_ok();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!(dotenv_loaded, "Starting dashboard.");

    // 3. Load settings (missing file means defaults)
    let settings = Settings::load_default()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Open the database and create any missing tables
    let database_url = database::get_database_url(settings.database_url.as_deref());
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Report running totals that no longer match their expenses
    for check in card::derived_card_debts(&db).await? {
        if check.has_drift() {
            warn!(
                card = %check.card_name,
                recorded = check.recorded,
                derived = check.derived,
                "Card debt does not match its expenses"
            );
        }
    }

    // 6. Render the dashboard for today
    let dashboard = report::load_dashboard(&db, today(), &settings).await?;
    print!("{dashboard}");

    Ok(())
}

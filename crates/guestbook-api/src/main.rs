use guestbook_api::setup;
use guestbook_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, storage, services, routes)
    let app = setup::initialize_app(config.clone()).await?;

    // Start the server; background tasks stop once it returns
    let result = setup::server::start_server(&config, app.router.clone()).await;
    app.shutdown();

    result
}

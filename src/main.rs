use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::warn;

use payment_alert_relay::{
    router, AlertComposer, AlertDispatcher, AppState, LogBuffer, OpenAiGenerator, RelayConfig,
    SmtpMailer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = Arc::new(RelayConfig::from_env());
    if !config.stripe_key_configured() {
        warn!("STRIPE_SECRET_KEY is not set; webhook events are still accepted");
    }
    if !config.alert_email_configured() {
        warn!("ALERT_EMAIL / ALERT_EMAIL_PASSWORD not set; alert delivery will fail");
    }

    let logs = LogBuffer::new();
    let generator = Arc::new(OpenAiGenerator::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone().unwrap_or_default(),
        config.openai_model.clone(),
    ));
    let mailer = Arc::new(SmtpMailer::from_config(&config)?);
    let dispatcher = Arc::new(AlertDispatcher::new(
        AlertComposer::new(generator, logs.clone()),
        mailer,
        config.operator_address(),
        logs.clone(),
    ));

    let state = AppState::new(config.clone(), logs, dispatcher);
    let app = router(state);

    let ip: std::net::IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((ip, config.port));
    println!("starting payment-alert-relay on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

use std::env;

/// Runtime configuration, sourced from the environment at startup.
///
/// Credentials are presence-checked only; an unset or empty variable simply
/// means the matching collaborator will fail at call time and the failure is
/// absorbed by the dispatch pipeline.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub stripe_secret_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub alert_email: Option<String>,
    pub alert_email_password: Option<String>,
    pub smtp_host: String,
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());

        Self {
            host,
            port,
            stripe_secret_key: non_empty("STRIPE_SECRET_KEY"),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_base_url,
            openai_model,
            alert_email: non_empty("ALERT_EMAIL"),
            alert_email_password: non_empty("ALERT_EMAIL_PASSWORD"),
            smtp_host,
        }
    }

    pub fn stripe_key_configured(&self) -> bool {
        self.stripe_secret_key.is_some()
    }

    pub fn openai_key_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn alert_email_configured(&self) -> bool {
        self.alert_email.is_some() && self.alert_email_password.is_some()
    }

    /// Operator address used as both sender and recipient of alert mail.
    pub fn operator_address(&self) -> String {
        self.alert_email.clone().unwrap_or_default()
    }
}

use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    /// Externally visible origin, e.g. `https://analyzer.example.com`. Used to
    /// build the OAuth `redirect_to` URL.
    pub public_url: String,
    pub log_level: String,
    pub api_url: String,
    pub api_timeout_secs: u64,
    pub idp_url: String,
    pub idp_anon_key: String,
    pub idp_oauth_provider: String,
    /// Allowed email domain without the leading `@`, e.g. `"edge-i.jp"`.
    pub allowed_domain: String,
    pub max_pages: Option<u32>,
}

impl AppConfig {
    /// Session cookies are marked `Secure` everywhere except local development.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.env != Environment::Development
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("public_url", &self.public_url)
            .field("log_level", &self.log_level)
            .field("api_url", &self.api_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("idp_url", &self.idp_url)
            .field("idp_anon_key", &"[redacted]")
            .field("idp_oauth_provider", &self.idp_oauth_provider)
            .field("allowed_domain", &self.allowed_domain)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

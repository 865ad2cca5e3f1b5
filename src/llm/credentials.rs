/// Supplies the API key for a completion provider.
pub trait CredentialProvider {
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from an environment variable (after `.env` has been loaded).
pub struct EnvCredentials {
    pub var: String,
}

impl EnvCredentials {
    pub fn new(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|k| !k.trim().is_empty())
    }
}

/// Fixed key, or none at all.
pub struct StaticCredentials(pub Option<String>);

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}

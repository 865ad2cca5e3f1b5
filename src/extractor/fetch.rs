use reqwest::Url;

use crate::error::{PipelineError, Result};

/// Retrieves the text body of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP GET via reqwest. `file://` URLs are read from disk so local
/// fixtures can be scraped without a server.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let fetch_err = |message: String| PipelineError::Fetch {
            url: url.to_string(),
            message,
        };

        let parsed = Url::parse(url).map_err(|e| fetch_err(e.to_string()))?;

        if parsed.scheme() == "file" {
            let path = parsed
                .to_file_path()
                .map_err(|_| fetch_err("not a local file path".to_string()))?;
            return std::fs::read_to_string(&path).map_err(|e| fetch_err(e.to_string()));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?
            .error_for_status()
            .map_err(|e| fetch_err(e.to_string()))?;

        response.text().map_err(|e| fetch_err(e.to_string()))
    }
}

/// Returns the same body for every URL.
pub struct StaticFetcher {
    pub body: String,
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, _url: &str) -> Result<String> {
        Ok(self.body.clone())
    }
}

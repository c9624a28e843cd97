/// Settings for the HTTP layer.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Attach a permissive CORS layer; the browser front end runs on a
    /// different origin in development.
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { enable_cors: true }
    }
}

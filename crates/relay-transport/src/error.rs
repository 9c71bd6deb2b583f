#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection to {0} failed: {1}")]
    Connect(String, std::io::Error),
}

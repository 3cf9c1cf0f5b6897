use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    /// The failure was already shown to the user as a notice.
    #[error("command failed")]
    Reported,

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("{}", .0)]
    Client(#[from] texmage_client::ClientError),

    #[error("Image decode failed: {}", .0)]
    Decode(#[from] base64::DecodeError),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),
}

use std::time::Duration;

use thiserror::Error;

pub type CounterResult<T> = Result<T, CounterError>;

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("invalid server address \"{addr}\": {reason}")]
    InvalidAddress { addr: String, reason: &'static str },
    #[error("failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: tonic::transport::Error,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("remote call failed: {0}")]
    RemoteCall(#[from] tonic::Status),
    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

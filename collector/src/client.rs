//! One-shot TCP client for ZooKeeper's four-letter-word admin commands.
//!
//! Every call opens a fresh connection, writes the command without any
//! framing and reads until the server closes the connection.

use crate::error::ScrapeError;
use std::{
    fmt,
    future::Future,
    io,
    pin::Pin,
    time::Duration,
};
use tokio::{
    io::{
        AsyncReadExt as _,
        AsyncWriteExt as _,
    },
    net::TcpStream,
    time::timeout,
};

/// The admin commands the exporter knows how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    Conf,
    Cons,
    Mntr,
    Ruok,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Conf => "conf",
            Command::Cons => "cons",
            Command::Mntr => "mntr",
            Command::Ruok => "ruok",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends a single command to the coordination service and returns the raw reply.
pub trait Backend: Send + Sync {
    fn send(&self, command: Command) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, ScrapeError>> + Send + '_>>;
}

#[derive(Debug, Clone)]
pub struct FourLetterClient {
    address: String,
    timeout: Duration,
}

impl FourLetterClient {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    async fn exchange(&self, command: Command) -> io::Result<Vec<u8>> {
        let mut stream = timeout(self.timeout, TcpStream::connect(self.address.as_str()))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connecting timed out"))??;

        stream.write_all(command.as_str().as_bytes()).await?;

        let mut reply = Vec::new();
        timeout(self.timeout, stream.read_to_end(&mut reply))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "reading the reply timed out"))??;

        Ok(reply)
    }
}

impl Backend for FourLetterClient {
    fn send(&self, command: Command) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, ScrapeError>> + Send + '_>> {
        Box::pin(async move {
            match self.exchange(command).await {
                Ok(reply) => {
                    debug!(address = %self.address, %command, bytes = reply.len(), "received reply");
                    Ok(reply)
                }
                Err(source) => {
                    warn!(address = %self.address, %command, error = %source, "four-letter command failed");
                    Err(ScrapeError::BackendUnreachable {
                        address: self.address.clone(),
                        command,
                        source,
                    })
                }
            }
        })
    }
}

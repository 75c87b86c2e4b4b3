use std::{fmt, future::Future, time::Duration};

use tokio::time::{self, Instant};
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info};

use crate::error::{CounterError, CounterResult};

#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct ServerAddr {
    host: String,
    port: u16,
}

impl ServerAddr {
    /// Accepts `host:port`, with IPv6 hosts written in brackets (`[::1]:3000`).
    pub fn parse(addr: &str) -> CounterResult<Self> {
        let invalid = |reason| CounterError::InvalidAddress {
            addr: addr.to_string(),
            reason,
        };

        let (host, port) = addr.rsplit_once(':').ok_or_else(|| invalid("missing port"))?;
        if host.is_empty() || host == "[]" {
            return Err(invalid("missing host"));
        }
        if host.starts_with('[') != host.ends_with(']') {
            return Err(invalid("unbalanced brackets around host"));
        }
        if !host.starts_with('[') && host.contains(':') {
            return Err(invalid("IPv6 hosts must be written in brackets"));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| invalid("port must be a number in 0..=65535"))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn http_addr(&self) -> String {
        format!("http://{}", self)
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A fixed point in time shared by every operation of one run.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    window: Duration,
}

impl Deadline {
    pub fn after(window: Duration) -> Self {
        Self {
            at: Instant::now() + window,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Drives `fut` until the deadline; once it has passed nothing is polled.
    pub async fn bound<F: Future>(&self, fut: F) -> CounterResult<F::Output> {
        if self.is_elapsed() {
            return Err(CounterError::Timeout(self.window));
        }
        time::timeout_at(self.at, fut)
            .await
            .map_err(|_| CounterError::Timeout(self.window))
    }
}

/// One open channel to one server. Dropping it releases the transport.
pub struct Connection {
    addr: ServerAddr,
    channel: Channel,
    deadline: Deadline,
}

impl Connection {
    pub async fn open(addr: ServerAddr, deadline: Deadline) -> CounterResult<Self> {
        let connect_err = |source| CounterError::Connection {
            addr: addr.to_string(),
            source,
        };

        let endpoint = Endpoint::from_shared(addr.http_addr()).map_err(connect_err)?;
        debug!("connecting to {}", endpoint.uri());
        let channel = deadline
            .bound(endpoint.connect())
            .await?
            .map_err(connect_err)?;

        info!("connected to {}", addr);
        Ok(Self {
            addr,
            channel,
            deadline,
        })
    }

    pub fn addr(&self) -> &ServerAddr {
        &self.addr
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        info!("released connection to {}", self.addr);
    }
}

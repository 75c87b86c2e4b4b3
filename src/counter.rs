pub mod maths {
    include!("protos/maths.v1.rs");
}

use tonic::{transport::Channel, Request, Status};
use tracing::trace;

use crate::{
    connection::{Connection, Deadline},
    error::{CounterError, CounterResult},
};

pub use maths::{
    counter_api_client::CounterApiClient,
    counter_api_server::{CounterApi, CounterApiServer},
    IncrementCounterRequest, IncrementCounterResponse,
};

/// The one remote operation the client needs: add `step`, get the new total.
#[tonic::async_trait]
pub trait CounterService: Send {
    async fn increment(&mut self, step: u64) -> Result<u64, Status>;
}

#[tonic::async_trait]
impl CounterService for CounterApiClient<Channel> {
    async fn increment(&mut self, step: u64) -> Result<u64, Status> {
        let request = Request::new(IncrementCounterRequest { step });
        let response = CounterApiClient::increment(self, request).await?;
        Ok(response.into_inner().value)
    }
}

pub struct CounterClient<S> {
    service: S,
    deadline: Option<Deadline>,
}

impl CounterClient<CounterApiClient<Channel>> {
    /// Builds the gRPC stub over `conn` and inherits its deadline.
    pub fn from_connection(conn: Option<&Connection>) -> CounterResult<Self> {
        let conn = conn.ok_or(CounterError::InvalidArgument("invalid gRPC connection"))?;
        let client = Self::new(Some(CounterApiClient::new(conn.channel())))?;
        Ok(client.with_deadline(conn.deadline()))
    }
}

impl<S: CounterService> CounterClient<S> {
    pub fn new(service: Option<S>) -> CounterResult<Self> {
        let service = service.ok_or(CounterError::InvalidArgument("missing counter service"))?;
        Ok(Self {
            service,
            deadline: None,
        })
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn into_service(self) -> S {
        self.service
    }

    pub async fn increment_counter(&mut self, step: u64) -> CounterResult<u64> {
        let call = self.service.increment(step);
        let value = match self.deadline {
            Some(deadline) => deadline.bound(call).await??,
            None => call.await?,
        };
        trace!("increment by {} -> {}", step, value);
        Ok(value)
    }
}

pub mod config;
pub mod connection;
pub mod counter;
pub mod driver;
pub mod error;

pub use config::ClientConfig;
pub use connection::{Connection, Deadline, ServerAddr};
pub use counter::{CounterClient, CounterService};
pub use driver::{invoke_counter, serve};
pub use error::{CounterError, CounterResult};

use std::io::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::{
    config::{ClientConfig, INCREMENT_STEP},
    connection::{Connection, Deadline, ServerAddr},
    counter::{CounterClient, CounterService},
    error::CounterResult,
};

pub fn format_line(at: DateTime<Utc>, value: u64) -> String {
    format!(
        "[{}] current value: {}",
        at.to_rfc3339_opts(SecondsFormat::Nanos, true),
        value
    )
}

/// Calls the counter `repeats` times, one request in flight at a time, and writes
/// one line per answer. Stops at the first failure. Returns the number of lines written.
pub async fn invoke_counter<S, W>(
    client: &mut CounterClient<S>,
    repeats: usize,
    out: &mut W,
) -> CounterResult<usize>
where
    S: CounterService,
    W: Write,
{
    for done in 0..repeats {
        let value = match client.increment_counter(INCREMENT_STEP).await {
            Ok(value) => value,
            Err(e) => {
                warn!("call {} of {} failed", done + 1, repeats);
                return Err(e);
            }
        };
        writeln!(out, "{}", format_line(Utc::now(), value))?;
    }
    out.flush()?;
    Ok(repeats)
}

pub async fn serve(config: &ClientConfig) -> CounterResult<()> {
    let addr = ServerAddr::parse(&config.server)?;
    let deadline = Deadline::after(config.timeout);

    // declared before the client so it is released last
    let conn = Connection::open(addr, deadline).await?;
    let mut client = CounterClient::from_connection(Some(&conn))?;

    let mut stdout = io::stdout();
    let printed = invoke_counter(&mut client, config.repeats, &mut stdout).await?;
    info!(
        "{} calls to {} finished with {:?} to spare",
        printed,
        conn.addr(),
        deadline.remaining()
    );
    Ok(())
}

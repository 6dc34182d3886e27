//! Snapshot aggregation
//!
//! A [`Snapshot`] is the overview plus the five object collections, fetched
//! concurrently. Either all six arrive and the caller gets a complete
//! snapshot, or the first failure is returned and the rest is thrown away.
//!
//! Outstanding fetches are aborted as soon as the result is known (first
//! error, deadline, or the `aggregate` future being dropped), so a slow
//! resource never outlives the call that asked for it.

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, instrument, trace, warn, Instrument};
use uuid::Uuid;

use super::{fetch, Resource, ResourceValue};
use crate::broker::client::BrokerClient;
use crate::broker::error::FetchError;
use crate::broker::models::{Binding, Connection, Consumer, Exchange, Overview, Queue};

type Pending = JoinSet<Result<ResourceValue, FetchError>>;

/// All monitored resources of a broker at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub overview: Overview,
    pub connections: Vec<Connection>,
    pub exchanges: Vec<Exchange>,
    pub queues: Vec<Queue>,
    pub consumers: Vec<Consumer>,
    pub bindings: Vec<Binding>,
}

/// Snapshot under construction, one slot per resource
#[derive(Debug, Default)]
struct PendingSnapshot {
    overview: Option<Overview>,
    connections: Option<Vec<Connection>>,
    exchanges: Option<Vec<Exchange>>,
    queues: Option<Vec<Queue>>,
    consumers: Option<Vec<Consumer>>,
    bindings: Option<Vec<Binding>>,
}

impl PendingSnapshot {
    fn merge(&mut self, value: ResourceValue) {
        match value {
            ResourceValue::Overview(v) => self.overview = Some(v),
            ResourceValue::Connections(v) => self.connections = Some(v),
            ResourceValue::Exchanges(v) => self.exchanges = Some(v),
            ResourceValue::Queues(v) => self.queues = Some(v),
            ResourceValue::Consumers(v) => self.consumers = Some(v),
            ResourceValue::Bindings(v) => self.bindings = Some(v),
        }
    }

    fn missing(&self) -> Vec<Resource> {
        let filled = [
            self.overview.is_some(),
            self.connections.is_some(),
            self.exchanges.is_some(),
            self.queues.is_some(),
            self.consumers.is_some(),
            self.bindings.is_some(),
        ];
        Resource::SNAPSHOT
            .into_iter()
            .zip(filled)
            .filter_map(|(resource, filled)| (!filled).then_some(resource))
            .collect()
    }

    /// Hand out the snapshot, only if every slot has been filled
    fn complete(self) -> Result<Snapshot, FetchError> {
        let missing = self.missing();
        match self {
            PendingSnapshot {
                overview: Some(overview),
                connections: Some(connections),
                exchanges: Some(exchanges),
                queues: Some(queues),
                consumers: Some(consumers),
                bindings: Some(bindings),
            } => Ok(Snapshot {
                overview,
                connections,
                exchanges,
                queues,
                consumers,
                bindings,
            }),
            _ => Err(FetchError::Task(format!(
                "fetches ended without result for {missing:?}"
            ))),
        }
    }
}

fn launch<T, F>(pending: &mut Pending, client: &BrokerClient, resource: Resource, wrap: F)
where
    T: DeserializeOwned + Send + 'static,
    F: FnOnce(T) -> ResourceValue + Send + 'static,
{
    let http = client.http().clone();
    let request = client.request::<T>(resource);
    pending.spawn(async move { fetch(&http, request).await.map(wrap) }.in_current_span());
}

/// Fetch all snapshot resources in parallel and merge them.
///
/// Returns the first error any fetch reports, or
/// [`FetchError::DeadlineExceeded`] when the client's snapshot deadline
/// elapses first. Never returns a partially filled snapshot.
#[instrument(skip_all, fields(snapshot_id = %Uuid::new_v4()))]
pub async fn aggregate(client: &BrokerClient) -> Result<Snapshot, FetchError> {
    let started = Instant::now();
    let mut pending = Pending::new();

    launch(&mut pending, client, Resource::Overview, ResourceValue::Overview);
    launch(&mut pending, client, Resource::Connections, ResourceValue::Connections);
    launch(&mut pending, client, Resource::Exchanges, ResourceValue::Exchanges);
    launch(&mut pending, client, Resource::Queues, ResourceValue::Queues);
    launch(&mut pending, client, Resource::Consumers, ResourceValue::Consumers);
    launch(&mut pending, client, Resource::Bindings, ResourceValue::Bindings);
    debug!("launched {} fetches", pending.len());

    let result = gather(pending, client.snapshot_deadline()).await;

    match &result {
        Ok(_) => debug!("snapshot complete in {:?}", started.elapsed()),
        Err(e) => warn!("snapshot failed after {:?}: {e}", started.elapsed()),
    }
    result
}

/// Drain completions in arrival order until the snapshot is complete, an
/// error shows up or the deadline passes. Whatever is still running then
/// is aborted.
async fn gather(mut pending: Pending, deadline: Option<Duration>) -> Result<Snapshot, FetchError> {
    let result = match deadline {
        Some(deadline) => tokio::time::timeout(deadline, merge_completions(&mut pending))
            .await
            .unwrap_or(Err(FetchError::DeadlineExceeded(deadline))),
        None => merge_completions(&mut pending).await,
    };

    if !pending.is_empty() {
        debug!("aborting {} outstanding fetches", pending.len());
        pending.abort_all();
    }

    result
}

async fn merge_completions(pending: &mut Pending) -> Result<Snapshot, FetchError> {
    let mut snapshot = PendingSnapshot::default();

    while let Some(joined) = pending.join_next().await {
        let value = joined??;
        trace!("{} arrived", value.resource());
        snapshot.merge(value);
    }

    snapshot.complete()
}

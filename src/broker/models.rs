//! Management API payloads
//!
//! Typed views of the JSON the broker returns for each resource. Only the
//! fields this crate reads are modelled; everything else is ignored. Fields
//! the broker may leave out decode to their default value.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Free-form `arguments` object of queues, exchanges and bindings
pub type Arguments = Map<String, Value>;

/// `*_details` sub-object carrying a rate per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rate {
    pub rate: f64,
}

/// Decode an object, treating `[]` and `null` as "no data".
///
/// Some broker versions send an empty array where an object is expected
/// (e.g. `channel_details` of consumers on a closed channel).
fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(D::Error::custom),
        Value::Array(_) | Value::Null => Ok(T::default()),
        other => Err(D::Error::custom(format!("expected object, got {other}"))),
    }
}

/// Ports are strings in some versions and numbers in others
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected string or number, got {other}"))),
    }
}

// =========================================================================
// /overview
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overview {
    pub management_version: String,
    pub rates_mode: String,
    pub exchange_types: Vec<ExchangeType>,
    pub rabbitmq_version: String,
    pub cluster_name: String,
    pub erlang_version: String,
    pub erlang_full_version: String,
    pub message_stats: OverviewMessageStats,
    pub queue_totals: QueueTotals,
    pub object_totals: ObjectTotals,
    pub statistics_db_event_queue: u64,
    pub node: String,
    pub listeners: Vec<Listener>,
    pub contexts: Vec<Context>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeType {
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewMessageStats {
    pub disk_reads: u64,
    pub disk_reads_details: Rate,
    pub disk_writes: u64,
    pub disk_writes_details: Rate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueTotals {
    pub messages: u64,
    pub messages_details: Rate,
    pub messages_ready: u64,
    pub messages_ready_details: Rate,
    pub messages_unacknowledged: u64,
    pub messages_unacknowledged_details: Rate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectTotals {
    pub consumers: u64,
    pub queues: u64,
    pub exchanges: u64,
    pub connections: u64,
    pub channels: u64,
}

/// `socket_opts` is left out: it is an object or an empty array depending
/// on the broker version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listener {
    pub node: String,
    pub protocol: String,
    pub ip_address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub node: String,
    pub description: String,
    pub path: String,
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    pub ssl: Option<Value>,
}

// =========================================================================
// /connections
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub name: String,
    pub node: String,
    pub vhost: String,
    pub user: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
    pub protocol: String,
    pub auth_mechanism: String,
    pub host: String,
    pub port: u16,
    pub peer_host: String,
    pub peer_port: u16,
    pub ssl: bool,
    pub ssl_protocol: Option<String>,
    pub ssl_cipher: Option<String>,
    pub ssl_hash: Option<String>,
    pub ssl_key_exchange: Option<String>,
    pub peer_cert_issuer: Option<String>,
    pub peer_cert_subject: Option<String>,
    pub peer_cert_validity: Option<String>,
    pub connected_at: i64,
    pub channels: u32,
    pub channel_max: u32,
    pub frame_max: u64,
    pub timeout: u64,
    pub client_properties: ClientProperties,
    pub recv_oct: u64,
    pub recv_oct_details: Rate,
    pub send_oct: u64,
    pub send_oct_details: Rate,
    pub recv_cnt: u64,
    pub send_cnt: u64,
    pub send_pend: u64,
    pub reductions: u64,
    pub reductions_details: Rate,
    pub garbage_collection: GarbageCollection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProperties {
    pub product: String,
    pub version: String,
    pub platform: String,
    pub connection_name: Option<String>,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    #[serde(rename = "connection.blocked")]
    pub connection_blocked: bool,
    pub consumer_cancel_notify: bool,
    pub publisher_confirms: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarbageCollection {
    pub minor_gcs: u64,
    pub fullsweep_after: u64,
    pub min_heap_size: u64,
    pub min_bin_vheap_size: u64,
    pub max_heap_size: u64,
}

// =========================================================================
// /channels
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub name: String,
    pub node: String,
    pub vhost: String,
    pub user: String,
    pub number: u32,
    pub state: String,
    #[serde(deserialize_with = "object_or_default")]
    pub connection_details: ConnectionDetails,
    #[serde(deserialize_with = "object_or_default")]
    pub message_stats: ChannelMessageStats,
    pub prefetch_count: u32,
    pub global_prefetch_count: u32,
    pub consumer_count: u32,
    pub messages_unacknowledged: u64,
    pub messages_unconfirmed: u64,
    pub messages_uncommitted: u64,
    pub acks_uncommitted: u64,
    pub confirm: bool,
    pub transactional: bool,
    pub reductions: u64,
    pub reductions_details: Rate,
    pub garbage_collection: GarbageCollection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionDetails {
    pub name: String,
    pub peer_host: String,
    pub peer_port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMessageStats {
    pub publish: u64,
    pub publish_details: Rate,
    pub confirm: u64,
    pub confirm_details: Rate,
    pub return_unroutable: u64,
    pub return_unroutable_details: Rate,
}

// =========================================================================
// /exchanges
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exchange {
    pub name: String,
    pub vhost: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub durable: bool,
    pub auto_delete: bool,
    pub internal: bool,
    pub arguments: Arguments,
    #[serde(deserialize_with = "object_or_default")]
    pub message_stats: ExchangeMessageStats,
}

impl Exchange {
    /// The nameless default exchange every queue is bound to
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeMessageStats {
    pub publish_in: u64,
    pub publish_in_details: Rate,
    pub publish_out: u64,
    pub publish_out_details: Rate,
}

// =========================================================================
// /queues
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queue {
    pub name: String,
    pub vhost: String,
    pub node: String,
    pub state: String,
    pub durable: bool,
    pub auto_delete: bool,
    pub exclusive: bool,
    pub arguments: Arguments,
    pub policy: Option<String>,
    pub consumers: u32,
    pub consumer_utilisation: Option<f64>,
    pub exclusive_consumer_tag: Option<String>,
    pub idle_since: Option<String>,
    pub memory: u64,
    pub messages: u64,
    pub messages_details: Rate,
    pub messages_ready: u64,
    pub messages_ready_details: Rate,
    pub messages_unacknowledged: u64,
    pub messages_unacknowledged_details: Rate,
    pub messages_ram: u64,
    pub messages_ready_ram: u64,
    pub messages_unacknowledged_ram: u64,
    pub messages_persistent: u64,
    pub messages_paged_out: u64,
    pub message_bytes: u64,
    pub message_bytes_ready: u64,
    pub message_bytes_unacknowledged: u64,
    pub message_bytes_ram: u64,
    pub message_bytes_persistent: u64,
    pub message_bytes_paged_out: u64,
    #[serde(deserialize_with = "object_or_default")]
    pub backing_queue_status: BackingQueueStatus,
    pub reductions: u64,
    pub reductions_details: Rate,
    pub garbage_collection: GarbageCollection,
}

/// `delta` and `target_ram_count` are left out: the latter is either a
/// number or the string "infinity".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackingQueueStatus {
    pub mode: String,
    pub q1: u64,
    pub q2: u64,
    pub q3: u64,
    pub q4: u64,
    pub len: u64,
    pub next_seq_id: u64,
    pub avg_ingress_rate: f64,
    pub avg_egress_rate: f64,
    pub avg_ack_ingress_rate: f64,
    pub avg_ack_egress_rate: f64,
}

// =========================================================================
// /consumers
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consumer {
    pub consumer_tag: String,
    pub prefetch_count: u32,
    pub ack_required: bool,
    pub exclusive: bool,
    pub active: Option<bool>,
    #[serde(deserialize_with = "object_or_default")]
    pub channel_details: ChannelDetails,
    pub queue: QueueRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelDetails {
    pub name: String,
    pub number: u32,
    pub node: String,
    pub user: String,
    pub connection_name: String,
    pub peer_host: String,
    pub peer_port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueRef {
    pub name: String,
    pub vhost: String,
}

// =========================================================================
// /bindings
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binding {
    pub source: String,
    pub vhost: String,
    pub destination: String,
    pub destination_type: String,
    pub routing_key: String,
    pub arguments: Arguments,
    pub properties_key: String,
}

impl Binding {
    pub fn targets_queue(&self) -> bool {
        self.destination_type == "queue"
    }
}

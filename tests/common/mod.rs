//! Shared fixtures: sample payloads as the management API returns them
//! and a mock broker serving them.

#![allow(dead_code)]

use std::time::Duration;

use rmqinfo::broker::http::TlsOptions;
use rmqinfo::broker::{BrokerClient, BrokerClientConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn overview_json() -> Value {
    json!({
        "management_version": "3.12.0",
        "rates_mode": "basic",
        "exchange_types": [
            {"name": "direct", "description": "AMQP direct exchange", "enabled": true},
            {"name": "topic", "description": "AMQP topic exchange", "enabled": true}
        ],
        "rabbitmq_version": "3.12.0",
        "cluster_name": "rabbit@broker-1",
        "erlang_version": "25.3",
        "erlang_full_version": "Erlang/OTP 25 [erts-13.2]",
        "message_stats": {"disk_reads": 4, "disk_reads_details": {"rate": 0.0}},
        "queue_totals": {
            "messages": 12, "messages_details": {"rate": 1.5},
            "messages_ready": 10, "messages_unacknowledged": 2
        },
        "object_totals": {
            "consumers": 1, "queues": 2, "exchanges": 8, "connections": 2, "channels": 2
        },
        "statistics_db_event_queue": 0,
        "node": "rabbit@broker-1",
        "listeners": [
            {"node": "rabbit@broker-1", "protocol": "amqp", "ip_address": "::", "port": 5672,
             "socket_opts": []}
        ],
        "contexts": [
            {"node": "rabbit@broker-1", "description": "RabbitMQ Management", "path": "/",
             "port": "15672"}
        ]
    })
}

pub fn connection_json(name: &str, user: &str) -> Value {
    json!({
        "name": name,
        "node": "rabbit@broker-1",
        "vhost": "/",
        "user": user,
        "type": "network",
        "state": "running",
        "protocol": "AMQP 0-9-1",
        "auth_mechanism": "PLAIN",
        "host": "127.0.0.1",
        "port": 5672,
        "peer_host": "127.0.0.1",
        "peer_port": 50312,
        "ssl": false,
        "ssl_protocol": null,
        "peer_cert_subject": null,
        "connected_at": 1700000000000i64,
        "channels": 1,
        "channel_max": 2047,
        "frame_max": 131072,
        "timeout": 60,
        "client_properties": {
            "product": "rmq-client",
            "version": "1.0",
            "capabilities": {"connection.blocked": true, "consumer_cancel_notify": true}
        },
        "recv_oct": 1024,
        "recv_oct_details": {"rate": 2.5},
        "send_oct": 2048,
        "send_oct_details": {"rate": 0.0}
    })
}

pub fn connections_json() -> Value {
    json!([
        connection_json("127.0.0.1:50312 -> 127.0.0.1:5672", "guest"),
        connection_json("127.0.0.1:50313 -> 127.0.0.1:5672", "orders")
    ])
}

pub fn exchanges_json() -> Value {
    json!([
        {"name": "", "vhost": "/", "type": "direct", "durable": true, "auto_delete": false,
         "internal": false, "arguments": {}},
        {"name": "orders", "vhost": "/", "type": "topic", "durable": true, "auto_delete": false,
         "internal": false, "arguments": {"alternate-exchange": "unrouted"},
         "message_stats": {"publish_in": 40, "publish_in_details": {"rate": 1.0},
                           "publish_out": 38, "publish_out_details": {"rate": 0.9}}}
    ])
}

pub fn queues_json() -> Value {
    json!([
        {"name": "order.created", "vhost": "/", "node": "rabbit@broker-1", "state": "running",
         "durable": true, "auto_delete": false, "exclusive": false,
         "arguments": {"x-queue-type": "classic"}, "policy": null,
         "consumers": 1, "messages": 12, "messages_ready": 10, "messages_unacknowledged": 2,
         "messages_details": {"rate": 0.5}, "idle_since": "2024-01-01 10:00:00",
         "backing_queue_status": {"mode": "default", "q1": 0, "len": 12,
                                  "target_ram_count": "infinity", "delta": ["delta", 0, 0, 0, 0]}},
        {"name": "audit", "vhost": "/", "durable": false, "auto_delete": true,
         "arguments": {}, "consumers": 0, "messages": 0}
    ])
}

pub fn consumers_json() -> Value {
    json!([
        {"consumer_tag": "amq.ctag-abc", "prefetch_count": 10, "ack_required": true,
         "exclusive": false, "arguments": {},
         "channel_details": {"name": "127.0.0.1:50312 -> 127.0.0.1:5672 (1)", "number": 1,
                             "node": "rabbit@broker-1", "user": "guest",
                             "connection_name": "127.0.0.1:50312 -> 127.0.0.1:5672",
                             "peer_host": "127.0.0.1", "peer_port": 50312},
         "queue": {"name": "order.created", "vhost": "/"}}
    ])
}

pub fn bindings_json() -> Value {
    json!([
        {"source": "", "vhost": "/", "destination": "order.created", "destination_type": "queue",
         "routing_key": "order.created", "arguments": {}, "properties_key": "order.created"},
        {"source": "orders", "vhost": "/", "destination": "order.created",
         "destination_type": "queue",
         "routing_key": "order.*", "arguments": {}, "properties_key": "order.*"}
    ])
}

pub fn channels_json() -> Value {
    json!([
        {"name": "127.0.0.1:50312 -> 127.0.0.1:5672 (1)", "node": "rabbit@broker-1", "vhost": "/",
         "user": "guest", "number": 1, "state": "running", "prefetch_count": 10,
         "connection_details": {"name": "127.0.0.1:50312 -> 127.0.0.1:5672",
                                "peer_host": "127.0.0.1", "peer_port": 50312},
         "message_stats": {"publish": 5, "publish_details": {"rate": 0.1}},
         "confirm": false, "transactional": false}
    ])
}

/// Sample body for every snapshot resource path
pub fn snapshot_fixtures() -> Vec<(&'static str, Value)> {
    vec![
        ("/api/overview", overview_json()),
        ("/api/connections", connections_json()),
        ("/api/exchanges", exchanges_json()),
        ("/api/queues", queues_json()),
        ("/api/consumers", consumers_json()),
        ("/api/bindings", bindings_json()),
    ]
}

/// Mount `200 OK` responses for all snapshot resources except `skip`
pub async fn mount_snapshot_except(server: &MockServer, skip: &[&str]) {
    for (resource_path, body) in snapshot_fixtures() {
        if skip.contains(&resource_path) {
            continue;
        }
        Mock::given(method("GET"))
            .and(path(resource_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

pub async fn mount_status(server: &MockServer, resource_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(resource_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Resource that answers far later than any test waits
pub async fn mount_hung(server: &MockServer, resource_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(resource_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(Duration::from_secs(30)),
        )
        .mount(server)
        .await;
}

pub fn client_for(server: &MockServer) -> BrokerClient {
    client_with_deadline(server, None)
}

pub fn client_with_deadline(server: &MockServer, deadline: Option<Duration>) -> BrokerClient {
    let config = BrokerClientConfig {
        api_uri: format!("{}/api", server.uri()),
        tls: TlsOptions {
            timeout: Duration::from_secs(60),
            ..Default::default()
        },
        snapshot_deadline: deadline,
    };
    BrokerClient::new(config).expect("client should build")
}

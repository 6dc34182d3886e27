//! Text rendering of a snapshot
//!
//! Prints the broker as a tree: vhost, exchanges, their bindings and the
//! queues they route to, with consumers under each queue.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use crate::broker::models::{Binding, Consumer, Exchange, Queue};
use crate::resource::Snapshot;

const DEFAULT_EXCHANGE: &str = "(default)";

fn exchange_label(exchange: &Exchange) -> String {
    let name = if exchange.is_default() {
        DEFAULT_EXCHANGE
    } else {
        exchange.name.as_str()
    };
    let mut flags = vec![exchange.kind.as_str()];
    if exchange.durable {
        flags.push("D");
    }
    if exchange.auto_delete {
        flags.push("AD");
    }
    if exchange.internal {
        flags.push("I");
    }
    format!("{name} ({})", flags.join(", "))
}

fn queue_label(queue: &Queue) -> String {
    format!(
        "{} (messages: {}, ready: {}, unacked: {}, consumers: {})",
        queue.name,
        queue.messages,
        queue.messages_ready,
        queue.messages_unacknowledged,
        queue.consumers
    )
}

fn consumer_label(consumer: &Consumer) -> String {
    let connection = &consumer.channel_details.connection_name;
    if connection.is_empty() {
        consumer.consumer_tag.clone()
    } else {
        format!("{} @ {}", consumer.consumer_tag, connection)
    }
}

/// Objects of one vhost, sorted by name
#[derive(Default)]
struct Vhost<'a> {
    exchanges: BTreeMap<&'a str, &'a Exchange>,
    queues: BTreeMap<&'a str, &'a Queue>,
    bindings: Vec<&'a Binding>,
    consumers: BTreeMap<&'a str, Vec<&'a Consumer>>,
}

fn group_by_vhost(snapshot: &Snapshot) -> BTreeMap<&str, Vhost<'_>> {
    let mut vhosts: BTreeMap<&str, Vhost> = BTreeMap::new();

    for exchange in &snapshot.exchanges {
        vhosts
            .entry(&exchange.vhost)
            .or_default()
            .exchanges
            .insert(&exchange.name, exchange);
    }
    for queue in &snapshot.queues {
        vhosts.entry(&queue.vhost).or_default().queues.insert(&queue.name, queue);
    }
    for binding in &snapshot.bindings {
        vhosts.entry(&binding.vhost).or_default().bindings.push(binding);
    }
    for consumer in &snapshot.consumers {
        vhosts
            .entry(&consumer.queue.vhost)
            .or_default()
            .consumers
            .entry(&consumer.queue.name)
            .or_default()
            .push(consumer);
    }

    for vhost in vhosts.values_mut() {
        vhost.bindings.sort_by(|a, b| {
            (&a.destination, &a.routing_key).cmp(&(&b.destination, &b.routing_key))
        });
    }
    vhosts
}

fn write_queue(out: &mut String, indent: &str, queue: &Queue, vhost: &Vhost) {
    let _ = writeln!(out, "{indent}{}", queue_label(queue));
    for consumer in vhost.consumers.get(queue.name.as_str()).into_iter().flatten() {
        let _ = writeln!(out, "{indent}    consumer {}", consumer_label(consumer));
    }
}

/// Render `snapshot` as an indented tree
pub fn render_text(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let overview = &snapshot.overview;
    let totals = &overview.queue_totals;

    let _ = writeln!(
        out,
        "RabbitMQ {} on {} (Erlang {}, management {})",
        overview.rabbitmq_version,
        overview.cluster_name,
        overview.erlang_version,
        overview.management_version
    );
    let _ = writeln!(
        out,
        "messages: {}, ready: {}, unacked: {}, connections: {}, consumers: {}",
        totals.messages,
        totals.messages_ready,
        totals.messages_unacknowledged,
        snapshot.connections.len(),
        snapshot.consumers.len()
    );

    for (name, vhost) in group_by_vhost(snapshot) {
        let _ = writeln!(out, "\nvhost {name}");
        let mut bound = BTreeSet::new();

        for exchange in vhost.exchanges.values() {
            let _ = writeln!(out, "  {}", exchange_label(exchange));
            for binding in vhost.bindings.iter().filter(|b| b.source == exchange.name) {
                let key = if binding.routing_key.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", binding.routing_key)
                };

                if !binding.targets_queue() {
                    let _ = writeln!(out, "    -> exchange {}{key}", binding.destination);
                    continue;
                }

                bound.insert(binding.destination.as_str());
                match vhost.queues.get(binding.destination.as_str()) {
                    Some(queue) => {
                        let _ = write!(out, "    ->{key} ");
                        write_queue(&mut out, "", queue, &vhost);
                    }
                    None => {
                        let _ = writeln!(out, "    ->{key} {} (missing)", binding.destination);
                    }
                }
            }
        }

        let unbound: Vec<_> = vhost
            .queues
            .values()
            .filter(|q| !bound.contains(q.name.as_str()))
            .collect();
        if !unbound.is_empty() {
            let _ = writeln!(out, "  unbound queues");
            for queue in unbound {
                write_queue(&mut out, "    ", queue, &vhost);
            }
        }
    }

    if !snapshot.connections.is_empty() {
        let _ = writeln!(out, "\nconnections");
        let mut connections: Vec<_> = snapshot.connections.iter().collect();
        connections.sort_by(|a, b| a.name.cmp(&b.name));
        for conn in connections {
            let _ = writeln!(
                out,
                "  {} (user: {}, vhost: {}, state: {}, channels: {})",
                conn.name, conn.user, conn.vhost, conn.state, conn.channels
            );
        }
    }

    out
}

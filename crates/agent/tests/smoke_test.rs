//! Smoke tests for the Nebula worker
//!
//! These tests drive the agent end-to-end: messages go in through a
//! delivery channel and come out as JSON lines on disk.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use nebula_agent::{ChannelDelivery, NebulaAgent};
use nebula_config::Config;
use nebula_message::{Message, Payload, Value};
use nebula_sink::{JsonDiskConfig, JsonDiskSink};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn agent_in(root: &Path) -> NebulaAgent {
    let config = JsonDiskConfig::default()
        .with_output_root(root)
        .with_run_id("43");
    NebulaAgent::new(JsonDiskSink::new(config).expect("failed to build sink"))
}

fn link_message(url: &str) -> Message {
    let mut payload = Payload::new();
    payload.insert("url".into(), Value::from(url));
    payload.insert("method".into(), Value::from("GET"));
    Message::new("v3.asset.link", payload)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("output file missing")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_agent_persists_delivered_message() {
    let tmp = TempDir::new().unwrap();
    let agent = agent_in(tmp.path());
    let (sender, delivery) = ChannelDelivery::channel(16);

    let handle = tokio::spawn(agent.run(delivery, CancellationToken::new()));

    sender.send(link_message("https://ostorlab.co")).await.unwrap();
    drop(sender);

    let snapshot = handle.await.unwrap();
    assert_eq!(snapshot.messages_written, 1);

    let lines = read_lines(
        &tmp.path()
            .join("scan_43_messages/v3.asset.link_messages.json"),
    );
    assert_eq!(
        lines,
        vec![r#"{"method":"GET","url":"https://ostorlab.co"}"#]
    );
}

#[tokio::test]
async fn test_agent_preserves_arrival_order() {
    let tmp = TempDir::new().unwrap();
    let agent = agent_in(tmp.path());
    let (sender, delivery) = ChannelDelivery::channel(16);

    let handle = tokio::spawn(agent.run(delivery, CancellationToken::new()));

    for i in 0..5 {
        sender
            .send(link_message(&format!("https://www.domain{i}.com")))
            .await
            .unwrap();
    }
    drop(sender);

    let snapshot = handle.await.unwrap();
    assert_eq!(snapshot.messages_written, 5);

    let lines = read_lines(
        &tmp.path()
            .join("scan_43_messages/v3.asset.link_messages.json"),
    );
    assert_eq!(lines.len(), 5);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.contains(&format!("https://www.domain{i}.com")));
    }
}

#[tokio::test]
async fn test_agent_routes_selectors_to_separate_files() {
    let tmp = TempDir::new().unwrap();
    let agent = agent_in(tmp.path());
    let (sender, delivery) = ChannelDelivery::channel(16);

    let handle = tokio::spawn(agent.run(delivery, CancellationToken::new()));

    sender.send(link_message("https://ostorlab.co")).await.unwrap();
    let mut payload = Payload::new();
    payload.insert("host".into(), Value::from("10.0.0.1"));
    sender.send(Message::new("v3.asset.ip", payload)).await.unwrap();
    drop(sender);

    handle.await.unwrap();

    let base = tmp.path().join("scan_43_messages");
    assert!(base.join("v3.asset.link_messages.json").is_file());
    assert!(base.join("v3.asset.ip_messages.json").is_file());
}

#[tokio::test]
async fn test_agent_skips_empty_payload_and_continues() {
    let tmp = TempDir::new().unwrap();
    let agent = agent_in(tmp.path());
    let (sender, delivery) = ChannelDelivery::channel(16);

    let handle = tokio::spawn(agent.run(delivery, CancellationToken::new()));

    sender
        .send(Message::without_data("v3.asset.link"))
        .await
        .unwrap();
    sender.send(link_message("https://ostorlab.co")).await.unwrap();
    drop(sender);

    let snapshot = handle.await.unwrap();
    assert_eq!(snapshot.messages_received, 2);
    assert_eq!(snapshot.empty_payloads, 1);
    assert_eq!(snapshot.messages_written, 1);
}

#[tokio::test]
async fn test_agent_survives_bad_payload() {
    let tmp = TempDir::new().unwrap();
    let agent = agent_in(tmp.path());
    let (sender, delivery) = ChannelDelivery::channel(16);

    let handle = tokio::spawn(agent.run(delivery, CancellationToken::new()));

    let mut bad = Payload::new();
    bad.insert("score".into(), Value::from(f64::NAN));
    sender.send(Message::new("v3.asset.link", bad)).await.unwrap();
    sender.send(link_message("https://ostorlab.co")).await.unwrap();
    drop(sender);

    let snapshot = handle.await.unwrap();
    assert_eq!(snapshot.write_errors, 1);
    assert_eq!(snapshot.messages_written, 1);

    let lines = read_lines(
        &tmp.path()
            .join("scan_43_messages/v3.asset.link_messages.json"),
    );
    assert_eq!(lines.len(), 1);
}

#[tokio::test]
async fn test_agent_stops_on_cancellation() {
    let tmp = TempDir::new().unwrap();
    let agent = agent_in(tmp.path());
    let (_sender, delivery) = ChannelDelivery::channel(16);

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(agent.run(delivery, shutdown.clone()));

    shutdown.cancel();

    let snapshot = handle.await.unwrap();
    assert_eq!(snapshot.messages_received, 0);
}

#[tokio::test]
async fn test_agent_from_config_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let toml = format!(
        "[agent]\noutput_root = \"{}\"\nrun_id = \"43\"",
        tmp.path().display()
    );
    let config = Config::from_str(&toml).unwrap();

    let agent = NebulaAgent::from_config(&config).unwrap();
    let (sender, delivery) = ChannelDelivery::channel(4);

    let handle = tokio::spawn(agent.run(delivery, CancellationToken::new()));
    sender.send(link_message("https://ostorlab.co")).await.unwrap();
    drop(sender);
    handle.await.unwrap();

    assert!(tmp
        .path()
        .join("scan_43_messages/v3.asset.link_messages.json")
        .is_file());
}

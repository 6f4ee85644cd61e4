//! Interactive bus peer
//!
//! Connects one application instance to the relay, prints whatever arrives
//! and reads commands from stdin.

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};

use communicator::AppSession;
use shared::logging::{Component, init_tracing, log_shutdown, log_startup};
use shared::{BusConfig, MessageType};

#[derive(Parser)]
#[command(name = "appconnect-peer")]
#[command(about = "Interactive AppConnect bus peer")]
struct Args {
    /// Application id announced to the relay
    #[arg(long)]
    app_id: String,

    /// Relay address (defaults to APPCONNECT_HUB_URL or ws://localhost:8080)
    #[arg(long)]
    url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Send { to: String, payload: Value },
    Broadcast(Value),
    Set { key: String, value: Value },
    Get(String),
    Delete(String),
    Clear,
    Status,
    Quit,
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "send" => {
            let (to, payload) = rest.split_once(' ').ok_or("usage: send <to> <json>")?;
            Ok(Command::Send {
                to: to.to_string(),
                payload: parse_json(payload.trim())?,
            })
        }
        "broadcast" => Ok(Command::Broadcast(parse_json(rest)?)),
        "set" => {
            let (key, value) = rest.split_once(' ').ok_or("usage: set <key> <json>")?;
            Ok(Command::Set {
                key: key.to_string(),
                value: parse_json(value.trim())?,
            })
        }
        "get" if !rest.is_empty() => Ok(Command::Get(rest.to_string())),
        "delete" if !rest.is_empty() => Ok(Command::Delete(rest.to_string())),
        "clear" => Ok(Command::Clear),
        "status" => Ok(Command::Status),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command '{other}'")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(Component::Peer, args.log_level.as_deref());

    let mut config = BusConfig::from_env().context("loading bus configuration")?;
    if let Some(url) = args.url {
        config = config.with_endpoint(url);
    }

    log_startup(Component::Peer, &format!("peer '{}' against {}", args.app_id, config.endpoint));

    let session = AppSession::with_websocket(args.app_id.as_str(), config);
    let _status = session
        .communicator()
        .on_status_change(|status| println!("[status] {status}"));
    let _inbound = session.communicator().on("*", |message| {
        println!(
            "[{}] {} -> {}: {}",
            message.kind, message.from, message.to, message.payload
        )
    });
    session.connect();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        let bus = session.communicator();
        let state = session.state();
        match command {
            Command::Send { to, payload } => bus.send_to(&to, payload, MessageType::Request),
            Command::Broadcast(payload) => bus.broadcast(payload),
            Command::Set { key, value } => state.set(&key, value),
            Command::Get(key) => match state.get(&key) {
                Some(value) => println!("{key} = {value}"),
                None => println!("{key} is not set"),
            },
            Command::Delete(key) => state.delete(&key),
            Command::Clear => state.clear(),
            Command::Status => println!(
                "status: {}, reconnect attempts: {}, keys: {:?}",
                bus.status(),
                bus.reconnect_attempts(),
                state.keys()
            ),
            Command::Quit => break,
        }
    }

    session.close();
    log_shutdown(Component::Peer, "stdin closed or quit requested");
    Ok(())
}

//! Status command implementation.
//!
//! The boot report: where the memory lives, what it holds, and whether the
//! browser can reach the network.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use sussyos_lib::web::check_connectivity;

use crate::output::{OutputFormat, format_bytes, print_info, print_json, print_stat, print_success, print_warning};
use crate::session::Session;

const PROBE_HOST: &str = "duckduckgo.com";
const PROBE_PORT: u16 = 80;
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Serialize)]
struct StatusReport {
  memory: String,
  memory_existed: bool,
  entries: usize,
  total_bytes: u64,
  online: Option<bool>,
  durability_risks: Vec<String>,
}

pub fn cmd_status(session: &Session, offline: bool, output: OutputFormat) -> Result<()> {
  let entries = session.store.entries()?;
  let online = (!offline).then(|| check_connectivity(PROBE_HOST, PROBE_PORT, PROBE_TIMEOUT));

  let report = StatusReport {
    memory: session.store.path().display().to_string(),
    memory_existed: session.memory_existed,
    entries: entries.len(),
    total_bytes: entries.iter().map(|e| e.size).sum(),
    online,
    durability_risks: session
      .store
      .durability_risks()
      .iter()
      .map(|r| r.to_string())
      .collect(),
  };

  if output.is_json() {
    return print_json(&report);
  }

  if report.memory_existed {
    print_success("Memory found");
  } else {
    print_info("No memory found, created an empty one");
  }

  match report.online {
    Some(true) => print_success("Connected to the internet"),
    Some(false) => print_warning("No internet connection, the browser won't work"),
    None => print_info("Connectivity check skipped"),
  }

  println!();
  print_stat("Memory", &report.memory);
  print_stat("Entries", &report.entries.to_string());
  print_stat("Size", &format_bytes(report.total_bytes));
  if !report.durability_risks.is_empty() {
    print_stat("Recovered writes", &report.durability_risks.len().to_string());
  }

  Ok(())
}

// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::Utc;
use k6_slack_notify::cli::{CliArgs, Command};
use k6_slack_notify::config::{self, Settings};
use k6_slack_notify::error::Result;
use k6_slack_notify::render::{RunEvent, RunEventKind};
use k6_slack_notify::transport::{DryRunTransport, SlackTransport, Transport};
use k6_slack_notify::{Notifier, ui};
use log::debug;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Token used when printing payloads without a real one
const DRY_RUN_TOKEN: &str = "dry-run";

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(2);
    }

    // Resolve settings: file, environment, then CLI
    let settings = match config::resolve(&args) {
        Ok(s) => s,
        Err(e) => {
            ui::print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = if args.dry_run {
        run::<DryRunTransport>(&args, settings)
    } else {
        run::<SlackTransport>(&args, settings)
    };

    if let Err(e) = result {
        ui::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Configure a notifier over transport `T` and execute the subcommand
fn run<T: Transport>(args: &CliArgs, settings: Settings) -> Result<()> {
    let token = match settings.token {
        Some(token) => token,
        None if args.dry_run => DRY_RUN_TOKEN.to_string(),
        None => String::new(),
    };
    let channel = settings.channel.unwrap_or_default();

    let mut notifier: Notifier<T> = Notifier::with_settings(settings.message);
    notifier.configure(&token, &channel, settings.user.as_deref())?;

    match &args.command {
        Command::Message { text } => {
            notifier.send_message(text)?;
            report_sent(args, "message");
        }
        Command::Results { file } => {
            let text = read_input(file)?;
            debug!("read {} bytes of result JSON from {}", text.len(), file.display());
            notifier.send_test_results_json(&text)?;
            report_sent(args, "test results");
        }
        Command::Start { event, window_start } => {
            let event = RunEvent {
                kind: RunEventKind::Start,
                name: event.clone(),
                window_start: window_start.unwrap_or_else(Utc::now),
            };
            notifier.send_run_event(&event)?;
            report_sent(args, "start notification");
        }
        Command::End { event, window_start } => {
            let event = RunEvent { kind: RunEventKind::End, name: event.clone(), window_start: *window_start };
            notifier.send_run_event(&event)?;
            report_sent(args, "end notification");
        }
    }

    Ok(())
}

/// Read a file, or stdin when the path is "-"
fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

fn report_sent(args: &CliArgs, what: &str) {
    if !args.dry_run {
        ui::status(&format!("sent {}", what));
    }
}

//! `avro-bridge` — decode schema-tagged event files to JSON documents.
//!
//! Usage:
//!   avro-bridge --schemas <dir> [--legacy-string-maps] <message-file>...
//!
//! Each file is one raw enveloped message. Successfully projected documents
//! go to stdout, one per line; failures go to stderr after the whole batch
//! has been attempted. Exit code 0 only for a clean batch.

use std::io::{self, Write};

use avro_bridge_core::{
    run_batch, BatchOutcome, DirRegistry, DocumentSink, ProjectOptions, SinkError,
};
use serde_json::Value as JsonValue;

/// Writes one compact JSON document per line.
struct LineSink {
    out: io::Stdout,
}

impl DocumentSink for LineSink {
    fn accept(&mut self, document: JsonValue) -> Result<(), SinkError> {
        let line =
            serde_json::to_string(&document).map_err(|e| SinkError(e.to_string()))?;
        writeln!(self.out, "{line}").map_err(|e| SinkError(e.to_string()))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut schema_dir: Option<String> = None;
    let mut options = ProjectOptions::default();
    let mut files: Vec<String> = Vec::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--schemas" => {
                i += 1;
                if let Some(dir) = args.get(i) {
                    schema_dir = Some(dir.clone());
                }
            }
            "--legacy-string-maps" => {
                options.legacy_string_maps = true;
            }
            other => files.push(other.to_string()),
        }
        i += 1;
    }

    let Some(schema_dir) = schema_dir else {
        eprintln!("usage: avro-bridge --schemas <dir> [--legacy-string-maps] <message-file>...");
        std::process::exit(2);
    };

    let registry = match DirRegistry::load(&schema_dir) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut messages: Vec<Vec<u8>> = Vec::with_capacity(files.len());
    for file in &files {
        match std::fs::read(file) {
            Ok(bytes) => messages.push(bytes),
            Err(e) => {
                eprintln!("{file}: {e}");
                std::process::exit(1);
            }
        }
    }

    let mut sink = LineSink { out: io::stdout() };
    let report = run_batch(
        messages.iter().map(Vec::as_slice),
        &registry,
        &mut sink,
        &options,
    );

    match report.outcome() {
        BatchOutcome::Clean => {}
        BatchOutcome::Failed(failure) => {
            eprintln!("message {} ({}): {}", failure.index, files[failure.index], failure.error);
            std::process::exit(1);
        }
        BatchOutcome::FailedMany(failures) => {
            for failure in &failures {
                eprintln!(
                    "message {} ({}): {}",
                    failure.index, files[failure.index], failure.error
                );
            }
            eprintln!("{} of {} messages failed", failures.len(), files.len());
            std::process::exit(1);
        }
    }
}

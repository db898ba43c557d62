mod cli;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;

use skysched_catalog::Catalog;
use skysched_compute::{NextOccurrence, Occurrence, VariantFilter};
use skysched_core::{load_dotenv, Config};
use skysched_query::{PatternStatus, QueryEngine};

use crate::cli::{CliArgs, Command};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let config = Config::from_env();
    let args = CliArgs::parse();

    let catalog = match catalog_path(args.catalog.clone(), &config) {
        Some(path) => Catalog::load(&path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin().context("built-in catalog failed validation")?,
    };
    let engine = QueryEngine::new(catalog).with_lookahead(config.lookahead_days);

    // The wall clock is read exactly once; everything below takes explicit
    // reference instants.
    let now = Utc::now();

    match &args.command {
        Command::List => print_list(&engine, args.json),
        Command::Status { pattern, at } => {
            let at = parse_instant(at.as_deref(), now)?;
            let status = engine.status_at(pattern, at)?;
            print_status(&status, args.json)
        }
        Command::Next {
            pattern,
            filter,
            from,
        } => {
            let filter = filter
                .as_deref()
                .map(|raw| raw.parse::<VariantFilter>().map_err(|e| anyhow!(e)))
                .transpose()?;
            let from = parse_instant(from.as_deref(), now)?;
            let next = engine.next_matching(pattern, filter, from)?;
            print_next(&next, args.json)
        }
    }
}

/// The `--catalog` flag wins over the environment-derived config path.
fn catalog_path(flag: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    flag.or_else(|| config.catalog_path.clone())
}

fn parse_instant(raw: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    match raw {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid RFC 3339 instant: '{}'", s))?
            .with_timezone(&Utc)),
        None => Ok(now),
    }
}

fn print_list(engine: &QueryEngine, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(engine.catalog())?);
        return Ok(());
    }
    for (id, pattern) in engine.catalog().iter() {
        println!(
            "{:<16} {:<16} {:<24} {}",
            id,
            pattern.name,
            pattern.recurrence.kind(),
            pattern.tz
        );
    }
    Ok(())
}

fn print_status(status: &PatternStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
        return Ok(());
    }

    println!("{} ({})", status.name, status.pattern_id);
    if let Some(variant) = &status.variant {
        let mut line = format!("  variant: {} [{}]", variant.label, variant.color);
        if let (Some(realm), Some(map)) = (&variant.realm, &variant.map) {
            line.push_str(&format!(", {} / {}", realm, map));
        }
        if let Some(reward) = variant.reward {
            line.push_str(&format!(", reward {} AC", reward));
        }
        println!("{}", line);
    }

    if status.occurrences.is_empty() {
        println!("  no occurrences today");
    }
    for (idx, occ) in status.occurrences.iter().enumerate() {
        let active = if status.active_index == Some(idx) {
            "  <- active"
        } else {
            ""
        };
        println!("  {}. {}{}", idx + 1, fmt_occurrence(occ), active);
    }

    match status.until_next_boundary {
        Some(until) => println!("  next boundary in {}", fmt_duration(until)),
        None => println!("  nothing within the lookahead window"),
    }
    Ok(())
}

fn print_next(next: &NextOccurrence, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(next)?);
        return Ok(());
    }

    match next {
        NextOccurrence::Found(found) => {
            if let Some(variant) = &found.variant {
                println!("variant: {} [{}]", variant.label, variant.color);
            }
            println!("{}", fmt_occurrence(&found.occurrence));
        }
        NextOccurrence::Exhausted { days_scanned } => {
            println!("no matching occurrence within {} days", days_scanned);
        }
    }
    Ok(())
}

fn fmt_occurrence(occ: &Occurrence) -> String {
    let mut parts = vec![format!("start {}", occ.start.format("%Y-%m-%d %H:%M:%S %Z"))];
    for marker in &occ.markers {
        parts.push(format!("land {}", marker.format("%H:%M:%S")));
    }
    parts.push(format!("end {}", occ.end.format("%H:%M:%S %Z")));
    parts.join(", ")
}

fn fmt_duration(d: Duration) -> String {
    let secs = d.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

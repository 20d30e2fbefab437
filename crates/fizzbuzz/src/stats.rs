use crate::prelude::{println, *};
use crate::service::StatisticsService;
use colored::Colorize;
use fizzbuzz_core::stats::{StatEntry, StatTable};

#[derive(Debug, clap::Args)]
#[command(about = "Show the most frequent request, or every recorded request")]
pub struct App {
    /// List every recorded request, most frequent first
    #[arg(long)]
    all: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let statistics = StatisticsService::open(global.stats_file.clone(), global.cache_ttl());

    let table = tokio::task::spawn_blocking(move || statistics.table())
        .await
        .map_err(Error::from)?
        .with_context(|| f!("Failed to read {}", global.stats_file.display()))?;

    if app.all {
        let entries = ranked(&table);
        if app.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if entries.is_empty() {
            println!("No requests recorded yet.");
        } else {
            print_table(&entries);
        }
        return Ok(());
    }

    match table.most_frequent() {
        Some(entry) if app.json => println!("{}", serde_json::to_string_pretty(entry)?),
        Some(entry) => print_table(&[entry]),
        None if app.json => println!("null"),
        None => println!("No requests recorded yet."),
    }

    Ok(())
}

/// Entries sorted by descending count; equal counts keep table order.
fn ranked(table: &StatTable) -> Vec<&StatEntry> {
    let mut entries: Vec<&StatEntry> = table.iter().map(|(_, entry)| entry).collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

fn print_table(entries: &[&StatEntry]) {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "Count".bold().cyan(),
        "int1".bold().cyan(),
        "int2".bold().cyan(),
        "limit".bold().cyan(),
        "str1".bold().cyan(),
        "str2".bold().cyan()
    ]);
    for entry in entries {
        let params = &entry.parameters;
        table.add_row(prettytable::row![
            entry.count.to_string().green(),
            params.int1,
            params.int2,
            params.limit,
            params.str1.bright_white(),
            params.str2.bright_white()
        ]);
    }
    table.printstd();
}

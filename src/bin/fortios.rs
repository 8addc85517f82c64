//! FortiOS CMDB CLI binary.
//!
//! A command-line interface for reading and changing FortiGate configuration.

use clap::Parser;
use fortios_cmdb::cli::{Cli, Command};
use fortios_cmdb::{
    entries_table, known_endpoints, CmdbResponse, FortiClient, PrettyPrint, RequestOptions,
};
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

/// `exists` found no entry.
const EXIT_MISSING: u8 = 1;
/// Configuration, transport or API failure.
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if matches!(cli.command, Command::Types) {
        print_types();
        return ExitCode::SUCCESS;
    }

    let client = match FortiClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set FORTIOS_HOST and FORTIOS_API_TOKEN environment variables");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match run(&client, &cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run(client: &FortiClient, cli: &Cli) -> fortios_cmdb::Result<ExitCode> {
    let mut options = RequestOptions::new();
    if let Some(vdom) = &cli.vdom {
        options = options.vdom(vdom.clone());
    }

    match &cli.command {
        Command::Get {
            path,
            key,
            filter,
            format,
            sort,
            start,
            count,
            all,
        } => {
            let endpoint = cli.endpoint(path)?;
            let mut query = options.to_query().format(format.iter().cloned());
            query.filter = filter.clone();
            query.sort = sort.clone();
            query.start = *start;
            query.count = *count;

            if *all {
                let entries = endpoint.list_all(client, &query).await?;
                output_entries(&entries, endpoint.mkey(), cli.json)?;
            } else {
                let response = endpoint.get(client, key.as_deref(), &query).await?;
                output_entries(&response.results_vec(), endpoint.mkey(), cli.json)?;
            }
        }
        Command::Create { path, body } => {
            let endpoint = cli.endpoint(path)?;
            let response = endpoint.post(client, &body.to_payload()?, &options).await?;
            output_response(&response, cli.json)?;
        }
        Command::Update { path, key, body } => {
            let endpoint = cli.endpoint(path)?;
            let response = endpoint
                .put(client, key, &body.to_payload()?, &options)
                .await?;
            output_response(&response, cli.json)?;
        }
        Command::Set { path, body } => {
            let endpoint = cli.endpoint(path)?;
            let response = endpoint.set(client, &body.to_payload()?, &options).await?;
            output_response(&response, cli.json)?;
        }
        Command::Delete { path, key } => {
            let endpoint = cli.endpoint(path)?;
            let response = endpoint.delete(client, key, &options).await?;
            output_response(&response, cli.json)?;
        }
        Command::Exists { path, key } => {
            let endpoint = cli.endpoint(path)?;
            let found = endpoint.try_exists(client, key, &options).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "exists": found }));
            } else {
                println!("{}", if found { "yes" } else { "no" });
            }
            if !found {
                return Ok(ExitCode::from(EXIT_MISSING));
            }
        }
        Command::Move {
            path,
            key,
            before,
            after,
        } => {
            let endpoint = cli.endpoint(path)?;
            let position = Command::move_position(before.clone(), after.clone())?;
            let response = endpoint
                .move_entry(client, key, &position, &options)
                .await?;
            output_response(&response, cli.json)?;
        }
        Command::Duplicate { path, key, new_key } => {
            let endpoint = cli.endpoint(path)?;
            let response = endpoint
                .clone_entry(client, key, new_key, &options)
                .await?;
            output_response(&response, cli.json)?;
        }
        Command::Schema { path } => {
            let schema = cli.endpoint(path)?.schema(client, &options).await?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Defaults { path } => {
            let defaults = cli.endpoint(path)?.defaults(client, &options).await?;
            println!("{}", serde_json::to_string_pretty(&defaults)?);
        }
        Command::Types => print_types(),
    }
    Ok(ExitCode::SUCCESS)
}

fn output_response(response: &CmdbResponse, json: bool) -> fortios_cmdb::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        println!("{}", response.pretty_print());
    }
    Ok(())
}

fn output_entries(
    entries: &[serde_json::Value],
    mkey: &str,
    json: bool,
) -> fortios_cmdb::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
    } else if entries.is_empty() {
        println!("(no entries)");
    } else {
        println!("{}", entries_table(entries, mkey));
        println!("\n{} entries", entries.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct TypeRow {
    path: String,
    mkey: String,
    #[tabled(rename = "table fields")]
    table_fields: String,
}

fn print_types() {
    let rows: Vec<TypeRow> = known_endpoints()
        .iter()
        .map(|e| TypeRow {
            path: e.path().to_string(),
            mkey: e.mkey().to_string(),
            table_fields: e
                .table_fields()
                .iter()
                .map(|t| t.field)
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    println!("{}", Table::new(rows));
}

//! Subcommand: `taskpilot run`, the interactive REPL.
//!
//! Each line is one turn through [`AutomationAgent::handle_request`].  Lines
//! starting with `:` are local commands for loading and saving spreadsheets.

use std::io::{self, BufRead, Write as _};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;

use taskpilot_agent::{AutomationAgent, SessionState};
use taskpilot_llm::LlmClient;
use taskpilot_table::{Table, to_csv, to_xlsx};

use crate::config::{AppConfig, resolve_llm_config};

/// Rows printed for a table before truncating.
const MAX_PRINTED_ROWS: usize = 20;

const HELP: &str = "\
  :load <file>   load a CSV/XLSX/XLS spreadsheet
  :save <file>   save the loaded spreadsheet (.csv or .xlsx)
  :clear         forget the loaded spreadsheet
  :history       show recent tasks
  quit           exit";

/// Run the interactive REPL.
pub async fn cmd_run(config: &AppConfig, seed: Option<u64>) -> Result<()> {
    let llm_config = resolve_llm_config(&config.llm)?;
    let provider = llm_config.provider;
    if llm_config.api_key.is_empty() {
        bail!(
            "no API key configured: set TASKPILOT_API_KEY or {}",
            provider.api_key_env()
        );
    }
    let model = llm_config.default_model.clone();
    let client = LlmClient::new(llm_config).context("failed to create LLM client")?;
    let agent = AutomationAgent::new(Arc::new(client));
    let mut session = seed.map_or_else(SessionState::new, SessionState::with_seed);
    info!(%provider, %model, "LLM client ready");

    println!();
    println!("  TaskPilot v{}", env!("CARGO_PKG_VERSION"));
    println!("  Provider: {provider}");
    println!("  Model: {model}");
    println!("  Describe a task, `:help` for commands, or 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut line_buf = String::new();

    loop {
        print!("> ");
        io::stdout().flush().ok();

        line_buf.clear();
        match stdin.lock().read_line(&mut line_buf) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("  Error reading input: {e}");
                continue;
            }
        }

        let trimmed = line_buf.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }

        if let Some(command) = trimmed.strip_prefix(':') {
            if let Err(e) = run_command(command, &mut session) {
                eprintln!("  {e:#}");
            }
            continue;
        }

        match agent.handle_request(trimmed, &mut session).await {
            Ok(outcome) => {
                println!();
                println!("  Task: {}", outcome.intent.task_kind);
                println!("  Action: {}", outcome.intent.description);
                println!();
                println!("{}", outcome.output.render());
                if let Some(table) = outcome.output.table() {
                    println!();
                    print!("{}", format_table(table, MAX_PRINTED_ROWS));
                }
                println!();
            }
            Err(e) => eprintln!("  Error: {e}"),
        }
    }

    info!("REPL finished");
    Ok(())
}

fn run_command(command: &str, session: &mut SessionState) -> Result<()> {
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "help" => println!("{HELP}"),
        "load" => {
            let path = Path::new(arg);
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| arg.to_owned());
            let loaded = session.load_upload(&filename, &bytes)?;
            println!(
                "  Loaded: {} ({} rows, {} columns)",
                loaded.filename,
                loaded.table.row_count(),
                loaded.table.column_count()
            );
            print!("{}", format_table(&loaded.table, 5));
        }
        "save" => {
            let Some(loaded) = session.uploaded() else {
                bail!("no spreadsheet loaded");
            };
            let bytes = export_bytes(&loaded.table, arg)?;
            std::fs::write(arg, bytes).with_context(|| format!("failed to write {arg}"))?;
            println!("  Saved {arg}");
        }
        "clear" => {
            if session.clear_upload() {
                println!("  Spreadsheet cleared");
            }
        }
        "history" => {
            let recent = session.recent_tasks(5);
            if recent.is_empty() {
                println!("  No tasks yet");
            }
            for entry in recent {
                println!("  ✔ {} at {}", entry.name, entry.time_label());
            }
        }
        other => bail!("unknown command `:{other}` (try :help)"),
    }
    Ok(())
}

/// Encode `table` for the file extension of `path`.
fn export_bytes(table: &Table, path: &str) -> Result<Vec<u8>> {
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("csv") => Ok(to_csv(table)?.into_bytes()),
        Some("xlsx") => Ok(to_xlsx(table)?),
        _ => bail!("save as .csv or .xlsx"),
    }
}

/// Render `table` as aligned plain text, at most `max_rows` rows.
pub fn format_table(table: &Table, max_rows: usize) -> String {
    let shown = table.head(max_rows);
    let cells: Vec<Vec<String>> = shown
        .rows()
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let mut out = line(table.columns().iter().map(String::as_str).collect());
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    if table.row_count() > max_rows {
        out.push_str(&format!("  ... {} more rows\n", table.row_count() - max_rows));
    }
    out
}

#[cfg(test)]
mod tests {
    use taskpilot_table::Cell;

    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["Name", "Score"]);
        table.push_row(vec![Cell::from("Ada"), Cell::Int(3)]).unwrap();
        table.push_row(vec![Cell::from("Grace"), Cell::Int(12)]).unwrap();
        table.push_row(vec![Cell::from("Linus"), Cell::Empty]).unwrap();
        table
    }

    #[test]
    fn aligns_columns() {
        let text = format_table(&sample(), 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  Name   Score");
        assert_eq!(lines[1], "  Ada    3");
        assert_eq!(lines[2], "  Grace  12");
        assert_eq!(lines[3], "  Linus");
    }

    #[test]
    fn truncates_long_tables() {
        let text = format_table(&sample(), 1);
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with("... 2 more rows\n"));
    }

    #[test]
    fn export_by_extension() {
        let table = sample();
        let csv = export_bytes(&table, "out.CSV").unwrap();
        assert!(csv.starts_with(b"Name,Score"));
        let xlsx = export_bytes(&table, "out.xlsx").unwrap();
        assert_eq!(&xlsx[..2], b"PK");
        assert!(export_bytes(&table, "out.txt").is_err());
    }

    #[test]
    fn load_and_history_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let mut session = SessionState::with_seed(1);
        run_command(&format!("load {}", path.display()), &mut session).unwrap();
        assert_eq!(session.uploaded().unwrap().filename, "team.csv");

        let out = dir.path().join("copy.csv");
        run_command(&format!("save {}", out.display()), &mut session).unwrap();
        assert!(std::fs::read_to_string(&out).unwrap().starts_with("a,b"));

        run_command("clear", &mut session).unwrap();
        assert!(session.uploaded().is_none());
        assert!(run_command("save x.csv", &mut session).is_err());
        assert!(run_command("bogus", &mut session).is_err());
    }
}

//! Interactive session over stdin.

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::config::DisplayConfig;
use crate::pipeline::{describe, Pipeline};
use crate::report::one_line;
use crate::session::Session;

const HELP: &str = "\
Commands:
  lookup <HGVS>             fetch and assess a variant
  set <threshold> <value>   change a cutoff and re-assess the current variant
  show                      print the current report and thresholds
  bookmark [note]           bookmark the current variant
  bookmarks                 list bookmarks
  export md|json <path>     write the current report as Markdown or raw JSON
  help                      this text
  quit                      leave the session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Lookup(String),
    Set { name: String, value: String },
    Show,
    Bookmark(Option<String>),
    Bookmarks,
    Export { format: ExportFormat, path: PathBuf },
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((v, r)) => (v, r.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => ReplCommand::Empty,
        "lookup" | "l" if !rest.is_empty() => ReplCommand::Lookup(rest.to_string()),
        "lookup" | "l" => ReplCommand::Invalid("usage: lookup <HGVS>".into()),
        "set" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(value), None) => ReplCommand::Set {
                    name: name.to_string(),
                    value: value.to_string(),
                },
                _ => ReplCommand::Invalid("usage: set <threshold> <value>".into()),
            }
        }
        "show" => ReplCommand::Show,
        "bookmark" => ReplCommand::Bookmark((!rest.is_empty()).then(|| rest.to_string())),
        "bookmarks" => ReplCommand::Bookmarks,
        "export" => {
            let (fmt, path) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let format = match fmt.to_ascii_lowercase().as_str() {
                "md" | "markdown" => Some(ExportFormat::Markdown),
                "json" => Some(ExportFormat::Json),
                _ => None,
            };
            match format {
                Some(format) if !path.trim().is_empty() => ReplCommand::Export {
                    format,
                    path: PathBuf::from(path.trim()),
                },
                _ => ReplCommand::Invalid("usage: export md|json <path>".into()),
            }
        }
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => ReplCommand::Invalid(format!("unknown command '{}', try 'help'", other)),
    }
}

pub async fn run(pipeline: &Pipeline, display: &DisplayConfig, mut session: Session) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(b"MutantScope interactive session. Type 'help' for commands.\n").await?;
    loop {
        stdout.write_all(b"mutantscope> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else { break };
        let output = match parse_command(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Empty => continue,
            command => execute(command, pipeline, display, &mut session).await,
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    info!(bookmarks = session.bookmarks().len(), "Session ended");
    Ok(())
}

/// Run one command against the session and return what to print.
async fn execute(
    command: ReplCommand,
    pipeline: &Pipeline,
    display: &DisplayConfig,
    session: &mut Session,
) -> String {
    match command {
        ReplCommand::Lookup(hgvs) => {
            match pipeline.lookup(&hgvs, &session.thresholds, true).await {
                Ok(report) => {
                    let text = report.render_text(display);
                    session.set_report(report);
                    text
                }
                Err(e) => {
                    if e.is_recoverable() {
                        info!(%hgvs, error = %e, "Lookup returned nothing usable");
                    } else {
                        warn!(%hgvs, error = %e, "Lookup failed");
                    }
                    format!("error: {}", describe(&e))
                }
            }
        }
        ReplCommand::Set { name, value } => match session.set_threshold(&name, &value) {
            Ok(()) => match session.last_report() {
                Some(report) => format!("{} = {}\n{}", name, value, one_line(report)),
                None => format!("{} = {}", name, value),
            },
            Err(e) => format!("error: {}", e),
        },
        ReplCommand::Show => {
            let thresholds: Vec<String> = session
                .thresholds
                .entries()
                .iter()
                .map(|(name, value)| format!("  {:<18} {}", name, value))
                .collect();
            let report = session
                .last_report()
                .map(|r| r.render_text(display))
                .unwrap_or_else(|| "No variant loaded.".to_string());
            format!("{}\nThresholds:\n{}", report, thresholds.join("\n"))
        }
        ReplCommand::Bookmark(note) => match session.bookmark(note) {
            Ok(b) => format!("Bookmarked {} ({})", b.key, b.label),
            Err(e) => format!("error: {}", e),
        },
        ReplCommand::Bookmarks => {
            let marks = session.bookmarks();
            if marks.is_empty() {
                return "No bookmarks.".to_string();
            }
            marks
                .iter()
                .map(|b| {
                    format!(
                        "{:<32} {:<8} {:<24} {} {}",
                        b.key,
                        b.gene.as_deref().unwrap_or("-"),
                        b.label,
                        b.saved_at.format("%Y-%m-%d %H:%M"),
                        b.note.as_deref().unwrap_or("")
                    )
                    .trim_end()
                    .to_string()
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        ReplCommand::Export { format, path } => match export(session, display, format, &path).await {
            Ok(()) => format!("Wrote {}", path.display()),
            Err(e) => format!("error: {:#}", e),
        },
        ReplCommand::Help => HELP.to_string(),
        ReplCommand::Invalid(msg) => msg,
        ReplCommand::Quit | ReplCommand::Empty => String::new(),
    }
}

async fn export(
    session: &Session,
    display: &DisplayConfig,
    format: ExportFormat,
    path: &std::path::Path,
) -> anyhow::Result<()> {
    let report = session
        .last_report()
        .context("Nothing to export; look up a variant first")?;
    let body = match format {
        ExportFormat::Markdown => report.render_markdown(display),
        ExportFormat::Json => report.raw_json()?,
    };
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_and_set() {
        assert_eq!(
            parse_command("  lookup 17:g.7675088C>T "),
            ReplCommand::Lookup("17:g.7675088C>T".into())
        );
        assert_eq!(
            parse_command("set cadd_cutoff 25"),
            ReplCommand::Set { name: "cadd_cutoff".into(), value: "25".into() }
        );
        assert!(matches!(parse_command("lookup"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command("set cadd_cutoff"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_bookmark_note_keeps_spaces() {
        assert_eq!(parse_command("bookmark"), ReplCommand::Bookmark(None));
        assert_eq!(
            parse_command("bookmark check segregation data"),
            ReplCommand::Bookmark(Some("check segregation data".into()))
        );
        assert_eq!(parse_command("bookmarks"), ReplCommand::Bookmarks);
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(
            parse_command("export md out/report.md"),
            ReplCommand::Export { format: ExportFormat::Markdown, path: "out/report.md".into() }
        );
        assert_eq!(
            parse_command("EXPORT json raw.json"),
            ReplCommand::Export { format: ExportFormat::Json, path: "raw.json".into() }
        );
        assert!(matches!(parse_command("export pdf x.pdf"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command("export md"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command(""), ReplCommand::Empty);
        assert_eq!(parse_command("quit"), ReplCommand::Quit);
        assert_eq!(parse_command("exit"), ReplCommand::Quit);
        assert_eq!(parse_command("help"), ReplCommand::Help);
        assert_eq!(parse_command("show"), ReplCommand::Show);
        assert!(matches!(parse_command("frobnicate"), ReplCommand::Invalid(_)));
    }

    #[tokio::test]
    async fn test_export_without_report_fails() {
        let session = Session::default();
        let err = export(&session, &DisplayConfig::default(), ExportFormat::Json, std::path::Path::new("x.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Nothing to export"));
    }
}

//! Interactive session loop
//!
//! Drives the search coordinator and result browser from a line-oriented
//! command stream. Generic over the input reader and output writer so tests
//! can script a whole session against byte buffers.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use crate::browser::ResultBrowser;
use crate::errors::{AppError, AppResult};
use crate::render::Renderer;
use crate::search::SearchCoordinator;
use crate::source::RemoteSource;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `search <query> [limit]`
    Search {
        /// Search text forwarded to the coordinator
        query: String,
        /// Optional fetch limit; the session default applies when absent
        limit: Option<usize>,
    },
    /// Advance one result page
    Next,
    /// Go back one result page
    Prev,
    /// `show <n>`; the argument is kept raw so bad input can be reported
    Show(String),
    /// Leave the browse loop
    Back,
    /// Print command help
    Help,
    /// End the session
    Quit,
    /// Blank line
    Empty,
    /// Anything unrecognized, kept for the error report
    Unknown(String),
}

/// Parse one input line into a [`Command`]
///
/// A trailing integer after a multi-token `search` is taken as the fetch
/// limit; everything before it is the query.
pub fn parse_command(line: &str) -> Command {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Command::Empty;
    };
    let args: Vec<&str> = tokens.collect();

    match head.to_ascii_lowercase().as_str() {
        "search" => {
            let (query_tokens, limit) = match args.split_last() {
                Some((last, rest)) if !rest.is_empty() => match last.parse::<usize>() {
                    Ok(limit) => (rest, Some(limit)),
                    Err(_) => (args.as_slice(), None),
                },
                _ => (args.as_slice(), None),
            };
            Command::Search {
                query: query_tokens.join(" "),
                limit,
            }
        }
        "next" => Command::Next,
        "prev" => Command::Prev,
        "show" => Command::Show(args.join(" ")),
        "back" => Command::Back,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_owned()),
    }
}

/// Why the browse loop ended
enum BrowseExit {
    /// `back` returns to the main prompt
    Back,
    /// `quit` or exhausted input ends the whole session
    Session,
}

/// Run the interactive session until `quit` or exhausted input
///
/// # Errors
///
/// Returns `Internal` only when the output writer fails; every user-facing
/// problem (bad input, empty results, render failure) is reported in-band
/// and the loop continues.
pub async fn run_session<S, P, R, W>(
    coordinator: &mut SearchCoordinator<S>,
    renderer: &P,
    default_limit: usize,
    reader: R,
    writer: &mut W,
) -> AppResult<()>
where
    S: RemoteSource,
    P: Renderer,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    write_line(writer, "Type 'help' for available commands.")?;

    loop {
        prompt(writer, "main> ")?;
        let Some(line) = next_line(&mut lines).await? else {
            break;
        };

        match parse_command(&line) {
            Command::Empty => {}
            Command::Help => write_main_help(writer)?,
            Command::Quit => break,
            Command::Search { query, limit } => {
                if query.is_empty() {
                    write_line(writer, "Error: search needs a query")?;
                    continue;
                }
                let limit = limit.unwrap_or(default_limit);
                match coordinator.search(&query, limit).await {
                    Ok(found) => {
                        let browser = ResultBrowser::new(found);
                        if browser.is_empty() {
                            write_line(writer, "No messages found.")?;
                        } else if let BrowseExit::Session =
                            browse(browser, renderer, &mut lines, writer).await?
                        {
                            break;
                        }
                    }
                    Err(e) => write_line(writer, &format!("Error: {e}"))?,
                }
            }
            Command::Unknown(cmd) => {
                write_line(writer, &format!("Error: unknown command <{cmd}>"))?;
            }
            // browse-only commands are meaningless at the main prompt
            Command::Next | Command::Prev | Command::Show(_) | Command::Back => {
                write_line(writer, "Error: no result list is open; run a search first")?;
            }
        }
    }

    info!("session ended");
    Ok(())
}

/// Browse one result list until `back`, `quit`, or exhausted input
async fn browse<P, R, W>(
    mut browser: ResultBrowser,
    renderer: &P,
    lines: &mut tokio::io::Lines<R>,
    writer: &mut W,
) -> AppResult<BrowseExit>
where
    P: Renderer,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        print_page(writer, &browser)?;
        prompt(writer, "inbox> ")?;
        let Some(line) = next_line(lines).await? else {
            return Ok(BrowseExit::Session);
        };

        match parse_command(&line) {
            Command::Empty => {}
            Command::Next => {
                if !browser.next() {
                    write_line(writer, "No more pages.")?;
                }
            }
            Command::Prev => {
                if !browser.prev() {
                    write_line(writer, "Already on the first page.")?;
                }
            }
            Command::Show(arg) => match arg.parse::<usize>() {
                Ok(index) => match browser.select(index) {
                    Ok(message) => {
                        if let Err(e) = renderer.render(message) {
                            write_line(writer, &format!("Warning: {e}"))?;
                        }
                    }
                    Err(e) => write_line(writer, &format!("Error: {e}"))?,
                },
                Err(_) => write_line(writer, &format!("Error: '{arg}' is not a valid index"))?,
            },
            Command::Back => return Ok(BrowseExit::Back),
            Command::Help => write_browse_help(writer)?,
            Command::Quit => return Ok(BrowseExit::Session),
            Command::Search { .. } => {
                write_line(writer, "Error: finish browsing with 'back' before searching again")?;
            }
            Command::Unknown(cmd) => {
                write_line(writer, &format!("Error: unknown command <{cmd}>"))?;
            }
        }
    }
}

/// Print the current page with absolute 1-based numbering
fn print_page<W: Write>(writer: &mut W, browser: &ResultBrowser) -> AppResult<()> {
    write_line(
        writer,
        &format!(
            "Page {}/{} ({} message(s))",
            browser.page() + 1,
            browser.page_count(),
            browser.len()
        ),
    )?;
    for (offset, message) in browser.current_page().iter().enumerate() {
        write_line(
            writer,
            &format!("{} - {}", browser.page_start() + offset + 1, message.summary_line()),
        )?;
    }
    Ok(())
}

async fn next_line<R: AsyncBufRead + Unpin>(
    lines: &mut tokio::io::Lines<R>,
) -> AppResult<Option<String>> {
    lines
        .next_line()
        .await
        .map_err(|e| AppError::Internal(format!("input read failed: {e}")))
}

fn prompt<W: Write>(writer: &mut W, text: &str) -> AppResult<()> {
    write!(writer, "{text}")
        .and_then(|()| writer.flush())
        .map_err(|e| AppError::Internal(format!("output write failed: {e}")))
}

fn write_line<W: Write>(writer: &mut W, line: &str) -> AppResult<()> {
    writeln!(writer, "{line}").map_err(|e| AppError::Internal(format!("output write failed: {e}")))
}

fn write_main_help<W: Write>(writer: &mut W) -> AppResult<()> {
    write_line(
        writer,
        "Commands: search <query> [limit] | help | quit",
    )
}

fn write_browse_help<W: Write>(writer: &mut W) -> AppResult<()> {
    write_line(
        writer,
        "Commands: next | prev | show <n> | back | help | quit",
    )
}

use crate::{
    app::Journal,
    models::trade::TradeId,
    utils::error::{JournalError, JournalResult},
    views::{
        form::{FormField, FormState},
        router::{Screen, View},
    },
};
use anyhow::Result;
use log::error;
use std::{io::Write, path::Path};
use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

const HELP: &str = "\
Commands:
  dashboard        show statistics and trades
  add              add a new trade
  edit <id>        edit a trade (id or a unique prefix of it)
  delete <id>      delete a trade after confirmation
  logs             show the activity log
  export <path>    write all trades to a CSV file
  help             show this help
  quit             leave the journal
In the form, press enter to keep a value, '-' to clear an optional one and
'cancel' to go back to the dashboard.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Navigate(View),
    Add,
    Edit(String),
    Delete(String),
    Export(String),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Command> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::to_string);

        let command = match (name.as_str(), arg) {
            ("add", _) => Command::Add,
            ("edit", Some(id)) => Command::Edit(id),
            ("delete", Some(id)) => Command::Delete(id),
            ("export", Some(path)) => Command::Export(path),
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,
            (other, _) => match View::from_target(other, None) {
                Some(view) => Command::Navigate(view),
                None => Command::Unknown(other.to_string()),
            },
        };

        Some(command)
    }
}

/// Interactive journal on stdin/stdout. Runs until `quit` or end of input.
pub async fn run(journal: &mut Journal) -> Result<()> {
    let input = BufReader::new(stdin());
    let mut output = std::io::stdout();

    run_with(journal, input, &mut output).await
}

pub async fn run_with<R, W>(journal: &mut Journal, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    let screen = journal.navigate(View::Dashboard);
    show(out, screen)?;
    writeln!(out, "Type 'help' for commands.")?;

    loop {
        write!(out, "journal:{}> ", journal.current_view().name())?;
        out.flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };

        let command = match Command::parse(&line) {
            Some(command) => command,
            None => continue,
        };

        match command {
            Command::Navigate(view) => {
                let screen = journal.navigate(view);
                show(out, screen)?;
            }
            Command::Add => {
                if let Ok(Screen::Form(form)) = journal.navigate(View::Form(None)) {
                    fill_form(journal, form, &mut lines, out).await?;
                }
            }
            Command::Edit(fragment) => {
                let id = match resolve(journal, &fragment, out)? {
                    Some(id) => id,
                    None => continue,
                };
                match journal.navigate(View::Form(Some(id))) {
                    Ok(Screen::Form(form)) => fill_form(journal, form, &mut lines, out).await?,
                    other => show(out, other)?,
                }
            }
            Command::Delete(fragment) => {
                let id = match resolve(journal, &fragment, out)? {
                    Some(id) => id,
                    None => continue,
                };
                let pending = match journal.request_delete(id) {
                    Some(pending) => pending,
                    None => continue,
                };

                write!(out, "{}: ", pending.prompt())?;
                out.flush()?;

                let answer = lines.next_line().await?.unwrap_or_default();
                let confirmed = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");

                let screen = journal.confirm_delete(pending, confirmed).await;
                show(out, screen)?;
            }
            Command::Export(path) => match journal.export_csv(Path::new(&path)) {
                Ok(written) => writeln!(out, "Exported {} trades to {}.", written, path)?,
                Err(e) => {
                    error!("Export to {} failed: {:#}", path, e);
                    writeln!(out, "Error: {:#}", e)?
                }
            },
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => break,
            Command::Unknown(name) => {
                writeln!(out, "Unknown command '{}'. Type 'help' for commands.", name)?
            }
        }
    }

    Ok(())
}

fn resolve<W: Write>(journal: &Journal, fragment: &str, out: &mut W) -> Result<Option<TradeId>> {
    let id = journal.store().find_by_prefix(fragment);

    if id.is_none() {
        writeln!(out, "No single trade matches '{}'.", fragment)?;
    }

    Ok(id)
}

/// Prompts every field with its current value, then submits. Invalid input
/// or a failed save prompts again with what was typed.
async fn fill_form<R, W>(
    journal: &mut Journal,
    mut form: FormState,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", form)?;

    loop {
        for field in FormField::ALL {
            write!(out, "{} [{}]: ", field.label(), form.value(field))?;
            out.flush()?;

            let input = match lines.next_line().await? {
                Some(input) => input,
                None => return Ok(()),
            };
            let input = input.trim();

            match input {
                "" => {}
                "cancel" => {
                    let screen = journal.navigate(View::Dashboard);
                    return show(out, screen);
                }
                "-" if field.is_optional() => form.set(field, ""),
                value => form.set(field, value),
            }
        }

        match journal.submit(&form).await {
            Ok(screen) => return show(out, Ok(screen)),
            Err(JournalError::Validation(e)) => writeln!(out, "Error: {}", e)?,
            Err(e) => writeln!(out, "Error: {}. Nothing was saved.", e)?,
        }
    }
}

fn show<W: Write>(out: &mut W, screen: JournalResult<Screen>) -> Result<()> {
    match screen {
        Ok(screen) => write!(out, "{}", screen)?,
        Err(e) => writeln!(out, "Error: {}", e)?,
    }

    Ok(())
}

use std::fmt;
use std::io::Write;

use anyhow::{anyhow, bail, Result};

use crate::cli::{AddArgs, CliCommand, DeleteArgs, IdsArgs, ListArgs};
use crate::config::AppConfig;
use crate::controller::{Controller, Intent, Outcome, Presenter};
use crate::db::Database;
use crate::form::FormValues;
use crate::model::{Task, Theme};
use crate::view::{short_id, Progress, TaskView, EMPTY_STATE_LABEL};

pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    let db = Database::initialize(config)?;
    let mut controller = Controller::load(db);
    match command {
        CliCommand::List(args) => handle_list(&mut controller, &args, &mut writer),
        CliCommand::Add(args) => handle_add(&mut controller, &args, &mut writer),
        CliCommand::Toggle(args) => handle_toggle(&mut controller, &args, &mut writer),
        CliCommand::Delete(args) => handle_delete(&mut controller, &args, &mut writer),
        CliCommand::Theme => handle_theme(&mut controller, &mut writer),
        CliCommand::Tui => Err(anyhow!("launch interactive surfaces directly")),
    }
}

/// Captures the last render and answers delete confirmations from the `--yes` flag.
#[derive(Default)]
struct TextPresenter {
    records: Vec<TaskView>,
    progress: Progress,
    theme: Theme,
    allow_delete: bool,
}

impl Presenter for TextPresenter {
    fn display(&mut self, records: &[TaskView], progress: Progress) {
        self.records = records.to_vec();
        self.progress = progress;
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn confirm_delete(&mut self, _task: &Task) -> bool {
        self.allow_delete
    }
}

fn handle_list<W: Write>(
    controller: &mut Controller<Database>,
    args: &ListArgs,
    mut writer: W,
) -> Result<()> {
    let mut presenter = TextPresenter::default();
    controller.dispatch(Intent::SetFilter(args.filter), &mut presenter);
    controller.dispatch(Intent::SetSort(args.sort), &mut presenter);

    if args.json {
        let view = controller.state().view();
        serde_json::to_writer_pretty(&mut writer, &view)?;
        writeln!(writer)?;
        return Ok(());
    }

    if presenter.records.is_empty() {
        writeln!(writer, "{EMPTY_STATE_LABEL}")?;
    }
    for record in &presenter.records {
        writeln!(writer, "{}", ListLine(record))?;
    }
    let progress = presenter.progress;
    writeln!(
        writer,
        "{}/{} completed ({}%) | {} | {}",
        progress.completed,
        progress.total,
        progress.percent,
        args.filter.label(),
        args.sort.label()
    )?;
    Ok(())
}

fn handle_add<W: Write>(
    controller: &mut Controller<Database>,
    args: &AddArgs,
    mut writer: W,
) -> Result<()> {
    let mut presenter = TextPresenter::default();
    controller.dispatch(Intent::Add, &mut presenter);
    match controller.dispatch(Intent::Submit(FormValues::from(args)), &mut presenter) {
        Outcome::Created(id) => {
            let title = controller
                .state()
                .find(&id)
                .map(|task| task.title.as_str())
                .unwrap_or_default();
            writeln!(writer, "Added {} {}", short_id(&id), title)?;
            Ok(())
        }
        Outcome::Rejected(err) => Err(err.into()),
        other => bail!("unexpected outcome while adding: {other:?}"),
    }
}

fn handle_toggle<W: Write>(
    controller: &mut Controller<Database>,
    args: &IdsArgs,
    mut writer: W,
) -> Result<()> {
    let mut presenter = TextPresenter::default();
    let mut missing = Vec::new();
    for raw in &args.ids {
        let id = resolve_id(controller, raw)?;
        match controller.dispatch(Intent::ToggleComplete(id), &mut presenter) {
            Outcome::Toggled { id, completed } => {
                let verb = if completed { "Completed" } else { "Reopened" };
                writeln!(writer, "{verb} {}", short_id(&id))?;
            }
            _ => missing.push(raw.clone()),
        }
    }
    if !missing.is_empty() {
        writeln!(writer, "Not found: {}", missing.join(", "))?;
    }
    Ok(())
}

fn handle_delete<W: Write>(
    controller: &mut Controller<Database>,
    args: &DeleteArgs,
    mut writer: W,
) -> Result<()> {
    let mut presenter = TextPresenter {
        allow_delete: args.yes,
        ..TextPresenter::default()
    };
    let mut summary = DeleteSummary::default();
    for raw in &args.ids {
        let id = resolve_id(controller, raw)?;
        match controller.dispatch(Intent::Delete(id), &mut presenter) {
            Outcome::Deleted(_) => summary.deleted += 1,
            Outcome::DeleteDeclined => summary.declined += 1,
            _ => summary.missing.push(raw.clone()),
        }
    }
    summary.write_to(&mut writer)?;
    Ok(())
}

fn handle_theme<W: Write>(controller: &mut Controller<Database>, mut writer: W) -> Result<()> {
    let mut presenter = TextPresenter::default();
    if let Outcome::ThemeChanged(theme) = controller.dispatch(Intent::ToggleTheme, &mut presenter) {
        writeln!(writer, "Theme: {theme}")?;
    }
    Ok(())
}

/// Accepts a full id or a unique, case-insensitive suffix of one. Unknown input passes
/// through unchanged so the controller reports it as missing.
fn resolve_id(controller: &Controller<Database>, raw: &str) -> Result<String> {
    let tasks = &controller.state().tasks;
    if tasks.iter().any(|task| task.id == raw) {
        return Ok(raw.to_string());
    }
    let needle = raw.to_ascii_uppercase();
    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|task| !needle.is_empty() && task.id.to_ascii_uppercase().ends_with(&needle))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task.id.clone()),
        [] => Ok(raw.to_string()),
        _ => bail!("id '{raw}' matches {} tasks; use more characters", matches.len()),
    }
}

struct ListLine<'a>(&'a TaskView);

impl fmt::Display for ListLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        write!(
            f,
            "[{}] {}  {:<10}  {:<6}  {}",
            if record.completed { "x" } else { " " },
            short_id(&record.id),
            record.due_label,
            record.priority,
            record.title
        )?;
        if let Some(description) = &record.description {
            write!(f, " ({description})")?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct DeleteSummary {
    deleted: usize,
    declined: usize,
    missing: Vec<String>,
}

impl DeleteSummary {
    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", SummaryLine::deleted(self.deleted))?;
        if self.declined > 0 {
            writeln!(
                writer,
                "Skipped {} task{}; pass --yes to confirm",
                self.declined,
                if self.declined == 1 { "" } else { "s" }
            )?;
        }
        if !self.missing.is_empty() {
            writeln!(writer, "Not found: {}", self.missing.join(", "))?;
        }
        Ok(())
    }
}

enum SummaryLine {
    Deleted(usize),
    NoneDeleted,
}

impl SummaryLine {
    fn deleted(count: usize) -> Self {
        if count > 0 {
            SummaryLine::Deleted(count)
        } else {
            SummaryLine::NoneDeleted
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Deleted(count) => {
                write!(
                    f,
                    "Deleted {} task{}",
                    count,
                    if *count == 1 { "" } else { "s" }
                )
            }
            SummaryLine::NoneDeleted => write!(f, "No tasks deleted"),
        }
    }
}

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use serde::Serialize;

use crate::{
    calendar::{Calendar, CalendarEvent, EventId},
    constants::GRID_SETTINGS,
    domain::{Cell, GoalId, GoalUnit, ProjectId, UnitKind},
    grid::{GridDimensions, ProgressOutcome, cell_coordinates},
    project::{ProjectRecord, ProjectSession, ProjectStore},
    storage::{self, JsonProjectStore},
};

#[derive(Parser, Debug)]
#[command(name = "goalgrid")]
#[command(about = "Reveal a picture one goal at a time", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Directory holding projects and events")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Create a project from an image")]
    New {
        #[arg(help = "Project name")]
        name: String,

        #[arg(long, help = "Image file to reveal")]
        image: PathBuf,

        #[arg(long, help = "Deadline (YYYY-MM-DD)")]
        deadline: Option<NaiveDate>,
    },

    #[command(about = "List saved projects")]
    List,

    #[command(about = "Show a project's goals and grid")]
    Show {
        #[arg(help = "Project name or ID")]
        project: String,

        #[arg(long, help = "Print the cell grid")]
        grid: bool,
    },

    #[command(about = "Delete a project")]
    Delete {
        #[arg(help = "Project name or ID")]
        project: String,
    },

    #[command(about = "Set or clear a project's deadline")]
    Deadline {
        #[arg(help = "Project name or ID")]
        project: String,

        #[arg(help = "Deadline (YYYY-MM-DD); omit to clear")]
        date: Option<NaiveDate>,
    },

    #[command(subcommand, about = "Manage goals")]
    Goal(GoalCommand),

    #[command(about = "Divide the image into cells")]
    Divide {
        #[arg(help = "Project name or ID")]
        project: String,
    },

    #[command(about = "Log progress against a goal")]
    Progress {
        #[arg(help = "Project name or ID")]
        project: String,

        #[arg(help = "Goal ID")]
        goal: u64,

        #[arg(help = "Amount completed")]
        amount: u64,

        #[arg(long, help = "Size the coloring as a share of the goal's cells")]
        proportional: bool,
    },

    #[command(about = "Complete the rest of a goal")]
    Complete {
        #[arg(help = "Project name or ID")]
        project: String,

        #[arg(help = "Goal ID")]
        goal: u64,
    },

    #[command(about = "Complete the rest of a goal from the goal list")]
    QuickComplete {
        #[arg(help = "Project name or ID")]
        project: String,

        #[arg(help = "Goal ID")]
        goal: u64,
    },

    #[command(about = "Revert the last progress step")]
    Undo {
        #[arg(help = "Project name or ID")]
        project: String,
    },

    #[command(subcommand, about = "Manage calendar events")]
    Event(EventCommand),

    #[command(about = "Export projects and events")]
    Export {
        #[arg(long, value_enum, help = "Export format")]
        format: ExportFormat,

        #[arg(long, short, help = "Output path")]
        out: Option<PathBuf>,
    },

    #[command(about = "List the available goal units")]
    Units,

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    #[command(about = "Add a goal")]
    Add {
        #[arg(help = "Project name or ID")]
        project: String,

        #[arg(help = "Goal description")]
        text: String,

        #[arg(help = "Target amount")]
        amount: u64,

        #[arg(long, short, default_value = "pieces", help = "Unit name or symbol")]
        unit: GoalUnit,
    },

    #[command(about = "Edit a goal")]
    Edit(GoalEditArgs),

    #[command(about = "Remove a goal")]
    Remove {
        #[arg(help = "Project name or ID")]
        project: String,

        #[arg(help = "Goal ID")]
        goal: u64,
    },
}

#[derive(Args, Debug)]
pub struct GoalEditArgs {
    #[arg(help = "Project name or ID")]
    pub project: String,

    #[arg(help = "Goal ID")]
    pub goal: u64,

    #[arg(long, help = "New description")]
    pub text: Option<String>,

    #[arg(long, help = "New target amount")]
    pub amount: Option<u64>,

    #[arg(long, short, help = "New unit name or symbol")]
    pub unit: Option<GoalUnit>,
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    #[command(about = "Add an event")]
    Add {
        #[arg(help = "Date (YYYY-MM-DD)")]
        date: NaiveDate,

        #[arg(help = "Event title")]
        title: String,

        #[arg(long, help = "Time (HH:MM)", value_parser = parse_time)]
        time: Option<NaiveTime>,

        #[arg(long, default_value = "", help = "Notes")]
        notes: String,
    },

    #[command(about = "Edit an event")]
    Edit {
        #[arg(help = "Event ID")]
        id: u64,

        #[arg(long, help = "New title")]
        title: Option<String>,

        #[arg(long, help = "New time (HH:MM)", value_parser = parse_time)]
        time: Option<NaiveTime>,

        #[arg(long, help = "New notes")]
        notes: Option<String>,
    },

    #[command(about = "Remove an event")]
    Remove {
        #[arg(help = "Event ID")]
        id: u64,
    },

    #[command(about = "List events for a day, or the days with events in its month")]
    List {
        #[arg(help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<NaiveDate>,

        #[arg(long, help = "List the days with events in the month instead")]
        month: bool,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    Ics,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalExport {
    pub project_id: u64,
    pub project: String,
    pub goal_id: u64,
    pub text: String,
    pub unit: String,
    pub total_amount: u64,
    pub remaining_amount: u64,
    pub completed: bool,
    pub scale: u64,
    pub cells: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectExport {
    pub id: u64,
    pub name: String,
    pub deadline: Option<NaiveDate>,
    pub grid_visible: bool,
    pub dimensions: GridDimensions,
    pub colored_cells: usize,
    pub total_cells: usize,
    pub goals: Vec<GoalExport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataExport {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub projects: Vec<ProjectExport>,
    pub events: Vec<CalendarEvent>,
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{}', expected HH:MM", value))
}

fn open_store(data_dir: &Path) -> Result<JsonProjectStore, String> {
    JsonProjectStore::new(data_dir)
}

/// Resolves a project by numeric ID first, then by exact name.
fn find_project<S: ProjectStore>(store: &S, key: &str) -> Result<ProjectRecord, String> {
    if let Ok(id) = key.parse::<u64>() {
        if let Some(record) = store.load(ProjectId::new(id))? {
            return Ok(record);
        }
    }

    let id = store
        .list()?
        .into_iter()
        .find(|record| record.name == key || record.display_name() == key)
        .map(|record| record.id)
        .ok_or_else(|| format!("Project '{}' not found", key))?;

    store
        .load(id)?
        .ok_or_else(|| format!("Project '{}' not found", key))
}

fn open_session<S: ProjectStore>(store: &S, key: &str) -> Result<ProjectSession, String> {
    ProjectSession::open(find_project(store, key)?).map_err(|e| e.to_string())
}

fn report_outcome(session: &ProjectSession, outcome: &ProgressOutcome) {
    let engine = session.engine();
    let label = engine
        .goal(outcome.goal_id)
        .map(|goal| format!("{} {}", goal.text, goal.progress_label()))
        .unwrap_or_default();
    println!(
        "Colored {} cell(s) for '{}' ({}/{} colored)",
        outcome.colored_positions.len(),
        label,
        engine.colored_count(),
        engine.cells().len()
    );
    if outcome.goal_completed {
        println!("Goal completed!");
    }
}

pub fn new_project(
    data_dir: &Path,
    name: &str,
    image: &Path,
    deadline: Option<NaiveDate>,
) -> Result<(), String> {
    let image_bytes =
        fs::read(image).map_err(|e| format!("Could not read {}: {}", image.display(), e))?;
    let mut store = open_store(data_dir)?;
    let id = store.next_id()?;

    let mut session = ProjectSession::new(id, name, image_bytes);
    session.deadline = deadline;
    store.save(&session.to_record())?;

    println!("Created project {} '{}'", id, session.display_name());
    Ok(())
}

pub fn list_projects(data_dir: &Path) -> Result<(), String> {
    let store = open_store(data_dir)?;
    let records = store.list()?;
    if records.is_empty() {
        println!("No projects yet");
        return Ok(());
    }

    let today = Local::now().date_naive();
    for record in records {
        let session = ProjectSession::open(record).map_err(|e| e.to_string())?;
        let engine = session.engine();
        let done = engine.goals().iter().filter(|goal| goal.is_completed).count();
        let deadline = session
            .deadline_status(today)
            .map(|status| format!("  [{}]", status))
            .unwrap_or_default();
        println!(
            "{:>4}  {:24} {}/{} goals, {}/{} cells{}",
            session.id,
            session.display_name(),
            done,
            engine.goals().len(),
            engine.colored_count(),
            engine.cells().len(),
            deadline
        );
    }
    Ok(())
}

pub fn show_project(data_dir: &Path, key: &str, show_grid: bool) -> Result<(), String> {
    let store = open_store(data_dir)?;
    let session = open_session(&store, key)?;
    let engine = session.engine();

    println!("{} (#{})", session.display_name(), session.id);
    if let Some(status) = session.deadline_status(Local::now().date_naive()) {
        println!("Deadline: {} ({:?})", status, status.urgency());
    }
    println!("{}", "-".repeat(40));
    for goal in engine.goals() {
        let mark = if goal.is_completed { "x" } else { " " };
        println!("[{}] {:>3}  {:24} {}", mark, goal.id, goal.text, goal.progress_label());
    }
    println!("{}", "-".repeat(40));

    if !session.is_grid_visible() {
        println!("Image not divided yet ({} cells planned)", engine.total_cells());
        return Ok(());
    }

    let dims = engine.compute_dimensions();
    println!(
        "Grid {}x{}: {}/{} cells colored{}",
        dims.rows,
        dims.columns,
        engine.colored_count(),
        engine.cells().len(),
        if engine.can_undo() { " (undo available)" } else { "" }
    );

    if show_grid {
        for line in render_grid(engine.cells(), dims) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn render_grid(cells: &[Cell], dims: GridDimensions) -> Vec<String> {
    let mut lines = vec![String::new(); dims.rows];
    for cell in cells {
        let Some((row, _)) = cell_coordinates(cell.position, dims.columns) else {
            break;
        };
        let Some(line) = lines.get_mut(row) else {
            break;
        };
        line.push(if cell.is_colored {
            GRID_SETTINGS.colored_glyph
        } else {
            GRID_SETTINGS.blank_glyph
        });
    }
    lines
}

fn unit_lines() -> Vec<String> {
    UnitKind::ALL
        .iter()
        .map(|kind| {
            let units = kind
                .units()
                .map(|unit| format!("{} ({})", unit.name(), unit.symbol()))
                .join(", ");
            format!("{:9} {}", format!("{}:", kind.label()), units)
        })
        .collect()
}

pub fn delete_project(data_dir: &Path, key: &str) -> Result<(), String> {
    let mut store = open_store(data_dir)?;
    let record = find_project(&store, key)?;
    store.delete(record.id)?;
    println!("Deleted project {} '{}'", record.id, record.display_name());
    Ok(())
}

pub fn set_deadline(data_dir: &Path, key: &str, date: Option<NaiveDate>) -> Result<(), String> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(&store, key)?;
    session.deadline = date;
    store.save(&session.to_record())?;

    match date {
        Some(date) => println!("Deadline set to {}", date),
        None => println!("Deadline cleared"),
    }
    Ok(())
}

pub fn run_goal_command(data_dir: &Path, command: GoalCommand) -> Result<(), String> {
    let mut store = open_store(data_dir)?;
    match command {
        GoalCommand::Add {
            project,
            text,
            amount,
            unit,
        } => {
            let mut session = open_session(&store, &project)?;
            let id = session
                .add_goal(&text, amount, unit)
                .map_err(|e| e.to_string())?;
            store.save(&session.to_record())?;
            if let Some(goal) = session.engine().goal(id) {
                println!("Added goal {} '{}' ({})", id, goal.text, goal.progress_label());
            }
        }
        GoalCommand::Edit(args) => {
            let mut session = open_session(&store, &args.project)?;
            let id = GoalId::new(args.goal);
            let current = session
                .engine()
                .goal(id)
                .cloned()
                .ok_or_else(|| format!("Goal {} not found", id))?;
            session
                .edit_goal(
                    id,
                    args.text.as_deref().unwrap_or(&current.text),
                    args.amount.unwrap_or(current.total_amount),
                    args.unit.unwrap_or(current.unit),
                )
                .map_err(|e| e.to_string())?;
            store.save(&session.to_record())?;
            println!("Updated goal {}", id);
        }
        GoalCommand::Remove { project, goal } => {
            let mut session = open_session(&store, &project)?;
            let removed = session
                .remove_goal(GoalId::new(goal))
                .map_err(|e| e.to_string())?;
            store.save(&session.to_record())?;
            println!("Removed goal {} '{}'", removed.id, removed.text);
        }
    }
    Ok(())
}

pub fn divide_image(data_dir: &Path, key: &str) -> Result<(), String> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(&store, key)?;
    if session.engine().goals().is_empty() {
        return Err("Add at least one goal before dividing the image".to_string());
    }

    let dims = session.divide();
    store.save(&session.to_record())?;
    println!(
        "Divided into {} cells ({} rows x {} columns)",
        session.engine().cells().len(),
        dims.rows,
        dims.columns
    );
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum ProgressAction {
    Amount { amount: u64, proportional: bool },
    Complete,
    QuickComplete,
}

fn log_progress(
    data_dir: &Path,
    key: &str,
    goal: u64,
    action: ProgressAction,
) -> Result<(), String> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(&store, key)?;
    let goal_id = GoalId::new(goal);

    let outcome = match action {
        ProgressAction::Amount {
            amount,
            proportional: false,
        } => session.apply_progress(goal_id, amount),
        ProgressAction::Amount {
            amount,
            proportional: true,
        } => session.proportional_color(goal_id, amount),
        ProgressAction::Complete => session.complete_goal(goal_id),
        ProgressAction::QuickComplete => session.quick_complete(goal_id),
    }
    .map_err(|e| e.to_string())?;

    store.save(&session.to_record())?;
    report_outcome(&session, &outcome);
    Ok(())
}

pub fn undo_progress(data_dir: &Path, key: &str) -> Result<(), String> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(&store, key)?;
    if !session.undo() {
        println!("Nothing to undo");
        return Ok(());
    }

    store.save(&session.to_record())?;
    println!(
        "Undone. {}/{} cells colored",
        session.engine().colored_count(),
        session.engine().cells().len()
    );
    Ok(())
}

pub fn run_event_command(data_dir: &Path, command: EventCommand) -> Result<(), String> {
    let path = storage::get_calendar_path(data_dir);
    let mut calendar = storage::load_calendar(&path)?;

    match command {
        EventCommand::Add {
            date,
            title,
            time,
            notes,
        } => {
            let time = time.unwrap_or_else(|| Local::now().time());
            let id = calendar
                .add_event(&title, date, time, &notes)
                .map_err(|e| e.to_string())?
                .id;
            storage::save_calendar(&path, &calendar)?;
            println!("Added event {} on {}", id, date);
        }
        EventCommand::Edit {
            id,
            title,
            time,
            notes,
        } => {
            let id = EventId(id);
            let current = calendar
                .events()
                .iter()
                .find(|event| event.id == id)
                .cloned()
                .ok_or_else(|| format!("Event {} not found", id))?;
            calendar
                .edit_event(
                    id,
                    title.as_deref().unwrap_or(&current.title),
                    time.unwrap_or(current.time),
                    notes.as_deref().unwrap_or(&current.notes),
                )
                .map_err(|e| e.to_string())?;
            storage::save_calendar(&path, &calendar)?;
            println!("Updated event {}", id);
        }
        EventCommand::Remove { id } => {
            let removed = calendar
                .remove_event(EventId(id))
                .map_err(|e| e.to_string())?;
            storage::save_calendar(&path, &calendar)?;
            println!("Removed event {} '{}'", removed.id, removed.title);
        }
        EventCommand::List { date, month } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            print_events(&calendar, date, month);
        }
    }
    Ok(())
}

fn print_events(calendar: &Calendar, date: NaiveDate, month: bool) {
    use chrono::Datelike;

    if month {
        let days = calendar.dates_with_events(date.year(), date.month());
        if days.is_empty() {
            println!("No events in {}", date.format("%B %Y"));
        } else {
            println!(
                "{}: {}",
                date.format("%B %Y"),
                days.iter().map(|day| day.day()).join(", ")
            );
        }
        return;
    }

    if !calendar.has_events(date) {
        println!("No events on {}", date);
        return;
    }
    println!("{}", date.format("%A, %d %B %Y"));
    for event in calendar.events_on(date) {
        println!("{:>4}  {}  {}", event.id, event.time.format("%H:%M"), event.title);
        if !event.notes.is_empty() {
            println!("            {}", event.notes);
        }
    }
}

fn build_export(data_dir: &Path) -> Result<DataExport, String> {
    let store = open_store(data_dir)?;
    let calendar = storage::load_calendar(&storage::get_calendar_path(data_dir))?;

    let projects = store
        .list()?
        .into_iter()
        .map(|record| {
            let session = ProjectSession::open(record).map_err(|e| e.to_string())?;
            let engine = session.engine();
            let name = session.display_name();
            Ok(ProjectExport {
                id: session.id.0,
                name: name.clone(),
                deadline: session.deadline,
                grid_visible: session.is_grid_visible(),
                dimensions: engine.compute_dimensions(),
                colored_cells: engine.colored_count(),
                total_cells: engine.cells().len(),
                goals: engine
                    .goals()
                    .iter()
                    .map(|goal| GoalExport {
                        project_id: session.id.0,
                        project: name.clone(),
                        goal_id: goal.id.0,
                        text: goal.text.clone(),
                        unit: goal.unit.name().to_string(),
                        total_amount: goal.total_amount,
                        remaining_amount: goal.remaining_amount,
                        completed: goal.is_completed,
                        scale: goal.scale,
                        cells: goal.scaled_square_count(),
                    })
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(DataExport {
        schema_version: 1,
        exported_at: Utc::now(),
        projects,
        events: calendar.events().to_vec(),
    })
}

pub fn export_data(
    data_dir: &Path,
    format: ExportFormat,
    out_path: Option<PathBuf>,
) -> Result<(), String> {
    let export = build_export(data_dir)?;

    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&export).map_err(|e| e.to_string())?,
        ExportFormat::Csv => goals_csv(&export)?,
        ExportFormat::Ics => calendar_ics(&export),
    };

    if let Some(path) = out_path {
        storage::write_text_file(&path, &content)?;
        println!("Exported to {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn goals_csv(export: &DataExport) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for goal in export.projects.iter().flat_map(|project| &project.goals) {
        writer.serialize(goal).map_err(|e| e.to_string())?;
    }
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

fn calendar_ics(export: &DataExport) -> String {
    let mut ics = String::new();
    ics.push_str("BEGIN:VCALENDAR\r\n");
    ics.push_str("VERSION:2.0\r\n");
    ics.push_str("PRODID:-//goalgrid//goal tracking//EN\r\n");
    let stamp = format_ics_timestamp(export.exported_at);

    for event in &export.events {
        let start = event.date.and_time(event.time);
        ics.push_str("BEGIN:VEVENT\r\n");
        ics.push_str(&format!("UID:goalgrid-event-{}\r\n", event.id));
        ics.push_str(&format!("DTSTAMP:{}\r\n", stamp));
        ics.push_str(&format!("DTSTART:{}\r\n", start.format("%Y%m%dT%H%M%S")));
        ics.push_str(&format!("SUMMARY:{}\r\n", escape_ics_text(&event.title)));
        if !event.notes.is_empty() {
            ics.push_str(&format!("DESCRIPTION:{}\r\n", escape_ics_text(&event.notes)));
        }
        ics.push_str("END:VEVENT\r\n");
    }

    for project in &export.projects {
        let Some(deadline) = project.deadline else {
            continue;
        };
        ics.push_str("BEGIN:VEVENT\r\n");
        ics.push_str(&format!("UID:goalgrid-deadline-{}\r\n", project.id));
        ics.push_str(&format!("DTSTAMP:{}\r\n", stamp));
        ics.push_str(&format!("DTSTART;VALUE=DATE:{}\r\n", deadline.format("%Y%m%d")));
        ics.push_str(&format!(
            "SUMMARY:Deadline: {}\r\n",
            escape_ics_text(&project.name)
        ));
        ics.push_str("END:VEVENT\r\n");
    }

    ics.push_str("END:VCALENDAR\r\n");
    ics
}

/// TEXT value escaping: backslash, semicolon, comma and line breaks.
fn escape_ics_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn format_ics_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn print_completions(shell: &str) -> Result<(), String> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => {
            return Err(format!(
                "Unsupported shell: {}. Use bash, zsh, or fish.",
                shell
            ));
        }
    };
    clap_complete::generate(shell, &mut Cli::command(), "goalgrid", &mut io::stdout());
    Ok(())
}

pub fn run(cli: Cli) -> Result<(), String> {
    let data_dir = storage::get_data_dir(cli.data_dir.as_deref());
    let data_dir = data_dir.as_path();

    match cli.command {
        Command::New {
            name,
            image,
            deadline,
        } => new_project(data_dir, &name, &image, deadline),
        Command::List => list_projects(data_dir),
        Command::Show { project, grid } => show_project(data_dir, &project, grid),
        Command::Delete { project } => delete_project(data_dir, &project),
        Command::Deadline { project, date } => set_deadline(data_dir, &project, date),
        Command::Goal(command) => run_goal_command(data_dir, command),
        Command::Divide { project } => divide_image(data_dir, &project),
        Command::Progress {
            project,
            goal,
            amount,
            proportional,
        } => log_progress(
            data_dir,
            &project,
            goal,
            ProgressAction::Amount {
                amount,
                proportional,
            },
        ),
        Command::Complete { project, goal } => {
            log_progress(data_dir, &project, goal, ProgressAction::Complete)
        }
        Command::QuickComplete { project, goal } => {
            log_progress(data_dir, &project, goal, ProgressAction::QuickComplete)
        }
        Command::Undo { project } => undo_progress(data_dir, &project),
        Command::Event(command) => run_event_command(data_dir, command),
        Command::Export { format, out } => export_data(data_dir, format, out),
        Command::Units => {
            for line in unit_lines() {
                println!("{}", line);
            }
            Ok(())
        }
        Command::Completions { shell } => print_completions(&shell),
    }
}

pub fn run_cli() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

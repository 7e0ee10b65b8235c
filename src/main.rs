//! Focus Quest CLI - quest log, calculator and focus timer

use clap::{Parser, Subcommand};
use focusquest::calc::{self, Key, Keypad};
use focusquest::config::{self, FocusQuestConfig};
use focusquest::quest::{CompanionType, HistoryId, QuestId, TaskId};
use focusquest::timer::{FocusTimer, Tick, TimerMode};
use focusquest::ui::{self, Icons};
use focusquest::{QuestBoard, QuestStore, resolve_stage};
use owo_colors::OwoColorize;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "focusquest")]
#[command(version)]
#[command(about = "Gamified quest log, safe calculator and focus timer")]
#[command(long_about = r#"
Focus Quest keeps your goals as quests. Finish tasks to earn XP and watch
your companion grow from an egg (or a seed) into an ancient dragon (or an
elder tree).

Example usage:
  focusquest quest new "Learn Rust" --companion dragon
  focusquest quest task 1 "Read the book"
  focusquest quest done 1 1
  focusquest quest complete 1
  focusquest calc "2^10 + (3 - 1) * 4"
  focusquest timer --mode short
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage active quests and their tasks
    Quest {
        #[command(subcommand)]
        command: QuestCommand,
    },

    /// Browse completed and abandoned quests
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Show quest log statistics
    Stats,

    /// Evaluate arithmetic with + - * / % ^ and parentheses
    Calc {
        /// Expression such as "2^10 + 1.5e-3". Without one, stdin is read as
        /// keypad input ("7 * 6 =", "C", "DEL", "pi", "sqrt").
        expr: Option<String>,

        /// Take the square root of the result
        #[arg(long)]
        sqrt: bool,
    },

    /// Run a focus or break countdown
    Timer {
        /// Timer mode (focus, short, long)
        #[arg(short, long, default_value = "focus")]
        mode: String,

        /// Override the mode's length in minutes
        #[arg(long)]
        minutes: Option<u32>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum QuestCommand {
    /// Start a new adventure
    New {
        /// What you want to achieve
        name: String,

        /// Companion that grows with the quest (dragon, tree)
        #[arg(long, default_value = "dragon")]
        companion: String,
    },

    /// List active quests
    List,

    /// Show a quest, its companion and its tasks
    Show { id: QuestId },

    /// Add a task to a quest
    Task { id: QuestId, text: String },

    /// Mark a task as done (+25 XP)
    Done { id: QuestId, task: TaskId },

    /// Reopen a finished task (-25 XP)
    Undo { id: QuestId, task: TaskId },

    /// Finish a quest and move it to history
    Complete { id: QuestId },

    /// Give up on a quest and move it to history
    Abandon { id: QuestId },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List archived quests, newest first
    List,

    /// Show an archived quest with its tasks
    Show { id: HistoryId },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print a JSON success envelope
pub fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("focusquest=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Quest { command } => {
            let mut board = open_board(cli.database, &config)?;
            run_quest(&mut board, command, output_mode)?;
        }
        Commands::History { command } => {
            let board = open_board(cli.database, &config)?;
            run_history(&board, command, output_mode)?;
        }
        Commands::Stats => {
            let board = open_board(cli.database, &config)?;
            let stats = board.store().stats()?;

            if output_mode.is_human() {
                let counts = [
                    ("Active quests", stats.active_quests),
                    ("Open tasks", stats.open_tasks),
                    ("Done tasks", stats.done_tasks),
                    ("Completed", stats.completed),
                    ("Abandoned", stats.abandoned),
                ];
                let values: Vec<String> = counts.iter().map(|(_, n)| n.to_string()).collect();
                let rows: Vec<(&str, &str)> = counts
                    .iter()
                    .zip(&values)
                    .map(|((label, _), value)| (*label, value.as_str()))
                    .collect();

                ui::header("Quest Log Statistics");
                println!("{}", ui::stats_table(&rows));
                ui::info("Schema version", &board.store().schema_version()?.to_string());
            } else {
                emit_success(output_mode, "stats", serde_json::to_value(stats)?)?;
            }
        }
        Commands::Calc { expr, sqrt } => run_calc(expr, sqrt, output_mode)?,
        Commands::Timer { mode, minutes } => {
            let mode: TimerMode = mode.parse()?;
            run_timer(&config, mode, minutes, output_mode)?;
        }
        Commands::Config { command } => match command {
            ConfigCommand::Init { force } => {
                let path = cli.config.unwrap_or_else(config::default_config_path);
                config::write_config(&path, &FocusQuestConfig::default(), force)?;
                if output_mode.is_human() {
                    ui::success(&format!("Wrote {}", path.display()));
                } else {
                    emit_success(
                        output_mode,
                        "config.init",
                        serde_json::json!({ "path": path.display().to_string() }),
                    )?;
                }
            }
        },
    }

    Ok(())
}

fn open_board(database: Option<PathBuf>, config: &FocusQuestConfig) -> anyhow::Result<QuestBoard> {
    let path = database.unwrap_or_else(|| config.database_path());
    config::ensure_db_dir(&path)?;
    tracing::debug!("Using database {}", path.display());

    let store = QuestStore::open(&path)?;
    Ok(QuestBoard::new(store))
}

fn run_quest(
    board: &mut QuestBoard,
    command: QuestCommand,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    match command {
        QuestCommand::New { name, companion } => {
            let companion: CompanionType = companion.parse()?;
            let id = board.start_adventure(&name, companion)?;

            if output_mode.is_human() {
                ui::success(&format!("Quest #{} started: {}", id, name.trim()));
                show_selected(board);
            } else {
                emit_success(output_mode, "quest.new", serde_json::json!({ "id": id }))?;
            }
        }

        QuestCommand::List => {
            let quests = board.quests()?;
            if output_mode.is_human() {
                if quests.is_empty() {
                    println!("∅ No active quests. Start one with `focusquest quest new`.");
                } else {
                    ui::header("Active Quests");
                    println!("{}", ui::quest_table(&quests));
                }
            } else {
                emit_success(output_mode, "quest.list", serde_json::to_value(&quests)?)?;
            }
        }

        QuestCommand::Show { id } => {
            if !open_or_warn(board, id)? {
                return Ok(());
            }
            if output_mode.is_human() {
                show_selected(board);
            } else {
                let data = serde_json::json!({
                    "quest": board.selected(),
                    "companion": board.companion(),
                });
                emit_success(output_mode, "quest.show", data)?;
            }
        }

        QuestCommand::Task { id, text } => {
            if !open_or_warn(board, id)? {
                return Ok(());
            }
            let task = board.add_task(&text)?;
            if output_mode.is_human() {
                ui::success(&format!("Task #{} added", task.id));
                ui::task_line(&task);
            } else {
                emit_success(output_mode, "quest.task", serde_json::to_value(&task)?)?;
            }
        }

        QuestCommand::Done { id, task } => toggle(board, id, task, true, output_mode)?,
        QuestCommand::Undo { id, task } => toggle(board, id, task, false, output_mode)?,

        QuestCommand::Complete { id } => {
            if !open_or_warn(board, id)? {
                return Ok(());
            }
            let history_id = board.complete_quest()?;
            report_archived(id, history_id, "quest.complete", output_mode)?;
        }

        QuestCommand::Abandon { id } => {
            if !open_or_warn(board, id)? {
                return Ok(());
            }
            let history_id = board.give_up_quest()?;
            report_archived(id, history_id, "quest.abandon", output_mode)?;
        }
    }

    Ok(())
}

fn toggle(
    board: &mut QuestBoard,
    quest_id: QuestId,
    task_id: TaskId,
    done: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    if !open_or_warn(board, quest_id)? {
        return Ok(());
    }

    let Some(toggled) = board.toggle_task(task_id, done)? else {
        match board.store().get_task(task_id)? {
            Some(_) => ui::warn(&format!("Task #{} is not part of quest #{}", task_id, quest_id)),
            None => ui::warn(&format!("Task #{} not found", task_id)),
        }
        return Ok(());
    };

    if output_mode.is_human() {
        let verb = if done { "done" } else { "reopened" };
        ui::success(&format!("Task #{} {} (XP: {})", task_id, verb, toggled.xp));
        if let Some(stage) = board.companion() {
            ui::companion(&stage, toggled.xp);
        }
    } else {
        emit_success(output_mode, "quest.toggle", serde_json::to_value(toggled)?)?;
    }
    Ok(())
}

fn open_or_warn(board: &mut QuestBoard, id: QuestId) -> anyhow::Result<bool> {
    let found = board.open_quest(id)?;
    if !found {
        ui::warn(&format!("Quest #{} not found", id));
    }
    Ok(found)
}

fn report_archived(
    quest_id: QuestId,
    history_id: Option<HistoryId>,
    command: &str,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    if output_mode.is_human() {
        match history_id {
            Some(history_id) => ui::success(&format!(
                "Quest #{} archived as history #{}",
                quest_id, history_id
            )),
            None => ui::warn(&format!("Quest #{} not found", quest_id)),
        }
    } else {
        emit_success(output_mode, command, serde_json::json!({ "history_id": history_id }))?;
    }
    Ok(())
}

fn show_selected(board: &QuestBoard) {
    let (Some(details), Some(stage)) = (board.selected(), board.companion()) else {
        return;
    };

    let quest = &details.quest;
    ui::header(&format!("Quest #{}: {}", quest.id, quest.name));
    ui::summary_row("Companion:", quest.companion_type.as_str());
    ui::summary_row(
        "Started:",
        &quest.start_date.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string(),
    );
    ui::companion(&stage, quest.xp);

    ui::section(&format!(" Tasks {}/{} ", details.done_count(), details.tasks.len()));
    if details.tasks.is_empty() {
        println!("  {}", ui::muted("No tasks yet"));
    }
    for task in &details.tasks {
        ui::task_line(task);
    }
}

fn run_history(
    board: &QuestBoard,
    command: HistoryCommand,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    match command {
        HistoryCommand::List => {
            let records = board.history()?;
            if output_mode.is_human() {
                if records.is_empty() {
                    println!("∅ No finished quests yet.");
                } else {
                    ui::header("Quest History");
                    println!("{}", ui::history_table(&records));
                }
            } else {
                emit_success(output_mode, "history.list", serde_json::to_value(&records)?)?;
            }
        }

        HistoryCommand::Show { id } => {
            let Some(details) = board.history_details(id)? else {
                ui::warn(&format!("History #{} not found", id));
                return Ok(());
            };

            if output_mode.is_human() {
                let record = &details.record;
                ui::header(&format!("Quest: {}", record.name));
                ui::history_summary(record);
                ui::summary_row(
                    "Ended:",
                    &record.end_date.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string(),
                );
                let stage = resolve_stage(record.companion_type, record.final_xp);
                ui::companion(&stage, record.final_xp);

                ui::section(" Tasks ");
                for task in &details.tasks {
                    ui::task_line(task);
                }
            } else {
                emit_success(output_mode, "history.show", serde_json::to_value(&details)?)?;
            }
        }
    }

    Ok(())
}

fn run_calc(expr: Option<String>, sqrt: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    if let Some(expr) = expr {
        let result = calc::calculate(&expr, sqrt)
            .map_err(|e| anyhow::anyhow!("could not evaluate '{}': {}", expr, e))?;

        if output_mode.is_human() {
            println!("{} {}", Icons::ABACUS, result);
        } else {
            emit_success(
                output_mode,
                "calc",
                serde_json::json!({ "input": expr, "result": result }),
            )?;
        }
        return Ok(());
    }

    let mut keypad = Keypad::new();
    // Interactive keypad: one line of keys at a time, display echoed after each
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if matches!(line.trim(), "q" | "quit" | "exit") {
            break;
        }
        if let Err(e) = keypad.feed_line(&line) {
            ui::error(&e.to_string());
            continue;
        }
        if sqrt && !line.trim().is_empty() {
            keypad.press(Key::Sqrt);
        }
        println!("{}", keypad.display());
    }
    Ok(())
}

fn run_timer(
    config: &FocusQuestConfig,
    mode: TimerMode,
    minutes: Option<u32>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut timer = FocusTimer::new(config.timer);
    timer.set_mode(mode);
    if let Some(minutes) = minutes {
        let delta = i64::from(minutes) * 60 - i64::from(timer.total_seconds());
        if delta != 0 && !timer.adjust(delta) {
            anyhow::bail!("timer length must be at least one minute");
        }
    }

    if output_mode.is_human() {
        ui::status(Icons::CLOCK, timer.mode().label(), &timer.display());
    }

    let bar = ui::TimerBar::new(&timer);
    let started = Instant::now();
    timer.toggle();

    loop {
        std::thread::sleep(Duration::from_secs(1));
        match timer.tick() {
            Tick::Counting(_) => bar.update(&timer),
            Tick::Finished => {
                bar.finish("Done");
                break;
            }
            Tick::Idle => {
                bar.abandon();
                break;
            }
        }
    }

    let elapsed = started.elapsed().as_secs();
    if output_mode.is_human() {
        // Terminal bell
        print!("\x07");
        println!(
            "{} {}",
            Icons::BELL,
            format!("{} finished", timer.mode().label()).style(ui::theme().success.clone())
        );
        ui::timing(&format!("{}m {:02}s", elapsed / 60, elapsed % 60));
    } else {
        emit_success(
            output_mode,
            "timer",
            serde_json::json!({
                "mode": timer.mode(),
                "seconds": timer.total_seconds(),
                "elapsed": elapsed,
            }),
        )?;
    }
    Ok(())
}

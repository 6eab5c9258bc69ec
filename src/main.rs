//! liftlog - Personal lifting and cardio tracker
//!
//! Logs workouts and suggests the next session's weight and set×rep scheme.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use liftlog::config::ProgressionConfig;
use liftlog::db::{Database, NewCardio, NewWorkout, RepositoryError, UserContext};
use liftlog::exercises::ExerciseKind;
use liftlog::history::History;
use liftlog::progression::{Progression, Scheme, Suggestion};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(author, version, about = "Personal lifting tracker with progressive overload suggestions")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "LIFTLOG_DB", default_value = "liftlog.db")]
    db: String,

    /// User the command runs as
    #[arg(short, long, global = true, env = "LIFTLOG_USER")]
    user: Option<String>,

    /// Progression settings (JSON)
    #[arg(long, global = true, env = "LIFTLOG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the exercise catalog
    #[command(subcommand)]
    Exercise(ExerciseCommand),

    /// Set the scheme to begin an exercise at
    Start {
        exercise: String,
        /// Scheme label from the cycle, e.g. "3x10"
        scheme: String,
    },

    /// Suggest the next session for an exercise
    Suggest {
        exercise: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log a strength workout (unset fields default to the suggestion)
    Log(LogArgs),

    /// List workout history
    History {
        /// Filter by exercise name
        #[arg(short, long)]
        exercise: Option<String>,

        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Per-exercise totals
    Summary {
        /// Filter by exercise name
        exercise: Option<String>,
    },

    /// Log and review cardio sessions
    #[command(subcommand)]
    Cardio(CardioCommand),

    /// Print the effective progression settings
    Config,
}

#[derive(Subcommand)]
enum ExerciseCommand {
    /// Add an exercise
    Add {
        name: String,

        /// Cardio rather than strength
        #[arg(long)]
        cardio: bool,
    },

    /// List exercises
    List {
        #[arg(long)]
        cardio: bool,
    },
}

#[derive(Args)]
struct LogArgs {
    exercise: String,

    /// Reps achieved in the final set
    #[arg(short, long)]
    achieved_reps: u32,

    #[arg(short, long)]
    weight: Option<f64>,

    #[arg(short, long)]
    sets: Option<u32>,

    #[arg(short, long)]
    target_reps: Option<u32>,

    /// Scheme label, e.g. "3x10"
    #[arg(long)]
    scheme: Option<String>,

    /// Mark as success regardless of reps
    #[arg(long, conflicts_with = "fail")]
    success: bool,

    /// Mark as failed regardless of reps
    #[arg(long)]
    fail: bool,

    /// Workout date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum CardioCommand {
    /// Log a cardio session
    Log {
        /// Cardio exercise, e.g. "Rowing"
        workout_type: String,

        #[arg(short, long)]
        minutes: u32,

        /// Distance in km
        #[arg(short = 'k', long)]
        distance: f64,

        /// Difficulty level, e.g. "5/10" or "Program 3"
        #[arg(long)]
        difficulty: Option<String>,

        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List cardio history
    List {
        #[arg(short = 't', long = "type")]
        workout_type: Option<String>,

        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show the most recent session of one type
    Last { workout_type: String },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ProgressionConfig::load_or_default(cli.config.as_deref())?;
    let progression = config.build()?;

    if let Commands::Config = cli.command {
        let effective = ProgressionConfig::effective(&progression);
        println!("{}", serde_json::to_string_pretty(&effective)?);
        return Ok(());
    }

    let db = Database::open(&cli.db)?;

    match cli.command {
        Commands::Exercise(ExerciseCommand::Add { name, cardio }) => {
            let kind = kind_of(cardio);
            db.add_exercise(&name, kind)?;
            println!("Added {} exercise: {} {}", kind, kind.emoji(), name.trim());
            if kind == ExerciseKind::Strength {
                let step = progression.increment_for(&name);
                let key = name.trim().to_lowercase();
                let source = if progression.increments().overrides().contains_key(&key) {
                    "per-exercise"
                } else {
                    "default"
                };
                println!("Weight step: {} kg ({})", step, source);
            }
        }

        Commands::Exercise(ExerciseCommand::List { cardio }) => {
            let kind = kind_of(cardio);
            let names = db.exercises(kind)?;
            if names.is_empty() {
                println!("No {} exercises yet. Add one with `liftlog exercise add`.", kind);
            }
            for name in names {
                println!("{} {}", kind.emoji(), name);
            }
        }

        Commands::Start { exercise, scheme } => {
            let user = user_context(cli.user.as_deref())?;
            let scheme = progression
                .engine()
                .cycle()
                .canonical_scheme_of(&scheme)
                .with_context(|| {
                    format!("Scheme must be one of: {}", progression.engine().cycle().labels().join(", "))
                })?;
            db.set_starting_scheme(&user, &exercise, &scheme.label())?;
            println!("Starting scheme for {}: {}", exercise, scheme);
        }

        Commands::Suggest { exercise, json } => {
            let user = user_context(cli.user.as_deref())?;
            let suggestion = suggest(&db, &progression, &user, &exercise)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&suggestion)?);
            } else {
                print_suggestion(&exercise, &suggestion);
            }
        }

        Commands::Log(args) => {
            let user = user_context(cli.user.as_deref())?;
            let suggestion = suggest(&db, &progression, &user, &args.exercise)?;
            let workout = workout_from_args(args, &suggestion)?;
            let id = db.log_workout(&user, &workout)?;
            println!(
                "Logged: {} - {} kg {} ({}/{} reps, {}) (id: {})",
                workout.exercise,
                workout.weight,
                workout.scheme,
                workout.achieved_reps,
                workout.target_reps,
                if workout.success { "success" } else { "missed" },
                id
            );
        }

        Commands::History { exercise, limit } => {
            let user = user_context(cli.user.as_deref())?;
            let workouts = db.workouts(&user, exercise.as_deref())?;
            if workouts.is_empty() {
                println!("No workouts logged yet. Use `liftlog log` to add your first one.");
                return Ok(());
            }
            println!("Recent workouts:");
            println!("{:-<72}", "");
            for w in workouts.iter().take(limit) {
                println!(
                    "{} | {:20} | {:>7.1} kg | {:6} | {:>2}/{:<2} | {}",
                    w.date.format("%Y-%m-%d"),
                    w.exercise,
                    w.weight,
                    w.scheme,
                    w.achieved_reps,
                    w.target_reps,
                    if w.success { "✓" } else { "✗" }
                );
            }
        }

        Commands::Summary { exercise } => {
            let user = user_context(cli.user.as_deref())?;
            let history = History::new(db.workouts(&user, exercise.as_deref())?);
            if history.is_empty() {
                println!("No workouts logged yet.");
                return Ok(());
            }
            println!("Training Summary");
            println!("{:-<40}", "");
            for s in history.summaries() {
                println!("{}", s.exercise);
                println!("  Sessions: {} ({:.0}% hit target)", s.sessions, s.success_rate() * 100.0);
                println!("  Best weight: {} kg", s.best_weight);
                println!(
                    "  Last: {} at {} kg on {}",
                    s.last_scheme,
                    s.last_weight,
                    s.last_date.format("%Y-%m-%d")
                );
            }
        }

        Commands::Cardio(command) => {
            let user = user_context(cli.user.as_deref())?;
            run_cardio(&db, &user, command)?;
        }

        // Printed before the database is opened
        Commands::Config => {}
    }

    Ok(())
}

fn kind_of(cardio: bool) -> ExerciseKind {
    if cardio { ExerciseKind::Cardio } else { ExerciseKind::Strength }
}

fn user_context(user: Option<&str>) -> Result<UserContext> {
    let user = user.context("No user given: pass --user or set LIFTLOG_USER")?;
    Ok(UserContext::new(user)?)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn suggest(db: &Database, progression: &Progression, user: &UserContext, exercise: &str) -> Result<Suggestion> {
    if !db.has_exercise(exercise, ExerciseKind::Strength)? {
        return Err(RepositoryError::UnknownExercise {
            name: exercise.trim().to_string(),
            kind: ExerciseKind::Strength,
        }
        .into());
    }
    let last = db.last_workout(user, exercise)?;
    let starting = db.starting_scheme(user, exercise)?;
    Ok(progression.suggest_for(exercise, last.as_ref(), starting.as_deref()))
}

fn print_suggestion(exercise: &str, suggestion: &Suggestion) {
    println!(
        "Suggested {}: {} at {} kg ({} sets × {} reps)",
        exercise, suggestion.scheme, suggestion.weight, suggestion.sets, suggestion.target_reps
    );
    println!("  {}", suggestion.basis.describe());
}

/// Fill unset fields from an explicit scheme, else from the suggestion
fn workout_from_args(args: LogArgs, suggestion: &Suggestion) -> Result<NewWorkout> {
    let explicit = args
        .scheme
        .as_deref()
        .map(|label| {
            Scheme::parse(label).with_context(|| format!("Invalid scheme {label:?}, expected e.g. 3x10"))
        })
        .transpose()?;

    let (sets, target_reps, scheme) = match explicit {
        Some(scheme) => {
            let sets = args.sets.unwrap_or(scheme.sets);
            let target_reps = args.target_reps.unwrap_or(scheme.reps);
            ensure!(
                sets == scheme.sets && target_reps == scheme.reps,
                "--scheme {scheme} contradicts {sets} sets × {target_reps} target reps"
            );
            (sets, target_reps, scheme.label())
        }
        None => {
            let sets = args.sets.unwrap_or(suggestion.sets);
            let target_reps = args.target_reps.unwrap_or(suggestion.target_reps);
            let scheme = if sets == suggestion.sets && target_reps == suggestion.target_reps {
                suggestion.scheme.clone()
            } else {
                Scheme::new(sets, target_reps).label()
            };
            (sets, target_reps, scheme)
        }
    };

    let success = match (args.success, args.fail) {
        (true, _) => true,
        (false, true) => false,
        (false, false) => NewWorkout::success_from_reps(args.achieved_reps, target_reps),
    };

    Ok(NewWorkout {
        exercise: args.exercise.trim().to_string(),
        date: args.date.unwrap_or_else(today),
        weight: args.weight.unwrap_or(suggestion.weight),
        sets,
        target_reps,
        achieved_reps: args.achieved_reps,
        success,
        scheme,
    })
}

fn run_cardio(db: &Database, user: &UserContext, command: CardioCommand) -> Result<()> {
    match command {
        CardioCommand::Log { workout_type, minutes, distance, difficulty, date } => {
            if let Some(last) = db.last_cardio(user, &workout_type)? {
                println!(
                    "Last {}: {} - {} min, {} km",
                    last.workout_type,
                    last.date.format("%Y-%m-%d"),
                    last.time_minutes,
                    last.distance_km
                );
            }
            let cardio = NewCardio {
                workout_type: workout_type.trim().to_string(),
                date: date.unwrap_or_else(today),
                time_minutes: minutes,
                distance_km: distance,
                difficulty,
            };
            let id = db.log_cardio(user, &cardio)?;
            println!(
                "Logged: {} - {} min, {} km (id: {})",
                cardio.workout_type, cardio.time_minutes, cardio.distance_km, id
            );
        }

        CardioCommand::List { workout_type, limit } => {
            let sessions = db.cardio_workouts(user, workout_type.as_deref())?;
            if sessions.is_empty() {
                println!("No cardio sessions logged yet.");
                return Ok(());
            }
            println!("Recent cardio:");
            println!("{:-<60}", "");
            for c in sessions.iter().take(limit) {
                println!(
                    "{} | {:15} | {:>4} min | {:>6.2} km | {}",
                    c.date.format("%Y-%m-%d"),
                    c.workout_type,
                    c.time_minutes,
                    c.distance_km,
                    c.difficulty.as_deref().unwrap_or("-")
                );
            }
        }

        CardioCommand::Last { workout_type } => match db.last_cardio(user, &workout_type)? {
            Some(last) => println!(
                "{} - {} min, {} km, difficulty {}",
                last.date.format("%Y-%m-%d"),
                last.time_minutes,
                last.distance_km,
                last.difficulty.as_deref().unwrap_or("-")
            ),
            None => println!("No previous {} session logged.", workout_type),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlog::progression::ProgressionEngine;

    fn parse_log(args: &[&str]) -> LogArgs {
        let argv = ["liftlog", "log"].iter().chain(args.iter()).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Log(args) => args,
            _ => panic!("expected log command"),
        }
    }

    fn suggestion() -> Suggestion {
        ProgressionEngine::default().suggest_next(None, 2.5, Some("3x10"))
    }

    #[test]
    fn test_log_defaults_from_suggestion() {
        let args = parse_log(&["Squat", "-a", "10", "-d", "2024-03-01"]);
        let workout = workout_from_args(args, &suggestion()).unwrap();
        assert_eq!(workout.weight, 20.0);
        assert_eq!(workout.sets, 3);
        assert_eq!(workout.target_reps, 10);
        assert_eq!(workout.scheme, "3×10");
        assert!(workout.success);
        assert_eq!(workout.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_log_success_derived_from_reps() {
        let args = parse_log(&["Squat", "-a", "8"]);
        assert!(!workout_from_args(args, &suggestion()).unwrap().success);

        let args = parse_log(&["Squat", "-a", "8", "--success"]);
        assert!(workout_from_args(args, &suggestion()).unwrap().success);

        let args = parse_log(&["Squat", "-a", "12", "--fail"]);
        assert!(!workout_from_args(args, &suggestion()).unwrap().success);
    }

    #[test]
    fn test_log_success_and_fail_conflict() {
        let argv = ["liftlog", "log", "Squat", "-a", "8", "--success", "--fail"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_log_overrides_build_scheme() {
        let args = parse_log(&["Squat", "-a", "5", "-w", "60", "-s", "5", "-t", "5"]);
        let workout = workout_from_args(args, &suggestion()).unwrap();
        assert_eq!(workout.weight, 60.0);
        assert_eq!(workout.scheme, "5×5");
    }

    #[test]
    fn test_log_explicit_scheme_normalized() {
        let args = parse_log(&["Squat", "-a", "15", "--scheme", "3 x 15"]);
        assert_eq!(workout_from_args(args, &suggestion()).unwrap().scheme, "3×15");

        let args = parse_log(&["Squat", "-a", "15", "--scheme", "heavy"]);
        assert!(workout_from_args(args, &suggestion()).is_err());
    }

    #[test]
    fn test_log_explicit_scheme_sets_targets() {
        // suggestion is 3×10; the scheme given on the command line wins
        let args = parse_log(&["Squat", "-a", "5", "--scheme", "3x5"]);
        let workout = workout_from_args(args, &suggestion()).unwrap();
        assert_eq!(workout.scheme, "3×5");
        assert_eq!(workout.sets, 3);
        assert_eq!(workout.target_reps, 5);
        assert!(workout.success);

        let args = parse_log(&["Squat", "-a", "5", "--scheme", "5x5", "-s", "5", "-t", "5"]);
        let workout = workout_from_args(args, &suggestion()).unwrap();
        assert_eq!((workout.sets, workout.target_reps), (5, 5));
    }

    #[test]
    fn test_log_scheme_contradicting_targets_rejected() {
        let args = parse_log(&["Squat", "-a", "5", "--scheme", "3x5", "-t", "8"]);
        assert!(workout_from_args(args, &suggestion()).is_err());

        let args = parse_log(&["Squat", "-a", "5", "--scheme", "3x5", "-s", "5"]);
        assert!(workout_from_args(args, &suggestion()).is_err());
    }

    fn setup_db() -> (Database, UserContext) {
        let db = Database::open_in_memory().unwrap();
        db.add_exercise("Squat", ExerciseKind::Strength).unwrap();
        db.add_exercise("Rowing", ExerciseKind::Cardio).unwrap();
        (db, UserContext::new("alice").unwrap())
    }

    fn logged(exercise: &str, day: u32, weight: f64, scheme: &str, success: bool) -> NewWorkout {
        NewWorkout {
            exercise: exercise.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            weight,
            sets: 3,
            target_reps: 10,
            achieved_reps: if success { 10 } else { 6 },
            success,
            scheme: scheme.to_string(),
        }
    }

    #[test]
    fn test_suggest_uses_stored_starting_scheme() {
        let (db, user) = setup_db();
        let progression = Progression::default();

        let s = suggest(&db, &progression, &user, "Squat").unwrap();
        assert_eq!(s.scheme, "3×15");

        db.set_starting_scheme(&user, "Squat", "3×5").unwrap();
        let s = suggest(&db, &progression, &user, "squat").unwrap();
        assert_eq!(s.scheme, "3×5");
        assert_eq!(s.target_reps, 5);
        assert_eq!(s.weight, 20.0);
    }

    #[test]
    fn test_suggest_from_stored_history() {
        let (db, user) = setup_db();
        let progression = Progression::default();
        db.set_starting_scheme(&user, "Squat", "3×15").unwrap();

        // non-canonical label as written by an older client
        db.log_workout(&user, &logged("Squat", 1, 60.0, "3x10", true)).unwrap();
        let s = suggest(&db, &progression, &user, "Squat").unwrap();
        assert_eq!(s.scheme, "3×10");
        assert_eq!(s.weight, 65.0);

        db.log_workout(&user, &logged("Squat", 2, 65.0, "3 x 10", false)).unwrap();
        let s = suggest(&db, &progression, &user, "Squat").unwrap();
        assert_eq!(s.scheme, "3×5");
        assert_eq!(s.weight, 65.0);
    }

    #[test]
    fn test_suggest_requires_strength_exercise() {
        let (db, user) = setup_db();
        let progression = Progression::default();
        for name in ["Rowing", "Sqaut"] {
            let err = suggest(&db, &progression, &user, name).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<RepositoryError>(), Some(RepositoryError::UnknownExercise { .. })),
                "expected unknown exercise for {name}, got {err}"
            );
        }
    }

    #[test]
    fn test_cardio_distance_required() {
        let argv = ["liftlog", "cardio", "log", "Rowing", "-m", "20"];
        assert!(Cli::try_parse_from(argv).is_err());

        let argv = ["liftlog", "cardio", "log", "Rowing", "-m", "20", "-k", "4.5"];
        assert!(Cli::try_parse_from(argv).is_ok());
    }

    #[test]
    fn test_user_context_required() {
        assert!(user_context(None).is_err());
        assert_eq!(user_context(Some("alice")).unwrap().user_id(), "alice");
    }
}

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use liftlog::config::DEFAULT_DATABASE_URL;
use liftlog::db::models::Workout;
use liftlog::logging::{init_logger, parse_level};
use liftlog::{Service, UserId};

#[derive(Parser, Debug)]
#[command(version, about = "Liftlog - workout log admin CLI", long_about = None)]
struct Args {
    /// SQLite database location
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL, global = true)]
    database_url: String,

    /// off, error, warn, info, debug or trace
    #[arg(long, env = "LIFTLOG_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Seed the exercise catalog and the test user
    Seed,
    /// Delete every row from every table
    Reset {
        /// Required; resetting is not reversible
        #[arg(long)]
        yes: bool,
    },
    /// List muscle groups
    MuscleGroups,
    /// List exercise templates
    Exercises {
        #[arg(long)]
        muscle_group: Option<String>,
    },
    /// List a user's workouts, newest first
    Workouts {
        #[arg(long)]
        user: String,
    },
    /// Show one workout with its summary
    Show { id: String },
    /// Mark a workout completed (or not, with --undo)
    Complete {
        id: String,
        #[arg(long)]
        undo: bool,
    },
    /// Delete a workout and its logged exercises
    Delete { id: String },
}

fn print_workout(workout: &Workout) {
    let status = if workout.completed { "done" } else { "open" };
    println!(
        "{}  {}  [{}]  {}",
        workout.id,
        workout.created_at.format("%Y-%m-%d %H:%M"),
        status,
        workout.name
    );
    for exercise in &workout.logged_exercises {
        println!("    {}", exercise);
    }
}

fn print_summary(workout: &Workout) {
    let summary = workout.summary();
    let groups: Vec<&str> = summary
        .muscle_groups
        .iter()
        .map(|g| g.name.as_str())
        .collect();
    println!(
        "    {} exercises, {} sets, muscle groups: {}",
        summary.exercise_count,
        summary.total_sets,
        if groups.is_empty() {
            "-".to_string()
        } else {
            groups.join(", ")
        }
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let Some(level) = parse_level(&args.log_level) else {
        bail!("Unknown log level: {}", args.log_level);
    };
    init_logger(level);
    log::debug!("Using database {}", args.database_url);

    let service = Service::connect(&args.database_url, 1).await?;

    match args.command {
        Commands::Migrate => {
            // Connecting already applied anything pending.
            println!("Database at {} is up to date", args.database_url);
        }
        Commands::Seed => {
            service.seed().await?;
            println!("Seeded catalog and test user");
        }
        Commands::Reset { yes } => {
            if !yes {
                bail!("Refusing to reset without --yes");
            }
            liftlog::db::clear_all_tables(&service.db_pool).await?;
            println!("All tables cleared");
        }
        Commands::MuscleGroups => {
            for group in service.list_muscle_groups().await? {
                println!("{}  {}", group.id, group.name);
            }
        }
        Commands::Exercises { muscle_group } => {
            for template in service
                .list_exercise_templates(muscle_group.as_deref())
                .await?
            {
                let groups: Vec<&str> = template
                    .muscle_groups
                    .iter()
                    .map(|g| g.name.as_str())
                    .collect();
                println!("{}  {} ({})", template.id, template.name, groups.join(", "));
            }
        }
        Commands::Workouts { user } => {
            let user = UserId::parse(Some(user.as_str()))?;
            let workouts = service.list_workouts_for_user(&user).await?;
            if workouts.is_empty() {
                println!("No workouts for {}", user);
            }
            for workout in &workouts {
                print_workout(workout);
                print_summary(workout);
            }
        }
        Commands::Show { id } => {
            let workout = service.get_workout(&id).await?;
            print_workout(&workout);
            print_summary(&workout);
        }
        Commands::Complete { id, undo } => {
            let workout = service.set_completion(&id, !undo).await?;
            print_workout(&workout);
        }
        Commands::Delete { id } => {
            service.delete_workout(&id).await?;
            println!("Deleted workout {}", id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_workouts_for_user() {
        let args = Args::try_parse_from([
            "liftlog",
            "--database-url",
            "sqlite::memory:",
            "workouts",
            "--user",
            "test-user-id",
        ])
        .unwrap();
        assert_eq!(args.database_url, "sqlite::memory:");
        match args.command {
            Commands::Workouts { user } => assert_eq!(user, "test-user-id"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn complete_accepts_undo_flag() {
        let args = Args::try_parse_from(["liftlog", "complete", "w1", "--undo"]).unwrap();
        match args.command {
            Commands::Complete { id, undo } => {
                assert_eq!(id, "w1");
                assert!(undo);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

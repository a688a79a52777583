use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

use client::{HttpLearnerStore, StoreConfig};
use cohort_core::{week_status, Curriculum, Learner, LearnerId, Track, WeekField};
use services::RosterService;

#[derive(Parser)]
#[command(name = "cohort")]
#[command(about = "Admin console for the 7-week intensive training cohort", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List learners with per-week status and overall progress
    List,
    /// Add a learner
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        source_role: String,
        #[arg(long)]
        target_role: String,
        /// Week tracking begins from (defaults to 1)
        #[arg(long)]
        start_week: Option<u8>,
        /// Calendar start date, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    /// Delete a learner and all its progress
    Remove {
        id: LearnerId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Update one week's counters for a learner
    #[command(group(
        ArgGroup::new("field")
            .args(["modules", "assessment"])
            .required(true)
            .multiple(false)
    ))]
    SetWeek {
        id: LearnerId,
        week: u8,
        /// Modules completed this week
        #[arg(long)]
        modules: Option<i64>,
        /// Assessment percentage for this week
        #[arg(long)]
        assessment: Option<i64>,
    },
    /// Set or clear a learner's calendar start date
    #[command(group(
        ArgGroup::new("value")
            .args(["date", "clear"])
            .required(true)
            .multiple(false)
    ))]
    SetStartDate {
        id: LearnerId,
        /// YYYY-MM-DD
        date: Option<NaiveDate>,
        /// Unset the start date
        #[arg(long)]
        clear: bool,
    },
    /// Print the week-by-week schedule for a career track
    Schedule {
        #[arg(long, value_enum, default_value = "engineer")]
        track: TrackArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrackArg {
    Engineer,
    Architect,
}

impl From<TrackArg> for Track {
    fn from(arg: TrackArg) -> Self {
        match arg {
            TrackArg::Engineer => Track::Engineer,
            TrackArg::Architect => Track::Architect,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Schedule { track } => print_schedule(track.into()),
        Commands::List => {
            let roster = connect().await?;
            let learners = roster.learners()?;
            if learners.is_empty() {
                println!("No learners yet. Add one with `cohort add`.");
            }
            for learner in &learners {
                print_learner(learner);
            }
        }
        Commands::Add {
            name,
            source_role,
            target_role,
            start_week,
            start_date,
        } => {
            let roster = connect().await?;
            let created = roster
                .create(name, source_role, target_role, start_week, start_date)
                .await?;
            println!("Added learner #{} {}.", created.id, created.name);
        }
        Commands::Remove { id, yes } => {
            let roster = connect().await?;
            let Some(learner) = roster.learner(id)? else {
                bail!("no learner with id {id}");
            };
            let prompt = format!("Delete {} and all its progress? [y/N] ", learner.name);
            if !yes && !confirm(&prompt)? {
                println!("Aborted.");
                return Ok(());
            }
            roster.remove(id).await?;
            println!("Deleted learner {}.", learner.name);
        }
        Commands::SetWeek {
            id,
            week,
            modules,
            assessment,
        } => {
            let roster = connect().await?;
            let (field, value) = match (modules, assessment) {
                (Some(value), None) => (WeekField::ModulesCompleted, value),
                (None, Some(value)) => (WeekField::AssessmentPct, value),
                _ => bail!("pass exactly one of --modules or --assessment"),
            };
            let updated = roster.update_week(id, week, field, value).await?;
            if let Some(entry) = updated.progress.iter().find(|w| w.week == week) {
                println!(
                    "Week {} of {}: {}/{} modules · {}% assessment · {}",
                    week,
                    updated.name,
                    entry.modules_completed,
                    entry.total_modules,
                    entry.assessment_pct,
                    week_status(updated.start_week, entry)
                );
            }
            println!(
                "Overall: {:.0}% ({}/{} modules)",
                updated.overall_progress_pct,
                updated.overall_modules_completed,
                updated.overall_modules_total
            );
        }
        Commands::SetStartDate { id, date, clear } => {
            let roster = connect().await?;
            let start_date = if clear { None } else { date };
            let updated = roster.set_start_date(id, start_date).await?;
            match updated.start_date {
                Some(date) => println!("{} now starts on {date}.", updated.name),
                None => println!("Start date cleared for {}.", updated.name),
            }
        }
    }

    Ok(())
}

/// Wire the env-configured HTTP store into a freshly loaded roster.
async fn connect() -> Result<RosterService> {
    let config = StoreConfig::from_env();
    let store = Arc::new(HttpLearnerStore::new(config));
    let roster = RosterService::new(store, Curriculum::default_bootcamp());
    roster
        .load()
        .await
        .context("failed to load learners from the store")?;
    Ok(roster)
}

fn print_learner(learner: &Learner) {
    println!(
        "#{} {} · {} → {}",
        learner.id, learner.name, learner.source_role, learner.target_role
    );
    match learner.start_date {
        Some(date) => println!("   starting week {} ({date})", learner.start_week),
        None => println!("   starting week {}", learner.start_week),
    }
    println!(
        "   overall {:.0}% · {}/{} modules",
        learner.overall_progress_pct,
        learner.overall_modules_completed,
        learner.overall_modules_total
    );
    for week in &learner.progress {
        println!(
            "   week {}: {}/{} modules · {:>3}% assessment · {}",
            week.week,
            week.modules_completed,
            week.total_modules,
            week.assessment_pct,
            week_status(learner.start_week, week)
        );
    }
}

fn print_schedule(track: Track) {
    println!("{}", track.label());
    for entry in track.weeks() {
        println!("  Week {} · {}", entry.week, entry.title);
        println!("           {} · Assessment on Friday", entry.meta);
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

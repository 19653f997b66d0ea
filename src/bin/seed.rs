use std::{path::PathBuf, sync::Arc};

use chrono::{Duration, Utc};
use clap::{Parser, ValueEnum};

use gfis_board::{
    config::Settings,
    domain::{Announcement, Audience, Category},
    repository::{AnnouncementRepository, JsonFileRepository, RestTableRepository},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Local,
    Remote,
}

/// Fill the announcement store with sample posts.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Store to write to
    #[arg(long, value_enum, default_value = "local")]
    backend: Backend,

    /// Directory of the local JSON store (defaults to storage.data_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Remove existing announcements first
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Seeding announcements...");

    let settings = Settings::new().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    let repo: Arc<dyn AnnouncementRepository> = match args.backend {
        Backend::Local => {
            let dir = args
                .data_dir
                .unwrap_or_else(|| PathBuf::from(&settings.storage.data_dir));
            let repo = JsonFileRepository::new(&dir);
            println!("📁 Local store: {}", repo.path().display());
            Arc::new(repo)
        }
        Backend::Remote => {
            let remote = settings
                .remote
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--backend remote needs remote.url and remote.anon_key"))?;
            println!("☁️  Hosted table: {} at {}", remote.table, remote.url);
            Arc::new(RestTableRepository::new(remote))
        }
    };

    if args.clear {
        let existing = repo.list().await?;
        for announcement in &existing {
            repo.remove(announcement.id).await?;
        }
        println!("  🧹 Removed {} existing announcements", existing.len());
    }

    let now = Utc::now();
    let samples = [
        (
            "Welcome Back to School!",
            "Classes for the new school year begin Monday. Please check your schedules on the portal.",
            Category::General,
            Audience::All,
            None,
            Duration::days(6),
        ),
        (
            "Intramurals Week",
            "Sign up with your class adviser for basketball, volleyball and chess.",
            Category::Event,
            Audience::Students,
            Some(Duration::days(14)),
            Duration::days(4),
        ),
        (
            "Midterm Examination Schedule",
            "Midterm exams run from Monday to Thursday. Bring your exam permit.",
            Category::Academic,
            Audience::Students,
            Some(Duration::days(21)),
            Duration::days(3),
        ),
        (
            "Class Suspension Due to Typhoon",
            "Classes at all levels are suspended tomorrow. Stay safe and monitor official channels.",
            Category::Urgent,
            Audience::All,
            None,
            Duration::days(1),
        ),
        (
            "Faculty Meeting",
            "All faculty are requested to attend the grading review in the AVR at 3 PM.",
            Category::General,
            Audience::FacultyOnly,
            Some(Duration::days(2)),
            Duration::hours(5),
        ),
    ];

    for (title, content, category, audience, event_in, posted_ago) in samples {
        let date = now - posted_ago;
        let announcement = Announcement {
            id: 0,
            title: title.to_string(),
            content: content.to_string(),
            category,
            audience,
            date,
            event_date: event_in.map(|d| now + d),
            updated_at: None,
        };
        let saved = repo.insert(announcement).await?;
        println!("  ✅ {} ({}, {})", saved.title, saved.category, saved.audience);
    }

    println!("✨ Seeded {} announcements", samples.len());
    println!();
    println!("Sign in as admin@gfis.edu.ph to manage them, or any other @gfis.edu.ph address as a student.");

    Ok(())
}

mod ai;
mod analytics;
mod db;
mod models;
mod scoring;
mod tui;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use db::Database;
use models::{parse_string_list, StoredJson, APPLICATION_STATUSES, JOB_STATUSES};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Personal job-search tracker - jobs, applications, fit scores, analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Manage discovered job postings
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Manage tracked applications
    App {
        #[command(subcommand)]
        command: AppCommands,
    },

    /// Manage the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Generate tailored resume suggestions for a job
    Tailor {
        /// Job ID
        job_id: i64,

        /// Model to use (llama3, llama3-70b, gpt-4o, gpt-4o-mini, claude-sonnet, claude-haiku)
        #[arg(short, long, default_value = "llama3")]
        model: String,
    },

    /// Re-analyze all active jobs against the current profile
    Analyze {
        /// Model to use
        #[arg(short, long, default_value = "llama3")]
        model: String,
    },

    /// Show dashboard analytics
    Stats {
        /// Only count applications from the last N days
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// Browse jobs interactively
    Browse {
        /// Filter by status (New, Interested, Applied, Archived)
        #[arg(short, long)]
        status: Option<String>,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Add a job posting
    Add {
        title: String,
        company: String,
        /// Posting URL (unique)
        url: String,

        #[arg(short, long)]
        location: Option<String>,

        /// Path to a file with the raw job description
        #[arg(short, long)]
        description_file: Option<PathBuf>,
    },

    /// List jobs
    List {
        /// Filter by status (New, Interested, Applied, Archived)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show job details
    Show {
        /// Job ID
        id: i64,
    },

    /// Set a job's status; "Applied" also files an application
    Status {
        /// Job ID
        id: i64,
        /// New status (New, Interested, Applied, Archived)
        status: String,
    },

    /// Delete a job
    Delete {
        /// Job ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum AppCommands {
    /// Add an application (status starts at Interested)
    Add {
        company: String,
        job_title: String,

        #[arg(short, long)]
        link: Option<String>,

        /// Application date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List applications
    List,

    /// Show application details
    Show {
        /// Application ID
        id: i64,
    },

    /// Move an application to a new pipeline stage
    Status {
        /// Application ID
        id: i64,
        /// New status (Interested, Applied, Resume Shortlisted, OA Qualified,
        /// Interviewing, HR Interview, Offer, Rejected)
        status: String,
    },

    /// Edit an application
    Edit {
        /// Application ID
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        company: Option<String>,

        #[arg(short, long)]
        link: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the stored profile
    Show,

    /// Set profile fields; omitted fields are left unchanged
    Set {
        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        summary: Option<String>,

        /// Serialized experience entries (JSON)
        #[arg(long)]
        experience: Option<String>,

        /// Serialized education entries (JSON)
        #[arg(long)]
        education: Option<String>,

        /// Serialized project entries (JSON)
        #[arg(long)]
        projects: Option<String>,

        /// Serialized skill list (JSON)
        #[arg(long)]
        skills: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let db = Database::open()?;

    match cli.command {
        Commands::Init => {
            db.init()?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::Job { command } => {
            db.ensure_initialized()?;
            run_job_command(&db, command)?;
        }

        Commands::App { command } => {
            db.ensure_initialized()?;
            run_app_command(&db, command)?;
        }

        Commands::Profile { command } => {
            db.ensure_initialized()?;
            run_profile_command(&db, command)?;
        }

        Commands::Tailor { job_id, model } => {
            db.ensure_initialized()?;
            let spec = ai::resolve_model(&model)?;
            let provider = ai::create_provider(&spec)?;

            let suggestions = scoring::generate_resume_suggestions(&db, provider.as_ref(), job_id)?;
            println!("Suggestions for job #{}:\n", job_id);
            println!("Summary:");
            println!("{}\n", textwrap::fill(&suggestions.tailored_summary, 78));
            println!("Bullet points:");
            for bullet in &suggestions.suggested_bullet_points {
                println!("  - {}", textwrap::fill(bullet, 74).replace('\n', "\n    "));
            }
        }

        Commands::Analyze { model } => {
            db.ensure_initialized()?;
            let spec = ai::resolve_model(&model)?;
            let provider = ai::create_provider(&spec)?;

            println!("Starting re-analysis of all jobs ({})...", spec.short_name);
            let updated = scoring::reanalyze_all_jobs(&db, provider.as_ref())?;
            println!("\nSuccessfully re-analyzed {} job(s).", updated);
        }

        Commands::Stats { days } => {
            db.ensure_initialized()?;
            let jobs = db.list_jobs(None)?;
            let applications = db.list_applications()?;
            let today = chrono::Local::now().date_naive();
            let snapshot = analytics::snapshot(&jobs, &applications, days, today);
            print_stats(&snapshot, days);
        }

        Commands::Browse { status } => {
            db.ensure_initialized()?;
            if let Some(s) = &status {
                validate_job_status(s)?;
            }
            tui::run_browse(&db, status.as_deref())?;
        }
    }

    Ok(())
}

fn run_job_command(db: &Database, command: JobCommands) -> Result<()> {
    match command {
        JobCommands::Add {
            title,
            company,
            url,
            location,
            description_file,
        } => {
            let description = match &description_file {
                Some(path) => Some(std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read description file: {}", path.display())
                })?),
                None => None,
            };
            let id = db.insert_job(
                &title,
                &company,
                location.as_deref(),
                &url,
                description.as_deref(),
            )?;
            println!("Added job #{}", id);
        }

        JobCommands::List { status } => {
            if let Some(s) = &status {
                validate_job_status(s)?;
            }
            let jobs = db.list_jobs(status.as_deref())?;
            if jobs.is_empty() {
                println!("No jobs found.");
                return Ok(());
            }
            println!(
                "{:<6} {:<12} {:>6} {:<32} {:<20}",
                "ID", "STATUS", "SCORE", "TITLE", "COMPANY"
            );
            println!("{}", "-".repeat(80));
            for job in jobs {
                let score = job
                    .match_score
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<6} {:<12} {:>6} {:<32} {:<20}",
                    job.id,
                    job.status.as_deref().unwrap_or("New"),
                    score,
                    truncate(&job.title, 30),
                    truncate(&job.company, 18)
                );
            }
        }

        JobCommands::Show { id } => {
            let Some(job) = db.get_job(id)? else {
                println!("Job #{} not found.", id);
                return Ok(());
            };
            println!("Job #{}", job.id);
            println!("Title: {}", job.title);
            println!("Company: {}", job.company);
            if let Some(location) = &job.location {
                println!("Location: {}", location);
            }
            println!("Status: {}", job.status.as_deref().unwrap_or("New"));
            println!("URL: {}", job.url);
            println!("Found: {}", job.date_found);
            if let Some(score) = job.match_score {
                println!("Match score: {}", score);
            }
            if let Some(summary) = &job.match_summary {
                println!("Match summary: {}", summary);
            }
            print_skill_list("Matching skills", job.matching_skills.as_deref());
            print_skill_list("Missing skills", job.missing_skills.as_deref());
            if let Some(salary) = &job.salary_range {
                println!("Salary range: {}", salary);
            }
            if let Some(suggestions) = &job.tailored_suggestions {
                println!("Resume suggestions: {}", suggestions);
            }
            if let Some(raw) = &job.raw_description {
                println!("\n--- Description ---\n{}", raw);
            }
        }

        JobCommands::Status { id, status } => {
            validate_job_status(&status)?;
            let today = chrono::Local::now().date_naive();
            db.update_job_status(id, &status, today)?;
            if status == "Applied" {
                println!("Job #{} marked Applied; application filed in the tracker.", id);
            } else {
                println!("Job #{} status set to {}.", id, status);
            }
        }

        JobCommands::Delete { id } => {
            db.delete_job(id)?;
            println!("Deleted job #{}", id);
        }
    }
    Ok(())
}

fn run_app_command(db: &Database, command: AppCommands) -> Result<()> {
    match command {
        AppCommands::Add {
            company,
            job_title,
            link,
            date,
            notes,
        } => {
            let date = date
                .map(|d| {
                    NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", d))
                })
                .transpose()?;
            let id = db.insert_application(
                &company,
                &job_title,
                link.as_deref(),
                date,
                notes.as_deref(),
            )?;
            println!("Added application #{} ({} at {})", id, job_title, company);
        }

        AppCommands::List => {
            let apps = db.list_applications()?;
            if apps.is_empty() {
                println!("No applications found.");
                return Ok(());
            }
            println!(
                "{:<6} {:<20} {:<28} {:<22} {:<12}",
                "ID", "STATUS", "TITLE", "COMPANY", "DATE"
            );
            println!("{}", "-".repeat(92));
            for app in apps {
                let date = app
                    .application_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<6} {:<20} {:<28} {:<22} {:<12}",
                    app.id,
                    app.status,
                    truncate(&app.job_title, 26),
                    truncate(&app.company, 20),
                    date
                );
            }
        }

        AppCommands::Show { id } => {
            let Some(app) = db.get_application(id)? else {
                println!("Application #{} not found.", id);
                return Ok(());
            };
            println!("Application #{}", app.id);
            println!("Title: {}", app.job_title);
            println!("Company: {}", app.company);
            println!("Status: {}", app.status);
            if let Some(link) = &app.application_link {
                println!("Link: {}", link);
            }
            if let Some(date) = app.application_date {
                println!("Applied: {}", date);
            }
            if let Some(notes) = &app.notes {
                println!("Notes: {}", notes);
            }
        }

        AppCommands::Status { id, status } => {
            if !models::is_valid_application_status(&status) {
                return Err(anyhow!(
                    "Invalid application status '{}'. Valid: {}",
                    status,
                    APPLICATION_STATUSES.join(", ")
                ));
            }
            db.update_application_status(id, &status)?;
            println!("Application #{} moved to {}.", id, status);
        }

        AppCommands::Edit {
            id,
            title,
            company,
            link,
            notes,
        } => {
            db.update_application(
                id,
                title.as_deref(),
                company.as_deref(),
                link.as_deref(),
                notes.as_deref(),
            )?;
            println!("Application #{} updated.", id);
        }
    }
    Ok(())
}

fn run_profile_command(db: &Database, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Show => {
            let Some(profile) = db.get_profile()? else {
                println!("No profile saved. Run 'jobtrack profile set' first.");
                return Ok(());
            };
            println!("Name: {}", profile.full_name.as_deref().unwrap_or("-"));
            println!("Summary: {}", profile.summary.as_deref().unwrap_or("-"));
            println!("Experience: {}", profile.experience.as_deref().unwrap_or("-"));
            println!("Education: {}", profile.education.as_deref().unwrap_or("-"));
            println!("Projects: {}", profile.projects.as_deref().unwrap_or("-"));
            println!("Skills: {}", profile.skills.as_deref().unwrap_or("-"));
        }

        ProfileCommands::Set {
            full_name,
            summary,
            experience,
            education,
            projects,
            skills,
        } => {
            db.save_profile(
                full_name.as_deref(),
                summary.as_deref(),
                experience.as_deref(),
                education.as_deref(),
                projects.as_deref(),
                skills.as_deref(),
            )?;
            println!("Profile updated.");
        }
    }
    Ok(())
}

fn validate_job_status(status: &str) -> Result<()> {
    if models::is_valid_job_status(status) {
        Ok(())
    } else {
        Err(anyhow!(
            "Invalid job status '{}'. Valid: {}",
            status,
            JOB_STATUSES.join(", ")
        ))
    }
}

fn print_skill_list(label: &str, stored: Option<&str>) {
    match parse_string_list(stored) {
        StoredJson::Parsed(skills) if !skills.is_empty() => {
            println!("{}: {}", label, skills.join(", "));
        }
        StoredJson::Raw(raw) => println!("{}: {}", label, raw),
        _ => {}
    }
}

fn print_stats(snapshot: &analytics::AnalyticsSnapshot, days: Option<i64>) {
    match days {
        Some(d) => println!("=== Analytics (applications from the last {} days) ===\n", d),
        None => println!("=== Analytics ===\n"),
    }

    let s = &snapshot.summary;
    println!("Jobs tracked:        {}", s.total_jobs);
    println!("Applications:        {}", s.total_applications);
    println!("Applied or further:  {}", s.applied_jobs);
    println!("Interviews:          {}", s.interviews);
    println!("Offers:              {}", s.offers);
    println!("Conversion rate:     {}%", s.conversion_rate);
    println!("Companies (jobs):    {}", s.unique_companies_jobs);
    println!("Companies (apps):    {}", s.unique_companies_apps);

    let m = &snapshot.scores;
    println!("\n--- Match scores ---");
    if m.scored_count == 0 {
        println!("No scored jobs yet. Run 'jobtrack analyze'.");
    } else {
        println!(
            "Scored: {} of {} jobs ({}%)",
            m.scored_count, s.total_jobs, m.scored_pct
        );
        println!(
            "Average: {}%   Highest: {:.0}%   Lowest: {:.0}%",
            m.average, m.highest, m.lowest
        );
        for band in &snapshot.score_bands {
            println!("  {:<20} {:>3}  ({:.1}%)", band.label, band.count, band.percentage);
        }
    }

    if !snapshot.score_distribution.is_empty() {
        println!("\n--- Score distribution ---");
        for point in &snapshot.score_distribution {
            println!("  {:<6} {:>3}", point.name, point.count);
        }
    }

    if !snapshot.status_distribution.is_empty() {
        println!("\n--- Job statuses ---");
        for status in &snapshot.status_distribution {
            println!("  {:<20} {:>3}", status.name, status.count);
        }
    }

    if !snapshot.funnel.is_empty() {
        println!("\n--- Application funnel ---");
        for stage in &snapshot.funnel {
            println!("  {:<20} {:>3}", stage.name, stage.count);
        }
    }

    if !snapshot.job_companies.is_empty() {
        println!("\n--- Top companies (jobs) ---");
        for company in &snapshot.job_companies {
            println!("  {:<24} {:>3}", truncate(&company.name, 22), company.count);
        }
    }

    if !snapshot.application_companies.is_empty() {
        println!("\n--- Top companies (applications) ---");
        for company in &snapshot.application_companies {
            println!("  {:<24} {:>3}", truncate(&company.name, 22), company.count);
        }
    }

    if !snapshot.timeline.is_empty() {
        println!("\n--- Applications per month ---");
        for point in &snapshot.timeline {
            println!("  {:<8} {:>3}", point.month, point.count);
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

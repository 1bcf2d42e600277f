use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

use crate::models::{Application, Job, UserProfile};

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        Ok(Self { conn, path })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
            Ok(proj_dirs.data_dir().join("jobtrack.db"))
        } else {
            Ok(PathBuf::from("jobtrack.db"))
        }
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date_found TEXT NOT NULL DEFAULT (datetime('now')),
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT,
                url TEXT NOT NULL UNIQUE,
                status TEXT DEFAULT 'New',
                raw_description TEXT,
                match_score INTEGER,
                match_summary TEXT,
                matching_skills TEXT,
                missing_skills TEXT,
                salary_range TEXT,
                company_info TEXT,
                tailored_suggestions TEXT
            );

            CREATE TABLE IF NOT EXISTS applications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                company TEXT NOT NULL,
                job_title TEXT NOT NULL,
                application_link TEXT,
                status TEXT NOT NULL DEFAULT 'Interested',
                application_date TEXT,
                notes TEXT
            );

            CREATE TABLE IF NOT EXISTS user_profile (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                full_name TEXT,
                summary TEXT,
                experience TEXT,
                education TEXT,
                projects TEXT,
                skills TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
            CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status);
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='jobs'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!("Database not initialized. Run 'jobtrack init' first."));
        }
        Ok(())
    }

    // --- Job operations ---

    pub fn insert_job(
        &self,
        title: &str,
        company: &str,
        location: Option<&str>,
        url: &str,
        raw_description: Option<&str>,
    ) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO jobs (title, company, location, url, raw_description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![title, company, location, url, raw_description],
            )
            .with_context(|| format!("Failed to insert job for URL {}", url))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_jobs(&self, status: Option<&str>) -> Result<Vec<Job>> {
        let mut sql = String::from(
            "SELECT id, date_found, title, company, location, url, status, raw_description,
                    match_score, match_summary, matching_skills, missing_skills,
                    salary_range, company_info, tailored_suggestions
             FROM jobs",
        );
        if status.is_some() {
            sql.push_str(" WHERE status = ?1");
        }
        sql.push_str(" ORDER BY date_found DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = if let Some(s) = status {
            stmt.query_map([s], Self::row_to_job)?
        } else {
            stmt.query_map([], Self::row_to_job)?
        };

        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list jobs")
    }

    pub fn get_job(&self, id: i64) -> Result<Option<Job>> {
        let result = self.conn.query_row(
            "SELECT id, date_found, title, company, location, url, status, raw_description,
                    match_score, match_summary, matching_skills, missing_skills,
                    salary_range, company_info, tailored_suggestions
             FROM jobs WHERE id = ?1",
            [id],
            Self::row_to_job,
        );
        match result {
            Ok(job) => Ok(Some(job)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a job's status. Moving a job to "Applied" also synthesizes an
    /// Application row (title, company, link from the job; dated `today`).
    /// Both writes go through one transaction.
    pub fn update_job_status(&self, id: i64, status: &str, today: NaiveDate) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        let job: Option<(String, String, String)> = tx
            .query_row(
                "SELECT title, company, url FROM jobs WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let (title, company, url) = job.ok_or_else(|| anyhow!("Job #{} not found", id))?;

        tx.execute(
            "UPDATE jobs SET status = ?1 WHERE id = ?2",
            params![status, id],
        )?;

        if status == "Applied" {
            tx.execute(
                "INSERT INTO applications (company, job_title, application_link, status, application_date)
                 VALUES (?1, ?2, ?3, 'Applied', ?4)",
                params![company, title, url, today.to_string()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn update_job_analysis(
        &self,
        id: i64,
        match_score: i64,
        match_summary: &str,
        matching_skills: &str,
        missing_skills: &str,
        salary_range: Option<&str>,
        company_info: Option<&str>,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE jobs SET match_score = ?1, match_summary = ?2, matching_skills = ?3,
                             missing_skills = ?4, salary_range = ?5, company_info = ?6
             WHERE id = ?7",
            params![
                match_score,
                match_summary,
                matching_skills,
                missing_skills,
                salary_range,
                company_info,
                id
            ],
        )?;
        Ok(())
    }

    pub fn update_job_suggestions(&self, id: i64, suggestions: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE jobs SET tailored_suggestions = ?1 WHERE id = ?2",
            params![suggestions, id],
        )?;
        Ok(())
    }

    pub fn delete_job(&self, id: i64) -> Result<()> {
        self.conn.execute("DELETE FROM jobs WHERE id = ?1", [id])?;
        Ok(())
    }

    fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<Job> {
        Ok(Job {
            id: row.get(0)?,
            date_found: row.get(1)?,
            title: row.get(2)?,
            company: row.get(3)?,
            location: row.get(4)?,
            url: row.get(5)?,
            status: row.get(6)?,
            raw_description: row.get(7)?,
            match_score: row.get(8)?,
            match_summary: row.get(9)?,
            matching_skills: row.get(10)?,
            missing_skills: row.get(11)?,
            salary_range: row.get(12)?,
            company_info: row.get(13)?,
            tailored_suggestions: row.get(14)?,
        })
    }

    // --- Application operations ---

    pub fn insert_application(
        &self,
        company: &str,
        job_title: &str,
        application_link: Option<&str>,
        application_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO applications (company, job_title, application_link, status, application_date, notes)
             VALUES (?1, ?2, ?3, 'Interested', ?4, ?5)",
            params![
                company,
                job_title,
                application_link,
                application_date.map(|d| d.to_string()),
                notes
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_applications(&self) -> Result<Vec<Application>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company, job_title, application_link, status, application_date, notes
             FROM applications ORDER BY application_date DESC, id DESC",
        )?;
        let rows = stmt.query_map([], Self::row_to_application)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list applications")
    }

    pub fn get_application(&self, id: i64) -> Result<Option<Application>> {
        let result = self.conn.query_row(
            "SELECT id, company, job_title, application_link, status, application_date, notes
             FROM applications WHERE id = ?1",
            [id],
            Self::row_to_application,
        );
        match result {
            Ok(app) => Ok(Some(app)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_application_status(&self, id: i64, status: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE applications SET status = ?1 WHERE id = ?2",
            params![status, id],
        )?;
        if changed == 0 {
            return Err(anyhow!("Application #{} not found", id));
        }
        Ok(())
    }

    pub fn update_application(
        &self,
        id: i64,
        job_title: Option<&str>,
        company: Option<&str>,
        application_link: Option<&str>,
        notes: Option<&str>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE applications SET
                job_title = COALESCE(?1, job_title),
                company = COALESCE(?2, company),
                application_link = COALESCE(?3, application_link),
                notes = COALESCE(?4, notes)
             WHERE id = ?5",
            params![job_title, company, application_link, notes, id],
        )?;
        if changed == 0 {
            return Err(anyhow!("Application #{} not found", id));
        }
        Ok(())
    }

    fn row_to_application(row: &rusqlite::Row) -> rusqlite::Result<Application> {
        let date_str: Option<String> = row.get(5)?;
        Ok(Application {
            id: row.get(0)?,
            company: row.get(1)?,
            job_title: row.get(2)?,
            application_link: row.get(3)?,
            status: row.get(4)?,
            application_date: date_str
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            notes: row.get(6)?,
        })
    }

    // --- Profile operations (singleton row, id = 1) ---

    pub fn get_profile(&self) -> Result<Option<UserProfile>> {
        let result = self.conn.query_row(
            "SELECT id, full_name, summary, experience, education, projects, skills
             FROM user_profile WHERE id = 1",
            [],
            |row| {
                Ok(UserProfile {
                    id: row.get(0)?,
                    full_name: row.get(1)?,
                    summary: row.get(2)?,
                    experience: row.get(3)?,
                    education: row.get(4)?,
                    projects: row.get(5)?,
                    skills: row.get(6)?,
                })
            },
        );
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Partial upsert: None leaves the stored column untouched.
    pub fn save_profile(
        &self,
        full_name: Option<&str>,
        summary: Option<&str>,
        experience: Option<&str>,
        education: Option<&str>,
        projects: Option<&str>,
        skills: Option<&str>,
    ) -> Result<()> {
        self.conn
            .execute("INSERT OR IGNORE INTO user_profile (id) VALUES (1)", [])?;
        self.conn.execute(
            "UPDATE user_profile SET
                full_name = COALESCE(?1, full_name),
                summary = COALESCE(?2, summary),
                experience = COALESCE(?3, experience),
                education = COALESCE(?4, education),
                projects = COALESCE(?5, projects),
                skills = COALESCE(?6, skills)
             WHERE id = 1",
            params![full_name, summary, experience, education, projects, skills],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_insert_and_get_job() {
        let db = test_db();
        let id = db
            .insert_job(
                "Backend Engineer",
                "Acme",
                Some("Remote"),
                "https://acme.example/jobs/1",
                Some("Build services."),
            )
            .unwrap();

        let job = db.get_job(id).unwrap().unwrap();
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.company, "Acme");
        assert_eq!(job.status.as_deref(), Some("New"));
        assert!(job.match_score.is_none());
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let db = test_db();
        db.insert_job("A", "X", None, "https://x.example/1", None)
            .unwrap();
        let dup = db.insert_job("B", "Y", None, "https://x.example/1", None);
        assert!(dup.is_err());
    }

    #[test]
    fn test_status_applied_synthesizes_application() {
        let db = test_db();
        let id = db
            .insert_job(
                "Platform Engineer",
                "Acme",
                None,
                "https://acme.example/jobs/2",
                None,
            )
            .unwrap();

        db.update_job_status(id, "Applied", today()).unwrap();

        let job = db.get_job(id).unwrap().unwrap();
        assert_eq!(job.status.as_deref(), Some("Applied"));

        let apps = db.list_applications().unwrap();
        assert_eq!(apps.len(), 1);
        let app = &apps[0];
        assert_eq!(app.status, "Applied");
        assert_eq!(app.job_title, "Platform Engineer");
        assert_eq!(app.company, "Acme");
        assert_eq!(
            app.application_link.as_deref(),
            Some("https://acme.example/jobs/2")
        );
        assert_eq!(app.application_date, Some(today()));
    }

    #[test]
    fn test_other_status_changes_do_not_create_applications() {
        let db = test_db();
        let id = db
            .insert_job("Eng", "Acme", None, "https://acme.example/jobs/3", None)
            .unwrap();

        db.update_job_status(id, "Interested", today()).unwrap();
        db.update_job_status(id, "Archived", today()).unwrap();

        assert!(db.list_applications().unwrap().is_empty());
    }

    #[test]
    fn test_update_job_status_missing_job() {
        let db = test_db();
        let err = db.update_job_status(42, "Applied", today());
        assert!(err.is_err());
        assert!(db.list_applications().unwrap().is_empty());
    }

    #[test]
    fn test_manual_application_defaults_to_interested() {
        let db = test_db();
        let id = db
            .insert_application("Beta Corp", "SRE", None, None, Some("referral"))
            .unwrap();
        let app = db.get_application(id).unwrap().unwrap();
        assert_eq!(app.status, "Interested");
        assert!(app.application_date.is_none());
    }

    #[test]
    fn test_application_edit_partial() {
        let db = test_db();
        let id = db
            .insert_application("Beta Corp", "SRE", None, Some(today()), None)
            .unwrap();
        db.update_application(id, None, Some("Beta Corporation"), None, Some("followed up"))
            .unwrap();
        let app = db.get_application(id).unwrap().unwrap();
        assert_eq!(app.company, "Beta Corporation");
        assert_eq!(app.job_title, "SRE");
        assert_eq!(app.notes.as_deref(), Some("followed up"));
    }

    #[test]
    fn test_profile_partial_upsert() {
        let db = test_db();
        assert!(db.get_profile().unwrap().is_none());

        db.save_profile(Some("Ada"), Some("Systems engineer"), None, None, None, None)
            .unwrap();
        db.save_profile(None, None, None, None, None, Some(r#"["Rust","SQL"]"#))
            .unwrap();

        let profile = db.get_profile().unwrap().unwrap();
        assert_eq!(profile.id, 1);
        assert_eq!(profile.full_name.as_deref(), Some("Ada"));
        assert_eq!(profile.summary.as_deref(), Some("Systems engineer"));
        assert_eq!(profile.skills.as_deref(), Some(r#"["Rust","SQL"]"#));
    }

    #[test]
    fn test_analysis_write_back_and_overwrite() {
        let db = test_db();
        let id = db
            .insert_job("Eng", "Acme", None, "https://acme.example/jobs/4", None)
            .unwrap();

        db.update_job_analysis(id, 7, "Decent fit.", r#"["Rust"]"#, r#"["Go"]"#, None, None)
            .unwrap();
        db.update_job_analysis(
            id,
            9,
            "Strong fit.",
            r#"["Rust","SQL"]"#,
            "[]",
            Some("$150k-$180k"),
            Some(r#"{"industry":"Fintech"}"#),
        )
        .unwrap();

        let job = db.get_job(id).unwrap().unwrap();
        assert_eq!(job.match_score, Some(9));
        assert_eq!(job.match_summary.as_deref(), Some("Strong fit."));
        assert_eq!(job.salary_range.as_deref(), Some("$150k-$180k"));
    }
}

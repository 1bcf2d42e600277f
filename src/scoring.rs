//! Write-side workflow: build a prompt from the profile and a job
//! description, ask the model for JSON matching a fixed schema, and persist
//! the structured result on the job row.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ai::AIProvider;
use crate::db::Database;
use crate::models::{stringify_list, stringify_map, Job, UserProfile};

/// Job descriptions are truncated to this many characters before prompting.
const DESCRIPTION_LIMIT: usize = 5000;

const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSuggestions {
    pub tailored_summary: String,
    pub suggested_bullet_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFitAnalysis {
    pub match_score: i64,
    pub match_summary: String,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub company_info: Option<BTreeMap<String, String>>,
}

fn truncate_description(text: &str) -> &str {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

fn profile_field(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("(not provided)")
}

fn build_suggestions_prompt(profile: &UserProfile, description: &str) -> String {
    format!(
        "You are an expert resume writer. Your task is to tailor a candidate's resume for a specific job.\n\
         Use the provided candidate profile and job description to generate a new professional summary and 3-5 impactful bullet points.\n\
         CANDIDATE PROFILE:\n\
         - Summary: {}\n\
         - Experience: {}\n\
         - Skills: {}\n\
         - Education: {}\n\
         JOB DESCRIPTION:\n\
         ---\n\
         {}\n\
         ---\n\
         YOUR TASK: Respond with ONLY a JSON object containing 'tailored_summary' (string) and \
         'suggested_bullet_points' (array of 3-5 strings). No other text.",
        profile_field(&profile.summary),
        profile_field(&profile.experience),
        profile_field(&profile.skills),
        profile_field(&profile.education),
        truncate_description(description),
    )
}

fn build_fit_prompt(profile: &UserProfile, description: &str) -> String {
    format!(
        "You are a world-class career coach. Analyze the candidate's profile against the provided job description and provide a detailed fit analysis.\n\
         CANDIDATE PROFILE:\n\
         - Summary: {}\n\
         - Experience: {}\n\
         - Education: {}\n\
         - Projects: {}\n\
         - Skills: {}\n\
         JOB DESCRIPTION:\n\
         ---\n\
         {}\n\
         ---\n\
         YOUR TASK: Respond with ONLY a JSON object containing: 'match_score' (number 1-10), \
         'match_summary' (2-3 sentences), 'matching_skills' (array of strings), \
         'missing_skills' (array of strings), 'salary_range' (string or null), \
         'company_info' (object mapping strings to strings, or null). No other text.",
        profile_field(&profile.summary),
        profile_field(&profile.experience),
        profile_field(&profile.education),
        profile_field(&profile.projects),
        profile_field(&profile.skills),
        truncate_description(description),
    )
}

/// Pull a schema-shaped JSON object out of a model response, tolerating
/// markdown code fences and prose around the object.
fn parse_structured<T: serde::de::DeserializeOwned>(response: &str) -> Result<T> {
    let trimmed = response.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }
    let start = trimmed
        .find('{')
        .ok_or_else(|| anyhow!("No JSON object in model response"))?;
    let end = trimmed
        .rfind('}')
        .ok_or_else(|| anyhow!("No JSON object in model response"))?;
    if end < start {
        return Err(anyhow!("No JSON object in model response"));
    }
    serde_json::from_str(&trimmed[start..=end])
        .map_err(|e| anyhow!("Model response did not match the expected schema: {}", e))
}

/// On-demand resume tailoring for one job. Fails without writing when the
/// job, the profile, or the job's description is missing, or when the
/// external call fails; a success overwrites any prior suggestions.
pub fn generate_resume_suggestions(
    db: &Database,
    provider: &dyn AIProvider,
    job_id: i64,
) -> Result<ResumeSuggestions> {
    let job = db.get_job(job_id)?;
    let profile = db.get_profile()?;

    let (job, profile) = match (job, profile) {
        (Some(job), Some(profile)) if job.raw_description.is_some() => (job, profile),
        _ => return Err(anyhow!("Job or profile data not found.")),
    };
    let description = job.raw_description.as_deref().unwrap_or_default();

    let prompt = build_suggestions_prompt(&profile, description);
    let suggestions: ResumeSuggestions = provider
        .complete(&prompt, MAX_TOKENS)
        .and_then(|response| parse_structured(&response))
        .map_err(|e| {
            eprintln!("LLM generation failed: {:#}", e);
            anyhow!("Failed to generate suggestions from AI.")
        })?;

    let serialized = serde_json::to_string(&suggestions)?;
    db.update_job_suggestions(job_id, &serialized)?;

    Ok(suggestions)
}

/// Re-score every non-Archived job with a description against the current
/// profile, one sequential call per job. Each job commits independently; a
/// failure is logged and skipped. Returns the count of jobs updated.
pub fn reanalyze_all_jobs(db: &Database, provider: &dyn AIProvider) -> Result<usize> {
    let profile = db
        .get_profile()?
        .ok_or_else(|| anyhow!("User profile not found."))?;

    let jobs: Vec<Job> = db
        .list_jobs(None)?
        .into_iter()
        .filter(|job| job.status.as_deref().unwrap_or("New") != "Archived")
        .collect();

    if jobs.is_empty() {
        println!("No active jobs to re-analyze.");
        return Ok(0);
    }

    println!("Found {} jobs to re-analyze.", jobs.len());

    let mut updated = 0;
    for job in &jobs {
        if job.raw_description.is_none() {
            continue;
        }
        println!("- Re-analyzing job #{}: {}", job.id, job.title);
        match reanalyze_job(db, provider, &profile, job) {
            Ok(()) => updated += 1,
            Err(e) => eprintln!("  Failed to re-analyze job #{}: {:#}", job.id, e),
        }
    }

    Ok(updated)
}

fn reanalyze_job(
    db: &Database,
    provider: &dyn AIProvider,
    profile: &UserProfile,
    job: &Job,
) -> Result<()> {
    let description = job.raw_description.as_deref().unwrap_or_default();
    let prompt = build_fit_prompt(profile, description);

    let response = provider.complete(&prompt, MAX_TOKENS)?;
    let analysis: JobFitAnalysis = parse_structured(&response)?;

    db.update_job_analysis(
        job.id,
        analysis.match_score,
        &analysis.match_summary,
        &stringify_list(&analysis.matching_skills),
        &stringify_list(&analysis.missing_skills),
        analysis.salary_range.as_deref(),
        analysis.company_info.as_ref().map(stringify_map).as_deref(),
    )
}

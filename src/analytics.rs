//! Read-side aggregation over jobs and applications. Everything here is a
//! pure function of its inputs: callers fetch the rows, pass "today" in, and
//! get back display-ready structures. Empty input produces zeroed output.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Application, Job};

/// Application pipeline, in funnel order. "Rejected" is tracked as a status
/// but is not a funnel stage.
pub const PIPELINE_STAGES: [&str; 7] = [
    "Interested",
    "Applied",
    "Resume Shortlisted",
    "OA Qualified",
    "Interviewing",
    "HR Interview",
    "Offer",
];

/// Chart palette. Funnel stages pick a color by their position in the full
/// stage list, so a stage keeps its color even when earlier stages are empty.
pub const CHART_COLORS: [&str; 10] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
    "#6366f1", "#84cc16",
];

const TOP_COMPANIES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMetrics {
    pub average: String,
    pub highest: f64,
    pub lowest: f64,
    pub scored_count: usize,
    pub scored_pct: String,
    pub excellent: usize,
    pub good: usize,
    pub average_band: usize,
    pub poor: usize,
}

impl ScoreMetrics {
    fn empty() -> Self {
        Self {
            average: "0".to_string(),
            highest: 0.0,
            lowest: 0.0,
            scored_count: 0,
            scored_pct: "0".to_string(),
            excellent: 0,
            good: 0,
            average_band: 0,
            poor: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBand {
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub name: &'static str,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_jobs: usize,
    pub total_applications: usize,
    pub applied_jobs: usize,
    pub offers: usize,
    pub interviews: usize,
    pub unique_companies_jobs: usize,
    pub unique_companies_apps: usize,
    pub conversion_rate: String,
}

/// Everything the dashboard renders, derived in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSnapshot {
    pub summary: SummaryMetrics,
    pub scores: ScoreMetrics,
    pub score_bands: Vec<ScoreBand>,
    pub score_distribution: Vec<ScoreCount>,
    pub job_companies: Vec<CompanyCount>,
    pub application_companies: Vec<CompanyCount>,
    pub status_distribution: Vec<StatusCount>,
    pub funnel: Vec<FunnelStage>,
    pub timeline: Vec<TimelinePoint>,
}

pub fn snapshot(
    jobs: &[Job],
    applications: &[Application],
    days: Option<i64>,
    today: NaiveDate,
) -> AnalyticsSnapshot {
    let apps = filter_recent_applications(applications, days, today);
    let scores = score_metrics(jobs);
    let score_bands = score_bands(&scores);
    AnalyticsSnapshot {
        summary: summary_metrics(jobs, &apps),
        scores,
        score_bands,
        score_distribution: score_distribution(jobs),
        job_companies: top_companies(jobs.iter().map(|j| j.company.as_str())),
        application_companies: top_companies(apps.iter().map(|a| a.company.as_str())),
        status_distribution: status_distribution(jobs),
        funnel: application_funnel(&apps),
        timeline: application_timeline(&apps),
    }
}

/// Keep applications dated within the last `days` days. A `None` filter keeps
/// everything; with a filter active, undated applications are dropped.
pub fn filter_recent_applications(
    applications: &[Application],
    days: Option<i64>,
    today: NaiveDate,
) -> Vec<Application> {
    match days {
        None => applications.to_vec(),
        Some(days) => {
            let cutoff = today - Duration::days(days);
            applications
                .iter()
                .filter(|app| app.application_date.is_some_and(|d| d >= cutoff))
                .cloned()
                .collect()
        }
    }
}

// --- Score metrics ---

/// Infer whether raw scores live on a 10-point or 100-point scale: 10 when
/// the maximum observed score is <= 10, else 100. Recomputed per call over
/// the current set; a set that happens to contain only scores <= 10 always
/// reads as a 10-point scale.
pub fn detect_scale(raw_scores: &[i64]) -> i64 {
    match raw_scores.iter().max() {
        Some(&max) if max <= 10 => 10,
        _ => 100,
    }
}

pub fn to_percent(raw: i64, scale: i64) -> f64 {
    raw as f64 / scale as f64 * 100.0
}

fn percent_scores(jobs: &[Job]) -> Vec<f64> {
    let raw: Vec<i64> = jobs.iter().filter_map(|j| j.match_score).collect();
    let scale = detect_scale(&raw);
    raw.into_iter().map(|s| to_percent(s, scale)).collect()
}

pub fn score_metrics(jobs: &[Job]) -> ScoreMetrics {
    let percents = percent_scores(jobs);
    if percents.is_empty() {
        return ScoreMetrics::empty();
    }

    let sum: f64 = percents.iter().sum();
    let average = format!("{:.1}", sum / percents.len() as f64);
    let highest = percents.iter().cloned().fold(f64::MIN, f64::max);
    let lowest = percents.iter().cloned().fold(f64::MAX, f64::min);

    let excellent = percents.iter().filter(|&&p| p >= 80.0).count();
    let good = percents.iter().filter(|&&p| (60.0..80.0).contains(&p)).count();
    let average_band = percents.iter().filter(|&&p| (40.0..60.0).contains(&p)).count();
    let poor = percents.iter().filter(|&&p| p < 40.0).count();

    ScoreMetrics {
        average,
        highest,
        lowest,
        scored_count: percents.len(),
        scored_pct: format!("{:.1}", percents.len() as f64 / jobs.len() as f64 * 100.0),
        excellent,
        good,
        average_band,
        poor,
    }
}

/// Quality bands for the score chart; zero-count bands are dropped.
pub fn score_bands(metrics: &ScoreMetrics) -> Vec<ScoreBand> {
    if metrics.scored_count == 0 {
        return Vec::new();
    }
    let total = metrics.scored_count as f64;
    [
        ("80-100 (Excellent)", metrics.excellent),
        ("60-79 (Good)", metrics.good),
        ("40-59 (Average)", metrics.average_band),
        ("0-39 (Poor)", metrics.poor),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(label, count)| ScoreBand {
        label,
        count,
        percentage: count as f64 / total * 100.0,
    })
    .collect()
}

/// Jobs per distinct percentage value, with an "N/A" bucket for unscored
/// jobs. Sorted by numeric value ascending (not by label text), N/A last.
pub fn score_distribution(jobs: &[Job]) -> Vec<ScoreCount> {
    let raw: Vec<i64> = jobs.iter().filter_map(|j| j.match_score).collect();
    let scale = detect_scale(&raw);

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Option<f64>, ScoreCount)> = Vec::new();

    for job in jobs {
        let (key, label) = match job.match_score {
            Some(raw) => {
                let pct = to_percent(raw, scale);
                (Some(pct), format_percent(pct))
            }
            None => (None, "N/A".to_string()),
        };
        match index.get(&label) {
            Some(&i) => groups[i].1.count += 1,
            None => {
                index.insert(label.clone(), groups.len());
                groups.push((key, ScoreCount { name: label, count: 1 }));
            }
        }
    }

    groups.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    groups.into_iter().map(|(_, count)| count).collect()
}

fn format_percent(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{}", pct as i64)
    } else {
        format!("{}", pct)
    }
}

// --- Company aggregation ---

pub fn normalize_company(name: &str) -> String {
    name.to_lowercase().trim().to_string()
}

/// Group company names case-insensitively (whitespace trimmed), keeping the
/// first-seen casing for display, sorted by count descending.
pub fn company_breakdown<'a>(names: impl Iterator<Item = &'a str>) -> Vec<CompanyCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<CompanyCount> = Vec::new();

    for name in names {
        let normalized = normalize_company(name);
        match index.get(&normalized) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(normalized, groups.len());
                groups.push(CompanyCount {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort: ties keep first-seen order.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

pub fn top_companies<'a>(names: impl Iterator<Item = &'a str>) -> Vec<CompanyCount> {
    let mut groups = company_breakdown(names);
    groups.truncate(TOP_COMPANIES);
    groups
}

pub fn unique_companies<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names
        .map(normalize_company)
        .collect::<std::collections::HashSet<_>>()
        .len()
}

// --- Status distribution ---

pub fn status_distribution(jobs: &[Job]) -> Vec<StatusCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<StatusCount> = Vec::new();

    for job in jobs {
        let status = job.status.as_deref().unwrap_or("New");
        match index.get(status) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(status.to_string(), groups.len());
                groups.push(StatusCount {
                    name: status.to_string(),
                    count: 1,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

// --- Application funnel ---

pub fn application_funnel(applications: &[Application]) -> Vec<FunnelStage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for app in applications {
        let status = if app.status.is_empty() {
            "Interested"
        } else {
            app.status.as_str()
        };
        *counts.entry(status).or_insert(0) += 1;
    }

    PIPELINE_STAGES
        .iter()
        .enumerate()
        .map(|(i, &stage)| FunnelStage {
            name: stage,
            count: counts.get(stage).copied().unwrap_or(0),
            color: CHART_COLORS[i % CHART_COLORS.len()],
        })
        .filter(|stage| stage.count > 0)
        .collect()
}

// --- Timeline ---

/// Applications per calendar month, labeled "Mar 24" style, sorted by
/// calendar time rather than label text.
pub fn application_timeline(applications: &[Application]) -> Vec<TimelinePoint> {
    let mut counts: HashMap<(i32, u32), usize> = HashMap::new();
    for app in applications {
        if let Some(date) = app.application_date {
            *counts.entry((date.year(), date.month())).or_insert(0) += 1;
        }
    }

    let mut months: Vec<((i32, u32), usize)> = counts.into_iter().collect();
    months.sort_by_key(|&(key, _)| key);

    months
        .into_iter()
        .map(|((year, month), count)| {
            // NaiveDate is only used for the label; day 1 always exists.
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %y").to_string())
                .unwrap_or_else(|| format!("{}-{:02}", year, month));
            TimelinePoint {
                month: label,
                count,
            }
        })
        .collect()
}

// --- Summary metrics ---

pub fn summary_metrics(jobs: &[Job], applications: &[Application]) -> SummaryMetrics {
    let applied_jobs = applications
        .iter()
        .filter(|app| app.status != "Interested")
        .count();
    let offers = applications
        .iter()
        .filter(|app| app.status == "Offer")
        .count();
    let interviews = applications
        .iter()
        .filter(|app| app.status == "Interviewing" || app.status == "HR Interview")
        .count();

    let conversion_rate = if applied_jobs > 0 {
        format!("{:.1}", offers as f64 / applied_jobs as f64 * 100.0)
    } else {
        "0".to_string()
    };

    SummaryMetrics {
        total_jobs: jobs.len(),
        total_applications: applications.len(),
        applied_jobs,
        offers,
        interviews,
        unique_companies_jobs: unique_companies(jobs.iter().map(|j| j.company.as_str())),
        unique_companies_apps: unique_companies(applications.iter().map(|a| a.company.as_str())),
        conversion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(company: &str, status: Option<&str>, score: Option<i64>) -> Job {
        Job {
            id: 0,
            date_found: "2024-01-01 00:00:00".to_string(),
            title: "Engineer".to_string(),
            company: company.to_string(),
            location: None,
            url: format!("https://example.com/{}", company),
            status: status.map(str::to_string),
            raw_description: None,
            match_score: score,
            match_summary: None,
            matching_skills: None,
            missing_skills: None,
            salary_range: None,
            company_info: None,
            tailored_suggestions: None,
        }
    }

    fn app(company: &str, status: &str, date: Option<(i32, u32, u32)>) -> Application {
        Application {
            id: 0,
            company: company.to_string(),
            job_title: "Engineer".to_string(),
            application_link: None,
            status: status.to_string(),
            application_date: date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            notes: None,
        }
    }

    fn scored_jobs(scores: &[i64]) -> Vec<Job> {
        scores.iter().map(|&s| job("Acme", None, Some(s))).collect()
    }

    #[test]
    fn test_no_scored_jobs_yields_zeroed_metrics() {
        let jobs = vec![job("Acme", None, None), job("Beta", None, None)];
        let m = score_metrics(&jobs);
        assert_eq!(m.average, "0");
        assert_eq!(m.scored_pct, "0");
        assert_eq!(m.scored_count, 0);
        assert_eq!(
            (m.excellent, m.good, m.average_band, m.poor),
            (0, 0, 0, 0)
        );
        assert!(score_bands(&m).is_empty());
    }

    #[test]
    fn test_empty_input_everywhere() {
        let snap = snapshot(&[], &[], None, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(snap.summary.total_jobs, 0);
        assert_eq!(snap.summary.conversion_rate, "0");
        assert!(snap.funnel.is_empty());
        assert!(snap.timeline.is_empty());
        assert!(snap.job_companies.is_empty());
        assert!(snap.status_distribution.is_empty());
    }

    #[test]
    fn test_scale_detection_ten_point() {
        assert_eq!(detect_scale(&[3, 7, 9]), 10);
        let m = score_metrics(&scored_jobs(&[3, 7, 9]));
        assert_eq!(m.lowest, 30.0);
        assert_eq!(m.highest, 90.0);
    }

    #[test]
    fn test_scale_detection_hundred_point() {
        assert_eq!(detect_scale(&[30, 70, 95]), 100);
        let m = score_metrics(&scored_jobs(&[30, 70, 95]));
        assert_eq!(m.lowest, 30.0);
        assert_eq!(m.highest, 95.0);
    }

    #[test]
    fn test_scale_detection_mixed_set_reads_as_hundred() {
        // One score above 10 flips the whole set to a 100-point scale, so the
        // small values collapse to single-digit percentages.
        assert_eq!(detect_scale(&[3, 7, 95]), 100);
        let m = score_metrics(&scored_jobs(&[3, 7, 95]));
        assert_eq!(m.lowest, 3.0);
        assert_eq!(m.highest, 95.0);
    }

    #[test]
    fn test_scale_heuristic_misclassifies_all_low_hundred_scores() {
        // Known ambiguity: scores recorded on a 100-point scale that all land
        // <= 10 are indistinguishable from a 10-point scale and get inflated.
        let m = score_metrics(&scored_jobs(&[5, 8]));
        assert_eq!(m.lowest, 50.0);
        assert_eq!(m.highest, 80.0);
    }

    #[test]
    fn test_bands_partition_scored_jobs() {
        let m = score_metrics(&scored_jobs(&[95, 85, 80, 79, 60, 59, 40, 39, 0]));
        assert_eq!(m.excellent, 3); // 95, 85, 80
        assert_eq!(m.good, 2); // 79, 60
        assert_eq!(m.average_band, 2); // 59, 40
        assert_eq!(m.poor, 2); // 39, 0
        assert_eq!(
            m.excellent + m.good + m.average_band + m.poor,
            m.scored_count
        );

        let bands = score_bands(&m);
        assert_eq!(bands.len(), 4);
        let total_pct: f64 = bands.iter().map(|b| b.percentage).sum();
        assert!((total_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_and_scored_pct_formatting() {
        let mut jobs = scored_jobs(&[3, 7, 9]); // 30, 70, 90 -> avg 63.3
        jobs.push(job("Unscored", None, None));
        let m = score_metrics(&jobs);
        assert_eq!(m.average, "63.3");
        assert_eq!(m.scored_pct, "75.0");
        assert_eq!(m.scored_count, 3);
    }

    #[test]
    fn test_score_distribution_counts_with_na_bucket() {
        let jobs = vec![
            job("A", None, Some(7)),
            job("B", None, Some(7)),
            job("C", None, Some(3)),
            job("D", None, None),
        ];
        let dist = score_distribution(&jobs);
        let names: Vec<&str> = dist.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["30", "70", "N/A"]);
        let counts: Vec<usize> = dist.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![1, 2, 1]);
    }

    #[test]
    fn test_score_distribution_sorts_numerically_not_by_label() {
        // Lexicographically "100" < "20"; numeric order must win, N/A last.
        let jobs = vec![
            job("A", None, Some(10)),
            job("B", None, Some(2)),
            job("C", None, Some(9)),
            job("D", None, None),
        ];
        let dist = score_distribution(&jobs);
        let names: Vec<&str> = dist.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["20", "90", "100", "N/A"]);
    }

    #[test]
    fn test_score_distribution_empty_and_all_unscored() {
        assert!(score_distribution(&[]).is_empty());

        let jobs = vec![job("A", None, None), job("B", None, None)];
        let dist = score_distribution(&jobs);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].name, "N/A");
        assert_eq!(dist[0].count, 2);
    }

    #[test]
    fn test_company_normalization_collapses_casing_and_whitespace() {
        let jobs = vec![
            job("Google", None, None),
            job("google ", None, None),
            job("GOOGLE", None, None),
            job("Anthropic", None, None),
        ];
        let companies = company_breakdown(jobs.iter().map(|j| j.company.as_str()));
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "Google"); // first-seen casing
        assert_eq!(companies[0].count, 3);
        assert_eq!(unique_companies(jobs.iter().map(|j| j.company.as_str())), 2);
    }

    #[test]
    fn test_top_companies_truncates_to_eight() {
        let names = [
            "a", "b", "c", "d", "e", "f", "g", "h", "i", "j",
        ];
        let top = top_companies(names.iter().copied());
        assert_eq!(top.len(), 8);
    }

    #[test]
    fn test_status_distribution_defaults_null_to_new() {
        let jobs = vec![
            job("A", Some("Applied"), None),
            job("B", None, None),
            job("C", None, None),
        ];
        let dist = status_distribution(&jobs);
        assert_eq!(dist[0].name, "New");
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[1].name, "Applied");
        assert_eq!(dist[1].count, 1);
    }

    #[test]
    fn test_funnel_preserves_stage_order_and_omits_empty_stages() {
        let apps = vec![
            app("A", "Offer", None),
            app("B", "Applied", None),
            app("C", "Interested", None),
            app("D", "Applied", None),
        ];
        let funnel = application_funnel(&apps);
        let names: Vec<&str> = funnel.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Interested", "Applied", "Offer"]);
        let counts: Vec<usize> = funnel.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![1, 2, 1]);
    }

    #[test]
    fn test_funnel_colors_indexed_by_full_stage_list() {
        // "Offer" is stage 6 of the full pipeline; its color must not shift
        // when earlier stages are absent.
        let apps = vec![app("A", "Offer", None)];
        let funnel = application_funnel(&apps);
        assert_eq!(funnel.len(), 1);
        assert_eq!(funnel[0].color, CHART_COLORS[6]);
    }

    #[test]
    fn test_funnel_rejected_is_not_a_stage() {
        let apps = vec![app("A", "Rejected", None), app("B", "Applied", None)];
        let funnel = application_funnel(&apps);
        let names: Vec<&str> = funnel.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Applied"]);
    }

    #[test]
    fn test_timeline_sorts_by_calendar_time_not_label() {
        // Alphabetically "Mar 24" < "Nov 23"; calendar order says otherwise.
        let apps = vec![
            app("A", "Applied", Some((2024, 3, 1))),
            app("B", "Applied", Some((2023, 11, 1))),
            app("C", "Applied", Some((2024, 3, 20))),
            app("D", "Applied", None),
        ];
        let timeline = application_timeline(&apps);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].month, "Nov 23");
        assert_eq!(timeline[0].count, 1);
        assert_eq!(timeline[1].month, "Mar 24");
        assert_eq!(timeline[1].count, 2);
    }

    #[test]
    fn test_conversion_rate() {
        let mut apps: Vec<Application> =
            (0..8).map(|_| app("A", "Applied", None)).collect();
        apps.push(app("B", "Offer", None));
        apps.push(app("C", "Offer", None));
        // 10 applied-or-further, 2 offers
        let m = summary_metrics(&[], &apps);
        assert_eq!(m.applied_jobs, 10);
        assert_eq!(m.offers, 2);
        assert_eq!(m.conversion_rate, "20.0");

        let interested: Vec<Application> = vec![app("A", "Interested", None)];
        let m = summary_metrics(&[], &interested);
        assert_eq!(m.applied_jobs, 0);
        assert_eq!(m.conversion_rate, "0");
    }

    #[test]
    fn test_interviews_count_both_interview_stages() {
        let apps = vec![
            app("A", "Interviewing", None),
            app("B", "HR Interview", None),
            app("C", "Applied", None),
        ];
        let m = summary_metrics(&[], &apps);
        assert_eq!(m.interviews, 2);
    }

    #[test]
    fn test_date_filter_drops_old_and_undated() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let apps = vec![
            app("A", "Applied", Some((2024, 6, 10))),
            app("B", "Applied", Some((2024, 4, 1))),
            app("C", "Applied", None),
        ];

        let recent = filter_recent_applications(&apps, Some(30), today);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].company, "A");

        let all = filter_recent_applications(&apps, None, today);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_snapshot_applies_filter_to_applications_only() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let jobs = vec![job("Acme", Some("New"), Some(8))];
        let apps = vec![
            app("Old Co", "Applied", Some((2023, 1, 1))),
            app("New Co", "Applied", Some((2024, 6, 1))),
        ];
        let snap = snapshot(&jobs, &apps, Some(30), today);
        assert_eq!(snap.summary.total_applications, 1);
        // Jobs are never date-filtered.
        assert_eq!(snap.summary.total_jobs, 1);
        assert_eq!(snap.scores.scored_count, 1);
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::matching::skills::normalize_skills;

/// Date format the CV builder submits (`<input type="date">`).
const CV_DATE_FORMAT: &str = "%Y-%m-%d";

// ────────────────────────────────────────────────────────────────────────────
// CV document (API shape)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub headline: String,
    pub summary: String,
    pub website: Option<String>,
    pub linkedin: Option<String>,
}

/// One position on a CV. Dates are kept as submitted and only parsed when the
/// CV is turned into a [`CandidateProfile`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub current: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LanguageEntry {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CvTemplate {
    #[default]
    Modern,
    Classic,
    Minimal,
    Creative,
}

impl CvTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            CvTemplate::Modern => "modern",
            CvTemplate::Classic => "classic",
            CvTemplate::Minimal => "minimal",
            CvTemplate::Creative => "creative",
        }
    }

    /// Unknown stored values fall back to the default template.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "classic" => CvTemplate::Classic,
            "minimal" => CvTemplate::Minimal,
            "creative" => CvTemplate::Creative,
            _ => CvTemplate::Modern,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CvDocument {
    pub personal_info: PersonalInfo,
    pub experiences: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub languages: Vec<LanguageEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub template: CvTemplate,
}

impl CvDocument {
    pub fn normalized_skills(&self) -> Vec<String> {
        normalize_skills(&self.skills)
    }
}

/// Account-level details shown on the user's profile page. Recruiters use
/// `company_name` and `job_title` to say who they post for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccountDetails {
    pub phone: String,
    pub address: String,
    pub bio: String,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Storage row
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub headline: String,
    pub summary: String,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub skills: Vec<String>,
    pub experience: Value,
    pub education: Value,
    pub languages: Value,
    pub certifications: Value,
    pub template: String,
    pub bio: String,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn experience_entries(&self) -> Vec<ExperienceEntry> {
        decode_items(self.user_id, "experience", &self.experience)
    }

    pub fn to_document(&self) -> CvDocument {
        CvDocument {
            personal_info: PersonalInfo {
                first_name: self.first_name.clone(),
                last_name: self.last_name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
                address: self.address.clone(),
                headline: self.headline.clone(),
                summary: self.summary.clone(),
                website: self.website.clone(),
                linkedin: self.linkedin.clone(),
            },
            experiences: self.experience_entries(),
            education: decode_items(self.user_id, "education", &self.education),
            skills: self.skills.clone(),
            languages: decode_items(self.user_id, "languages", &self.languages),
            certifications: decode_items(self.user_id, "certifications", &self.certifications),
            template: CvTemplate::parse_or_default(&self.template),
        }
    }

    pub fn to_account_details(&self) -> AccountDetails {
        AccountDetails {
            phone: self.phone.clone(),
            address: self.address.clone(),
            bio: self.bio.clone(),
            company_name: self.company_name.clone(),
            job_title: self.job_title.clone(),
        }
    }

    pub fn to_candidate_profile(&self) -> CandidateProfile {
        CandidateProfile::from_cv(self.user_id, self.skills.clone(), &self.experience_entries())
    }
}

/// Decodes a JSONB array item by item, skipping items that do not fit the schema.
fn decode_items<T: DeserializeOwned>(user_id: Uuid, column: &str, value: &Value) -> Vec<T> {
    let Some(items) = value.as_array() else {
        if !value.is_null() {
            warn!("Profile {user_id}: {column} is not a JSON array, ignoring");
        }
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Profile {user_id}: skipping malformed {column}[{idx}]: {e}");
                None
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher view
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalEnd {
    Date(NaiveDate),
    /// Still in the position; ends at evaluation time.
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceInterval {
    pub start: NaiveDate,
    pub end: IntervalEnd,
}

impl ExperienceInterval {
    pub fn closed(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: IntervalEnd::Date(end),
        }
    }

    pub fn current(start: NaiveDate) -> Self {
        Self {
            start,
            end: IntervalEnd::Current,
        }
    }

    /// Signed length in days. Negative when the entry ends before it starts.
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        let end = match self.end {
            IntervalEnd::Date(d) => d,
            IntervalEnd::Current => today,
        };
        (end - self.start).num_days()
    }

    /// Returns `None` when the entry lacks a usable start date, or is not
    /// current and lacks a usable end date.
    pub fn from_entry(entry: &ExperienceEntry) -> Option<Self> {
        let start = parse_cv_date(&entry.start_date)?;
        if entry.current {
            return Some(Self::current(start));
        }
        let end = parse_cv_date(&entry.end_date)?;
        Some(Self::closed(start, end))
    }
}

pub fn parse_cv_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), CV_DATE_FORMAT).ok()
}

/// A candidate as the matcher sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub candidate_id: Uuid,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceInterval>,
}

impl CandidateProfile {
    pub fn from_cv(candidate_id: Uuid, skills: Vec<String>, entries: &[ExperienceEntry]) -> Self {
        let experience = entries
            .iter()
            .filter_map(|entry| {
                let interval = ExperienceInterval::from_entry(entry);
                if interval.is_none() {
                    warn!(
                        "Candidate {candidate_id}: dropping experience at '{}' with unusable dates (start='{}', end='{}', current={})",
                        entry.company, entry.start_date, entry.end_date, entry.current
                    );
                }
                interval
            })
            .collect();

        Self {
            candidate_id,
            skills,
            experience,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(start: &str, end: &str, current: bool) -> ExperienceEntry {
        ExperienceEntry {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            description: String::new(),
            current,
        }
    }

    #[test]
    fn test_closed_interval_from_entry() {
        let interval = ExperienceInterval::from_entry(&entry("2021-01-01", "2023-01-01", false));
        assert_eq!(
            interval,
            Some(ExperienceInterval::closed(date(2021, 1, 1), date(2023, 1, 1)))
        );
    }

    #[test]
    fn test_current_entry_ignores_end_date() {
        let interval = ExperienceInterval::from_entry(&entry("2022-03-15", "", true)).unwrap();
        assert_eq!(interval.end, IntervalEnd::Current);
        assert_eq!(interval.days_until(date(2022, 3, 25)), 10);
    }

    #[test]
    fn test_missing_dates_are_rejected() {
        assert!(ExperienceInterval::from_entry(&entry("", "2023-01-01", false)).is_none());
        assert!(ExperienceInterval::from_entry(&entry("2021-01-01", "", false)).is_none());
        assert!(ExperienceInterval::from_entry(&entry("Jan 2021", "2023-01-01", false)).is_none());
    }

    #[test]
    fn test_negative_interval_keeps_sign() {
        let interval = ExperienceInterval::closed(date(2023, 1, 1), date(2022, 1, 1));
        assert_eq!(interval.days_until(date(2024, 1, 1)), -365);
    }

    #[test]
    fn test_candidate_profile_drops_unusable_entries() {
        let id = Uuid::new_v4();
        let profile = CandidateProfile::from_cv(
            id,
            vec!["Rust".to_string()],
            &[
                entry("2021-01-01", "2023-01-01", false),
                entry("", "", false),
                entry("2023-02-01", "", true),
            ],
        );
        assert_eq!(profile.candidate_id, id);
        assert_eq!(profile.experience.len(), 2);
    }

    #[test]
    fn test_normalized_skills_trims_and_dedups() {
        let cv = CvDocument {
            skills: vec![
                " Rust ".to_string(),
                "".to_string(),
                "rust".to_string(),
                "   ".to_string(),
                "SQL".to_string(),
            ],
            ..CvDocument::default()
        };
        assert_eq!(cv.normalized_skills(), vec!["Rust".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn test_cv_document_defaults_missing_fields() {
        let cv: CvDocument = serde_json::from_value(json!({
            "personal_info": { "first_name": "Ada" },
            "skills": ["Rust"]
        }))
        .unwrap();
        assert_eq!(cv.personal_info.first_name, "Ada");
        assert!(cv.experiences.is_empty());
        assert_eq!(cv.template, CvTemplate::Modern);
    }

    #[test]
    fn test_decode_items_skips_malformed_rows() {
        let value = json!([
            { "company": "Acme", "start_date": "2020-01-01", "end_date": "2021-01-01" },
            "not an object",
            { "company": "Globex", "current": true, "start_date": "2022-01-01" }
        ]);
        let entries: Vec<ExperienceEntry> = decode_items(Uuid::new_v4(), "experience", &value);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].company, "Globex");
        assert!(entries[1].current);
    }

    #[test]
    fn test_template_falls_back_to_modern() {
        assert_eq!(CvTemplate::parse_or_default("creative"), CvTemplate::Creative);
        assert_eq!(CvTemplate::parse_or_default("baroque"), CvTemplate::Modern);
    }
}

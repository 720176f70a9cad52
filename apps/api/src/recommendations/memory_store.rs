//! In-memory `MatchStore` for tests, with switches to simulate storage failures.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::models::profile::CandidateProfile;
use crate::models::recommendation::NewRecommendation;
use crate::recommendations::store::MatchStore;

#[derive(Default)]
pub struct MemoryState {
    pub jobs: Vec<(JobPosting, bool)>,
    pub profiles: HashMap<Uuid, CandidateProfile>,
    pub recommendations: Vec<NewRecommendation>,
    pub fail_active_jobs: bool,
    pub fail_recommended_ids: bool,
    pub fail_profile: bool,
    pub fail_insert_for: HashSet<Uuid>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, f: impl FnOnce(&mut MemoryState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn add_job(&self, job: JobPosting, active: bool) {
        self.update(|s| s.jobs.push((job, active)));
    }

    pub fn add_profile(&self, profile: CandidateProfile) {
        self.update(|s| {
            s.profiles.insert(profile.candidate_id, profile);
        });
    }

    pub fn recommendations(&self) -> Vec<NewRecommendation> {
        self.state.lock().unwrap().recommendations.clone()
    }

    fn simulated(what: &str) -> AppError {
        AppError::Internal(anyhow::anyhow!("simulated {what} failure"))
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn active_job_postings(&self) -> Result<Vec<JobPosting>, AppError> {
        let state = self.state.lock().unwrap();
        if state.fail_active_jobs {
            return Err(Self::simulated("active jobs"));
        }
        Ok(state
            .jobs
            .iter()
            .filter(|(_, active)| *active)
            .map(|(job, _)| job.clone())
            .collect())
    }

    async fn job_posting(&self, job_id: Uuid) -> Result<Option<JobPosting>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .jobs
            .iter()
            .find(|(job, _)| job.id == job_id)
            .map(|(job, _)| job.clone()))
    }

    async fn candidate_profile(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<CandidateProfile>, AppError> {
        let state = self.state.lock().unwrap();
        if state.fail_profile {
            return Err(Self::simulated("profile"));
        }
        Ok(state.profiles.get(&candidate_id).cloned())
    }

    async fn recommended_job_ids(&self, candidate_id: Uuid) -> Result<HashSet<Uuid>, AppError> {
        let state = self.state.lock().unwrap();
        if state.fail_recommended_ids {
            return Err(Self::simulated("recommended ids"));
        }
        Ok(state
            .recommendations
            .iter()
            .filter(|r| r.candidate_id == candidate_id)
            .map(|r| r.job_id)
            .collect())
    }

    async fn insert_recommendation(&self, rec: &NewRecommendation) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_insert_for.contains(&rec.job_id) {
            return Err(Self::simulated("insert"));
        }
        let exists = state
            .recommendations
            .iter()
            .any(|r| r.candidate_id == rec.candidate_id && r.job_id == rec.job_id);
        if exists {
            return Ok(false);
        }
        state.recommendations.push(rec.clone());
        Ok(true)
    }
}

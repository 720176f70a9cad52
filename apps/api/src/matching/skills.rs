//! Skill overlap between a candidate and a posting.
//!
//! A required skill is matched when it and some candidate skill contain one
//! another, compared lowercase. The test is deliberately loose: "C" matches
//! "C++", "Java" matches "JavaScript".

/// Points available for skills.
pub const SKILLS_WEIGHT: f64 = 60.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillOverlap {
    /// Required skills covered by at least one candidate skill, in posting order.
    pub matched: Vec<String>,
    /// Required skills no candidate skill covers, in posting order.
    pub missing: Vec<String>,
}

impl SkillOverlap {
    pub fn required_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    /// `60 × matched / required`, or 0 when the posting lists no skills.
    pub fn component(&self) -> f64 {
        let total = self.required_count();
        if total == 0 {
            return 0.0;
        }
        SKILLS_WEIGHT * (self.matched.len() as f64 / total as f64)
    }
}

/// Trims skills and drops blank or case-insensitively repeated ones. A blank
/// skill would be a substring of every other skill.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !normalized.iter().any(|s| s.to_lowercase() == trimmed.to_lowercase()) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

pub fn skills_match(candidate_skill: &str, required_skill: &str) -> bool {
    let candidate = candidate_skill.to_lowercase();
    let required = required_skill.to_lowercase();
    candidate.contains(&required) || required.contains(&candidate)
}

pub fn compute_overlap(candidate_skills: &[String], required_skills: &[String]) -> SkillOverlap {
    let mut overlap = SkillOverlap::default();
    for required in required_skills {
        if candidate_skills.iter().any(|c| skills_match(c, required)) {
            overlap.matched.push(required.clone());
        } else {
            overlap.missing.push(required.clone());
        }
    }
    overlap
}

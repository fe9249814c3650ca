//! The career-roadmap document returned by the forge endpoint.
//!
//! Every field is always present once normalization has run; the document
//! shape never varies with what the upstream model produced. Serialization
//! is camelCase to match the public API contract.

use serde::{Deserialize, Serialize};

/// Skill proficiency bucket. Values outside the allowed set normalize to
/// `Beginner`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Kind of learning resource. Values outside the allowed set normalize to
/// `Documentation`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Youtube,
    #[default]
    Documentation,
    Course,
}

impl ResourceType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "youtube" => Some(Self::Youtube),
            "documentation" => Some(Self::Documentation),
            "course" => Some(Self::Course),
            _ => None,
        }
    }
}

/// Where a community lives. Values outside the allowed set normalize to
/// `Forum`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunityPlatform {
    Discord,
    Reddit,
    #[default]
    Forum,
}

impl CommunityPlatform {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "discord" => Some(Self::Discord),
            "reddit" => Some(Self::Reddit),
            "forum" => Some(Self::Forum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapMeta {
    pub inferred_career: String,
    /// 0–100, clamped during normalization.
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Understanding {
    pub interests: Vec<String>,
    pub work_style: String,
    pub long_term_goal: String,
    /// Non-negative, clamped during normalization.
    pub hours_per_week: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
}

/// One phase of the roadmap. `id` is always the sequential `phase-N`
/// scheme, never whatever the model supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skills: Vec<Skill>,
    pub tools: Vec<String>,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningResource {
    pub skill: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub name: String,
    pub platform: CommunityPlatform,
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resources {
    pub learning: Vec<LearningResource>,
    pub communities: Vec<Community>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub phases: Vec<Phase>,
    pub resources: Resources,
}

/// Full response document: what the model inferred about the user plus the
/// phased roadmap itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapDocument {
    pub meta: RoadmapMeta,
    pub understanding: Understanding,
    pub roadmap: Roadmap,
}

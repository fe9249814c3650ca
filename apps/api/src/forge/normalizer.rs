//! Response normalizer — turns an untrusted model reply into a
//! schema-complete [`RoadmapDocument`].
//!
//! The reply is hostile input: it may be fenced in markdown, wrapped in
//! prose, or missing any part of the schema. Extraction and JSON parsing
//! are the only hard failures. After a successful parse, normalization is
//! total: every missing or malformed field is replaced by a default, so
//! the returned document always has the full schema shape.

use serde_json::Value;
use thiserror::Error;

use crate::models::roadmap::{
    Community, CommunityPlatform, LearningResource, Phase, ResourceType, Roadmap, RoadmapDocument,
    RoadmapMeta, Resources, Skill, SkillLevel, Understanding,
};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no JSON object found in model reply")]
    NoJson,

    #[error("model reply is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

const DEFAULT_CONFIDENCE: f64 = 50.0;
const DEFAULT_HOURS_PER_WEEK: f64 = 10.0;
const NOT_SPECIFIED: &str = "Not specified";

/// Strips ```json ... ``` or ``` ... ``` code fences and stray backticks.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let text = if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    };
    text.trim_matches('`').trim()
}

/// Finds the first balanced `{...}` substring.
///
/// Depth-aware and string-aware: a `}` inside a JSON string literal does
/// not close the object, and escaped quotes do not end the string.
fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0u32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extracts and parses the JSON object embedded in a raw model reply.
pub fn extract_json(raw: &str) -> Result<Value, NormalizeError> {
    let stripped = strip_fences(raw);
    let candidate = find_json_object(stripped).ok_or(NormalizeError::NoJson)?;
    Ok(serde_json::from_str(candidate)?)
}

/// Normalizes a parsed reply into a schema-complete document.
///
/// Total function: missing top-level keys are synthesized, lists that are
/// not lists become empty, constrained literals fall back to their default
/// variant, and numbers are clamped to their allowed range.
pub fn normalize_roadmap(value: &Value) -> RoadmapDocument {
    RoadmapDocument {
        meta: normalize_meta(value.get("meta")),
        understanding: normalize_understanding(value.get("understanding")),
        roadmap: normalize_roadmap_body(value.get("roadmap")),
    }
}

fn normalize_meta(meta: Option<&Value>) -> RoadmapMeta {
    RoadmapMeta {
        inferred_career: string_or(meta.and_then(|m| m.get("inferredCareer")), NOT_SPECIFIED),
        confidence: meta
            .and_then(|m| m.get("confidence"))
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_CONFIDENCE)
            .clamp(0.0, 100.0),
    }
}

fn normalize_understanding(understanding: Option<&Value>) -> Understanding {
    Understanding {
        interests: string_list(understanding.and_then(|u| u.get("interests"))),
        work_style: string_or(understanding.and_then(|u| u.get("workStyle")), NOT_SPECIFIED),
        long_term_goal: string_or(
            understanding.and_then(|u| u.get("longTermGoal")),
            NOT_SPECIFIED,
        ),
        hours_per_week: understanding
            .and_then(|u| u.get("hoursPerWeek"))
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_HOURS_PER_WEEK)
            .max(0.0),
    }
}

fn normalize_roadmap_body(roadmap: Option<&Value>) -> Roadmap {
    let phases = roadmap
        .and_then(|r| r.get("phases"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, phase)| normalize_phase(index, phase))
                .collect()
        })
        .unwrap_or_default();

    let resources = roadmap.and_then(|r| r.get("resources"));

    Roadmap {
        phases,
        resources: Resources {
            learning: learning_resources(resources.and_then(|r| r.get("learning"))),
            communities: communities(resources.and_then(|r| r.get("communities"))),
        },
    }
}

/// Phase ids are re-derived as `phase-N` in input order; whatever id the
/// model supplied is ignored so ids stay unique and sequential.
fn normalize_phase(index: usize, phase: &Value) -> Phase {
    Phase {
        id: format!("phase-{}", index + 1),
        title: string_or(phase.get("title"), &format!("Phase {}", index + 1)),
        description: string_or(phase.get("description"), ""),
        skills: skills(phase.get("skills")),
        tools: string_list(phase.get("tools")),
        projects: string_list(phase.get("projects")),
    }
}

/// A skills entry may be an object `{name, level}` or a bare string; a bare
/// string is accepted as a beginner-level skill of that name.
fn skills(value: Option<&Value>) -> Vec<Skill> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|entry| match entry {
                    Value::String(name) => Skill {
                        name: name.clone(),
                        level: SkillLevel::default(),
                    },
                    other => Skill {
                        name: string_or(other.get("name"), "General skill"),
                        level: other
                            .get("level")
                            .and_then(Value::as_str)
                            .and_then(SkillLevel::parse)
                            .unwrap_or_default(),
                    },
                })
                .collect()
        })
        .unwrap_or_default()
}

fn learning_resources(value: Option<&Value>) -> Vec<LearningResource> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|resource| LearningResource {
                    skill: string_or(resource.get("skill"), "General"),
                    resource_type: resource
                        .get("type")
                        .and_then(Value::as_str)
                        .and_then(ResourceType::parse)
                        .unwrap_or_default(),
                    title: string_or(resource.get("title"), ""),
                    description: string_or(resource.get("description"), ""),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn communities(value: Option<&Value>) -> Vec<Community> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|community| Community {
                    name: string_or(community.get("name"), ""),
                    platform: community
                        .get("platform")
                        .and_then(Value::as_str)
                        .and_then(CommunityPlatform::parse)
                        .unwrap_or_default(),
                    purpose: string_or(community.get("purpose"), ""),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Coerces a value into a list of strings; non-lists become empty and
/// non-string elements are dropped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WELL_FORMED: &str = r#"{
        "meta": {"inferredCareer": "Platform Engineering", "confidence": 85},
        "understanding": {
            "interests": ["kubernetes", "automation"],
            "workStyle": "hands-on",
            "longTermGoal": "run platform infrastructure",
            "hoursPerWeek": 12
        },
        "roadmap": {
            "phases": [
                {
                    "id": "whatever",
                    "title": "Master platform fundamentals",
                    "description": "Containers and orchestration",
                    "skills": [{"name": "Kubernetes", "level": "intermediate"}],
                    "tools": ["kubectl", "helm"],
                    "projects": ["Deploy a service to a local cluster"]
                },
                {
                    "title": "Operate in production",
                    "description": "Observability and reliability",
                    "skills": [{"name": "Prometheus", "level": "beginner"}],
                    "tools": ["grafana"],
                    "projects": ["Add SLO dashboards"]
                }
            ],
            "resources": {
                "learning": [
                    {"skill": "Kubernetes", "type": "course", "title": "K8s deep dive", "description": "CKA prep"}
                ],
                "communities": [
                    {"name": "Kubernetes Slack", "platform": "discord", "purpose": "help"}
                ]
            }
        }
    }"#;

    // ─── extraction ───

    #[test]
    fn test_extract_plain_object() {
        let value = extract_json(r#"{"meta": {"confidence": 10}}"#).unwrap();
        assert_eq!(value["meta"]["confidence"], 10);
    }

    #[test]
    fn test_fenced_reply_extracts_same_as_unfenced() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        assert_eq!(extract_json(&fenced).unwrap(), extract_json(WELL_FORMED).unwrap());
    }

    #[test]
    fn test_fence_without_language_tag() {
        let fenced = format!("```\n{WELL_FORMED}\n```");
        assert_eq!(extract_json(&fenced).unwrap(), extract_json(WELL_FORMED).unwrap());
    }

    #[test]
    fn test_stray_backticks_are_stripped() {
        let value = extract_json("`{\"meta\": {}}`").unwrap();
        assert!(value.get("meta").is_some());
    }

    #[test]
    fn test_prose_around_object_is_ignored() {
        let reply = format!("Here is your roadmap:\n{WELL_FORMED}\nGood luck!");
        assert_eq!(extract_json(&reply).unwrap(), extract_json(WELL_FORMED).unwrap());
    }

    #[test]
    fn test_brace_inside_string_does_not_truncate() {
        let reply = r#"{"meta": {"inferredCareer": "C} developer", "confidence": 70}}"#;
        let value = extract_json(reply).unwrap();
        assert_eq!(value["meta"]["inferredCareer"], "C} developer");
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let reply = r#"{"meta": {"inferredCareer": "say \"hi\" }", "confidence": 70}}"#;
        let value = extract_json(reply).unwrap();
        assert_eq!(value["meta"]["inferredCareer"], "say \"hi\" }");
    }

    #[test]
    fn test_no_json_is_an_error() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(NormalizeError::NoJson)
        ));
    }

    #[test]
    fn test_unbalanced_object_is_no_json() {
        assert!(matches!(
            extract_json(r#"{"meta": {"confidence": 10}"#),
            Err(NormalizeError::NoJson)
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            extract_json(r#"{"meta": confidence}"#),
            Err(NormalizeError::Parse(_))
        ));
    }

    // ─── normalization ───

    #[test]
    fn test_well_formed_reply_passes_through() {
        let document = normalize_roadmap(&extract_json(WELL_FORMED).unwrap());
        assert_eq!(document.meta.inferred_career, "Platform Engineering");
        assert_eq!(document.meta.confidence, 85.0);
        assert_eq!(document.understanding.hours_per_week, 12.0);
        assert_eq!(document.roadmap.phases.len(), 2);
        assert_eq!(document.roadmap.phases[0].title, "Master platform fundamentals");
        assert_eq!(document.roadmap.phases[0].skills[0].level, SkillLevel::Intermediate);
        assert_eq!(document.roadmap.resources.learning[0].resource_type, ResourceType::Course);
    }

    #[test]
    fn test_empty_object_gets_full_schema() {
        let document = normalize_roadmap(&json!({}));
        assert_eq!(document.meta.inferred_career, "Not specified");
        assert_eq!(document.meta.confidence, 50.0);
        assert_eq!(document.understanding.work_style, "Not specified");
        assert_eq!(document.understanding.hours_per_week, 10.0);
        assert!(document.understanding.interests.is_empty());
        assert!(document.roadmap.phases.is_empty());
        assert!(document.roadmap.resources.learning.is_empty());
        assert!(document.roadmap.resources.communities.is_empty());
    }

    #[test]
    fn test_missing_top_level_key_is_defaulted_not_rejected() {
        let document = normalize_roadmap(&json!({"roadmap": {"phases": []}}));
        assert_eq!(document.meta.inferred_career, "Not specified");
        assert_eq!(document.understanding.long_term_goal, "Not specified");
    }

    #[test]
    fn test_phase_ids_rederived_in_input_order() {
        let value = json!({"roadmap": {"phases": [
            {"title": "First"},
            {"title": "Second"}
        ]}});
        let document = normalize_roadmap(&value);
        assert_eq!(document.roadmap.phases[0].id, "phase-1");
        assert_eq!(document.roadmap.phases[1].id, "phase-2");
    }

    #[test]
    fn test_supplied_phase_ids_are_ignored() {
        let value = json!({"roadmap": {"phases": [
            {"id": "step-9", "title": "First"},
            {"id": "step-9", "title": "Second"}
        ]}});
        let document = normalize_roadmap(&value);
        assert_eq!(document.roadmap.phases[0].id, "phase-1");
        assert_eq!(document.roadmap.phases[1].id, "phase-2");
    }

    #[test]
    fn test_untitled_phase_gets_positional_title() {
        let document = normalize_roadmap(&json!({"roadmap": {"phases": [{}, {}]}}));
        assert_eq!(document.roadmap.phases[0].title, "Phase 1");
        assert_eq!(document.roadmap.phases[1].title, "Phase 2");
    }

    #[test]
    fn test_unknown_skill_level_falls_back_to_beginner() {
        let value = json!({"roadmap": {"phases": [
            {"skills": [{"name": "Kubernetes", "level": "expert"}]}
        ]}});
        let document = normalize_roadmap(&value);
        assert_eq!(document.roadmap.phases[0].skills[0].level, SkillLevel::Beginner);
    }

    #[test]
    fn test_bare_string_skill_is_accepted() {
        let value = json!({"roadmap": {"phases": [{"skills": ["Kubernetes"]}]}});
        let document = normalize_roadmap(&value);
        let skill = &document.roadmap.phases[0].skills[0];
        assert_eq!(skill.name, "Kubernetes");
        assert_eq!(skill.level, SkillLevel::Beginner);
    }

    #[test]
    fn test_unknown_resource_type_falls_back_to_documentation() {
        let value = json!({"roadmap": {"resources": {"learning": [
            {"skill": "Linux", "type": "podcast", "title": "t", "description": "d"}
        ]}}});
        let document = normalize_roadmap(&value);
        assert_eq!(
            document.roadmap.resources.learning[0].resource_type,
            ResourceType::Documentation
        );
    }

    #[test]
    fn test_unknown_platform_falls_back_to_forum() {
        let value = json!({"roadmap": {"resources": {"communities": [
            {"name": "n", "platform": "slack", "purpose": "p"}
        ]}}});
        let document = normalize_roadmap(&value);
        assert_eq!(
            document.roadmap.resources.communities[0].platform,
            CommunityPlatform::Forum
        );
    }

    #[test]
    fn test_non_list_fields_become_empty_lists() {
        let value = json!({
            "understanding": {"interests": "kubernetes"},
            "roadmap": {"phases": [{"tools": 7, "projects": {"a": 1}, "skills": "none"}]}
        });
        let document = normalize_roadmap(&value);
        assert!(document.understanding.interests.is_empty());
        assert!(document.roadmap.phases[0].tools.is_empty());
        assert!(document.roadmap.phases[0].projects.is_empty());
        assert!(document.roadmap.phases[0].skills.is_empty());
    }

    #[test]
    fn test_non_string_list_elements_are_dropped() {
        let value = json!({"understanding": {"interests": ["kubernetes", 42, null, "automation"]}});
        let document = normalize_roadmap(&value);
        assert_eq!(document.understanding.interests, vec!["kubernetes", "automation"]);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let over = normalize_roadmap(&json!({"meta": {"confidence": 150}}));
        assert_eq!(over.meta.confidence, 100.0);
        let under = normalize_roadmap(&json!({"meta": {"confidence": -5}}));
        assert_eq!(under.meta.confidence, 0.0);
    }

    #[test]
    fn test_negative_hours_clamped_to_zero() {
        let document = normalize_roadmap(&json!({"understanding": {"hoursPerWeek": -4}}));
        assert_eq!(document.understanding.hours_per_week, 0.0);
    }

    #[test]
    fn test_non_numeric_confidence_gets_default() {
        let document = normalize_roadmap(&json!({"meta": {"confidence": "high"}}));
        assert_eq!(document.meta.confidence, 50.0);
    }

    #[test]
    fn test_blank_strings_are_treated_as_missing() {
        let document = normalize_roadmap(&json!({"meta": {"inferredCareer": "   "}}));
        assert_eq!(document.meta.inferred_career, "Not specified");
    }
}

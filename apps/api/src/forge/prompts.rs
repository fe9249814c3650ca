// All LLM prompt constants for the Forge module.

/// System prompt for roadmap generation — enforces JSON-only output.
pub const FORGE_SYSTEM: &str =
    "You are an experienced career mentor who designs practical, phased learning roadmaps. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Roadmap prompt template. Replace `{narrative}` before sending.
pub const FORGE_PROMPT_TEMPLATE: &str = r#"Read the career narrative below and design a personalized career roadmap.

Return a JSON object with this EXACT schema (no extra fields):
{
  "meta": {
    "inferredCareer": "Platform Engineering",
    "confidence": 85
  },
  "understanding": {
    "interests": ["distributed systems", "automation"],
    "workStyle": "hands-on, project-driven",
    "longTermGoal": "run platform infrastructure for a product company",
    "hoursPerWeek": 10
  },
  "roadmap": {
    "phases": [
      {
        "id": "phase-1",
        "title": "Foundations",
        "description": "Build the fundamentals before specializing",
        "skills": [{"name": "Linux", "level": "beginner"}],
        "tools": ["Docker"],
        "projects": ["Containerize a small web service"]
      }
    ],
    "resources": {
      "learning": [
        {"skill": "Linux", "type": "youtube", "title": "Linux crash course", "description": "Shell, processes, permissions"}
      ],
      "communities": [
        {"name": "r/devops", "platform": "reddit", "purpose": "questions and peer feedback"}
      ]
    }
  }
}

Rules:
- "confidence" is a number from 0 to 100.
- "level" must be exactly one of: "beginner", "intermediate", "advanced".
- "type" must be exactly one of: "youtube", "documentation", "course".
- "platform" must be exactly one of: "discord", "reddit", "forum".
- Order phases from first to last; produce 3 to 5 phases.
- "hoursPerWeek" reflects the time commitment stated or implied in the narrative.
- Respond with JSON only. No markdown. No code fences. No commentary.

CAREER NARRATIVE:
{narrative}"#;

/// Builds the final prompt, embedding the narrative verbatim.
pub fn build_forge_prompt(narrative: &str) -> String {
    FORGE_PROMPT_TEMPLATE.replace("{narrative}", narrative)
}

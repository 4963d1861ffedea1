// All LLM prompt constants for the career tasks.
// Reuses cross-cutting fragments from llm_client::prompts.
//
// Every template embeds an `{example}` whose top-level keys are exactly the keys the
// normalizer requires for that task kind.

use crate::llm_client::prompts::{fill_template, CAREER_PERSONA, JSON_ONLY_INSTRUCTION};
use crate::models::profile::ProfileInput;

/// Profile block shared by every template. Replace the five fields before use.
pub const PROFILE_TEMPLATE: &str = "\
CANDIDATE PROFILE:
- Education: {education}
- Skills: {skills}
- Experience: {experience}
- Interests: {interests}
- Career goals: {goals}";

pub const CAREER_TWIN_EXAMPLE: &str = r#"{
  "professionalIdentity": {
    "archetype": "The Pragmatic Builder",
    "summary": "Two-sentence description of who this person is professionally.",
    "coreValues": ["Craftsmanship", "Continuous learning"]
  },
  "strengthsAndDifferentiators": {
    "topStrengths": ["Strength grounded in the listed skills"],
    "uniqueDifferentiators": ["What sets this person apart from peers"]
  },
  "roleSuitability": [
    {
      "role": "Frontend Engineer",
      "fitScore": 86,
      "keyMatchingSkills": ["React"],
      "reasoning": "Why this role fits"
    }
  ],
  "growthPotential": {
    "score": 78,
    "outlook": "Short outlook for the next 2-3 years",
    "emergingOpportunities": ["Opportunity"]
  },
  "riskFactorsAndImprovements": {
    "risks": ["Risk to the career plan"],
    "improvements": ["Concrete improvement"]
  }
}"#;

/// Career Twin prompt. Replace: {persona}, {profile}, {example}, {json_only}
pub const CAREER_TWIN_PROMPT_TEMPLATE: &str = r#"{persona}

Build a "Career Twin": a concise professional digital twin of the candidate below.

{profile}

Return a JSON object with this EXACT structure:
{example}

RULES:
1. roleSuitability must contain exactly 3 roles, best fit first
2. keyMatchingSkills must only contain skills from the candidate's own skill list
3. fitScore and growthPotential.score are integers from 0 to 100
4. Keep every text field under 40 words

{json_only}"#;

pub const TRAJECTORY_EXAMPLE: &str = r#"{
  "currentLevel": "Mid Level",
  "projections": [
    {"yearsFromNow": 1, "role": "Software Engineer II", "confidence": 80}
  ],
  "growthRate": 12,
  "recommendedSkills": ["System Design"]
}"#;

/// Career trajectory prediction prompt. Replace: {persona}, {profile}, {example}, {json_only}
pub const TRAJECTORY_PROMPT_TEMPLATE: &str = r#"{persona}

Predict the most likely career trajectory for the candidate below over the next 5 years.

{profile}

Return a JSON object with this EXACT structure:
{example}

RULES:
1. projections must contain exactly 3 entries for 1, 3 and 5 years from now
2. confidence is an integer from 0 to 100 and should decrease with distance
3. growthRate is the expected yearly compensation growth as a percentage number
4. recommendedSkills: at most 3 skills the candidate does not already have

{json_only}"#;

pub const INTERVIEW_EXAMPLE: &str = r#"{
  "overallScore": 72,
  "strengths": ["Clear structure"],
  "improvements": ["Quantify the outcome"],
  "detailedFeedback": "Two to four sentences of specific feedback.",
  "followUpSuggestions": ["A follow-up question the interviewer may ask"]
}"#;

/// Interview answer evaluation prompt.
/// Replace: {persona}, {role}, {question}, {answer}, {profile}, {example}, {json_only}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"{persona}

You are interviewing a candidate for the role of {role}. Evaluate their answer.

INTERVIEW QUESTION:
{question}

CANDIDATE ANSWER:
{answer}

{profile}

Return a JSON object with this EXACT structure:
{example}

RULES:
1. overallScore is an integer from 0 to 100
2. At most 3 strengths, 3 improvements and 3 followUpSuggestions
3. Judge structure (situation, action, result), specificity and relevance to the role

{json_only}"#;

pub const JOB_MATCH_EXAMPLE: &str = r#"[
  {
    "title": "Frontend Engineer",
    "company": "Example Corp",
    "matchScore": 88,
    "matchingSkills": ["React"],
    "missingSkills": ["TypeScript"],
    "reason": "One sentence on why this job fits"
  }
]"#;

/// Job matching prompt. Replace: {persona}, {profile}, {example}, {json_only}
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"{persona}

Suggest the jobs that best match the candidate below.

{profile}

Return a JSON ARRAY with this EXACT element structure:
{example}

RULES:
1. Return at most 5 job matches, best match first
2. matchingSkills must only contain skills from the candidate's own skill list
3. missingSkills lists at most 3 skills the candidate would need to learn
4. matchScore is an integer from 0 to 100

{json_only}"#;

pub const SKILL_DEMAND_EXAMPLE: &str = r#"[
  {"industry": "FinTech", "skill": "Python", "demandScore": 84, "growthRate": 15}
]"#;

/// Skill demand heatmap prompt. Replace: {persona}, {profile}, {example}, {json_only}
pub const SKILL_DEMAND_PROMPT_TEMPLATE: &str = r#"{persona}

Estimate current hiring demand for the candidate's skills across industries, for a heatmap.

{profile}

Return a JSON ARRAY with this EXACT element structure:
{example}

RULES:
1. Top 3 industries only
2. One entry per (industry, skill) pair, using only the candidate's own skills (at most 4 skills)
3. demandScore is an integer from 0 to 100
4. growthRate is the expected yearly demand growth as a percentage number

{json_only}"#;

pub const ROADMAP_EXAMPLE: &str = r#"{
  "targetRole": "Data Scientist",
  "totalMonths": 9,
  "phases": [
    {
      "title": "Foundations",
      "durationMonths": 3,
      "focusSkills": ["Statistics"],
      "milestones": ["Complete a statistics course"]
    }
  ]
}"#;

/// Learning roadmap prompt. Replace: {persona}, {target_role}, {profile}, {example}, {json_only}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"{persona}

Design a step-by-step learning roadmap that takes the candidate below to the role of {target_role}.

{profile}

Return a JSON object with this EXACT structure:
{example}

RULES:
1. Between 3 and 5 phases, in order
2. totalMonths equals the sum of every phase's durationMonths
3. At most 3 focusSkills and 3 milestones per phase

{json_only}"#;

pub const SIMULATION_EXAMPLE: &str = r#"{
  "scenario": "Learn Kubernetes in the next 6 months",
  "outcomes": [
    {"metric": "Role fit", "current": 60, "projected": 75}
  ],
  "salaryImpactPercent": 8,
  "recommendation": "One or two sentences of advice"
}"#;

/// "What if" simulation prompt. Replace: {persona}, {scenario}, {profile}, {example}, {json_only}
pub const SIMULATION_PROMPT_TEMPLATE: &str = r#"{persona}

Simulate how the following change would affect the candidate's career.

SCENARIO:
{scenario}

{profile}

Return a JSON object with this EXACT structure:
{example}

RULES:
1. outcomes contains exactly 3 metrics: "Role fit", "Market demand" and "Interview readiness"
2. current and projected are integers from 0 to 100
3. salaryImpactPercent is the expected change in compensation as a percentage number

{json_only}"#;

/// Renders the profile block with every missing field replaced by its named default.
pub fn render_profile(profile: &ProfileInput) -> String {
    let skills = profile.skills_text();
    let interests = profile.interests_text();
    fill_template(
        PROFILE_TEMPLATE,
        &[
            ("education", profile.education_text()),
            ("skills", &skills),
            ("experience", profile.experience_text()),
            ("interests", &interests),
            ("goals", profile.goals_text()),
        ],
    )
}

/// Fills a task template: shared fragments, the profile block, the example, and any
/// task-specific `extra` placeholders.
pub fn render_task_prompt(
    template: &str,
    example: &str,
    profile: &ProfileInput,
    extra: &[(&str, &str)],
) -> String {
    let profile_block = render_profile(profile);
    let mut values: Vec<(&str, &str)> = vec![
        ("persona", CAREER_PERSONA),
        ("profile", &profile_block),
        ("example", example),
        ("json_only", JSON_ONLY_INSTRUCTION),
    ];
    values.extend_from_slice(extra);
    fill_template(template, &values)
}

// Shared prompt fragments and prompt-building utilities.
// Each task keeps its own templates in career/prompts.rs.
// This file contains cross-cutting fragments.

/// Appended to every task prompt. Models still wrap output in fences now and then;
/// the normalizer strips them.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only, matching the example structure exactly. \
    Do NOT include any text outside the JSON. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Persona shared by all career tasks.
pub const CAREER_PERSONA: &str = "You are an expert career strategist and technical recruiter \
    with deep knowledge of hiring markets, role requirements and skill demand.";

/// Fills `{name}` placeholders in a template in a single pass, so substituted
/// values are never re-expanded. Unknown placeholders are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let name_len = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        let value = if tail[name_len..].starts_with('}') {
            values
                .iter()
                .find(|(name, _)| *name == &tail[..name_len])
                .map(|(_, v)| *v)
        } else {
            None
        };
        match value {
            Some(v) => {
                out.push_str(v);
                rest = &tail[name_len + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

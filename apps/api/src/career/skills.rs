//! Static skill catalogue used by the fallback synthesizers.
//!
//! Maps free-form skill names onto a handful of career domains, each with the roles,
//! industries, employers and adjacent skills the synthesized records draw from.

/// Broad career domain a skill belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillDomain {
    Frontend,
    Backend,
    Data,
    Cloud,
    Design,
    Generalist,
}

pub struct DomainProfile {
    pub archetype: &'static str,
    pub summary: &'static str,
    /// Entry → senior progression.
    pub ladder: [&'static str; 4],
    pub industries: [&'static str; 3],
    pub employers: [&'static str; 3],
    pub adjacent_skills: [&'static str; 4],
}

const FRONTEND_KEYWORDS: &[&str] = &[
    "react", "vue", "angular", "svelte", "javascript", "typescript", "html", "css", "next",
    "redux", "tailwind", "frontend", "front-end",
];

const BACKEND_KEYWORDS: &[&str] = &[
    "java", "go", "golang", "rust", "node", "express", "spring", "django", "flask", "c#",
    ".net", "php", "ruby", "rails", "api", "backend", "back-end", "c++", "graphql",
];

const DATA_KEYWORDS: &[&str] = &[
    "python", "sql", "pandas", "numpy", "machine learning", "ml", "tensorflow", "pytorch",
    "data", "statistics", "tableau", "power bi", "spark", "r", "excel", "ai",
];

const CLOUD_KEYWORDS: &[&str] = &[
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "devops", "linux", "ci/cd",
    "ansible", "cloud", "networking", "security",
];

const DESIGN_KEYWORDS: &[&str] = &[
    "figma", "ui", "ux", "sketch", "design", "photoshop", "illustrator", "prototyping",
    "user research",
];

impl SkillDomain {
    const CLASSIFIED: [SkillDomain; 5] = [
        SkillDomain::Frontend,
        SkillDomain::Backend,
        SkillDomain::Data,
        SkillDomain::Cloud,
        SkillDomain::Design,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            SkillDomain::Frontend => FRONTEND_KEYWORDS,
            SkillDomain::Backend => BACKEND_KEYWORDS,
            SkillDomain::Data => DATA_KEYWORDS,
            SkillDomain::Cloud => CLOUD_KEYWORDS,
            SkillDomain::Design => DESIGN_KEYWORDS,
            SkillDomain::Generalist => &[],
        }
    }

    /// Domain of a single skill, matched on whole words so "R" does not match "React".
    pub fn of_skill(skill: &str) -> SkillDomain {
        let lower = skill.trim().to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| c.is_whitespace() || c == ',' || c == '/')
            .filter(|w| !w.is_empty())
            .collect();

        SkillDomain::CLASSIFIED
            .into_iter()
            .find(|domain| {
                domain.keywords().iter().any(|kw| {
                    // multi-word and slashed keywords match as phrases
                    if kw.contains(' ') || kw.contains('/') {
                        lower.contains(kw)
                    } else {
                        words.contains(kw)
                    }
                })
            })
            .unwrap_or(SkillDomain::Generalist)
    }

    pub fn profile(self) -> &'static DomainProfile {
        match self {
            SkillDomain::Frontend => &FRONTEND,
            SkillDomain::Backend => &BACKEND,
            SkillDomain::Data => &DATA,
            SkillDomain::Cloud => &CLOUD,
            SkillDomain::Design => &DESIGN,
            SkillDomain::Generalist => &GENERALIST,
        }
    }
}

const FRONTEND: DomainProfile = DomainProfile {
    archetype: "The Interface Craftsman",
    summary: "Builds polished, responsive user experiences and turns product ideas into working interfaces.",
    ladder: [
        "Junior Frontend Developer",
        "Frontend Engineer",
        "Senior Frontend Engineer",
        "Frontend Architect",
    ],
    industries: ["E-commerce", "SaaS", "Media & Entertainment"],
    employers: ["Shopify", "Atlassian", "Spotify"],
    adjacent_skills: ["TypeScript", "Accessibility", "Testing Library", "Next.js"],
};

const BACKEND: DomainProfile = DomainProfile {
    archetype: "The Systems Builder",
    summary: "Designs reliable services and APIs that keep products fast and available under load.",
    ladder: [
        "Junior Backend Developer",
        "Backend Engineer",
        "Senior Backend Engineer",
        "Principal Engineer",
    ],
    industries: ["FinTech", "SaaS", "Logistics"],
    employers: ["Stripe", "Cloudflare", "Twilio"],
    adjacent_skills: ["PostgreSQL", "Distributed Systems", "Docker", "Observability"],
};

const DATA: DomainProfile = DomainProfile {
    archetype: "The Insight Engineer",
    summary: "Turns raw data into decisions, models and measurable business outcomes.",
    ladder: [
        "Data Analyst",
        "Data Scientist",
        "Senior Data Scientist",
        "Machine Learning Lead",
    ],
    industries: ["Healthcare", "FinTech", "Retail Analytics"],
    employers: ["Databricks", "Snowflake", "Airbnb"],
    adjacent_skills: ["SQL", "Machine Learning", "Data Visualization", "Statistics"],
};

const CLOUD: DomainProfile = DomainProfile {
    archetype: "The Platform Architect",
    summary: "Automates infrastructure and keeps delivery pipelines secure, repeatable and observable.",
    ladder: [
        "Cloud Support Engineer",
        "DevOps Engineer",
        "Senior Site Reliability Engineer",
        "Cloud Architect",
    ],
    industries: ["Cloud Services", "Telecommunications", "FinTech"],
    employers: ["HashiCorp", "DigitalOcean", "Datadog"],
    adjacent_skills: ["Kubernetes", "Terraform", "Monitoring", "Cloud Security"],
};

const DESIGN: DomainProfile = DomainProfile {
    archetype: "The Experience Designer",
    summary: "Shapes how products feel, grounding design decisions in research and usability.",
    ladder: [
        "Junior UX Designer",
        "Product Designer",
        "Senior Product Designer",
        "Design Lead",
    ],
    industries: ["Consumer Apps", "SaaS", "EdTech"],
    employers: ["Figma", "Canva", "Duolingo"],
    adjacent_skills: ["User Research", "Design Systems", "Prototyping", "Accessibility"],
};

const GENERALIST: DomainProfile = DomainProfile {
    archetype: "The Versatile Problem Solver",
    summary: "Adapts quickly across teams and problems, connecting technical and business needs.",
    ladder: [
        "Associate Software Engineer",
        "Software Engineer",
        "Senior Software Engineer",
        "Engineering Manager",
    ],
    industries: ["Technology", "Consulting", "EdTech"],
    employers: ["Accenture", "Thoughtworks", "Microsoft"],
    adjacent_skills: ["Git", "Communication", "Agile Delivery", "Cloud Fundamentals"],
};

/// A domain with the caller's skills that belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainMatch {
    pub domain: SkillDomain,
    pub skills: Vec<String>,
}

/// Groups skills by domain, strongest domain first. Ties keep the order in which
/// the domain's first skill appeared. Never empty: no skills yields `Generalist`.
pub fn rank_domains(skills: &[&str]) -> Vec<DomainMatch> {
    let mut matches: Vec<DomainMatch> = Vec::new();
    for skill in skills {
        let domain = SkillDomain::of_skill(skill);
        match matches.iter_mut().find(|m| m.domain == domain) {
            Some(m) => m.skills.push((*skill).to_string()),
            None => matches.push(DomainMatch {
                domain,
                skills: vec![(*skill).to_string()],
            }),
        }
    }
    // stable sort keeps first-appearance order among equals
    matches.sort_by(|a, b| b.skills.len().cmp(&a.skills.len()));
    if matches.is_empty() {
        matches.push(DomainMatch {
            domain: SkillDomain::Generalist,
            skills: Vec::new(),
        });
    }
    matches
}

/// Adjacent skills of `domain` the caller does not already list.
pub fn missing_adjacent(domain: SkillDomain, have: &[&str], n: usize) -> Vec<String> {
    domain
        .profile()
        .adjacent_skills
        .iter()
        .filter(|s| !have.iter().any(|h| h.eq_ignore_ascii_case(s)))
        .take(n)
        .map(|s| s.to_string())
        .collect()
}

/// Whether `text` mentions `term` as a whole word, or as a phrase when the term has
/// spaces or slashes. "Go" does not match "good" and "R" does not match "really".
pub fn mentions_term(text: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    if term.contains(' ') || term.contains('/') {
        return lower.contains(&term);
    }
    // '#', '+' and '.' stay inside words for C#, C++ and Node.js
    lower
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '#' | '+' | '.')))
        .map(|w| w.trim_end_matches('.'))
        .any(|w| w == term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_skill_matches_whole_words() {
        assert_eq!(SkillDomain::of_skill("React"), SkillDomain::Frontend);
        assert_eq!(SkillDomain::of_skill("R"), SkillDomain::Data);
        assert_eq!(SkillDomain::of_skill("Machine Learning"), SkillDomain::Data);
        assert_eq!(SkillDomain::of_skill("Node"), SkillDomain::Backend);
        assert_eq!(SkillDomain::of_skill("CI/CD"), SkillDomain::Cloud);
        assert_eq!(SkillDomain::of_skill("Figma"), SkillDomain::Design);
        assert_eq!(SkillDomain::of_skill("Public Speaking"), SkillDomain::Generalist);
    }

    #[test]
    fn test_rank_domains_orders_by_count_then_appearance() {
        let ranked = rank_domains(&["React", "Python", "SQL"]);
        assert_eq!(ranked[0].domain, SkillDomain::Data);
        assert_eq!(ranked[0].skills, vec!["Python", "SQL"]);
        assert_eq!(ranked[1].domain, SkillDomain::Frontend);

        let tied = rank_domains(&["React", "Python"]);
        assert_eq!(tied[0].domain, SkillDomain::Frontend);
        assert_eq!(tied[0].skills, vec!["React"]);
    }

    #[test]
    fn test_rank_domains_without_skills_is_generalist() {
        let ranked = rank_domains(&[]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].domain, SkillDomain::Generalist);
    }

    #[test]
    fn test_missing_adjacent_skips_known_skills() {
        let missing = missing_adjacent(SkillDomain::Data, &["sql"], 2);
        assert_eq!(missing, vec!["Machine Learning", "Data Visualization"]);
    }

    #[test]
    fn test_mentions_term_matches_whole_words_only() {
        let answer = "It went really well, good results with Rust. I also used C++ and Node.js.";
        assert!(!mentions_term(answer, "R"));
        assert!(!mentions_term(answer, "Go"));
        assert!(mentions_term(answer, "rust"));
        assert!(mentions_term(answer, "C++"));
        assert!(mentions_term(answer, "Node.js"));
        assert!(mentions_term("Shipped the CI/CD pipeline", "CI/CD"));
        assert!(mentions_term("Worked on machine learning models", "Machine Learning"));
        assert!(mentions_term("Wrote the service in Go.", "Go"));
        assert!(!mentions_term(answer, "  "));
    }
}

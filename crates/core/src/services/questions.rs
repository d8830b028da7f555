//! Review question generation.
//!
//! Builds a code context from a repository's root listing, asks a chat
//! completion API for three review questions, and falls back to fixed
//! templates whenever the primary path cannot produce a full set.

use crate::services::repo_client::{RepoClient, RepoEntry};
use forgefeed_common::config::CompletionConfig;
use forgefeed_common::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

/// Characters of README text embedded in the prompt.
const README_CONTEXT_CHARS: usize = 500;
/// Characters of each source file embedded in the prompt.
const SOURCE_CONTEXT_CHARS: usize = 1000;
/// Characters of manifest/middleware/layout embedded in the prompt.
const FILE_CONTEXT_CHARS: usize = 2000;

/// Source files worth feeding to the prompt. The biggest ones usually
/// carry the most logic.
static SOURCE_FILE_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\.(ts|tsx|js|jsx|py|go|rs)$").unwrap()
});

/// Ordered manifest candidates for a primary language.
#[must_use]
pub fn manifest_candidates(language: Option<&str>) -> &'static [&'static str] {
    match language {
        Some("TypeScript" | "JavaScript") => &["package.json"],
        Some("Go") => &["go.mod"],
        Some("Rust") => &["Cargo.toml", "Cargo.lock"],
        Some("Python") => &["requirements.txt", "pyproject.toml", "setup.py"],
        Some("Java") => &["pom.xml", "build.gradle"],
        _ => &["package.json", "go.mod", "Cargo.toml", "requirements.txt"],
    }
}

/// Pick the manifest to fetch: the first candidate present in the root
/// listing, or the first candidate when none is present (the fetch then
/// yields "not found" context rather than an error).
#[must_use]
pub fn resolve_manifest(language: Option<&str>, entries: &[RepoEntry]) -> &'static str {
    let candidates = manifest_candidates(language);
    candidates
        .iter()
        .find(|c| entries.iter().any(|e| e.name == **c))
        .or_else(|| candidates.first())
        .copied()
        .unwrap_or("package.json")
}

/// The two largest source files in the root listing.
#[must_use]
pub fn interesting_sources(entries: &[RepoEntry]) -> Vec<&RepoEntry> {
    let mut files: Vec<&RepoEntry> = entries
        .iter()
        .filter(|e| {
            e.is_file() && (SOURCE_FILE_RE.is_match(&e.name) || e.name == "package.json")
        })
        .collect();
    files.sort_by(|a, b| b.size.cmp(&a.size));
    files.truncate(2);
    files
}

/// Code context assembled from a repository for prompt building.
#[derive(Debug, Clone, Default)]
pub struct RepoContext {
    /// Name of the resolved manifest file.
    pub manifest_name: String,
    /// Manifest content, if present.
    pub manifest: Option<String>,
    /// Middleware/routing file content, if present.
    pub middleware: Option<String>,
    /// Layout/entry-point file content, if present.
    pub layout: Option<String>,
    /// README content, if present.
    pub readme: Option<String>,
    /// Up to two (name, content) pairs of the largest source files.
    pub sources: Vec<(String, String)>,
}

/// Result of a generation run: exactly three questions, flagged when the
/// fallback templates were used.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GeneratedQuestions {
    /// The three review questions.
    pub questions: Vec<String>,
    /// Whether the fixed templates were used instead of the model.
    pub fallback: bool,
}

/// Question generation service.
#[derive(Clone)]
pub struct QuestionService {
    repo_client: RepoClient,
    http: reqwest::Client,
    config: CompletionConfig,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl QuestionService {
    /// Create a new question service.
    #[must_use]
    pub fn new(repo_client: RepoClient, config: CompletionConfig) -> Self {
        Self {
            repo_client,
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Generate three review questions for a repository.
    ///
    /// Never fails: any problem on the primary path (missing API key,
    /// upstream error, malformed output) resolves to the fallback
    /// templates with `fallback: true`.
    pub async fn generate(
        &self,
        token: &str,
        full_name: &str,
        description: Option<&str>,
        language: Option<&str>,
    ) -> GeneratedQuestions {
        let Some(api_key) = self.config.api_key.clone() else {
            tracing::info!(repo = %full_name, "No completion API key configured, using fallback questions");
            return GeneratedQuestions {
                questions: fallback_questions(full_name),
                fallback: true,
            };
        };

        let context = self.assemble_context(token, full_name, language).await;

        match self
            .ask(&api_key, full_name, description, language, &context)
            .await
        {
            Ok(questions) => GeneratedQuestions {
                questions,
                fallback: false,
            },
            Err(e) => {
                tracing::warn!(repo = %full_name, error = %e, "Question generation failed, using fallback");
                GeneratedQuestions {
                    questions: fallback_questions(full_name),
                    fallback: true,
                }
            }
        }
    }

    /// Fetch the code context for a repository. Each piece is optional;
    /// the six fetches run concurrently and failures resolve to `None`.
    pub async fn assemble_context(
        &self,
        token: &str,
        full_name: &str,
        language: Option<&str>,
    ) -> RepoContext {
        let entries = self.repo_client.root_listing(token, full_name).await;
        let manifest_name = resolve_manifest(language, &entries);

        let sources = interesting_sources(&entries);
        let source_one = sources.first().map(|e| e.name.clone()).unwrap_or_default();
        let source_two = sources.get(1).map(|e| e.name.clone()).unwrap_or_default();

        let (manifest, middleware, layout, readme, content_one, content_two) = tokio::join!(
            self.repo_client.file_content(token, full_name, manifest_name),
            self.file_with_fallback(token, full_name, "middleware.ts", "middleware.js"),
            self.file_with_fallback(token, full_name, "app/layout.tsx", "app/layout.js"),
            self.repo_client.file_content(token, full_name, "README.md"),
            self.repo_client.file_content(token, full_name, &source_one),
            self.repo_client.file_content(token, full_name, &source_two),
        );

        let sources = [(source_one, content_one), (source_two, content_two)]
            .into_iter()
            .filter_map(|(name, content)| content.map(|c| (name, c)))
            .collect();

        RepoContext {
            manifest_name: manifest_name.to_string(),
            manifest,
            middleware,
            layout,
            readme,
            sources,
        }
    }

    async fn file_with_fallback(
        &self,
        token: &str,
        full_name: &str,
        primary: &str,
        secondary: &str,
    ) -> Option<String> {
        match self
            .repo_client
            .file_content(token, full_name, primary)
            .await
        {
            Some(content) => Some(content),
            None => {
                self.repo_client
                    .file_content(token, full_name, secondary)
                    .await
            }
        }
    }

    async fn ask(
        &self,
        api_key: &str,
        full_name: &str,
        description: Option<&str>,
        language: Option<&str>,
        context: &RepoContext,
    ) -> AppResult<Vec<String>> {
        let prompt = build_prompt(full_name, description, language, context);

        let url = format!("{}/chat/completions", self.config.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.config.model,
                "messages": [
                    {
                        "role": "system",
                        "content": "You are a senior software architect. You strictly follow the requested line-oriented output format.",
                    },
                    { "role": "user", "content": prompt },
                ],
                "temperature": 0.8,
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Completion request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Completion API error: {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Completion response invalid: {e}")))?;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        parse_questions(content).ok_or_else(|| {
            AppError::ExternalService("Completion output did not contain 3 questions".to_string())
        })
    }
}

/// Build the chat prompt from the repository metadata and code context.
fn build_prompt(
    full_name: &str,
    description: Option<&str>,
    language: Option<&str>,
    context: &RepoContext,
) -> String {
    let capped = |value: Option<&str>, max: usize, missing: &str| -> String {
        value.map_or_else(|| missing.to_string(), |v| truncate_chars(v, max).to_string())
    };

    let source = |idx: usize| -> String {
        context.sources.get(idx).map_or_else(
            || "None found".to_string(),
            |(name, content)| format!("{name}:\n{}", truncate_chars(content, SOURCE_CONTEXT_CHARS)),
        )
    };

    format!(
        "You are a senior software architect reviewing a GitHub repository.\n\
         Ask concrete, logically driven questions about code logic, specific lines, and system design. Avoid vague questions.\n\
         Repo Name: {full_name}\n\
         Description: {description}\n\
         Primary Language: {language}\n\
         \n\
         CODE CONTEXT:\n\
         ---\n\
         Architectural Manifest ({manifest_name}):\n\
         {manifest}\n\
         ---\n\
         Middleware/Routing logic:\n\
         {middleware}\n\
         ---\n\
         Main Layout/Entry point:\n\
         {layout}\n\
         ---\n\
         README snippet:\n\
         {readme}\n\
         ---\n\
         Source Code Context 1:\n\
         {source_one}\n\
         ---\n\
         Source Code Context 2:\n\
         {source_two}\n\
         ---\n\
         \n\
         TASK:\n\
         Generate exactly 3 UNIQUE, deeply technical, and logically driven questions for the developer in the following SPECIFIC ORDER:\n\
         1. Scalability: Focus on bottleneck handling, growth strategies, or cloud-native patterns.\n\
         2. Tech Stack: Focus on implementation patterns, data flow, and technical trade-offs of the chosen tools.\n\
         3. Security: Focus on auth logic, data protection, and vulnerability prevention.\n\
         \n\
         CRITICAL GUIDELINES:\n\
         - NEVER ask a question that mentions a missing file.\n\
         - Only ask questions based on code that IS PRESENT in the context above.\n\
         - Use terminology specific to the {language} ecosystem.\n\
         - Every question MUST reference a specific logic pattern found in the provided snippets.\n\
         \n\
         FORMAT:\n\
         1. Start with the line \"QUESTIONS_START\"\n\
         2. List exactly 3 questions, each on a new line starting with \"[Q]\"\n\
         3. End with the line \"QUESTIONS_END\"\n\
         \n\
         Example Output:\n\
         QUESTIONS_START\n\
         [Q] (Scalability) Your middleware handles X, but how do you prevent Y from scaling to Z users?\n\
         [Q] (Tech Stack) Given your use of A, how do you manage cold-start latency in the B component?\n\
         [Q] (Security) I noticed the C pattern in D; how do you prevent unauthorized access to E?\n\
         QUESTIONS_END\n",
        full_name = full_name,
        description = description.unwrap_or("Not provided"),
        language = language.unwrap_or("Unknown"),
        manifest_name = context.manifest_name,
        manifest = capped(context.manifest.as_deref(), FILE_CONTEXT_CHARS, "Not found"),
        middleware = capped(context.middleware.as_deref(), FILE_CONTEXT_CHARS, "Not found"),
        layout = capped(context.layout.as_deref(), FILE_CONTEXT_CHARS, "Not found"),
        readme = capped(context.readme.as_deref(), README_CONTEXT_CHARS, "Not found"),
        source_one = source(0),
        source_two = source(1),
    )
}

/// Parse model output: scan for `[Q]`-tagged lines, strip the tag, take
/// the first three. Fewer than three tagged lines means the output is
/// unusable.
#[must_use]
pub fn parse_questions(content: &str) -> Option<Vec<String>> {
    let questions: Vec<String> = content
        .lines()
        .filter_map(|line| line.split_once("[Q]"))
        .map(|(_, rest)| rest.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(3)
        .collect();

    (questions.len() == 3).then_some(questions)
}

/// Fixed question templates built from the repository short name.
#[must_use]
pub fn fallback_questions(full_name: &str) -> Vec<String> {
    let short_name = full_name.rsplit('/').next().unwrap_or(full_name);
    vec![
        format!(
            "How does the current architecture of {short_name} handle increased load or data volume?"
        ),
        "What specific trade-offs did you make when selecting the core tech stack for this project?"
            .to_string(),
        format!(
            "What security measures or data validation patterns are implemented in the {short_name} codebase?"
        ),
    ]
}

/// Truncate to at most `max` characters without splitting a UTF-8 char.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> RepoEntry {
        serde_json::from_value(json!({ "name": name, "type": "file", "size": size })).unwrap()
    }

    fn dir(name: &str) -> RepoEntry {
        serde_json::from_value(json!({ "name": name, "type": "dir" })).unwrap()
    }

    #[test]
    fn test_manifest_candidates_go() {
        assert_eq!(manifest_candidates(Some("Go")), &["go.mod"]);
    }

    #[test]
    fn test_manifest_candidates_rust() {
        assert_eq!(
            manifest_candidates(Some("Rust")),
            &["Cargo.toml", "Cargo.lock"]
        );
    }

    #[test]
    fn test_manifest_candidates_unknown_language() {
        assert_eq!(
            manifest_candidates(Some("Haskell")),
            &["package.json", "go.mod", "Cargo.toml", "requirements.txt"]
        );
        assert_eq!(
            manifest_candidates(None),
            &["package.json", "go.mod", "Cargo.toml", "requirements.txt"]
        );
    }

    #[test]
    fn test_resolve_manifest_prefers_present_candidate() {
        let entries = vec![file("setup.py", 10), file("pyproject.toml", 20)];
        assert_eq!(resolve_manifest(Some("Python"), &entries), "pyproject.toml");
    }

    #[test]
    fn test_resolve_manifest_absent_falls_back_to_first_candidate() {
        assert_eq!(resolve_manifest(Some("Go"), &[]), "go.mod");
        assert_eq!(resolve_manifest(Some("Rust"), &[]), "Cargo.toml");
    }

    #[test]
    fn test_interesting_sources_picks_two_biggest_files() {
        let entries = vec![
            file("small.rs", 100),
            file("big.rs", 9000),
            file("medium.py", 4000),
            file("README.md", 50_000),
            dir("src"),
        ];

        let picked = interesting_sources(&entries);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].name, "big.rs");
        assert_eq!(picked[1].name, "medium.py");
    }

    #[test]
    fn test_interesting_sources_includes_package_json() {
        let entries = vec![file("package.json", 500)];
        let picked = interesting_sources(&entries);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "package.json");
    }

    #[test]
    fn test_parse_questions_well_formed() {
        let content = "QUESTIONS_START\n\
                       [Q] (Scalability) How does the cache scale?\n\
                       [Q] (Tech Stack) Why axum over actix?\n\
                       [Q] (Security) How are tokens rotated?\n\
                       QUESTIONS_END";

        let questions = parse_questions(content).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0], "(Scalability) How does the cache scale?");
    }

    #[test]
    fn test_parse_questions_takes_first_three_of_many() {
        let content = "[Q] one\n[Q] two\n[Q] three\n[Q] four\n[Q] five";
        let questions = parse_questions(content).unwrap();
        assert_eq!(questions, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_parse_questions_too_few() {
        assert!(parse_questions("[Q] one\n[Q] two").is_none());
        assert!(parse_questions("no questions here").is_none());
        assert!(parse_questions("").is_none());
    }

    #[test]
    fn test_parse_questions_tolerates_leading_noise() {
        let content = "Sure! Here are the questions:\n\
                       1. [Q] one\n\
                       > [Q] two\n\
                       [Q] three";

        let questions = parse_questions(content).unwrap();
        assert_eq!(questions, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_parse_questions_skips_empty_tags() {
        assert!(parse_questions("[Q]\n[Q] one\n[Q] two").is_none());
    }

    #[test]
    fn test_fallback_questions_uses_short_name() {
        let questions = fallback_questions("octo/widget");
        assert_eq!(questions.len(), 3);
        assert!(questions[0].contains("widget"));
        assert!(!questions[0].contains("octo/"));
        assert!(questions[2].contains("widget"));
    }

    #[test]
    fn test_fallback_questions_without_slash() {
        let questions = fallback_questions("widget");
        assert!(questions[0].contains("widget"));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("短い文字列", 3), "短い文");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[tokio::test]
    async fn test_generate_without_api_key_falls_back() {
        let repo_client = RepoClient::new("http://localhost:9").unwrap();
        let config = CompletionConfig {
            api_key: None,
            ..Default::default()
        };
        let service = QuestionService::new(repo_client, config);

        let result = service
            .generate("token", "octo/widget", None, Some("Rust"))
            .await;

        assert!(result.fallback);
        assert_eq!(result.questions.len(), 3);
        assert!(result.questions[0].contains("widget"));
    }
}

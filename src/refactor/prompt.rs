//! Refactor prompt template

use serde::{Deserialize, Serialize};

use super::language::Language;
use crate::ai::PromptBuilder;

/// Optional flags that add directives to the prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefactorSettings {
    pub add_comments: bool,
    pub improve_naming: bool,
    pub remove_dead_code: bool,
}

/// Directives every refactor request carries
const MANDATORY_DIRECTIVES: [&str; 7] = [
    "Improve code readability and maintainability",
    "Apply modern syntax and current best practices",
    "Remove duplicated logic",
    "Use clear, consistent naming",
    "Add proper error handling where it is missing",
    "Optimize performance where it does not hurt clarity",
    "Preserve the exact external behavior and public interface",
];

const COMMENTS_DIRECTIVE: &str = "Add concise comments explaining non-obvious logic";
const NAMING_DIRECTIVE: &str = "Rename variables and functions to be descriptive and self-documenting";
const DEAD_CODE_DIRECTIVE: &str = "Remove unused variables, functions, imports and unreachable code";

/// Build the single-turn refactor prompt for `code`
pub fn build_refactor_prompt(code: &str, language: Language, settings: &RefactorSettings) -> String {
    let optional = [
        (settings.add_comments, COMMENTS_DIRECTIVE),
        (settings.improve_naming, NAMING_DIRECTIVE),
        (settings.remove_dead_code, DEAD_CODE_DIRECTIVE),
    ]
    .into_iter()
    .filter_map(|(enabled, directive)| enabled.then_some(directive));

    PromptBuilder::new()
        .role("software engineer", "code refactoring")
        .text(&format!(
            "Refactor the following {} code. {}.",
            language.display_name(),
            language.style_instruction()
        ))
        .directives("Requirements", MANDATORY_DIRECTIVES.into_iter().chain(optional))
        .section("Original code", "")
        .code(language.as_str(), code)
        .text(
            "Return ONLY the refactored code. Do not include explanations, \
             notes or markdown formatting.",
        )
        .build()
}

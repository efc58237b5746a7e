//! Language Detection Module
//!
//! Maps request language tags and uploaded filenames to the handful of
//! language variants the refactor prompt knows how to instruct.
//!
//! ```rust,ignore
//! use coderefine::refactor::{Language, detect_upload_language};
//!
//! assert_eq!(Language::from_tag("TypeScript"), Language::TypeScript);
//! assert_eq!(Language::from_tag("cobol"), Language::JavaScript);
//! assert_eq!(detect_upload_language("api-handler.js"), Language::NodeJs);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::files::SOURCE_EXTENSIONS;

/// Language metadata entry
struct LanguageMeta {
    /// Human-readable name used in the prompt
    display_name: &'static str,
    /// Wire tag, also used on the prompt's code fence
    tag: &'static str,
    /// Style instruction embedded in the prompt
    style: &'static str,
}

/// Supported language variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    TypeScript,
    React,
    NodeJs,
    Json,
}

impl Language {
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::JavaScript => LanguageMeta {
                display_name: "JavaScript",
                tag: "javascript",
                style: "Use modern ES6+ JavaScript syntax and best practices",
            },
            Language::TypeScript => LanguageMeta {
                display_name: "TypeScript",
                tag: "typescript",
                style: "Use TypeScript with proper types, interfaces and strict typing",
            },
            Language::React => LanguageMeta {
                display_name: "React",
                tag: "react",
                style: "Use modern React with functional components and hooks",
            },
            Language::NodeJs => LanguageMeta {
                display_name: "Node.js",
                tag: "nodejs",
                style: "Use modern Node.js patterns with async/await and proper error handling",
            },
            Language::Json => LanguageMeta {
                display_name: "JSON",
                tag: "json",
                style: "Format JSON consistently with proper indentation and logical key ordering",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.meta().tag
    }

    pub fn display_name(&self) -> &'static str {
        self.meta().display_name
    }

    /// Style instruction for the refactor prompt
    pub fn style_instruction(&self) -> &'static str {
        self.meta().style
    }

    /// Resolve a request tag, falling back to JavaScript for unknown tags
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "react" | "jsx" | "tsx" => Ok(Language::React),
            "nodejs" | "node" | "node.js" => Ok(Language::NodeJs),
            "json" => Ok(Language::Json),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension of a filename, if any
pub fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether the filename carries an accepted source extension
pub fn is_source_file(name: &str) -> bool {
    file_extension(name).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.as_str()))
}

/// Infer the language of a single uploaded file.
///
/// `.tsx`/`.jsx` → React, `.ts` → TypeScript, names mentioning `server` or
/// `api` → Node.js, anything else → JavaScript.
pub fn detect_upload_language(file_name: &str) -> Language {
    let lower = file_name.to_ascii_lowercase();
    match file_extension(&lower).as_deref() {
        Some("tsx") | Some("jsx") => Language::React,
        Some("ts") => Language::TypeScript,
        _ if lower.contains("server") || lower.contains("api") => Language::NodeJs,
        _ => Language::JavaScript,
    }
}

/// Infer the language of a batch entry: the upload mapping plus `.json`.
pub fn detect_batch_language(file_name: &str) -> Language {
    match file_extension(file_name).as_deref() {
        Some("json") => Language::Json,
        _ => detect_upload_language(file_name),
    }
}

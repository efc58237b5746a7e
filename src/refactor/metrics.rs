//! Refactor Metrics
//!
//! Line-count statistics and a heuristic "quality score" for a rewrite.
//!
//! The score is a text heuristic: it looks for a few surface signals
//! (async/await replacing callbacks, more comments, output that did not
//! shrink drastically) and says nothing about whether the rewrite is correct
//! or actually better. Treat it as decoration, not measurement.

use serde::Serialize;

use crate::constants::quality;

/// Statistics describing one original → refactored transformation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub original_lines: usize,
    pub refactored_lines: usize,
    /// Never negative: growth reports 0
    pub lines_reduced: usize,
    /// refactored / original non-blank lines; 1.0 when the original is blank
    pub compression_ratio: f64,
    /// Heuristic score in [1.0, 5.0]
    pub quality_score: f64,
}

impl Metrics {
    /// Compute metrics from the two texts. Pure and total.
    pub fn compute(original: &str, refactored: &str) -> Self {
        let original_lines = count_code_lines(original);
        let refactored_lines = count_code_lines(refactored);

        let compression_ratio = if original_lines == 0 {
            1.0
        } else {
            refactored_lines as f64 / original_lines as f64
        };

        Self {
            original_lines,
            refactored_lines,
            lines_reduced: original_lines.saturating_sub(refactored_lines),
            compression_ratio,
            quality_score: quality_score(original, refactored),
        }
    }
}

/// Non-blank line count
pub fn count_code_lines(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Heuristic score: baseline plus bonuses, clamped to [1.0, 5.0]
pub fn quality_score(original: &str, refactored: &str) -> f64 {
    let mut score = quality::BASELINE;

    if uses_callbacks(original) && uses_async(refactored) {
        score += quality::ASYNC_BONUS;
    }

    if count_comments(refactored) > count_comments(original) {
        score += quality::COMMENT_BONUS;
    }

    let original_len = original.chars().count() as f64;
    let refactored_len = refactored.chars().count() as f64;
    if refactored_len >= original_len * quality::NAMING_LENGTH_RATIO {
        score += quality::NAMING_BONUS;
    }

    score.clamp(quality::MIN_SCORE, quality::MAX_SCORE)
}

fn uses_callbacks(code: &str) -> bool {
    code.contains("callback") || code.contains("cb(") || code.contains(".then(")
}

fn uses_async(code: &str) -> bool {
    code.contains("async ") || code.contains("await ")
}

/// Inline (`//`) and block (`/*`) comment openers
fn count_comments(code: &str) -> usize {
    code.matches("//").count() + code.matches("/*").count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_counts_non_blank_lines() {
        assert_eq!(count_code_lines("a\n\n  \nb\n"), 2);
        assert_eq!(count_code_lines(""), 0);
        assert_eq!(count_code_lines("\n\t\n"), 0);
    }

    #[test]
    fn test_reduction_and_ratio() {
        let original = "let a = 1;\nlet b = 2;\nlet c = 3;\nlet d = 4;";
        let refactored = "const [a, b] = [1, 2];\nconst [c, d] = [3, 4];";
        let metrics = Metrics::compute(original, refactored);

        assert_eq!(metrics.original_lines, 4);
        assert_eq!(metrics.refactored_lines, 2);
        assert_eq!(metrics.lines_reduced, 2);
        assert!((metrics.compression_ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_growth_reports_zero_reduction() {
        let metrics = Metrics::compute("a()", "// call a\na()\nb()");
        assert_eq!(metrics.lines_reduced, 0);
        assert!(metrics.compression_ratio > 1.0);
    }

    #[test]
    fn test_blank_original_has_unit_ratio() {
        let metrics = Metrics::compute("   \n", "const x = 1;");
        assert_eq!(metrics.original_lines, 0);
        assert_eq!(metrics.compression_ratio, 1.0);
    }

    #[test]
    fn test_async_bonus_requires_callback_original() {
        let original = "fs.readFile(p, function (err, data) { callback(data); });";
        let refactored = "const data = await fs.promises.readFile(p); return data; // read file contents async ";
        // async + comments + length all apply
        let score = quality_score(original, refactored);
        assert!((score - 4.0).abs() < 1e-9, "score was {score}");

        // Same output without callbacks in the original: no async bonus
        let score = quality_score("const data = readFileSync(p);", refactored);
        assert!((score - 3.5).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_shrunk_output_gets_baseline_only() {
        let original = "const veryLongVariableName = computeSomethingExpensive(argumentOne);";
        let score = quality_score(original, "x()");
        assert!((score - quality::BASELINE).abs() < 1e-9);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Metrics::compute("a", "b")).unwrap();
        assert!(json.get("originalLines").is_some());
        assert!(json.get("linesReduced").is_some());
        assert!(json.get("compressionRatio").is_some());
        assert!(json.get("qualityScore").is_some());
    }

    proptest! {
        #[test]
        fn prop_score_in_range_and_reduction_non_negative(
            original in "(?s).{0,300}",
            refactored in "(?s).{0,300}",
        ) {
            let metrics = Metrics::compute(&original, &refactored);
            prop_assert!(metrics.quality_score >= 1.0 && metrics.quality_score <= 5.0);
            prop_assert_eq!(
                metrics.lines_reduced,
                metrics.original_lines.saturating_sub(metrics.refactored_lines)
            );
            prop_assert!(metrics.lines_reduced <= metrics.original_lines);
            if metrics.original_lines == 0 {
                prop_assert_eq!(metrics.compression_ratio, 1.0);
            }
        }
    }
}

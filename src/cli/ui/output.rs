use console::{StyledObject, style};

/// Styled terminal lines for the serve banner and config commands
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    fn mark(&self, symbol: StyledObject<&str>, message: &str) {
        println!("{} {}", symbol, message);
    }

    pub fn success(&self, message: &str) {
        self.mark(style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        self.mark(style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        self.mark(style("ℹ").blue(), message);
    }

    /// Bold title preceded by a blank line
    pub fn header(&self, title: &str) {
        println!("\n{}", style(title).bold());
    }

    /// Aligned `label: value` line, label dimmed
    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<10} {}", style(format!("{}:", label)).dim(), value);
    }
}

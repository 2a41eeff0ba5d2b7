//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use tada_core::Todo;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single todo
    pub fn print_todo(&self, todo: &Todo) {
        match self.format {
            OutputFormat::Human => println!("{}", todo_line(todo)),
            OutputFormat::Json => print_json(todo),
            OutputFormat::Quiet => println!("{}", todo.id),
        }
    }

    /// Print the whole list
    pub fn print_todos(&self, todos: &[Todo]) {
        match self.format {
            OutputFormat::Human => {
                if todos.is_empty() {
                    println!("No todos yet. Add one with `tada add <text>`.");
                    return;
                }
                for todo in todos {
                    println!("{}", todo_line(todo));
                }
                println!("\n{}", summary(todos));
            }
            OutputFormat::Json => print_json(&todos),
            OutputFormat::Quiet => {
                for todo in todos {
                    println!("{}", todo.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// `[x] 12  text`, truncated to a single terminal line
pub fn todo_line(todo: &Todo) -> String {
    let mark = if todo.completed { "x" } else { " " };
    format!(
        "[{}] {:<4} {}",
        mark,
        todo.id.to_string(),
        truncate(&todo.text, 70)
    )
}

/// `3 todo(s), 1 done`
pub fn summary(todos: &[Todo]) -> String {
    let done = todos.iter().filter(|t| t.completed).count();
    format!("{} todo(s), {} done", todos.len(), done)
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    if first_line.chars().count() <= max_len && first_line.len() == s.len() {
        return s.to_string();
    }
    let kept: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

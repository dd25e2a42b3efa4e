//! Pure formatting functions for UI output.
//!
//! Colours come from `console`, which drops them automatically when the
//! stream is not a terminal.

use console::style;

use crate::cli::orchestration::ReleaseStep;
use crate::error::HardStop;
use crate::warning::ReleaseWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").for_stderr().red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal warning.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").for_stderr().yellow(), warning);
}

/// Echo a command right before it runs.
pub fn display_command(command: &str) {
    println!("executing {}", style(command).cyan());
}

/// Print the diagnostics of a hard stop, one per line, unstyled.
pub fn display_hard_stop(stop: &HardStop) {
    for line in stop.diagnostics() {
        println!("{}", line);
    }
}

/// Display the numbered steps of a release plan.
pub fn display_plan(tag: &str, steps: &[ReleaseStep]) {
    println!("\n{}", style(format!("Release plan for {}:", tag)).bold());
    for (i, step) in steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_status_and_success() {
        // Visual verification test - output is printed to stdout
        display_status("test status");
        display_success("test success");
        display_command("git add .");
    }

    #[test]
    fn test_display_hard_stop() {
        display_hard_stop(&HardStop::NotOnRelease);
    }
}

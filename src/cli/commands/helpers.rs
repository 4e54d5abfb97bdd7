//! Shared helper functions for command execution.

use crate::cli::RuntimeConfig;
use crate::error::ReleaseError;

/// Show a failed command to the operator.
///
/// A declined checkpoint is the operator's own decision, so it gets a single
/// line instead of an error with recovery suggestions.
pub(super) fn report_error(config: &RuntimeConfig, command: &str, error: &ReleaseError) {
    if error.is_operator_abort() {
        config.warning_println(&error.to_string());
        return;
    }

    config.error_println(&format!("Command '{}' failed: {}", command, error));

    let suggestions = error.recovery_suggestions();
    if !suggestions.is_empty() && !config.is_quiet() {
        config.println("\n💡 Recovery suggestions:");
        for suggestion in suggestions {
            config.println(&format!("  • {}", suggestion));
        }
    }
}

use console::style;
use satlens_core::SatlensError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Backend could not be reached at all
pub fn backend_unreachable(error: &str) -> CliError {
    CliError::new("Cannot reach the analysis backend")
        .with_context(format!("No response was received.\n\nError: {}", error))
        .with_suggestion("Check that the backend is running")
        .with_suggestion("Point the CLI at it: --api-url http://host:port or SATLENS_API_URL")
        .with_suggestion("Or set api_url in satlens.toml")
        .with_help("Run: satlens config")
}

/// Backend answered with a non-success status
pub fn backend_status(status: u16, message: Option<&str>) -> CliError {
    let mut context = format!("The backend rejected the request with HTTP {}.", status);
    if let Some(message) = message {
        context.push_str(&format!("\n\nResponse: {}", message));
    }

    let error = CliError::new(format!("HTTP error! status: {}", status)).with_context(context);
    match status {
        404 => error
            .with_suggestion("Check the analysis id")
            .with_suggestion("List known analyses: satlens history"),
        500..=599 => error
            .with_suggestion("The backend failed; try again later")
            .with_help("Run: satlens health"),
        _ => error.with_help("Run: satlens --help"),
    }
}

/// Input file does not exist
pub fn file_not_found(path: &str) -> CliError {
    CliError::new("File not found")
        .with_context(format!("The specified image file does not exist.\n\nPath: {}", path))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
        .with_help("Run: satlens analyze --help")
}

/// Input file is not an image
pub fn not_an_image(path: &str, mime_type: &str) -> CliError {
    CliError::new("Not an image")
        .with_context(format!("Only image files can be analyzed.\n\nPath: {}\nDetected type: {}", path, mime_type))
        .with_suggestion("Pick a JPEG, PNG, TIFF, GIF, WebP or BMP file")
        .with_help("Run: satlens formats")
}

/// Analysis ended in the failed state
pub fn analysis_failed(message: &str) -> CliError {
    CliError::new(message.to_string())
        .with_context("The backend did not return an analysis result.")
        .with_suggestion("Check the backend: satlens health")
        .with_suggestion("Run with RUST_LOG=satlens=debug for the underlying error")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check satlens.toml for syntax errors")
        .with_suggestion("Or check SATLENS_* environment variables")
        .with_help("Run: satlens config")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };

    if let Some(satlens_error) = error.chain().find_map(|e| e.downcast_ref::<SatlensError>()) {
        return match satlens_error {
            SatlensError::Network { message } => backend_unreachable(message),
            SatlensError::Http { status, message } => backend_status(*status, message.as_deref()),
            SatlensError::ConfigInvalid { key, reason } => invalid_config(key, reason),
            SatlensError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                CliError::new("File not found").with_context(format!("Error: {:#}", error))
            }
            other => CliError::new(other.to_string()),
        };
    }

    let message = format!("{:#}", error);
    if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(message)
    }
}

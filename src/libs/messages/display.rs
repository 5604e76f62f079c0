//! Display text for [`Message`].
//!
//! All user-facing text lives here: console output of the CLI commands, the
//! strings rendered into the web pages and the `error` field of JSON error
//! responses.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === AUTH MESSAGES ===
            Message::LoginSucceeded => "Logged in successfully".to_string(),
            Message::LoginFailed => "Incorrect username or password".to_string(),
            Message::RegisterSucceeded => "Account created".to_string(),
            Message::UsernameTaken(username) => format!("Username '{}' is already taken, try another one", username),
            Message::LogoutSucceeded => "Logged out successfully".to_string(),
            Message::MissingCredentials => "Username and password are required".to_string(),
            Message::NotLoggedIn => "You need to log in first".to_string(),

            // === TASK MESSAGES ===
            Message::ActiveItemsLeft(count) => format!("{} active item(s) left", count),
            Message::BlankTaskName => "Task name cannot be blank".to_string(),
            Message::TaskNotFound(id) => format!("Task {} not found", id),
            Message::InvalidFilter(filter) => format!("Unknown filter '{}', expected all, active or completed", filter),
            Message::NothingToUpdate => "Nothing to update, send a name or a completed flag".to_string(),
            Message::TasksSaveFailed => "Your changes could not be saved, they will be retried with your next edit".to_string(),
            Message::TasksLoadFailed => "Your tasks could not be loaded".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigFileNotFound => "Configuration file not found".to_string(),
            Message::ConfigModuleServer => "Server settings".to_string(),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::ConfigModuleSession => "Session settings".to_string(),
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptServerHost => "Host to listen on".to_string(),
            Message::PromptServerPort => "Port to listen on".to_string(),
            Message::PromptDatabasePath => "Database file path (empty for the default location)".to_string(),
            Message::PromptSessionTimeout => "Session idle timeout in minutes".to_string(),
            Message::InvalidSessionTimeout => "Enter a positive number of minutes".to_string(),
            Message::PromptLogLevel => "Log level (trace, debug, info, warn, error)".to_string(),

            // === SERVER MESSAGES ===
            Message::ServerListening(addr) => format!("Serving todoapp on http://{}", addr),
            Message::ServerStopped => "Server stopped".to_string(),
            Message::ServerStartFailed(e) => format!("Failed to start server: {}", e),
            Message::SessionsPurged(count) => format!("Removed {} idle session(s)", count),
            Message::InternalError => "Something went wrong, please try again".to_string(),

            // === DATABASE VIEWER MESSAGES ===
            Message::UsersHeader => "Users:".to_string(),
            Message::TasksHeader => "Tasks:".to_string(),
            Message::NoUsersFound => "No users found".to_string(),
            Message::NoTasksFound => "No tasks found".to_string(),

            // === DATABASE CHECK MESSAGES ===
            Message::DatabaseOpened(path) => format!("Database opened: {}", path),
            Message::DatabaseCounts { users, tasks } => format!("{} user(s), {} task(s)", users, tasks),
            Message::DatabaseWriteCheckPassed => "Transactional write check passed".to_string(),
            Message::DatabaseCheckFailed(e) => format!("Database check failed: {}", e),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, e) => format!("Migration v{} failed: {}", version, e),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Database version: {}", version),
            Message::DatabaseNeedsUpdate => "Database needs migration".to_string(),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
        };

        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    // === AUTH MESSAGES ===
    LoginSucceeded,
    LoginFailed,
    RegisterSucceeded,
    UsernameTaken(String),
    LogoutSucceeded,
    MissingCredentials,
    NotLoggedIn,

    // === TASK MESSAGES ===
    ActiveItemsLeft(usize),
    BlankTaskName,
    TaskNotFound(u64),
    InvalidFilter(String),
    NothingToUpdate,
    TasksSaveFailed,
    TasksLoadFailed,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigFileNotFound,
    ConfigModuleServer,
    ConfigModuleDatabase,
    ConfigModuleSession,
    PromptSelectModules,
    PromptServerHost,
    PromptServerPort,
    PromptDatabasePath,
    PromptSessionTimeout,
    InvalidSessionTimeout,
    PromptLogLevel,

    // === SERVER MESSAGES ===
    ServerListening(String),
    ServerStopped,
    ServerStartFailed(String),
    SessionsPurged(usize),
    InternalError,

    // === DATABASE VIEWER MESSAGES ===
    UsersHeader,
    TasksHeader,
    NoUsersFound,
    NoTasksFound,

    // === DATABASE CHECK MESSAGES ===
    DatabaseOpened(String),
    DatabaseCounts { users: i64, tasks: i64 },
    DatabaseWriteCheckPassed,
    DatabaseCheckFailed(String),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseNeedsUpdate,
    DatabaseUpToDate,
    MigrationHistory,
}

//! SQL DDL for initializing the account storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `login`: one credential row per email, `hash` is an Argon2 PHC string
/// - `users`: one profile row per credential, `email` references `login(email)`
/// - `entries` starts at 0 and only ever grows by one
/// - `joined` stored as RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS login (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE REFERENCES login(email),
    entries INTEGER NOT NULL DEFAULT 0 CHECK (entries >= 0),
    joined TEXT NOT NULL
);
"#;

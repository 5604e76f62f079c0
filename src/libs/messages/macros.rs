//! Message macros with debug-aware output routing.
//!
//! In debug mode (`TODOAPP_DEBUG` or `RUST_LOG` set) every macro goes through
//! `tracing`, so CLI output interleaves with the server's structured logs.
//! Otherwise messages are printed to the console: errors to stderr,
//! everything else to stdout. `msg_debug!` is silent outside debug mode.
//!
//! Passing `true` as a second argument pads the message with blank lines.
//!
//! ```rust
//! use todoapp::libs::messages::Message;
//! use todoapp::{msg_error, msg_print, msg_success};
//!
//! msg_success!(Message::ConfigSaved);
//! msg_print!(Message::UsersHeader, true);
//! msg_error!(Message::LoginFailed);
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether messages should be routed to `tracing`. Cached after the first call.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("TODOAPP_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Shared body of the `msg_*` macros: `level` is the tracing macro used in
/// debug mode, `console` the print macro used otherwise.
#[doc(hidden)]
#[macro_export]
macro_rules! __msg_route {
    ($level:ident, $console:ident, $prefix:literal, $msg:expr) => {{
        let text = format!("{}{}", $prefix, $msg);
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!("{}", text);
        } else {
            $console!("{}", text);
        }
    }};
    ($level:ident, $console:ident, $prefix:literal, $msg:expr, true) => {
        $crate::__msg_route!($level, $console, $prefix, format!("\n{}\n", $msg))
    };
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr $(, $pad:tt)?) => {
        $crate::__msg_route!(info, println, "", $msg $(, $pad)?)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr $(, $pad:tt)?) => {
        $crate::__msg_route!(info, println, "✅ ", $msg $(, $pad)?)
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr $(, $pad:tt)?) => {
        $crate::__msg_route!(error, eprintln, "❌ ", $msg $(, $pad)?)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr $(, $pad:tt)?) => {
        $crate::__msg_route!(warn, println, "⚠️ ", $msg $(, $pad)?)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr $(, $pad:tt)?) => {
        $crate::__msg_route!(info, println, "ℹ️ ", $msg $(, $pad)?)
    };
}

#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Builds an `anyhow::Error` from a message.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

/// Returns early with an `anyhow::Error` built from a message.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logging macros for convenient formatted logging

/// Log a formatted message at LOG
///
/// # Examples
/// ```
/// # let logger = levelog::Logger::new();
/// # logger.set_mode(levelog::Mode::None);
/// levelog::log_log!(logger, "listening on {}", 8080).unwrap();
/// ```
#[macro_export]
macro_rules! log_log {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at PRINT
#[macro_export]
macro_rules! log_print {
    ($logger:expr, $($arg:tt)+) => {
        $logger.print_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at INFO
///
/// # Examples
/// ```
/// # let logger = levelog::Logger::new();
/// # logger.set_mode(levelog::Mode::None);
/// levelog::log_info!(logger, "user={} action={}", "bob", "login").unwrap();
/// ```
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at DEBG
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at TRACE
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at OK
#[macro_export]
macro_rules! log_success {
    ($logger:expr, $($arg:tt)+) => {
        $logger.success_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at WARN
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at ERR
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at FAIL
#[macro_export]
macro_rules! log_fail {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fail_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at FATAL and run the exit hook
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at the custom level registered under a tag
///
/// # Examples
/// ```
/// # let logger = levelog::Logger::new();
/// logger.add_std_level("AUDIT", levelog::Mode::None, false);
/// levelog::log_custom!(logger, "AUDIT", "user={}", "bob").unwrap();
/// ```
#[macro_export]
macro_rules! log_custom {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $logger.custom_log_fmt($tag, format_args!($($arg)+))
    };
}

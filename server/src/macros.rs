//! Macro functions used in the server loops.

/// Continues the enclosing loop if the frame or datagram has been dropped.
macro_rules! skip_none (
    ($option:expr) => (
        match $option {
            Some(value) => value,
            None => continue,
        }
    );
);

/// Continues the enclosing loop on a recoverable error, logging it first.
macro_rules! skip_err (
    ($result:expr, $($arg:tt)+) => (
        match $result {
            Ok(value) => value,
            Err(error) => {
                warn!("{}: {}", format_args!($($arg)+), error);
                continue;
            },
        }
    );
);

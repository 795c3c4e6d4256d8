//! Crate-internal logging macros
//!
//! Forward to `defmt` when the `defmt` feature is enabled. Without it the
//! arguments are still evaluated by reference so call sites type-check the
//! same way on the host.
//!
//! `warn` is defined as `warn_` and renamed on export, since a
//! `macro_rules! warn` clashes with the built-in `#[warn]` attribute.

macro_rules! info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! warn_ {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($(&$arg,)*);
    }};
}

pub(crate) use {debug, info, warn_ as warn};

#[cfg(test)]
mod tests {
    use super::{debug, info, warn};

    #[test]
    fn test_macros_accept_call_site_forms() {
        let count = 3u8;
        info!("no args");
        info!("one arg {}", count);
        warn!("two args {} {}", count, "x",);
        debug!("borrowed {}", &count);
        // Arguments are only borrowed, so they stay usable
        assert_eq!(count, 3);
    }
}

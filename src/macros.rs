// Some feature combinations result in some of these macros never being used.
#![allow(unused_macros)]

// Runs the given statements only when the 'logging' feature is enabled. This
// is useful for blocks that compute something only to log it.
macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}

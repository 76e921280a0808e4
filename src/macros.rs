/// Emits a `tracing` event when the `tracing` feature is enabled and compiles
/// to nothing otherwise.
///
/// ```rust,ignore
/// trace_event!(debug, map_size, "map grown");
/// ```
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            tracing::$level!($($arg)+);
        }
    };
}

pub(crate) use trace_event;

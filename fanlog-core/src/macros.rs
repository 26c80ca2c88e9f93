/// Name of the enclosing function, without its module path.
///
/// Closures report the function they are defined in.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::macros::last_segment(__type_name_of(__here))
    }};
}

/// Writes a formatted message to `logger` at `level` with the call site's
/// function name and line. Evaluates to the logger's `Result<()>`.
///
/// ```
/// use fanlog_core::{Level, Logger, emit};
///
/// let logger = Logger::new("demo", Level::Info);
/// emit!(logger, Level::Info, "listening on port {}", 8080).unwrap();
/// ```
#[macro_export]
macro_rules! emit {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.write_args(
            $level,
            $crate::function_name!(),
            line!(),
            format_args!($($arg)+),
        )
    };
}

#[doc(hidden)]
pub fn last_segment(path: &'static str) -> &'static str {
    let mut path = path.strip_suffix("::__here").unwrap_or(path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path)
}

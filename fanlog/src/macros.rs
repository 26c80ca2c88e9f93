// Per-level macros writing to the process-wide logger. Each evaluates to
// `fanlog::Result<()>`, carrying any sink failure back to the call site.

#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::emit!($crate::logger(), $crate::Level::Trace, $($arg)+) };
}

#[macro_export]
macro_rules! debug3 {
    ($($arg:tt)+) => { $crate::emit!($crate::logger(), $crate::Level::Debug3, $($arg)+) };
}

#[macro_export]
macro_rules! debug2 {
    ($($arg:tt)+) => { $crate::emit!($crate::logger(), $crate::Level::Debug2, $($arg)+) };
}

#[macro_export]
macro_rules! debug1 {
    ($($arg:tt)+) => { $crate::emit!($crate::logger(), $crate::Level::Debug1, $($arg)+) };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::emit!($crate::logger(), $crate::Level::Info, $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::emit!($crate::logger(), $crate::Level::Warn, $($arg)+) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::emit!($crate::logger(), $crate::Level::Error, $($arg)+) };
}

pub mod constants;
pub mod math;
pub mod stable_swap_math;

/// Returns early with the given error if the condition does not hold.
#[macro_export]
macro_rules! ensure {
    ( $condition:expr, $error:expr $(,)? ) => {{
        if !$condition {
            return ::core::result::Result::Err(::core::convert::Into::into($error));
        }
    }};
}

use itertools::Itertools;


// Lazily compiled regex, adjusted from https://docs.rs/once_cell/latest/once_cell/#lazily-compiled-regex
// to use `std::sync::OnceLock` and `regex_lite`.
#[macro_export]
macro_rules! lazy_regex {
    ($re:expr $(,)?) => {{
        static RE: std::sync::OnceLock<regex_lite::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex_lite::Regex::new($re).unwrap())
    }};
}

// If a string consists of a single character, returns the character. Otherwise returns none.
pub fn as_single_char(s: &str) -> Option<char> {
    s.chars().collect_tuple().map(|(single_char,)| single_char)
}

// Linear interpolation between `from` and `to` for `t` in [0, 1].
pub fn lerp(from: f64, to: f64, t: f64) -> f64 { from + t * (to - from) }

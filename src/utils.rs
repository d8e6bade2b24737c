use std::env::var;

/// Get the value of an ENV var, or a fallback
///
/// The fallback kicks in when the var is missing or empty
pub fn env_var_or_else(var_name: &'static str, or_else: impl FnOnce() -> String) -> String {
    match var(var_name) {
        Ok(value) if !value.is_empty() => value,
        _ => or_else(),
    }
}

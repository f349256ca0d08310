//! Shell export wrapping for the rendered document.

/// Wrap `payload` in a single-quoted `export` assignment.
///
/// Single quotes inside the payload use the standard `'\''` escape so the
/// result survives `eval` in POSIX shells.
pub fn wrap_export(var: &str, payload: &str) -> String {
    format!("export {}='{}'\n", var, payload.replace('\'', r"'\''"))
}

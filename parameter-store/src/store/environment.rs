use std::env;

use tracing::{debug, warn};

use crate::domain::FlatMapping;

fn is_valid_variable(key: &str, value: &str) -> bool {
    !key.is_empty() && !key.contains(['=', '\0']) && !value.contains('\0')
}

/// Exports every entry of `mapping` as a process environment variable unless a
/// variable of that name is already present. Existing values are never
/// replaced, so the first writer wins, including earlier calls to this
/// function.
///
/// Entries the platform cannot represent (empty names, names containing `=`,
/// NUL bytes) are skipped with a warning.
///
/// This mutates process-wide state. Call it before spawning threads that read
/// the environment.
pub fn set_environment(mapping: &FlatMapping) {
    for (key, value) in mapping {
        if !is_valid_variable(key, value) {
            warn!(key = key.as_str(), "Skipping parameter that is not a valid environment variable");
            continue;
        }

        if env::var_os(key).is_some() {
            debug!(key = key.as_str(), "Environment variable already set, keeping it");
            continue;
        }

        // SAFETY: environment writes must not race other threads, see above.
        unsafe {
            env::set_var(key, value);
        }
    }
}

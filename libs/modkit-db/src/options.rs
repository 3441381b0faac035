//! DSN helpers: `${VAR}` expansion and credential redaction for logs.

use regex::Regex;

use crate::{DbError, Result};

/// Replaces every `${NAME}` in `input` with the value of environment variable `NAME`.
pub fn expand_env_vars(input: &str) -> Result<String> {
    if !input.contains("${") {
        return Ok(input.to_string());
    }

    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| DbError::InvalidConfig(e.to_string()))?;
    let mut result = input.to_string();

    for caps in re.captures_iter(input) {
        let full_match = &caps[0];
        let var_name = &caps[1];
        let value =
            std::env::var(var_name).map_err(|_| DbError::MissingEnvVar(var_name.to_string()))?;
        result = result.replace(full_match, &value);
    }

    Ok(result)
}

/// Masks the password component of a DSN so it can be logged.
pub fn redact_credentials_in_dsn(dsn: Option<&str>) -> String {
    match dsn {
        Some(dsn) if dsn.contains('@') => {
            if let Ok(mut parsed) = url::Url::parse(dsn) {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            } else {
                "***".to_string()
            }
        }
        Some(dsn) => dsn.to_string(),
        None => "none".to_string(),
    }
}

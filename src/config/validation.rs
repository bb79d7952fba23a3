use super::schema::Config;

const MAX_DEGREE: usize = 30;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(degree) = config.degree {
        if degree == 0 || degree > MAX_DEGREE {
            errors.push(format!("degree: must be between 1 and {}, got {}", MAX_DEGREE, degree));
        }
    }

    if let Some(ref table) = config.table {
        if table.as_os_str().is_empty() {
            errors.push("table: path must not be empty".to_string());
        }
    }

    if let Some(ref document) = config.document {
        if let Some(lines) = document.page_lines {
            if lines < 3 {
                errors.push(format!("document.page_lines: must be at least 3, got {}", lines));
            }
        }
        if let Some(max) = document.max_points {
            if max < 1 {
                errors.push(format!("document.max_points: must be positive, got {}", max));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

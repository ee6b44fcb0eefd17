use super::config::ScoringConfig;
use super::detail::Category;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Every category needs a weight
    for category in Category::ALL {
        if config.weight(category).is_none() {
            errors.push(format!(
                "scoring.weights.{}: missing weight for raw score category",
                category
            ));
        }
    }

    for (key, weight) in &config.weights {
        if Category::from_key(key).is_none() {
            errors.push(format!("scoring.weights.{}: unknown category", key));
            continue;
        }
        for (name, value) in [("a", weight.a), ("b", weight.b)] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!(
                    "scoring.weights.{}.{}: must be a non-negative number, got {}",
                    key, name, value
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

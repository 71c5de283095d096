use crate::domain::model::MAX_POOLS_PER_ROUND;
use crate::utils::error::{DrawError, Result};
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(DrawError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "List cannot be empty".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unique<T: Eq + Hash + Display>(field_name: &str, values: &[T]) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(DrawError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Duplicate entry".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DrawError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DrawError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DrawError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// 分組格式必須剛好覆蓋全部隊伍
pub fn validate_format(field_name: &str, format: &[usize], team_count: usize) -> Result<()> {
    validate_non_empty(field_name, format)?;
    validate_range(field_name, format.len(), 1, MAX_POOLS_PER_ROUND)?;
    for &size in format {
        validate_range(field_name, size, 3, 5)?;
    }

    let total: usize = format.iter().sum();
    if total != team_count {
        return Err(DrawError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!(
                "Group sizes add up to {} but the roster has {} teams",
                total, team_count
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("teams", &["AAA", "BBB"]).is_ok());
        assert!(validate_unique("teams", &["AAA", "AAA"]).is_err());
    }

    #[test]
    fn test_validate_format() {
        assert!(validate_format("format", &[3, 3], 6).is_ok());
        assert!(validate_format("format", &[5], 5).is_ok());
        assert!(validate_format("format", &[3, 3], 7).is_err());
        assert!(validate_format("format", &[2, 4], 6).is_err());
        assert!(validate_format("format", &[], 0).is_err());
    }

    #[test]
    fn test_validate_format_caps_pool_count() {
        let at_limit = vec![3; MAX_POOLS_PER_ROUND];
        assert!(validate_format("format", &at_limit, 3 * MAX_POOLS_PER_ROUND).is_ok());

        let too_many = vec![3; MAX_POOLS_PER_ROUND + 1];
        assert!(matches!(
            validate_format("format", &too_many, 3 * (MAX_POOLS_PER_ROUND + 1)),
            Err(DrawError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("accept_rate", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("accept_rate", 1.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3usize);
        let missing: Option<usize> = None;
        assert_eq!(*validate_required_field("seed", &present).unwrap(), 3);
        assert!(validate_required_field("seed", &missing).is_err());
    }
}

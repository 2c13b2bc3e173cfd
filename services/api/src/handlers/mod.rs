pub mod auth;
pub mod catalog;
pub mod school;
pub mod student;
pub mod student_portal;
pub mod ticket;

use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// Parse an optional enum query parameter, rejecting unknown spellings.
pub(crate) fn parse_param<T>(
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    name: &str,
) -> Result<Option<T>, ApiError> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse(v)
            .map(Some)
            .ok_or_else(|| ApiError::validation(format!("invalid {name}: {v}"))),
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use techteam_domain::ticket::TicketStatus;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "double_option")]
        assigned_to: Option<Option<u32>>,
    }

    #[test]
    fn should_treat_missing_param_as_none() {
        assert_eq!(parse_param(None, TicketStatus::parse, "status").unwrap(), None);
        assert_eq!(parse_param(Some(""), TicketStatus::parse, "status").unwrap(), None);
    }

    #[test]
    fn should_parse_known_param() {
        assert_eq!(
            parse_param(Some("in_progress"), TicketStatus::parse, "status").unwrap(),
            Some(TicketStatus::InProgress)
        );
    }

    #[test]
    fn should_reject_unknown_param() {
        let result = parse_param(Some("archived"), TicketStatus::parse, "status");
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn should_distinguish_null_from_absent() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        let null: Body = serde_json::from_str(r#"{"assigned_to":null}"#).unwrap();
        let set: Body = serde_json::from_str(r#"{"assigned_to":7}"#).unwrap();
        assert_eq!(absent.assigned_to, None);
        assert_eq!(null.assigned_to, Some(None));
        assert_eq!(set.assigned_to, Some(Some(7)));
    }
}

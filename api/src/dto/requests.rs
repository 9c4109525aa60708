use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use sp_core::domain::GetNumberParams;

use crate::handlers::ApiError;

/// Longest rental the provider accepts, in hours
pub const MAX_RENT_TIME_HOURS: u32 = 168;

/// Query carrying only the dispatch parameter
#[derive(Debug, Clone, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetNumberQuery {
    #[validate(
        required(message = "Country parameter is required"),
        length(equal = 2, message = "Country must be 2 characters")
    )]
    pub country: Option<String>,

    #[validate(
        required(message = "Service parameter is required"),
        length(min = 2, max = 10, message = "Service must be between 2 and 10 characters")
    )]
    pub service: Option<String>,

    #[validate(
        required(message = "Token parameter is required"),
        length(equal = 32, message = "Invalid token format")
    )]
    pub token: Option<String>,

    #[validate(custom = "validate_rent_time")]
    pub rent_time: Option<String>,
}

/// Query shared by getSms, cancelNumber and getStatus
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivationQuery {
    #[validate(
        required(message = "Token parameter is required"),
        length(equal = 32, message = "Invalid token format")
    )]
    pub token: Option<String>,

    #[validate(
        required(message = "Activation parameter is required"),
        length(min = 1, max = 20, message = "Invalid activation format")
    )]
    pub activation: Option<String>,
}

impl GetNumberQuery {
    const FIELD_ORDER: [&'static str; 4] = ["country", "service", "token", "rent_time"];

    /// Validate and convert into allocation parameters
    pub fn into_params(self) -> Result<GetNumberParams, ApiError> {
        self.validate()
            .map_err(|errors| ApiError::Validation(first_message(&errors, &Self::FIELD_ORDER)))?;

        let rent_time = match non_blank(self.rent_time.as_deref()) {
            Some(value) => Some(parse_rent_time(value).map_err(ApiError::Validation)?),
            None => None,
        };

        Ok(GetNumberParams {
            country: self.country.unwrap_or_default(),
            service: self.service.unwrap_or_default(),
            token: self.token.unwrap_or_default(),
            rent_time,
        })
    }
}

impl ActivationQuery {
    const FIELD_ORDER: [&'static str; 2] = ["token", "activation"];

    /// Validate and return `(token, activation)`
    pub fn into_parts(self) -> Result<(String, String), ApiError> {
        self.validate()
            .map_err(|errors| ApiError::Validation(first_message(&errors, &Self::FIELD_ORDER)))?;

        Ok((
            self.token.unwrap_or_default(),
            self.activation.unwrap_or_default(),
        ))
    }
}

fn validate_rent_time(value: &String) -> Result<(), ValidationError> {
    match non_blank(Some(value)) {
        Some(value) => parse_rent_time(value).map(|_| ()).map_err(|message| {
            let mut error = ValidationError::new("rent_time");
            error.message = Some(Cow::from(message));
            error
        }),
        None => Ok(()),
    }
}

fn parse_rent_time(value: &str) -> Result<u32, String> {
    let hours: i64 = value
        .trim()
        .parse()
        .map_err(|_| "Rent time must be a number".to_string())?;

    if hours < 1 {
        return Err("Rent time must be at least 1 hour".to_string());
    }
    if hours > i64::from(MAX_RENT_TIME_HOURS) {
        return Err("Rent time cannot exceed 168 hours (7 days)".to_string());
    }
    Ok(hours as u32)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Message of the first failing field, in declaration order
fn first_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let field_errors = errors.field_errors();

    order
        .iter()
        .filter_map(|field| field_errors.get(field))
        .filter_map(|errors| errors.first())
        .map(|error| {
            error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| error.code.to_string())
        })
        .next()
        .unwrap_or_else(|| "Invalid request parameters".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    fn get_number(country: Option<&str>, rent_time: Option<&str>) -> GetNumberQuery {
        GetNumberQuery {
            country: country.map(String::from),
            service: Some("tg".to_string()),
            token: Some(TOKEN.to_string()),
            rent_time: rent_time.map(String::from),
        }
    }

    fn message(result: Result<impl std::fmt::Debug, ApiError>) -> String {
        match result {
            Err(ApiError::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_get_number_query() {
        let params = get_number(Some("ru"), Some("24")).into_params().unwrap();

        assert_eq!(params.country, "ru");
        assert_eq!(params.service, "tg");
        assert_eq!(params.token, TOKEN);
        assert_eq!(params.rent_time, Some(24));
    }

    #[test]
    fn test_blank_rent_time_is_absent() {
        let params = get_number(Some("ru"), Some("")).into_params().unwrap();
        assert_eq!(params.rent_time, None);
    }

    #[test]
    fn test_country_messages() {
        assert_eq!(
            message(get_number(None, None).into_params()),
            "Country parameter is required"
        );
        assert_eq!(
            message(get_number(Some("rus"), None).into_params()),
            "Country must be 2 characters"
        );
    }

    #[test]
    fn test_rent_time_messages() {
        assert_eq!(
            message(get_number(Some("ru"), Some("abc")).into_params()),
            "Rent time must be a number"
        );
        assert_eq!(
            message(get_number(Some("ru"), Some("0")).into_params()),
            "Rent time must be at least 1 hour"
        );
        assert_eq!(
            message(get_number(Some("ru"), Some("169")).into_params()),
            "Rent time cannot exceed 168 hours (7 days)"
        );
    }

    #[test]
    fn test_first_failing_field_wins() {
        let query = GetNumberQuery {
            country: Some("r".to_string()),
            service: None,
            token: Some("short".to_string()),
            rent_time: Some("x".to_string()),
        };

        assert_eq!(message(query.into_params()), "Country must be 2 characters");
    }

    #[test]
    fn test_activation_query() {
        let valid = ActivationQuery {
            token: Some(TOKEN.to_string()),
            activation: Some("123456".to_string()),
        };
        assert_eq!(
            valid.into_parts().unwrap(),
            (TOKEN.to_string(), "123456".to_string())
        );

        let bad_token = ActivationQuery {
            token: Some("abc".to_string()),
            activation: Some("123456".to_string()),
        };
        assert_eq!(message(bad_token.into_parts()), "Invalid token format");

        let long_activation = ActivationQuery {
            token: Some(TOKEN.to_string()),
            activation: Some("1".repeat(21)),
        };
        assert_eq!(
            message(long_activation.into_parts()),
            "Invalid activation format"
        );
    }
}

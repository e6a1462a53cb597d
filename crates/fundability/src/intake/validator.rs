use serde_json::{Map, Value};

use crate::scoring::{PrimaryGoal, ValidatedInput};

const CREDIT_SCORE_RANGE: (f64, f64) = (300.0, 850.0);
const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

/// Every constraint violated by a submission, one sentence per violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn details(&self) -> &[String] {
        &self.0
    }

    pub fn into_details(self) -> Vec<String> {
        self.0
    }
}

/// Validate an untyped record, collecting all violations before returning.
///
/// Defaults for the optional counters are applied only when the record is
/// otherwise valid.
pub fn validate(raw: &Value) -> Result<ValidatedInput, ValidationErrors> {
    let Some(fields) = raw.as_object() else {
        return Err(ValidationErrors::single(
            "request body must be a JSON object",
        ));
    };

    let mut reader = FieldReader::new(fields);

    let first_name = reader.required_text("first_name");
    let last_name = reader.required_text("last_name");
    let email = reader.email("email");
    let credit_score = reader.optional_integer_in("credit_score", CREDIT_SCORE_RANGE);
    let revolving_utilization_pct =
        reader.required_number_in("revolving_utilization_pct", PERCENT_RANGE);
    let dti_pct = reader.optional_number_in("dti_pct", PERCENT_RANGE);
    let inquiries_6m = reader.optional_count("inquiries_6m");
    let oldest_account_years = reader.optional_non_negative("oldest_account_years");
    let open_tradelines = reader.required_count("open_tradelines");
    let recent_derogs_24m = reader.optional_count("recent_derogs_24m");
    let bk_or_major_event = reader.optional_flag("bk_or_major_event");
    let requested_amount = reader.required_positive("requested_amount");
    let primary_goal = reader.goal("primary_goal");
    let est_home_value = reader.optional_non_negative("est_home_value");
    let mortgage_balance = reader.optional_non_negative("mortgage_balance");
    let source = reader.optional_text("source");
    let external_contact_id = reader.optional_identifier("external_contact_id");

    if !reader.errors.is_empty() {
        return Err(ValidationErrors(reader.errors));
    }

    match (
        first_name,
        last_name,
        email,
        revolving_utilization_pct,
        open_tradelines,
        requested_amount,
        primary_goal,
    ) {
        (
            Some(first_name),
            Some(last_name),
            Some(email),
            Some(revolving_utilization_pct),
            Some(open_tradelines),
            Some(requested_amount),
            Some(primary_goal),
        ) => Ok(ValidatedInput {
            first_name,
            last_name,
            email,
            credit_score: credit_score.map(|score| score as u16),
            revolving_utilization_pct,
            dti_pct,
            inquiries_6m: inquiries_6m.unwrap_or(0),
            oldest_account_years: oldest_account_years.unwrap_or(0.0),
            open_tradelines,
            recent_derogs_24m: recent_derogs_24m.unwrap_or(0),
            bk_or_major_event: bk_or_major_event.unwrap_or(false),
            requested_amount,
            primary_goal,
            est_home_value,
            mortgage_balance,
            source,
            external_contact_id,
        }),
        _ => Err(ValidationErrors::single("required fields are missing")),
    }
}

pub(crate) fn goal_options() -> String {
    PrimaryGoal::ALL
        .iter()
        .map(PrimaryGoal::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    errors: Vec<String>,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    /// `null` and blank strings count as absent.
    fn present(&self, name: &str) -> Option<&'a Value> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) if text.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }

    fn fail(&mut self, message: String) {
        self.errors.push(message);
    }

    fn required_text(&mut self, name: &str) -> Option<String> {
        match self.present(name) {
            Some(Value::String(text)) => Some(text.trim().to_string()),
            _ => {
                self.fail(format!("{name} is required and must be a non-empty string"));
                None
            }
        }
    }

    fn optional_text(&mut self, name: &str) -> Option<String> {
        match self.present(name) {
            None => None,
            Some(Value::String(text)) => Some(text.trim().to_string()),
            Some(_) => {
                self.fail(format!("{name} must be a string"));
                None
            }
        }
    }

    fn optional_identifier(&mut self, name: &str) -> Option<String> {
        match self.present(name) {
            None => None,
            Some(Value::String(text)) => Some(text.trim().to_string()),
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(_) => {
                self.fail(format!("{name} must be a string or number"));
                None
            }
        }
    }

    fn email(&mut self, name: &str) -> Option<String> {
        match self.present(name) {
            Some(Value::String(text)) if looks_like_email(text.trim()) => {
                Some(text.trim().to_string())
            }
            Some(_) => {
                self.fail(format!("{name} must be a valid email address"));
                None
            }
            None => {
                self.fail(format!("{name} is required and must be a valid email address"));
                None
            }
        }
    }

    fn number(&self, name: &str) -> Option<Result<f64, ()>> {
        self.present(name).map(|value| numeric(value).ok_or(()))
    }

    fn required_number_in(&mut self, name: &str, (min, max): (f64, f64)) -> Option<f64> {
        match self.number(name) {
            Some(Ok(value)) if (min..=max).contains(&value) => Some(value),
            Some(_) => {
                self.fail(format!("{name} must be a number between {min} and {max}"));
                None
            }
            None => {
                self.fail(format!(
                    "{name} is required and must be a number between {min} and {max}"
                ));
                None
            }
        }
    }

    fn optional_number_in(&mut self, name: &str, (min, max): (f64, f64)) -> Option<f64> {
        match self.number(name) {
            None => None,
            Some(Ok(value)) if (min..=max).contains(&value) => Some(value),
            Some(_) => {
                self.fail(format!("{name} must be a number between {min} and {max}"));
                None
            }
        }
    }

    fn optional_integer_in(&mut self, name: &str, (min, max): (f64, f64)) -> Option<u32> {
        match self.number(name) {
            None => None,
            Some(Ok(value)) if value.fract() == 0.0 && (min..=max).contains(&value) => {
                Some(value as u32)
            }
            Some(_) => {
                self.fail(format!("{name} must be an integer between {min} and {max}"));
                None
            }
        }
    }

    fn optional_non_negative(&mut self, name: &str) -> Option<f64> {
        match self.number(name) {
            None => None,
            Some(Ok(value)) if value >= 0.0 => Some(value),
            Some(_) => {
                self.fail(format!("{name} must be a non-negative number"));
                None
            }
        }
    }

    fn required_positive(&mut self, name: &str) -> Option<f64> {
        match self.number(name) {
            Some(Ok(value)) if value > 0.0 => Some(value),
            Some(_) => {
                self.fail(format!("{name} must be a positive number"));
                None
            }
            None => {
                self.fail(format!("{name} is required and must be a positive number"));
                None
            }
        }
    }

    fn count(&self, name: &str) -> Option<Result<u32, ()>> {
        self.number(name).map(|parsed| {
            parsed.and_then(|value| {
                if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
                    Ok(value as u32)
                } else {
                    Err(())
                }
            })
        })
    }

    fn optional_count(&mut self, name: &str) -> Option<u32> {
        match self.count(name) {
            None => None,
            Some(Ok(value)) => Some(value),
            Some(Err(())) => {
                self.fail(format!("{name} must be a non-negative integer"));
                None
            }
        }
    }

    fn required_count(&mut self, name: &str) -> Option<u32> {
        match self.count(name) {
            Some(Ok(value)) => Some(value),
            Some(Err(())) => {
                self.fail(format!("{name} must be a non-negative integer"));
                None
            }
            None => {
                self.fail(format!("{name} is required and must be a non-negative integer"));
                None
            }
        }
    }

    fn optional_flag(&mut self, name: &str) -> Option<bool> {
        match self.present(name) {
            None => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(Value::Number(number)) if number.as_i64() == Some(1) => Some(true),
            Some(Value::Number(number)) if number.as_i64() == Some(0) => Some(false),
            Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => {
                    self.fail(format!("{name} must be a boolean"));
                    None
                }
            },
            Some(_) => {
                self.fail(format!("{name} must be a boolean"));
                None
            }
        }
    }

    fn goal(&mut self, name: &str) -> Option<PrimaryGoal> {
        let parsed = match self.present(name) {
            Some(Value::String(text)) => PrimaryGoal::parse(text),
            _ => None,
        };

        if parsed.is_none() {
            let prefix = if self.present(name).is_none() {
                "is required and must"
            } else {
                "must"
            };
            self.fail(format!("{name} {prefix} be one of: {}", goal_options()));
        }

        parsed
    }
}

/// Accepts JSON numbers and numeric strings; rejects non-finite values.
fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

fn looks_like_email(candidate: &str) -> bool {
    let mut parts = candidate.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !candidate.contains(char::is_whitespace)
                && domain
                    .split('.')
                    .filter(|label| !label.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

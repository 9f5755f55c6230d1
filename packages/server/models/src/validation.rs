//! Field-level validation of request bodies.
//!
//! Every rule runs and all failures are reported together, so a client
//! sees every problem with a body in a single 422 response. Text fields
//! are trimmed before they are checked and stored.

use serde_json::Value;
use urban_alerts_alert_models::{AlertStatus, AlertType};
use urban_alerts_database_models::{AlertUpdate, NewAlert};

use crate::{CreateAlertBody, FieldError, StatusBody, UpdateAlertBody};

/// Longest accepted title, in characters.
pub const MAX_TITLE_CHARS: usize = 150;

const MSG_TITLE_REQUIRED: &str = "Título é obrigatório.";
const MSG_TITLE_TOO_LONG: &str = "Máximo 150 caracteres.";
const MSG_DESCRIPTION_REQUIRED: &str = "Descrição é obrigatória.";
const MSG_TYPE_INVALID: &str = "Tipo inválido.";
const MSG_LOCATION_REQUIRED: &str = "Local é obrigatório.";
const MSG_LATITUDE_INVALID: &str = "Latitude inválida.";
const MSG_LONGITUDE_INVALID: &str = "Longitude inválida.";
const MSG_STATUS_INVALID: &str = "Status inválido.";
const MSG_TRANSITION_INVALID: &str = "Status inválido. Use: resolvido.";

fn required_text(
    value: Option<&Value>,
    path: &str,
    msg: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value.and_then(Value::as_str).map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            errors.push(FieldError::body(path, value, msg));
            None
        }
    }
}

fn title(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    let text = required_text(value, "title", MSG_TITLE_REQUIRED, errors)?;
    if text.chars().count() > MAX_TITLE_CHARS {
        errors.push(FieldError::body("title", value, MSG_TITLE_TOO_LONG));
        return None;
    }
    Some(text)
}

fn alert_type(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<AlertType> {
    let parsed = value
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<AlertType>().ok());
    if parsed.is_none() {
        errors.push(FieldError::body("type", value, MSG_TYPE_INVALID));
    }
    parsed
}

fn status(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<AlertStatus> {
    let parsed = value
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<AlertStatus>().ok());
    if parsed.is_none() {
        errors.push(FieldError::body("status", value, MSG_STATUS_INVALID));
    }
    parsed
}

/// Parses an optional coordinate. Absent or `null` is `Ok(None)`; numbers
/// and numeric strings are accepted when finite and within `[min, max]`.
fn coordinate(value: Option<&Value>, min: f64, max: f64) -> Result<Option<f64>, ()> {
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match number {
        Some(n) if n.is_finite() && (min..=max).contains(&n) => Ok(Some(n)),
        _ => Err(()),
    }
}

fn latitude(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<f64> {
    coordinate(value, -90.0, 90.0).unwrap_or_else(|()| {
        errors.push(FieldError::body("latitude", value, MSG_LATITUDE_INVALID));
        None
    })
}

fn longitude(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<f64> {
    coordinate(value, -180.0, 180.0).unwrap_or_else(|()| {
        errors.push(FieldError::body("longitude", value, MSG_LONGITUDE_INVALID));
        None
    })
}

impl CreateAlertBody {
    /// Validates the body into a [`NewAlert`].
    ///
    /// # Errors
    ///
    /// Returns every [`FieldError`] found if any field is invalid.
    pub fn validate(&self) -> Result<NewAlert, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = title(self.title.as_ref(), &mut errors);
        let description = required_text(
            self.description.as_ref(),
            "description",
            MSG_DESCRIPTION_REQUIRED,
            &mut errors,
        );
        let alert_type = alert_type(self.alert_type.as_ref(), &mut errors);
        let location = required_text(
            self.location.as_ref(),
            "location",
            MSG_LOCATION_REQUIRED,
            &mut errors,
        );
        let latitude = latitude(self.latitude.as_ref(), &mut errors);
        let longitude = longitude(self.longitude.as_ref(), &mut errors);

        match (title, description, alert_type, location) {
            (Some(title), Some(description), Some(alert_type), Some(location))
                if errors.is_empty() =>
            {
                Ok(NewAlert {
                    title,
                    description,
                    alert_type,
                    location,
                    latitude,
                    longitude,
                })
            }
            _ => Err(errors),
        }
    }
}

impl UpdateAlertBody {
    /// Validates the body into an [`AlertUpdate`]. Any status is accepted.
    ///
    /// # Errors
    ///
    /// Returns every [`FieldError`] found if any field is invalid.
    pub fn validate(&self) -> Result<AlertUpdate, Vec<FieldError>> {
        let fields = self.fields.validate();
        let mut errors = fields.as_ref().err().cloned().unwrap_or_default();
        let status = status(self.status.as_ref(), &mut errors);

        match (fields, status) {
            (Ok(fields), Some(status)) if errors.is_empty() => Ok(AlertUpdate {
                title: fields.title,
                description: fields.description,
                alert_type: fields.alert_type,
                location: fields.location,
                latitude: fields.latitude,
                longitude: fields.longitude,
                status,
            }),
            _ => Err(errors),
        }
    }
}

impl StatusBody {
    /// Validates the requested lifecycle transition.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] unless the requested status is `resolvido`.
    pub fn validate(&self) -> Result<AlertStatus, Vec<FieldError>> {
        self.status
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| AlertStatus::transition_target(s).ok())
            .ok_or_else(|| {
                vec![FieldError::body(
                    "status",
                    self.status.as_ref(),
                    MSG_TRANSITION_INVALID,
                )]
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn create_body(value: Value) -> CreateAlertBody {
        serde_json::from_value(value).unwrap()
    }

    fn valid() -> Value {
        json!({
            "title": "  Rua alagada  ",
            "description": "Água na altura do joelho",
            "type": "enchente",
            "location": "Rua das Flores, 12",
            "latitude": -22.9,
            "longitude": "-43.2",
        })
    }

    fn paths(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn valid_body_is_trimmed_and_parsed() {
        let alert = create_body(valid()).validate().unwrap();
        assert_eq!(alert.title, "Rua alagada");
        assert_eq!(alert.alert_type, AlertType::Flood);
        assert_eq!(alert.latitude, Some(-22.9));
        assert_eq!(alert.longitude, Some(-43.2));
    }

    #[test]
    fn coordinates_are_optional() {
        let mut body = valid();
        body["latitude"] = Value::Null;
        body.as_object_mut().unwrap().remove("longitude");

        let alert = create_body(body).validate().unwrap();
        assert_eq!(alert.latitude, None);
        assert_eq!(alert.longitude, None);
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut body = valid();
        body["title"] = json!("   ");

        let errors = create_body(body).validate().unwrap_err();
        assert_eq!(paths(&errors), vec!["title"]);
        assert_eq!(errors[0].msg, MSG_TITLE_REQUIRED);
        assert_eq!(errors[0].location, "body");
        assert_eq!(errors[0].kind, "field");
    }

    #[test]
    fn title_length_is_counted_in_characters() {
        let mut body = valid();
        body["title"] = json!("é".repeat(MAX_TITLE_CHARS));
        assert!(create_body(body.clone()).validate().is_ok());

        body["title"] = json!("é".repeat(MAX_TITLE_CHARS + 1));
        let errors = create_body(body).validate().unwrap_err();
        assert_eq!(errors[0].msg, MSG_TITLE_TOO_LONG);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut body = valid();
        body["type"] = json!("tornado");

        let errors = create_body(body).validate().unwrap_err();
        assert_eq!(paths(&errors), vec!["type"]);
        assert_eq!(errors[0].value, json!("tornado"));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut body = valid();
        body["latitude"] = json!(90.5);
        body["longitude"] = json!("abc");

        let errors = create_body(body).validate().unwrap_err();
        assert_eq!(paths(&errors), vec!["latitude", "longitude"]);
    }

    #[test]
    fn boundary_coordinates_are_accepted() {
        let mut body = valid();
        body["latitude"] = json!(-90);
        body["longitude"] = json!(180);
        let alert = create_body(body).validate().unwrap();
        assert_eq!(alert.latitude, Some(-90.0));
        assert_eq!(alert.longitude, Some(180.0));
    }

    #[test]
    fn all_errors_are_reported_together() {
        let errors = create_body(json!({})).validate().unwrap_err();
        assert_eq!(
            paths(&errors),
            vec!["title", "description", "type", "location"]
        );
    }

    #[test]
    fn non_string_text_is_rejected() {
        let mut body = valid();
        body["description"] = json!(12);
        let errors = create_body(body).validate().unwrap_err();
        assert_eq!(paths(&errors), vec!["description"]);
    }

    #[test]
    fn update_requires_a_known_status() {
        let mut value = valid();
        value["status"] = json!("pendente");
        let body: UpdateAlertBody = serde_json::from_value(value.clone()).unwrap();
        let errors = body.validate().unwrap_err();
        assert_eq!(paths(&errors), vec!["status"]);

        value["status"] = json!("ativo");
        let body: UpdateAlertBody = serde_json::from_value(value).unwrap();
        assert_eq!(body.validate().unwrap().status, AlertStatus::Active);
    }

    #[test]
    fn update_reports_field_and_status_errors() {
        let body: UpdateAlertBody =
            serde_json::from_value(json!({ "title": "", "status": 3 })).unwrap();
        let errors = body.validate().unwrap_err();
        assert_eq!(
            paths(&errors),
            vec!["title", "description", "type", "location", "status"]
        );
    }

    #[test]
    fn status_body_only_accepts_resolved() {
        let ok = StatusBody {
            status: Some(json!("resolvido")),
        };
        assert_eq!(ok.validate(), Ok(AlertStatus::Resolved));

        for rejected in [json!("ativo"), json!("fechado"), json!(1)] {
            let body = StatusBody {
                status: Some(rejected),
            };
            let errors = body.validate().unwrap_err();
            assert_eq!(errors[0].msg, MSG_TRANSITION_INVALID);
        }

        assert!(StatusBody { status: None }.validate().is_err());
    }
}

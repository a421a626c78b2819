//! Listing the environment variables a specification reads

use serde::Serialize;

use crate::error::Error;
use crate::spec::{Shape, Specification};

/// One environment variable a field is bound from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarInfo {
    /// Primary key, prefix included
    pub key: String,
    /// Unprefixed key tried when the primary key is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_key: Option<String>,
    pub field: &'static str,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    pub required: bool,
}

/// List the variables `spec` is bound from, in field order.
///
/// The environment is not read and `spec` is not modified.
///
/// # Errors
///
/// [`Error::InvalidSpecification`] if `spec` is not a struct.
pub fn usage<S>(prefix: &str, spec: &mut S) -> Result<Vec<VarInfo>, Error>
where
    S: Specification + ?Sized,
{
    match spec.shape() {
        Shape::Record(fields) => Ok(fields
            .iter()
            .map(|field| {
                let desc = &field.descriptor;
                VarInfo {
                    key: desc.key(prefix),
                    fallback_key: desc.fallback_key(),
                    field: desc.name,
                    type_name: desc.type_name,
                    default: desc.default_value(),
                    required: desc.required,
                }
            })
            .collect()),
        Shape::Other(type_name) => Err(Error::InvalidSpecification { type_name }),
    }
}

/// [`usage`] rendered as a pretty-printed JSON array.
///
/// # Errors
///
/// [`Error::InvalidSpecification`] if `spec` is not a struct.
pub fn usage_json<S>(prefix: &str, spec: &mut S) -> Result<String, Error>
where
    S: Specification + ?Sized,
{
    let vars = usage(prefix, spec)?;
    Ok(serde_json::to_string_pretty(&vars)?)
}

/// [`usage`] rendered as an aligned text table.
///
/// # Errors
///
/// [`Error::InvalidSpecification`] if `spec` is not a struct.
pub fn usage_table<S>(prefix: &str, spec: &mut S) -> Result<String, Error>
where
    S: Specification + ?Sized,
{
    let vars = usage(prefix, spec)?;
    let header = ["KEY", "TYPE", "DEFAULT", "REQUIRED"];
    let rows: Vec<[String; 4]> = vars
        .iter()
        .map(|var| {
            [
                var.key.clone(),
                var.type_name.to_string(),
                var.default.unwrap_or_default().to_string(),
                if var.required { "true" } else { "" }.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 4]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };
    push_row(header);
    for row in &rows {
        push_row([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Field, FieldDescriptor, Slot};

    struct Spec {
        port: u16,
        token: String,
    }

    impl Specification for Spec {
        fn shape(&mut self) -> Shape<'_> {
            Shape::Record(vec![
                Field::new(
                    FieldDescriptor {
                        name: "port",
                        type_name: "u16",
                        alt: None,
                        default: Some("8080"),
                        required: false,
                    },
                    Slot::from(&mut self.port),
                ),
                Field::new(
                    FieldDescriptor {
                        name: "token",
                        type_name: "alloc::string::String",
                        alt: Some("shared_token"),
                        default: None,
                        required: true,
                    },
                    Slot::from(&mut self.token),
                ),
            ])
        }
    }

    fn spec() -> Spec {
        Spec {
            port: 1,
            token: String::new(),
        }
    }

    #[test]
    fn test_usage_lists_keys_in_field_order() {
        let vars = usage("app", &mut spec()).unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].key, "APP_PORT");
        assert_eq!(vars[0].default, Some("8080"));
        assert_eq!(vars[1].key, "APP_SHARED_TOKEN");
        assert_eq!(vars[1].fallback_key.as_deref(), Some("SHARED_TOKEN"));
        assert!(vars[1].required);
    }

    #[test]
    fn test_usage_does_not_touch_fields() {
        let mut spec = spec();
        usage("APP", &mut spec).unwrap();
        assert_eq!(spec.port, 1);
    }

    #[test]
    fn test_usage_json() {
        let json = usage_json("APP", &mut spec()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["key"], "APP_PORT");
        assert_eq!(value[0]["type"], "u16");
        assert!(value[0].get("fallback_key").is_none());
        assert_eq!(value[1]["fallback_key"], "SHARED_TOKEN");
    }

    #[test]
    fn test_usage_table() {
        let table = usage_table("APP", &mut spec()).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("KEY"));
        assert!(lines[1].starts_with("APP_PORT "));
        assert!(lines[1].contains("8080"));
        assert!(lines[2].ends_with("true"));
    }

    #[test]
    fn test_usage_rejects_non_records() {
        let err = usage("APP", &mut 1.5_f64).unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { .. }));
    }
}

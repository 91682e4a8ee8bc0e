use validator::{ValidationError, ValidationErrors};

/// Flattens validation errors into a single message, sorted by field name
pub fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let messages = errs.iter().map(|e| describe(&field, e)).collect();
            (field, messages)
        })
        .collect();

    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, messages)| messages)
        .collect::<Vec<String>>()
        .join(", ")
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(msg) = &error.message {
        return format!("{}: {}", field, msg);
    }

    match error.code.as_ref() {
        "length" => {
            let min = error.params.get("min").and_then(|v| v.as_u64());
            let max = error.params.get("max").and_then(|v| v.as_u64());
            match (min, max) {
                (Some(min), Some(max)) => format!(
                    "{}: must be between {} and {} characters",
                    field, min, max
                ),
                (Some(min), None) => format!("{}: must be at least {} characters", field, min),
                (None, Some(max)) => format!("{}: must be at most {} characters", field, max),
                (None, None) => format!("{}: invalid length", field),
            }
        }
        code => format!("{}: {}", field, code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_length() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.add_param("min".into(), &1);
        err.add_param("max".into(), &100);
        errors.add("title", err);

        assert_eq!(
            flatten_errors(&errors),
            "title: must be between 1 and 100 characters"
        );
    }

    #[test]
    fn test_flatten_sorted_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("url", ValidationError::new("url"));
        errors.add(
            "note",
            ValidationError::new("custom").with_message("too noisy".into()),
        );

        assert_eq!(flatten_errors(&errors), "note: too noisy, url: url");
    }
}

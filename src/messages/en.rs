use super::{MessageCatalog, literal, property_name, subject, substitute_name};
use crate::engine::ErrorParams;

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{count} {}", if count == 1 { one } else { many })
}

pub(super) fn catalog() -> MessageCatalog {
    let mut catalog = MessageCatalog::new("validation failed", "value is required");

    catalog.set_keyword("required", |path, params, schema| match params {
        ErrorParams::Required { missing } => {
            format!("{} is required", property_name(path, missing, schema))
        }
        _ => String::new(),
    });
    catalog.set_keyword("type", |path, params, schema| match params {
        ErrorParams::Type { expected } => {
            format!("{} should be {}", subject(path, schema), expected)
        }
        _ => String::new(),
    });
    catalog.set_keyword("kind", |path, params, schema| match params {
        ErrorParams::Kind { kind } => {
            format!("{} should be {}", subject(path, schema), kind.as_str())
        }
        _ => String::new(),
    });

    let bounds = [
        ("minimum", "at least"),
        ("maximum", "at most"),
        ("exclusiveMinimum", "greater than"),
        ("exclusiveMaximum", "less than"),
    ];
    for (keyword, relation) in bounds {
        catalog.set_keyword(keyword, move |path, params, schema| match params {
            ErrorParams::Limit { limit } => {
                format!("{} should be {} {}", subject(path, schema), relation, limit)
            }
            _ => String::new(),
        });
    }

    let counts = [
        ("minLength", "at least", "character", "characters"),
        ("maxLength", "at most", "character", "characters"),
        ("minProperties", "at least", "property", "properties"),
        ("maxProperties", "at most", "property", "properties"),
        ("minItems", "at least", "item", "items"),
        ("maxItems", "at most", "item", "items"),
    ];
    for (keyword, relation, one, many) in counts {
        catalog.set_keyword(keyword, move |path, params, schema| match params {
            ErrorParams::Count { limit } => format!(
                "{} should have {} {}",
                subject(path, schema),
                relation,
                plural(*limit, one, many)
            ),
            _ => String::new(),
        });
    }

    catalog.set_keyword("multipleOf", |path, params, schema| match params {
        ErrorParams::MultipleOf { multiple_of } => {
            format!("{} should be multiple of {}", subject(path, schema), multiple_of)
        }
        _ => String::new(),
    });
    catalog.set_keyword("uniqueItems", |path, _, schema| {
        format!("{} should have unique items", subject(path, schema))
    });
    catalog.set_keyword("dependencies", |path, params, schema| match params {
        ErrorParams::Dependencies { property, deps } => format!(
            "{} should have {} {} when property {} exists",
            subject(path, schema),
            if deps.len() > 1 { "properties" } else { "property" },
            deps.join(", "),
            property
        ),
        _ => String::new(),
    });
    catalog.set_keyword("enum", |path, params, schema| match params {
        ErrorParams::Enum { allowed } => {
            let values: Vec<String> = allowed.iter().map(literal).collect();
            let listed = if values.len() > 3 {
                format!("{}...", values[..3].join(", "))
            } else {
                values.join(", ")
            };
            format!("{} should be one of {}", subject(path, schema), listed)
        }
        _ => String::new(),
    });
    catalog.set_keyword("const", |path, params, schema| match params {
        ErrorParams::Const { allowed } => {
            format!("{} should equal to {}", subject(path, schema), literal(allowed))
        }
        _ => String::new(),
    });
    catalog.set_keyword("format", |path, params, schema| match params {
        ErrorParams::Format { format } => {
            format!("{} should be {} string", subject(path, schema), format)
        }
        _ => String::new(),
    });
    catalog.set_keyword("pattern", |path, params, schema| match params {
        ErrorParams::Pattern { pattern } => {
            format!("{} should match pattern /{}/", subject(path, schema), pattern)
        }
        _ => String::new(),
    });

    for keyword in ["customSync", "customAsync"] {
        catalog.set_keyword(keyword, |path, params, schema| match params {
            ErrorParams::Custom { message } => substitute_name(message, &subject(path, schema)),
            _ => String::new(),
        });
    }

    catalog
}

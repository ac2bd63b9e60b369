use super::{MessageCatalog, literal, property_name, subject, substitute_name};
use crate::engine::ErrorParams;
use crate::schema::{Kind, StringFormat};

fn type_name(expected: &str) -> &str {
    match expected {
        "string" => "字符串",
        "number" => "数字",
        "integer" => "整数",
        "boolean" => "布尔值",
        "object" => "对象",
        "array" => "数组",
        other => other,
    }
}

fn kind_name(kind: Kind) -> &'static str {
    match kind {
        Kind::Date => "时间戳",
    }
}

fn format_name(format: StringFormat) -> &'static str {
    match format {
        StringFormat::Email => "电子邮箱",
        StringFormat::Uuid => "UUID",
        StringFormat::Date => "日期",
        StringFormat::DateTime => "日期时间",
        StringFormat::Uri => "URI",
        StringFormat::Hostname => "域名",
        StringFormat::Ipv4 => "IPv4",
        StringFormat::Ipv6 => "IPv6",
        StringFormat::Regex => "正则表达式",
    }
}

pub(super) fn catalog() -> MessageCatalog {
    let mut catalog = MessageCatalog::new("数据验证失败", "缺少必要数据");

    catalog.set_keyword("required", |path, params, schema| match params {
        ErrorParams::Required { missing } => {
            format!("{}必须提供", property_name(path, missing, schema))
        }
        _ => String::new(),
    });
    catalog.set_keyword("type", |path, params, schema| match params {
        ErrorParams::Type { expected } => {
            format!("{}必须是{}", subject(path, schema), type_name(expected))
        }
        _ => String::new(),
    });
    catalog.set_keyword("kind", |path, params, schema| match params {
        ErrorParams::Kind { kind } => {
            format!("{}必须是{}", subject(path, schema), kind_name(*kind))
        }
        _ => String::new(),
    });

    let bounds = [
        ("minimum", "不能小于"),
        ("maximum", "不能大于"),
        ("exclusiveMinimum", "必须大于"),
        ("exclusiveMaximum", "必须小于"),
    ];
    for (keyword, relation) in bounds {
        catalog.set_keyword(keyword, move |path, params, schema| match params {
            ErrorParams::Limit { limit } => {
                format!("{}{}{}", subject(path, schema), relation, limit)
            }
            _ => String::new(),
        });
    }

    let counts = [
        ("minLength", "不能少于", "个字符"),
        ("maxLength", "不能多于", "个字符"),
        ("minProperties", "不能少于", "个字段"),
        ("maxProperties", "不能多于", "个字段"),
        ("minItems", "不能少于", "个元素"),
        ("maxItems", "不能多于", "个元素"),
    ];
    for (keyword, relation, unit) in counts {
        catalog.set_keyword(keyword, move |path, params, schema| match params {
            ErrorParams::Count { limit } => {
                format!("{}{}{}{}", subject(path, schema), relation, limit, unit)
            }
            _ => String::new(),
        });
    }

    catalog.set_keyword("multipleOf", |path, params, schema| match params {
        ErrorParams::MultipleOf { multiple_of } => {
            format!("{}必须是{}的倍数", subject(path, schema), multiple_of)
        }
        _ => String::new(),
    });
    catalog.set_keyword("uniqueItems", |path, _, schema| {
        format!("{}不能包含重复值", subject(path, schema))
    });
    catalog.set_keyword("dependencies", |path, params, schema| match params {
        ErrorParams::Dependencies { property, deps } => {
            let deps: Vec<String> = deps
                .iter()
                .map(|dep| property_name(path, dep, schema))
                .collect();
            format!(
                "{}必须在拥有{}字段的同时拥有{}字段",
                subject(path, schema),
                property_name(path, property, schema),
                deps.join("、")
            )
        }
        _ => String::new(),
    });
    catalog.set_keyword("enum", |path, params, schema| match params {
        ErrorParams::Enum { allowed } => {
            let values: Vec<String> = allowed.iter().map(literal).collect();
            let listed = if values.len() > 3 {
                format!("{}…", values[..3].join("，"))
            } else {
                values.join("，")
            };
            format!("{}必须是{}其中一个值", subject(path, schema), listed)
        }
        _ => String::new(),
    });
    catalog.set_keyword("const", |path, params, schema| match params {
        ErrorParams::Const { allowed } => {
            format!("{}必须等于{}", subject(path, schema), literal(allowed))
        }
        _ => String::new(),
    });
    catalog.set_keyword("format", |path, params, schema| match params {
        ErrorParams::Format { format } => {
            format!("{}必须符合{}格式", subject(path, schema), format_name(*format))
        }
        _ => String::new(),
    });
    catalog.set_keyword("pattern", |path, params, schema| match params {
        ErrorParams::Pattern { pattern } => {
            format!("{}必须符合正则表达式/{}/", subject(path, schema), pattern)
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

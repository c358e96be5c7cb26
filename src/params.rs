use crate::errors::{ApiError, FieldError, FieldErrors};

pub const TX_HASH_LEN: usize = 32;

/// Collects every value of a list parameter from a raw query string.
///
/// Accepts repeated keys (`?a=x&a=y`), the bracket form (`?a[]=x`) and
/// comma separated values (`?a=x,y`). Blank items are dropped.
pub fn query_list(raw_query: Option<&str>, name: &str) -> Vec<String> {
    let Some(raw_query) = raw_query else {
        return vec![];
    };

    let bracketed = format!("{name}[]");

    url::form_urlencoded::parse(raw_query.as_bytes())
        .filter(|(key, _)| key == name || *key == bracketed)
        .flat_map(|(_, value)| {
            value
                .split(',')
                .map(|item| item.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Hex encoded values of a required list parameter.
///
/// Missing or empty yields 400, anything malformed yields 422 listing every
/// offending item.
pub fn hex_list(
    raw_query: Option<&str>,
    name: &str,
    max_items: usize,
    expected_len: Option<usize>,
) -> Result<Vec<Vec<u8>>, ApiError> {
    let items = query_list(raw_query, name);

    if items.is_empty() {
        return Err(ApiError::missing_query_param(name));
    }

    let mut details = FieldErrors::new();

    if items.len() > max_items {
        details.insert(
            name.to_string(),
            FieldError {
                message: format!("at most {max_items} values are allowed, got {}", items.len()),
                value: None,
            },
        );

        return Err(ApiError::validation_failed(details));
    }

    let mut decoded = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        match decode_item(item, expected_len) {
            Ok(bytes) => decoded.push(bytes),
            Err(message) => {
                details.insert(
                    format!("{name}[{index}]"),
                    FieldError {
                        message,
                        value: Some(item.clone()),
                    },
                );
            },
        }
    }

    if details.is_empty() {
        Ok(decoded)
    } else {
        Err(ApiError::validation_failed(details))
    }
}

fn decode_item(item: &str, expected_len: Option<usize>) -> Result<Vec<u8>, String> {
    let bytes = hex::decode(item).map_err(|e| format!("invalid hex string: {e}"))?;

    match expected_len {
        Some(len) if bytes.len() != len => Err(format!(
            "expected {len} bytes ({} hex characters), got {}",
            len * 2,
            bytes.len()
        )),
        _ => Ok(bytes),
    }
}

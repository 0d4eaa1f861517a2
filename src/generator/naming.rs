//! Identifier and path conversions shared by the model assembler, the
//! template filters and the artifact writer.

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static PATH_PARAM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}/]+)\}").expect("path parameter regex should be valid")
});

/// Convert an OpenAPI path template to a Rack route path.
///
/// Every `{name}` becomes `:name`; everything else is copied verbatim.
///
/// ```rust
/// use hanamigen::generator::to_rack_path;
/// assert_eq!(to_rack_path("/users/{user_id}/posts/{id}"), "/users/:user_id/posts/:id");
/// ```
pub fn to_rack_path(path: &str) -> String {
    PATH_PARAM_REGEX.replace_all(path, ":$1").into_owned()
}

/// Convert an identifier to lower snake case.
///
/// Word boundaries are placed at lower→upper transitions (`getBooks`), at the
/// last capital of an acronym run followed by lowercase (`HTTPServer`), after
/// a digit run followed by a letter (`v2Books`), and at any non-alphanumeric
/// character, which is dropped. Repeated boundaries collapse.
pub fn to_snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            push_boundary(&mut result);
            continue;
        }

        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if ch.is_uppercase() => {
                p.is_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_uppercase() && next.is_some_and(char::is_lowercase))
            }
            Some(p) if ch.is_alphabetic() => p.is_ascii_digit(),
            _ => false,
        };
        if boundary {
            push_boundary(&mut result);
        }
        result.extend(ch.to_lowercase());
    }

    result.trim_end_matches('_').to_string()
}

fn push_boundary(result: &mut String) {
    if !result.is_empty() && !result.ends_with('_') {
        result.push('_');
    }
}

/// Convert a snake_case, kebab-case or already-camel identifier to CamelCase,
/// as used for Ruby module and class names.
///
/// ```rust
/// use hanamigen::generator::to_camel_case;
/// assert_eq!(to_camel_case("pet_store"), "PetStore");
/// assert_eq!(to_camel_case("GetBooks"), "GetBooks");
/// ```
pub fn to_camel_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == '-' || c == ' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

//! Identifier helpers: PascalCase type names, field-name sanitization, and
//! name suggestions derived from request URLs.
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Root type name used when the caller has none.
pub const DEFAULT_ROOT_NAME: &str = "ApiResponse";

const FALLBACK_NAME: &str = "Unknown";
const ROOT_SUFFIX: &str = "Response";

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_\s]+").unwrap());

/// `user_profile-id` → `UserProfileId`. Each segment keeps only its first
/// code point upper-cased; the remainder is lower-cased.
pub fn to_pascal_case(raw: &str) -> String {
    let out: String = SEPARATORS.split(raw).map(pascal_segment).collect();
    if out.is_empty() { FALLBACK_NAME.to_string() } else { out }
}

/// Upper-case the first code point, keep the rest untouched.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pascal_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Field names may not start with a digit in the generated declarations.
pub fn sanitize_property_name(raw: &str) -> String {
    if raw.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{raw}")
    } else {
        raw.to_string()
    }
}

pub fn is_identifier(raw: &str) -> bool {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => chars.all(is_ident_part),
        _ => false,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn strip_non_identifier(raw: &str) -> String {
    raw.chars().filter(|c| is_ident_part(*c)).collect()
}

/// Type name for a caller-supplied root name. Names that already read as
/// identifiers keep their humps (`userProfile` → `UserProfile`); anything
/// else goes through [`to_pascal_case`].
pub fn root_type_name(raw: &str) -> String {
    if is_identifier(raw) {
        return capitalize(raw);
    }
    let name = strip_non_identifier(&to_pascal_case(raw));
    match name.chars().next() {
        None => FALLBACK_NAME.to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{name}"),
        Some(_) => name,
    }
}

/// Naming hint for the value stored under `key` inside type `parent`.
pub fn child_type_name(parent: &str, key: &str) -> String {
    format!("{parent}{}", strip_non_identifier(&to_pascal_case(key)))
}

/// Last non-empty path segment of `url`, if it parses.
pub(crate) fn last_path_segment(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let mut segments = url.path_segments()?;
    segments.rfind(|s| !s.is_empty()).map(str::to_string)
}

/// URL path segments split on `-` and `_` only.
pub(crate) fn segment_name(segment: &str) -> Option<String> {
    let name: String = segment.split(['-', '_']).map(pascal_segment).collect();
    let name = strip_non_identifier(&name);
    (!name.is_empty()).then_some(name)
}

/// `https://host/api/user-list` → `UserListResponse`.
pub fn suggest_root_name(url: &str) -> String {
    last_path_segment(url)
        .and_then(|segment| segment_name(&segment))
        .map(|name| format!("{name}{ROOT_SUFFIX}"))
        .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_splits_and_lowercases_segments() {
        assert_eq!(to_pascal_case("user_profile"), "UserProfile");
        assert_eq!(to_pascal_case("user-PROFILE id"), "UserProfileId");
        assert_eq!(to_pascal_case("a__b"), "AB");
        assert_eq!(to_pascal_case("userName"), "Username");
        assert_eq!(to_pascal_case("éclair"), "Éclair");
    }

    #[test]
    fn pascal_case_falls_back_to_unknown() {
        assert_eq!(to_pascal_case(""), "Unknown");
        assert_eq!(to_pascal_case("--"), "Unknown");
    }

    #[test]
    fn capitalize_keeps_the_tail() {
        assert_eq!(capitalize("userName"), "UserName");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn digit_leading_properties_get_prefixed() {
        assert_eq!(sanitize_property_name("123abc"), "_123abc");
        assert_eq!(sanitize_property_name("abc123"), "abc123");
        assert_eq!(sanitize_property_name(""), "");
    }

    #[test]
    fn root_names_keep_existing_humps() {
        assert_eq!(root_type_name("ApiResponse"), "ApiResponse");
        assert_eq!(root_type_name("userProfile"), "UserProfile");
        assert_eq!(root_type_name("api-response"), "ApiResponse");
        assert_eq!(root_type_name("2024 report"), "_2024Report");
        assert_eq!(root_type_name(""), "Unknown");
    }

    #[test]
    fn child_names_append_pascal_key() {
        assert_eq!(child_type_name("Root", "user"), "RootUser");
        assert_eq!(child_type_name("RootUser", "home_address"), "RootUserHomeAddress");
        assert_eq!(child_type_name("Root", "content.type"), "RootContenttype");
        assert_eq!(child_type_name("Root", "123abc"), "Root123abc");
    }

    #[test]
    fn root_name_from_url() {
        assert_eq!(suggest_root_name("https://api.example.com/v1/user-list"), "UserListResponse");
        assert_eq!(suggest_root_name("https://api.example.com/v1/users/"), "UsersResponse");
        assert_eq!(suggest_root_name("https://api.example.com/get_ALL"), "GetAllResponse");
    }

    #[test]
    fn root_name_from_url_falls_back() {
        assert_eq!(suggest_root_name("https://api.example.com/"), DEFAULT_ROOT_NAME);
        assert_eq!(suggest_root_name("not a url"), DEFAULT_ROOT_NAME);
        assert_eq!(suggest_root_name("https://api.example.com/--"), DEFAULT_ROOT_NAME);
    }
}

use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

static DISPLAY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}0-9 _.\-]+$").expect("valid display name regex"));

static COLOR_THEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

pub fn is_display_name_valid(name: &str) -> bool {
    let v = name.trim();
    let len = v.chars().count();
    (2..=32).contains(&len) && DISPLAY_NAME_RE.is_match(v)
}

pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if is_display_name_valid(name) {
        Ok(())
    } else {
        let mut err = ValidationError::new("display_name");
        err.message = Some("Invalid display name".into());
        Err(err)
    }
}

pub fn validate_color_theme(color: &str) -> Result<(), ValidationError> {
    if COLOR_THEME_RE.is_match(color) {
        Ok(())
    } else {
        let mut err = ValidationError::new("color_theme");
        err.message = Some("color_theme must look like #RRGGBB".into());
        Err(err)
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

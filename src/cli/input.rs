//! Validation and prompting for connection values

use crate::error::{Error, Result};
use dialoguer::{Confirm, Input};
use once_cell::sync::Lazy;
use regex::Regex;

/// A domain, ignoring an http(s) scheme and a trailing slash
static DOMAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:https?://)?(.+?\..+?)/?$").expect("valid domain regex"));

/// A Philomena API key: 20 alphanumeric characters
static API_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z0-9]{20})$").expect("valid API key regex"));

fn capture(pattern: &Regex, input: &str) -> Option<String> {
    pattern
        .captures(input.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the host from a booru URL such as `https://derpibooru.org/`
pub fn parse_booru_host(input: &str) -> Result<String> {
    capture(&DOMAIN_PATTERN, input)
        .ok_or_else(|| Error::invalid_input("booru URL", format!("'{}'", input.trim())))
}

/// Check an API key
pub fn parse_api_key(input: &str) -> Result<String> {
    capture(&API_KEY_PATTERN, input).ok_or_else(|| {
        Error::invalid_input("API key", "expected 20 letters and digits")
    })
}

/// Use the given value or prompt until a valid one is entered
pub fn resolve<F>(given: Option<&str>, prompt: &str, parse: F) -> Result<String>
where
    F: Fn(&str) -> Result<String>,
{
    if let Some(value) = given {
        return parse(value);
    }

    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|s: &String| parse(s.as_str()).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;
    parse(&value)
}

/// Use the given query or prompt for one
pub fn resolve_query(given: Option<&str>) -> Result<String> {
    if let Some(query) = given {
        return Ok(query.trim().to_string());
    }

    println!(
        "Enter query to copy from the source booru to the target booru. \
         Any query that can be made on the site will work."
    );
    let query: String = Input::new().with_prompt("Query").interact_text()?;
    Ok(query.trim().to_string())
}

/// Ask whether to start copying `total` images
pub fn confirm_total(total: u64) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!(
            "Copy {total} images? Make sure the query and image count are correct"
        ))
        .default(true)
        .interact()?)
}

//! Deployed resource names.
//!
//! Tables and buckets are named `{app}-{stage}-{resource}` in kebab case.
//! Names are derived from the values held by a [`NamingConvention`], which
//! is built from [`crate::Config`]; nothing here reads the environment.

/// Default application name used when `APP_NAME` is unset.
pub const DEFAULT_APP_NAME: &str = "saasbase";

/// Default deployment stage used when `STAGE` is unset.
pub const DEFAULT_STAGE: &str = "dev";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    app_name: String,
    stage: String,
}

impl NamingConvention {
    pub fn new(app_name: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            stage: stage.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Full resource name, e.g. `saasbase-dev-media-table`.
    pub fn resource_name(&self, name: &str) -> String {
        kebab_case(&format!("{}-{}-{}", self.app_name, self.stage, name))
    }

    pub fn users_table(&self) -> String {
        self.resource_name("usersTable")
    }

    pub fn media_table(&self) -> String {
        self.resource_name("mediaTable")
    }

    pub fn media_bucket(&self) -> String {
        self.resource_name("mediaBucket")
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME, DEFAULT_STAGE)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
}

fn class_of(c: char) -> Option<CharClass> {
    if c.is_ascii_lowercase() {
        Some(CharClass::Lower)
    } else if c.is_ascii_uppercase() {
        Some(CharClass::Upper)
    } else if c.is_ascii_digit() {
        Some(CharClass::Digit)
    } else {
        None
    }
}

/// Split a string into lowercase words joined by `-`.
///
/// Word boundaries are any non-alphanumeric character, a lower-to-upper
/// transition (`mediaTable`), the last capital of an acronym followed by a
/// lowercase letter (`S3Bucket` -> `s-3-bucket`, `APIRoot` -> `api-root`)
/// and every letter/digit transition.
pub fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<CharClass> = None;

    for (i, &c) in chars.iter().enumerate() {
        let Some(class) = class_of(c) else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        };

        let next = chars.get(i + 1).copied().and_then(class_of);
        let boundary = match (prev, class) {
            (None, _) => false,
            (Some(CharClass::Lower), CharClass::Upper) => true,
            (Some(CharClass::Upper), CharClass::Upper) => next == Some(CharClass::Lower),
            (Some(CharClass::Digit), CharClass::Digit) => false,
            (Some(CharClass::Digit), _) | (Some(_), CharClass::Digit) => true,
            _ => false,
        };

        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
        prev = Some(class);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("mediaTable"), "media-table");
        assert_eq!(kebab_case("My App_dev--usersTable"), "my-app-dev-users-table");
        assert_eq!(kebab_case("APIRoot"), "api-root");
        assert_eq!(kebab_case("v2Stage"), "v-2-stage");
        assert_eq!(kebab_case("already-kebab"), "already-kebab");
        assert_eq!(kebab_case(""), "");
    }

    #[test]
    fn test_resource_names() {
        let naming = NamingConvention::default();
        assert_eq!(naming.users_table(), "saasbase-dev-users-table");
        assert_eq!(naming.media_table(), "saasbase-dev-media-table");
        assert_eq!(naming.media_bucket(), "saasbase-dev-media-bucket");

        let prod = NamingConvention::new("MyProduct", "prod");
        assert_eq!(prod.media_table(), "my-product-prod-media-table");
    }
}

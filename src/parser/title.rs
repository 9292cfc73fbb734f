use regex::Regex;
use std::sync::OnceLock;

const DROPPED_SUFFIXES: [&str; 2] = ["the movie", "the series"];

struct TitleRegex {
    quotes: Regex,
    separators: Regex,
}

impl TitleRegex {
    fn get() -> &'static Self {
        static INSTANCE: OnceLock<TitleRegex> = OnceLock::new();
        INSTANCE.get_or_init(|| Self {
            quotes: Regex::new(r#"['"’:]"#).expect("Invalid Regex"),
            separators: Regex::new(r"[^\p{L}\p{N}]+").expect("Invalid Regex"),
        })
    }
}

/// Reduces a title to a comparison key.
///
/// Lower-cases, drops a trailing "the movie"/"the series" (unless that is the
/// whole title), removes quotes and colons, and collapses every other run of
/// non-alphanumeric characters into a single `_`.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let mut lowered = title.trim().to_lowercase();

    for suffix in DROPPED_SUFFIXES {
        if lowered != suffix && lowered.ends_with(suffix) {
            lowered.truncate(lowered.len() - suffix.len());
        }
    }

    let re = TitleRegex::get();
    let unquoted = re.quotes.replace_all(&lowered, "");
    re.separators
        .replace_all(&unquoted, "_")
        .trim_matches('_')
        .to_string()
}

/// Fuzzy title equality used when matching search candidates.
#[must_use]
pub fn compare_title(a: &str, b: &str) -> bool {
    let a = normalize_title(a);
    !a.is_empty() && a == normalize_title(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("The Office"), "the_office");
        assert_eq!(normalize_title("  Spider-Man: No Way Home "), "spider_man_no_way_home");
        assert_eq!(normalize_title("Ocean's Eleven"), "oceans_eleven");
        assert_eq!(normalize_title("Avatar The Movie"), "avatar");
        assert_eq!(normalize_title("The Movie"), "the_movie");
        assert_eq!(normalize_title("Amélie"), "amélie");
    }

    #[test]
    fn test_compare_title_ignores_case_and_punctuation() {
        assert!(compare_title("Spider-Man: No Way Home", "spider man no way home"));
        assert!(compare_title("Money Heist", "MONEY HEIST!"));
        assert!(compare_title("Dragon Ball Z the Movie", "Dragon Ball Z"));
        assert!(!compare_title("Dark", "Dark Matter"));
    }

    #[test]
    fn test_compare_title_rejects_blank() {
        assert!(!compare_title("", ""));
        assert!(!compare_title("!!", "??"));
    }
}

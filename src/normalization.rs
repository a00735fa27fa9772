/// Normalizes a free-text form field by stripping surrounding
/// whitespace.
///
/// ```
/// use checkin::normalization::normalize_field;
/// assert_eq!(normalize_field("  Intro to Go "), "Intro to Go");
/// ```
pub fn normalize_field(value: impl AsRef<str>) -> String {
    value.as_ref().trim().to_owned()
}

/// Turns loosely typed clock input into `HH:MM`. Four or more digits
/// are read as hours then minutes; anything that is not a valid 24-hour
/// time comes back unchanged.
///
/// ```
/// use checkin::normalization::format_time;
/// assert_eq!(format_time("0930"), "09:30");
/// assert_eq!(format_time("9:30"), "9:30");
/// assert_eq!(format_time("2561"), "2561");
/// ```
pub fn format_time(input: impl AsRef<str>) -> String {
    let input = input.as_ref();
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() >= 4 {
        let hours = digits[0] * 10 + digits[1];
        let minutes = digits[2] * 10 + digits[3];

        if hours < 24 && minutes < 60 {
            return format!("{:02}:{:02}", hours, minutes);
        }
    }

    input.to_owned()
}

/// Derives a file-system-safe stem from a class name. Accents are
/// stripped, runs of anything other than ASCII letters and digits
/// become a single `_`, and an empty result falls back to `class`.
///
/// ```
/// use checkin::normalization::file_stem;
/// assert_eq!(file_stem("Intro to Go"), "Intro_to_Go");
/// assert_eq!(file_stem("Café: Rust/C++ "), "Cafe_Rust_C");
/// assert_eq!(file_stem("!!!"), "class");
/// ```
pub fn file_stem(name: impl AsRef<str>) -> String {
    use unicode_normalization::char::is_combining_mark;
    use unicode_normalization::UnicodeNormalization;

    let mut stem = String::new();
    let mut pending_separator = false;

    for c in name.as_ref().nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(c);
        } else {
            pending_separator = true;
        }
    }

    if stem.is_empty() {
        String::from("class")
    } else {
        stem
    }
}

/// The name offered to the person exporting, e.g.
/// `Intro_to_Go_attendees.csv`.
pub fn export_file_name(class_name: impl AsRef<str>) -> String {
    format!("{}_attendees.csv", file_stem(class_name))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{export_file_name, file_stem, format_time};

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 2000, ..ProptestConfig::default()
        })]

        #[test]
        fn stems_are_safe(name in "\\PC*") {
            let stem = file_stem(&name);

            prop_assert!(!stem.is_empty(), "{:?} (stem of {:?}) is not empty", stem, name);
            prop_assert!(stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'), "{:?} (stem of {:?}) is file-system safe", stem, name);
            prop_assert!(!stem.starts_with('_') && !stem.ends_with('_'), "{:?} (stem of {:?}) has no dangling separator", stem, name);
            prop_assert!(!stem.contains("__"), "{:?} (stem of {:?}) has no doubled separator", stem, name);
        }

        #[test]
        fn valid_clock_digits_are_formatted(hours in 0u32..24, minutes in 0u32..60) {
            let formatted = format_time(format!("{:02}{:02}", hours, minutes));

            prop_assert_eq!(formatted, format!("{:02}:{:02}", hours, minutes));
        }
    }

    #[test]
    fn times_already_formatted_are_kept() {
        assert_eq!(format_time("09:00"), "09:00");
        assert_eq!(format_time("17:45"), "17:45");
        assert_eq!(format_time(""), "");
    }

    #[test]
    fn export_names_carry_the_suffix() {
        assert_eq!(export_file_name("Intro to Go"), "Intro_to_Go_attendees.csv");
        assert_eq!(export_file_name("  "), "class_attendees.csv");
    }
}

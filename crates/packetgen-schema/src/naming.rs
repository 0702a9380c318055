//! Name transforms used by the emitters.
//!
//! Configuration names are CamelCase (`GetChipTemperature`); target code wants
//! `get_chip_temperature`, `GET_CHIP_TEMPERATURE` or a short local alias
//! (`gct`). None of this affects the wire format.

/// Split a CamelCase or snake_case name into lowercase words.
///
/// Runs of capitals are kept together (`IMUReading` -> `imu`, `reading`) and
/// digits stick to the word they follow.
pub fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `GetChipTemperature` -> `get_chip_temperature`.
pub fn snake_case(name: &str) -> String {
    words(name).join("_")
}

/// `GetChipTemperature` -> `GET_CHIP_TEMPERATURE`.
pub fn upper_case(name: &str) -> String {
    snake_case(name).to_uppercase()
}

/// `get_chip_temperature` -> `GetChipTemperature`.
pub fn camel_case(name: &str) -> String {
    words(name).iter().map(|w| capitalize(w)).collect()
}

/// `get_chip_temperature` -> `getChipTemperature`.
pub fn headless_camel_case(name: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(name).iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// First letter of every word: `get_chip_temperature` -> `gct`.
pub fn short_form(name: &str) -> String {
    words(name)
        .iter()
        .filter_map(|w| w.chars().next())
        .collect()
}

/// Keywords, standard macros and fixed-width type names that generated code
/// cannot use as names.
pub const RESERVED_WORDS: &[&str] = &[
    "auto", "bool", "break", "case", "char", "const", "continue", "default", "do", "double",
    "else", "enum", "extern", "false", "float", "for", "goto", "if", "inline", "int", "long",
    "register", "restrict", "return", "short", "signed", "sizeof", "static", "struct",
    "switch", "true", "typedef", "union", "unsigned", "void", "volatile", "while", "NULL",
    "_Bool", "_Complex", "_Imaginary", "int8_t", "uint8_t", "int16_t", "uint16_t", "int32_t",
    "uint32_t", "int64_t", "uint64_t", "size_t",
];

/// Whether `name` is a plain ASCII identifier: a letter or underscore
/// followed by letters, digits or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `name` is a keyword of the generated languages.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("GetChipTemperature"), "get_chip_temperature");
        assert_eq!(snake_case("get_chip_temperature"), "get_chip_temperature");
        assert_eq!(snake_case("IMUReading"), "imu_reading");
        assert_eq!(snake_case("Voltage2Reached"), "voltage2_reached");
        assert_eq!(snake_case("GetRGBValue"), "get_rgb_value");
    }

    #[test]
    fn test_upper_and_camel() {
        assert_eq!(upper_case("DistanceReached"), "DISTANCE_REACHED");
        assert_eq!(camel_case("distance_reached"), "DistanceReached");
        assert_eq!(headless_camel_case("DistanceReached"), "distanceReached");
    }

    #[test]
    fn test_short_form() {
        assert_eq!(short_form("get_chip_temperature"), "gct");
        assert_eq!(short_form("SetPeriod"), "sp");
        assert_eq!(short_form(""), "");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("servo_num"));
        assert!(is_identifier("_x2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2nd"));
        assert!(!is_identifier("max value"));
        assert!(!is_identifier("wert-ä"));
        assert!(is_reserved("int"));
        assert!(is_reserved("NULL"));
        assert!(is_reserved("uint16_t"));
        assert!(!is_reserved("value"));
    }
}

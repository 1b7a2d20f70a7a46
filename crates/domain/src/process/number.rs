use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Human-readable process number, e.g. `PROC-M2X9K1AB-7QF3Z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessNumber(String);

impl ProcessNumber {
    /// Generates `PROC-<base36 millis>-<5 random base36 chars>`.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let random: String = Uuid::new_v4().as_bytes()[..5]
            .iter()
            .map(|b| ALPHABET[(*b as usize) % 36] as char)
            .collect();
        Self(format!("PROC-{}-{}", to_base36(millis), random))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProcessNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ProcessNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn generated_numbers_have_expected_shape() {
        let number = ProcessNumber::generate();
        let parts: Vec<_> = number.as_str().split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PROC");
        assert!(!parts[1].is_empty());
        assert_eq!(parts[2].len(), 5);
        assert!(
            number
                .as_str()
                .chars()
                .all(|c| c == '-' || c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn generated_numbers_differ() {
        assert_ne!(ProcessNumber::generate(), ProcessNumber::generate());
    }
}

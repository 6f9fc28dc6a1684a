use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OdometerError {
    #[error("odometer reading {0} is outside {min}..={max}", min = Reading::MIN, max = Reading::MAX)]
    ReadingOutOfRange(u32),
    #[error("question index {0} is outside 1..=99")]
    IndexOutOfRange(u32),
    #[error("'{0}' is not a two-digit question key")]
    InvalidKey(String),
}

/// Simulated odometer value, in km.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, TS)]
#[ts(export)]
pub struct Reading(u32);

impl Reading {
    pub const MIN: u32 = 10_000;
    pub const MAX: u32 = 99_999;

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn question_index(self) -> QuestionIndex {
        QuestionIndex::from_reading(self)
    }
}

impl TryFrom<u32> for Reading {
    type Error = OdometerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Reading(value))
        } else {
            Err(OdometerError::ReadingOutOfRange(value))
        }
    }
}

/// Identifies a question bundle, always within `1..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct QuestionIndex(u8);

impl QuestionIndex {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 99;

    /// Last two digits of the reading; a reading ending in `00` maps to 1.
    pub fn from_reading(reading: Reading) -> Self {
        match reading.value() % 100 {
            0 => QuestionIndex(1),
            n => QuestionIndex(n as u8),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-padded key as used by the dataset, e.g. `"07"`.
    pub fn key(self) -> String {
        format!("{:02}", self.0)
    }

    pub fn all() -> impl Iterator<Item = QuestionIndex> {
        (Self::MIN..=Self::MAX).map(QuestionIndex)
    }
}

impl TryFrom<u8> for QuestionIndex {
    type Error = OdometerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(QuestionIndex(value))
        } else {
            Err(OdometerError::IndexOutOfRange(value.into()))
        }
    }
}

impl From<QuestionIndex> for u8 {
    fn from(index: QuestionIndex) -> Self {
        index.0
    }
}

impl fmt::Display for QuestionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for QuestionIndex {
    type Err = OdometerError;

    /// Only canonical keys are accepted: "07" parses, "7" and "007" don't.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OdometerError::InvalidKey(s.to_owned()));
        }
        s.parse::<u8>()
            .map_err(|_| OdometerError::InvalidKey(s.to_owned()))
            .and_then(QuestionIndex::try_from)
            .map_err(|_| OdometerError::InvalidKey(s.to_owned()))
    }
}

/// Rolls the odometer with the thread-local RNG.
pub fn generate() -> (Reading, QuestionIndex) {
    generate_with(&mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> (Reading, QuestionIndex) {
    let reading = Reading(rng.gen_range(Reading::MIN..=Reading::MAX));
    let index = reading.question_index();
    log::debug!("Rolled odometer at {} km, question {}", reading.0, index);
    (reading, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn derive(value: u32) -> u8 {
        Reading::try_from(value).unwrap().question_index().value()
    }

    #[test]
    fn derivation_uses_last_two_digits() {
        assert_eq!(derive(10000), 1);
        assert_eq!(derive(10100), 1);
        assert_eq!(derive(12345), 45);
        assert_eq!(derive(99999), 99);
        assert_eq!(derive(50000), 1);
        assert_eq!(derive(10001), 1);
        assert_eq!(derive(10007), 7);
    }

    #[test]
    fn every_reading_derives_a_valid_index() {
        for value in Reading::MIN..=Reading::MAX {
            let index = derive(value);
            assert!((1..=99).contains(&index), "{value} -> {index}");
        }
    }

    #[test]
    fn readings_outside_the_odometer_are_rejected() {
        assert_eq!(
            Reading::try_from(9_999u32),
            Err(OdometerError::ReadingOutOfRange(9_999))
        );
        assert_eq!(
            Reading::try_from(100_000u32),
            Err(OdometerError::ReadingOutOfRange(100_000))
        );
        assert!(Reading::try_from(Reading::MIN).is_ok());
        assert!(Reading::try_from(Reading::MAX).is_ok());
    }

    #[test]
    fn generated_readings_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut lowest = u32::MAX;
        let mut highest = 0;
        for _ in 0..200_000 {
            let (reading, index) = generate_with(&mut rng);
            assert!((Reading::MIN..=Reading::MAX).contains(&reading.value()));
            assert_eq!(index, reading.question_index());
            lowest = lowest.min(reading.value());
            highest = highest.max(reading.value());
        }
        // 200k draws over 90k values reach close to both ends.
        assert!(lowest < Reading::MIN + 100);
        assert!(highest > Reading::MAX - 100);
    }

    #[test]
    fn generated_indices_cover_every_question() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 100];
        for _ in 0..50_000 {
            seen[generate_with(&mut rng).1.value() as usize] = true;
        }
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|s| *s));
    }

    #[test]
    fn thread_rng_roll_is_consistent() {
        for _ in 0..1_000 {
            let (reading, index) = generate();
            assert_eq!(QuestionIndex::from_reading(reading), index);
        }
    }

    #[test]
    fn keys_are_zero_padded() {
        let key = |n: u8| QuestionIndex::try_from(n).unwrap().key();
        assert_eq!(key(1), "01");
        assert_eq!(key(7), "07");
        assert_eq!(key(42), "42");
        assert_eq!(key(99), "99");
        assert_eq!(QuestionIndex::try_from(3u8).unwrap().to_string(), "03");
    }

    #[test]
    fn index_bounds() {
        assert_eq!(
            QuestionIndex::try_from(0u8),
            Err(OdometerError::IndexOutOfRange(0))
        );
        assert_eq!(
            QuestionIndex::try_from(100u8),
            Err(OdometerError::IndexOutOfRange(100))
        );
        assert_eq!(QuestionIndex::all().count(), 99);
    }

    #[test]
    fn only_canonical_keys_parse() {
        assert_eq!("07".parse::<QuestionIndex>().map(|i| i.value()), Ok(7));
        assert_eq!("99".parse::<QuestionIndex>().map(|i| i.value()), Ok(99));
        for bad in ["7", "007", "00", "1a", "", " 7", "+7", "100"] {
            assert_eq!(
                bad.parse::<QuestionIndex>(),
                Err(OdometerError::InvalidKey(bad.to_owned())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn index_serializes_as_a_number() {
        let index = QuestionIndex::try_from(12u8).unwrap();
        assert_eq!(serde_json::to_string(&index).unwrap(), "12");
        assert_eq!(u8::from(index), 12);
    }
}

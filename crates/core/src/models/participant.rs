//! Participant model

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tenure (in years) from which a staff member's number appears twice
pub const SENIOR_TENURE_YEARS: u32 = 3;

/// The number printed on a participant's ticket and on the wheel
///
/// Draw numbers are compared as integers everywhere; there is no string form
/// besides `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawNumber(pub u32);

impl DrawNumber {
    pub fn get(self) -> u32 {
        self.0
    }

    /// Draw numbers start at 1
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for DrawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DrawNumber {
    fn from(value: u32) -> Self {
        DrawNumber(value)
    }
}

/// Participant category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Staff,
    Guest,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Staff => "Staff",
            Category::Guest => "Guest",
        }
    }

    /// Stable storage code
    pub fn code(&self) -> &'static str {
        match self {
            Category::Staff => "staff",
            Category::Guest => "guest",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "staff" => Some(Category::Staff),
            "guest" => Some(Category::Guest),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Someone who can win a prize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub tenure_years: u32,
    pub number: DrawNumber,
}

impl Participant {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        tenure_years: u32,
        number: DrawNumber,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            tenure_years,
            number,
        }
    }

    pub fn staff(id: impl Into<String>, name: impl Into<String>, tenure_years: u32, number: u32) -> Self {
        Self::new(id, name, Category::Staff, tenure_years, DrawNumber(number))
    }

    pub fn guest(id: impl Into<String>, name: impl Into<String>, number: u32) -> Self {
        Self::new(id, name, Category::Guest, 0, DrawNumber(number))
    }

    /// Senior staff get their number on the wheel twice
    pub fn is_senior_staff(&self) -> bool {
        self.category == Category::Staff && self.tenure_years >= SENIOR_TENURE_YEARS
    }

    /// How many wheel segments (and weighted pool entries) this participant gets.
    ///
    /// The wheel layout and the draw both read this; they must never disagree.
    pub fn draw_weight(&self) -> usize {
        if self.is_senior_staff() {
            2
        } else {
            1
        }
    }
}

/// Draw numbers excluded from winning. Still shown on the wheel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blacklist(BTreeSet<DrawNumber>);

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, number: DrawNumber) -> bool {
        self.0.contains(&number)
    }

    /// Returns false if the number was already listed
    pub fn insert(&mut self, number: DrawNumber) -> bool {
        self.0.insert(number)
    }

    pub fn remove(&mut self, number: DrawNumber) -> bool {
        self.0.remove(&number)
    }

    pub fn iter(&self) -> impl Iterator<Item = DrawNumber> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DrawNumber> for Blacklist {
    fn from_iter<I: IntoIterator<Item = DrawNumber>>(iter: I) -> Self {
        Blacklist(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[u32; N]> for Blacklist {
    fn from(numbers: [u32; N]) -> Self {
        numbers.into_iter().map(DrawNumber).collect()
    }
}

/// Numbers that already won, in the order they were confirmed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WonNumbers(Vec<DrawNumber>);

impl WonNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, number: DrawNumber) -> bool {
        self.0.contains(&number)
    }

    pub fn push(&mut self, number: DrawNumber) {
        self.0.push(number);
    }

    pub fn iter(&self) -> impl Iterator<Item = DrawNumber> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<DrawNumber> for WonNumbers {
    fn from_iter<I: IntoIterator<Item = DrawNumber>>(iter: I) -> Self {
        WonNumbers(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[u32; N]> for WonNumbers {
    fn from(numbers: [u32; N]) -> Self {
        numbers.into_iter().map(DrawNumber).collect()
    }
}

/// Eligible = neither blacklisted nor already a winner
pub fn is_eligible(participant: &Participant, blacklist: &Blacklist, won: &WonNumbers) -> bool {
    !blacklist.contains(participant.number) && !won.contains(participant.number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_senior_staff_weight() {
        assert_eq!(Participant::staff("a", "A", 3, 1).draw_weight(), 2);
        assert_eq!(Participant::staff("b", "B", 10, 2).draw_weight(), 2);
        assert_eq!(Participant::staff("c", "C", 2, 3).draw_weight(), 1);
    }

    #[test]
    fn test_zero_is_not_a_draw_number() {
        assert!(!DrawNumber(0).is_valid());
        assert!(DrawNumber(1).is_valid());
    }

    #[test]
    fn test_guest_never_weighted() {
        let mut guest = Participant::guest("g", "G", 4);
        guest.tenure_years = 12;
        assert_eq!(guest.draw_weight(), 1);
    }

    #[test]
    fn test_eligibility() {
        let p = Participant::guest("g", "G", 7);
        assert!(is_eligible(&p, &Blacklist::new(), &WonNumbers::new()));
        assert!(!is_eligible(&p, &Blacklist::from([7]), &WonNumbers::new()));
        assert!(!is_eligible(&p, &Blacklist::new(), &WonNumbers::from([7])));
    }

    #[test]
    fn test_category_codes() {
        assert_eq!(Category::from_code(Category::Staff.code()), Some(Category::Staff));
        assert_eq!(Category::from_code("employee"), None);
    }
}

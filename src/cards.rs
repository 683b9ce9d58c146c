use std::fmt;
use std::str::FromStr;

/// The thirteen faces, in deck order (Ace first, King last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
    Nine = 8,
    Ten = 9,
    Jack = 10,
    Queen = 11,
    King = 12,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Position of the face in deck order, 0..13.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn to_char(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }

    /// Spelled-out face, used in player-facing messages.
    pub const fn name(self) -> &'static str {
        match self {
            Rank::Ace => "Ace",
            Rank::Two => "Deuce",
            Rank::Three => "Three",
            Rank::Four => "Four",
            Rank::Five => "Five",
            Rank::Six => "Six",
            Rank::Seven => "Seven",
            Rank::Eight => "Eight",
            Rank::Nine => "Nine",
            Rank::Ten => "Ten",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid rank: '{0}'")]
    Invalid(String),
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t == "10" {
            return Ok(Rank::Ten);
        }
        if t.eq_ignore_ascii_case("two") {
            return Ok(Rank::Two);
        }
        let mut chars = t.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::try_from(c).map_err(|_| RankParseError::Invalid(s.to_string())),
            _ => Rank::ALL
                .iter()
                .copied()
                .find(|r| r.name().eq_ignore_ascii_case(t))
                .ok_or_else(|| RankParseError::Invalid(s.to_string())),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        let upper = c.to_ascii_uppercase();
        Rank::ALL
            .into_iter()
            .find(|r| r.to_char() == upper)
            .ok_or_else(|| RankParseError::Invalid(c.to_string()))
    }
}

/// Four suits in deck order: Hearts, Diamonds, Clubs, Spades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn to_char(self) -> char {
        match self {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuitParseError {
    #[error("invalid suit: '{0}'")]
    Invalid(String),
}

impl FromStr for Suit {
    type Err = SuitParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Suit::try_from(c);
        }
        Suit::ALL
            .into_iter()
            .find(|suit| suit.name().eq_ignore_ascii_case(t))
            .ok_or_else(|| SuitParseError::Invalid(s.to_string()))
    }
}

impl TryFrom<char> for Suit {
    type Error = SuitParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        let lower = c.to_ascii_lowercase();
        Suit::ALL
            .into_iter()
            .find(|suit| suit.to_char() == lower)
            .ok_or_else(|| SuitParseError::Invalid(c.to_string()))
    }
}

/// An immutable playing card: face + suit.
///
/// Each of the 52 cards carries a stable identifier (1..=52) that front ends
/// use to look up artwork.
///
/// ```
/// use pishti::cards::{Card, Rank, Suit};
///
/// let card = Card::new(Rank::Jack, Suit::Clubs);
/// assert_eq!(card.to_string(), "Jc");
/// assert_eq!(card.id(), 37);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }
    pub const fn suit(self) -> Suit {
        self.suit
    }

    pub const fn is_jack(self) -> bool {
        matches!(self.rank, Rank::Jack)
    }

    /// Stable identifier in 1..=52, ordered by suit then face.
    pub const fn id(self) -> u8 {
        (self.suit.index() * 13 + self.rank.index() + 1) as u8
    }

    /// Inverse of [`Card::id`].
    pub fn from_id(id: u8) -> Option<Card> {
        if !(1..=52).contains(&id) {
            return None;
        }
        let i = (id - 1) as usize;
        Some(Card::new(Rank::ALL[i % 13], Suit::ALL[i / 13]))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error(transparent)]
    Rank(#[from] RankParseError),
    #[error(transparent)]
    Suit(#[from] SuitParseError),
}

impl FromStr for Card {
    type Err = CardParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let Some(suit_ch) = t.chars().last() else {
            return Err(CardParseError::Invalid(s.to_string()));
        };
        if t.len() < 2 || !suit_ch.is_ascii() {
            return Err(CardParseError::Invalid(s.to_string()));
        }
        // rank is everything but the last char ("10h" or "Th"); suit is last char
        let rank = Rank::from_str(&t[..t.len() - 1])?;
        let suit = Suit::try_from(suit_ch)?;
        Ok(Card::new(rank, suit))
    }
}

/// Parse multiple cards separated by whitespace or commas.
///
/// ```
/// use pishti::cards::{parse_cards, Card, Rank, Suit};
///
/// let cards = parse_cards("Jc, 2c 10d").unwrap();
/// assert_eq!(cards[0], Card::new(Rank::Jack, Suit::Clubs));
/// assert_eq!(cards[1], Card::new(Rank::Two, Suit::Clubs));
/// assert_eq!(cards[2], Card::new(Rank::Ten, Suit::Diamonds));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}

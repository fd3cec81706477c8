//! Core card-related types: Card, Rank, Suit

use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
    /// Only carried by the two jokers.
    Joker,
}

impl Suit {
    pub const STANDARD: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

/// Ranks in playing strength order: 3 lowest, then 2, then the jokers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    Two,
    SmallJoker,
    BigJoker,
}

impl Rank {
    pub const ALL: [Rank; 15] = [
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
        Rank::Ace,
        Rank::Two,
        Rank::SmallJoker,
        Rank::BigJoker,
    ];

    /// Integer rank value: 3..=14 for 3..A, 15 for 2, 16/17 for the jokers.
    #[inline]
    pub const fn value(self) -> u8 {
        match self {
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
            Rank::Two => 15,
            Rank::SmallJoker => 16,
            Rank::BigJoker => 17,
        }
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        Rank::ALL.iter().copied().find(|r| r.value() == value)
    }

    #[inline]
    pub const fn is_joker(self) -> bool {
        matches!(self, Rank::SmallJoker | Rank::BigJoker)
    }

    /// Whether this rank may take part in a straight, pair-straight or
    /// airplane chain. The 2 and both jokers never do.
    #[inline]
    pub const fn is_chainable(self) -> bool {
        self.value() < Rank::Two.value()
    }

    /// Short label used in descriptions ("3".."10", "J", "Q", "K", "A", "2").
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::SmallJoker => "small joker",
            Rank::BigJoker => "big joker",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    /// Build a card, rejecting combinations absent from the 54-card deck.
    pub fn new(suit: Suit, rank: Rank) -> Result<Card, DomainError> {
        if (suit == Suit::Joker) != rank.is_joker() {
            return Err(DomainError::validation(
                ValidationKind::InvalidCard,
                format!("No such card: {rank:?} of {suit:?}"),
            ));
        }
        Ok(Card { suit, rank })
    }

    pub const fn small_joker() -> Card {
        Card {
            suit: Suit::Joker,
            rank: Rank::SmallJoker,
        }
    }

    pub const fn big_joker() -> Card {
        Card {
            suit: Suit::Joker,
            rank: Rank::BigJoker,
        }
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.rank.value()
    }
}

// Hands are kept sorted by rank value, then suit (S<H<D<C).
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.rank.cmp(&other.rank) {
            std::cmp::Ordering::Equal => self.suit.cmp(&other.suit),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

//! Card tokens: two characters, rank then suit ("3S", "TH", "2C"),
//! with "SJ"/"BJ" for the small and big joker.

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

fn parse_err(s: &str) -> DomainError {
    DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"))
}

impl Card {
    /// Canonical two-character token for this card.
    pub fn token(&self) -> String {
        match self.rank {
            Rank::SmallJoker => return "SJ".to_string(),
            Rank::BigJoker => return "BJ".to_string(),
            _ => {}
        }
        let rank_char = match self.rank {
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
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::SmallJoker | Rank::BigJoker => '?',
        };
        let suit_char = match self.suit {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Joker => '?',
        };
        format!("{rank_char}{suit_char}")
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "SJ" => return Ok(Card::small_joker()),
            "BJ" => return Ok(Card::big_joker()),
            _ => {}
        }
        // "10H" is accepted as an alias for "TH"
        let (rank_part, suit_part) = match upper.len() {
            2 => upper.split_at(1),
            3 if upper.starts_with("10") => upper.split_at(2),
            _ => return Err(parse_err(s)),
        };
        let rank = match rank_part {
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            "2" => Rank::Two,
            _ => return Err(parse_err(s)),
        };
        let suit = match suit_part {
            "S" => Suit::Spades,
            "H" => Suit::Hearts,
            "D" => Suit::Diamonds,
            "C" => Suit::Clubs,
            _ => return Err(parse_err(s)),
        };
        Ok(Card { suit, rank })
    }
}

/// Non-panicking helper to parse card tokens into Card instances.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}

/// Parse a comma- and/or whitespace-separated list ("3S, 3H 4D").
pub fn parse_card_list(input: &str) -> Result<Vec<Card>, DomainError> {
    try_parse_cards(
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty()),
    )
}

/// Render cards as a comma-separated token list.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::token)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
pub fn parse_cards(tokens: &[&str]) -> Vec<Card> {
    try_parse_cards(tokens.iter().copied()).expect("hardcoded valid card tokens")
}

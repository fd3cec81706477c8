//! Serialization and deserialization for card types

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::{Card, Rank, Suit};

impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match self {
            Suit::Spades => "SPADES",
            Suit::Hearts => "HEARTS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Clubs => "CLUBS",
            Suit::Joker => "JOKER",
        };
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "SPADES" => Ok(Suit::Spades),
            "HEARTS" => Ok(Suit::Hearts),
            "DIAMONDS" => Ok(Suit::Diamonds),
            "CLUBS" => Ok(Suit::Clubs),
            "JOKER" => Ok(Suit::Joker),
            _ => Err(serde::de::Error::custom(format!("Invalid suit: {s}"))),
        }
    }
}

// Ranks travel as their integer value (3..=17)
impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = u8::deserialize(deserializer)?;
        Rank::from_value(v).ok_or_else(|| serde::de::Error::custom(format!("Invalid rank: {v}")))
    }
}

// Card serde (compact token like "AS", "TD", "SJ")
impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.token())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Card>()
            .map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let cases = [
            (Card { suit: Suit::Spades, rank: Rank::Ace }, "AS"),
            (Card { suit: Suit::Diamonds, rank: Rank::Ten }, "TD"),
            (Card { suit: Suit::Clubs, rank: Rank::Two }, "2C"),
            (Card::small_joker(), "SJ"),
            (Card::big_joker(), "BJ"),
        ];
        for (card, token) in cases {
            let s = serde_json::to_string(&card).unwrap();
            assert_eq!(s, format!("\"{token}\""));
            let decoded: Card = serde_json::from_str(&s).unwrap();
            assert_eq!(decoded, card);
        }
    }

    #[test]
    fn suit_and_rank_serde() {
        assert_eq!(serde_json::to_string(&Suit::Joker).unwrap(), "\"JOKER\"");
        assert_eq!(serde_json::from_str::<Suit>("\"HEARTS\"").unwrap(), Suit::Hearts);
        assert_eq!(serde_json::to_string(&Rank::Two).unwrap(), "15");
        assert_eq!(serde_json::from_str::<Rank>("17").unwrap(), Rank::BigJoker);
        assert!(serde_json::from_str::<Rank>("18").is_err());
    }

    #[test]
    fn rejects_invalid_tokens() {
        assert!(serde_json::from_str::<Card>("\"ZZ\"").is_err());
        assert!(serde_json::from_str::<Card>("\"\"").is_err());
    }
}

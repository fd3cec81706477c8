pub const SEATS: usize = 3;
pub const DECK_SIZE: usize = 54;
pub const HAND_SIZE: usize = 17;
pub const BOTTOM_SIZE: usize = 3;
pub const LANDLORD_HAND_SIZE: usize = HAND_SIZE + BOTTOM_SIZE;

/// Automatic reshuffles before a landlord is forced.
pub const DEFAULT_MAX_RESHUFFLES: u8 = 3;

/// Hand sizes at which players are warned about an opponent closing out.
pub const CARD_COUNT_WARNING_AT: [usize; 2] = [2, 1];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deal_layout_accounts_for_every_card() {
        assert_eq!(SEATS * HAND_SIZE + BOTTOM_SIZE, DECK_SIZE);
        assert_eq!(LANDLORD_HAND_SIZE, 20);
    }
}

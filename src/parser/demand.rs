/// Maps a value-list status cell ("Red good", "purple", "blue bad") to a demand score in 1..=10.
///
/// The rarity colour sets the base (covert/gold/red 8, classified/pink 6, restricted/purple 4,
/// mil-spec/blue 2, otherwise 5); "good"/"high" adds 2 and "bad"/"low" subtracts 2.
pub fn status_to_demand(status: &str) -> u8 {
    let status = status.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| status.contains(w));

    let base: i32 = if mentions(&["red", "gold", "covert"]) {
        8
    } else if mentions(&["pink", "classified"]) {
        6
    } else if mentions(&["purple", "restricted"]) {
        4
    } else if mentions(&["blue", "mil-spec"]) {
        2
    } else {
        5
    };

    let adjusted = if mentions(&["good", "high"]) {
        base + 2
    } else if mentions(&["bad", "low"]) {
        base - 2
    } else {
        base
    };

    adjusted.clamp(1, 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_sets_the_base() {
        assert_eq!(status_to_demand("Covert"), 8);
        assert_eq!(status_to_demand("pink"), 6);
        assert_eq!(status_to_demand("Restricted"), 4);
        assert_eq!(status_to_demand("mil-spec"), 2);
        assert_eq!(status_to_demand(""), 5);
    }

    #[test]
    fn qualifiers_shift_and_clamp() {
        assert_eq!(status_to_demand("Red good"), 10);
        assert_eq!(status_to_demand("gold HIGH"), 10);
        assert_eq!(status_to_demand("purple bad"), 2);
        assert_eq!(status_to_demand("blue low"), 1);
        assert_eq!(status_to_demand("decent"), 5);
    }
}

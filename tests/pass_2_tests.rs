//! Validation tests for Pass 2: Clef / Time-Signature Inference

use score2midi::bitmap::Bitmap;
use score2midi::config::Config;
use score2midi::notation::Clef;
use score2midi::passes::pass_2;
use score2midi::raster::ScoreState;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_treble_four_four() {
        let config = Config::default();
        let bitmap = Bitmap::blank(50, 50);
        let mut state = ScoreState::from_test_bitmap(bitmap, &config);

        pass_2::run(&mut state, &config).unwrap();

        assert_eq!(state.metadata.clef, Clef::Treble);
        assert_eq!(state.metadata.time_signature, "4/4");
    }

    #[test]
    fn test_configured_clef_is_used() {
        let mut config = Config::default();
        config.clef.default_clef = "bass".to_string();
        config.clef.default_time_signature = "3/4".to_string();
        let bitmap = Bitmap::blank(50, 50);
        let mut state = ScoreState::from_test_bitmap(bitmap, &config);

        pass_2::run(&mut state, &config).unwrap();

        assert_eq!(state.metadata.clef, Clef::Bass);
        assert_eq!(state.metadata.time_signature, "3/4");
    }

    #[test]
    fn test_unknown_clef_falls_back_to_treble() {
        let mut config = Config::default();
        config.clef.default_clef = "tenor".to_string();
        let bitmap = Bitmap::blank(50, 50);
        let mut state = ScoreState::from_test_bitmap(bitmap, &config);

        pass_2::run(&mut state, &config).unwrap();

        assert_eq!(state.metadata.clef, Clef::Treble);
    }

    #[test]
    fn test_clef_parsing() {
        assert_eq!(Clef::parse("treble"), Some(Clef::Treble));
        assert_eq!(Clef::parse("bass"), Some(Clef::Bass));
        assert_eq!(Clef::parse("alto"), Some(Clef::Alto));
        assert_eq!(Clef::parse("Treble"), None);
        assert_eq!(Clef::parse(""), None);
    }

    #[test]
    fn test_clef_vocabularies() {
        // Staff positions plus both ledger sequences
        assert_eq!(Clef::Treble.vocabulary().count(), 5 + 4 + 7 + 7);
        assert_eq!(Clef::Bass.vocabulary().count(), 5 + 4 + 7 + 7);
        assert_eq!(Clef::Alto.vocabulary().count(), 5 + 4 + 5 + 5);

        assert!(Clef::Treble.contains("E4"));
        assert!(Clef::Treble.contains("F6"));
        assert!(Clef::Treble.contains("E3"));
        assert!(!Clef::Treble.contains("C8"));

        assert!(Clef::Bass.contains("G2"));
        assert!(!Clef::Bass.contains("F5"));

        assert!(Clef::Alto.contains("A3"));
        assert!(!Clef::Alto.contains("A5"));
    }
}

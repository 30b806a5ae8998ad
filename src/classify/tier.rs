use serde::{Deserialize, Serialize};

/// Ranking power of a combo given where its words sit in the metadata.
///
/// Declaration order is strongest first and `score` never increases along
/// it, so the derived `Ord` doubles as the tie-break between equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrengthTier {
    TitleConsecutive,
    TitleNonConsecutive,
    TitleKeywordsCross,
    TitleSubtitleCross,
    KeywordsConsecutive,
    SubtitleConsecutive,
    KeywordsSubtitleCross,
    KeywordsNonConsecutive,
    SubtitleNonConsecutive,
    ThreeWayCross,
    Missing,
}

impl StrengthTier {
    pub const ALL: [StrengthTier; 11] = [
        StrengthTier::TitleConsecutive,
        StrengthTier::TitleNonConsecutive,
        StrengthTier::TitleKeywordsCross,
        StrengthTier::TitleSubtitleCross,
        StrengthTier::KeywordsConsecutive,
        StrengthTier::SubtitleConsecutive,
        StrengthTier::KeywordsSubtitleCross,
        StrengthTier::KeywordsNonConsecutive,
        StrengthTier::SubtitleNonConsecutive,
        StrengthTier::ThreeWayCross,
        StrengthTier::Missing,
    ];

    pub fn score(self) -> u8 {
        match self {
            StrengthTier::TitleConsecutive => 100,
            StrengthTier::TitleNonConsecutive => 85,
            StrengthTier::TitleKeywordsCross => 70,
            StrengthTier::TitleSubtitleCross => 70,
            StrengthTier::KeywordsConsecutive => 50,
            StrengthTier::SubtitleConsecutive => 50,
            StrengthTier::KeywordsSubtitleCross => 35,
            StrengthTier::KeywordsNonConsecutive => 30,
            StrengthTier::SubtitleNonConsecutive => 30,
            StrengthTier::ThreeWayCross => 20,
            StrengthTier::Missing => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrengthTier::TitleConsecutive => "TITLE_CONSECUTIVE",
            StrengthTier::TitleNonConsecutive => "TITLE_NON_CONSECUTIVE",
            StrengthTier::TitleKeywordsCross => "TITLE_KEYWORDS_CROSS",
            StrengthTier::TitleSubtitleCross => "TITLE_SUBTITLE_CROSS",
            StrengthTier::KeywordsConsecutive => "KEYWORDS_CONSECUTIVE",
            StrengthTier::SubtitleConsecutive => "SUBTITLE_CONSECUTIVE",
            StrengthTier::KeywordsSubtitleCross => "KEYWORDS_SUBTITLE_CROSS",
            StrengthTier::KeywordsNonConsecutive => "KEYWORDS_NON_CONSECUTIVE",
            StrengthTier::SubtitleNonConsecutive => "SUBTITLE_NON_CONSECUTIVE",
            StrengthTier::ThreeWayCross => "THREE_WAY_CROSS",
            StrengthTier::Missing => "MISSING",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let wanted = value.trim().replace(&['-', ' '][..], "_").to_uppercase();
        Self::ALL.into_iter().find(|tier| tier.label() == wanted)
    }

    pub fn is_missing(self) -> bool {
        matches!(self, StrengthTier::Missing)
    }

    /// Tiers whose words are all present but not adjacent.
    pub fn is_non_consecutive(self) -> bool {
        matches!(
            self,
            StrengthTier::TitleNonConsecutive
                | StrengthTier::KeywordsNonConsecutive
                | StrengthTier::SubtitleNonConsecutive
        )
    }
}

impl std::fmt::Display for StrengthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

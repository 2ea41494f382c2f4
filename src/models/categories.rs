//! Categorical value types
//!
//! Each categorical is an enum whose discriminant is the survey code it is
//! encoded from. Label tables are kept next to the enum so the persisted
//! dictionary order always matches the declared level order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Party grouping derived from the 7-point party identification scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// Codes 1-3
    Democrat,
    /// Codes 5-7
    Republican,
}

impl Party {
    /// All levels in dictionary order
    pub const ALL: [Self; 2] = [Self::Democrat, Self::Republican];

    /// Label used in the persisted table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Democrat => "Democrat",
            Self::Republican => "Republican",
        }
    }

    /// Zero-based position in [`Party::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Self-reported difficulty of voting.
///
/// Ordered: `Not < Little < Moderate < Very < Extreme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    /// Not difficult at all
    Not = 1,
    /// A little difficult
    Little = 2,
    /// Moderately difficult
    Moderate = 3,
    /// Very difficult
    Very = 4,
    /// Extremely difficult
    Extreme = 5,
}

impl DifficultyLevel {
    /// All levels in ascending order
    pub const ALL: [Self; 5] = [
        Self::Not,
        Self::Little,
        Self::Moderate,
        Self::Very,
        Self::Extreme,
    ];

    /// Smallest valid code
    pub const MIN_CODE: i32 = 1;
    /// Largest valid code
    pub const MAX_CODE: i32 = 5;

    /// Convert a cleaned code (1-5) to a level, `None` when out of range
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Not),
            2 => Some(Self::Little),
            3 => Some(Self::Moderate),
            4 => Some(Self::Very),
            5 => Some(Self::Extreme),
            _ => None,
        }
    }

    /// The survey code of this level
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Label used in the persisted table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Little => "little",
            Self::Moderate => "moderate",
            Self::Very => "very",
            Self::Extreme => "extreme",
        }
    }

    /// Zero-based position in [`DifficultyLevel::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Main reason given for not voting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NonVoteReason {
    Forgot = 1,
    NotInterested = 2,
    TooBusy = 3,
    Candidates = 4,
    NotRegistered = 5,
    LackedCorrectId = 6,
    OutOfTown = 7,
    SickOrDisabled = 8,
    Transportation = 9,
    BadWeather = 10,
    PollLineTooLong = 11,
    DeniedAtPolls = 12,
    AbsenteeBallotProblem = 13,
    DidNotKnowWhereToVote = 14,
    LackedInformationAboutChoices = 15,
    Other = 16,
}

impl NonVoteReason {
    /// All reasons in code order
    pub const ALL: [Self; 16] = [
        Self::Forgot,
        Self::NotInterested,
        Self::TooBusy,
        Self::Candidates,
        Self::NotRegistered,
        Self::LackedCorrectId,
        Self::OutOfTown,
        Self::SickOrDisabled,
        Self::Transportation,
        Self::BadWeather,
        Self::PollLineTooLong,
        Self::DeniedAtPolls,
        Self::AbsenteeBallotProblem,
        Self::DidNotKnowWhereToVote,
        Self::LackedInformationAboutChoices,
        Self::Other,
    ];

    /// Smallest valid code
    pub const MIN_CODE: i32 = 1;
    /// Largest valid code
    pub const MAX_CODE: i32 = 16;

    /// Convert a cleaned code (1-16) to a reason, `None` when out of range
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        code.checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// The survey code of this reason
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Label used in the persisted table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Forgot => "forgot",
            Self::NotInterested => "not interested",
            Self::TooBusy => "too busy",
            Self::Candidates => "candidates",
            Self::NotRegistered => "not registered",
            Self::LackedCorrectId => "lacked correct id",
            Self::OutOfTown => "out of town",
            Self::SickOrDisabled => "sick or disabled",
            Self::Transportation => "transportation",
            Self::BadWeather => "bad weather",
            Self::PollLineTooLong => "poll line too long",
            Self::DeniedAtPolls => "denied at polls",
            Self::AbsenteeBallotProblem => "absentee ballot problem",
            Self::DidNotKnowWhereToVote => "did not know where to vote",
            Self::LackedInformationAboutChoices => "lacked information about choices",
            Self::Other => "other",
        }
    }

    /// Zero-based position in [`NonVoteReason::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for NonVoteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which rule classified a non-voter as a presumed voter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresumedBasis {
    /// Not registered but intended to register
    RegistrationFailure,
    /// A reason equivalent to having had difficulty voting (codes 6-13)
    DifficultyEquivalentReason,
}

pub mod extract;
pub mod fuzzy;
pub mod matcher;
pub mod synonyms;
pub mod widget;

pub use extract::{Framework, SelectOption, detect_framework, is_select_like};
pub use matcher::{FillOutcome, MatchKind, OptionMatch, fill_select_like, match_option};
pub use synonyms::{CANONICAL, preference_groups, preference_list, synonyms_for};

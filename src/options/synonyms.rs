//! Canonical answer keys and the phrasings forms use for them.

/// Logical answer key to the option phrasings that express it, most
/// specific last. Lookups are case-insensitive on the key.
pub const CANONICAL: &[(&str, &[&str])] = &[
    (
        "protected_veteran",
        &[
            "yes",
            "true",
            "i am a protected veteran",
            "veteran with protected status",
            "i identify as one or more classes of protected veteran",
        ],
    ),
    (
        "not_veteran",
        &[
            "no",
            "false",
            "i am not a protected veteran",
            "non-protected veteran",
            "not a vet",
        ],
    ),
    ("man", &["man", "male", "he", "him", "his"]),
    ("woman", &["woman", "female", "she", "her", "hers"]),
    ("heterosexual", &["heterosexual", "straight"]),
    ("homosexual", &["homosexual", "gay"]),
    ("bisexual", &["bisexual", "pansexual"]),
    (
        "disabled",
        &["yes", "disabled", "i am disabled", "i have a disability"],
    ),
    (
        "enabled",
        &["no", "not disabled", "i do not have a disability"],
    ),
    (
        "us_authorized",
        &["yes", "true", "i am authorized to work in the us"],
    ),
    (
        "no_authorization",
        &["no", "false", "i am not authorized to work in the us"],
    ),
    (
        "prefer_not_to_say",
        &[
            "prefer not to say",
            "i do not wish to answer",
            "no answer",
            "decline to state",
        ],
    ),
    ("true", &["true", "yes"]),
    ("false", &["false", "no"]),
    (
        "linkedin",
        &["linkedin", "linkedin profile", "job board", "company website"],
    ),
];

/// Keyword groups for answers that forms phrase in many ways, such as
/// discovery sources.
pub const KEYWORD_GROUPS: &[(&str, &[&str])] = &[
    ("linkedin", &["linkedin", "social media", "social network"]),
    (
        "job board",
        &["job board", "job posting", "posting", "indeed", "glassdoor", "monster"],
    ),
    (
        "website",
        &["website", "company website", "company site", "corporate website"],
    ),
    ("online", &["online", "internet", "web", "digital"]),
    (
        "referral",
        &["referral", "employee referral", "friend", "referred"],
    ),
    (
        "recruiter",
        &["recruiter", "sourced", "headhunter", "directly sourced"],
    ),
    ("career fair", &["career fair", "job fair", "fair"]),
    ("agency", &["agency", "recruiting agency", "staffing"]),
    ("other", &["other", "miscellaneous"]),
];

pub fn synonyms_for(key: &str) -> Option<&'static [&'static str]> {
    let key = key.trim().to_lowercase();
    CANONICAL
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, synonyms)| *synonyms)
}

/// Candidate phrasings for a logical value, one group per `|` entry in
/// priority order.
///
/// An entry that names a canonical key expands to its synonyms, anything
/// else is kept as written. A phrasing already offered by an earlier group
/// is not repeated.
pub fn preference_groups(logical_value: &str) -> Vec<Vec<String>> {
    let mut seen: Vec<String> = Vec::new();
    let mut groups: Vec<Vec<String>> = Vec::new();
    for entry in logical_value.split('|').map(str::trim).filter(|e| !e.is_empty()) {
        let expanded: Vec<String> = match synonyms_for(entry) {
            Some(synonyms) => synonyms.iter().map(|s| s.to_string()).collect(),
            None => vec![entry.to_string()],
        };
        let mut group = Vec::new();
        for candidate in expanded {
            if !seen.iter().any(|c| c.eq_ignore_ascii_case(&candidate)) {
                seen.push(candidate.clone());
                group.push(candidate);
            }
        }
        if !group.is_empty() {
            groups.push(group);
        }
    }
    groups
}

/// Every candidate phrasing of [`preference_groups`], flattened.
pub fn preference_list(logical_value: &str) -> Vec<String> {
    preference_groups(logical_value).into_iter().flatten().collect()
}

/// Keywords of every group the target mentions.
pub fn keyword_groups_for(target: &str) -> Vec<&'static [&'static str]> {
    let target = target.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| target.contains(k)))
        .map(|(_, keywords)| *keywords)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_keys_expand_in_order() {
        assert_eq!(preference_list("man"), vec!["man", "male", "he", "him", "his"]);
    }

    #[test]
    fn pipe_separated_values_keep_priority_and_drop_repeats() {
        let list = preference_list("Asian| East Asian ||true");
        assert_eq!(list, vec!["Asian", "East Asian", "true", "yes"]);

        let list = preference_list("true|yes");
        assert_eq!(list, vec!["true", "yes"]);
    }

    #[test]
    fn unknown_values_pass_through() {
        assert_eq!(preference_list("Canada"), vec!["Canada"]);
        assert!(preference_list("  ").is_empty());
    }

    #[test]
    fn each_pipe_entry_is_its_own_group() {
        let groups = preference_groups("job board|linkedin|other");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], vec!["job board".to_string()]);
        // "job board" already came first, so the linkedin expansion drops it
        assert!(!groups[1].iter().any(|c| c == "job board"));
        assert_eq!(groups[2], vec!["other".to_string()]);
    }

    #[test]
    fn keyword_groups_follow_the_target() {
        let groups = keyword_groups_for("Job Board");
        assert_eq!(groups.len(), 1);
        assert!(groups[0].contains(&"indeed"));
    }
}

//! Phrase tables for the field classifier.
//!
//! Every table is matched against lowercased text, once as written and once
//! with `_` and `-` turned into spaces, so `current_city` and `current city`
//! both hit `\bcity\b`. Short tokens carry word boundaries so they do not
//! fire inside longer words.

use once_cell::sync::Lazy;

use crate::pattern::{Pattern, compile};

type Table = Lazy<Vec<Pattern>>;

// ============================================================================
// Identity
// ============================================================================

pub static NAME: Table = Lazy::new(|| {
    compile(&[
        r"^fname|fir?st?[\s_-]?name$",
        r"^lname|la?st?[\s_-]?name$",
        r"^full[\s_-]?name$|^legal[\s_-]?name$",
        r"^middle[\s_-]?(name|initial)$|^mi$",
        r"^name$|^given[\s_-]?name$|^family[\s_-]?name$|^surname$",
        r"^name[\s_-]?(prefix|suffix)$",
        r"^(your|preferred)[\s_-]name$",
        r"enter.+name|name.+enter",
    ])
});

pub static NAME_AUTOCOMPLETE: Table = Lazy::new(|| {
    compile(&[
        r"^name$",
        r"honorific-prefix",
        r"given-name",
        r"additional-name",
        r"family-name",
        r"honorific-suffix",
        r"nickname",
    ])
});

/// Organisation names look like personal names to the name table.
pub static COMPANY_NAME: Table = Lazy::new(|| {
    compile(&[
        r"^(employer|company|organization|org|workplace)$",
        r"^(employer|company|organization|org|workplace)[\s_-]?name$",
        r"^work[\s_-]?(employer|company|org|organization)$",
        r"(company|employer|organization|business)[\s_-]name",
    ])
});

pub static EMAIL: Table = Lazy::new(|| {
    compile(&[
        r"email",
        r"e-mail",
        r"username",
        r"login",
        r"^e[\s-]?mail$",
        r"^mail$",
    ])
});

pub static EMAIL_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"email"]));

pub static PHONE: Table = Lazy::new(|| {
    compile(&[
        r"phone",
        r"telephone",
        r"mobile",
        r"\bcell\b",
        r"contact number",
        r"\btel\b",
    ])
});

pub static PHONE_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"^tel\b", r"^tel-"]));

pub static PRONOUNS: Table = Lazy::new(|| compile(&[r"\bpronouns?\b"]));

pub static PRONOUNS_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"pronoun"]));

pub static GENDER: Table = Lazy::new(|| compile(&[r"\bgender\b", r"\bsex\b", r"gender identity"]));

pub static GENDER_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"^sex$", r"gender"]));

// ============================================================================
// Links
// ============================================================================

pub static LINKEDIN: Table = Lazy::new(|| {
    compile(&[
        r"^linkedin[\s_-]?(profile|url|link|page)?[\s_-]?(url|link)?$",
        r"linkedin[\s_-](profile|url|link)",
        r"enter.+linkedin|linkedin.+enter",
    ])
});

pub static TWITTER: Table = Lazy::new(|| {
    compile(&[
        r"^twitter[\s_-]?(url|handle|profile|link|username|user|account|id)?$",
        r"enter.+twitter|twitter.+enter",
    ])
});

pub static TWITTER_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"twitter"]));

pub static GITHUB: Table = Lazy::new(|| {
    compile(&[
        r"^github[\s_-]?(url|handle|profile|link|username|user|account|id)?$",
        r"enter.+github|github.+enter",
    ])
});

pub static GITHUB_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"github"]));

pub static OTHER_WEBSITE: Table = Lazy::new(|| {
    compile(&[
        r"^(other|secondary|alternate|additional)[\s-]?(website|site|url|portfolio)$",
        r"\b(other|secondary|alternate|additional) (website|site|url|portfolio)\b",
    ])
});

pub static WEBSITE: Table = Lazy::new(|| {
    compile(&[
        r"^(website|web[\s-]?site|site|url|webpage|web[\s-]?page|homepage|portfolio)$",
        r"^(personal|portfolio)[\s-]?(website|site|url)$",
        r"^(company|business)[\s-]?(website|site|url)$",
        r"^(personal )?(website|site|portfolio) (url|link)$",
        r"\bhomepage\b",
        r"enter.+(website|homepage|portfolio)",
    ])
});

pub static WEBSITE_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"^url$", r"website", r"homepage"]));

// ============================================================================
// Voluntary self-identification
// ============================================================================

pub static VETERAN: Table = Lazy::new(|| {
    compile(&[
        r"veteran",
        r"military",
        r"armed forces",
        r"service status",
    ])
});

pub static VETERAN_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"veteran", r"military"]));

pub static HISPANIC_LATINO: Table =
    Lazy::new(|| compile(&[r"hispanic", r"latin[oax]", r"latine"]));

pub static RACE_ETHNICITY: Table = Lazy::new(|| {
    compile(&[
        r"\brace\b",
        r"ethnic",
        r"racial",
        r"demographic",
        r"(ethnic|racial) origin",
    ])
});

pub static RACE_ETHNICITY_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"\brace\b", r"ethnic"]));

pub static DISABILITY: Table = Lazy::new(|| {
    compile(&[
        r"disabilit",
        r"disabled",
        r"handicap",
        r"\bada\b",
        r"accommodation",
        r"assistance needed",
    ])
});

pub static DISABILITY_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"disabilit", r"handicap"]));

// ============================================================================
// Work eligibility
// ============================================================================

pub static SPONSORSHIP: Table = Lazy::new(|| {
    compile(&[
        r"sponsor",
        r"\bvisa\b",
        r"h[\s_-]?1[\s_-]?b",
        r"\bopt (status|extension)\b|\bstem opt\b|^opt$",
        r"(require|need)\w* immigration",
        r"immigration (sponsorship|assistance|support|status)",
        r"temporary work authori[sz]ation",
    ])
});

/// Phrasing that asserts existing, unconditional eligibility.
pub static SPONSORSHIP_EXCLUDE: Table = Lazy::new(|| {
    compile(&[
        r"currently authori[sz]ed",
        r"presently authori[sz]ed",
        r"authori[sz]ed.*indefinitely",
        r"permanent(ly)? authori[sz]",
        r"indefinite authori[sz]ation",
        r"citizen",
        r"permanent resident",
        r"green card",
    ])
});

pub static AUTHORIZATION: Table = Lazy::new(|| {
    compile(&[
        r"authori[sz]ed to work",
        r"authori[sz]ation to work",
        r"work authori[sz]ation",
        r"(legal|employment) authori[sz]ation",
        r"authori[sz]ed work",
        r"right to work",
        r"eligible to work",
        r"permitted to work",
        r"work permit",
        r"employment eligibility",
    ])
});

// ============================================================================
// Employment
// ============================================================================

pub static SALARY: Table = Lazy::new(|| {
    compile(&[
        r"\bsalary\b",
        r"compensation",
        r"\b(pay|wage)s? (expectations?|requirements?|range)\b",
        r"hourly rate",
    ])
});

pub static SALARY_AUTOCOMPLETE: Table =
    Lazy::new(|| compile(&[r"salary", r"compensation", r"wage", r"^pay$"]));

pub static POSITION_DISCOVERY: Table = Lazy::new(|| {
    compile(&[
        r"(how|where) (did|do) you (find|hear|learn|discover|come across)",
        r"how you (found|heard|learned|discovered)",
        r"(learned|found|heard|discovered) (about )?(this|the|our) (position|job|role|opportunity)",
        r"\b(referral|job|application|position|discovery|posting) source\b",
        r"source of (the |this )?(position|job|application|opportunity)",
        r"source (led|brought) you",
    ])
});

pub static REFERRAL: Table = Lazy::new(|| {
    compile(&[
        r"\breferr",
        r"who referred",
        r"employee reference",
        r"list the (full name of the )?employee",
        r"employee'?s full name",
        r"current employee of",
    ])
});

pub static REFERRAL_EXCLUDE: Table = Lazy::new(|| {
    compile(&[
        r"how did you (find|hear)",
        r"reference name",
        r"emergency contact",
    ])
});

pub static CURRENT_COMPANY: Table = Lazy::new(|| {
    compile(&[
        r"^((current|present|most recent) )?(company|employer)( name)?$",
        r"(current|present|most recent) (company|employer)",
        r"^employer",
        r"^(organization|org)( name)?$",
        r"enter.+(employer|company)",
    ])
});

pub static CURRENT_COMPANY_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"^organization$"]));

pub static JOB_TITLE: Table = Lazy::new(|| {
    compile(&[
        r"^(your )?((current|present) )?((job|position|work|employment|professional) )?(title|role|position)$",
        r"enter your .*\b(title|role|position)$",
        r"what is your (current )?(job )?(title|role|position)",
    ])
});

pub static JOB_TITLE_AUTOCOMPLETE: Table = Lazy::new(|| {
    compile(&[
        r"^((current|job|organization) )?(title|role|position)$",
    ])
});

pub static JOB_TITLE_EXCLUDE: Table = Lazy::new(|| {
    compile(&[
        r"(page|document|website|article|book) title",
        r"^(mr|mrs|ms|dr)\.?$",
        r"honorific",
    ])
});

// ============================================================================
// Education
// ============================================================================

pub static SCHOOL: Table = Lazy::new(|| {
    compile(&[
        r"\bschool\b",
        r"universit",
        r"college",
        r"institution",
        r"alma mater",
    ])
});

pub static DEGREE: Table = Lazy::new(|| {
    compile(&[
        r"\bdegree\b",
        r"education level",
        r"level of education",
        r"qualification",
    ])
});

pub static DISCIPLINE: Table = Lazy::new(|| {
    compile(&[
        r"\bdiscipline\b",
        r"\bmajor\b",
        r"field of study",
        r"area of study",
        r"concentration",
    ])
});

pub static END_DATE_YEAR: Table = Lazy::new(|| {
    compile(&[
        r"end date year",
        r"\bend year\b",
        r"graduation (year|date)",
        r"year of graduation",
        r"(end|completion) date",
    ])
});

// ============================================================================
// Location
// ============================================================================

pub static COUNTRY: Table = Lazy::new(|| {
    compile(&[
        r"\bcountry\b",
        r"\bnation\b",
        r"nationality",
        r"location \(country\)",
    ])
});

pub static COUNTRY_AUTOCOMPLETE: Table = Lazy::new(|| compile(&[r"country"]));

pub static LOCATION: Table = Lazy::new(|| {
    compile(&[
        r"\bcity\b",
        r"\bstate\b",
        r"province",
        r"\bregion\b",
        r"postal",
        r"\bzip\b",
        r"postcode",
        r"address",
        r"street",
        r"\blocation\b",
        r"where do you live",
        r"\bresiden(ce|t)\b",
    ])
});

pub static LOCATION_AUTOCOMPLETE: Table = Lazy::new(|| {
    compile(&[
        r"address",
        r"city",
        r"postal",
        r"street",
        r"locality",
        r"region",
        r"level[12]",
    ])
});

pub static LOCATION_EXCLUDE: Table = Lazy::new(|| compile(&[r"e-?mail address"]));

// ============================================================================
// Documents
// ============================================================================

pub static RESUME: Table = Lazy::new(|| {
    compile(&[
        r"resume",
        r"résumé",
        r"curriculum[\s-]?vitae",
        r"\bcv\b",
        r"upload",
        r"attach",
        r"browse",
        r"select file",
    ])
});

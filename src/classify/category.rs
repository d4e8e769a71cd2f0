use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of semantic field kinds. `Unknown` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Name,
    Email,
    Phone,
    LinkedinProfile,
    TwitterUrl,
    GithubUrl,
    OtherWebsite,
    Website,
    Pronouns,
    Gender,
    Veteran,
    HispanicLatino,
    RaceEthnicity,
    Disability,
    Sponsorship,
    Authorization,
    SalaryExpectations,
    PositionDiscoverySource,
    ReferralSource,
    CurrentCompany,
    CurrentJobTitle,
    School,
    Degree,
    Discipline,
    EndDateYear,
    Country,
    Location,
    ResumeUpload,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Name => "name",
            Category::Email => "email",
            Category::Phone => "phone",
            Category::LinkedinProfile => "linkedin_profile",
            Category::TwitterUrl => "twitter_url",
            Category::GithubUrl => "github_url",
            Category::OtherWebsite => "other_website",
            Category::Website => "website",
            Category::Pronouns => "pronouns",
            Category::Gender => "gender",
            Category::Veteran => "veteran",
            Category::HispanicLatino => "hispanic_latino",
            Category::RaceEthnicity => "race_ethnicity",
            Category::Disability => "disability",
            Category::Sponsorship => "sponsorship",
            Category::Authorization => "authorization",
            Category::SalaryExpectations => "salary_expectations",
            Category::PositionDiscoverySource => "position_discovery_source",
            Category::ReferralSource => "referral_source",
            Category::CurrentCompany => "current_company",
            Category::CurrentJobTitle => "current_job_title",
            Category::School => "school",
            Category::Degree => "degree",
            Category::Discipline => "discipline",
            Category::EndDateYear => "end_date_year",
            Category::Country => "country",
            Category::Location => "location",
            Category::ResumeUpload => "resume_upload",
            Category::Unknown => "unknown",
        }
    }

    /// Categories whose stored value is a plain enumerated answer that a
    /// checkbox can only express as ticked or not.
    pub fn is_boolean_answer(&self) -> bool {
        matches!(
            self,
            Category::Gender
                | Category::Veteran
                | Category::RaceEthnicity
                | Category::HispanicLatino
                | Category::Disability
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

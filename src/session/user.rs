//! Signed-in user model and the partial-update record applied to it.

use serde::{Deserialize, Serialize};

/// Account role, fixed at sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Individual,
    NgoAdmin,
    Donor,
    Volunteer,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Individual, Role::NgoAdmin, Role::Donor, Role::Volunteer]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Individual => "Individual",
            Role::NgoAdmin => "NGO Administrator",
            Role::Donor => "Donor",
            Role::Volunteer => "Volunteer",
        }
    }
}

/// Organization affiliation of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    /// The user's title within the organization (e.g., "Programme Director")
    pub role_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub organization: Option<Organization>,
    /// Trust badge, display only
    #[serde(default)]
    pub verified: bool,
    // ─── Profile extension ─────────────────────────────────────────────────────
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
    /// Avatar reference (URL or asset key)
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    /// Initials for compact header display
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Shallow-merge `patch` into this user. Only `Some` fields are replaced.
    pub fn apply(&mut self, patch: UserPatch) {
        let UserPatch {
            email,
            first_name,
            last_name,
            display_name,
            role,
            organization,
            verified,
            location,
            bio,
            skills,
            phone,
            linkedin,
            twitter,
            website,
            pronouns,
            avatar,
        } = patch;

        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = first_name {
            self.first_name = v;
        }
        if let Some(v) = last_name {
            self.last_name = v;
        }
        if let Some(v) = display_name {
            self.display_name = v;
        }
        if let Some(v) = role {
            self.role = v;
        }
        if let Some(v) = organization {
            self.organization = Some(v);
        }
        if let Some(v) = verified {
            self.verified = v;
        }
        if let Some(v) = location {
            self.location = Some(v);
        }
        if let Some(v) = bio {
            self.bio = Some(v);
        }
        if let Some(v) = skills {
            self.skills = v;
        }
        if let Some(v) = phone {
            self.phone = Some(v);
        }
        if let Some(v) = linkedin {
            self.linkedin = Some(v);
        }
        if let Some(v) = twitter {
            self.twitter = Some(v);
        }
        if let Some(v) = website {
            self.website = Some(v);
        }
        if let Some(v) = pronouns {
            self.pronouns = Some(v);
        }
        if let Some(v) = avatar {
            self.avatar = Some(v);
        }
    }
}

/// Partial user record for `update_user`. The id is never patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub organization: Option<Organization>,
    pub verified: Option<bool>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
    pub pronouns: Option<String>,
    pub avatar: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == UserPatch::default()
    }
}

/// Fixed profile standing in for a backend-issued one.
///
/// Every sign-in and every startup reconstruction starts from this record
/// and overlays the email.
pub fn mock_profile(email: &str) -> User {
    User {
        id: "usr_7f3a9c21".to_string(),
        email: email.to_string(),
        first_name: "Amara".to_string(),
        last_name: "Nwosu".to_string(),
        display_name: "Amara Nwosu".to_string(),
        role: Role::NgoAdmin,
        organization: Some(Organization {
            name: "Kijani Community Trust".to_string(),
            role_title: "Programme Director".to_string(),
        }),
        verified: true,
        location: Some("Nairobi, Kenya".to_string()),
        bio: Some(
            "Coordinates community health and digital literacy programmes across three counties."
                .to_string(),
        ),
        skills: vec![
            "Programme management".to_string(),
            "Grant writing".to_string(),
            "Community outreach".to_string(),
        ],
        phone: None,
        linkedin: None,
        twitter: None,
        website: Some("https://kijani.example.org".to_string()),
        pronouns: None,
        avatar: None,
    }
}

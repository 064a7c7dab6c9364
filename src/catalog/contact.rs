use super::{non_blank, CatalogError};
use crate::record::{GroupKey, NewRecord, OrderedRecord, RecordPatch};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Job title shown when a contact has none.
pub const DEFAULT_JOB_TITLE: &str = "Legal Specialist";

#[expect(
    clippy::expect_used,
    reason = "Regex literal is compile-time constant and cannot fail"
)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX is a valid regex literal")
});

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

const EMAIL: &str = "email";
const JOB_TITLE: &str = "jobTitle";
const PHOTO_URL: &str = "photoUrl";
const LINKEDIN_URL: &str = "linkedinUrl";
const INSTAGRAM_URL: &str = "instagramUrl";
const BIO: &str = "bio";
const SERVICES_LINK: &str = "servicesLink";
const SERVICES_DESCRIPTION: &str = "servicesDescription";

/// Contact form input. Optional fields left blank are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub bio: Option<String>,
    pub services_link: Option<String>,
    pub services_description: Option<String>,
    pub active: bool,
}

struct Normalized {
    name: String,
    email: String,
    fields: Vec<(&'static str, Option<String>)>,
}

impl ContactDraft {
    #[must_use]
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            active: true,
            ..Self::default()
        }
    }

    fn normalize(&self) -> Result<Normalized, CatalogError> {
        let name = non_blank(Some(self.name.as_str())).ok_or(CatalogError::NameRequired)?;
        let email = non_blank(Some(self.email.as_str()))
            .ok_or(CatalogError::EmailRequired)?
            .to_lowercase();
        if !is_valid_email(&email) {
            return Err(CatalogError::InvalidEmail(email));
        }
        let job_title = non_blank(self.job_title.as_deref())
            .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string());
        let fields = vec![
            (JOB_TITLE, Some(job_title)),
            (PHOTO_URL, non_blank(self.photo_url.as_deref())),
            (LINKEDIN_URL, non_blank(self.linkedin_url.as_deref())),
            (INSTAGRAM_URL, non_blank(self.instagram_url.as_deref())),
            (BIO, non_blank(self.bio.as_deref())),
            (SERVICES_LINK, non_blank(self.services_link.as_deref())),
            (SERVICES_DESCRIPTION, non_blank(self.services_description.as_deref())),
        ];
        Ok(Normalized {
            name,
            email,
            fields,
        })
    }

    /// Creation input keyed by the lowercased email.
    pub fn into_new_record(self) -> Result<NewRecord, CatalogError> {
        let normalized = self.normalize()?;
        let mut record = NewRecord::new(GroupKey::contacts(), normalized.name)
            .with_key(&normalized.email)
            .with_active(self.active)
            .with_field(EMAIL, normalized.email);
        for (field, value) in normalized.fields {
            if let Some(value) = value {
                record = record.with_field(field, value);
            }
        }
        Ok(record)
    }

    /// Patch replacing every contact field; blank optionals are removed.
    pub fn to_patch(&self) -> Result<RecordPatch, CatalogError> {
        let normalized = self.normalize()?;
        let mut patch = RecordPatch {
            name: Some(normalized.name),
            key: Some(normalized.email.clone()),
            active: Some(self.active),
            ..RecordPatch::default()
        };
        patch
            .fields
            .insert(EMAIL.to_string(), normalized.email.into());
        for (field, value) in normalized.fields {
            patch.fields.insert(
                field.to_string(),
                value.map_or(serde_json::Value::Null, serde_json::Value::String),
            );
        }
        Ok(patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub job_title: String,
    pub photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub bio: Option<String>,
    pub services_link: Option<String>,
    pub services_description: Option<String>,
    pub active: bool,
    pub display_order: i64,
}

impl Contact {
    pub fn from_record(record: &OrderedRecord) -> Result<Self, CatalogError> {
        if record.group != GroupKey::contacts() {
            return Err(CatalogError::WrongGroup {
                expected: GroupKey::contacts().to_string(),
                actual: record.group.to_string(),
            });
        }
        let text = |field: &str| record.field_str(field).map(str::to_string);
        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            email: text(EMAIL).unwrap_or_else(|| record.key.clone()),
            job_title: text(JOB_TITLE).unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string()),
            photo_url: text(PHOTO_URL),
            linkedin_url: text(LINKEDIN_URL),
            instagram_url: text(INSTAGRAM_URL),
            bio: text(BIO),
            services_link: text(SERVICES_LINK),
            services_description: text(SERVICES_DESCRIPTION),
            active: record.active,
            display_order: record.ordinal,
        })
    }
}

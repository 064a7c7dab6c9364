use super::{non_blank, CatalogError};
use crate::record::{normalize_key, GroupKey, NewRecord, OrderedRecord};
use crate::store::GroupSnapshot;
use chrono::NaiveDate;
use serde::Serialize;

const AUTHOR: &str = "author";
const AUTHOR_CONTACT_ID: &str = "authorContactId";
const PUBLISHED_DATE: &str = "publishedDate";
const CATEGORY_IDS: &str = "categoryIds";
const CONTENT: &str = "content";
const SUMMARY: &str = "summary";
const HIDDEN: &str = "hidden";
const DOCUMENT_TYPE_ID: &str = "documentTypeId";
const OFFICIAL_LINK: &str = "officialLink";
const IMAGE_URL: &str = "imageUrl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ArticleKind {
    /// Commentary on a legal norm, filed under a document type.
    #[serde(rename_all = "camelCase")]
    Norm {
        document_type: String,
        official_link: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Special { image_url: Option<String> },
}

impl ArticleKind {
    #[must_use]
    pub fn group(&self) -> GroupKey {
        match self {
            ArticleKind::Norm { .. } => GroupKey::articles(),
            ArticleKind::Special { .. } => GroupKey::special_articles(),
        }
    }
}

/// The lists an article points into. Categories and document types are
/// referenced by record id, so renaming one shows up on every article.
#[derive(Debug, Clone, Copy)]
pub struct ArticleRefs<'a> {
    pub categories: &'a GroupSnapshot,
    pub document_types: &'a GroupSnapshot,
    pub contacts: &'a GroupSnapshot,
}

impl ArticleRefs<'_> {
    fn category_id(&self, name: &str) -> Result<String, CatalogError> {
        active_by_key(self.categories, name)
            .ok_or_else(|| CatalogError::UnknownCategory(name.trim().to_string()))
    }

    fn document_type_id(&self, name: &str) -> Result<String, CatalogError> {
        active_by_key(self.document_types, name)
            .ok_or_else(|| CatalogError::UnknownDocumentType(name.trim().to_string()))
    }
}

fn active_by_key(snapshot: &GroupSnapshot, name: &str) -> Option<String> {
    let key = normalize_key(name);
    snapshot
        .active()
        .find(|r| r.key == key)
        .map(|r| r.id.clone())
}

/// Article form input. Categories and the document type are given by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub author: String,
    /// Team contact credited as author; overrides `author` when set.
    pub author_contact_id: Option<String>,
    pub published_date: NaiveDate,
    pub categories: Vec<String>,
    pub content: String,
    pub summary: Option<String>,
    pub hidden: bool,
    pub kind: ArticleKind,
}

impl ArticleDraft {
    pub fn into_new_record(self, refs: &ArticleRefs<'_>) -> Result<NewRecord, CatalogError> {
        let title = non_blank(Some(self.title.as_str())).ok_or(CatalogError::TitleRequired)?;
        let content = non_blank(Some(self.content.as_str())).ok_or(CatalogError::ContentRequired)?;
        if self.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(CatalogError::CategoryRequired);
        }
        let mut category_ids: Vec<String> = Vec::new();
        for name in self.categories.iter().filter(|c| !c.trim().is_empty()) {
            let id = refs.category_id(name)?;
            if !category_ids.contains(&id) {
                category_ids.push(id);
            }
        }
        let author = match self.author_contact_id.as_deref() {
            Some(contact_id) => refs
                .contacts
                .get(contact_id)
                .map(|c| c.name.clone())
                .ok_or_else(|| CatalogError::UnknownContact(contact_id.to_string()))?,
            None => non_blank(Some(self.author.as_str())).ok_or(CatalogError::AuthorRequired)?,
        };

        let group = self.kind.group();
        let mut record = NewRecord::new(group, title)
            .with_key(&uuid::Uuid::new_v4().to_string())
            .with_field(AUTHOR, author)
            .with_field(PUBLISHED_DATE, self.published_date.to_string())
            .with_field(CATEGORY_IDS, category_ids)
            .with_field(CONTENT, content)
            .with_field(HIDDEN, self.hidden);
        if let Some(contact_id) = self.author_contact_id {
            record = record.with_field(AUTHOR_CONTACT_ID, contact_id);
        }
        if let Some(summary) = non_blank(self.summary.as_deref()) {
            record = record.with_field(SUMMARY, summary);
        }
        match &self.kind {
            ArticleKind::Norm {
                document_type,
                official_link,
            } => {
                if document_type.trim().is_empty() {
                    return Err(CatalogError::DocumentTypeRequired);
                }
                record = record.with_field(DOCUMENT_TYPE_ID, refs.document_type_id(document_type)?);
                if let Some(link) = non_blank(official_link.as_deref()) {
                    record = record.with_field(OFFICIAL_LINK, link);
                }
            }
            ArticleKind::Special { image_url } => {
                if let Some(url) = non_blank(image_url.as_deref()) {
                    record = record.with_field(IMAGE_URL, url);
                }
            }
        }
        Ok(record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub author: String,
    pub author_contact_id: Option<String>,
    pub published_date: NaiveDate,
    /// Current names of the referenced categories, in list order. Deleted
    /// categories drop out.
    pub categories: Vec<String>,
    pub content: String,
    pub summary: Option<String>,
    pub hidden: bool,
    #[serde(flatten)]
    pub kind: ArticleKind,
}

impl Article {
    pub fn from_record(record: &OrderedRecord, refs: &ArticleRefs<'_>) -> Result<Self, CatalogError> {
        let is_norm = record.group == GroupKey::articles();
        if !is_norm && record.group != GroupKey::special_articles() {
            return Err(CatalogError::WrongGroup {
                expected: "articles or special_articles".to_string(),
                actual: record.group.to_string(),
            });
        }
        let invalid = |field: &str| CatalogError::InvalidField {
            id: record.id.clone(),
            field: field.to_string(),
        };
        let text = |field: &str| record.field_str(field).map(str::to_string);

        let published_date = record
            .field_str(PUBLISHED_DATE)
            .and_then(|d| d.parse::<NaiveDate>().ok())
            .ok_or_else(|| invalid(PUBLISHED_DATE))?;
        let ids: Vec<&str> = record
            .fields
            .get(CATEGORY_IDS)
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| invalid(CATEGORY_IDS))?
            .iter()
            .filter_map(serde_json::Value::as_str)
            .collect();
        let categories = refs
            .categories
            .records
            .iter()
            .filter(|c| ids.contains(&c.id.as_str()))
            .map(|c| c.name.clone())
            .collect();

        let kind = if is_norm {
            let document_type = text(DOCUMENT_TYPE_ID)
                .and_then(|id| refs.document_types.get(&id).map(|d| d.name.clone()))
                .unwrap_or_default();
            ArticleKind::Norm {
                document_type,
                official_link: text(OFFICIAL_LINK),
            }
        } else {
            ArticleKind::Special {
                image_url: text(IMAGE_URL),
            }
        };

        Ok(Self {
            id: record.id.clone(),
            title: record.name.clone(),
            author: text(AUTHOR).ok_or_else(|| invalid(AUTHOR))?,
            author_contact_id: text(AUTHOR_CONTACT_ID),
            published_date,
            categories,
            content: text(CONTENT).ok_or_else(|| invalid(CONTENT))?,
            summary: text(SUMMARY),
            hidden: record
                .fields
                .get(HIDDEN)
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            kind,
        })
    }

    /// Newest publication first, then by title.
    pub fn sort_newest_first(articles: &mut [Article]) {
        articles.sort_by(|a, b| {
            b.published_date
                .cmp(&a.published_date)
                .then_with(|| a.title.cmp(&b.title))
        });
    }
}

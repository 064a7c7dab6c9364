use super::{non_blank, CatalogError};
use crate::record::{GroupKey, NewRecord, OrderedRecord, RecordPatch};
use serde::Serialize;

/// The two flavours of configurable category share one record shape but
/// order independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Category,
    DocumentType,
}

impl CategoryKind {
    #[must_use]
    pub fn group(self) -> GroupKey {
        match self {
            CategoryKind::Category => GroupKey::category(),
            CategoryKind::DocumentType => GroupKey::document_type(),
        }
    }

    #[must_use]
    pub fn from_group(group: &GroupKey) -> Option<Self> {
        if *group == GroupKey::category() {
            Some(CategoryKind::Category)
        } else if *group == GroupKey::document_type() {
            Some(CategoryKind::DocumentType)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub active: bool,
}

impl CategoryDraft {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: true,
        }
    }

    /// Creation input keyed by the lowercased name, so names are unique per
    /// kind regardless of case.
    pub fn into_new_record(self, kind: CategoryKind) -> Result<NewRecord, CatalogError> {
        let name = non_blank(Some(self.name.as_str())).ok_or(CatalogError::NameRequired)?;
        Ok(NewRecord::new(kind.group(), name).with_active(self.active))
    }

    /// Patch replacing name and key of an existing category.
    pub fn to_patch(&self) -> Result<RecordPatch, CatalogError> {
        let name = non_blank(Some(self.name.as_str())).ok_or(CatalogError::NameRequired)?;
        Ok(RecordPatch {
            key: Some(name.clone()),
            name: Some(name),
            active: Some(self.active),
            ..RecordPatch::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub display_order: i64,
}

impl Category {
    pub fn from_record(record: &OrderedRecord) -> Result<Self, CatalogError> {
        if CategoryKind::from_group(&record.group).is_none() {
            return Err(CatalogError::WrongGroup {
                expected: "category or document_type".to_string(),
                actual: record.group.to_string(),
            });
        }
        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            active: record.active,
            display_order: record.ordinal,
        })
    }
}

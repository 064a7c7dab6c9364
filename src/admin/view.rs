use crate::record::{GroupKey, OrderedRecord};
use crate::store::GroupSnapshot;
use serde::Serialize;

/// One line of an admin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    /// 1-based position in display order.
    pub position: usize,
    pub id: String,
    pub name: String,
    pub key: String,
    pub active: bool,
    pub ordinal: i64,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub group: GroupKey,
    pub rows: Vec<ListRow>,
}

impl ListView {
    #[must_use]
    pub fn from_snapshot(snapshot: &GroupSnapshot) -> Self {
        let last = snapshot.len().saturating_sub(1);
        let rows = snapshot
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| row(index, last, record))
            .collect();
        Self {
            group: snapshot.group.clone(),
            rows,
        }
    }

    #[must_use]
    pub fn row(&self, id: &str) -> Option<&ListRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.name.as_str()).collect()
    }
}

fn row(index: usize, last: usize, record: &OrderedRecord) -> ListRow {
    ListRow {
        position: index.saturating_add(1),
        id: record.id.clone(),
        name: record.name.clone(),
        key: record.key.clone(),
        active: record.active,
        ordinal: record.ordinal,
        can_move_up: index > 0,
        can_move_down: index < last,
    }
}

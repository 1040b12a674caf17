use std::fmt;

/// Header of the trailing author reference column on thread and message rows.
pub const AUTHOR_REF_COLUMN: &str = "author_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Bool,
    Timestamp,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::Timestamp => "timestamp",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

const THREAD_FIELDS: [FieldSpec; 7] = [
    field("id", FieldKind::Text),
    field("created", FieldKind::Timestamp),
    field("num_comments", FieldKind::Integer),
    field("permalink", FieldKind::Text),
    field("score", FieldKind::Integer),
    field("title", FieldKind::Text),
    field("upvote_ratio", FieldKind::Float),
];

const MESSAGE_FIELDS: [FieldSpec; 7] = [
    field("id", FieldKind::Text),
    field("link_id", FieldKind::Text),
    field("created_utc", FieldKind::Timestamp),
    field("is_submitter", FieldKind::Bool),
    field("parent_id", FieldKind::Text),
    field("score", FieldKind::Integer),
    field("body", FieldKind::Text),
];

const AUTHOR_FIELDS: [FieldSpec; 8] = [
    field("id", FieldKind::Text),
    field("name", FieldKind::Text),
    field("comment_karma", FieldKind::Integer),
    field("created_utc", FieldKind::Timestamp),
    field("fullname", FieldKind::Text),
    field("is_mod", FieldKind::Bool),
    field("is_gold", FieldKind::Bool),
    field("link_karma", FieldKind::Integer),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Thread,
    Message,
    Author,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Thread, EntityKind::Message, EntityKind::Author];

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Thread => "thread",
            EntityKind::Message => "message",
            EntityKind::Author => "author",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            EntityKind::Thread => &THREAD_FIELDS,
            EntityKind::Message => &MESSAGE_FIELDS,
            EntityKind::Author => &AUTHOR_FIELDS,
        }
    }

    pub fn carries_author_ref(self) -> bool {
        matches!(self, EntityKind::Thread | EntityKind::Message)
    }

    pub fn header(self) -> Vec<&'static str> {
        let mut header: Vec<&'static str> = self.fields().iter().map(|spec| spec.name).collect();
        if self.carries_author_ref() {
            header.push(AUTHOR_REF_COLUMN);
        }
        header
    }

    pub fn file_name(self) -> &'static str {
        match self {
            EntityKind::Thread => "threads.csv",
            EntityKind::Message => "messages.csv",
            EntityKind::Author => "authors.csv",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

use serde_json::{Map, Value};

const DELETED_AUTHORS: [&str; 2] = ["[deleted]", "[removed]"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Comment,
    Account,
    Thread,
    More,
    Other,
}

impl RecordKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "t1" => RecordKind::Comment,
            "t2" => RecordKind::Account,
            "t3" => RecordKind::Thread,
            "more" => RecordKind::More,
            _ => RecordKind::Other,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            RecordKind::Comment => "t1",
            RecordKind::Account => "t2",
            RecordKind::Thread => "t3",
            RecordKind::More => "more",
            RecordKind::Other => "unknown",
        }
    }
}

/// An entity as the platform returned it: a kind tag plus its attribute map.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    kind: RecordKind,
    attrs: Map<String, Value>,
}

impl RawRecord {
    pub fn new(kind: RecordKind, attrs: Map<String, Value>) -> Self {
        Self { kind, attrs }
    }

    /// Reads a `{"kind": .., "data": {..}}` envelope.
    pub fn from_thing(value: Value) -> Option<Self> {
        let Value::Object(mut envelope) = value else {
            return None;
        };
        let kind = envelope
            .get("kind")
            .and_then(Value::as_str)
            .map(RecordKind::from_tag)?;
        match envelope.remove("data") {
            Some(Value::Object(attrs)) => Some(Self::new(kind, attrs)),
            _ => None,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").and_then(Value::as_str)
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.attrs.insert(name.into(), value);
    }

    pub fn take_attr(&mut self, name: &str) -> Option<Value> {
        self.attrs.remove(name)
    }

    /// Name of the account behind this record, if the account still resolves.
    pub fn author_name(&self) -> Option<&str> {
        let name = self.attrs.get("author").and_then(Value::as_str)?.trim();
        if name.is_empty() || DELETED_AUTHORS.contains(&name) {
            return None;
        }
        Some(name)
    }

    pub fn label(&self) -> String {
        match self.id() {
            Some(id) => id.to_string(),
            None => format!("<{} without id>", self.kind.tag()),
        }
    }
}

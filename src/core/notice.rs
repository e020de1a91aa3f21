use std::fmt;

/// Which store operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    TogglePin,
    Delete,
    Subscribe,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::TogglePin => "pin",
            Self::Delete => "delete",
            Self::Subscribe => "subscribe",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub operation: Operation,
    pub message: String,
}

/// Dismissable failure notices shown above the note list.
#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    /// Record a failure. Repeated subscription errors replace each other rather than stack.
    pub fn push(&mut self, operation: Operation, message: impl Into<String>) -> u64 {
        let message = message.into();
        log::error!("Store {} failed: {}", operation, message);
        if operation == Operation::Subscribe {
            self.items.retain(|n| n.operation != Operation::Subscribe);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notice {
            id,
            operation,
            message,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    /// Drop notices for an operation kind, e.g. once the subscription recovers.
    pub fn clear(&mut self, operation: Operation) {
        self.items.retain(|n| n.operation != operation);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

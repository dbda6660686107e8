//! Vocabulary of events emitted by notifiers.
//!
//! Container-level operations ([`NotifyEventOp::Make`], [`NotifyEventOp::Destroy`]) describe the
//! watched directory itself, element-level operations ([`NotifyEventOp::Update`],
//! [`NotifyEventOp::Delete`]) describe regular files directly inside it.
use crate::result::{EventErr, UnknownOp};

use std::fmt::Display;

/// Operation code of a [`NotifyEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NotifyEventOp {
    /// Non-fatal error while operating.
    Error = 1,

    /// Container is (re)materializing. Opens every listing pass.
    Make = 2,

    /// Regular file found while listing the container. With empty name it closes the pass.
    List = 3,

    /// Container was removed or renamed away.
    Destroy = 4,

    /// Element was created or written.
    Update = 5,

    /// Element was removed or renamed away.
    Delete = 6,
}

impl NotifyEventOp {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for NotifyEventOp {
    type Error = UnknownOp;

    fn try_from(code: u8) -> Result<Self, UnknownOp> {
        match code {
            1 => Ok(NotifyEventOp::Error),
            2 => Ok(NotifyEventOp::Make),
            3 => Ok(NotifyEventOp::List),
            4 => Ok(NotifyEventOp::Destroy),
            5 => Ok(NotifyEventOp::Update),
            6 => Ok(NotifyEventOp::Delete),
            _ => Err(UnknownOp(code)),
        }
    }
}

impl Display for NotifyEventOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NotifyEventOp::Error => "ERROR",
                NotifyEventOp::Make => "MAKE",
                NotifyEventOp::List => "NOTICE",
                NotifyEventOp::Destroy => "DESTROY",
                NotifyEventOp::Update => "UPDATE",
                NotifyEventOp::Delete => "DELETE",
            }
        )
    }
}

/// Single container or element event.
///
/// The error is present only for [`NotifyEventOp::Error`] and the name is empty for every
/// container-level event, which is guaranteed by the constructors.
#[derive(Debug)]
pub struct NotifyEvent {
    op: NotifyEventOp,
    name: String,
    err: Option<EventErr>,
}

impl NotifyEvent {
    fn new<S: Into<String>>(op: NotifyEventOp, name: S) -> Self {
        Self {
            op,
            name: name.into(),
            err: None,
        }
    }

    pub fn make() -> Self {
        Self::new(NotifyEventOp::Make, "")
    }

    pub fn listed<S: Into<String>>(name: S) -> Self {
        Self::new(NotifyEventOp::List, name)
    }

    /// Terminator of a listing pass: [`NotifyEventOp::List`] without a name.
    pub fn end_of_listing() -> Self {
        Self::new(NotifyEventOp::List, "")
    }

    pub fn destroy() -> Self {
        Self::new(NotifyEventOp::Destroy, "")
    }

    pub fn update<S: Into<String>>(name: S) -> Self {
        Self::new(NotifyEventOp::Update, name)
    }

    pub fn delete<S: Into<String>>(name: S) -> Self {
        Self::new(NotifyEventOp::Delete, name)
    }

    pub fn error(err: EventErr) -> Self {
        Self {
            op: NotifyEventOp::Error,
            name: String::new(),
            err: Some(err),
        }
    }

    pub fn op(&self) -> NotifyEventOp {
        self.op
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn err(&self) -> Option<&EventErr> {
        self.err.as_ref()
    }

    pub fn is_end_of_listing(&self) -> bool {
        self.op == NotifyEventOp::List && self.name.is_empty()
    }
}

impl Display for NotifyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.err {
            Some(err) => write!(f, "{} {}", self.op, err),
            None if self.name.is_empty() => write!(f, "{}", self.op),
            None => write!(f, "{} '{}'", self.op, self.name),
        }
    }
}

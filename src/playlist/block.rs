use std::borrow::Cow;

use super::extinf::{self, ExtInf, StatusUpdate};
use crate::models::EventStatus;

/// Header line of an entry block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryHeader {
    ExtInf(ExtInf),
    /// `#EXTINF` line outside the attribute grammar, carried verbatim
    Raw(String),
}

impl EntryHeader {
    pub fn parse(line: &str) -> Self {
        match ExtInf::parse(line) {
            Some(header) => EntryHeader::ExtInf(header),
            None => EntryHeader::Raw(line.to_string()),
        }
    }

    pub fn render(&self) -> Cow<'_, str> {
        match self {
            EntryHeader::ExtInf(header) => Cow::Owned(header.render()),
            EntryHeader::Raw(line) => Cow::Borrowed(line),
        }
    }

    pub fn status(&self) -> EventStatus {
        match self {
            EntryHeader::ExtInf(header) => header.status(),
            EntryHeader::Raw(line) => extinf::raw_status(line),
        }
    }

    /// Raw headers are rewritten in place when a quoted `tvg-id` can be found
    pub fn set_status(&mut self, status: EventStatus) -> StatusUpdate {
        match self {
            EntryHeader::ExtInf(header) => header.set_status(status),
            EntryHeader::Raw(line) => extinf::set_raw_status(line, status),
        }
    }

    pub fn set_group(&mut self, group: &str) -> bool {
        match self {
            EntryHeader::ExtInf(header) => header.set_group(group),
            EntryHeader::Raw(line) => extinf::set_raw_group(line, group),
        }
    }
}

impl From<ExtInf> for EntryHeader {
    fn from(header: ExtInf) -> Self {
        EntryHeader::ExtInf(header)
    }
}

/// A header plus the `#EXTVLCOPT:` and media lines that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBlock {
    header: EntryHeader,
    body: Vec<String>,
}

impl EntryBlock {
    pub fn new(header: impl Into<EntryHeader>) -> Self {
        Self {
            header: header.into(),
            body: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.body.push(line.into());
    }

    pub fn header(&self) -> &EntryHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut EntryHeader {
        &mut self.header
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    pub fn status(&self) -> EventStatus {
        self.header.status()
    }

    /// Header followed by the body, as written to disk
    pub fn lines(&self) -> impl Iterator<Item = Cow<'_, str>> {
        std::iter::once(self.header.render())
            .chain(self.body.iter().map(|line| Cow::Borrowed(line.as_str())))
    }
}

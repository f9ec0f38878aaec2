//! Per-run people registry
//!
//! People are identified by their exact email address. The registry hands out
//! one [`MemberId`] per address for the lifetime of a run.

use std::collections::HashMap;

use crate::models::{Member, MemberId};

#[derive(Debug, Default)]
pub struct MemberRegistry {
    by_email: HashMap<String, MemberId>,
    members: Vec<Member>,
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the member for an address, registering it on first sight
    pub fn resolve(&mut self, email: &str) -> MemberId {
        if let Some(id) = self.by_email.get(email) {
            return *id;
        }

        let id = MemberId(self.members.len());
        self.members.push(Member {
            id,
            email: email.to_string(),
        });
        self.by_email.insert(email.to_string(), id);
        id
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn into_members(self) -> Vec<Member> {
        self.members
    }
}

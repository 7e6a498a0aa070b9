// Commands replayed by the lending engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{ItemId, MemberId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Borrow {
        member: MemberId,
        item: ItemId,
        date: NaiveDate,
    },
    Return {
        member: MemberId,
        item: ItemId,
    },
    Pay {
        member: MemberId,
    },
    DisplayMembers,
    DisplayItems,
}

impl Command {
    /// Command word as written in the commands file
    pub fn name(&self) -> &'static str {
        match self {
            Command::Borrow { .. } => "borrow",
            Command::Return { .. } => "return",
            Command::Pay { .. } => "pay",
            Command::DisplayMembers => "displayMembers",
            Command::DisplayItems => "displayItems",
        }
    }
}

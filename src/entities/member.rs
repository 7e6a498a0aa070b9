// 👤 Member Entity - Identity + mutable lending state
//
// Identity (id, name, phone, profile) is fixed at load time.
// Loans and penalty balance change as commands are replayed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::item::ItemId;
use crate::rules::{policy_for, EligibilityPolicy};

pub type MemberId = u32;

// ============================================================================
// MEMBER CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberCategory {
    Student,
    AcademicMember,
    Guest,
}

impl MemberCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberCategory::Student => "Student",
            MemberCategory::AcademicMember => "Academic Member",
            MemberCategory::Guest => "Guest",
        }
    }
}

// ============================================================================
// MEMBER PROFILE
// ============================================================================

/// Category-specific descriptive fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberProfile {
    Student {
        department: String,
        faculty: String,
        grade: String,
    },
    Academic {
        department: String,
        faculty: String,
        title: String,
    },
    Guest {
        occupation: String,
    },
}

impl MemberProfile {
    pub fn category(&self) -> MemberCategory {
        match self {
            MemberProfile::Student { .. } => MemberCategory::Student,
            MemberProfile::Academic { .. } => MemberCategory::AcademicMember,
            MemberProfile::Guest { .. } => MemberCategory::Guest,
        }
    }
}

// ============================================================================
// MEMBER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub phone: String,
    pub profile: MemberProfile,

    /// Active loans: item -> date borrowed
    loans: HashMap<ItemId, NaiveDate>,

    /// Accrued overdue penalty, reset to 0 by payment
    penalty: u32,
}

impl Member {
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        phone: impl Into<String>,
        profile: MemberProfile,
    ) -> Self {
        Member {
            id,
            name: name.into(),
            phone: phone.into(),
            profile,
            loans: HashMap::new(),
            penalty: 0,
        }
    }

    pub fn category(&self) -> MemberCategory {
        self.profile.category()
    }

    pub fn policy(&self) -> &'static EligibilityPolicy {
        policy_for(self.category())
    }

    // ------------------------------------------------------------------------
    // Loans
    // ------------------------------------------------------------------------

    pub fn lend(&mut self, item: ItemId, date: NaiveDate) {
        self.loans.insert(item, date);
    }

    /// Remove a loan; returns the borrow date if the member held the item
    pub fn take_back(&mut self, item: ItemId) -> Option<NaiveDate> {
        self.loans.remove(&item)
    }

    pub fn holds(&self, item: ItemId) -> bool {
        self.loans.contains_key(&item)
    }

    pub fn loan_date(&self, item: ItemId) -> Option<NaiveDate> {
        self.loans.get(&item).copied()
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }

    /// Drop every loan the predicate marks as overdue, returning the evicted item ids
    pub fn evict_loans<F>(&mut self, mut overdue: F) -> Vec<ItemId>
    where
        F: FnMut(NaiveDate) -> bool,
    {
        let evicted: Vec<ItemId> = self
            .loans
            .iter()
            .filter(|(_, date)| overdue(**date))
            .map(|(id, _)| *id)
            .collect();

        for id in &evicted {
            self.loans.remove(id);
        }

        evicted
    }

    // ------------------------------------------------------------------------
    // Penalty
    // ------------------------------------------------------------------------

    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    pub fn add_penalty(&mut self, amount: u32) {
        self.penalty = self.penalty.saturating_add(amount);
    }

    pub fn clear_penalty(&mut self) {
        self.penalty = 0;
    }

    // ------------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------------

    /// Two-line description used by the members report
    pub fn info_lines(&self) -> [String; 2] {
        match &self.profile {
            MemberProfile::Student {
                department,
                faculty,
                grade,
            } => [
                format!("Name: {} Phone: {}", self.name, self.phone),
                format!(
                    "Faculty: {} Department: {} Grade: {}th",
                    faculty, department, grade
                ),
            ],
            MemberProfile::Academic {
                department,
                faculty,
                title,
            } => [
                format!("Name: {} {} Phone: {}", title, self.name, self.phone),
                format!("Faculty: {} Department: {}", faculty, department),
            ],
            MemberProfile::Guest { occupation } => [
                format!("Name: {} Phone: {}", self.name, self.phone),
                format!("Occupation: {}", occupation),
            ],
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

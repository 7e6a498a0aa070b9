// 🏷️ Eligibility Rules - Rules as Data
// Per-category lending policy: borrow cap, overdue threshold, barred tags

use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::{CategoryTag, MemberCategory};

// ============================================================================
// POLICY DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityPolicy {
    /// Maximum number of concurrent loans
    pub max_loans: usize,

    /// A loan held for more than this many days (inclusive count) is overdue
    pub overdue_threshold_days: i64,

    /// Item tags this category may not borrow
    pub barred_tags: &'static [CategoryTag],
}

impl EligibilityPolicy {
    pub fn can_borrow(&self, tag: CategoryTag) -> bool {
        !self.barred_tags.contains(&tag)
    }

    /// Days held counts both the borrow day and today
    pub fn days_held(borrowed: NaiveDate, today: NaiveDate) -> i64 {
        (today - borrowed).num_days() + 1
    }

    pub fn is_overdue(&self, borrowed: NaiveDate, today: NaiveDate) -> bool {
        Self::days_held(borrowed, today) > self.overdue_threshold_days
    }
}

// ============================================================================
// POLICY TABLE
// ============================================================================

pub const STUDENT_POLICY: EligibilityPolicy = EligibilityPolicy {
    max_loans: 5,
    overdue_threshold_days: 30,
    barred_tags: &[CategoryTag::Referenced],
};

pub const ACADEMIC_POLICY: EligibilityPolicy = EligibilityPolicy {
    max_loans: 3,
    overdue_threshold_days: 15,
    barred_tags: &[],
};

pub const GUEST_POLICY: EligibilityPolicy = EligibilityPolicy {
    max_loans: 1,
    overdue_threshold_days: 7,
    barred_tags: &[CategoryTag::Rare, CategoryTag::Limited],
};

pub fn policy_for(category: MemberCategory) -> &'static EligibilityPolicy {
    match category {
        MemberCategory::Student => &STUDENT_POLICY,
        MemberCategory::AcademicMember => &ACADEMIC_POLICY,
        MemberCategory::Guest => &GUEST_POLICY,
    }
}

// ============================================================================
// TESTS
// ============================================================================

// ⚙️ Lending Engine - Command replay over the record store
//
// Commands are applied strictly in order; later commands depend on the side
// effects of earlier ones. Borrow protocol, in order, each step may end it:
//   1. chronological watermark (fatal on violation)
//   2. global overdue sweep against today's date
//   3. borrow cap
//   4. availability (single copy per item)
//   5. unpaid penalty
//   6. category eligibility
//   7. record the loan

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::config::LendingConfig;
use crate::entities::{CategoryTag, Item, ItemId, Member, MemberId};
use crate::error::LendingError;
use crate::report;
use crate::sink::OutputSink;
use crate::store::RecordStore;

/// Line written before aborting on an out-of-order borrow
pub const NON_SEQUENTIAL_MESSAGE: &str = "Borrow dates must be sequential.";

// ============================================================================
// OUTCOMES
// ============================================================================

/// Why a borrow was refused. Refusals are reported, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    LimitReached,
    Unavailable,
    PenaltyDue(u32),
    Ineligible(CategoryTag),
}

impl Rejection {
    /// Stable key used in the replay summary
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::LimitReached => "limit_reached",
            Rejection::Unavailable => "unavailable",
            Rejection::PenaltyDue(_) => "penalty_due",
            Rejection::Ineligible(_) => "ineligible",
        }
    }

    pub fn message(&self, member: &Member, item: &Item) -> String {
        match self {
            Rejection::LimitReached => format!(
                "{} cannot borrow {}, since the borrow limit has been reached!",
                member.name, item.title
            ),
            Rejection::Unavailable => format!(
                "{} cannot borrow {}, it is not available!",
                member.name, item.title
            ),
            Rejection::PenaltyDue(balance) => format!(
                "{} cannot borrow {}, you must first pay the penalty amount! {}$",
                member.name, item.title, balance
            ),
            Rejection::Ineligible(tag) => format!("{} cannot borrow {} item!", member.name, tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Borrowed,
    Rejected(Rejection),
    Returned,
    Paid,
    Displayed,
}

/// Counters collected over one replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub commands: usize,
    pub borrowed: usize,
    pub returned: usize,
    pub payments: usize,
    pub reports: usize,
    pub rejections: BTreeMap<&'static str, usize>,
    pub overdue_evictions: usize,
    pub penalty_accrued: u64,
}

impl ReplaySummary {
    pub fn rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    fn record(&mut self, outcome: &Outcome) {
        self.commands += 1;
        match outcome {
            Outcome::Borrowed => self.borrowed += 1,
            Outcome::Rejected(rejection) => {
                *self.rejections.entry(rejection.reason()).or_insert(0) += 1;
            }
            Outcome::Returned => self.returned += 1,
            Outcome::Paid => self.payments += 1,
            Outcome::Displayed => self.reports += 1,
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct LendingEngine<S: OutputSink> {
    store: RecordStore,
    sink: S,
    today: NaiveDate,
    date_format: String,
    penalty_increment: u32,
    penalty_block_threshold: u32,

    /// Date of the most recently accepted borrow
    watermark: Option<NaiveDate>,

    summary: ReplaySummary,
}

impl<S: OutputSink> LendingEngine<S> {
    pub fn new(store: RecordStore, sink: S, config: &LendingConfig) -> Self {
        LendingEngine {
            store,
            sink,
            today: config.today(),
            date_format: config.date_format.clone(),
            penalty_increment: config.penalty_increment,
            penalty_block_threshold: config.penalty_block_threshold,
            watermark: None,
            summary: ReplaySummary::default(),
        }
    }

    /// Fix the date the overdue sweep measures against
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    pub fn watermark(&self) -> Option<NaiveDate> {
        self.watermark
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Execute commands in order, stopping at the first fatal error.
    /// The sink is flushed on both the success and the abort path.
    pub fn replay<'c, I>(&mut self, commands: I) -> Result<(), LendingError>
    where
        I: IntoIterator<Item = &'c Command>,
    {
        for command in commands {
            if let Err(err) = self.execute(command) {
                self.sink.flush()?;
                return Err(err);
            }
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Flush the sink and hand back the summary
    pub fn finish(mut self) -> Result<(ReplaySummary, S), LendingError> {
        self.sink.flush()?;
        Ok((self.summary, self.sink))
    }

    pub fn execute(&mut self, command: &Command) -> Result<Outcome, LendingError> {
        let outcome = match command {
            Command::Borrow { member, item, date } => self.borrow(*member, *item, *date)?,
            Command::Return { member, item } => self.return_item(*member, *item)?,
            Command::Pay { member } => self.pay(*member)?,
            Command::DisplayMembers => {
                let lines = report::members_report(&self.store);
                self.emit_all(&lines)?;
                Outcome::Displayed
            }
            Command::DisplayItems => {
                let lines = report::items_report(&self.store, &self.date_format);
                self.emit_all(&lines)?;
                Outcome::Displayed
            }
        };

        debug!(command = command.name(), ?outcome, "command executed");
        self.summary.record(&outcome);
        Ok(outcome)
    }

    // ------------------------------------------------------------------------
    // Borrow
    // ------------------------------------------------------------------------

    fn borrow(
        &mut self,
        member_id: MemberId,
        item_id: ItemId,
        date: NaiveDate,
    ) -> Result<Outcome, LendingError> {
        if let Some(watermark) = self.watermark {
            if date < watermark {
                warn!(%date, %watermark, "borrow out of chronological order, aborting");
                self.emit(NON_SEQUENTIAL_MESSAGE)?;
                self.sink.flush()?;
                return Err(LendingError::NonSequentialBorrow { date, watermark });
            }
        }
        self.watermark = Some(date);

        let item = self.resolve_item(item_id)?.clone();
        self.resolve_member(member_id)?;

        self.sweep_overdue();

        let rejection = self.check_borrow(member_id, &item);
        let member = self
            .store
            .member_mut(member_id)
            .ok_or(LendingError::UnknownMember(member_id))?;

        let line = match rejection {
            Some(rejection) => {
                info!(member = member_id, item = item_id, reason = rejection.reason(), "borrow rejected");
                rejection.message(member, &item)
            }
            None => {
                member.lend(item_id, date);
                format!("{} successfully borrowed! {}", member.name, item.title)
            }
        };
        self.emit(&line)?;

        Ok(rejection.map_or(Outcome::Borrowed, Outcome::Rejected))
    }

    /// First rule the borrow breaks, if any
    fn check_borrow(&self, member_id: MemberId, item: &Item) -> Option<Rejection> {
        let member = self.store.member(member_id)?;
        let policy = member.policy();

        if member.loan_count() >= policy.max_loans {
            return Some(Rejection::LimitReached);
        }
        if self.store.holder_of(item.id).is_some() {
            return Some(Rejection::Unavailable);
        }
        if member.penalty() >= self.penalty_block_threshold {
            return Some(Rejection::PenaltyDue(member.penalty()));
        }
        if !policy.can_borrow(item.tag) {
            return Some(Rejection::Ineligible(item.tag));
        }
        None
    }

    /// Evict every overdue loan of every member, charging the penalty increment
    /// per evicted loan. Returns the number of loans evicted.
    pub fn sweep_overdue(&mut self) -> usize {
        let today = self.today;
        let increment = self.penalty_increment;
        let mut evicted_total = 0;

        for member in self.store.members_mut() {
            let policy = member.policy();
            let evicted = member.evict_loans(|borrowed| policy.is_overdue(borrowed, today));
            if evicted.is_empty() {
                continue;
            }

            for _ in &evicted {
                member.add_penalty(increment);
            }
            info!(
                member = member.id,
                category = member.category().as_str(),
                items = ?evicted,
                penalty = member.penalty(),
                "overdue loans evicted"
            );
            evicted_total += evicted.len();
        }

        self.summary.overdue_evictions += evicted_total;
        self.summary.penalty_accrued += evicted_total as u64 * u64::from(increment);
        evicted_total
    }

    // ------------------------------------------------------------------------
    // Return / Pay
    // ------------------------------------------------------------------------

    fn return_item(&mut self, member_id: MemberId, item_id: ItemId) -> Result<Outcome, LendingError> {
        let title = self.resolve_item(item_id)?.title.clone();
        let member = self
            .store
            .member_mut(member_id)
            .ok_or(LendingError::UnknownMember(member_id))?;

        if member.take_back(item_id).is_none() {
            debug!(member = member_id, item = item_id, "return of an item the member did not hold");
        }
        let line = format!("{} successfully returned {}", member.name, title);
        self.emit(&line)?;

        Ok(Outcome::Returned)
    }

    fn pay(&mut self, member_id: MemberId) -> Result<Outcome, LendingError> {
        let member = self
            .store
            .member_mut(member_id)
            .ok_or(LendingError::UnknownMember(member_id))?;

        member.clear_penalty();
        let line = format!("{} has paid penalty", member.name);
        self.emit(&line)?;

        Ok(Outcome::Paid)
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn resolve_item(&self, id: ItemId) -> Result<&Item, LendingError> {
        self.store.item(id).ok_or(LendingError::UnknownItem(id))
    }

    fn resolve_member(&self, id: MemberId) -> Result<&Member, LendingError> {
        self.store.member(id).ok_or(LendingError::UnknownMember(id))
    }

    fn emit(&mut self, line: &str) -> Result<(), LendingError> {
        self.sink.write_line(line)?;
        Ok(())
    }

    fn emit_all(&mut self, lines: &[String]) -> Result<(), LendingError> {
        for line in lines {
            self.sink.write_line(line)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

// Entity Models
//
// Closed sets of record kinds:
// - Items: Book, Magazine, DVD (immutable after load)
// - Members: Student, Academic Member, Guest (loans + penalty mutate)

pub mod item;
pub mod member;

pub use item::{CategoryTag, Item, ItemId, ItemKind};
pub use member::{Member, MemberCategory, MemberId, MemberProfile};

mod ledger;
mod money;
mod persisted;
mod team;

pub use ledger::*;
pub use money::*;
pub use persisted::*;
pub use team::*;

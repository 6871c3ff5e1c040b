mod monetary;

pub use monetary::{round2, Currency, Percentage};

pub type TableName = String;
pub type ChannelId = String;
pub type MessageId = String;

pub mod chats;
pub mod members;

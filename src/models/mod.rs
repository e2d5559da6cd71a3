pub mod agenda_item;
pub mod comment;
pub mod meeting;
pub mod vote_result;
